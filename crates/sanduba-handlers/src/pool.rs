/*!
Estado de pools Uniswap V2-like.

Resolve o endereço do par de dois tokens na factory, com cache LRU, e lê
as reservas do par com uma chamada `getReserves` crua, reorientando o
resultado para a direção do swap observado.
*/

use std::num::NonZeroUsize;

use ethereum_types::{Address, U256};
use ethers::abi::{AbiParser, Token};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use sanduba_core::error::{Error, Result};
use sanduba_core::traits::RpcProvider;
use sanduba_core::types::ReserveSnapshot;

/// Seletor de `getReserves()`
const GET_RESERVES_SELECTOR: [u8; 4] = [0x09, 0x02, 0xf1, 0xac];

/// Cliente de estado de pools de um protocolo Uniswap V2-like
pub struct PoolStateClient<P> {
    provider: P,
    factory: Address,
    pair_cache: Mutex<LruCache<(Address, Address), Address>>,
}

impl<P: RpcProvider> PoolStateClient<P> {
    pub fn new(provider: P, factory: Address) -> Self {
        Self {
            provider,
            factory,
            pair_cache: Mutex::new(LruCache::new(NonZeroUsize::new(128).unwrap())),
        }
    }

    /// Endereço do par para dois tokens.
    ///
    /// A factory é consultada uma única vez por par; o resultado fica em
    /// cache sob a chave canônica (tokens ordenados).
    pub async fn pair_address(&self, token_a: Address, token_b: Address) -> Result<Address> {
        if token_a == token_b {
            return Err(Error::ValidationError(
                "tokens do par devem ser distintos".to_string(),
            ));
        }
        let key = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        if let Some(pair) = self.pair_cache.lock().get(&key).copied() {
            return Ok(pair);
        }

        let abi = AbiParser::default()
            .parse_function("getPair(address,address) view returns (address)")
            .map_err(|e| Error::DecodeError(e.to_string()))?;
        let data = abi
            .encode_input(&[Token::Address(key.0), Token::Address(key.1)])
            .map_err(|e| Error::EncodeError(e.to_string()))?;

        let response = self.provider.call(self.factory, data).await?;
        if response.len() < 32 {
            return Err(Error::DecodeError(
                "resposta de getPair menor que uma palavra".to_string(),
            ));
        }
        let pair = Address::from_slice(&response[12..32]);
        if pair == Address::zero() {
            return Err(Error::NotFound(format!(
                "par inexistente na factory para {:?}/{:?}",
                key.0, key.1
            )));
        }

        debug!("par {:?} resolvido para {:?}/{:?}", pair, key.0, key.1);
        self.pair_cache.lock().put(key, pair);
        Ok(pair)
    }

    /// Reservas atuais do par, orientadas na direção `token_in` → `token_out`.
    ///
    /// `reserve0` do par corresponde ao token de menor endereço; quando o
    /// token de entrada é o maior dos dois, as reservas são trocadas.
    pub async fn reserves(&self, token_in: Address, token_out: Address) -> Result<ReserveSnapshot> {
        let pair = self.pair_address(token_in, token_out).await?;

        let response = self
            .provider
            .call(pair, GET_RESERVES_SELECTOR.to_vec())
            .await?;
        if response.len() < 64 {
            return Err(Error::DecodeError(
                "resposta de getReserves menor que duas palavras".to_string(),
            ));
        }
        let reserve0 = U256::from_big_endian(&response[0..32]);
        let reserve1 = U256::from_big_endian(&response[32..64]);

        let (reserve_in, reserve_out) = if token_in <= token_out {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };
        Ok(ReserveSnapshot {
            reserve_in,
            reserve_out,
        })
    }
}
