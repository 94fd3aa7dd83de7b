use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use ethers::abi::{encode, AbiParser, Token};
use ethers::types::{Address, Bytes, Log, H256};
use tracing::info;

use sanduba_core::error::{Error, Result as CoreResult};
use sanduba_core::traits::{AlertNotifier, RpcProvider};
use sanduba_core::utils::hex_to_address;
use sanduba_detector::MatcherConfig;
use sanduba_handlers::handlers::{
    BlockProfitHandler, HandlerConfig, ObservedBlock, ObservedCall, ObservedTransaction,
    SwapStreamHandler,
};
use sanduba_handlers::log_semantics::SWAP_TOPIC;

/// Token WBNB na BNB Chain
const WBNB: &str = "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c";
/// Token BUSD
const BUSD: &str = "0xe9e7cea3dedca5984780bafc599bd69add087d56";

/// Notificador que imprime cada alerta serializado no log
struct LogNotifier;

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn notify(&self, alert_data: Vec<u8>) -> CoreResult<()> {
        info!("alerta: {}", String::from_utf8_lossy(&alert_data));
        Ok(())
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Provedor RPC com respostas pré-gravadas, no lugar de um nó real
struct CannedProvider {
    responses: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl RpcProvider for CannedProvider {
    async fn call(&self, _to: Address, _data: Vec<u8>) -> CoreResult<Vec<u8>> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::RpcError("sem resposta gravada".to_string()));
        }
        Ok(responses.remove(0))
    }

    async fn get_block_number(&self) -> CoreResult<u64> {
        Ok(1)
    }
}

fn swap_log(router: Address, account: Address, token_in: Address, token_out: Address, amount_in: u64, amount_out: u64) -> Log {
    let data = encode(&[
        Token::Address(account),
        Token::Address(token_in),
        Token::Address(token_out),
        Token::Uint(amount_in.into()),
        Token::Uint(amount_out.into()),
    ]);
    Log {
        address: router,
        topics: vec![*SWAP_TOPIC],
        data: Bytes::from(data),
        ..Default::default()
    }
}

fn swap_calldata(amount_in: u64, min_out: u64, path: &[Address], recipient: Address) -> anyhow::Result<Vec<u8>> {
    let abi = AbiParser::default()
        .parse_function("swapExactTokensForTokens(uint256,uint256,address[],address,uint256)")?;
    let mut data = abi.short_signature().to_vec();
    data.extend(abi.encode_input(&[
        Token::Uint(amount_in.into()),
        Token::Uint(min_out.into()),
        Token::Array(path.iter().copied().map(Token::Address).collect()),
        Token::Address(recipient),
        Token::Uint(9999.into()),
    ])?);
    Ok(data)
}

fn word_address(address: Address) -> Vec<u8> {
    let mut word = vec![0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn reserves_response(reserve0: u64, reserve1: u64) -> Vec<u8> {
    let mut out = vec![0u8; 64];
    ethers::types::U256::from(reserve0).to_big_endian(&mut out[0..32]);
    ethers::types::U256::from(reserve1).to_big_endian(&mut out[32..64]);
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let wbnb = hex_to_address(WBNB).context("WBNB inválido")?;
    let busd = hex_to_address(BUSD).context("BUSD inválido")?;

    // alvo padrão: router e factory V2 da PancakeSwap na BNB Chain
    let config = HandlerConfig {
        matcher: MatcherConfig { history_capacity: 64 },
        ..HandlerConfig::default()
    };
    let router = config.router;

    let attacker = Address::from_low_u64_be(0x01);
    let victim = Address::from_low_u64_be(0x02);

    // Stream: três transações confirmadas formando um sandwich
    info!("Reproduzindo um sandwich no stream de transações");
    let stream_handler = SwapStreamHandler::new(config.clone());
    let notifier = LogNotifier;
    let txs = [
        (0x11u64, swap_log(router, attacker, wbnb, busd, 1000, 900)),
        (0x12, swap_log(router, victim, wbnb, busd, 500, 420)),
        (0x13, swap_log(router, attacker, busd, wbnb, 900, 1050)),
    ];
    let mut total = 0;
    for (tx, log) in txs {
        let observed = ObservedTransaction {
            tx_hash: H256::from_low_u64_be(tx),
            logs: vec![log],
        };
        total += stream_handler
            .handle_and_notify(&observed, &notifier)
            .await?
            .len();
    }
    info!("{} alerta(s) confirmado(s) no stream", total);

    // Bloco: as mesmas três pernas vistas como chamadas, reservas vindas
    // de um provedor com respostas gravadas
    info!("Analisando o mesmo bloco pelo oráculo de viabilidade");
    let provider = CannedProvider {
        responses: Mutex::new(vec![
            word_address(Address::from_low_u64_be(0x3000)),
            reserves_response(10_000, 10_000),
            reserves_response(10_000, 10_000),
            reserves_response(10_000, 10_000),
        ]),
    };
    let block_handler = BlockProfitHandler::new(provider, config);
    let path = [wbnb, busd];
    let block = ObservedBlock {
        number: 42,
        transactions: vec![
            ObservedCall {
                tx_hash: H256::from_low_u64_be(0x11),
                to: Some(router),
                input: swap_calldata(1000, 0, &path, attacker)?,
            },
            ObservedCall {
                tx_hash: H256::from_low_u64_be(0x12),
                to: Some(router),
                input: swap_calldata(500, 500, &path, victim)?,
            },
            ObservedCall {
                tx_hash: H256::from_low_u64_be(0x13),
                to: Some(router),
                input: swap_calldata(826, 0, &path, attacker)?,
            },
        ],
    };
    let alerts = block_handler.handle_block(&block).await?;
    for alert in &alerts {
        info!(
            "tripla viável: vítima receberia {} (mínimo {})",
            alert.metadata.get("receivable").map(String::as_str).unwrap_or("?"),
            alert.metadata.get("victim_min_out").map(String::as_str).unwrap_or("?")
        );
    }
    info!("{} alerta(s) de viabilidade no bloco", alerts.len());

    Ok(())
}
