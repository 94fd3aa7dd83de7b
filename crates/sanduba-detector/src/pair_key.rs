use ethereum_types::{Address, H256};
use sanduba_core::types::SwapEvent;
use sanduba_core::utils::keccak256;
use serde::{Deserialize, Serialize};

/// Chave de agrupamento de swaps: conta mais par de tokens sem direção
///
/// Os tokens são ordenados lexicograficamente pelo valor do endereço, de
/// modo que os dois sentidos de negociação do mesmo par produzem a mesma
/// chave. A chave é função pura dos argumentos e nunca é mutada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub account: Address,
    pub token0: Address,
    pub token1: Address,
}

impl PairKey {
    /// Monta a chave ordenando o par de tokens
    pub fn new(account: Address, token_a: Address, token_b: Address) -> Self {
        let (token0, token1) = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Self { account, token0, token1 }
    }

    /// Deriva a chave de um evento de swap
    pub fn from_event(event: &SwapEvent) -> Self {
        Self::new(event.account, event.token_in, event.token_out)
    }

    /// Resumo keccak da chave, usado como identificador compacto em alertas
    pub fn digest(&self) -> H256 {
        let mut bytes = Vec::with_capacity(60);
        bytes.extend_from_slice(self.account.as_bytes());
        bytes.extend_from_slice(self.token0.as_bytes());
        bytes.extend_from_slice(self.token1.as_bytes());
        H256::from(keccak256(&bytes))
    }
}
