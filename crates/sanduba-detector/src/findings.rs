use crate::pair_key::PairKey;
use ethereum_types::{Address, U256};
use ethers::types::I256;
use sanduba_core::types::{ReserveSnapshot, TransactionHash};
use serde::{Deserialize, Serialize};

/// Sandwich confirmado pelo casador de stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandwichFinding {
    pub pair: PairKey,
    pub front_tx_hash: TransactionHash,
    pub victim_tx_hash: TransactionHash,
    pub back_tx_hash: TransactionHash,
    pub victim_address: Address,
    pub victim_token_in: Address,
    pub victim_token_out: Address,
    pub victim_amount_in: U256,
    pub victim_amount_out: U256,
    pub frontrunner_address: Address,
    /// Lucro do atacante no token compartilhado: `back.amount_out − front.amount_in`
    pub frontrunner_profit: I256,
}

/// Sandwich viável segundo o oráculo, com os números usados na decisão
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibleSandwich {
    pub front_tx_hash: TransactionHash,
    pub victim_tx_hash: TransactionHash,
    pub back_tx_hash: TransactionHash,
    pub reserves: ReserveSnapshot,
    pub frontrun_amount_in: U256,
    pub victim_amount_in: U256,
    pub victim_min_out: U256,
    /// Saída calculada para a vítima com o front-run aplicado
    pub receivable: U256,
}
