/*!
 * Sanduba Types
 *
 * Tipos comuns usados em toda a workspace Sanduba
 */

use ethereum_types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alias para hash de transação
pub type TransactionHash = H256;

/// Evento de swap decodificado de um log AMM
///
/// Cada evento descreve uma troca concluída: a conta que negociou,
/// o par de tokens e os montantes efetivos de entrada e saída.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    pub tx_hash: TransactionHash,
    pub account: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub amount_out: U256,
}

impl SwapEvent {
    /// Verifica se `other` negocia na mesma direção (mesmo token de entrada e de saída)
    pub fn same_direction(&self, other: &SwapEvent) -> bool {
        self.token_in == other.token_in && self.token_out == other.token_out
    }

    /// Verifica se `other` negocia na direção inversa deste swap
    pub fn inverts(&self, other: &SwapEvent) -> bool {
        self.token_in == other.token_out && self.token_out == other.token_in
    }
}

/// Chamada de swap decodificada do calldata de uma transação
///
/// Registra o que a transação declarou antes de executar: o montante de
/// entrada, o mínimo aceito na saída e as reservas do par no momento da
/// observação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCall {
    pub tx_hash: TransactionHash,
    pub amount_in: U256,
    pub min_out: U256,
    pub reserves: ReserveSnapshot,
}

/// Reservas de um par AMM no momento da observação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSnapshot {
    pub reserve_in: U256,
    pub reserve_out: U256,
}

/// Protocolo DEX
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DexProtocol {
    UniswapV2,
    SushiSwap,
    Unknown(String),
}

impl fmt::Display for DexProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DexProtocol::UniswapV2 => write!(f, "uniswap_v2"),
            DexProtocol::SushiSwap => write!(f, "sushiswap"),
            DexProtocol::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// Tipo de detecção que originou um alerta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionKind {
    /// Sandwich confirmado por três eventos de swap observados no stream
    ConfirmedSandwich,
    /// Sandwich considerado viável pelo oráculo de lucratividade
    FeasibleSandwich,
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionKind::ConfirmedSandwich => write!(f, "confirmed_sandwich"),
            DetectionKind::FeasibleSandwich => write!(f, "feasible_sandwich"),
        }
    }
}

/// Severidade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}
