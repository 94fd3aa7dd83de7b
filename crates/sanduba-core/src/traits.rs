/*!
 * Sanduba Traits
 *
 * Traits comuns usados em toda a workspace Sanduba
 */

use async_trait::async_trait;
use crate::error::Result;
use ethereum_types::Address;

/// Trait para provedores RPC
#[async_trait]
pub trait RpcProvider: Send + Sync {
    /// Chama um método de contrato
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Obtém o número do bloco atual
    async fn get_block_number(&self) -> Result<u64>;
}

/// Trait para notificadores de alertas
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    /// Envia um alerta serializado
    async fn notify(&self, alert_data: Vec<u8>) -> Result<()>;

    /// Verifica se o notificador está disponível
    async fn is_available(&self) -> bool;
}
