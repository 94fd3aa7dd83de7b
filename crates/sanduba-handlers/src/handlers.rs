/*!
Handlers de detecção.

Dois pontos de entrada para o runtime hospedeiro:

- [`SwapStreamHandler`]: recebe transações confirmadas uma a uma,
  decodifica os eventos de swap do router observado e alimenta o casador
  de sandwich do detector.
- [`BlockProfitHandler`]: recebe blocos inteiros, decodifica as chamadas
  de swap dirigidas ao router, busca as reservas de cada par e roda o
  oráculo de viabilidade sobre a lista ordenada.
*/

use anyhow::Result;
use ethereum_types::{Address, H160};
use ethers::types::Log;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sanduba_core::error::Error;
use sanduba_core::traits::{AlertNotifier, RpcProvider};
use sanduba_core::types::{DexProtocol, SwapCall, TransactionHash};
use sanduba_core::utils::format_h256;
use sanduba_detector::{scan_block, MatcherConfig, SandwichMatcher};

use crate::alerts::{dispatch_alert, Alert};
use crate::calls::decode_swap_call;
use crate::log_semantics::decode_swap_logs;
use crate::pool::PoolStateClient;

/// Router V2 da PancakeSwap na BNB Chain, alvo padrão dos handlers
/// (`0x10ed43c718714eb63d5aa57b78b54704e256024e`)
pub const DEFAULT_ROUTER: Address = H160([
    0x10, 0xed, 0x43, 0xc7, 0x18, 0x71, 0x4e, 0xb6, 0x3d, 0x5a, 0xa5, 0x7b, 0x78, 0xb5, 0x47,
    0x04, 0xe2, 0x56, 0x02, 0x4e,
]);

/// Factory V2 da PancakeSwap
/// (`0xca143ce32fe78f1f7019d7d551a6402fc5350c73`)
pub const DEFAULT_FACTORY: Address = H160([
    0xca, 0x14, 0x3c, 0xe3, 0x2f, 0xe7, 0x8f, 0x1f, 0x70, 0x19, 0xd7, 0xd5, 0x51, 0xa6, 0x40,
    0x2f, 0xc5, 0x35, 0x0c, 0x73,
]);

/// Configuração compartilhada dos handlers
///
/// O padrão aponta para o router e a factory V2 da PancakeSwap na BNB
/// Chain; hosts em outras redes preenchem os próprios endereços.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Router cujos swaps são observados
    pub router: Address,
    /// Factory usada para resolver pares
    pub factory: Address,
    /// Protocolo informado nos alertas
    pub protocol: DexProtocol,
    /// Configuração do casador de stream
    pub matcher: MatcherConfig,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            router: DEFAULT_ROUTER,
            factory: DEFAULT_FACTORY,
            protocol: DexProtocol::UniswapV2,
            matcher: MatcherConfig::default(),
        }
    }
}

/// Transação confirmada entregue pelo runtime hospedeiro
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedTransaction {
    pub tx_hash: TransactionHash,
    pub logs: Vec<Log>,
}

/// Chamada observada dentro de um bloco
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedCall {
    pub tx_hash: TransactionHash,
    pub to: Option<Address>,
    pub input: Vec<u8>,
}

/// Bloco confirmado entregue pelo runtime hospedeiro
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedBlock {
    pub number: u64,
    pub transactions: Vec<ObservedCall>,
}

/// Handler de stream: um sandwich é confirmado quando as três pernas
/// aparecem na janela do histórico do casador.
pub struct SwapStreamHandler {
    router: Address,
    protocol: DexProtocol,
    matcher: Mutex<SandwichMatcher>,
}

impl SwapStreamHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            router: config.router,
            protocol: config.protocol,
            matcher: Mutex::new(SandwichMatcher::new(config.matcher)),
        }
    }

    /// Processa os logs de uma transação confirmada e devolve os alertas
    /// emitidos.
    ///
    /// Apenas logs emitidos pelo router observado são considerados.
    pub fn handle_transaction(&self, tx: &ObservedTransaction) -> Vec<Alert> {
        let router_logs: Vec<Log> = tx
            .logs
            .iter()
            .filter(|log| log.address == self.router)
            .cloned()
            .collect();
        let events = decode_swap_logs(tx.tx_hash, &router_logs);
        if events.is_empty() {
            return Vec::new();
        }
        debug!(
            "{} evento(s) de swap decodificado(s) em {}",
            events.len(),
            format_h256(&tx.tx_hash)
        );

        let mut alerts = Vec::new();
        let mut matcher = self.matcher.lock();
        for event in events {
            if let Some(finding) = matcher.observe(event) {
                info!(
                    "sandwich confirmado: front {} vítima {} back {}",
                    format_h256(&finding.front_tx_hash),
                    format_h256(&finding.victim_tx_hash),
                    format_h256(&finding.back_tx_hash)
                );
                alerts.push(Alert::from_finding(&finding, self.protocol.clone()));
            }
        }
        alerts
    }

    /// Processa a transação e despacha os alertas pelo notificador
    pub async fn handle_and_notify<N>(
        &self,
        tx: &ObservedTransaction,
        notifier: &N,
    ) -> Result<Vec<Alert>>
    where
        N: AlertNotifier,
    {
        let alerts = self.handle_transaction(tx);
        for alert in &alerts {
            dispatch_alert(notifier, alert).await?;
        }
        Ok(alerts)
    }
}

/// Handler de bloco: aponta triplas de swaps consecutivos que, sob as
/// reservas observadas, ainda deixariam a vítima acima do seu mínimo.
pub struct BlockProfitHandler<P> {
    router: Address,
    protocol: DexProtocol,
    pool_client: PoolStateClient<P>,
}

impl<P: RpcProvider> BlockProfitHandler<P> {
    pub fn new(provider: P, config: HandlerConfig) -> Self {
        Self {
            router: config.router,
            protocol: config.protocol,
            pool_client: PoolStateClient::new(provider, config.factory),
        }
    }

    /// Processa as transações de um bloco na ordem em que aparecem.
    ///
    /// Chamadas que não são swaps do router, com par inexistente ou com
    /// caminho inválido são ignoradas; erros de RPC interrompem o bloco.
    pub async fn handle_block(&self, block: &ObservedBlock) -> Result<Vec<Alert>> {
        let mut calls = Vec::new();
        for tx in &block.transactions {
            if tx.to != Some(self.router) {
                continue;
            }
            let decoded = match decode_swap_call(&tx.input) {
                Some(decoded) => decoded,
                None => continue,
            };

            // reservas da primeira perna do caminho
            let reserves = match self
                .pool_client
                .reserves(decoded.path[0], decoded.path[1])
                .await
            {
                Ok(reserves) => reserves,
                Err(Error::NotFound(reason)) | Err(Error::ValidationError(reason)) => {
                    debug!(
                        "chamada {} ignorada: {}",
                        format_h256(&tx.tx_hash),
                        reason
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            calls.push(SwapCall {
                tx_hash: tx.tx_hash,
                amount_in: decoded.amount_in,
                min_out: decoded.min_out,
                reserves,
            });
        }
        debug!(
            "{} chamada(s) de swap decodificada(s) no bloco {}",
            calls.len(),
            block.number
        );

        let findings = scan_block(&calls);
        if !findings.is_empty() {
            info!(
                "{} tripla(s) viável(is) de sandwich no bloco {}",
                findings.len(),
                block.number
            );
        }
        Ok(findings
            .iter()
            .map(|finding| Alert::from_feasible(finding, self.protocol.clone()))
            .collect())
    }
}
