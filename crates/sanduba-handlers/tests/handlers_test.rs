use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::abi::{encode, AbiParser, Token};
use ethers::types::{Address, Bytes, Log, H256, U256};

use sanduba_core::error::{Error, Result};
use sanduba_core::traits::{AlertNotifier, RpcProvider};
use sanduba_core::types::{DetectionKind, DexProtocol, Severity};
use sanduba_core::utils::{hex_to_address, hex_to_h256};
use sanduba_detector::MatcherConfig;
use sanduba_handlers::alerts::{CONFIRMED_SANDWICH_ALERT_ID, FEASIBLE_SANDWICH_ALERT_ID};
use sanduba_handlers::handlers::{
    BlockProfitHandler, HandlerConfig, ObservedBlock, ObservedCall, ObservedTransaction,
    SwapStreamHandler,
};
use sanduba_handlers::log_semantics::SWAP_TOPIC;
use sanduba_handlers::pool::PoolStateClient;

/// Provedor RPC de teste com respostas enfileiradas
#[derive(Clone, Default)]
struct DummyProvider {
    responses: Arc<Mutex<Vec<Vec<u8>>>>,
    calls: Arc<Mutex<Vec<(Address, Vec<u8>)>>>,
}

impl DummyProvider {
    fn with_responses(responses: Vec<Vec<u8>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn recorded_calls(&self) -> Vec<(Address, Vec<u8>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcProvider for DummyProvider {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push((to, data));
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::RpcError("sem resposta enfileirada".to_string()));
        }
        Ok(responses.remove(0))
    }

    async fn get_block_number(&self) -> Result<u64> {
        Ok(1)
    }
}

/// Notificador de teste que grava os payloads enviados
#[derive(Clone, Default)]
struct RecordingNotifier {
    payloads: Arc<Mutex<Vec<Vec<u8>>>>,
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn notify(&self, alert_data: Vec<u8>) -> Result<()> {
        self.payloads.lock().unwrap().push(alert_data);
        Ok(())
    }

    async fn is_available(&self) -> bool {
        true
    }
}

fn addr(byte: u64) -> Address {
    Address::from_low_u64_be(byte)
}

fn txh(byte: u64) -> H256 {
    H256::from_low_u64_be(byte)
}

fn router() -> Address {
    addr(0x1000)
}

fn factory() -> Address {
    addr(0x2000)
}

fn pair() -> Address {
    addr(0x3000)
}

fn config() -> HandlerConfig {
    HandlerConfig {
        router: router(),
        factory: factory(),
        protocol: DexProtocol::UniswapV2,
        matcher: MatcherConfig::default(),
    }
}

fn swap_log(
    emitter: Address,
    account: Address,
    token_in: Address,
    token_out: Address,
    amount_in: u64,
    amount_out: u64,
) -> Log {
    let data = encode(&[
        Token::Address(account),
        Token::Address(token_in),
        Token::Address(token_out),
        Token::Uint(amount_in.into()),
        Token::Uint(amount_out.into()),
    ]);
    Log {
        address: emitter,
        topics: vec![*SWAP_TOPIC],
        data: Bytes::from(data),
        ..Default::default()
    }
}

fn observed_tx(tx: u64, log: Log) -> ObservedTransaction {
    ObservedTransaction {
        tx_hash: txh(tx),
        logs: vec![log],
    }
}

fn swap_calldata(amount_in: u64, min_out: u64, path: &[Address], recipient: Address) -> Vec<u8> {
    let abi = AbiParser::default()
        .parse_function("swapExactTokensForTokens(uint256,uint256,address[],address,uint256)")
        .unwrap();
    // encode_input já prefixa o seletor de 4 bytes
    abi.encode_input(&[
        Token::Uint(amount_in.into()),
        Token::Uint(min_out.into()),
        Token::Array(path.iter().copied().map(Token::Address).collect()),
        Token::Address(recipient),
        Token::Uint(9999.into()),
    ])
    .unwrap()
}

fn word_address(address: Address) -> Vec<u8> {
    let mut word = vec![0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn reserves_response(reserve0: u64, reserve1: u64) -> Vec<u8> {
    let mut out = vec![0u8; 64];
    U256::from(reserve0).to_big_endian(&mut out[0..32]);
    U256::from(reserve1).to_big_endian(&mut out[32..64]);
    out
}

#[test]
fn default_config_targets_pancake_contracts() {
    let config = HandlerConfig::default();
    assert_eq!(
        Some(config.router),
        hex_to_address("0x10ed43c718714eb63d5aa57b78b54704e256024e")
    );
    assert_eq!(
        Some(config.factory),
        hex_to_address("0xca143ce32fe78f1f7019d7d551a6402fc5350c73")
    );
    assert_eq!(config.protocol, DexProtocol::UniswapV2);
}

#[test]
fn stream_handler_confirms_sandwich() {
    let handler = SwapStreamHandler::new(config());
    let attacker = addr(0x01);
    let victim = addr(0x02);
    let token_x = addr(0xaa);
    let token_y = addr(0xbb);

    let first = handler.handle_transaction(&observed_tx(
        0x11,
        swap_log(router(), attacker, token_x, token_y, 1000, 900),
    ));
    assert!(first.is_empty());

    let second = handler.handle_transaction(&observed_tx(
        0x12,
        swap_log(router(), victim, token_x, token_y, 500, 420),
    ));
    assert!(second.is_empty());

    let third = handler.handle_transaction(&observed_tx(
        0x13,
        swap_log(router(), attacker, token_y, token_x, 900, 1050),
    ));
    assert_eq!(third.len(), 1);

    let alert = &third[0];
    assert_eq!(alert.alert_id, CONFIRMED_SANDWICH_ALERT_ID);
    assert_eq!(alert.kind, DetectionKind::ConfirmedSandwich);
    assert_eq!(alert.severity, Severity::Medium);
    assert_eq!(alert.protocol, DexProtocol::UniswapV2);
    assert_eq!(alert.metadata.get("profit"), Some(&"50".to_string()));
    assert!(alert.metadata.contains_key("front_tx"));
    assert!(alert.metadata.contains_key("victim_tx"));
    assert!(alert.metadata.contains_key("back_tx"));
}

#[test]
fn non_router_logs_are_ignored() {
    let handler = SwapStreamHandler::new(config());
    let other_contract = addr(0x9999);

    let alerts = handler.handle_transaction(&observed_tx(
        0x11,
        swap_log(other_contract, addr(0x01), addr(0xaa), addr(0xbb), 1000, 900),
    ));
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn handle_and_notify_dispatches_payloads() {
    let handler = SwapStreamHandler::new(config());
    let notifier = RecordingNotifier::default();
    let token_x = addr(0xaa);
    let token_y = addr(0xbb);

    let txs = [
        observed_tx(0x11, swap_log(router(), addr(0x01), token_x, token_y, 1000, 900)),
        observed_tx(0x12, swap_log(router(), addr(0x02), token_x, token_y, 500, 420)),
        observed_tx(0x13, swap_log(router(), addr(0x01), token_y, token_x, 900, 1050)),
    ];
    for tx in &txs {
        handler.handle_and_notify(tx, &notifier).await.unwrap();
    }

    let payloads = notifier.payloads.lock().unwrap().clone();
    assert_eq!(payloads.len(), 1);

    let value: serde_json::Value = serde_json::from_slice(&payloads[0]).unwrap();
    assert_eq!(value["alert_id"], CONFIRMED_SANDWICH_ALERT_ID);
    assert_eq!(value["metadata"]["profit"], "50");

    // os hashes das pernas atravessam o payload como hex
    let front_tx = hex_to_h256(value["metadata"]["front_tx"].as_str().unwrap()).unwrap();
    let back_tx = hex_to_h256(value["metadata"]["back_tx"].as_str().unwrap()).unwrap();
    assert_eq!(front_tx, txh(0x11));
    assert_eq!(back_tx, txh(0x13));
}

#[tokio::test]
async fn block_handler_emits_feasible_alert() {
    let provider = DummyProvider::with_responses(vec![
        word_address(pair()),
        reserves_response(10_000, 10_000),
        reserves_response(10_000, 10_000),
        reserves_response(10_000, 10_000),
    ]);
    let handler = BlockProfitHandler::new(provider.clone(), config());

    let token_x = addr(0xaa);
    let token_y = addr(0xbb);
    let path = [token_x, token_y];
    let block = ObservedBlock {
        number: 42,
        transactions: vec![
            ObservedCall {
                tx_hash: txh(0x11),
                to: Some(router()),
                input: swap_calldata(1000, 0, &path, addr(0x01)),
            },
            // transação alheia no meio do bloco não conta para as triplas
            ObservedCall {
                tx_hash: txh(0xff),
                to: Some(addr(0x4000)),
                input: vec![0x01, 0x02, 0x03, 0x04],
            },
            ObservedCall {
                tx_hash: txh(0x12),
                to: Some(router()),
                input: swap_calldata(500, 500, &path, addr(0x02)),
            },
            ObservedCall {
                tx_hash: txh(0x13),
                to: Some(router()),
                input: swap_calldata(826, 0, &path, addr(0x01)),
            },
        ],
    };

    let alerts = handler.handle_block(&block).await.unwrap();
    assert_eq!(alerts.len(), 1);

    let alert = &alerts[0];
    assert_eq!(alert.alert_id, FEASIBLE_SANDWICH_ALERT_ID);
    assert_eq!(alert.kind, DetectionKind::FeasibleSandwich);
    assert_eq!(alert.severity, Severity::High);
    assert_eq!(alert.metadata.get("receivable"), Some(&"826".to_string()));
    assert_eq!(alert.metadata.get("victim_min_out"), Some(&"500".to_string()));

    // factory consultada uma vez, reservas três vezes no par
    let calls = provider.recorded_calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].0, factory());
    assert!(calls[1..].iter().all(|(to, _)| *to == pair()));
}

#[tokio::test]
async fn block_handler_propagates_rpc_errors() {
    let provider = DummyProvider::with_responses(Vec::new());
    let handler = BlockProfitHandler::new(provider, config());

    let block = ObservedBlock {
        number: 7,
        transactions: vec![ObservedCall {
            tx_hash: txh(0x11),
            to: Some(router()),
            input: swap_calldata(1000, 0, &[addr(0xaa), addr(0xbb)], addr(0x01)),
        }],
    };

    assert!(handler.handle_block(&block).await.is_err());
}

#[tokio::test]
async fn block_handler_skips_unregistered_pairs() {
    let provider = DummyProvider::with_responses(vec![word_address(Address::zero())]);
    let handler = BlockProfitHandler::new(provider, config());

    let block = ObservedBlock {
        number: 7,
        transactions: vec![ObservedCall {
            tx_hash: txh(0x11),
            to: Some(router()),
            input: swap_calldata(1000, 0, &[addr(0xaa), addr(0xbb)], addr(0x01)),
        }],
    };

    let alerts = handler.handle_block(&block).await.unwrap();
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn pair_cache_hits_factory_once() {
    let provider = DummyProvider::with_responses(vec![
        word_address(pair()),
        reserves_response(10, 20),
        reserves_response(10, 20),
    ]);
    let client = PoolStateClient::new(provider.clone(), factory());
    let token_x = addr(0xaa);
    let token_y = addr(0xbb);

    let forward = client.reserves(token_x, token_y).await.unwrap();
    assert_eq!(forward.reserve_in, U256::from(10));
    assert_eq!(forward.reserve_out, U256::from(20));

    // direção inversa reaproveita o par em cache e troca as reservas
    let backward = client.reserves(token_y, token_x).await.unwrap();
    assert_eq!(backward.reserve_in, U256::from(20));
    assert_eq!(backward.reserve_out, U256::from(10));

    assert_eq!(provider.recorded_calls().len(), 3);
}

#[tokio::test]
async fn same_tokens_are_rejected() {
    let provider = DummyProvider::default();
    let client = PoolStateClient::new(provider.clone(), factory());

    let err = client.reserves(addr(0xaa), addr(0xaa)).await.unwrap_err();
    assert!(matches!(err, Error::ValidationError(_)));
    assert!(provider.recorded_calls().is_empty());
}

#[tokio::test]
async fn short_reserves_response_is_decode_error() {
    let provider = DummyProvider::with_responses(vec![word_address(pair()), vec![0u8; 32]]);
    let client = PoolStateClient::new(provider, factory());

    let err = client.reserves(addr(0xaa), addr(0xbb)).await.unwrap_err();
    assert!(matches!(err, Error::DecodeError(_)));
}
