/*!
Semântica dos logs de swap.

Routers no estilo vault emitem um evento `Swap` com todos os campos no
`data` (nenhum parâmetro indexado). Este módulo mantém o mapa de eventos
reconhecidos, indexado pelo topic0, e normaliza cada log decodificado em
um [`SwapEvent`] do núcleo.
*/

use std::collections::HashMap;

use ethers::abi::{AbiParser, Event, EventExt, RawLog};
use ethers::types::{Log, H256};
use ethers::utils::keccak256;
use once_cell::sync::Lazy;

use sanduba_core::types::{SwapEvent, TransactionHash};

/// Topic0 do evento `Swap` reconhecido pelos handlers
pub static SWAP_TOPIC: Lazy<H256> = Lazy::new(|| {
    H256::from_slice(keccak256("Swap(address,address,address,uint256,uint256)").as_slice())
});

fn build_event_map() -> HashMap<H256, Event> {
    let mut map = HashMap::new();
    let mut parser = AbiParser::default();

    let declarations = [
        "event Swap(address account, address tokenIn, address tokenOut, uint256 amountIn, uint256 amountOut)",
    ];
    for declaration in declarations {
        if let Ok(event) = parser.parse_event(declaration) {
            let topic = H256::from_slice(keccak256(event.abi_signature()).as_slice());
            map.insert(topic, event);
        }
    }
    map
}

static EVENT_MAP: Lazy<HashMap<H256, Event>> = Lazy::new(build_event_map);

/// Decodifica os logs de uma transação em eventos de swap normalizados.
///
/// Logs com topic0 desconhecido ou com `data` que não bate com a
/// assinatura são ignorados. A ordem dos eventos segue a ordem dos logs.
pub fn decode_swap_logs(tx_hash: TransactionHash, logs: &[Log]) -> Vec<SwapEvent> {
    logs.iter()
        .filter_map(|log| decode_swap_log(tx_hash, log))
        .collect()
}

fn decode_swap_log(tx_hash: TransactionHash, log: &Log) -> Option<SwapEvent> {
    let topic0 = log.topics.first()?;
    let event = EVENT_MAP.get(topic0)?;

    let raw = RawLog {
        topics: log.topics.clone(),
        data: log.data.to_vec(),
    };
    let decoded = event.parse_log(raw).ok()?;
    let mut params = decoded.params.into_iter();

    let account = params.next()?.value.into_address()?;
    let token_in = params.next()?.value.into_address()?;
    let token_out = params.next()?.value.into_address()?;
    let amount_in = params.next()?.value.into_uint()?;
    let amount_out = params.next()?.value.into_uint()?;

    Some(SwapEvent {
        tx_hash,
        account,
        token_in,
        token_out,
        amount_in,
        amount_out,
    })
}
