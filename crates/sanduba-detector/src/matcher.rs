use crate::config::MatcherConfig;
use crate::findings::SandwichFinding;
use crate::history::SwapHistory;
use crate::pair_key::PairKey;
use ethereum_types::U256;
use ethers::types::I256;
use sanduba_core::types::SwapEvent;

/// Casador de sandwiches sobre um stream de eventos de swap
///
/// Cada evento observado é tratado como candidato a perna de fecho
/// (back). O front é procurado no histórico pela mesma chave de par e a
/// vítima entre as entradas vivas, dentro das janelas de ordenação
/// aceitas. Um casamento consome as duas pernas guardadas; o fecho não é
/// reinserido. Sem casamento, o evento vira uma nova entrada viva e pode
/// ser o front de um sandwich futuro.
pub struct SandwichMatcher {
    history: SwapHistory,
}

impl SandwichMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            history: SwapHistory::new(config.history_capacity),
        }
    }

    /// Acesso de leitura ao histórico subjacente
    pub fn history(&self) -> &SwapHistory {
        &self.history
    }

    /// Processa um evento e devolve o achado quando ele fecha um sandwich
    pub fn observe(&mut self, event: SwapEvent) -> Option<SandwichFinding> {
        let key = PairKey::from_event(&event);
        // slot que o evento ocuparia se fosse inserido agora
        let back_slot = self.history.cursor();

        if let Some(finding) = self.try_close(&key, &event, back_slot) {
            let victim_key = PairKey::new(
                finding.victim_address,
                finding.victim_token_in,
                finding.victim_token_out,
            );
            self.history.remove(&key);
            self.history.remove(&victim_key);
            return Some(finding);
        }

        self.history.insert(event);
        None
    }

    fn try_close(&self, key: &PairKey, back: &SwapEvent, back_slot: usize) -> Option<SandwichFinding> {
        // acesso direto ao mapa: um front órfão ainda casa até ser recolhido
        let front_entry = self.history.lookup(key)?;
        let front = &front_entry.event;
        if !front.inverts(back) {
            return None;
        }
        let front_slot = front_entry.slot;

        let mut victim: Option<&SwapEvent> = None;
        for (candidate_key, candidate) in self.history.live_entries() {
            if candidate_key == key {
                continue;
            }
            if !candidate.event.same_direction(front) {
                continue;
            }
            if Self::within_window(candidate.slot, front_slot, back_slot) {
                victim = Some(&candidate.event);
            }
        }
        let victim = victim?;

        Some(SandwichFinding {
            pair: *key,
            front_tx_hash: front.tx_hash,
            victim_tx_hash: victim.tx_hash,
            back_tx_hash: back.tx_hash,
            victim_address: victim.account,
            victim_token_in: victim.token_in,
            victim_token_out: victim.token_out,
            victim_amount_in: victim.amount_in,
            victim_amount_out: victim.amount_out,
            frontrunner_address: back.account,
            frontrunner_profit: signed_delta(back.amount_out, front.amount_in),
        })
    }

    /// Janelas de ordenação aceitas entre os slots da vítima (v), do front
    /// (f) e do fecho (b): estritamente entre os dois, antes de ambos ou
    /// depois de ambos, cobrindo o caso em que o índice circular deu a
    /// volta entre o front e o fecho
    fn within_window(v: usize, f: usize, b: usize) -> bool {
        (v > f && v < b && b > f) || (v < f && v < b && b < f) || (v > f && v > b && b < f)
    }
}

/// Diferença `a − b` com sinal, saturando nos extremos de I256
fn signed_delta(a: U256, b: U256) -> I256 {
    if a >= b {
        I256::try_from(a - b).unwrap_or(I256::MAX)
    } else {
        I256::try_from(b - a).map(|v| -v).unwrap_or(I256::MIN)
    }
}
