use crate::pair_key::PairKey;
use sanduba_core::types::SwapEvent;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Entrada do histórico: o evento e o slot atribuído na inserção
///
/// O slot é a posição no índice circular e serve apenas para comparações
/// relativas de ordem entre entradas vivas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub event: SwapEvent,
    pub slot: usize,
}

/// Histórico circular de swaps recentes com capacidade fixa
///
/// Mantém as duas estruturas que precisam andar juntas: um mapa de
/// `PairKey` para a última entrada viva daquela chave e um arranjo
/// circular de chaves indexado por slot. Inserção e consulta são O(1);
/// a remoção é preguiçosa (o slot só é limpo quando reutilizado) e as
/// entradas órfãs do mapa são recolhidas a cada volta completa do
/// cursor.
pub struct SwapHistory {
    entries: HashMap<PairKey, HistoryEntry>,
    slots: Vec<Option<PairKey>>,
    cursor: usize,
}

impl SwapHistory {
    /// Cria um histórico vazio com a capacidade dada
    pub fn new(capacity: usize) -> Self {
        // capacidade mínima de 1 para manter o cursor válido
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::new(),
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    /// Registra um evento e devolve o slot atribuído
    ///
    /// Uma chave já presente é sobrescrita: vale sempre a observação mais
    /// recente. A chave que ocupava o slot reutilizado é implicitamente
    /// evictada.
    pub fn insert(&mut self, event: SwapEvent) -> usize {
        let key = PairKey::from_event(&event);
        let slot = self.cursor;
        self.slots[slot] = Some(key);
        self.entries.insert(key, HistoryEntry { event, slot });
        self.cursor = (self.cursor + 1) % self.slots.len();
        if self.cursor == 0 {
            self.reclaim();
        }
        slot
    }

    /// Acesso direto ao mapa, incluindo entradas órfãs ainda não recolhidas
    pub fn lookup(&self, key: &PairKey) -> Option<&HistoryEntry> {
        self.entries.get(key)
    }

    /// Consulta apenas entradas vivas: o slot registrado ainda aponta para a chave
    pub fn lookup_live(&self, key: &PairKey) -> Option<&HistoryEntry> {
        let entry = self.entries.get(key)?;
        match self.slots.get(entry.slot) {
            Some(Some(slot_key)) if slot_key == key => Some(entry),
            _ => None,
        }
    }

    /// Remove a entrada do mapa; o slot circular fica stale até ser reutilizado
    pub fn remove(&mut self, key: &PairKey) -> Option<HistoryEntry> {
        self.entries.remove(key)
    }

    /// Recolhe do mapa as entradas cuja chave não está em nenhum slot vivo
    ///
    /// Invocado automaticamente quando o cursor completa uma volta; também
    /// pode ser chamado pelo hospedeiro em momentos de folga.
    pub fn reclaim(&mut self) {
        let live: HashSet<PairKey> = self.slots.iter().filter_map(|slot| *slot).collect();
        self.entries.retain(|key, _| live.contains(key));
    }

    /// Itera as entradas vivas em ordem de slot
    pub fn live_entries(&self) -> impl Iterator<Item = (&PairKey, &HistoryEntry)> {
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            let key = slot.as_ref()?;
            let entry = self.entries.get(key)?;
            if entry.slot == idx {
                Some((key, entry))
            } else {
                None
            }
        })
    }

    /// Quantidade de entradas vivas (nunca excede a capacidade)
    pub fn live_len(&self) -> usize {
        self.live_entries().count()
    }

    /// Quantidade de entradas no mapa, órfãs incluídas
    pub fn tracked_len(&self) -> usize {
        self.entries.len()
    }

    /// Posição atual do cursor de escrita
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Capacidade fixa do índice circular
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
