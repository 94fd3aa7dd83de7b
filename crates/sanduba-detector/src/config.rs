use serde::{Deserialize, Serialize};

/// Configuração do casador de sandwiches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Capacidade do histórico circular de swaps
    pub history_capacity: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { history_capacity: 256 }
    }
}
