/*!
 * Sanduba Detector
 *
 * Núcleo de detecção de ataques sandwich: histórico circular de swaps
 * com capacidade fixa, casamento front/vítima/back em stream e oráculo
 * de lucratividade sobre as chamadas de swap de um bloco.
 */

mod pair_key;
mod history;
mod matcher;
mod oracle;
mod findings;
mod config;

pub use pair_key::*;
pub use history::*;
pub use matcher::*;
pub use oracle::*;
pub use findings::*;
pub use config::*;
