/*!
Montagem e despacho de alertas.

Converte os achados do detector no esquema de alerta do runtime
hospedeiro: identificador estável, severidade, protocolo e metadados em
texto. O despacho serializa o alerta em JSON e o entrega ao
[`AlertNotifier`] configurado.
*/

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sanduba_core::error::{Error, Result};
use sanduba_core::traits::AlertNotifier;
use sanduba_core::types::{DetectionKind, DexProtocol, Severity};
use sanduba_core::utils::{format_address, format_h256, format_u256};
use sanduba_detector::{FeasibleSandwich, SandwichFinding};

/// Identificador dos alertas de sandwich confirmado
pub const CONFIRMED_SANDWICH_ALERT_ID: &str = "SANDUBA-01";
/// Identificador dos alertas de sandwich viável
pub const FEASIBLE_SANDWICH_ALERT_ID: &str = "SANDUBA-02";

/// Alerta pronto para publicação pelo runtime hospedeiro
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub name: String,
    pub description: String,
    pub alert_id: String,
    pub severity: Severity,
    pub kind: DetectionKind,
    pub protocol: DexProtocol,
    pub metadata: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Monta o alerta de um sandwich confirmado pelo casador de stream
    pub fn from_finding(finding: &SandwichFinding, protocol: DexProtocol) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("pair".to_string(), format_h256(&finding.pair.digest()));
        metadata.insert("front_tx".to_string(), format_h256(&finding.front_tx_hash));
        metadata.insert(
            "victim_tx".to_string(),
            format_h256(&finding.victim_tx_hash),
        );
        metadata.insert("back_tx".to_string(), format_h256(&finding.back_tx_hash));
        metadata.insert(
            "victim".to_string(),
            format_address(&finding.victim_address),
        );
        metadata.insert(
            "victim_token_in".to_string(),
            format_address(&finding.victim_token_in),
        );
        metadata.insert(
            "victim_token_out".to_string(),
            format_address(&finding.victim_token_out),
        );
        metadata.insert(
            "victim_amount_in".to_string(),
            format_u256(&finding.victim_amount_in),
        );
        metadata.insert(
            "victim_amount_out".to_string(),
            format_u256(&finding.victim_amount_out),
        );
        metadata.insert(
            "frontrunner".to_string(),
            format_address(&finding.frontrunner_address),
        );
        metadata.insert(
            "profit".to_string(),
            finding.frontrunner_profit.to_string(),
        );

        Alert {
            name: "Sandwich confirmado".to_string(),
            description: format!(
                "Conta {} fechou um sandwich sobre a vítima {}",
                format_address(&finding.frontrunner_address),
                format_address(&finding.victim_address)
            ),
            alert_id: CONFIRMED_SANDWICH_ALERT_ID.to_string(),
            severity: Severity::Medium,
            kind: DetectionKind::ConfirmedSandwich,
            protocol,
            metadata,
            timestamp: Utc::now(),
        }
    }

    /// Monta o alerta de uma tripla viável apontada pelo oráculo de bloco
    pub fn from_feasible(finding: &FeasibleSandwich, protocol: DexProtocol) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("front_tx".to_string(), format_h256(&finding.front_tx_hash));
        metadata.insert(
            "victim_tx".to_string(),
            format_h256(&finding.victim_tx_hash),
        );
        metadata.insert("back_tx".to_string(), format_h256(&finding.back_tx_hash));
        metadata.insert(
            "reserve_in".to_string(),
            format_u256(&finding.reserves.reserve_in),
        );
        metadata.insert(
            "reserve_out".to_string(),
            format_u256(&finding.reserves.reserve_out),
        );
        metadata.insert(
            "frontrun_amount_in".to_string(),
            format_u256(&finding.frontrun_amount_in),
        );
        metadata.insert(
            "victim_amount_in".to_string(),
            format_u256(&finding.victim_amount_in),
        );
        metadata.insert(
            "victim_min_out".to_string(),
            format_u256(&finding.victim_min_out),
        );
        metadata.insert("receivable".to_string(), format_u256(&finding.receivable));

        Alert {
            name: "Sandwich viável".to_string(),
            description: format!(
                "Tripla de swaps com reservas idênticas deixaria a vítima receber {} (mínimo {})",
                format_u256(&finding.receivable),
                format_u256(&finding.victim_min_out)
            ),
            alert_id: FEASIBLE_SANDWICH_ALERT_ID.to_string(),
            severity: Severity::High,
            kind: DetectionKind::FeasibleSandwich,
            protocol,
            metadata,
            timestamp: Utc::now(),
        }
    }
}

/// Serializa o alerta em JSON e o envia pelo notificador
pub async fn dispatch_alert<N>(notifier: &N, alert: &Alert) -> Result<()>
where
    N: AlertNotifier + ?Sized,
{
    let payload = serde_json::to_vec(alert).map_err(|e| Error::EncodeError(e.to_string()))?;
    notifier.notify(payload).await
}
