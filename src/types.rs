//! Domain types and wire DTOs for the PCount API.
//!
//! Wire field names are the upstream's Portuguese identifiers; serde rename
//! attributes keep the Rust side idiomatic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A tenant/customer scope; most resources are namespaced under a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// Operating status of a production line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStatus {
    #[serde(rename = "produzindo")]
    Producing,
    #[serde(rename = "aguardando")]
    Waiting,
    #[serde(rename = "iniciando")]
    Starting,
}

/// A physical production line within a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLine {
    pub id: String,
    pub name: String,
    pub status: LineStatus,
    /// Machine key/tag identifying the line on the factory floor.
    pub code: String,
}

/// A manufacturable product registered under a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
}

/// Product reference carried inside a pallet formation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletProduct {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
}

/// How many units of a product make up one pallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletFormation {
    pub id: String,
    #[serde(rename = "produto")]
    pub product: PalletProduct,
    #[serde(rename = "quantidadePorPalete")]
    pub quantity_per_pallet: u32,
}

/// Status of a production run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionStatus {
    #[serde(rename = "EM PRODUCAO")]
    InProgress,
    #[serde(rename = "FINALIZADA")]
    Finished,
}

impl ProductionStatus {
    /// The upstream wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductionStatus::InProgress => "EM PRODUCAO",
            ProductionStatus::Finished => "FINALIZADA",
        }
    }
}

/// A single production run on a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: String,
    pub line_id: String,
    pub product_code: String,
    pub product_name: String,
    pub technician: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub status: ProductionStatus,
}

/// Fields accepted when creating or updating a production run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionDraft {
    pub line_id: String,
    pub product_code: String,
    pub product_name: String,
    pub technician: String,
    pub start_date: String,
}

/// Query filters for production listings. Serialized into the listing query
/// string, so field values get form-urlencoded on the way out.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Search body for the dashboard statistics endpoint.
///
/// `circuito_ids` must be non-empty: the upstream treats an empty list as "no
/// scope", not "all scope", so callers resolve "all lines" into an explicit
/// enumeration before building this request.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSearch {
    #[serde(rename = "usuarioId")]
    pub usuario_id: String,
    #[serde(rename = "de", skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(rename = "ate", skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(rename = "circuitoIds")]
    pub circuito_ids: Vec<String>,
}

/// A duration as the upstream sends it: absent, a decimal number of hours,
/// or a clock-style `H:MM` string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Hours(f64),
    Clock(String),
}

/// One entry of the hourly production series.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyEntry {
    #[serde(rename = "dataHora")]
    pub data_hora: String,
    #[serde(rename = "valor1", default)]
    pub valor1: f64,
    #[serde(rename = "valor2", default)]
    pub valor2: f64,
}

/// Aggregate production totals over the searched period.
#[derive(Debug, Clone, Deserialize)]
pub struct ProducedTotals {
    #[serde(rename = "maximo", default)]
    pub maximo: f64,
    #[serde(rename = "minimo", default)]
    pub minimo: f64,
    #[serde(rename = "total", default)]
    pub total: f64,
}

/// Raw dashboard payload as returned by the upstream. Any field may be
/// absent or zero; absence triggers client-side derivation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardResponse {
    #[serde(rename = "horaProdutiva", default)]
    pub hora_produtiva: Option<RawDuration>,
    #[serde(rename = "horaOciosa", default)]
    pub hora_ociosa: Option<RawDuration>,
    #[serde(rename = "mediaHora", default)]
    pub media_hora: Option<f64>,
    #[serde(rename = "totalProduzido", default)]
    pub total_produzido: Option<ProducedTotals>,
    #[serde(rename = "totalProduzidoHora", default)]
    pub total_produzido_hora: Vec<HourlyEntry>,
}

/// One bar of the dashboard hourly chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub hour: String,
    pub value: f64,
}

/// Normalized dashboard statistics consumed by the UI. Every field is always
/// present; numeric fields are finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStats {
    /// Total operating hours, formatted to one decimal place.
    pub operation_hours: String,
    /// Productive hours as a clock-style display string (`H:MM`).
    pub productive_hours: String,
    /// Average units per hour, rounded to the nearest integer.
    pub avg_production: f64,
    /// Total units produced over the period.
    pub total_produced: f64,
    /// Ordered hourly series. Empty means "no data", never an error.
    pub hourly_production: Vec<HourlyPoint>,
}

/// What a domain service does when the upstream call fails.
///
/// Degrading to fixture data is always a caller decision; the gateway itself
/// never substitutes data on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Propagate the failure to the caller.
    #[default]
    Strict,
    /// Serve fixture data instead of failing.
    FixtureOnError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_response_tolerates_missing_fields() {
        let raw: DashboardResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.hora_produtiva.is_none());
        assert!(raw.media_hora.is_none());
        assert!(raw.total_produzido_hora.is_empty());
    }

    #[test]
    fn raw_duration_accepts_numbers_and_clock_strings() {
        let raw: DashboardResponse = serde_json::from_str(
            r#"{"horaProdutiva": "2:30", "horaOciosa": 1.5}"#,
        )
        .unwrap();
        assert!(matches!(raw.hora_produtiva, Some(RawDuration::Clock(ref s)) if s == "2:30"));
        assert!(matches!(raw.hora_ociosa, Some(RawDuration::Hours(h)) if h == 1.5));
    }

    #[test]
    fn dashboard_search_serializes_upstream_field_names() {
        let search = DashboardSearch {
            usuario_id: "u1".into(),
            from: None,
            to: None,
            circuito_ids: vec!["c1".into(), "c2".into()],
        };
        let json = serde_json::to_value(&search).unwrap();
        assert_eq!(json["usuarioId"], "u1");
        assert_eq!(json["circuitoIds"][1], "c2");
        assert!(json.get("de").is_none());
    }

    #[test]
    fn production_status_uses_upstream_labels() {
        let json = serde_json::to_string(&ProductionStatus::InProgress).unwrap();
        assert_eq!(json, r#""EM PRODUCAO""#);
        let status: ProductionStatus = serde_json::from_str(r#""FINALIZADA""#).unwrap();
        assert_eq!(status, ProductionStatus::Finished);
    }

    #[test]
    fn hora_produtiva_explicit_null_parses_as_absent() {
        let raw: DashboardResponse =
            serde_json::from_str(r#"{"horaProdutiva": null, "horaOciosa": null}"#).unwrap();
        assert!(raw.hora_produtiva.is_none());
        assert!(raw.hora_ociosa.is_none());
    }
}
