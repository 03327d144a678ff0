// record.rs — RosterRecord: one beneficiary entry from the padrón.
//
// Field names are serde-renamed to the roster's Spanish column headers so the
// JSONL files exported from the operational spreadsheet deserialize without a
// translation step. Columns we don't model explicitly are preserved in
// `extras` and carried through to the notification history unchanged.

use serde::{Deserialize, Serialize};

/// One beneficiary row from the roster dataset.
///
/// The roster is the read-only source of truth for a run: records are loaded
/// once and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    /// Supply identifier ("Nº SUMINISTRO"). Missing values render as "S/D".
    #[serde(rename = "Nº SUMINISTRO", default, skip_serializing_if = "Option::is_none")]
    pub supply_id: Option<String>,

    /// Beneficiary name. Missing values render as "Usuario".
    #[serde(
        rename = "NOMBRE ELECTRODEPENDIENTE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Raw free-form contact field — may hold several numbers, labels,
    /// punctuation. Missing values become the empty string.
    #[serde(rename = "Contacto", default)]
    pub contact: String,

    /// Validity status text ("VIGENTE", "VENCIDA", …). A missing status is
    /// never treated as expired.
    #[serde(rename = "VIGENCIA", default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<String>,

    /// Any further roster columns, preserved verbatim.
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl RosterRecord {
    /// Whether this record's validity text marks it as expired.
    ///
    /// Case-normalized substring match: "vencida", "DI VENCIDA 2023", etc.
    /// all qualify. A missing validity field does not.
    pub fn is_expired(&self) -> bool {
        self.validity
            .as_deref()
            .is_some_and(|v| v.to_uppercase().contains("VENCIDA"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(validity: Option<&str>) -> RosterRecord {
        RosterRecord {
            supply_id: Some("123456".to_string()),
            name: Some("Juan Pérez".to_string()),
            contact: "261-1234567".to_string(),
            validity: validity.map(|v| v.to_string()),
            extras: serde_json::Map::new(),
        }
    }

    #[test]
    fn expired_matches_substring_case_insensitively() {
        assert!(record(Some("VENCIDA")).is_expired());
        assert!(record(Some("vencida")).is_expired());
        assert!(record(Some("DI Vencida 2023")).is_expired());
    }

    #[test]
    fn vigente_is_not_expired() {
        assert!(!record(Some("VIGENTE")).is_expired());
    }

    #[test]
    fn missing_validity_is_not_expired() {
        assert!(!record(None).is_expired());
    }

    #[test]
    fn deserializes_from_spanish_column_names() {
        let json = r#"{
            "Nº SUMINISTRO": "400123",
            "NOMBRE ELECTRODEPENDIENTE": "María López",
            "Contacto": "Tel: 261-123-4567",
            "VIGENCIA": "VENCIDA",
            "DEPARTAMENTO": "Godoy Cruz"
        }"#;
        let rec: RosterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.supply_id.as_deref(), Some("400123"));
        assert_eq!(rec.name.as_deref(), Some("María López"));
        assert_eq!(rec.contact, "Tel: 261-123-4567");
        assert!(rec.is_expired());
        // Unmodeled columns survive in extras.
        assert_eq!(
            rec.extras.get("DEPARTAMENTO").and_then(|v| v.as_str()),
            Some("Godoy Cruz")
        );
    }

    #[test]
    fn missing_contact_defaults_to_empty() {
        let rec: RosterRecord =
            serde_json::from_str(r#"{"Nº SUMINISTRO": "1", "VIGENCIA": "VENCIDA"}"#).unwrap();
        assert_eq!(rec.contact, "");
        assert!(rec.name.is_none());
    }

    #[test]
    fn extras_round_trip_through_serialization() {
        let mut rec = record(Some("VENCIDA"));
        rec.extras.insert(
            "DEPARTAMENTO".to_string(),
            serde_json::Value::String("Maipú".to_string()),
        );
        let json = serde_json::to_string(&rec).unwrap();
        let restored: RosterRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, rec);
    }
}
