//! Inventory and profile import
//!
//! Consumer-side parsing that turns externally exported JSON into the plain
//! values the core applies: `(gift id, quantity)` pairs for inventory
//! exports, and name-to-profile maps for shared profile files.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::data::GiftId;
use crate::profile::Profile;

#[derive(Debug, Deserialize)]
struct ExportContainer {
    #[serde(default)]
    item: Vec<ExportEntry>,
}

#[derive(Debug, Deserialize)]
struct ExportEntry {
    id: GiftId,
    number: u32,
}

/// Parse an inventory export into `(gift id, quantity)` pairs
///
/// The usual shape is a list of containers each holding an `item` array.
/// Anything else that is still valid JSON goes through a lenient walk that
/// collects every object carrying numeric `id` and `number` fields, wherever
/// it is nested. Text that is not JSON at all yields no pairs.
pub fn parse_inventory(text: &str) -> Vec<(GiftId, u32)> {
    if let Ok(containers) = serde_json::from_str::<Vec<ExportContainer>>(text) {
        let pairs: Vec<(GiftId, u32)> = containers
            .into_iter()
            .flat_map(|c| c.item)
            .map(|e| (e.id, e.number))
            .collect();
        if !pairs.is_empty() {
            return pairs;
        }
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            let mut pairs = Vec::new();
            collect_pairs(&value, &mut pairs);
            pairs
        }
        Err(e) => {
            log::warn!("Import text is not valid JSON: {}", e);
            Vec::new()
        }
    }
}

/// Depth-first walk collecting `{id, number}` objects
fn collect_pairs(value: &Value, pairs: &mut Vec<(GiftId, u32)>) {
    match value {
        Value::Object(map) => {
            let id = map.get("id").and_then(Value::as_u64);
            let number = map.get("number").and_then(Value::as_u64);
            if let (Some(id), Some(number)) = (id, number) {
                if let (Ok(id), Ok(number)) = (GiftId::try_from(id), u32::try_from(number)) {
                    pairs.push((id, number));
                    return;
                }
            }
            for nested in map.values() {
                collect_pairs(nested, pairs);
            }
        }
        Value::Array(items) => {
            for nested in items {
                collect_pairs(nested, pairs);
            }
        }
        _ => {}
    }
}

/// Parse a shared profile file into a name-to-profile map
///
/// Accepts both a full store document (its `profiles` map is taken) and a
/// bare name-to-profile object.
pub fn parse_profile_bundle(text: &str) -> Result<BTreeMap<String, Profile>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    let map = match value.get("profiles") {
        Some(profiles) => profiles.clone(),
        None => value,
    };
    serde_json::from_value(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_container_export() {
        let text = r#"[{"item": [{"id": 100001, "number": 5}, {"id": 100015, "number": 2}]}]"#;
        assert_eq!(parse_inventory(text), vec![(100001, 5), (100015, 2)]);
    }

    #[test]
    fn test_parse_bare_entry_list() {
        let text = r#"[{"id": 100001, "number": 5}]"#;
        assert_eq!(parse_inventory(text), vec![(100001, 5)]);
    }

    #[test]
    fn test_lenient_walk_finds_nested_entries() {
        let text = r#"{"payload": {"slots": [{"id": 7, "number": 3, "extra": true},
                        {"junk": 1}, {"inner": {"id": 9, "number": 1}}]}}"#;
        assert_eq!(parse_inventory(text), vec![(7, 3), (9, 1)]);
    }

    #[test]
    fn test_non_json_yields_nothing() {
        assert!(parse_inventory("definitely not json").is_empty());
        assert!(parse_inventory("").is_empty());
    }

    #[test]
    fn test_entries_without_number_are_skipped() {
        let text = r#"[{"id": 100001}, {"number": 4}, {"id": 5, "number": 6}]"#;
        assert_eq!(parse_inventory(text), vec![(5, 6)]);
    }

    #[test]
    fn test_bundle_from_store_document() {
        let text = r#"{"profiles": {"Alice": {"start_level": 3}}, "active": "Alice"}"#;
        let bundle = parse_profile_bundle(text).unwrap();
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle["Alice"].start_level, 3);
    }

    #[test]
    fn test_bundle_from_bare_map() {
        let text = r#"{"Bob": {"is_linked": true}}"#;
        let bundle = parse_profile_bundle(text).unwrap();
        assert!(bundle["Bob"].is_linked);
    }

    #[test]
    fn test_bundle_rejects_non_map() {
        assert!(parse_profile_bundle("[1, 2, 3]").is_err());
        assert!(parse_profile_bundle("not json").is_err());
    }
}
