//! Supplementary identifier discovery from a metadata entry.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::api::AppEntry;

/// Free-text list field found under `common` and `extended`.
const LIST_FIELD: &str = "listofdlc";

/// Mapping under `depots` whose keys are identifiers.
const DEPOTS_DLC_FIELD: &str = "dlc";

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("static pattern"))
}

/// Every supplementary identifier named by `entry`, deduplicated and sorted
/// ascending by numeric value.
pub fn discover_dlc(entry: &AppEntry) -> Vec<String> {
    let mut ids = BTreeSet::new();

    for section in [&entry.common, &entry.extended] {
        if let Some(Value::String(list)) = section.get(LIST_FIELD) {
            ids.extend(digit_runs().find_iter(list).filter_map(|m| parse_id(m.as_str())));
        }
    }

    if let Some(listing) = entry.depots.listing() {
        match listing.get(DEPOTS_DLC_FIELD) {
            Some(Value::Object(map)) => ids.extend(numeric_keys(map)),
            Some(other) => tracing::debug!("Ignoring depots.dlc of unexpected shape: {}", other),
            None => {}
        }
    }

    ids.extend(numeric_keys(&entry.dlc));

    ids.into_iter().map(|id| id.to_string()).collect()
}

fn numeric_keys(map: &Map<String, Value>) -> impl Iterator<Item = u64> + '_ {
    map.keys().filter_map(|key| parse_id(key))
}

fn parse_id(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> AppEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_unions_all_four_sources_sorted_numerically() {
        let app = entry(
            r#"{
                "common": {"listofdlc": "300,20"},
                "extended": {"listofdlc": "20, 1000 ;5"},
                "depots": {"dlc": {"77": {}}, "441": {}},
                "dlc": {"9": {}, "300": {}}
            }"#,
        );
        assert_eq!(discover_dlc(&app), ["5", "9", "20", "77", "300", "1000"]);
    }

    #[test]
    fn test_nothing_listed() {
        assert!(discover_dlc(&entry("{}")).is_empty());
        assert!(discover_dlc(&entry(r#"{"common": {"name": "x"}}"#)).is_empty());
    }

    #[test]
    fn test_odd_shapes_are_ignored() {
        let app = entry(
            r#"{
                "common": {"listofdlc": 12},
                "depots": {"dlc": "oops"},
                "dlc": {"abc": {}, "42": {}}
            }"#,
        );
        assert_eq!(discover_dlc(&app), ["42"]);
    }

    #[test]
    fn test_string_depots_contribute_nothing() {
        let app = entry(r#"{"depots": "shared", "common": {"listofdlc": "8"}}"#);
        assert_eq!(discover_dlc(&app), ["8"]);
    }
}
