//! API response type definitions.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Metadata API response wrapper, keyed by identifier.
#[derive(Debug, Default, Deserialize)]
pub struct AppInfoResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: HashMap<String, AppEntry>,
}

/// Metadata for one application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub common: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extended: Map<String, Value>,
    #[serde(default)]
    pub depots: PackageSet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dlc: Map<String, Value>,
}

/// The `depots` field, whose shape varies between entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PackageSet {
    /// Missing, null, or of an unexpected type.
    #[default]
    Absent,
    /// A bare string in place of a mapping.
    Flag(String),
    /// The usual mapping of package id to package details.
    Listing(Map<String, Value>),
}

impl PackageSet {
    /// Whether the entry ships any packages of its own.
    pub fn has_packages(&self) -> bool {
        match self {
            PackageSet::Absent => false,
            PackageSet::Flag(value) => !value.is_empty(),
            PackageSet::Listing(map) => !map.is_empty(),
        }
    }

    /// The mapping form, if that is what was sent.
    pub fn listing(&self) -> Option<&Map<String, Value>> {
        match self {
            PackageSet::Listing(map) => Some(map),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for PackageSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => PackageSet::Listing(map),
            Value::String(value) => PackageSet::Flag(value),
            Value::Null => PackageSet::Absent,
            other => {
                tracing::debug!("Ignoring depots field of unexpected shape: {}", other);
                PackageSet::Absent
            }
        })
    }
}

/// Search API response.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub games: Vec<AppSummary>,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSummary {
    pub appid: u64,
    pub name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> AppEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_package_set_shapes() {
        assert_eq!(entry("{}").depots, PackageSet::Absent);
        assert_eq!(entry(r#"{"depots": null}"#).depots, PackageSet::Absent);
        assert_eq!(entry(r#"{"depots": 5}"#).depots, PackageSet::Absent);
        assert_eq!(
            entry(r#"{"depots": "shared"}"#).depots,
            PackageSet::Flag("shared".to_string())
        );
        assert!(matches!(
            entry(r#"{"depots": {"441": {}}}"#).depots,
            PackageSet::Listing(_)
        ));
    }

    #[test]
    fn test_has_packages() {
        assert!(!entry("{}").depots.has_packages());
        assert!(!entry(r#"{"depots": {}}"#).depots.has_packages());
        assert!(!entry(r#"{"depots": ""}"#).depots.has_packages());
        assert!(entry(r#"{"depots": "x"}"#).depots.has_packages());
        assert!(entry(r#"{"depots": {"branches": {}}}"#).depots.has_packages());
    }

    #[test]
    fn test_null_sections_become_empty() {
        let parsed = entry(r#"{"common": null, "extended": null, "dlc": null}"#);
        assert!(parsed.common.is_empty());
        assert!(parsed.extended.is_empty());
        assert!(parsed.dlc.is_empty());
    }

    #[test]
    fn test_app_info_response() {
        let response: AppInfoResponse = serde_json::from_str(
            r#"{"data": {"440": {"common": {"name": "Team Fortress 2"}, "depots": {"441": {}}}}, "status": "success"}"#,
        )
        .unwrap();
        let app = &response.data["440"];
        assert_eq!(app.common["name"], "Team Fortress 2");
        assert!(app.depots.has_packages());
    }

    #[test]
    fn test_search_response() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"games": [{"appid": 570, "name": "Dota 2"}]}"#).unwrap();
        assert_eq!(
            response.games,
            vec![AppSummary {
                appid: 570,
                name: "Dota 2".to_string()
            }]
        );

        let empty: SearchResponse = serde_json::from_str(r#"{"games": null}"#).unwrap();
        assert!(empty.games.is_empty());
    }
}
