//! Source templates and the endpoint registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SourcesConfig;

/// Placeholder substituted with the target identifier.
pub const ID_PLACEHOLDER: &str = "{id}";

/// A URI template whose `{id}` slots are filled with the target identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTemplate(String);

impl SourceTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitute the identifier into every placeholder slot.
    pub fn render(&self, id: &str) -> String {
        self.0.replace(ID_PLACEHOLDER, id)
    }

    /// Number of placeholder slots in the template.
    pub fn slots(&self) -> usize {
        self.0.matches(ID_PLACEHOLDER).count()
    }
}

impl fmt::Display for SourceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every endpoint the pipeline talks to, in the order they are tried.
///
/// Built once at startup and shared by reference; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    /// Primary mirrors, tried in order.
    pub primary: Vec<SourceTemplate>,
    /// Archive-hosted fallback used once every primary mirror failed.
    pub archive: Option<SourceTemplate>,
    /// Key-map documents, tried in order.
    pub key_maps: Vec<String>,
    /// Metadata API endpoint.
    pub metadata: SourceTemplate,
    /// Search API endpoint (query string appended at request time).
    pub search: String,
}

impl SourceRegistry {
    /// Primary mirror URIs rendered for an identifier, in registration order.
    pub fn primary_urls(&self, id: &str) -> Vec<String> {
        self.primary.iter().map(|t| t.render(id)).collect()
    }

    /// Archive URI rendered for an identifier, if an archive source exists.
    pub fn archive_url(&self, id: &str) -> Option<String> {
        self.archive.as_ref().map(|t| t.render(id))
    }
}

impl From<&SourcesConfig> for SourceRegistry {
    fn from(config: &SourcesConfig) -> Self {
        Self {
            primary: config.primary.iter().cloned().map(SourceTemplate::new).collect(),
            archive: config.archive.clone().map(SourceTemplate::new),
            key_maps: config.key_maps.clone(),
            metadata: SourceTemplate::new(config.metadata.clone()),
            search: config.search.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_every_slot() {
        let template = SourceTemplate::new("https://mirror.test/{id}/{id}.lua");
        assert_eq!(template.slots(), 2);
        assert_eq!(template.render("440"), "https://mirror.test/440/440.lua");
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = SourceRegistry {
            primary: vec![
                SourceTemplate::new("https://a.test/{id}.lua"),
                SourceTemplate::new("https://b.test/{id}.lua"),
            ],
            archive: Some(SourceTemplate::new("https://c.test/{id}.zip")),
            ..Default::default()
        };

        assert_eq!(
            registry.primary_urls("7"),
            vec!["https://a.test/7.lua", "https://b.test/7.lua"]
        );
        assert_eq!(registry.archive_url("7").as_deref(), Some("https://c.test/7.zip"));
    }
}
