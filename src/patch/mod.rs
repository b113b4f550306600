//! Script rewriting.
//!
//! Two independent passes over the retrieved payload:
//! - Directive suppression: comment out lines carrying the directive marker
//! - Key injection: rewrite the registration call for the target with its key
//!
//! Both take the payload by reference and return a new buffer.

pub mod directives;
pub mod keys;

use crate::config::PatchConfig;

pub use directives::comment_directives;
pub use keys::inject_key;

/// Literals the patch passes look for and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRules {
    /// Substring that marks a directive line.
    pub directive_marker: String,
    /// Line comment token of the script language.
    pub comment_token: String,
    /// Name of the registration call.
    pub register_call: String,
    /// Literal flag written between the identifier and the key.
    pub key_flag: String,
}

impl Default for PatchRules {
    fn default() -> Self {
        Self::from(&PatchConfig::default())
    }
}

impl From<&PatchConfig> for PatchRules {
    fn from(config: &PatchConfig) -> Self {
        Self {
            directive_marker: config.directive_marker.clone(),
            comment_token: config.comment_token.clone(),
            register_call: config.register_call.clone(),
            key_flag: config.key_flag.clone(),
        }
    }
}

/// A rewritten payload and how many places changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub data: Vec<u8>,
    pub changes: usize,
}

impl Patched {
    fn unchanged(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            changes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = PatchRules::default();
        assert_eq!(rules.directive_marker, "setManifest");
        assert_eq!(rules.comment_token, "--");
        assert_eq!(rules.register_call, "addappid");
        assert_eq!(rules.key_flag, "1");
    }

    #[test]
    fn test_rules_follow_config() {
        let config = PatchConfig {
            comment_token: "#".to_string(),
            ..Default::default()
        };
        let rules = PatchRules::from(&config);
        assert_eq!(rules.comment_token, "#");
        assert_eq!(rules.register_call, "addappid");
    }
}
