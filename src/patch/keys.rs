//! Key injection into the registration call.

use regex::bytes::{NoExpand, Regex};

use crate::error::{Error, Result};
use crate::fetch::KeyMap;
use crate::patch::{PatchRules, Patched};

/// Replace every bare `<call>(<id>)` with `<call>(<id>,<flag>,"<key>")`.
///
/// Whitespace inside the parentheses is tolerated. Without a key for `id`, or
/// without a matching call, the output equals the input.
pub fn inject_key(id: &str, data: &[u8], keys: &KeyMap, rules: &PatchRules) -> Result<Patched> {
    let Some(key) = keys.get(id) else {
        tracing::info!("No key for {}", id);
        return Ok(Patched::unchanged(data));
    };

    let pattern = registration_pattern(&rules.register_call, id)?;
    let changes = pattern.find_iter(data).count();
    if changes == 0 {
        tracing::info!("No {}({}) call to patch", rules.register_call, id);
        return Ok(Patched::unchanged(data));
    }

    let replacement = format!("{}({},{},\"{}\")", rules.register_call, id, rules.key_flag, key);
    tracing::debug!("Replacing {} match(es) with {}", changes, replacement);

    let data = pattern
        .replace_all(data, NoExpand(replacement.as_bytes()))
        .into_owned();
    tracing::info!("Injected key for {}", id);

    Ok(Patched { data, changes })
}

fn registration_pattern(call: &str, id: &str) -> Result<Regex> {
    let pattern = format!(r"{}\s*\(\s*{}\s*\)", regex::escape(call), regex::escape(id));
    tracing::debug!("Key injection pattern: {}", pattern);
    Regex::new(&pattern)
        .map_err(|e| Error::Config(format!("Invalid registration pattern: {}", e)))
}
