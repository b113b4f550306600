//! Directive suppression.

use crate::patch::{PatchRules, Patched};

/// Comment out every uncommented line that contains the directive marker.
///
/// The comment prefix is `<token> ` placed before the original line, leading
/// whitespace included. Line terminators are kept as they were, including a
/// missing one on the last line. Running the pass twice changes nothing more.
pub fn comment_directives(data: &[u8], rules: &PatchRules) -> Patched {
    let marker = rules.directive_marker.as_bytes();
    let token = rules.comment_token.as_bytes();
    if marker.is_empty() {
        return Patched::unchanged(data);
    }

    let mut out = Vec::with_capacity(data.len() + 64);
    let mut changes = 0;

    for line in data.split_inclusive(|&b| b == b'\n') {
        let trimmed = line.trim_ascii();
        if contains(trimmed, marker) && !trimmed.starts_with(token) {
            tracing::debug!("Commented: {}", String::from_utf8_lossy(trimmed));
            out.extend_from_slice(token);
            out.push(b' ');
            changes += 1;
        }
        out.extend_from_slice(line);
    }

    if changes > 0 {
        tracing::info!("Commented out {} directive line(s)", changes);
    }

    Patched { data: out, changes }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
