//! Ordered fallback across a list of sources.

use std::future::Future;

use crate::error::{Error, Result};

/// The first source that produced a value.
#[derive(Debug)]
pub struct Hit<T> {
    /// 1-based position of the winning source.
    pub ordinal: usize,
    pub url: String,
    pub value: T,
}

/// Try each source in order and return the first success.
///
/// Failures are logged and absorbed until the list is exhausted, at which
/// point the last recorded error is reported inside `AllSourcesFailed`.
pub async fn try_in_order<'a, T, F, Fut>(
    label: &str,
    urls: &'a [String],
    mut attempt: F,
) -> Result<Hit<T>>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error: Option<Error> = None;

    for (index, url) in urls.iter().enumerate() {
        let ordinal = index + 1;
        tracing::info!("Trying {} source #{}: {}", label, ordinal, url);

        match attempt(url.as_str()).await {
            Ok(value) => {
                tracing::info!("{} source #{} succeeded", label, ordinal);
                return Ok(Hit {
                    ordinal,
                    url: url.clone(),
                    value,
                });
            }
            Err(e) => {
                tracing::warn!("{} source #{} failed: {}", label, ordinal, e);
                last_error = Some(e);
            }
        }
    }

    Err(Error::AllSourcesFailed {
        label: label.to_string(),
        attempts: urls.len(),
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no sources configured".to_string()),
    })
}
