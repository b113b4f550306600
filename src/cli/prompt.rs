//! Line-oriented terminal prompting.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::error::{Error, Result};

/// Reads one trimmed answer per question.
pub struct Prompt<R> {
    lines: Lines<R>,
}

impl Prompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `question` and read the answer. `None` at end of input.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        print!("{} ", question);
        std::io::stdout().flush()?;

        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}

/// Parse a 1-based selection number; range checks happen at the list.
pub fn parse_selection(input: &str) -> Result<usize> {
    input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a selection number", input.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_are_trimmed_until_eof() {
        let mut prompt = Prompt::new(&b"  440 \r\nhalf life\n"[..]);
        assert_eq!(prompt.ask(">").await.unwrap().as_deref(), Some("440"));
        assert_eq!(prompt.ask(">").await.unwrap().as_deref(), Some("half life"));
        assert_eq!(prompt.ask(">").await.unwrap(), None);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection(" 3 ").unwrap(), 3);
        assert!(matches!(parse_selection("two"), Err(Error::InvalidInput(_))));
        assert!(parse_selection("-1").is_err());
        assert!(parse_selection("").is_err());
    }
}
