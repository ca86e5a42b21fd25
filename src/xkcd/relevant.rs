//! Parsing of the relevant-xkcd plain-text response
//!
//! The service answers with newline-delimited text: two header lines, one
//! `<num> <url>` line per candidate and one trailing line.

use super::XkcdError;
use lazy_regex::regex;

/// Number of framing lines at the start of a relevance response
const HEADER_LINES: usize = 2;

/// Split a raw relevance response into candidate lines.
///
/// Lines are separated by runs of `\r`/`\n`; the first two and the last line
/// are framing and dropped.
#[must_use]
pub fn parse_relevant_response(body: &str) -> Vec<String> {
    let lines: Vec<&str> = regex!(r"[\r\n]+").split(body).collect();
    let end = lines.len().saturating_sub(1);
    lines
        .get(HEADER_LINES..end)
        .unwrap_or_default()
        .iter()
        .map(|line| (*line).to_string())
        .collect()
}

/// One parsed relevance candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantHit {
    /// Comic number, as returned by the service
    pub num: String,
    /// Site-relative URL of the comic's explanation image
    pub url: String,
}

impl RelevantHit {
    /// Parse a `<num> <url>` line.
    ///
    /// # Errors
    ///
    /// Returns `XkcdError::MalformedLine` if the line has no space.
    pub fn parse(line: &str) -> Result<Self, XkcdError> {
        let (num, rest) = line
            .split_once(' ')
            .ok_or_else(|| XkcdError::MalformedLine(line.to_string()))?;
        let url = rest.split(' ').next().unwrap_or_default();
        Ok(Self {
            num: num.to_string(),
            url: url.to_string(),
        })
    }
}

/// Extract the comic number from the first whitespace-separated token of a line.
#[must_use]
pub fn leading_number(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or_default()
}
