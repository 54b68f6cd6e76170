//! Narrative commentary sources.
//!
//! Narrative text is produced outside this crate (by hand or by a language
//! model service) and is treated as opaque. The report only splits it into
//! paragraphs.

use crate::error::Result;

/// Something that turns a performance summary into commentary.
pub trait NarrativeSource {
    fn compose(&self, summary: &str) -> Result<String>;
}

/// Already-written commentary, returned as-is for any summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticNarrative(String);

impl StaticNarrative {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl NarrativeSource for StaticNarrative {
    fn compose(&self, _summary: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

impl<F> NarrativeSource for F
where
    F: Fn(&str) -> Result<String>,
{
    fn compose(&self, summary: &str) -> Result<String> {
        self(summary)
    }
}

/// Split text into paragraphs at blank lines.
///
/// Lines within a paragraph are trimmed and joined with single spaces;
/// paragraphs that end up empty are dropped.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}
