//! Lightweight markup to terminal escape conversion.
//!
//! Assistant output uses a small markdown subset. Each line is run through an
//! ordered list of regex substitutions, once, left to right. Nothing nests
//! and nothing can fail at conversion time: text a rule does not match is
//! written as-is.

use regex::Regex;

/// Rules used for assistant output, applied in order.
///
/// Fenced code goes first so its backticks are gone before the inline rule
/// runs.
pub const ANSI_RULES: &[(&str, &str)] = &[
    (r"(?s)```(.*?)```", "\x1b[36m${1}\x1b[39m"),
    (r"`([^`]+)`", "\x1b[36m${1}\x1b[39m"),
    (r"\*\*(.+?)\*\*", "\x1b[1m${1}\x1b[22m"),
];

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid markup rule `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Converts one line of output to terminal text.
pub trait Markup {
    fn to_terminal(&self, line: &str) -> String;
}

/// Writes text unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl Markup for PlainText {
    fn to_terminal(&self, line: &str) -> String {
        line.to_string()
    }
}

struct Rule {
    regex: Regex,
    replacement: String,
}

/// Ordered pattern → replacement substitutions, compiled once.
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: &[(&str, &str)]) -> Result<Self, RenderError> {
        let rules = rules
            .iter()
            .map(|&(pattern, replacement)| {
                let regex = Regex::new(pattern).map_err(|source| RenderError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
                Ok(Rule {
                    regex,
                    replacement: replacement.to_string(),
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        Ok(Self { rules })
    }

    /// The bold / code dialect from [`ANSI_RULES`].
    pub fn ansi() -> Result<Self, RenderError> {
        Self::new(ANSI_RULES)
    }
}

impl Markup for RuleSet {
    fn to_terminal(&self, line: &str) -> String {
        self.rules.iter().fold(line.to_string(), |text, rule| {
            rule.regex
                .replace_all(&text, rule.replacement.as_str())
                .into_owned()
        })
    }
}

/// Turn every bare `\n` into `\r\n`. Existing `\r\n` pairs are kept.
pub fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut prev = '\0';
    for ch in text.chars() {
        if ch == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(ch);
        prev = ch;
    }
    out
}
