//! Client key extraction from embed page markup

use crate::Result;
use regex::Regex;
use tracing::debug;

/// Finds the per-page client key in embed markup
pub trait KeyExtractor: Send + Sync {
    /// Return the key, or `None` when no known pattern matches
    fn extract(&self, embed_html: &str) -> Option<String>;
}

impl<F> KeyExtractor for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn extract(&self, embed_html: &str) -> Option<String> {
        self(embed_html)
    }
}

/// One way of locating the key in markup
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// The first capture group is the key
    Capture(Regex),
    /// The key is split across literals; all capture groups are joined in order
    Concat(Regex),
}

impl KeyPattern {
    /// Compile a single-group pattern
    pub fn capture(pattern: &str) -> Result<Self> {
        Ok(KeyPattern::Capture(Regex::new(pattern)?))
    }

    /// Compile a multi-group pattern
    pub fn concat(pattern: &str) -> Result<Self> {
        Ok(KeyPattern::Concat(Regex::new(pattern)?))
    }

    /// Apply to markup
    pub fn apply(&self, embed_html: &str) -> Option<String> {
        let key = match self {
            KeyPattern::Capture(regex) => regex
                .captures(embed_html)?
                .get(1)
                .map(|m| m.as_str().to_string())?,
            KeyPattern::Concat(regex) => {
                let captures = regex.captures(embed_html)?;
                captures
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str())
                    .collect::<String>()
            }
        };
        (!key.is_empty()).then_some(key)
    }

    fn as_str(&self) -> &str {
        match self {
            KeyPattern::Capture(regex) | KeyPattern::Concat(regex) => regex.as_str(),
        }
    }
}

/// Layouts the embed player has been seen to use, most common first
const DEFAULT_PATTERNS: &[(&str, bool)] = &[
    (r#"<meta\s+name="_gg_fb"\s+content="([A-Za-z0-9]+)""#, false),
    (r#"<!--\s*_is_th:([A-Za-z0-9]+)\s*-->"#, false),
    (
        r#"window\._lk_db\s*=\s*\{\s*x:\s*"([A-Za-z0-9]+)",\s*y:\s*"([A-Za-z0-9]+)",\s*z:\s*"([A-Za-z0-9]+)"\s*\}"#,
        true,
    ),
    (r#"data-dpi="([A-Za-z0-9]+)""#, false),
    (r#"<script\s+nonce="([A-Za-z0-9]+)""#, false),
    (r#"window\._xy_ws\s*=\s*["'`]([A-Za-z0-9]+)["'`]"#, false),
];

/// Tries patterns in order and returns the first match
#[derive(Debug, Clone, Default)]
pub struct PatternKeyExtractor {
    patterns: Vec<KeyPattern>,
}

impl PatternKeyExtractor {
    /// Create an extractor with the given patterns
    pub fn new(patterns: Vec<KeyPattern>) -> Self {
        Self { patterns }
    }

    /// Create an extractor with the built-in patterns
    pub fn with_defaults() -> Result<Self> {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|&(pattern, concat)| {
                if concat {
                    KeyPattern::concat(pattern)
                } else {
                    KeyPattern::capture(pattern)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(patterns))
    }

    /// Append a pattern, tried after the existing ones
    pub fn with_pattern(mut self, pattern: KeyPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl KeyExtractor for PatternKeyExtractor {
    fn extract(&self, embed_html: &str) -> Option<String> {
        self.patterns.iter().find_map(|pattern| {
            let key = pattern.apply(embed_html)?;
            debug!("Client key matched pattern {}", pattern.as_str());
            Some(key)
        })
    }
}
