//! Utterance parsing
//!
//! Turns free text such as "coffee 5 dollars" into a [`ParsedTransaction`].
//! The rule path never fails: when nothing useful is found the record still
//! comes back, with a zero amount or the placeholder item name.
//!
//! When a remote classifier is configured it is tried first, and any failure
//! (network, timeout, bad JSON, missing fields) quietly falls back to the rules.

use regex::Regex;
use tracing::{debug, warn};

use crate::ai::{AIClient, RemoteClassifier};
use crate::classifier;
use crate::error::Result;
use crate::models::ParsedTransaction;

/// First number in the text, optionally followed by a currency unit.
/// Digits are ASCII or full-width, as typed by CJK input methods.
const AMOUNT_PATTERN: &str =
    r"(?i)([0-9０-９]+(?:[.．][0-9０-９]+)?)\s*(?:元|塊|圓|dollars?|NT\$?)?";

/// Item name used when the utterance has no text before the amount
pub const UNNAMED_ITEM: &str = "unnamed item";

/// Deterministic keyword/regex parser
#[derive(Debug, Clone)]
pub struct RuleParser {
    amount_pattern: Regex,
}

impl RuleParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            amount_pattern: Regex::new(AMOUNT_PATTERN)?,
        })
    }

    /// Parse an utterance using the keyword tables and amount pattern
    pub fn parse(&self, text: &str) -> ParsedTransaction {
        let text = text.trim();
        let tx_type = classifier::detect_type(text);

        let (amount, item) = match self.amount_pattern.captures(text) {
            Some(caps) => {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                let amount = caps
                    .get(1)
                    .and_then(|m| parse_amount(m.as_str()))
                    .unwrap_or(0.0);
                let item = if start == 0 {
                    text
                } else {
                    text[..start].trim()
                };
                (amount, item)
            }
            None => {
                debug!(text = %text, "No amount found, defaulting to 0");
                (0.0, text)
            }
        };

        let item = if item.is_empty() {
            UNNAMED_ITEM.to_string()
        } else {
            item.to_string()
        };
        let category = classifier::classify(&item, tx_type);

        debug!(
            text = %text,
            tx_type = %tx_type,
            item = %item,
            category = %category,
            amount,
            "Rule-parsed utterance"
        );

        ParsedTransaction {
            tx_type,
            item,
            category,
            amount,
        }
    }
}

/// Parse a matched amount, folding full-width digits and point to ASCII
fn parse_amount(raw: &str) -> Option<f64> {
    let ascii: String = raw
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '．' => '.',
            c => c,
        })
        .collect();
    ascii.parse().ok()
}

/// Utterance parser with an optional remote classifier in front of the rules
#[derive(Clone)]
pub struct TextParser {
    rules: RuleParser,
    remote: Option<AIClient>,
}

impl TextParser {
    /// Rules only
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleParser::new()?,
            remote: None,
        })
    }

    /// Try `remote` first, falling back to the rules
    pub fn with_remote(remote: Option<AIClient>) -> Result<Self> {
        Ok(Self {
            rules: RuleParser::new()?,
            remote,
        })
    }

    /// The configured remote classifier, if any
    pub fn remote(&self) -> Option<&AIClient> {
        self.remote.as_ref()
    }

    /// Parse with the deterministic rules only
    pub fn parse(&self, text: &str) -> ParsedTransaction {
        self.rules.parse(text)
    }

    /// Parse with the remote classifier if configured, otherwise (or on any
    /// remote failure) with the rules
    pub async fn parse_with_remote(&self, text: &str) -> ParsedTransaction {
        let Some(ref remote) = self.remote else {
            return self.parse(text);
        };

        match remote.classify(text).await {
            Ok(parsed) => {
                debug!(model = remote.model(), "Remote classifier parsed utterance");
                parsed
            }
            Err(e) => {
                warn!(
                    host = remote.host(),
                    model = remote.model(),
                    "Remote classifier failed, using rules: {}",
                    e
                );
                self.parse(text)
            }
        }
    }
}
