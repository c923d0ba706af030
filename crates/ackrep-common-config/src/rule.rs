//! Soft length rules for descriptor fields.
//!
//! Rules use a compact notation: comma separated terms of the form `=N`
//! (exact length), `>N` (longer than N) and `<N` (shorter than N), e.g.
//! `">3, <100"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A length constraint on a scalar field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LengthRule {
    pub exact: Option<usize>,
    pub longer_than: Option<usize>,
    pub shorter_than: Option<usize>,
}

/// Error parsing a rule expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid length rule `{expr}`: {reason}")]
pub struct RuleParseError {
    pub expr: String,
    pub reason: String,
}

impl LengthRule {
    /// Rule requiring exactly `n` characters.
    pub fn exact(n: usize) -> Self {
        Self {
            exact: Some(n),
            ..Self::default()
        }
    }

    /// Rule requiring strictly between `min` and `max` characters.
    pub fn between(min: usize, max: usize) -> Self {
        Self {
            exact: None,
            longer_than: Some(min),
            shorter_than: Some(max),
        }
    }

    /// Rule requiring fewer than `max` characters.
    pub fn shorter_than(max: usize) -> Self {
        Self {
            shorter_than: Some(max),
            ..Self::default()
        }
    }

    /// Check a value, returning a description of the violation if any.
    pub fn check(&self, value: &str) -> Option<String> {
        let len = value.chars().count();
        if let Some(n) = self.exact {
            if len != n {
                return Some(format!("length {len} but expected exactly {n}"));
            }
        }
        if let Some(n) = self.longer_than {
            if len <= n {
                return Some(format!("length {len} but expected more than {n}"));
            }
        }
        if let Some(n) = self.shorter_than {
            if len >= n {
                return Some(format!("length {len} but expected less than {n}"));
            }
        }
        None
    }
}

impl FromStr for LengthRule {
    type Err = RuleParseError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| RuleParseError {
            expr: expr.to_string(),
            reason: reason.to_string(),
        };

        let mut rule = Self::default();
        for term in expr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let mut chars = term.chars();
            let op = chars.next().unwrap_or_default();
            let n: usize = chars
                .as_str()
                .trim()
                .parse()
                .map_err(|_| fail(&format!("`{term}` does not end in a number")))?;
            let slot = match op {
                '=' => &mut rule.exact,
                '>' => &mut rule.longer_than,
                '<' => &mut rule.shorter_than,
                _ => return Err(fail(&format!("unknown operator in `{term}`"))),
            };
            if slot.replace(n).is_some() {
                return Err(fail(&format!("operator `{op}` given twice")));
            }
        }

        if rule == Self::default() {
            return Err(fail("no terms"));
        }
        Ok(rule)
    }
}

impl fmt::Display for LengthRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = [
            self.exact.map(|n| format!("={n}")),
            self.longer_than.map(|n| format!(">{n}")),
            self.shorter_than.map(|n| format!("<{n}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        f.write_str(&terms.join(", "))
    }
}

impl TryFrom<String> for LengthRule {
    type Error = RuleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LengthRule> for String {
    fn from(rule: LengthRule) -> Self {
        rule.to_string()
    }
}
