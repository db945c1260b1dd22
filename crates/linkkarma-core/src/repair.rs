//! Repair pipeline for JSON emitted by language models.
//!
//! Model output is "JSON, mostly": wrapped in markdown fences, surrounded by
//! prose, quoted with `'`, carrying trailing commas, or cut off mid-object
//! when the token budget runs out. [`repair_json`] normalizes the text and
//! then tries a fixed sequence of repairs until one parses.
//!
//! # Pipeline
//!
//! Normalization (always applied, in order):
//! 1. [`strip_code_fences`]: trim, drop leading ```` ```json ```` and trailing ```` ``` ````
//! 2. [`strip_wrapping_quotes`]: drop one layer of `'…'` around the whole text
//! 3. [`extract_object`]: greedy first-`{` to last-`}` slice
//! 4. [`remove_trailing_commas`]: `,}` → `}` and `,]` → `]`
//!
//! Parse attempts (first success wins): as-is, single quotes replaced by
//! double quotes, missing closers appended by [`balance_brackets`], and both.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const EXCERPT_CHARS: usize = 200;

static OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model returned an empty response")]
    Empty,

    #[error("model output is not valid JSON after repair: {source} (excerpt: {excerpt:?})")]
    Malformed {
        #[source]
        source: serde_json::Error,
        excerpt: String,
    },

    #[error("invalid field `{field}`: {rule}")]
    Validation { field: String, rule: String },

    #[error("response does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

impl ParseError {
    pub fn validation(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            rule: rule.into(),
        }
    }
}

// ── Normalization ──

/// Trim and remove markdown code fences around the payload.
pub fn strip_code_fences(input: &str) -> &str {
    let mut s = input.trim();
    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
        s = rest.trim_start();
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}

/// Remove a single layer of single quotes wrapping the whole string.
pub fn strip_wrapping_quotes(input: &str) -> &str {
    if input.len() >= 2 && input.starts_with('\'') && input.ends_with('\'') {
        input[1..input.len() - 1].trim()
    } else {
        input
    }
}

/// Slice out the JSON object when prose surrounds it.
///
/// Greedy: spans from the first `{` to the last `}`. Truncated output with no
/// closing brace keeps everything from the first `{` onwards.
pub fn extract_object(input: &str) -> &str {
    if let Some(m) = OBJECT_RE.find(input) {
        return m.as_str();
    }
    match input.find('{') {
        Some(start) => &input[start..],
        None => input,
    }
}

/// Drop commas that directly precede a closing `}` or `]`.
pub fn remove_trailing_commas(input: &str) -> Cow<'_, str> {
    TRAILING_COMMA_RE.replace_all(input, "$1")
}

/// Append the closers needed to balance truncated JSON.
///
/// Brackets inside string literals are ignored. An unterminated string is
/// closed first, then one closer is appended per unmatched opener, innermost
/// first.
pub fn balance_brackets(input: &str) -> String {
    let mut open: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                if open.last() == Some(&c) {
                    open.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = String::with_capacity(input.len() + open.len() + 1);
    out.push_str(input);
    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    out.extend(open.iter().rev());
    out
}

/// Apply every normalization step.
pub fn normalize(raw: &str) -> String {
    let s = strip_code_fences(raw);
    let s = strip_wrapping_quotes(s);
    let s = extract_object(s);
    remove_trailing_commas(s).into_owned()
}

// ── Repair attempts ──

type Repair = fn(&str) -> String;

fn as_is(s: &str) -> String {
    s.to_string()
}

fn double_quotes(s: &str) -> String {
    remove_trailing_commas(&s.replace('\'', "\"")).into_owned()
}

fn balanced(s: &str) -> String {
    remove_trailing_commas(&balance_brackets(s)).into_owned()
}

fn double_quotes_balanced(s: &str) -> String {
    balanced(&s.replace('\'', "\""))
}

const REPAIRS: &[(&str, Repair)] = &[
    ("as-is", as_is),
    ("double-quotes", double_quotes),
    ("balance", balanced),
    ("double-quotes+balance", double_quotes_balanced),
];

/// Parse model output into a JSON value, repairing it as needed.
pub fn repair_json(raw: &str) -> Result<Value, ParseError> {
    let cleaned = normalize(raw);
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut first_error = None;
    for (stage, repair) in REPAIRS {
        let candidate = repair(&cleaned);
        match serde_json::from_str::<Value>(&candidate) {
            Ok(value) => {
                if *stage != "as-is" {
                    debug!(stage, "repaired model JSON");
                }
                return Ok(value);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    let excerpt: String = cleaned.chars().take(EXCERPT_CHARS).collect();
    match first_error {
        Some(source) => Err(ParseError::Malformed { source, excerpt }),
        None => Err(ParseError::Empty),
    }
}
