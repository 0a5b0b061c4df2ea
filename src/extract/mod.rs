//! Plain-text extraction from Day One entry bodies.
//!
//! An entry carries its body twice: a rich-text JSON document whose shape has
//! changed between app versions, and a markdown rendition. Extraction tries a
//! series of known rich-text layouts, then a heuristic scan of the raw blob,
//! then the markdown. It never fails; the worst case is an empty string.
//!
//! # Strategy order
//!
//! 1. Parsed JSON: `text`, `attributedString.string`, `ops[].insert`,
//!    `delta.ops[].insert`, `NSString`, then a depth-limited string scan
//! 2. Unparseable blob: sentence extraction, then a run of plain words
//! 3. The markdown rendition, trimmed
//!
//! The depth-limited scan picks the longest string over ten characters. It is
//! lossy by nature and carries no confidence signal.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Depth budget for the fallback string scan; the top-level document uses one level.
const STRING_SCAN_DEPTH: usize = 3;
/// Strings at or below this many characters are not considered "meaningful".
const MEANINGFUL_STRING_CHARS: usize = 10;
/// Number of sentences kept from an unparseable blob.
const MAX_SENTENCES: usize = 3;
/// Minimum number of plain words needed before the word fallback is trusted.
const MIN_PLAIN_WORDS: usize = 5;
/// Number of plain words kept from an unparseable blob.
const MAX_PLAIN_WORDS: usize = 20;

/// Extracts the best-effort plain text of an entry.
///
/// Empty strings are treated the same as absent values.
///
/// # Examples
///
/// ```
/// use dayone_tools::extract::extract_text;
///
/// assert_eq!(extract_text(None, None), "");
/// assert_eq!(extract_text(Some(r#"{"text": "hello"}"#), None), "hello");
/// assert_eq!(
///     extract_text(Some(r#"{"ops":[{"insert":"foo"},{"insert":"bar"}]}"#), None),
///     "foobar"
/// );
/// assert_eq!(extract_text(Some("{not json"), Some("fallback text")), "fallback text");
/// ```
pub fn extract_text(rich_text: Option<&str>, markdown: Option<&str>) -> String {
    let rich_text = rich_text.filter(|s| !s.is_empty());
    let markdown = markdown.filter(|s| !s.is_empty());

    if let Some(raw) = rich_text {
        let extracted = match serde_json::from_str::<Value>(raw) {
            Ok(document) => from_document(&document),
            Err(e) => {
                debug!("Rich text is not valid JSON ({}), scanning raw text", e);
                from_raw_blob(raw)
            }
        };
        if let Some(text) = extracted {
            return text;
        }
    }

    markdown.map(|m| m.trim().to_string()).unwrap_or_default()
}

fn from_document(document: &Value) -> Option<String> {
    match document {
        Value::String(s) => non_empty(s),
        Value::Object(map) => from_object(map).or_else(|| longest_meaningful_string(document)),
        Value::Array(_) => longest_meaningful_string(document),
        _ => None,
    }
}

fn from_object(map: &Map<String, Value>) -> Option<String> {
    map.get("text")
        .and_then(scalar_text)
        .and_then(|t| non_empty(&t))
        .or_else(|| {
            map.get("attributedString")
                .and_then(|a| a.get("string"))
                .and_then(scalar_text)
                .and_then(|t| non_empty(&t))
        })
        .or_else(|| map.get("ops").and_then(join_ops))
        .or_else(|| map.get("delta").and_then(|d| d.get("ops")).and_then(join_ops))
        .or_else(|| {
            map.get("NSString")
                .and_then(scalar_text)
                .and_then(|t| non_empty(&t))
        })
}

/// Concatenates delta-style `insert` payloads in order.
fn join_ops(ops: &Value) -> Option<String> {
    let ops = ops.as_array()?;
    let mut joined = String::new();
    for op in ops {
        match op.get("insert") {
            Some(Value::String(s)) => joined.push_str(s),
            Some(Value::Object(embed)) => {
                if let Some(text) = embed.get("text").and_then(scalar_text) {
                    joined.push_str(&text);
                }
            }
            _ => {}
        }
    }
    non_empty(&joined)
}

/// Renders a scalar JSON value as text. Containers and null yield nothing.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn longest_meaningful_string(document: &Value) -> Option<String> {
    let mut found = Vec::new();
    collect_strings(document, STRING_SCAN_DEPTH, &mut found);

    let mut best: Option<&String> = None;
    for s in &found {
        let len = s.chars().count();
        if len <= MEANINGFUL_STRING_CHARS {
            continue;
        }
        // strict comparison keeps the earliest string on ties
        if best.map_or(true, |b| len > b.chars().count()) {
            best = Some(s);
        }
    }

    best.or_else(|| found.first()).cloned()
}

fn collect_strings(value: &Value, depth: usize, out: &mut Vec<String>) {
    if depth == 0 {
        return;
    }
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                collect_strings(child, depth - 1, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_strings(child, depth - 1, out);
            }
        }
        _ => {}
    }
}

/// Mines readable text out of a blob that failed to parse.
fn from_raw_blob(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let cleaned = clean_raw_blob(raw)?;

    let sentence_re = sentence_regex()?;
    let sentences: Vec<&str> = sentence_re
        .find_iter(&cleaned)
        .take(MAX_SENTENCES)
        .map(|m| m.as_str())
        .collect();
    if !sentences.is_empty() {
        return non_empty(&sentences.join(" "));
    }

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && w.chars().all(char::is_alphabetic))
        .collect();
    if words.len() >= MIN_PLAIN_WORDS {
        let kept: Vec<&str> = words.into_iter().take(MAX_PLAIN_WORDS).collect();
        return non_empty(&kept.join(" "));
    }

    None
}

/// Strips JSON punctuation, unescapes `\n` and `\t`, and collapses whitespace.
fn clean_raw_blob(raw: &str) -> Option<String> {
    let without_punctuation: String = raw
        .chars()
        .map(|c| match c {
            '{' | '}' | '[' | ']' | '"' => ' ',
            other => other,
        })
        .collect();
    let unescaped = without_punctuation.replace("\\n", "\n").replace("\\t", "\t");

    let whitespace_re = whitespace_regex()?;
    Some(whitespace_re.replace_all(&unescaped, " ").into_owned())
}

/// Capitalised runs ending in sentence punctuation.
static SENTENCE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

static WHITESPACE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn sentence_regex() -> Option<&'static Regex> {
    SENTENCE_REGEX
        .get_or_init(|| compile(r"[A-Z][^.!?]*[.!?]", "sentence"))
        .as_ref()
}

fn whitespace_regex() -> Option<&'static Regex> {
    WHITESPACE_REGEX
        .get_or_init(|| compile(r"\s+", "whitespace"))
        .as_ref()
}

fn compile(pattern: &str, name: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "Failed to compile {} regex", name);
            None
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
