//! Tolerant structured-output extraction.
//!
//! Agents return free text that is supposed to be JSON but often isn't:
//! wrapped in markdown fences, keys unquoted, smart quotes, trailing commas.
//! [`extract`] applies a fixed ladder (strict parse, fence narrowing,
//! repair parse) and returns `None` when all rungs fail. Callers decide the
//! fallback; none of them special-case the repair heuristics.

use serde::de::DeserializeOwned;

/// Extract a typed value from raw agent text.
///
/// 1. Strict parse of the trimmed text.
/// 2. If `allow_markdown_fence`, narrow to the outermost JSON payload
///    (first `{`/`[` through the last matching `}`/`]`) and retry.
/// 3. Repair parse: fix smart quotes, unquoted keys, and trailing commas
///    in the narrowed text, then retry.
/// 4. `None`.
///
/// Deterministic and side-effect free. When strict parsing succeeds the
/// repair path is never taken, so an already-valid payload is never altered.
pub fn extract<T: DeserializeOwned>(raw: &str, allow_markdown_fence: bool) -> Option<T> {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str::<T>(trimmed) {
        return Some(value);
    }

    let candidate = if allow_markdown_fence {
        narrow_to_payload(trimmed).unwrap_or(trimmed)
    } else {
        trimmed
    };

    if let Ok(value) = serde_json::from_str::<T>(candidate) {
        return Some(value);
    }

    serde_json::from_str::<T>(&repair(candidate)).ok()
}

/// Narrow prose-wrapped output to its outermost JSON payload.
///
/// Objects and arrays are both handled; whichever opener appears first
/// decides the delimiter pair.
fn narrow_to_payload(text: &str) -> Option<&str> {
    let obj = text.find('{');
    let arr = text.find('[');

    let (open, close) = match (obj, arr) {
        (Some(o), Some(a)) if o < a => (o, text.rfind('}')?),
        (Some(o), None) => (o, text.rfind('}')?),
        (_, Some(a)) => (a, text.rfind(']')?),
        (None, None) => return None,
    };

    if close > open {
        Some(&text[open..=close])
    } else {
        None
    }
}

/// Heuristically repair near-valid JSON.
///
/// Handles the three malformations observed in practice: smart quotes used
/// as string delimiters, unquoted object keys, and trailing commas before a
/// closing bracket. The passes are string-aware so already-quoted content
/// is left untouched.
pub fn repair(text: &str) -> String {
    let dequoted = normalize_quotes(text);
    let keyed = quote_bare_keys(&dequoted);
    strip_trailing_commas(&keyed)
}

/// Map typographic quotes to ASCII ones so they can delimit strings.
fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201c}' | '\u{201d}' | '\u{201e}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Wrap bare identifiers in quotes when they sit in key position.
fn quote_bare_keys(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let chars: Vec<char> = text.chars().collect();
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                // Identifier followed by ':' is a key; keywords stay bare.
                let is_key = chars.get(j) == Some(&':')
                    && !matches!(word.as_str(), "true" | "false" | "null");
                if is_key {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Drop commas that directly precede a closing bracket.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
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
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}
