use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::step_catalog::{match_single_line, Catalog, StepMarker};

/// Keywords that may open a scenario line and get aligned away when the line
/// continues a previous step with "And".
const SCENARIO_KEYWORDS: [&str; 3] = ["given", "when", "then"];

/// The two derived renderings of a marker: `label` keeps the phrase literal
/// (placeholders in their `{name}` form), `pattern` replaces each placeholder
/// with a sequential `$1`, `$2`, ... token so prefix comparison works on a
/// fixed string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Usage {
    pub label: String,
    pub pattern: String,
}

impl Usage {
    /// Derives the usage pair from raw marker text. Pure function of the
    /// text; returns None when the text is not marker-shaped.
    pub fn from_raw(raw: &str) -> Option<Usage> {
        let m = match_single_line(raw)?;
        Some(Usage {
            label: format!("{} {}", m.keyword, m.phrase),
            pattern: format!("{} {}", m.keyword, substitute_placeholders(&m.phrase)),
        })
    }
}

/// One completion offer: the full usage string and the suffix not yet covered
/// by what the user has typed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub label: String,
    pub remainder: String,
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder,
}

/// Splits a phrase into literal text and `{...}` placeholder segments.
/// Placeholders do not nest; a `{` with no closing brace before the next `{`
/// stays literal.
fn split_placeholders(phrase: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = phrase;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find(['{', '}']) {
            Some(off) if after.as_bytes()[off] == b'}' => {
                if start > 0 {
                    segments.push(Segment::Literal(&rest[..start]));
                }
                segments.push(Segment::Placeholder);
                rest = &after[off + 1..];
            }
            _ => {
                segments.push(Segment::Literal(&rest[..start + 1]));
                rest = after;
            }
        }
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    segments
}

fn substitute_placeholders(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut n = 0;
    for seg in split_placeholders(phrase) {
        match seg {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder => {
                n += 1;
                out.push('$');
                out.push_str(&n.to_string());
            }
        }
    }
    out
}

/// True when the first `len(query)` characters of `pattern` equal `query`,
/// compared case-insensitively. A pattern shorter than the query never
/// matches; this is a strict prefix test, not substring containment.
fn is_prefix_ci(pattern: &str, query: &str) -> bool {
    let mut pat = pattern.chars();
    for qc in query.chars() {
        match pat.next() {
            Some(pc) if pc.to_lowercase().eq(qc.to_lowercase()) => {}
            _ => return false,
        }
    }
    true
}

/// Strips a leading "and" word (case-insensitive) plus the whitespace after
/// it, returning the rest of the query; None when the query does not start
/// that way.
fn strip_and_prefix(query: &str) -> Option<&str> {
    if query.len() < 4 || !query.is_char_boundary(3) {
        return None;
    }
    let (head, rest) = query.split_at(3);
    if head.eq_ignore_ascii_case("and") && rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Strips a leading Given/When/Then keyword (the word only) from a pattern.
fn strip_pattern_keyword(pattern: &str) -> &str {
    let word_end = pattern.find(char::is_whitespace).unwrap_or(pattern.len());
    let word = &pattern[..word_end];
    if SCENARIO_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k)) {
        &pattern[word_end..]
    } else {
        pattern
    }
}

/// The completion suffix: drop the trailing partial word of the query, then
/// take the compared pattern past that length, trimmed. A query with no
/// whitespace yields the full label, untrimmed.
fn remainder_for(label: &str, pattern: &str, query: &str) -> String {
    let mut last_ws = None;
    for (i, c) in query.chars().enumerate() {
        if c.is_whitespace() {
            last_ws = Some(i);
        }
    }
    match last_ws {
        Some(i) => pattern.chars().skip(i + 1).collect::<String>().trim().to_string(),
        None => label.to_string(),
    }
}

/// Matches free text against every marker's pattern under case-insensitive
/// prefix semantics. A query opening with "And" has that word stripped and is
/// compared against keyword-stripped patterns instead. Results are sorted by
/// (label, remainder) so completion lists are stable regardless of catalog
/// order.
pub fn match_candidates(catalog: &Catalog, query: &str) -> Vec<MatchCandidate> {
    let and_rest = strip_and_prefix(query);
    let mut out = Vec::new();
    for marker in &catalog.markers {
        let Some(usage) = Usage::from_raw(&marker.raw) else {
            continue;
        };
        let (q, pattern) = match and_rest {
            Some(rest) => (rest, strip_pattern_keyword(&usage.pattern)),
            None => (query, usage.pattern.as_str()),
        };
        if !is_prefix_ci(pattern, q) {
            continue;
        }
        let remainder = remainder_for(&usage.label, pattern, q);
        out.push(MatchCandidate {
            label: usage.label.clone(),
            remainder,
        });
    }
    out.sort();
    out
}

/// Like [`match_candidates`], with a keyword hint from surrounding context
/// (the nearest preceding Given/When/Then line of the scenario being typed).
/// An "And" opener is replaced by the hint; a query with no opening keyword
/// gets the hint prepended. A query already carrying its own keyword matches
/// as-is.
pub fn match_candidates_with_keyword(
    catalog: &Catalog,
    query: &str,
    keyword: &str,
) -> Vec<MatchCandidate> {
    if let Some(rest) = strip_and_prefix(query) {
        return match_candidates(catalog, &format!("{keyword} {rest}"));
    }
    let first = query.split_whitespace().next().unwrap_or("");
    if SCENARIO_KEYWORDS.iter().any(|k| first.eq_ignore_ascii_case(k)) {
        return match_candidates(catalog, query);
    }
    match_candidates(catalog, &format!("{keyword} {query}"))
}

/// Display labels for every marker, in catalog order. Markers whose raw text
/// no longer parses fall back to the raw text itself.
pub fn catalog_labels(catalog: &Catalog) -> Vec<String> {
    catalog
        .markers
        .iter()
        .map(|m| match Usage::from_raw(&m.raw) {
            Some(usage) => usage.label,
            None => m.raw.clone(),
        })
        .collect()
}

/// Resolves a complete scenario line to its defining marker: strips the first
/// configured keyword (capitalized comparison) from the front of the line,
/// then returns the first marker whose phrase (literals escaped, placeholders
/// widened to `(.+)`) matches the rest from its start.
pub fn find_definition<'a>(
    catalog: &'a Catalog,
    line: &str,
    keywords: &[String],
) -> Option<&'a StepMarker> {
    let text = trim_keywords(line.trim(), keywords);
    catalog.markers.iter().find(|marker| {
        match_single_line(&marker.raw)
            .and_then(|m| phrase_regex(&m.phrase))
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn trim_keywords<'a>(line: &'a str, keywords: &[String]) -> &'a str {
    for kw in keywords {
        if let Some(rest) = line.strip_prefix(&capitalize(kw)) {
            return rest.trim_start();
        }
    }
    line
}

fn phrase_regex(phrase: &str) -> Option<Regex> {
    let mut pat = String::from("^");
    for seg in split_placeholders(phrase) {
        match seg {
            Segment::Literal(text) => pat.push_str(&regex::escape(text)),
            Segment::Placeholder => pat.push_str("(.+)"),
        }
    }
    Regex::new(&pat).ok()
}
