use serde::{Deserialize, Serialize};

/// A step-definition marker as discovered in source: the raw decorator text,
/// the 0-based line it was found on, and the file it came from.
///
/// Markers are immutable once recorded; the same raw text may legitimately
/// appear in several files (or several times in one) and every occurrence is
/// kept distinct.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepMarker {
    pub raw: String,
    pub line: usize,
    pub file: String,
}

/// Where a step is defined, as handed back to a host for navigation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepLocation {
    pub file: String,
    pub line: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub by_keyword: ByKeyword,
    pub duplicates: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ByKeyword {
    #[serde(rename = "Given")]
    pub given: usize,
    #[serde(rename = "When")]
    pub when: usize,
    #[serde(rename = "Then")]
    pub then: usize,
    #[serde(rename = "Other")]
    pub other: usize,
}

/// The full set of markers from the most recent completed scan.
/// A catalog is rebuilt wholesale on every rescan; never merged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub markers: Vec<StepMarker>,
    pub stats: Stats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

/// Structured result of one of the two marker rules: the keyword identifier,
/// the phrase between the quotes, and the exact raw marker text recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerMatch {
    pub keyword: String,
    pub phrase: String,
    pub raw: String,
}

impl Catalog {
    pub fn from_markers(mut markers: Vec<StepMarker>) -> Self {
        // Sort for stability
        markers.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        let mut stats = Stats::default();
        stats.total = markers.len();
        // Duplicates: same (keyword, phrase) recorded more than once
        use std::collections::HashMap;
        let mut seen: HashMap<(String, String), usize> = HashMap::new();
        for m in &markers {
            match match_single_line(&m.raw) {
                Some(parsed) => {
                    match parsed.keyword.to_ascii_lowercase().as_str() {
                        "given" => stats.by_keyword.given += 1,
                        "when" => stats.by_keyword.when += 1,
                        "then" => stats.by_keyword.then += 1,
                        _ => stats.by_keyword.other += 1,
                    }
                    *seen
                        .entry((parsed.keyword.to_ascii_lowercase(), parsed.phrase))
                        .or_insert(0) += 1;
                }
                None => stats.by_keyword.other += 1,
            }
        }
        stats.duplicates = seen.values().filter(|&&c| c > 1).count();
        Catalog { markers, stats }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Resolves a catalog index (as shown in a host's step list) back to the
    /// defining file and 0-based line.
    pub fn resolve(&self, index: usize) -> Option<StepLocation> {
        self.markers.get(index).map(|m| StepLocation {
            file: m.file.clone(),
            line: m.line,
        })
    }
}

/// Scans every file's lines and assembles the catalog.
pub fn extract_catalog_from_files(files: &[SourceFile]) -> Catalog {
    let mut markers: Vec<StepMarker> = Vec::new();
    for sf in files {
        markers.extend(scan_lines(&sf.path, sf.text.lines()));
    }
    Catalog::from_markers(markers)
}

/// Scans one file's lines for step markers. The single-line rule is tried
/// first on every line; the two-line rule only when it fails and a next line
/// exists. Scanning always advances one line at a time, so the second line of
/// a two-line marker still gets its own turn as a candidate.
pub fn scan_lines<'a>(path: &str, lines: impl IntoIterator<Item = &'a str>) -> Vec<StepMarker> {
    let lines: Vec<&str> = lines.into_iter().collect();
    let mut markers = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if let Some(m) = match_single_line(line) {
            markers.push(StepMarker {
                raw: m.raw,
                line: i,
                file: path.to_string(),
            });
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        if let Some(next) = lines.get(i + 1) {
            if let Some(m) = match_two_line(line, next) {
                markers.push(StepMarker {
                    raw: m.raw,
                    line: i,
                    file: path.to_string(),
                });
            }
        }
    }
    markers
}

fn is_quote(b: u8) -> bool {
    b == b'\'' || b == b'"'
}

/// Splits `@<keyword>(<quote>` off the front of `text`, returning the keyword
/// and the byte offset of the first phrase character.
fn split_marker_head(text: &str) -> Option<(&str, usize)> {
    let rest = text.strip_prefix('@')?;
    let kw_len: usize = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .map(char::len_utf8)
        .sum();
    if kw_len == 0 {
        return None;
    }
    let keyword = &rest[..kw_len];
    let mut after = rest[kw_len..].chars();
    if after.next() != Some('(') {
        return None;
    }
    if !after.next().map(|c| c == '\'' || c == '"').unwrap_or(false) {
        return None;
    }
    // '@' + keyword + '(' + quote, everything but the keyword single-byte
    Some((keyword, 1 + kw_len + 2))
}

/// Single-line rule: `@Keyword('phrase')` starting at column 0. The marker
/// ends at the LAST quote-then-`)` on the line; open and close quote need not
/// match, which tolerates escaped quotes inside the phrase. Trailing content
/// past the close is not part of the raw marker text.
pub fn match_single_line(line: &str) -> Option<MarkerMatch> {
    let (keyword, phrase_start) = split_marker_head(line)?;
    let bytes = line.as_bytes();
    let mut close = None;
    for (i, w) in bytes[phrase_start..].windows(2).enumerate() {
        if is_quote(w[0]) && w[1] == b')' {
            close = Some(phrase_start + i);
        }
    }
    let close = close?;
    Some(MarkerMatch {
        keyword: keyword.to_string(),
        phrase: line[phrase_start..close].to_string(),
        raw: line[..close + 2].to_string(),
    })
}

/// Two-line rule: a marker whose phrase is glued from two quoted fragments
/// split across the line boundary, e.g.
///
/// ```text
/// @Given('there is a '
///        'longer step')
/// ```
///
/// Both lines are stripped before testing. On success a single combined
/// marker string is synthesized from the keyword and the glued phrase, using
/// the first fragment's quote character.
pub fn match_two_line(first: &str, second: &str) -> Option<MarkerMatch> {
    let head = first.trim();
    let tail = second.trim();
    if head.is_empty() {
        return None;
    }
    let (keyword, frag_start) = split_marker_head(head)?;
    let head_bytes = head.as_bytes();
    // The head must end in a quote that is not the opening one.
    if head_bytes.len() <= frag_start || !is_quote(head_bytes[head_bytes.len() - 1]) {
        return None;
    }
    let open = head_bytes[frag_start - 1] as char;
    let first_fragment = &head[frag_start..head.len() - 1];

    let tail_bytes = tail.as_bytes();
    if tail_bytes.len() < 3
        || !is_quote(tail_bytes[0])
        || !is_quote(tail_bytes[tail_bytes.len() - 2])
        || tail_bytes[tail_bytes.len() - 1] != b')'
    {
        return None;
    }
    let second_fragment = &tail[1..tail.len() - 2];

    let phrase = format!("{first_fragment}{second_fragment}");
    let raw = format!("@{keyword}({open}{phrase}{open})");
    Some(MarkerMatch {
        keyword: keyword.to_string(),
        phrase,
        raw,
    })
}
