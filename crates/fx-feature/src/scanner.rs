//! Line scanner for feature files
//!
//! Splits raw text into numbered logical lines and classifies each one.
//! Line numbers are 1-based and counted over the normalized text, so `\r\n`,
//! `\r` and `\n` sources all number identically.

/// Keywords that open a scenario outline
const OUTLINE_KEYWORDS: &[&str] = &["Scenario Outline:", "Scenario Template:"];
/// Keywords that open a regular scenario
const SCENARIO_KEYWORDS: &[&str] = &["Scenario:", "Example:"];
/// Keywords that open an examples table
const EXAMPLES_KEYWORDS: &[&str] = &["Examples:", "Scenarios:"];
/// Step keywords (each followed by a space)
const STEP_KEYWORDS: &[&str] = &["Given ", "When ", "Then ", "And ", "But ", "* "];
/// Doc string delimiters
const DOC_STRING_DELIMITERS: &[&str] = &["\"\"\"", "```"];

/// One line of scanned input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// 1-based line number over the normalized text
    pub line_number: usize,
    /// Line as written, without its terminator
    pub raw: String,
    /// Line with surrounding whitespace removed
    pub trimmed: String,
}

impl ScannedLine {
    /// Classify this line
    #[must_use]
    pub fn kind(&self) -> LineKind<'_> {
        classify(&self.trimmed)
    }
}

/// Classification of a trimmed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace only
    Blank,
    /// `# ...`
    Comment,
    /// `@a @b,@c`
    Tags(Vec<String>),
    /// `Feature: <name>`
    Feature(&'a str),
    /// `Rule: <name>`
    Rule(&'a str),
    /// `Background:`
    Background,
    /// `Scenario: <name>` / `Example: <name>`
    Scenario(&'a str),
    /// `Scenario Outline: <name>` / `Scenario Template: <name>`
    Outline(&'a str),
    /// `Examples: <name>` / `Scenarios: <name>`
    Examples(&'a str),
    /// `| a | b |`
    TableRow,
    /// Opening or closing doc string delimiter
    DocString(&'static str),
    /// `Given ...`, `When ...` and friends
    Step,
    /// Free text (descriptions)
    Other,
}

/// Split text into numbered lines
///
/// A leading byte order mark is dropped. Total: any input, including the empty string, produces a result.
#[must_use]
pub fn scan(text: &str) -> Vec<ScannedLine> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .split('\n')
        .enumerate()
        .map(|(idx, raw)| ScannedLine {
            line_number: idx + 1,
            raw: raw.to_string(),
            trimmed: raw.trim().to_string(),
        })
        .collect()
}

/// Classify a trimmed line
#[must_use]
pub fn classify(trimmed: &str) -> LineKind<'_> {
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }
    if trimmed.starts_with('@') {
        return LineKind::Tags(split_tags(trimmed));
    }
    if trimmed.starts_with('|') {
        return LineKind::TableRow;
    }
    if let Some(delim) = DOC_STRING_DELIMITERS.iter().find(|d| trimmed.starts_with(**d)) {
        return LineKind::DocString(*delim);
    }
    if let Some(name) = keyword_value(trimmed, &["Feature:"]) {
        return LineKind::Feature(name);
    }
    if let Some(name) = keyword_value(trimmed, &["Rule:"]) {
        return LineKind::Rule(name);
    }
    if keyword_value(trimmed, &["Background:"]).is_some() {
        return LineKind::Background;
    }
    if let Some(name) = keyword_value(trimmed, OUTLINE_KEYWORDS) {
        return LineKind::Outline(name);
    }
    if let Some(name) = keyword_value(trimmed, EXAMPLES_KEYWORDS) {
        return LineKind::Examples(name);
    }
    if let Some(name) = keyword_value(trimmed, SCENARIO_KEYWORDS) {
        return LineKind::Scenario(name);
    }
    if STEP_KEYWORDS.iter().any(|k| trimmed.starts_with(*k)) {
        return LineKind::Step;
    }
    LineKind::Other
}

/// Split a tag line into tags
///
/// Tokens are separated by whitespace or commas; only tokens starting with
/// `@` are kept, and a `#` token ends the line.
#[must_use]
pub fn split_tags(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .take_while(|t| !t.starts_with('#'))
        .filter(|t| t.starts_with('@') && t.len() > 1)
        .map(str::to_string)
        .collect()
}

/// Split a table row into trimmed cells
///
/// Handles `\|`, `\\` and `\n` escapes. Cells are trimmed before escapes are
/// decoded, so escaped whitespace at a cell edge survives. Returns `None`
/// when the row does not end with an unescaped `|`.
#[must_use]
pub fn split_row(trimmed: &str) -> Option<Vec<String>> {
    let body = trimmed.strip_prefix('|')?;
    let mut cells = Vec::new();
    let mut start = 0;
    let mut closed = false;
    let mut chars = body.char_indices();

    while let Some((idx, c)) = chars.next() {
        closed = false;
        match c {
            '\\' => {
                chars.next();
            }
            '|' => {
                cells.push(decode_cell(body[start..idx].trim()));
                start = idx + 1;
                closed = true;
            }
            _ => {}
        }
    }

    closed.then_some(cells)
}

fn decode_cell(raw: &str) -> String {
    let mut cell = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            cell.push(c);
            continue;
        }
        match chars.next() {
            Some('|') => cell.push('|'),
            Some('\\') => cell.push('\\'),
            Some('n') => cell.push('\n'),
            Some(other) => {
                cell.push('\\');
                cell.push(other);
            }
            None => cell.push('\\'),
        }
    }
    cell
}

fn keyword_value<'a>(trimmed: &'a str, keywords: &[&str]) -> Option<&'a str> {
    keywords
        .iter()
        .find_map(|k| trimmed.strip_prefix(*k))
        .map(str::trim)
}
