//! Example naming for expanded outlines
//!
//! Each expanded example is named
//! `"{row}: {outline} - {param1}: {value1}, {param2}: {value2}, ..."`.
//! [`is_example_name`] and [`extract_outline_name`] recover the shape and
//! the outline name from such a string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default maximum display length of a generated example name (in chars)
pub const DEFAULT_MAX_EXAMPLE_NAME_LEN: usize = 100;

/// Default number of chars kept from a shortened parameter name
pub const DEFAULT_TRUNCATED_PARAM_WIDTH: usize = 5;

/// Default marker appended to a shortened parameter name
pub const DEFAULT_ELLIPSIS: &str = "...";

static EXAMPLE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+:\s*.+\s*-\s*").expect("valid regex"));
static LEADING_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+: ?").expect("valid regex"));

/// Naming policy for expanded examples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleNaming {
    /// Budget for the whole name, in chars
    pub max_len: usize,
    /// Chars kept when a parameter name is shortened
    pub truncated_width: usize,
    /// Marker appended to a shortened parameter name
    pub ellipsis: String,
}

impl Default for ExampleNaming {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_EXAMPLE_NAME_LEN,
            truncated_width: DEFAULT_TRUNCATED_PARAM_WIDTH,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }
}

impl ExampleNaming {
    /// Create default policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With name budget
    #[inline]
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// With truncation width
    #[inline]
    #[must_use]
    pub fn with_truncated_width(mut self, width: usize) -> Self {
        self.truncated_width = width;
        self
    }

    /// Build the name of the `index`-th (1-based) example row
    ///
    /// When the composed name exceeds `max_len`, parameter names are
    /// shortened starting from the last one. The first parameter name is
    /// never shortened, and values are never touched.
    #[must_use]
    pub fn example_name(
        &self,
        index: usize,
        outline: &str,
        headers: &[String],
        values: &[String],
    ) -> String {
        let mut names: Vec<String> = headers.to_vec();
        let mut name = compose(index, outline, &names, values);

        for i in (1..names.len()).rev() {
            if name.chars().count() <= self.max_len {
                break;
            }
            names[i] = self.shorten(&headers[i]);
            name = compose(index, outline, &names, values);
        }

        name
    }

    fn shorten(&self, param: &str) -> String {
        if param.chars().count() <= self.truncated_width {
            return param.to_string();
        }
        let mut short: String = param.chars().take(self.truncated_width).collect();
        short.push_str(&self.ellipsis);
        short
    }
}

fn compose(index: usize, outline: &str, names: &[String], values: &[String]) -> String {
    let params = names
        .iter()
        .zip(values)
        .map(|(n, v)| format!("{n}: {v}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{index}: {outline} - {params}")
}

/// Whether `name` has the shape of a generated example name
#[must_use]
pub fn is_example_name(name: &str) -> bool {
    EXAMPLE_SHAPE.is_match(name)
}

/// Recover the outline name from a generated example name
///
/// Strips the leading `"N: "` and everything from the last `" - "` onward.
/// If that leaves nothing, the input is returned unchanged.
#[must_use]
pub fn extract_outline_name(name: &str) -> String {
    let stripped = LEADING_INDEX.replace(name, "");
    let core = match stripped.rfind(" - ") {
        Some(idx) => &stripped[..idx],
        None => &stripped[..],
    };
    let trimmed = core.trim();
    if trimmed.is_empty() {
        name.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Substitute `<param>` placeholders in a step line
#[must_use]
pub fn substitute_placeholders(step: &str, headers: &[String], values: &[String]) -> String {
    headers
        .iter()
        .zip(values)
        .fold(step.to_string(), |acc, (h, v)| acc.replace(&format!("<{h}>"), v))
}
