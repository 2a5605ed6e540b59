//! Doc-comment parsing.
//!
//! Recovers a one-line summary and per-parameter descriptions from the raw
//! comment text attached to a function. Three comment syntaxes are understood:
//!
//! - `/// line docs`
//! - `//! bang line docs`
//! - `/** block docs */`, with optional leading `*` on continuation lines
//!
//! Text with no comment markers at all is read as doc text directly.
//!
//! Parameter descriptions use the `- Parameter <name>: <text>` convention:
//!
//! ```
//! use lodestar_schema::DocComment;
//!
//! let doc = DocComment::parse("/// Get forecast\n/// - Parameter city: City name");
//! assert_eq!(doc.summary, "Get forecast");
//! assert_eq!(doc.parameter("city"), Some("City name"));
//! ```

use indexmap::IndexMap;

const PARAMETER_KEYWORD: &str = "parameter";

/// Summary and parameter descriptions recovered from a doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// First non-empty line, whatever its kind. Empty when there is no doc comment.
    pub summary: String,
    /// Parameter name to description, in the order the entries appeared.
    pub parameters: IndexMap<String, String>,
}

impl DocComment {
    /// Parses a single region of raw comment text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::parse_regions([raw])
    }

    /// Parses a comment that is split across several trivia regions, such as
    /// one block before an attribute and another before the `fn` keyword.
    ///
    /// Regions are concatenated in the order given.
    #[must_use]
    pub fn parse_regions<'a>(regions: impl IntoIterator<Item = &'a str>) -> Self {
        let mut lines = Vec::new();
        for region in regions {
            collect_doc_lines(region, &mut lines);
        }
        Self::from_lines(&lines)
    }

    /// Builds a doc comment from lines whose comment markers are already gone.
    #[must_use]
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut doc = Self::default();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if doc.summary.is_empty() {
                doc.summary = line.to_string();
            }
            if let ParameterLine::Entry { name, description } = parse_parameter_line(line) {
                doc.parameters
                    .insert(name.to_string(), description.to_string());
            }
        }
        doc
    }

    /// Returns the description recorded for `name`, if any.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Returns `true` when neither a summary nor parameter entries were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.parameters.is_empty()
    }
}

/// Classification of a recovered line against the `- Parameter` pattern.
#[derive(Debug, PartialEq, Eq)]
enum ParameterLine<'a> {
    Entry { name: &'a str, description: &'a str },
    /// Starts like a parameter entry but has no colon or no name.
    Malformed,
    NotParameter,
}

fn parse_parameter_line(line: &str) -> ParameterLine<'_> {
    let Some(rest) = line.strip_prefix('-') else {
        return ParameterLine::NotParameter;
    };
    let rest = rest.trim_start();
    let Some(keyword) = rest.get(..PARAMETER_KEYWORD.len()) else {
        return ParameterLine::NotParameter;
    };
    if !keyword.eq_ignore_ascii_case(PARAMETER_KEYWORD) {
        return ParameterLine::NotParameter;
    }
    let rest = &rest[PARAMETER_KEYWORD.len()..];
    // `- Parameters:` and `- ParameterFoo` are not entries.
    if !rest.starts_with(char::is_whitespace) {
        return ParameterLine::NotParameter;
    }

    let Some((name, description)) = rest.split_once(':') else {
        return ParameterLine::Malformed;
    };
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return ParameterLine::Malformed;
    }
    ParameterLine::Entry {
        name,
        description: description.trim(),
    }
}

/// Appends the doc text of every comment line in `region` to `out`.
///
/// A region without any comment marker is taken as already-stripped doc text.
fn collect_doc_lines(region: &str, out: &mut Vec<String>) {
    let has_markers = region.lines().any(|line| {
        let line = line.trim_start();
        line.starts_with("//") || line.starts_with("/*")
    });
    if !has_markers {
        out.extend(region.lines().map(|line| line.trim().to_string()));
        return;
    }

    let mut block = BlockState::None;

    for raw_line in region.lines() {
        let line = raw_line.trim();

        match block {
            BlockState::Doc | BlockState::Plain => {
                let (body, closed) = match line.find("*/") {
                    Some(end) => (&line[..end], true),
                    None => (line, false),
                };
                if block == BlockState::Doc {
                    out.push(strip_continuation(body).to_string());
                }
                if closed {
                    block = BlockState::None;
                }
                continue;
            }
            BlockState::None => {}
        }

        if let Some(text) = line.strip_prefix("///") {
            // Four or more slashes is an ordinary comment.
            if !text.starts_with('/') {
                out.push(text.trim().to_string());
            }
        } else if let Some(text) = line.strip_prefix("//!") {
            out.push(text.trim().to_string());
        } else if let Some(text) = line.strip_prefix("/**") {
            // `/**/` is an empty plain comment, `/***` a plain ruler.
            if text.starts_with('/') {
                continue;
            }
            if text.starts_with('*') {
                if !text.contains("*/") {
                    block = BlockState::Plain;
                }
                continue;
            }
            match text.find("*/") {
                Some(end) => out.push(text[..end].trim().to_string()),
                None => {
                    out.push(strip_continuation(text).to_string());
                    block = BlockState::Doc;
                }
            }
        } else if let Some(text) = line.strip_prefix("/*") {
            if !text.contains("*/") {
                block = BlockState::Plain;
            }
        }
    }
}

/// Removes a leading `*` continuation marker from a block comment line.
fn strip_continuation(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix('*').unwrap_or(line).trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    None,
    Doc,
    Plain,
}
