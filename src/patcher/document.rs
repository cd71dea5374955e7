//! Line-oriented edits on `key = value` documents.
//!
//! Every edit returns a new [`ConfigDocument`]; the input is never mutated.
//! Only the first line matching `^key\s*=` is replaced. Later duplicates are
//! left alone, so a document that already repeats a key keeps repeating it.

use std::fmt;
use std::ops::Range;

use regex::Regex;

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Rendered as a double-quoted string.
    Quoted(String),
    /// Rendered verbatim (`true`, `17000`, `["0xabc"]`).
    Literal(String),
}

impl Value {
    pub fn literal(raw: impl Into<String>) -> Self {
        Value::Literal(raw.into())
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::Quoted(raw.to_string())
    }
}

impl From<String> for Value {
    fn from(raw: String) -> Self {
        Value::Quoted(raw)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Quoted(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Value::Literal(s) => f.write_str(s),
        }
    }
}

/// An ordered list of lines plus the source's line terminator and whether it
/// ended with one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    lines: Vec<String>,
    trailing_newline: bool,
    crlf: bool,
}

impl ConfigDocument {
    /// Split `text` into lines. The terminator of the first line (`\r\n` or
    /// `\n`) is used for every line on render.
    pub fn parse(text: &str) -> Self {
        let crlf = text
            .find('\n')
            .is_some_and(|idx| text[..idx].ends_with('\r'));
        Self {
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
            crlf,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_ending(&self) -> &'static str {
        if self.crlf {
            "\r\n"
        } else {
            "\n"
        }
    }

    pub fn render(&self) -> String {
        let eol = self.line_ending();
        let mut out = self.lines.join(eol);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(eol);
        }
        out
    }

    /// Replace the first `key = …` line, or append one at the end.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Self {
        let line = assignment(key, &value.into());
        let mut lines = self.lines.clone();
        match lines.iter().position(|l| is_assignment_of(l, key)) {
            Some(idx) => lines[idx] = line,
            None => lines.push(line),
        }
        self.with_lines(lines)
    }

    /// Set a key in the preamble before the first `[section]` header.
    ///
    /// A missing key goes after the preamble's last non-blank line so it never
    /// lands inside a table. Without any header this behaves like
    /// [`set`](Self::set) except that trailing blank lines stay last.
    pub fn set_top_level(&self, key: &str, value: impl Into<Value>) -> Self {
        let preamble_end = self
            .lines
            .iter()
            .position(|l| l.starts_with('['))
            .unwrap_or(self.lines.len());
        let mut lines = self.lines.clone();
        upsert(&mut lines, 0..preamble_end, key, assignment(key, &value.into()));
        self.with_lines(lines)
    }

    /// Same as [`set`](Self::set) but confined to one section.
    ///
    /// The section starts at the first header line matching `section` and ends
    /// before the next line that begins with `[`. A missing key is inserted
    /// after the section's last non-blank line. Returns `None` when no header
    /// matches.
    pub fn set_in_section(
        &self,
        section: &Regex,
        key: &str,
        value: impl Into<Value>,
    ) -> Option<Self> {
        let (start, end) = self.section_bounds(section)?;
        let mut lines = self.lines.clone();
        upsert(&mut lines, start + 1..end, key, assignment(key, &value.into()));
        Some(self.with_lines(lines))
    }

    /// Index of the matching header and the exclusive end of its body.
    pub fn section_bounds(&self, section: &Regex) -> Option<(usize, usize)> {
        let start = self
            .lines
            .iter()
            .position(|l| l.starts_with('[') && section.is_match(l))?;
        let end = self.lines[start + 1..]
            .iter()
            .position(|l| l.starts_with('['))
            .map_or(self.lines.len(), |offset| start + 1 + offset);
        Some((start, end))
    }

    fn with_lines(&self, lines: Vec<String>) -> Self {
        Self {
            lines,
            trailing_newline: self.trailing_newline,
            crlf: self.crlf,
        }
    }
}

/// Replace the first assignment of `key` within `region`, or insert `line`
/// after the region's last non-blank line.
fn upsert(lines: &mut Vec<String>, region: Range<usize>, key: &str, line: String) {
    match region.clone().find(|&i| is_assignment_of(&lines[i], key)) {
        Some(idx) => lines[idx] = line,
        None => {
            let insert_at = region
                .clone()
                .rev()
                .find(|&i| !lines[i].trim().is_empty())
                .map_or(region.start, |i| i + 1);
            lines.insert(insert_at, line);
        }
    }
}

/// Pattern matching the `[name]` header line for a dotted section name.
pub fn section_pattern(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"^\[\s*{}\s*\]\s*(#.*)?$", regex::escape(name)))
}

fn assignment(key: &str, value: &Value) -> String {
    format!("{} = {}", key, value)
}

/// `^key\s*=`
fn is_assignment_of(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}
