use std::fmt;
use std::str::FromStr;

use crate::log_parser::{LogEntry, LogLevel};

/// Style class of a rendered span; the palette maps each one to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Timestamp,
    Info,
    Warn,
    Error,
    Label,
    Message,
    Default,
}

impl From<LogLevel> for Style {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => Style::Info,
            LogLevel::Warn => Style::Warn,
            LogLevel::Error => Style::Error,
            LogLevel::Other(_) => Style::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Index of the owning entry in the sequence passed to [`render`].
    pub entry_index: usize,
    /// 1-based line in the source text.
    pub line_number: usize,
    pub spans: Vec<Span>,
}

impl DisplayLine {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Only(char),
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ALL") {
            return Ok(LevelFilter::All);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(LevelFilter::Only(c)),
            _ => Err(format!(
                "invalid level '{s}': expected ALL or a single level character such as I, W or E"
            )),
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("ALL"),
            LevelFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

/// Label filter. Matching is a case-insensitive substring test, so any
/// string is accepted, not just the labels offered in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LabelFilter {
    #[default]
    All,
    Contains(String),
}

impl LabelFilter {
    pub fn contains(label: &str) -> Self {
        LabelFilter::Contains(label.to_string())
    }

    fn matches(&self, label: &str) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Contains(needle) => label.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

impl FromStr for LabelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "ALL" {
            Ok(LabelFilter::All)
        } else {
            Ok(LabelFilter::contains(s))
        }
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFilter::All => f.write_str("ALL"),
            LabelFilter::Contains(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub level: LevelFilter,
    pub label: LabelFilter,
    pub reverse: bool,
}

impl FilterCriteria {
    /// Entries without a header never match.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let Some(header) = entry.header.as_ref() else {
            return false;
        };

        let level_ok = match self.level {
            LevelFilter::All => true,
            LevelFilter::Only(c) => header.level.as_char() == c,
        };

        level_ok && self.label.matches(&header.label)
    }
}

/// Retained entries with their original indices, in display order.
pub fn select<'a>(
    entries: &'a [LogEntry],
    criteria: &FilterCriteria,
) -> Vec<(usize, &'a LogEntry)> {
    let mut selected: Vec<(usize, &LogEntry)> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| criteria.matches(entry))
        .collect();

    if criteria.reverse {
        selected.reverse();
    }

    selected
}

pub fn render(entries: &[LogEntry], criteria: &FilterCriteria) -> Vec<DisplayLine> {
    let mut lines = Vec::new();
    // Color of the last header emitted; continuation lines inherit it.
    let mut current = Style::Default;

    for (entry_index, entry) in select(entries, criteria) {
        for (line_idx, line) in entry.lines().enumerate() {
            let spans = match entry.header.as_ref() {
                Some(header) if line_idx == 0 => {
                    current = Style::from(header.level);
                    header_spans(&header.timestamp, header.level, &header.label, &header.message)
                }
                _ => vec![Span::new(line, current)],
            };
            lines.push(DisplayLine {
                entry_index,
                line_number: entry.line_number + line_idx,
                spans,
            });
        }
    }

    lines
}

/// Number of entries behind a rendered sequence.
pub fn entry_count(lines: &[DisplayLine]) -> usize {
    lines
        .iter()
        .enumerate()
        .filter(|(i, line)| *i == 0 || lines[i - 1].entry_index != line.entry_index)
        .count()
}

fn header_spans(timestamp: &str, level: LogLevel, label: &str, message: &str) -> Vec<Span> {
    let level_style = Style::from(level);
    let marker = level.as_char();

    let mut spans = vec![Span::new(format!("{timestamp} "), Style::Timestamp)];
    if level == LogLevel::Error {
        spans.push(Span::new(format!("[{marker}] {label}: {message}"), level_style));
    } else {
        spans.push(Span::new(format!("[{marker}] "), level_style));
        spans.push(Span::new(format!("{label}: "), Style::Label));
        spans.push(Span::new(message, Style::Message));
    }
    spans
}
