use chrono::NaiveDateTime;
use regex::Regex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Other(char),
}

impl LogLevel {
    pub fn from_char(c: char) -> Self {
        match c {
            'I' => LogLevel::Info,
            'W' => LogLevel::Warn,
            'E' => LogLevel::Error,
            other => LogLevel::Other(other),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            LogLevel::Info => 'I',
            LogLevel::Warn => 'W',
            LogLevel::Error => 'E',
            LogLevel::Other(c) => *c,
        }
    }
}

/// Fields captured from a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub timestamp: String,
    pub level: LogLevel,
    pub label: String,
    pub message: String,
}

impl Header {
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

/// One header line plus the continuation lines that follow it.
///
/// Text appearing before the first header of a file forms an entry with
/// `header == None`; such entries are kept so no input line is lost, but
/// they never pass a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub line_number: usize,
    pub header: Option<Header>,
    pub first_line: String,
    pub continuation: Vec<String>,
}

impl LogEntry {
    pub fn is_well_formed(&self) -> bool {
        self.header.is_some()
    }

    /// Every source line of the entry, in file order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let rest = self.continuation.iter().map(String::as_str);
        std::iter::once(self.first_line.as_str()).chain(rest)
    }
}

pub struct LogParser {
    header_regex: Regex,
}

impl LogParser {
    pub fn new() -> Self {
        // Header format: YYYY-MM-DD HH:MM:SS.mmm [L] Label: message
        let header_pattern = concat!(
            r"^([0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3})",
            r" \[(.)\] ([A-Za-z0-9_]+): (.*)$",
        );

        Self {
            header_regex: Regex::new(header_pattern).expect("header pattern is a valid regex"),
        }
    }

    pub fn parse_header(&self, line: &str) -> Option<Header> {
        let caps = self.header_regex.captures(line)?;
        let level = caps.get(2)?.as_str().chars().next()?;

        Some(Header {
            timestamp: caps.get(1)?.as_str().to_string(),
            level: LogLevel::from_char(level),
            label: caps.get(3)?.as_str().to_string(),
            message: caps.get(4)?.as_str().to_string(),
        })
    }

    /// Splits raw text into entries. Never fails; empty input gives no entries.
    ///
    /// Lines come from `str::lines`: `\r\n` ends a line and a final newline
    /// does not add an empty continuation line.
    pub fn segment(&self, content: &str) -> Vec<LogEntry> {
        let mut entries = Vec::new();
        let mut current: Option<LogEntry> = None;

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;

            if let Some(header) = self.parse_header(line) {
                if let Some(done) = current.take() {
                    entries.push(done);
                }
                current = Some(LogEntry {
                    line_number,
                    header: Some(header),
                    first_line: line.to_string(),
                    continuation: Vec::new(),
                });
                continue;
            }

            match current.as_mut() {
                Some(entry) => entry.continuation.push(line.to_string()),
                // Leading text before any header
                None => {
                    current = Some(LogEntry {
                        line_number,
                        header: None,
                        first_line: line.to_string(),
                        continuation: Vec::new(),
                    })
                }
            }
        }

        if let Some(done) = current {
            entries.push(done);
        }

        entries
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "2024-01-01 10:00:00.000 [I] Sync: started\n\
                          retrying\n\
                          2024-01-01 10:00:01.500 [E] Sync: failed";

    fn is_header(parser: &LogParser, line: &str) -> bool {
        parser.parse_header(line).is_some()
    }

    #[test]
    fn parses_header_fields() {
        let parser = LogParser::new();
        let header = parser
            .parse_header("2024-01-01 10:00:00.000 [W] AccessibilityService: service: slow")
            .unwrap();

        assert_eq!(header.timestamp, "2024-01-01 10:00:00.000");
        assert_eq!(header.level, LogLevel::Warn);
        assert_eq!(header.label, "AccessibilityService");
        assert_eq!(header.message, "service: slow");
    }

    #[test]
    fn rejects_near_miss_headers() {
        let parser = LogParser::new();
        // two-digit millis
        assert!(!is_header(&parser, "2024-01-01 10:00:00.00 [I] Sync: x"));
        // two-char level
        assert!(!is_header(&parser, "2024-01-01 10:00:00.000 [II] Sync: x"));
        // missing space after colon
        assert!(!is_header(&parser, "2024-01-01 10:00:00.000 [I] Sync:x"));
        // not anchored
        assert!(!is_header(&parser, " 2024-01-01 10:00:00.000 [I] Sync: x"));
        // label must be word characters
        assert!(!is_header(&parser, "2024-01-01 10:00:00.000 [I] Sync-Manager: x"));
        // empty message is allowed
        assert!(is_header(&parser, "2024-01-01 10:00:00.000 [I] Sync: "));
    }

    #[test]
    fn unknown_level_is_accepted() {
        let parser = LogParser::new();
        let header = parser.parse_header("2024-01-01 10:00:00.000 [D] Sync: debug").unwrap();
        assert_eq!(header.level, LogLevel::Other('D'));
        assert_eq!(header.level.as_char(), 'D');
    }

    #[test]
    fn segments_sample_into_two_entries() {
        let entries = LogParser::new().segment(SAMPLE);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].continuation, vec!["retrying".to_string()]);
        assert_eq!(entries[0].line_number, 1);
        assert!(entries[1].continuation.is_empty());
        assert_eq!(entries[1].line_number, 3);
        assert_eq!(entries[1].header.as_ref().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn empty_input_has_no_entries() {
        assert!(LogParser::new().segment("").is_empty());
    }

    #[test]
    fn text_without_headers_is_one_unheaded_entry() {
        let entries = LogParser::new().segment("just\nsome\ntext");

        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_well_formed());
        assert_eq!(entries[0].lines().count(), 3);
    }

    #[test]
    fn leading_text_forms_its_own_entry() {
        let content = "boot banner\n2024-01-01 10:00:00.000 [I] Global: up\n  at frame";
        let entries = LogParser::new().segment(content);

        assert_eq!(entries.len(), 2);
        assert!(entries[0].header.is_none());
        assert_eq!(entries[0].first_line, "boot banner");
        assert_eq!(entries[1].header.as_ref().unwrap().label, "Global");
        assert_eq!(entries[1].continuation, vec!["  at frame".to_string()]);
    }

    #[test]
    fn segmentation_keeps_every_line_in_order() {
        let content = "orphan\n\
                       2024-01-01 10:00:00.000 [I] A: one\nx\n\ny\n\
                       2024-01-01 10:00:00.001 [W] B: two\n\
                       2024-01-01 10:00:00.002 [E] C: three\nz";
        let entries = LogParser::new().segment(content);

        let rebuilt: Vec<&str> = entries.iter().flat_map(|e| e.lines()).collect();
        let original: Vec<&str> = content.lines().collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn well_formed_count_equals_header_lines() {
        let parser = LogParser::new();
        let content = "noise\n\
                       2024-01-01 10:00:00.000 [I] A: one\n\
                       2024-01-01 10:00:00.001 [I] A: two\ntrace\n\
                       2024-01-01 10:00:00.002 [X] B: three";
        let headers = content.lines().filter(|l| is_header(&parser, l)).count();
        let well_formed = parser.segment(content).iter().filter(|e| e.is_well_formed()).count();

        assert_eq!(headers, 3);
        assert_eq!(well_formed, headers);
    }

    #[test]
    fn crlf_line_endings_still_match_headers() {
        let entries = LogParser::new().segment("2024-01-01 10:00:00.000 [I] Sync: a\r\nmore\r\n");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].header.as_ref().unwrap().message, "a");
        assert_eq!(entries[0].continuation, vec!["more".to_string()]);
    }

    #[test]
    fn final_newline_adds_no_empty_line() {
        let parser = LogParser::new();

        let plain = parser.segment("a\n");
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].lines().collect::<Vec<_>>(), vec!["a"]);

        let entries = parser.segment("2024-01-01 10:00:00.000 [I] Sync: a\n");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].continuation.is_empty());
    }

    #[test]
    fn timestamp_parses_with_millis() {
        let header = LogParser::new()
            .parse_header("2024-03-05 07:08:09.123 [I] Sync: x")
            .unwrap();
        let ts = header.parsed_timestamp().unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2024-03-05 07:08:09.123");
    }
}
