use chrono::NaiveDateTime;

use crate::loader::LogSource;
use crate::log_parser::{LogEntry, LogParser};

pub type TabId = u64;

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub entries: Vec<LogEntry>,
}

impl Tab {
    pub fn well_formed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_well_formed()).count()
    }

    /// Earliest and latest header timestamps in the tab.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut stamps = self
            .entries
            .iter()
            .filter_map(|e| e.header.as_ref())
            .filter_map(|h| h.parsed_timestamp());

        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts))))
    }
}

#[derive(Debug, Default)]
pub struct TabSet {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: TabId,
}

impl TabSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one tab per source and activates the first new one. Returns the
    /// number of tabs added.
    pub fn open(&mut self, parser: &LogParser, sources: Vec<LogSource>) -> usize {
        let added = sources.len();
        let mut first_new = None;

        for source in sources {
            let id = self.next_id;
            self.next_id += 1;

            let entries = parser.segment(&source.content);
            log::info!("Opened {} ({} entries)", source.title, entries.len());

            first_new.get_or_insert(id);
            self.tabs.push(Tab {
                id,
                title: source.title,
                entries,
            });
        }

        if let Some(id) = first_new {
            self.active = Some(id);
        }
        added
    }

    /// Removes a tab. Closing the active tab activates the first remaining one.
    pub fn close(&mut self, id: TabId) -> bool {
        let before = self.tabs.len();
        self.tabs.retain(|tab| tab.id != id);
        if self.tabs.len() == before {
            return false;
        }

        if self.active == Some(id) {
            self.active = self.tabs.first().map(|tab| tab.id);
        }
        true
    }

    pub fn activate(&mut self, id: TabId) -> bool {
        if self.tabs.iter().any(|tab| tab.id == id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active(&self) -> Option<&Tab> {
        let id = self.active?;
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}
