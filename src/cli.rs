//! Command-line interface for log-tabs.

use std::path::PathBuf;

use clap::Parser;

use crate::render::{FilterCriteria, LabelFilter, LevelFilter};

/// log-tabs - A tabbed, color-coded log file viewer
#[derive(Parser, Debug)]
#[command(name = "log-tabs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log file (.log) or archive of log files (.zip) to open at start-up
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// JSON configuration file (colors, label list, font size)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Initial level filter: ALL, I, W or E
    #[arg(long, value_name = "LEVEL", default_value = "ALL")]
    pub level: LevelFilter,

    /// Initial label filter (case-insensitive substring, ALL for none)
    #[arg(long, value_name = "LABEL", default_value = "ALL")]
    pub label: LabelFilter,

    /// Show newest entries first
    #[arg(long)]
    pub reverse: bool,

    /// Diagnostic log filter, e.g. info or log_tabs=debug (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn filter_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            level: self.level.clone(),
            label: self.label.clone(),
            reverse: self.reverse,
        }
    }
}
