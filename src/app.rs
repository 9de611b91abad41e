use eframe::egui;
use std::fs;
use std::path::{Path, PathBuf};
use crate::config::AppConfig;
use crate::error::LoadError;
use crate::loader;
use crate::log_parser::LogParser;
use crate::render::{self, DisplayLine, FilterCriteria, LabelFilter, LevelFilter};
use crate::tabs::{TabId, TabSet};

const LEVEL_CHOICES: [(LevelFilter, &str); 4] = [
    (LevelFilter::All, "All Levels"),
    (LevelFilter::Only('I'), "Info"),
    (LevelFilter::Only('W'), "Warn"),
    (LevelFilter::Only('E'), "Error"),
];

pub struct LogViewerApp {
    config: AppConfig,
    parser: LogParser,
    tabs: TabSet,
    criteria: FilterCriteria,

    // Rendered lines of the active tab under the current criteria
    rendered: Vec<DisplayLine>,
    shown_entries: usize,
    needs_render: bool,

    status: Option<String>,
    show_config: bool,
}

impl LogViewerApp {
    pub fn new(config: AppConfig, criteria: FilterCriteria) -> Self {
        Self {
            config,
            parser: LogParser::new(),
            tabs: TabSet::new(),
            criteria,
            rendered: Vec::new(),
            shown_entries: 0,
            needs_render: false,
            status: None,
            show_config: false,
        }
    }

    /// Loads a `.log` file or `.zip` archive, opening one tab per log source.
    pub fn open_path(&mut self, path: &Path) -> Result<usize, LoadError> {
        let sources = loader::load_path(path)?;
        let added = self.tabs.open(&self.parser, sources);

        self.status = if added == 0 {
            log::warn!("No log files found in {}", path.display());
            Some(format!("No {} files found in {}", loader::LOG_SUFFIX, path.display()))
        } else {
            Some(format!("Opened {} tab(s) from {}", added, path.display()))
        };
        self.needs_render = true;
        Ok(added)
    }

    fn open_with_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Log files", &["log", "zip"])
            .pick_file()
        {
            self.open_reporting_errors(&path);
        }
    }

    fn open_reporting_errors(&mut self, path: &Path) {
        if let Err(e) = self.open_path(path) {
            log::error!("Error loading {}: {}", path.display(), e);
            self.status = Some(format!("Error loading {}: {}", path.display(), e));
        }
    }

    fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            log::debug!(
                "Filters changed: level={} label={} reverse={}",
                criteria.level,
                criteria.label,
                criteria.reverse
            );
            self.criteria = criteria;
            self.needs_render = true;
        }
    }

    fn activate_tab(&mut self, id: TabId) {
        if self.tabs.active_id() != Some(id) && self.tabs.activate(id) {
            self.needs_render = true;
        }
    }

    fn close_tab(&mut self, id: TabId) {
        if self.tabs.close(id) {
            self.needs_render = true;
        }
    }

    fn refresh(&mut self) {
        if !self.needs_render {
            return;
        }
        self.rendered = match self.tabs.active() {
            Some(tab) => render::render(&tab.entries, &self.criteria),
            None => Vec::new(),
        };
        self.shown_entries = render::entry_count(&self.rendered);
        self.needs_render = false;
    }

    /// Writes the rendered lines as plain text to `<file name>_filtered.log`
    /// in `dir`, where the file name is the tab title without any archive
    /// directories.
    fn export_filtered(&mut self, dir: &Path) -> Option<PathBuf> {
        let tab = self.tabs.active()?;
        if self.rendered.is_empty() {
            self.status = Some("Nothing to export".to_string());
            return None;
        }

        let content = self
            .rendered
            .iter()
            .map(DisplayLine::text)
            .collect::<Vec<_>>()
            .join("\n");

        let base = Path::new(&tab.title)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("export");
        let export_path = dir.join(format!("{}_filtered.log", base));

        match fs::write(&export_path, content) {
            Ok(()) => {
                log::info!("Exported {} lines to {}", self.rendered.len(), export_path.display());
                self.status = Some(format!("Exported to {}", export_path.display()));
                Some(export_path)
            }
            Err(e) => {
                log::error!("Error exporting to {}: {}", export_path.display(), e);
                self.status = Some(format!("Error exporting: {}", e));
                None
            }
        }
    }

    fn line_job(&self, line: &DisplayLine) -> egui::text::LayoutJob {
        let mut job = egui::text::LayoutJob::default();
        let font_id = egui::FontId::monospace(self.config.font_size);

        // Source line gutter
        job.append(
            &format!("{:6} ", line.line_number),
            0.0,
            egui::TextFormat {
                font_id: font_id.clone(),
                color: egui::Color32::GRAY,
                ..Default::default()
            },
        );
        for span in &line.spans {
            job.append(
                &span.text,
                0.0,
                egui::TextFormat {
                    font_id: font_id.clone(),
                    color: self.config.color_palette.color_for(span.style),
                    ..Default::default()
                },
            );
        }
        job
    }

    fn level_text(level: &LevelFilter) -> String {
        LEVEL_CHOICES
            .iter()
            .find(|(choice, _)| choice == level)
            .map(|(_, text)| text.to_string())
            .unwrap_or_else(|| level.to_string())
    }

    fn label_text(label: &LabelFilter) -> String {
        match label {
            LabelFilter::All => "All Labels".to_string(),
            LabelFilter::Contains(label) => label.clone(),
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        let mut criteria = self.criteria.clone();

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_source("level_filter")
                .selected_text(Self::level_text(&criteria.level))
                .show_ui(ui, |ui| {
                    for (choice, text) in LEVEL_CHOICES.iter() {
                        ui.selectable_value(&mut criteria.level, choice.clone(), *text);
                    }
                });

            egui::ComboBox::from_id_source("label_filter")
                .selected_text(Self::label_text(&criteria.label))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut criteria.label, LabelFilter::All, "All Labels");
                    for label in &self.config.labels {
                        let choice = LabelFilter::contains(label);
                        ui.selectable_value(&mut criteria.label, choice, label.as_str());
                    }
                });

            let order_text = if criteria.reverse { "Oldest First" } else { "Newest First" };
            if ui.button(order_text).clicked() {
                criteria.reverse = !criteria.reverse;
            }
        });

        self.set_criteria(criteria);
    }

    fn tab_strip_ui(&mut self, ui: &mut egui::Ui) {
        let active = self.tabs.active_id();
        let mut to_activate: Option<TabId> = None;
        let mut to_close: Option<TabId> = None;

        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for tab in self.tabs.iter() {
                    if ui.selectable_label(active == Some(tab.id), tab.title.as_str()).clicked() {
                        to_activate = Some(tab.id);
                    }
                    if ui.small_button("×").on_hover_text("Close tab").clicked() {
                        to_close = Some(tab.id);
                    }
                    ui.separator();
                }
            });
        });

        if let Some(id) = to_activate {
            self.activate_tab(id);
        }
        if let Some(id) = to_close {
            self.close_tab(id);
        }
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(tab) = self.tabs.active() {
                ui.label(format!(
                    "Entries: {} / {}",
                    self.shown_entries,
                    tab.well_formed_count()
                ));

                if let Some((first, last)) = tab.time_span() {
                    ui.separator();
                    let span = last - first;
                    ui.label(format!(
                        "{} to {} ({}s)",
                        first.format("%Y-%m-%d %H:%M:%S"),
                        last.format("%Y-%m-%d %H:%M:%S"),
                        span.num_seconds()
                    ));
                }
            }

            if let Some(ref status) = self.status {
                ui.separator();
                ui.label(status.as_str());
            }
        });
    }

    fn config_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Color Configuration");
        ui.separator();

        ui.label("Style Colors:");
        for (name, color) in self.config.color_palette.entries_mut() {
            ui.horizontal(|ui| {
                ui.color_edit_button_srgba(color);
                ui.label(name);
            });
        }

        ui.separator();
        ui.add(egui::Slider::new(&mut self.config.font_size, 8.0..=24.0).text("Font size"));
    }
}

impl eframe::App for LogViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("📁 Open File...").clicked() {
                        self.open_with_dialog();
                        ui.close_menu();
                    }

                    if ui.button("Close Tab").clicked() {
                        if let Some(id) = self.tabs.active_id() {
                            self.close_tab(id);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Export Filtered").clicked() {
                        self.refresh();
                        self.export_filtered(Path::new("."));
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_config, "Show Configuration");
                });
            });
        });

        // Filters, file picker and tabs
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("📁 Open File").clicked() {
                    self.open_with_dialog();
                }
                ui.separator();
                self.controls_ui(ui);
            });
            ui.separator();
            self.tab_strip_ui(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_ui(ui);
        });

        if self.show_config {
            egui::SidePanel::left("config_panel").show(ctx, |ui| {
                self.config_ui(ui);
            });
        }

        self.refresh();

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.tabs.active().is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("No file selected.");
                });
                return;
            }
            if self.rendered.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No entries match the current filters.");
                });
                return;
            }

            let font_id = egui::FontId::monospace(self.config.font_size);
            let row_height = ui.fonts(|f| f.row_height(&font_id));
            egui::ScrollArea::both()
                .auto_shrink([false; 2])
                .show_rows(ui, row_height, self.rendered.len(), |ui, range| {
                    for line in &self.rendered[range] {
                        ui.add(egui::Label::new(self.line_job(line)).wrap(false));
                    }
                });
        });
    }
}
