//! Control Panel Widget
//! Left side panel with the data source and the analysis toggles and pickers.

use crate::charts::univariate_candidates;
use crate::config::SelectorConfig;
use crate::data::ColumnInfo;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Current sidebar selections
#[derive(Default, Clone, Debug, PartialEq)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub show_univariate: bool,
    pub univariate_col: String,
    pub show_bivariate: bool,
    pub first_col: String,
    pub second_col: String,
}

/// Left side control panel with file selection and column pickers.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub columns: Vec<ColumnInfo>,
    pub univariate_options: Vec<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            columns: Vec::new(),
            univariate_options: Vec::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available columns after CSV load. Pickers default to the first option.
    pub fn update_columns(&mut self, columns: Vec<ColumnInfo>, selector: &SelectorConfig) {
        self.univariate_options = univariate_candidates(&columns, selector)
            .into_iter()
            .map(|c| c.name.clone())
            .collect();

        let first = columns.first().map(|c| c.name.clone()).unwrap_or_default();
        self.settings.univariate_col = self.univariate_options.first().cloned().unwrap_or_default();
        self.settings.first_col = first.clone();
        self.settings.second_col = first;
        self.columns = columns;
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    fn column_picker(ui: &mut egui::Ui, id: &str, selected: &mut String, options: &[String]) -> bool {
        let mut changed = false;
        ComboBox::from_id_salt(id)
            .width(200.0)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for option in options {
                    let is_selected = *selected == *option;
                    if ui.selectable_label(is_selected, option).clicked() && !is_selected {
                        *selected = option.clone();
                        changed = true;
                    }
                }
            });
        changed
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚢 Titanic EDA")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let has_columns = !self.columns.is_empty();

        // ===== Univariate Section =====
        ui.add_enabled_ui(has_columns, |ui| {
            if ui
                .checkbox(&mut self.settings.show_univariate, "Show Univariate Analysis")
                .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }

            if self.settings.show_univariate {
                ui.add_space(5.0);
                ui.label("Select a column for univariate analysis");
                if Self::column_picker(
                    ui,
                    "univariate_col",
                    &mut self.settings.univariate_col,
                    &self.univariate_options,
                ) {
                    action = ControlPanelAction::SelectionChanged;
                }
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            // ===== Bivariate Section =====
            if ui
                .checkbox(&mut self.settings.show_bivariate, "Show Bivariate Analysis")
                .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }

            if self.settings.show_bivariate {
                let names: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
                ui.add_space(5.0);
                ui.label("Select first column");
                if Self::column_picker(ui, "first_col", &mut self.settings.first_col, &names) {
                    action = ControlPanelAction::SelectionChanged;
                }
                ui.add_space(5.0);
                ui.label("Select second column");
                if Self::column_picker(ui, "second_col", &mut self.settings.second_col, &names) {
                    action = ControlPanelAction::SelectionChanged;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ValueKind;

    #[test]
    fn update_columns_filters_univariate_options() {
        let mut panel = ControlPanel::new();
        panel.update_columns(
            vec![
                ColumnInfo::new("PassengerId", ValueKind::Numeric),
                ColumnInfo::new("Survived", ValueKind::Numeric),
                ColumnInfo::new("Sex", ValueKind::Categorical),
                ColumnInfo::new("Cabin", ValueKind::Categorical),
            ],
            &SelectorConfig::default(),
        );

        assert_eq!(panel.univariate_options, vec!["Survived", "Sex"]);
        assert_eq!(panel.settings.univariate_col, "Survived");
        assert_eq!(panel.settings.first_col, "PassengerId");
        assert_eq!(panel.settings.second_col, "PassengerId");
        assert_eq!(panel.columns.len(), 4);
    }
}
