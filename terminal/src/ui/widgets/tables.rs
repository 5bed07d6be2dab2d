//! # Table Components
//!
//! Grid tables for the data screen's small panels (top makers, top trades,
//! market accounts). The fills table uses `egui_extras` directly.

use crate::ui::theme::Theme;

/// Configuration for table styling
pub struct TableConfig {
    pub num_columns: usize,
    pub spacing: [f32; 2],
    pub striped: bool,
}

impl TableConfig {
    pub fn columns(num_columns: usize) -> Self {
        Self {
            num_columns,
            ..Self::default()
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_columns: 2,
            spacing: [12.0, 5.0],
            striped: true,
        }
    }
}

/// Render a grid with an optional header row; rows come from the callback.
pub fn render_table<F>(ui: &mut egui::Ui, id: &str, config: TableConfig, headers: &[&str], theme: &Theme, render_rows: F)
where
    F: FnOnce(&mut egui::Ui),
{
    egui::Grid::new(id)
        .num_columns(config.num_columns)
        .spacing(config.spacing)
        .striped(config.striped)
        .show(ui, |ui| {
            if !headers.is_empty() {
                for header in headers {
                    ui.colored_label(theme.dim, *header);
                }
                ui.end_row();
            }
            render_rows(ui);
        });
}

/// Placeholder shown while a dataset is empty or still loading.
pub fn render_empty_state(ui: &mut egui::Ui, primary_text: &str, secondary_text: Option<&str>, theme: &Theme) {
    ui.vertical_centered(|ui| {
        ui.add_space(20.0);
        ui.colored_label(theme.dim, primary_text);
        if let Some(secondary) = secondary_text {
            ui.add_space(6.0);
            ui.colored_label(theme.dim, secondary);
        }
        ui.add_space(20.0);
    });
}

/// Panel heading with an optional right-aligned note (`"MAX 5"`).
pub fn render_panel_header(ui: &mut egui::Ui, title: &str, note: Option<&str>, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.strong(title);
        if let Some(note) = note {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(theme.dim, note);
            });
        }
    });
    ui.separator();
}
