//! # Slippage Tolerance Selector Widget
//!
//! Preset slippage buttons plus a free-form percentage field. The custom
//! value is applied when the field loses focus or Enter is pressed.

use crate::app::{App, AppState};
use crate::services::settings::{SwapSettings, SLIPPAGE_OPTIONS};
use crate::ui::theme::Theme;

/// `0.005` -> `"0.5%"`
pub fn slippage_label(slippage: f64) -> String {
    format!("{}%", (slippage * 1000.0).round() / 10.0)
}

/// Whether `slippage` is one of the presets.
pub fn is_preset(slippage: f64) -> bool {
    SLIPPAGE_OPTIONS.iter().any(|option| (option - slippage).abs() < f64::EPSILON)
}

/// Render slippage selector widget
pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, settings: SwapSettings, theme: &Theme) {
    ui.label("Slippage Tolerance");
    ui.horizontal(|ui| {
        for slippage in SLIPPAGE_OPTIONS {
            let selected = (settings.slippage - slippage).abs() < f64::EPSILON;
            if ui.selectable_label(selected, slippage_label(slippage)).clicked() {
                app.handle_slippage_select(slippage);
            }
        }

        let mut custom = state.settings_form.custom_slippage.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut custom)
                .hint_text("Custom")
                .desired_width(60.0),
        );
        ui.label("%");
        if response.changed() {
            app.state.write().settings_form.custom_slippage = custom.clone();
        }
        if response.lost_focus() && !custom.trim().is_empty() {
            app.handle_custom_slippage_submit();
        }
    });

    if !is_preset(settings.slippage) {
        ui.colored_label(theme.warning, format!("Custom: {}", slippage_label(settings.slippage)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slippage_labels() {
        assert_eq!(slippage_label(0.001), "0.1%");
        assert_eq!(slippage_label(0.005), "0.5%");
        assert_eq!(slippage_label(0.01), "1%");
        assert!(is_preset(0.01));
        assert!(!is_preset(0.02));
    }
}
