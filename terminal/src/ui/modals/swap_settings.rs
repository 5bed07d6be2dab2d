//! Swap settings modal: priority fee and slippage.

use crate::app::{App, AppState};
use crate::services::settings::PRIORITY_FEE_OPTIONS;
use crate::ui::theme::Theme;
use crate::ui::widgets::slippage_selector;

pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    let settings = app.services.settings.swap_settings();

    ui.strong("Priority Fee");
    ui.colored_label(
        theme.dim,
        "The amount of SOL you are willing to pay to get your transaction confirmed faster.",
    );
    ui.horizontal(|ui| {
        for (label, fee) in PRIORITY_FEE_OPTIONS {
            let selected = (settings.priority_fee - fee).abs() < f64::EPSILON;
            if ui.selectable_label(selected, label).on_hover_text(format!("{} SOL", fee)).clicked() {
                app.handle_priority_fee_select(fee);
            }
        }
    });

    ui.add_space(12.0);
    ui.strong("Slippage");
    ui.colored_label(
        theme.dim,
        "The most you'll tolerate your received amount differing from the estimate.",
    );
    slippage_selector::render(ui, state, app, settings, theme);
}
