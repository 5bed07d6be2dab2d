//! # Landing Screen
//!
//! Headline, the two entry points, and a link to the program source.

use crate::app::{App, AppState, Screen};
use crate::ui::theme::Theme;
use tracing::warn;

pub const SOURCE_URL: &str = "https://github.com/Ellipsis-Labs/phoenix-v1";

pub fn render(ui: &mut egui::Ui, _state: &AppState, app: &mut App, theme: &Theme) {
    ui.vertical_centered(|ui| {
        ui.add_space(120.0);
        ui.label(egui::RichText::new("The liquidity backbone of DeFi.").size(40.0).strong());
        ui.add_space(12.0);
        ui.colored_label(
            theme.dim,
            egui::RichText::new("Fully on-chain, non-custodial, and crankless.").size(18.0),
        );
        ui.add_space(32.0);

        ui.horizontal(|ui| {
            // Center the button row
            let width = 360.0;
            ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
            if ui
                .add_sized([110.0, 36.0], egui::Button::new(egui::RichText::new("Swap").strong()))
                .clicked()
            {
                app.handle_screen_change(Screen::Swap);
            }
            if ui.add_sized([110.0, 36.0], egui::Button::new("Data")).clicked() {
                app.handle_screen_change(Screen::Data);
            }
            if ui.add_sized([120.0, 36.0], egui::Button::new("Read the code ↗")).clicked() {
                if let Err(e) = open::that(SOURCE_URL) {
                    warn!(url = SOURCE_URL, error = %e, "Failed to open browser");
                }
            }
        });
    });
}
