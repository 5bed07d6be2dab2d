//! Shown on mainnet when the user's region may not use the swap form.

use crate::app::App;
use crate::services::geo::BANNED_COUNTRY_CODES;
use crate::ui::theme::Theme;

pub fn render(ui: &mut egui::Ui, app: &mut App, theme: &Theme) {
    ui.label(
        "Looks like you're in an unsupported region, and therefore cannot access our swap interface. \
         You can still view our stats pages.",
    );
    ui.add_space(8.0);
    ui.colored_label(theme.dim, format!("Banned regions: {}", BANNED_COUNTRY_CODES.join(", ")));
    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        if ui.button("Get me out of here").clicked() {
            app.handle_leave_swap();
        }
    });
}
