//! Settings modal: RPC endpoint (with live TPS) and explorer.

use crate::app::{App, AppState};
use crate::services::RpcOption;
use crate::ui::theme::Theme;
use lib_solana::Explorer;

pub fn rpc_display_name(option: RpcOption) -> &'static str {
    match option {
        RpcOption::Mainnet => "Mainnet Beta",
        RpcOption::Devnet => "Devnet",
        RpcOption::Custom => "Custom",
    }
}

pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    let connection = app.services.connection.clone();
    let active = connection.active_option();

    ui.strong("RPC Endpoint");
    ui.colored_label(theme.dim, "Your connection to the Solana network.");
    ui.add_space(6.0);

    egui::Grid::new("rpc_options")
        .num_columns(3)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            for option in RpcOption::all() {
                let tps = connection.tps(option);
                ui.colored_label(theme.tps_color(tps), tps.label());

                if option == RpcOption::Custom {
                    ui.horizontal(|ui| {
                        ui.colored_label(theme.dim, "https://");
                        let mut custom = state.settings_form.custom_rpc.clone();
                        let response = ui.add_enabled(
                            !state.settings_form.validating_rpc,
                            egui::TextEdit::singleline(&mut custom)
                                .hint_text("your-rpc-endpoint.com")
                                .desired_width(180.0),
                        );
                        if response.changed() {
                            app.state.write().settings_form.custom_rpc = custom
                                .trim_start_matches("https://")
                                .trim_start_matches("http://")
                                .to_string();
                        }
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            app.handle_custom_rpc_submit();
                        }
                        if state.settings_form.validating_rpc {
                            ui.spinner();
                        }
                    });
                } else {
                    ui.label(rpc_display_name(option));
                }

                let is_active = active == option;
                let caption = if is_active { "Connected" } else { "Not connected" };
                let enabled = option != RpcOption::Custom || connection.endpoint_for(option).is_some();
                if ui
                    .add_enabled(enabled, egui::Button::selectable(is_active, caption))
                    .clicked()
                    && !is_active
                {
                    app.handle_rpc_select(option);
                }
                ui.end_row();
            }
        });

    ui.add_space(12.0);
    ui.strong("Explorer");
    ui.colored_label(
        theme.dim,
        "The Solana explorer you'll be redirected to when viewing transactions, accounts, etc.",
    );
    ui.add_space(6.0);

    let current = app.services.settings.explorer();
    egui::ComboBox::from_id_salt("explorer_select")
        .selected_text(current.name())
        .show_ui(ui, |ui| {
            for explorer in Explorer::all() {
                if ui.selectable_label(current == explorer, explorer.name()).clicked() && current != explorer {
                    app.handle_explorer_select(explorer);
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_display_names() {
        let names: Vec<&str> = RpcOption::all().into_iter().map(rpc_display_name).collect();
        assert_eq!(names, vec!["Mainnet Beta", "Devnet", "Custom"]);
    }
}
