//! # Navigation Bar
//!
//! Top bar: brand, route buttons, then settings, theme toggle and the wallet
//! button on the right.

use crate::app::{App, AppState, Screen};
use crate::services::{Modal, ThemeMode, WalletStatus};
use crate::ui::theme::Theme;
use lib_utils::format_pubkey;

/// Wallet button caption.
pub fn wallet_label(status: &WalletStatus) -> String {
    match status.pubkey() {
        Some(pubkey) => format_pubkey(&pubkey.to_string(), 4),
        None => "Connect wallet".to_string(),
    }
}

pub fn render_nav_bar(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.set_height(36.0);
        ui.colored_label(theme.selected, egui::RichText::new("PHOENIX").strong().size(16.0));
        ui.add_space(16.0);

        for screen in Screen::all() {
            let selected = state.current_screen == *screen;
            if ui.selectable_label(selected, screen.title()).clicked() && !selected {
                app.handle_screen_change(*screen);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(wallet_label(&state.wallet)).clicked() {
                app.open_modal(Modal::ConnectWallet);
            }

            let theme_icon = match theme.mode {
                ThemeMode::Dark => "☀",
                ThemeMode::Light => "🌙",
            };
            if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                app.handle_theme_toggle();
            }

            if ui.button("⚙").on_hover_text("Settings").clicked() {
                app.open_modal(Modal::Settings);
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_wallet_label() {
        assert_eq!(wallet_label(&WalletStatus::Disconnected), "Connect wallet");
        let pubkey = Pubkey::new_unique();
        let label = wallet_label(&WalletStatus::Connected(pubkey));
        assert!(label.contains("..."));
        assert!(pubkey.to_string().starts_with(&label[..4]));
    }
}
