//! # Swap Screen
//!
//! Single-market swap form: quick swap command, "You pay" with max and token
//! picker, flip, "You receive" with the expected output, and the swap button.

use crate::app::handlers::swap::{expected_out, swap_button_disabled};
use crate::app::{App, AppState, TokenSlot};
use crate::services::{ClientState, Modal};
use crate::ui::theme::Theme;
use crate::ui::widgets::slippage_selector::slippage_label;
use lib_solana::Token;
use lib_utils::format_number;

const FORM_WIDTH: f32 = 420.0;

fn token_button(ui: &mut egui::Ui, token: Option<&Token>, enabled: bool) -> egui::Response {
    let label = token.map(|t| format!("{} ⏷", t.symbol)).unwrap_or_else(|| "Select ⏷".to_string());
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new(label).strong()))
}

/// Swap button caption for the current wallet and loading state.
pub fn swap_button_label(state: &AppState, client_loading: bool) -> &'static str {
    if client_loading || state.swap.is_sending {
        "Loading..."
    } else if state.wallet.is_connected() {
        "Swap"
    } else {
        "Connect wallet"
    }
}

pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    let client_state = app.services.exchange.state();
    let client_ready = client_state.is_ready();
    let client_loading = matches!(client_state, ClientState::Loading | ClientState::Uninitialized);
    let snapshot = app.services.exchange.snapshot();
    let market = app.services.exchange.selected_market();
    let settings = app.services.settings.swap_settings();

    let form = &state.swap;
    let expected = market.as_ref().map(|m| expected_out(form, m)).unwrap_or(0.0);
    let busy = client_loading || form.is_sending;

    ui.vertical_centered(|ui| {
        ui.set_max_width(FORM_WIDTH);
        ui.add_space(32.0);

        if let ClientState::Failed(reason) = &client_state {
            ui.colored_label(theme.error, reason.as_str());
            ui.add_space(8.0);
        }

        // Quick swap
        let mut command = form.quick_command.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut command)
                .hint_text("Try \"5 wSOL to USDC\"")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            let mut state = app.state.write();
            state.swap.quick_command = command;
            state.swap.quick_error = None;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            app.handle_quick_swap_submit();
        }
        if let Some(error) = &form.quick_error {
            ui.colored_label(theme.error, error.as_str());
        }
        ui.add_space(8.0);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(format!("⚙ {}", slippage_label(settings.slippage))).clicked() {
                app.open_modal(Modal::SwapSettings);
            }
        });

        egui::Frame::group(ui.style()).inner_margin(egui::Margin::same(16)).show(ui, |ui| {
            ui.set_width(ui.available_width());

            // You pay
            ui.horizontal(|ui| {
                ui.strong(TokenSlot::In.title());
                if let (Some(trader), Some(token)) = (&snapshot.trader, &form.in_token) {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(!busy, egui::Button::new("MAX").small()).clicked() {
                            app.handle_max_amount();
                        }
                        ui.colored_label(theme.dim, format_number(trader.balance(&token.mint), 4, false));
                    });
                }
            });
            ui.horizontal(|ui| {
                if token_button(ui, form.in_token.as_ref(), !busy).clicked() {
                    app.open_token_select(TokenSlot::In);
                }
                let editable = !busy && state.wallet.is_connected() && form.in_token.is_some();
                let mut amount = form.in_amount.clone();
                let text_color = if form.was_error { theme.error } else { theme.normal };
                let response = ui.add_enabled(
                    editable,
                    egui::TextEdit::singleline(&mut amount)
                        .hint_text("0.00")
                        .text_color(text_color)
                        .desired_width(f32::INFINITY)
                        .horizontal_align(egui::Align::RIGHT),
                );
                if response.changed() {
                    let mut state = app.state.write();
                    state.swap.in_amount = amount;
                    state.swap.was_error = false;
                }
            });

            ui.add_space(4.0);
            ui.vertical_centered(|ui| {
                let can_flip = !busy && form.in_token.is_some() && form.out_token.is_some();
                if ui.add_enabled(can_flip, egui::Button::new("⇅")).clicked() {
                    app.handle_flip();
                }
            });
            ui.add_space(4.0);

            // You receive
            ui.strong(TokenSlot::Out.title());
            ui.horizontal(|ui| {
                if token_button(ui, form.out_token.as_ref(), !busy).clicked() {
                    app.open_token_select(TokenSlot::Out);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let shown = if form.is_sending { form.sent_out_amount } else { expected };
                    if shown > 0.0 {
                        ui.label(egui::RichText::new(format_number(shown, 4, false)).size(20.0).strong());
                    }
                });
            });
        });

        ui.add_space(16.0);
        let disabled = swap_button_disabled(state, client_ready, expected);
        let button = egui::Button::new(egui::RichText::new(swap_button_label(state, client_loading)).strong().size(16.0))
            .fill(theme.selected)
            .min_size(egui::vec2(ui.available_width(), 40.0));
        if ui.add_enabled(!disabled, button).clicked() {
            app.handle_swap_execute_click();
        }

        if let Some(market) = &market {
            ui.add_space(8.0);
            ui.colored_label(
                theme.dim,
                format!("{} · taker fee {}%", market.name, market.taker_fee() * 100.0),
            );
            if let (Some(bid), Some(ask)) = (market.best_bid(), market.best_ask()) {
                ui.colored_label(
                    theme.dim,
                    format!("Bid {} · Ask {}", format_number(bid, 4, false), format_number(ask, 4, false)),
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::WalletStatus;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_swap_button_label() {
        let mut state = AppState::default();
        assert_eq!(swap_button_label(&state, false), "Connect wallet");
        assert_eq!(swap_button_label(&state, true), "Loading...");
        state.wallet = WalletStatus::Connected(Pubkey::new_unique());
        assert_eq!(swap_button_label(&state, false), "Swap");
        state.swap.is_sending = true;
        assert_eq!(swap_button_label(&state, false), "Loading...");
    }
}
