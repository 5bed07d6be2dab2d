//! # Modals
//!
//! Every open [`Modal`] is drawn each frame in the order it was opened, so
//! the last one opened sits on top. Escape or a click outside closes a modal,
//! except the region notice which only closes through its own button.

pub mod geobanned;
pub mod market_select;
pub mod settings;
pub mod swap_settings;
pub mod token_select;
pub mod wallet;

use crate::app::{App, AppState};
use crate::services::Modal;
use crate::ui::theme::Theme;

const MODAL_WIDTH: f32 = 400.0;

/// Distinct modals in first-opened order.
pub fn stacking_order(open: &[Modal]) -> Vec<Modal> {
    let mut order = Vec::with_capacity(open.len());
    for modal in open {
        if !order.contains(modal) {
            order.push(*modal);
        }
    }
    order
}

fn closable(modal: Modal) -> bool {
    modal != Modal::Geobanned
}

/// Modal frame with a title row and a close button.
fn show_modal(
    ctx: &egui::Context,
    modal: Modal,
    title: &str,
    app: &mut App,
    body: impl FnOnce(&mut egui::Ui, &mut App),
) {
    let mut close_clicked = false;
    let response = egui::Modal::new(egui::Id::new(("modal", modal))).show(ctx, |ui| {
        ui.set_width(MODAL_WIDTH);
        ui.horizontal(|ui| {
            ui.heading(title);
            if closable(modal) {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    close_clicked = ui.button("✕").clicked();
                });
            }
        });
        ui.separator();
        body(ui, app);
    });

    if close_clicked || (closable(modal) && response.should_close()) {
        app.close_modal(modal);
    }
}

pub fn render(ctx: &egui::Context, state: &AppState, app: &mut App, theme: &Theme) {
    for modal in stacking_order(state.modals.open_modals()) {
        match modal {
            Modal::ConnectWallet => {
                show_modal(ctx, modal, "Wallet", app, |ui, app| wallet::render(ui, state, app, theme))
            }
            Modal::Settings => {
                show_modal(ctx, modal, "Settings", app, |ui, app| settings::render(ui, state, app, theme))
            }
            Modal::SwapSettings => show_modal(ctx, modal, "Swap Settings", app, |ui, app| {
                swap_settings::render(ui, state, app, theme)
            }),
            Modal::TokenSelect => show_modal(ctx, modal, state.swap.selecting.title(), app, |ui, app| {
                token_select::render(ui, state, app, theme)
            }),
            Modal::MarketSelect => show_modal(ctx, modal, "Select Market", app, |ui, app| {
                market_select::render(ui, state, app, theme)
            }),
            Modal::Geobanned => show_modal(ctx, modal, "Region not supported", app, |ui, app| {
                geobanned::render(ui, app, theme)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacking_order_dedups() {
        let open = [Modal::Settings, Modal::TokenSelect, Modal::Settings];
        assert_eq!(stacking_order(&open), vec![Modal::Settings, Modal::TokenSelect]);
        assert!(!closable(Modal::Geobanned));
        assert!(closable(Modal::Settings));
    }
}
