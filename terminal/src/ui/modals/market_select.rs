//! Market picker for the data screen.

use crate::app::{App, AppState};
use crate::ui::theme::Theme;
use lib_solana::Market;
use solana_sdk::pubkey::Pubkey;

/// Name contains the query (case-insensitive) or the address equals it.
pub fn matches_search(market: &Market, query: &str) -> bool {
    market.name.to_lowercase().contains(&query.to_lowercase()) || market.address.to_string() == query
}

pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    let snapshot = app.services.exchange.snapshot();
    let current = app.services.exchange.selected_market().map(|m| m.address);

    let mut search = state.market_search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("Search by name or paste market address")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        app.state.write().market_search = search;
    }
    ui.add_space(8.0);

    let mut chosen: Option<Pubkey> = None;
    let mut any = false;
    egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
        for market in snapshot.markets.iter().filter(|m| matches_search(m, &state.market_search)) {
            any = true;
            let selected = current == Some(market.address);
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(selected, egui::RichText::new(&market.name).strong())
                    .clicked()
                {
                    chosen = Some(market.address);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(theme.dim, format!("fee {} bps", market.taker_fee_bps));
                });
            });
        }
    });

    if !any {
        crate::ui::widgets::tables::render_empty_state(ui, "No markets found", None, theme);
    }
    if let Some(address) = chosen {
        app.handle_market_select(address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    #[test]
    fn test_market_search() {
        let (markets, _) = fixtures::sample_markets();
        let market = &markets[1];
        assert!(matches_search(market, "sol/usdc"));
        assert!(matches_search(market, &market.address.to_string()));
        assert!(!matches_search(market, "bonk"));
    }
}
