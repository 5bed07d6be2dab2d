//! Token picker for one side of the swap form.
//!
//! Options are the tokens sharing a market with the other side's token,
//! filtered by symbol or name, or by an exact pasted mint.

use crate::app::{App, AppState};
use crate::services::swap::token_options;
use crate::ui::theme::Theme;
use crate::ui::widgets::links;
use lib_solana::Token;

pub fn matches_search(token: &Token, query: &str) -> bool {
    let lower = query.to_lowercase();
    token.symbol.to_lowercase().contains(&lower)
        || token.name.to_lowercase().contains(&lower)
        || token.mint.to_string() == query
}

pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    let snapshot = app.services.exchange.snapshot();
    let explorer = app.services.settings.explorer();
    let cluster = app.services.connection.cluster();

    let mut search = state.token_search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("Search by name, symbol or paste token mint")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        app.state.write().token_search = search;
    }
    ui.add_space(8.0);

    let current = state.swap.selecting_token().map(|t| t.mint);
    let options: Vec<Token> = token_options(&snapshot.markets, &snapshot.tokens, state.swap.counterpart_token())
        .into_iter()
        .filter(|t| matches_search(t, &state.token_search))
        .collect();

    if options.is_empty() {
        crate::ui::widgets::tables::render_empty_state(ui, "No tokens found", None, theme);
        return;
    }

    let mut chosen = None;
    egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
        for token in &options {
            ui.horizontal(|ui| {
                let label = egui::RichText::new(format!("{}  {}", token.symbol, token.name));
                if ui.selectable_label(current == Some(token.mint), label).clicked() {
                    chosen = Some(token.clone());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    links::token_link(ui, &token.mint.to_string(), explorer, cluster);
                });
            });
        }
    });

    if let Some(token) = chosen {
        app.handle_token_select(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_search_by_symbol_name_or_exact_mint() {
        let mint = Pubkey::new_unique();
        let token = Token {
            name: "Wrapped SOL".to_string(),
            symbol: "wSOL".to_string(),
            mint,
            logo_uri: None,
        };
        assert!(matches_search(&token, ""));
        assert!(matches_search(&token, "wsol"));
        assert!(matches_search(&token, "wrapped"));
        assert!(matches_search(&token, &mint.to_string()));
        assert!(!matches_search(&token, &mint.to_string()[..8]));
        assert!(!matches_search(&token, "usdc"));
    }
}
