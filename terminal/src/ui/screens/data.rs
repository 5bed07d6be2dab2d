//! # Data Screen
//!
//! Market and trader analytics. Parameters (date range, market, trader key)
//! sit on top; the market tab shows the book, charts, accounts, top trades
//! and top makers; both tabs end with the fills table.

use crate::app::{days_back, App, AppState, TopTradesBy, TraderCheck};
use crate::services::data::{Datasets, Slot};
use crate::services::{DataTab, Modal};
use crate::ui::theme::Theme;
use crate::ui::widgets::fills_table::{self, FillsTableContext};
use crate::ui::widgets::tables::{render_empty_state, render_panel_header, render_table, TableConfig};
use crate::ui::widgets::{charts, links, order_book};
use lib_solana::data_api::types::{Fill, TopMaker};
use lib_solana::{Cluster, Explorer, Market};
use lib_utils::{abbreviate_total, format_number, format_pubkey};
use std::sync::Arc;

pub const MAX_TOP_TRADES: usize = 5;
pub const MAX_TOP_MAKERS: usize = 5;

/// Date range choices, in days back from today.
pub const DAY_OPTIONS: [(Option<u32>, &str); 6] = [
    (None, "All time"),
    (Some(0), "Today"),
    (Some(1), "Yesterday"),
    (Some(7), "7 days ago"),
    (Some(30), "30 days ago"),
    (Some(90), "90 days ago"),
];

// region: --- Helpers

pub fn days_label(days: Option<u32>) -> String {
    DAY_OPTIONS
        .iter()
        .find(|(d, _)| *d == days)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{} days ago", days.unwrap_or_default()))
}

/// Largest fills first by the chosen token, at most [`MAX_TOP_TRADES`].
pub fn top_trades(fills: &[Fill], by: TopTradesBy) -> Vec<Fill> {
    let units = |f: &Fill| match by {
        TopTradesBy::Base => f.base_units(),
        TopTradesBy::Quote => f.quote_units(),
    };
    let mut sorted = fills.to_vec();
    sorted.sort_by(|a, b| units(b).total_cmp(&units(a)));
    sorted.truncate(MAX_TOP_TRADES);
    sorted
}

pub fn top_makers(makers: &[TopMaker]) -> Vec<TopMaker> {
    let mut sorted = makers.to_vec();
    sorted.sort_by(|a, b| b.volume().total_cmp(&a.volume()));
    sorted.truncate(MAX_TOP_MAKERS);
    sorted
}

/// Total from the fees endpoint, which answers with a number, a numeric
/// string, or an object holding one.
pub fn fees_paid_total(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Object(map) => map.values().find_map(fees_paid_total),
        _ => None,
    }
}

/// Fills for the table, with the text shown while it is empty.
fn fills_or_status(slot: &Slot<Vec<Fill>>) -> (Arc<Vec<Fill>>, &'static str) {
    let empty_text = if slot.is_loaded() { "No trades in range" } else { "Loading trades..." };
    (slot.data.clone(), empty_text)
}

pub fn trader_input_error(check: TraderCheck) -> Option<&'static str> {
    match check {
        TraderCheck::Empty => Some("Paste a Public Key"),
        TraderCheck::Invalid => Some("Invalid Public Key"),
        TraderCheck::Checking | TraderCheck::Valid => None,
    }
}

// endregion: --- Helpers

/// Everything the panels read, gathered once per frame.
struct DataContext {
    datasets: Datasets,
    market: Option<Arc<Market>>,
    explorer: Explorer,
    cluster: Cluster,
    now_ms: i64,
}

impl DataContext {
    fn base_symbol(&self) -> Option<&str> {
        self.market.as_deref().map(|m| m.base_token.symbol.as_str())
    }

    fn quote_symbol(&self) -> Option<&str> {
        self.market.as_deref().map(|m| m.quote_token.symbol.as_str())
    }
}

pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    let ctx = DataContext {
        datasets: app.services.data.datasets(),
        market: app.services.exchange.selected_market(),
        explorer: app.services.settings.explorer(),
        cluster: app.services.connection.cluster(),
        now_ms: chrono::Utc::now().timestamp_millis(),
    };

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                ui.add_space(((ui.available_width() - 160.0) / 2.0).max(0.0));
                for (tab, label) in [(DataTab::Market, "Market"), (DataTab::Trader, "Trader")] {
                    if ui.selectable_label(state.data.tab == tab, label).clicked() && state.data.tab != tab {
                        app.handle_data_tab_change(tab);
                    }
                }
            });
        });
        ui.add_space(8.0);

        render_parameters(ui, state, app, &ctx, theme);
        ui.add_space(12.0);

        match state.data.tab {
            DataTab::Market => render_market_tab(ui, state, app, &ctx, theme),
            DataTab::Trader => render_trader_tab(ui, state, &ctx, theme),
        }

        ui.add_space(12.0);
        let (fills, empty_text) = match state.data.tab {
            DataTab::Trader if state.data.trader.is_empty() => (Arc::default(), "No trader selected"),
            DataTab::Market => fills_or_status(&ctx.datasets.market.trades),
            DataTab::Trader => fills_or_status(&ctx.datasets.trader.trade_history),
        };
        fills_table::render(
            ui,
            FillsTableContext {
                fills: &fills,
                query: &state.data.fills,
                base_symbol: ctx.base_symbol(),
                quote_symbol: ctx.quote_symbol(),
                explorer: ctx.explorer,
                cluster: ctx.cluster,
                empty_text,
            },
            app,
            theme,
        );
    });
}

// region: --- Parameters

fn date_picker(ui: &mut egui::Ui, id: &str, label: &str, current_ms: Option<i64>, now_ms: i64) -> Option<Option<u32>> {
    let current = current_ms.map(|ms| days_back(now_ms, ms));
    let mut picked = None;
    ui.vertical(|ui| {
        ui.small(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(days_label(current))
            .show_ui(ui, |ui| {
                for (days, text) in DAY_OPTIONS {
                    if ui.selectable_label(current == days, text).clicked() && current != days {
                        picked = Some(days);
                    }
                }
            });
    });
    picked
}

fn render_parameters(ui: &mut egui::Ui, state: &AppState, app: &mut App, ctx: &DataContext, theme: &Theme) {
    ui.horizontal(|ui| {
        if let Some(days) = date_picker(ui, "date_from", "Date From", state.data.start_ms, ctx.now_ms) {
            app.handle_start_days(days);
        }
        ui.add_space(12.0);

        let market_label = ctx
            .market
            .as_deref()
            .map(|m| format!("{} ⏷", m.name))
            .unwrap_or_else(|| "Loading markets...".to_string());
        let button = egui::Button::new(egui::RichText::new(market_label).size(18.0).strong()).min_size(egui::vec2(220.0, 44.0));
        if ui.add_enabled(ctx.market.is_some(), button).clicked() {
            app.open_modal(Modal::MarketSelect);
        }
        ui.add_space(12.0);

        if let Some(days) = date_picker(ui, "date_to", "Date To", state.data.end_ms, ctx.now_ms) {
            app.handle_end_days(days);
        }
    });

    if state.data.tab != DataTab::Trader {
        return;
    }

    ui.add_space(8.0);
    ui.label("Trader Public Key");
    ui.horizontal(|ui| {
        let mut input = state.data.trader_input.clone();
        let response = ui.add(egui::TextEdit::singleline(&mut input).desired_width(440.0));
        if response.changed() {
            app.handle_trader_input(input);
        }
        if state.data.trader_check == TraderCheck::Checking {
            ui.spinner();
        }
    });
    if let Some(error) = trader_input_error(state.data.trader_check) {
        ui.colored_label(theme.error, error);
    }
}

// endregion: --- Parameters

// region: --- Market tab

fn render_market_tab(ui: &mut egui::Ui, state: &AppState, app: &mut App, ctx: &DataContext, theme: &Theme) {
    let market = &ctx.datasets.market;

    ui.columns(2, |cols| {
        egui::Frame::group(cols[0].style()).show(&mut cols[0], |ui| {
            order_book::render(ui, &market.top_of_book.data, ctx.quote_symbol(), theme);
        });
        egui::Frame::group(cols[1].style()).show(&mut cols[1], |ui| {
            charts::render_volume(ui, "market_volume", &market.volume.data, ctx.quote_symbol(), theme);
            ui.separator();
            charts::render_price(ui, &market.historical_prices.data, ctx.quote_symbol(), theme);
        });
    });
    ui.add_space(8.0);

    ui.columns(3, |cols| {
        egui::Frame::group(cols[0].style()).show(&mut cols[0], |ui| {
            render_market_meta(ui, ctx, theme);
        });
        egui::Frame::group(cols[1].style()).show(&mut cols[1], |ui| {
            render_top_trades(ui, state, app, ctx, theme);
        });
        egui::Frame::group(cols[2].style()).show(&mut cols[2], |ui| {
            render_top_makers(ui, &market.top_makers.data, ctx, theme);
        });
    });
}

fn render_market_meta(ui: &mut egui::Ui, ctx: &DataContext, theme: &Theme) {
    let Some(market) = ctx.market.as_deref() else {
        render_empty_state(ui, "Loading market...", None, theme);
        return;
    };
    let (explorer, cluster) = (ctx.explorer, ctx.cluster);
    let header = &market.header;

    render_panel_header(ui, "Accounts", None, theme);
    render_table(ui, "meta_accounts", TableConfig::columns(2), &[], theme, |ui| {
        for (label, key) in [
            ("Market", market.address),
            ("Authority", header.authority),
            ("Fee Recipient", header.fee_recipient),
        ] {
            ui.label(label);
            links::account_link(ui, &key.to_string(), explorer, cluster);
            ui.end_row();
        }
    });

    for (title, symbol, mint, vault) in [
        ("Base", &market.base_token.symbol, header.base_mint, header.base_vault),
        ("Quote", &market.quote_token.symbol, header.quote_mint, header.quote_vault),
    ] {
        ui.add_space(6.0);
        render_panel_header(ui, &format!("{} ({})", title, symbol), None, theme);
        render_table(ui, &format!("meta_{}", title), TableConfig::columns(2), &[], theme, |ui| {
            ui.label("Mint");
            links::token_link(ui, &mint.to_string(), explorer, cluster);
            ui.end_row();
            ui.label("Vault");
            links::account_link(ui, &vault.to_string(), explorer, cluster);
            ui.end_row();
        });
    }
}

fn render_top_trades(ui: &mut egui::Ui, state: &AppState, app: &mut App, ctx: &DataContext, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.strong("Top Trades");
        ui.colored_label(theme.dim, format!("MAX {}", MAX_TOP_TRADES));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            // Right to left: quote first
            for (by, label) in [
                (TopTradesBy::Quote, ctx.quote_symbol().unwrap_or("Quote")),
                (TopTradesBy::Base, ctx.base_symbol().unwrap_or("Base")),
            ] {
                if ui.selectable_label(state.data.top_trades_by == by, label).clicked() {
                    app.state.write().data.top_trades_by = by;
                }
            }
        });
    });
    ui.separator();

    let by = state.data.top_trades_by;
    let source = match by {
        TopTradesBy::Base => &ctx.datasets.market.top_trades_base.data,
        TopTradesBy::Quote => &ctx.datasets.market.top_trades_quote.data,
    };
    if source.is_empty() || ctx.market.is_none() {
        render_empty_state(ui, "Loading top trades...", None, theme);
        return;
    }

    let symbol = match by {
        TopTradesBy::Base => ctx.base_symbol(),
        TopTradesBy::Quote => ctx.quote_symbol(),
    };
    render_table(ui, "top_trades", TableConfig::columns(2), &["TX ID", symbol.unwrap_or("")], theme, |ui| {
        for fill in top_trades(source, by) {
            links::tx_link(ui, &fill.txid, ctx.explorer, ctx.cluster);
            let units = match by {
                TopTradesBy::Base => fill.base_units(),
                TopTradesBy::Quote => fill.quote_units(),
            };
            ui.label(format_number(units, 2, false));
            ui.end_row();
        }
    });
}

fn render_top_makers(ui: &mut egui::Ui, makers: &[TopMaker], ctx: &DataContext, theme: &Theme) {
    render_panel_header(ui, "Top Makers", Some(&format!("MAX {}", MAX_TOP_MAKERS)), theme);
    if makers.is_empty() || ctx.market.is_none() {
        render_empty_state(ui, "Loading top makers...", None, theme);
        return;
    }

    let volume_header = format!("Volume ({})", ctx.quote_symbol().unwrap_or("N/A"));
    render_table(ui, "top_makers", TableConfig::columns(2), &["Address", &volume_header], theme, |ui| {
        for maker in top_makers(makers) {
            links::account_link(ui, &maker.maker, ctx.explorer, ctx.cluster);
            ui.label(abbreviate_total(maker.volume(), false));
            ui.end_row();
        }
    });
}

// endregion: --- Market tab

fn render_trader_tab(ui: &mut egui::Ui, state: &AppState, ctx: &DataContext, theme: &Theme) {
    if state.data.trader.is_empty() {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            render_empty_state(ui, "No trader selected", Some("Paste a trader's public key above"), theme);
        });
        return;
    }

    let trader = &ctx.datasets.trader;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.strong(format_pubkey(&state.data.trader, 6));
            links::account_link(ui, &state.data.trader, ctx.explorer, ctx.cluster);
            if let Some(fees) = fees_paid_total(&trader.fees_paid.data) {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format_number(fees, 2, false));
                    ui.colored_label(theme.dim, "Fees Paid");
                });
            }
        });
        ui.separator();
        charts::render_volume(ui, "trader_volume", &trader.volume.data, ctx.quote_symbol(), theme);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fill(base: &str, quote: &str, txid: &str) -> Fill {
        Fill {
            base_units_filled: base.to_string(),
            quote_units_filled: quote.to_string(),
            txid: txid.to_string(),
            ..Fill::default()
        }
    }

    #[test]
    fn test_top_trades_by_token() {
        let fills: Vec<Fill> = (0..8).map(|i| fill(&i.to_string(), &(100 - i).to_string(), &format!("t{}", i))).collect();

        let by_base = top_trades(&fills, TopTradesBy::Base);
        assert_eq!(by_base.len(), MAX_TOP_TRADES);
        assert_eq!(by_base[0].txid, "t7");

        let by_quote = top_trades(&fills, TopTradesBy::Quote);
        assert_eq!(by_quote[0].txid, "t0");
    }

    #[test]
    fn test_top_makers_sorted_and_capped() {
        let makers: Vec<TopMaker> = (0..7)
            .map(|i| TopMaker {
                maker: format!("m{}", i),
                total_volume: (i * 10).to_string(),
            })
            .collect();
        let top = top_makers(&makers);
        assert_eq!(top.len(), MAX_TOP_MAKERS);
        assert_eq!(top[0].maker, "m6");
    }

    #[test]
    fn test_fees_paid_shapes() {
        assert_eq!(fees_paid_total(&json!(2.5)), Some(2.5));
        assert_eq!(fees_paid_total(&json!("3")), Some(3.0));
        assert_eq!(fees_paid_total(&json!({ "fees": 1 })), Some(1.0));
        assert_eq!(fees_paid_total(&json!(null)), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(days_label(None), "All time");
        assert_eq!(days_label(Some(7)), "7 days ago");
        assert_eq!(days_label(Some(12)), "12 days ago");
        assert_eq!(trader_input_error(TraderCheck::Empty), Some("Paste a Public Key"));
        assert_eq!(trader_input_error(TraderCheck::Invalid), Some("Invalid Public Key"));
        assert_eq!(trader_input_error(TraderCheck::Valid), None);
    }
}
