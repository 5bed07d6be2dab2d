//! # Fills Table
//!
//! "Recent Trades" with search, Date/Size sorting, and clickable taker and
//! maker addresses that jump to the trader tab.

use crate::app::{App, FillSortKey, FillsQuery};
use crate::ui::theme::Theme;
use crate::ui::widgets::links;
use egui_extras::{Column, TableBuilder};
use lib_solana::data_api::types::Fill;
use lib_solana::{Cluster, Explorer};
use lib_utils::{format_date, format_number, format_pubkey};

pub struct FillsTableContext<'a> {
    pub fills: &'a [Fill],
    pub query: &'a FillsQuery,
    pub base_symbol: Option<&'a str>,
    pub quote_symbol: Option<&'a str>,
    pub explorer: Explorer,
    pub cluster: Cluster,
    /// Text shown instead of rows when there is nothing to show
    pub empty_text: &'a str,
}

/// Header caption with the sort arrow when `key` is active.
pub fn sort_header(label: &str, key: FillSortKey, query: &FillsQuery) -> String {
    if query.sort_key != key {
        return label.to_string();
    }
    let arrow = if query.descending { "⏷" } else { "⏶" };
    format!("{} {}", label, arrow)
}

pub fn render(ui: &mut egui::Ui, ctx: FillsTableContext<'_>, app: &mut App, theme: &Theme) {
    ui.strong("Recent Trades");
    ui.add_space(4.0);

    let mut search = ctx.query.search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("Search by date, address, side or transaction ID")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        app.state.write().data.fills.search = search;
    }
    ui.add_space(4.0);

    let rows = ctx.query.apply(ctx.fills);
    let mut sort_clicked = None;
    let mut trader_clicked = None;

    TableBuilder::new(ui)
        .id_salt("fills_table")
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(130.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            header.col(|ui| {
                if ui.button(sort_header("Date", FillSortKey::Date, ctx.query)).clicked() {
                    sort_clicked = Some(FillSortKey::Date);
                }
            });
            header.col(|ui| {
                ui.strong("TX ID");
            });
            header.col(|ui| {
                ui.strong("Side");
            });
            header.col(|ui| {
                ui.strong(format!("Price ({})", ctx.quote_symbol.unwrap_or("N/A")));
            });
            header.col(|ui| {
                let label = format!("Size ({})", ctx.base_symbol.unwrap_or("N/A"));
                if ui.button(sort_header(&label, FillSortKey::Size, ctx.query)).clicked() {
                    sort_clicked = Some(FillSortKey::Size);
                }
            });
            header.col(|ui| {
                ui.strong("Taker");
            });
            header.col(|ui| {
                ui.strong("Maker");
            });
        })
        .body(|mut body| {
            for fill in &rows {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        let (date, time) = format_date(fill.timestamp());
                        ui.label(format!("{} {}", date, time));
                    });
                    row.col(|ui| {
                        links::tx_link(ui, &fill.txid, ctx.explorer, ctx.cluster);
                    });
                    row.col(|ui| {
                        let color = if fill.is_buy() { theme.bid } else { theme.ask };
                        ui.colored_label(color, fill.side_label());
                    });
                    row.col(|ui| {
                        ui.label(format_number(fill.price(), 4, false));
                    });
                    row.col(|ui| {
                        ui.label(format_number(fill.base_units(), 4, false));
                    });
                    row.col(|ui| {
                        if ui.link(format_pubkey(&fill.taker, 4)).on_hover_text(fill.taker.as_str()).clicked() {
                            trader_clicked = Some(fill.taker.clone());
                        }
                    });
                    row.col(|ui| {
                        if ui.link(format_pubkey(&fill.maker, 4)).on_hover_text(fill.maker.as_str()).clicked() {
                            trader_clicked = Some(fill.maker.clone());
                        }
                    });
                });
            }
        });

    if rows.is_empty() {
        super::tables::render_empty_state(ui, ctx.empty_text, None, theme);
    }

    if let Some(key) = sort_clicked {
        app.state.write().data.fills.toggle_sort(key);
    }
    if let Some(address) = trader_clicked {
        app.handle_show_trader(&address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_header_marks_active_key() {
        let mut query = FillsQuery::default();
        assert_eq!(sort_header("Date", FillSortKey::Date, &query), "Date ⏷");
        assert_eq!(sort_header("Size", FillSortKey::Size, &query), "Size");
        query.toggle_sort(FillSortKey::Size);
        assert_eq!(sort_header("Size", FillSortKey::Size, &query), "Size ⏶");
    }
}
