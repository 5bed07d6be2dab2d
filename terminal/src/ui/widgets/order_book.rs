//! # Order Book Widget
//!
//! Top-of-book ladder: asks above bids, bid size | price | ask size. Each
//! side shows up to [`SIDE_LENGTH`] - 1 levels in [`SIDE_LENGTH`] rows; asks
//! are pushed down against the spread and bids pulled up to it.

use crate::ui::theme::Theme;
use lib_solana::data_api::types::TopOfBook;
use lib_utils::format_number;

pub const SIDE_LENGTH: usize = 5;

/// One rendered ladder row. `None` price is a padding row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderRow {
    pub price: Option<f64>,
    pub bid_size: Option<f64>,
    pub ask_size: Option<f64>,
}

const EMPTY_ROW: LadderRow = LadderRow {
    price: None,
    bid_size: None,
    ask_size: None,
};

/// Ask rows (highest price first) followed by bid rows.
pub fn ladder_rows(book: &TopOfBook) -> (Vec<LadderRow>, Vec<LadderRow>) {
    let mut asks: Vec<(f64, f64)> = book.ask_levels().into_iter().take(SIDE_LENGTH - 1).collect();
    asks.sort_by(|a, b| b.0.total_cmp(&a.0));
    let bids: Vec<(f64, f64)> = book.bid_levels().into_iter().take(SIDE_LENGTH - 1).collect();

    let mut ask_rows = vec![EMPTY_ROW; SIDE_LENGTH - asks.len()];
    ask_rows.extend(asks.into_iter().map(|(price, size)| LadderRow {
        price: Some(price),
        bid_size: None,
        ask_size: Some(size),
    }));

    let mut bid_rows: Vec<LadderRow> = bids
        .into_iter()
        .map(|(price, size)| LadderRow {
            price: Some(price),
            bid_size: Some(size),
            ask_size: None,
        })
        .collect();
    bid_rows.resize(SIDE_LENGTH, EMPTY_ROW);

    (ask_rows, bid_rows)
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format_number(v, 2, false)).unwrap_or_default()
}

pub fn render(ui: &mut egui::Ui, book: &TopOfBook, quote_symbol: Option<&str>, theme: &Theme) {
    ui.strong("Orderbook");
    ui.add_space(4.0);

    if book.is_empty() {
        super::tables::render_empty_state(ui, "Loading order book...", None, theme);
        return;
    }

    let (asks, bids) = ladder_rows(book);
    let price_header = match quote_symbol {
        Some(symbol) => format!("Price ({})", symbol),
        None => "Price".to_string(),
    };

    egui::Grid::new("order_book")
        .num_columns(3)
        .spacing([24.0, 6.0])
        .min_col_width(80.0)
        .show(ui, |ui| {
            ui.colored_label(theme.dim, "Bids");
            ui.colored_label(theme.dim, price_header);
            ui.colored_label(theme.dim, "Asks");
            ui.end_row();

            for row in asks.iter().chain(bids.iter()) {
                ui.colored_label(theme.bid, cell(row.bid_size));
                ui.label(cell(row.price));
                ui.colored_label(theme.ask, cell(row.ask_size));
                ui.end_row();
            }
        });
}
