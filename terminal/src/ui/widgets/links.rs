//! Explorer links for addresses and transactions.

use lib_solana::{Cluster, Explorer};
use lib_utils::format_pubkey;

/// Shortened address linking to its explorer account page.
pub fn account_link(ui: &mut egui::Ui, address: &str, explorer: Explorer, cluster: Cluster) -> egui::Response {
    ui.hyperlink_to(format_pubkey(address, 4), explorer.account_url(address, cluster))
        .on_hover_text(address)
}

/// Shortened signature linking to its explorer transaction page.
pub fn tx_link(ui: &mut egui::Ui, signature: &str, explorer: Explorer, cluster: Cluster) -> egui::Response {
    ui.hyperlink_to(format_pubkey(signature, 4), explorer.tx_url(signature, cluster))
        .on_hover_text(signature)
}

pub fn token_link(ui: &mut egui::Ui, mint: &str, explorer: Explorer, cluster: Cluster) -> egui::Response {
    ui.hyperlink_to(format_pubkey(mint, 4), explorer.token_url(mint, cluster))
        .on_hover_text(mint)
}
