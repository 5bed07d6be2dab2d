//! # Application State Types
//!
//! Screen, form and view state owned by the GUI thread. Provider data
//! (markets, datasets, settings) lives in the services; this is only what
//! the user is editing or looking at.

use crate::services::data::DataTab;
use crate::services::modals::ModalCoordinator;
use crate::services::query::Route;
use crate::services::swap::QuickSwap;
use crate::services::wallet::WalletStatus;
use lib_solana::data_api::types::{Fill, SortToken};
use lib_solana::{Cluster, Market, Token};
use lib_utils::format_date;
use solana_sdk::pubkey::Pubkey;

/// Rows shown in the fills table.
pub const TABLE_SIZE: usize = 25;

const DAY_MS: i64 = 24 * 60 * 60 * 1_000;

// region: --- Screens

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Landing page with links into swap and data
    #[default]
    Landing,
    /// Single-market swap form
    Swap,
    /// Market and trader analytics
    Data,
}

impl Screen {
    /// Screens in nav bar order
    pub fn all() -> &'static [Screen] {
        &[Screen::Landing, Screen::Swap, Screen::Data]
    }

    pub fn title(&self) -> &'static str {
        self.route().title()
    }

    pub fn route(&self) -> Route {
        match self {
            Screen::Landing => Route::Home,
            Screen::Swap => Route::Swap,
            Screen::Data => Route::Data,
        }
    }
}

// endregion: --- Screens

// region: --- Notices

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Loading,
    Plain,
}

/// A toast waiting to be shown. A notice with an `id` replaces the visible
/// toast carrying the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: Option<String>,
    pub kind: NoticeKind,
    pub message: String,
    /// 4s instead of 8s
    pub short: bool,
    /// Shown as a link next to the toast
    pub link: Option<String>,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            message: message.into(),
            short: false,
            link: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Loading, message)
    }

    pub fn plain(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Plain, message)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn short(mut self) -> Self {
        self.short = true;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

// endregion: --- Notices

// region: --- Swap form

/// Which side of the swap form the token modal is picking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenSlot {
    #[default]
    In,
    Out,
}

impl TokenSlot {
    pub fn title(&self) -> &'static str {
        match self {
            TokenSlot::In => "You pay",
            TokenSlot::Out => "You receive",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SwapForm {
    pub in_token: Option<Token>,
    pub out_token: Option<Token>,
    pub in_amount: String,
    pub selecting: TokenSlot,
    pub quick_command: String,
    pub quick_error: Option<String>,
    pub is_sending: bool,
    pub was_error: bool,
    /// Expected output captured when the swap was submitted
    pub sent_out_amount: f64,
    /// Market whose tokens were last loaded into the form
    pub synced_market: Option<Pubkey>,
}

impl SwapForm {
    /// Parsed input amount; anything unparsable counts as zero.
    pub fn in_amount_value(&self) -> f64 {
        self.in_amount.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// Reset the tokens to `market`'s base and quote when the selected market
    /// changed since the last sync. Returns `true` when the form was updated.
    pub fn sync_market(&mut self, market: &Market, tokens: &[Token]) -> bool {
        if self.synced_market == Some(market.address) {
            return false;
        }
        self.synced_market = Some(market.address);
        let find = |symbol: &str| tokens.iter().find(|t| t.symbol == symbol).cloned();
        self.in_token = find(&market.base_token.symbol);
        self.out_token = find(&market.quote_token.symbol);
        true
    }

    /// Swap the two tokens, carrying the expected output over as the new input.
    pub fn flip(&mut self, expected_out: f64) {
        std::mem::swap(&mut self.in_token, &mut self.out_token);
        self.in_amount = expected_out.to_string();
    }

    pub fn select_token(&mut self, token: Token) {
        match self.selecting {
            TokenSlot::In => self.in_token = Some(token),
            TokenSlot::Out => self.out_token = Some(token),
        }
    }

    /// Fill the form from a parsed quick swap command. The market is marked as
    /// synced so the command's tokens are not overwritten by the market's.
    pub fn apply_quick_swap(&mut self, quick: QuickSwap) {
        self.synced_market = Some(quick.market);
        self.in_token = Some(quick.in_token);
        self.out_token = Some(quick.out_token);
        self.in_amount = quick.in_amount;
        self.quick_error = None;
    }

    /// Token currently being picked in the token modal.
    pub fn selecting_token(&self) -> Option<&Token> {
        match self.selecting {
            TokenSlot::In => self.in_token.as_ref(),
            TokenSlot::Out => self.out_token.as_ref(),
        }
    }

    /// The token on the other side of the one being picked.
    pub fn counterpart_token(&self) -> Option<&Token> {
        match self.selecting {
            TokenSlot::In => self.out_token.as_ref(),
            TokenSlot::Out => self.in_token.as_ref(),
        }
    }

    /// Settle the form after a submission.
    pub fn finish(&mut self, failed: bool) {
        self.is_sending = false;
        self.was_error = failed;
        if !failed {
            self.in_amount.clear();
            self.sent_out_amount = 0.0;
        }
    }
}

// endregion: --- Swap form

// region: --- Data view

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillSortKey {
    #[default]
    Date,
    Size,
}

/// Search and sort state of the fills table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillsQuery {
    pub search: String,
    pub sort_key: FillSortKey,
    pub descending: bool,
}

impl Default for FillsQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_key: FillSortKey::Date,
            descending: true,
        }
    }
}

impl FillsQuery {
    /// Clicking a header selects it and flips the direction.
    pub fn toggle_sort(&mut self, key: FillSortKey) {
        self.sort_key = key;
        self.descending = !self.descending;
    }

    fn matches(&self, fill: &Fill) -> bool {
        let query = self.search.to_lowercase();
        let (date, _) = format_date(fill.timestamp());
        date.to_lowercase().contains(&query)
            || fill.side_label().to_lowercase().contains(&query)
            || fill.txid == self.search
            || fill.taker == self.search
            || fill.maker == self.search
    }

    /// First [`TABLE_SIZE`] matching fills, sorted by the current key.
    pub fn apply(&self, fills: &[Fill]) -> Vec<Fill> {
        let mut rows: Vec<Fill> = if self.search.is_empty() {
            fills.iter().take(TABLE_SIZE).cloned().collect()
        } else {
            fills
                .iter()
                .filter(|f| self.matches(f))
                .take(TABLE_SIZE)
                .cloned()
                .collect()
        };

        match self.sort_key {
            FillSortKey::Date => rows.sort_by_key(|f| f.timestamp()),
            FillSortKey::Size => rows.sort_by(|a, b| a.base_units().total_cmp(&b.base_units())),
        }
        if self.descending {
            rows.reverse();
        }
        rows
    }
}

/// Result of checking the pasted trader key against the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraderCheck {
    #[default]
    Empty,
    Checking,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Default)]
pub struct DataView {
    pub tab: DataTab,
    /// What the user typed
    pub trader_input: String,
    /// Last input that resolved to an existing account
    pub trader: String,
    pub trader_check: TraderCheck,
    /// Unix milliseconds; `None` is unbounded
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
    pub fills: FillsQuery,
    pub top_trades_by: TopTradesBy,
}

/// Top trades table toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopTradesBy {
    #[default]
    Base,
    Quote,
}

impl TopTradesBy {
    pub fn sort_token(&self) -> SortToken {
        match self {
            TopTradesBy::Base => SortToken::Base,
            TopTradesBy::Quote => SortToken::Quote,
        }
    }
}

/// Start of the UTC day `days_back` days before `now_ms`.
pub fn day_start_ms(now_ms: i64, days_back: u32) -> i64 {
    now_ms.div_euclid(DAY_MS) * DAY_MS - i64::from(days_back) * DAY_MS
}

/// Whole days between the start of `ts_ms`'s day and today.
pub fn days_back(now_ms: i64, ts_ms: i64) -> u32 {
    let days = (now_ms.div_euclid(DAY_MS) - ts_ms.div_euclid(DAY_MS)).max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

impl DataView {
    /// Jump to the trader tab for `address` (clicking a maker or taker).
    pub fn show_trader(&mut self, address: &str) {
        self.tab = DataTab::Trader;
        self.trader_input = address.to_string();
        self.trader = address.to_string();
        self.trader_check = TraderCheck::Valid;
    }

    pub fn clear_trader(&mut self) {
        self.trader_input.clear();
        self.trader.clear();
        self.trader_check = TraderCheck::Empty;
    }

    /// Apply a finished account check, ignoring results for stale input.
    pub fn resolve_trader_check(&mut self, address: &str, valid: bool) {
        if self.trader_input.trim() != address {
            return;
        }
        if valid {
            self.trader = address.to_string();
            self.trader_check = TraderCheck::Valid;
        } else {
            self.trader.clear();
            self.trader_check = TraderCheck::Invalid;
        }
    }

    pub fn set_start_days_back(&mut self, now_ms: i64, days: Option<u32>) {
        self.start_ms = days.map(|d| day_start_ms(now_ms, d));
    }

    /// End of range is the end of the chosen day.
    pub fn set_end_days_back(&mut self, now_ms: i64, days: Option<u32>) {
        self.end_ms = days.map(|d| day_start_ms(now_ms, d) + DAY_MS - 1);
    }
}

// endregion: --- Data view

// region: --- Forms

#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    /// Custom RPC host as typed, without scheme
    pub custom_rpc: String,
    pub validating_rpc: bool,
    pub custom_slippage: String,
}

#[derive(Debug, Clone, Default)]
pub struct WalletForm {
    pub keypair_path: String,
    pub secret_key: String,
    pub error: Option<String>,
}

// endregion: --- Forms

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_screen: Screen,
    pub swap: SwapForm,
    pub data: DataView,
    pub modals: ModalCoordinator,
    pub settings_form: SettingsForm,
    pub wallet_form: WalletForm,
    pub wallet: WalletStatus,
    pub is_geobanned: bool,
    /// Cluster and market the region check last ran for
    pub geo_checked_for: Option<(Cluster, Pubkey)>,
    pub market_search: String,
    pub token_search: String,
    /// Toasts queued for the next frame
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    fn fill(ts: i64, size: &str, direction: i64, taker: &str) -> Fill {
        Fill {
            unix_timestamp: ts.to_string(),
            base_units_filled: size.to_string(),
            trade_direction: direction,
            taker: taker.to_string(),
            txid: format!("tx{}", ts),
            ..Fill::default()
        }
    }

    #[test]
    fn test_screen_route_mapping() {
        assert_eq!(Screen::Landing.route(), Route::Home);
        assert_eq!(Screen::Swap.route(), Route::Swap);
        assert_eq!(Screen::Data.route(), Route::Data);
        assert_eq!(Screen::Data.title(), "Data");
    }

    #[test]
    fn test_sync_market_only_on_change() {
        let (markets, tokens) = fixtures::sample_markets();
        let mut form = SwapForm::default();

        assert!(form.sync_market(&markets[1], &tokens));
        assert_eq!(form.in_token.as_ref().unwrap().symbol, "wSOL");
        assert_eq!(form.out_token.as_ref().unwrap().symbol, "USDC");

        form.flip(0.0);
        assert!(!form.sync_market(&markets[1], &tokens));
        assert_eq!(form.in_token.as_ref().unwrap().symbol, "USDC");
    }

    #[test]
    fn test_flip_carries_expected_out() {
        let (_, tokens) = fixtures::sample_markets();
        let mut form = SwapForm {
            in_token: Some(tokens[0].clone()),
            out_token: Some(tokens[1].clone()),
            in_amount: "1".to_string(),
            ..SwapForm::default()
        };
        form.flip(19.5);
        assert_eq!(form.in_token.unwrap().symbol, "USDC");
        assert_eq!(form.in_amount, "19.5");
    }

    #[test]
    fn test_quick_swap_marks_market_synced() {
        let (markets, tokens) = fixtures::sample_markets();
        let mut form = SwapForm {
            quick_error: Some("Invalid swap command".to_string()),
            ..SwapForm::default()
        };
        form.apply_quick_swap(QuickSwap {
            market: markets[1].address,
            in_token: tokens[1].clone(),
            out_token: tokens[0].clone(),
            in_amount: "5".to_string(),
        });
        assert!(form.quick_error.is_none());
        assert!(!form.sync_market(&markets[1], &tokens));
        assert_eq!(form.in_token.unwrap().symbol, "USDC");
    }

    #[test]
    fn test_finish_keeps_amount_on_error() {
        let mut form = SwapForm {
            in_amount: "3".to_string(),
            is_sending: true,
            ..SwapForm::default()
        };
        form.finish(true);
        assert!(!form.is_sending);
        assert!(form.was_error);
        assert_eq!(form.in_amount, "3");

        form.finish(false);
        assert!(form.in_amount.is_empty());
        assert!(!form.was_error);
    }

    #[test]
    fn test_in_amount_value_rejects_garbage() {
        let mut form = SwapForm::default();
        assert_eq!(form.in_amount_value(), 0.0);
        form.in_amount = " 2.5 ".to_string();
        assert_eq!(form.in_amount_value(), 2.5);
        form.in_amount = "NaN".to_string();
        assert_eq!(form.in_amount_value(), 0.0);
    }

    #[test]
    fn test_fills_sorted_by_date_then_size() {
        let fills = vec![fill(100, "2", 1, "a"), fill(300, "1", 0, "b"), fill(200, "3", 1, "c")];
        let mut query = FillsQuery::default();

        let ts: Vec<i64> = query.apply(&fills).iter().map(|f| f.timestamp()).collect();
        assert_eq!(ts, vec![300, 200, 100]);

        query.toggle_sort(FillSortKey::Size);
        let sizes: Vec<f64> = query.apply(&fills).iter().map(|f| f.base_units()).collect();
        assert_eq!(sizes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fills_search_by_side_and_exact_address() {
        let fills = vec![fill(100, "2", 1, "alice"), fill(300, "1", 0, "bob")];
        let mut query = FillsQuery {
            search: "SELL".to_string(),
            ..FillsQuery::default()
        };
        assert_eq!(query.apply(&fills).len(), 1);

        query.search = "bob".to_string();
        let rows = query.apply(&fills);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].taker, "bob");

        // Addresses must match exactly
        query.search = "bo".to_string();
        assert!(query.apply(&fills).is_empty());
    }

    #[test]
    fn test_fills_capped_at_table_size() {
        let fills: Vec<Fill> = (0..40).map(|i| fill(i, "1", 1, "t")).collect();
        assert_eq!(FillsQuery::default().apply(&fills).len(), TABLE_SIZE);
    }

    #[test]
    fn test_trader_check_ignores_stale_result() {
        let mut view = DataView {
            trader_input: "new".to_string(),
            trader_check: TraderCheck::Checking,
            ..DataView::default()
        };
        view.resolve_trader_check("old", true);
        assert_eq!(view.trader_check, TraderCheck::Checking);
        assert!(view.trader.is_empty());

        view.resolve_trader_check("new", true);
        assert_eq!(view.trader, "new");
        assert_eq!(view.trader_check, TraderCheck::Valid);
    }

    #[test]
    fn test_show_trader_switches_tab() {
        let mut view = DataView::default();
        view.show_trader("maker1");
        assert_eq!(view.tab, DataTab::Trader);
        assert_eq!(view.trader, "maker1");
    }

    #[test]
    fn test_date_range_is_day_aligned() {
        let now = 10 * DAY_MS + 5_000;
        let mut view = DataView::default();
        view.set_start_days_back(now, Some(3));
        view.set_end_days_back(now, Some(0));
        assert_eq!(view.start_ms, Some(7 * DAY_MS));
        assert_eq!(view.end_ms, Some(11 * DAY_MS - 1));
        assert_eq!(days_back(now, 7 * DAY_MS), 3);

        // Same inputs a moment later give the same key
        view.set_start_days_back(now + 1_000, Some(3));
        assert_eq!(view.start_ms, Some(7 * DAY_MS));

        view.set_start_days_back(now, None);
        assert_eq!(view.start_ms, None);
    }

    #[test]
    fn test_notice_builders() {
        let notice = Notice::plain("Swap transaction cancelled.").with_id("swap").short();
        assert_eq!(notice.kind, NoticeKind::Plain);
        assert!(notice.short);
        assert_eq!(notice.id.as_deref(), Some("swap"));

        let mut state = AppState::default();
        state.notify(notice);
        assert_eq!(state.take_notices().len(), 1);
        assert!(state.notices.is_empty());
    }
}
