//! # Exchange Client Provider
//!
//! Owns the loaded Phoenix markets, the optional trader, and the current
//! market selection.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──reload──▶ Loading ──ok──▶ Ready ──reload──▶ Loading ...
//!                              │
//!                              └─retries exhausted──▶ Failed(reason)
//! ```
//!
//! A reload (cluster or wallet change) bumps the epoch. Anything that was
//! started under an older epoch, whether a slow reload or a refresh tick, is
//! discarded when it completes.
//!
//! State is published as an immutable [`ExchangeSnapshot`]. A refresh builds
//! a new market list and swaps the `Arc`; readers never observe a partially
//! refreshed list.

use super::poll::PollHandle;
use super::query::QueryParams;
use futures::future::join_all;
use lib_solana::phoenix::PREFERRED_MARKET_NAME;
use lib_solana::{Cluster, Market, MarketSource, Token, Trader};
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(1_500);

/// Query parameter mirroring the selected market.
pub const MARKET_PARAM: &str = "market";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClientState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

impl ClientState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ClientState::Ready)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 4,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Immutable view of the loaded exchange.
#[derive(Debug, Clone, Default)]
pub struct ExchangeSnapshot {
    pub markets: Arc<Vec<Arc<Market>>>,
    pub tokens: Arc<Vec<Token>>,
    pub trader: Option<Trader>,
}

impl ExchangeSnapshot {
    pub fn market(&self, address: &Pubkey) -> Option<Arc<Market>> {
        self.markets.iter().find(|m| m.address == *address).cloned()
    }

    pub fn market_by_name(&self, name: &str) -> Option<Arc<Market>> {
        self.markets.iter().find(|m| m.name == name).cloned()
    }
}

struct Inner {
    state: ClientState,
    epoch: u64,
    cluster: Option<Cluster>,
    trader: Option<Pubkey>,
    source: Option<Arc<dyn MarketSource>>,
    snapshot: Arc<ExchangeSnapshot>,
    selected: Option<Pubkey>,
}

pub struct ExchangeClientProvider {
    inner: RwLock<Inner>,
    query: Arc<RwLock<QueryParams>>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ExchangeClientProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ExchangeClientProvider")
            .field("state", &inner.state)
            .field("epoch", &inner.epoch)
            .field("markets", &inner.snapshot.markets.len())
            .finish()
    }
}

impl ExchangeClientProvider {
    pub fn new(query: Arc<RwLock<QueryParams>>) -> Self {
        Self::with_retry(query, RetryPolicy::default())
    }

    pub fn with_retry(query: Arc<RwLock<QueryParams>>, retry: RetryPolicy) -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: ClientState::Uninitialized,
                epoch: 0,
                cluster: None,
                trader: None,
                source: None,
                snapshot: Arc::new(ExchangeSnapshot::default()),
                selected: None,
            }),
            query,
            retry,
        }
    }

    // region: --- Accessors

    pub fn state(&self) -> ClientState {
        self.inner.read().state.clone()
    }

    pub fn epoch(&self) -> u64 {
        self.inner.read().epoch
    }

    pub fn snapshot(&self) -> Arc<ExchangeSnapshot> {
        self.inner.read().snapshot.clone()
    }

    pub fn cluster(&self) -> Option<Cluster> {
        self.inner.read().cluster
    }

    pub fn selected_market(&self) -> Option<Arc<Market>> {
        let inner = self.inner.read();
        inner.selected.and_then(|addr| inner.snapshot.market(&addr))
    }

    // endregion: --- Accessors

    /// Discard the current client and load a new one from `source`.
    ///
    /// Loading is retried with exponential backoff. If a newer reload starts
    /// while this one is still running, this one's result is dropped.
    ///
    /// Returns the epoch this reload ran under with the state it settled on.
    /// A superseded reload reports its own, now stale, epoch.
    pub async fn reload(
        &self,
        source: Arc<dyn MarketSource>,
        cluster: Cluster,
        trader: Option<Pubkey>,
    ) -> (u64, ClientState) {
        let (epoch, cluster_changed) = {
            let mut inner = self.inner.write();
            inner.epoch += 1;
            inner.state = ClientState::Loading;
            inner.snapshot = Arc::new(ExchangeSnapshot::default());
            inner.source = Some(source.clone());
            inner.trader = trader;
            let changed = inner.cluster.is_some_and(|c| c != cluster);
            inner.cluster = Some(cluster);
            (inner.epoch, changed)
        };
        info!(cluster = %cluster, epoch, has_trader = trader.is_some(), "Loading exchange client");

        let start = Instant::now();
        let mut attempt = 0;
        let catalog = loop {
            attempt += 1;
            match source.load_markets(cluster).await {
                Ok(catalog) => break catalog,
                Err(e) if attempt < self.retry.attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        cluster = %cluster,
                        epoch,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Exchange client load failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    if self.epoch() != epoch {
                        debug!(epoch, "Reload superseded during backoff");
                        return (epoch, self.state());
                    }
                }
                Err(e) => {
                    error!(cluster = %cluster, epoch, attempts = attempt, error = %e, "Exchange client load failed");
                    let mut inner = self.inner.write();
                    if inner.epoch == epoch {
                        inner.state = ClientState::Failed(e.user_message());
                    }
                    return (epoch, inner.state.clone());
                }
            }
        };

        let trader_state = match trader {
            Some(pubkey) => match source.load_trader(&pubkey, &catalog.tokens).await {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!(trader = %pubkey, error = %e, "Failed to load trader balances");
                    Some(Trader::new(pubkey))
                }
            },
            None => None,
        };

        let snapshot = ExchangeSnapshot {
            markets: Arc::new(catalog.markets.into_iter().map(Arc::new).collect()),
            tokens: Arc::new(catalog.tokens),
            trader: trader_state,
        };

        let selected = {
            let query = self.query.read();
            let from_query = if cluster_changed { None } else { query.get(MARKET_PARAM) };
            initial_market(&snapshot, from_query)
        };

        let mut inner = self.inner.write();
        if inner.epoch != epoch {
            debug!(epoch, current = inner.epoch, "Discarding superseded exchange load");
            return (epoch, inner.state.clone());
        }
        info!(
            cluster = %cluster,
            epoch,
            markets = snapshot.markets.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Exchange client ready"
        );
        inner.snapshot = Arc::new(snapshot);
        inner.selected = selected;
        inner.state = ClientState::Ready;
        drop(inner);

        if let Some(addr) = selected {
            self.query.write().set(MARKET_PARAM, addr.to_string());
        }
        (epoch, ClientState::Ready)
    }

    /// Select a loaded market. Unknown addresses are ignored.
    pub fn change_market(&self, address: &Pubkey) -> bool {
        {
            let mut inner = self.inner.write();
            if inner.snapshot.market(address).is_none() {
                debug!(market = %address, "Ignoring unknown market selection");
                return false;
            }
            inner.selected = Some(*address);
        }
        self.query.write().set(MARKET_PARAM, address.to_string());
        true
    }

    /// Re-fetch every market and the trader once.
    ///
    /// Markets whose refresh fails keep their previous state.
    pub async fn refresh(&self) {
        let (epoch, source, snapshot) = {
            let inner = self.inner.read();
            match (&inner.state, &inner.source) {
                (ClientState::Ready, Some(source)) => (inner.epoch, source.clone(), inner.snapshot.clone()),
                _ => return,
            }
        };

        let start = Instant::now();
        let results = join_all(snapshot.markets.iter().map(|m| source.refresh_market(m))).await;

        let mut failed = 0usize;
        let markets: Vec<Arc<Market>> = snapshot
            .markets
            .iter()
            .zip(results)
            .map(|(previous, result)| match result {
                Ok(market) => Arc::new(market),
                Err(e) => {
                    failed += 1;
                    debug!(market = %previous.address, error = %e, "Market refresh failed, keeping previous");
                    previous.clone()
                }
            })
            .collect();

        let trader = match &snapshot.trader {
            Some(previous) => match source.load_trader(&previous.pubkey, &snapshot.tokens).await {
                Ok(t) => Some(t),
                Err(e) => {
                    debug!(trader = %previous.pubkey, error = %e, "Trader refresh failed, keeping previous");
                    Some(previous.clone())
                }
            },
            None => None,
        };

        let mut inner = self.inner.write();
        if inner.epoch != epoch {
            debug!(epoch, current = inner.epoch, "Discarding stale refresh tick");
            return;
        }
        inner.snapshot = Arc::new(ExchangeSnapshot {
            markets: Arc::new(markets),
            tokens: snapshot.tokens.clone(),
            trader,
        });

        if failed > 0 {
            warn!(failed, total = snapshot.markets.len(), "Some markets failed to refresh");
        }
        debug!(
            markets = snapshot.markets.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Refreshed markets"
        );
    }

    /// Refresh every [`REFRESH_INTERVAL`] while the returned handle lives.
    pub fn start_polling(self: &Arc<Self>) -> PollHandle {
        let mut handle = PollHandle::new();
        let provider = Arc::clone(self);
        handle.every(REFRESH_INTERVAL, move || {
            let provider = Arc::clone(&provider);
            async move { provider.refresh().await }
        });
        handle
    }
}

/// Query param match, then the preferred pair, then the first market.
fn initial_market(snapshot: &ExchangeSnapshot, from_query: Option<&str>) -> Option<Pubkey> {
    from_query
        .and_then(|s| Pubkey::from_str(s).ok())
        .and_then(|addr| snapshot.market(&addr))
        .or_else(|| snapshot.market_by_name(PREFERRED_MARKET_NAME))
        .or_else(|| snapshot.markets.first().cloned())
        .map(|m| m.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use async_trait::async_trait;
    use lib_core::AppError;
    use lib_solana::MarketCatalog;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct MockSource {
        catalog: MarketCatalog,
        load_failures: AtomicU32,
        load_calls: AtomicU32,
        failing_markets: RwLock<HashSet<Pubkey>>,
        refresh_fee_bps: AtomicU32,
    }

    impl MockSource {
        fn new(load_failures: u32) -> Arc<Self> {
            let (markets, tokens) = fixtures::sample_markets();
            Arc::new(Self {
                catalog: MarketCatalog { markets, tokens },
                load_failures: AtomicU32::new(load_failures),
                load_calls: AtomicU32::new(0),
                failing_markets: RwLock::new(HashSet::new()),
                refresh_fee_bps: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl MarketSource for MockSource {
        async fn load_markets(&self, _cluster: Cluster) -> lib_core::Result<MarketCatalog> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            if self.load_failures.load(Ordering::SeqCst) > 0 {
                self.load_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(AppError::Rpc("node unavailable".to_string()));
            }
            Ok(self.catalog.clone())
        }

        async fn refresh_market(&self, market: &Market) -> lib_core::Result<Market> {
            if self.failing_markets.read().contains(&market.address) {
                return Err(AppError::Rpc("timeout".to_string()));
            }
            let mut next = market.clone();
            next.taker_fee_bps = self.refresh_fee_bps.load(Ordering::SeqCst) as u64;
            Ok(next)
        }

        async fn load_trader(&self, trader: &Pubkey, tokens: &[Token]) -> lib_core::Result<Trader> {
            let mut result = Trader::new(*trader);
            for token in tokens {
                result.token_balances.insert(token.mint, 1.5);
            }
            Ok(result)
        }
    }

    fn provider() -> (Arc<RwLock<QueryParams>>, Arc<ExchangeClientProvider>) {
        let query = Arc::new(RwLock::new(QueryParams::new()));
        (query.clone(), Arc::new(ExchangeClientProvider::new(query)))
    }

    fn wsol_usdc() -> Pubkey {
        Pubkey::new_from_array([11; 32])
    }

    #[tokio::test]
    async fn test_reload_selects_preferred_market() {
        let (query, provider) = provider();
        assert_eq!(provider.state(), ClientState::Uninitialized);

        let (_, state) = provider.reload(MockSource::new(0), Cluster::MainnetBeta, None).await;
        assert_eq!(state, ClientState::Ready);
        assert_eq!(provider.snapshot().markets.len(), 3);
        assert_eq!(provider.selected_market().unwrap().name, "wSOL/USDC");
        assert_eq!(query.read().get(MARKET_PARAM), Some(wsol_usdc().to_string().as_str()));
    }

    #[tokio::test]
    async fn test_query_param_wins_on_first_load() {
        let (query, provider) = provider();
        let jup = Pubkey::new_from_array([12; 32]);
        query.write().set(MARKET_PARAM, jup.to_string());

        provider.reload(MockSource::new(0), Cluster::MainnetBeta, None).await;
        assert_eq!(provider.selected_market().unwrap().address, jup);
    }

    #[tokio::test]
    async fn test_cluster_change_resets_to_preferred() {
        let (_query, provider) = provider();
        provider.reload(MockSource::new(0), Cluster::MainnetBeta, None).await;
        assert!(provider.change_market(&Pubkey::new_from_array([12; 32])));

        provider.reload(MockSource::new(0), Cluster::Devnet, None).await;
        assert_eq!(provider.selected_market().unwrap().address, wsol_usdc());
    }

    #[tokio::test]
    async fn test_change_market_ignores_unknown() {
        let (query, provider) = provider();
        provider.reload(MockSource::new(0), Cluster::MainnetBeta, None).await;
        assert!(!provider.change_market(&Pubkey::new_from_array([99; 32])));
        assert_eq!(provider.selected_market().unwrap().address, wsol_usdc());
        assert_eq!(query.read().get(MARKET_PARAM), Some(wsol_usdc().to_string().as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_retries_with_backoff() {
        let (_query, provider) = provider();
        let source = MockSource::new(2);
        let (_, state) = provider.reload(source.clone(), Cluster::MainnetBeta, None).await;
        assert_eq!(state, ClientState::Ready);
        assert_eq!(source.load_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_fails_after_exhausting_attempts() {
        let (_query, provider) = provider();
        let source = MockSource::new(10);
        let (_, state) = provider.reload(source.clone(), Cluster::MainnetBeta, None).await;
        assert!(matches!(state, ClientState::Failed(_)));
        assert_eq!(source.load_calls.load(Ordering::SeqCst), 4);
        assert!(provider.snapshot().markets.is_empty());
    }

    #[test]
    fn test_backoff_doubles() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.delay_after(1), Duration::from_millis(500));
        assert_eq!(retry.delay_after(2), Duration::from_millis(1_000));
        assert_eq!(retry.delay_after(3), Duration::from_millis(2_000));
    }

    #[tokio::test]
    async fn test_refresh_isolates_failing_market() {
        let (_query, provider) = provider();
        let source = MockSource::new(0);
        provider.reload(source.clone(), Cluster::MainnetBeta, None).await;
        let before = provider.snapshot();

        source.failing_markets.write().insert(wsol_usdc());
        source.refresh_fee_bps.store(7, Ordering::SeqCst);
        provider.refresh().await;

        let after = provider.snapshot();
        assert!(!Arc::ptr_eq(&before.markets, &after.markets));
        for market in after.markets.iter() {
            if market.address == wsol_usdc() {
                assert_eq!(market.taker_fee_bps, 0);
            } else {
                assert_eq!(market.taker_fee_bps, 7);
            }
        }
        // The snapshot taken before the refresh is untouched
        assert!(before.markets.iter().all(|m| m.taker_fee_bps == 0));
    }

    #[tokio::test]
    async fn test_trader_balances_loaded_and_refreshed() {
        let (_query, provider) = provider();
        let trader = Pubkey::new_from_array([50; 32]);
        provider.reload(MockSource::new(0), Cluster::MainnetBeta, Some(trader)).await;

        let snapshot = provider.snapshot();
        let loaded = snapshot.trader.as_ref().unwrap();
        assert_eq!(loaded.pubkey, trader);
        assert_eq!(loaded.balance(&fixtures::token("USDC", 2).mint), 1.5);

        provider.refresh().await;
        assert!(provider.snapshot().trader.is_some());
    }

    #[tokio::test]
    async fn test_refresh_is_noop_until_ready() {
        let (_query, provider) = provider();
        provider.refresh().await;
        assert_eq!(provider.state(), ClientState::Uninitialized);
        assert!(provider.snapshot().markets.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_reload_supersedes_older() {
        let (_query, provider) = provider();
        let slow = MockSource::new(1);
        let fast = MockSource::new(0);

        let older = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.reload(slow, Cluster::MainnetBeta, None).await })
        };
        tokio::task::yield_now().await;
        provider.reload(fast, Cluster::Devnet, None).await;
        older.await.unwrap();

        assert_eq!(provider.state(), ClientState::Ready);
        assert_eq!(provider.cluster(), Some(Cluster::Devnet));
        assert_eq!(provider.epoch(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_reload_reports_its_own_epoch() {
        let (_query, provider) = provider();
        let slow = MockSource::new(1);
        let broken = MockSource::new(u32::MAX);

        let older = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.reload(slow, Cluster::MainnetBeta, None).await })
        };
        tokio::task::yield_now().await;
        let (newer_epoch, newer_state) = provider.reload(broken, Cluster::MainnetBeta, None).await;
        let (older_epoch, _) = older.await.unwrap();

        assert_eq!(newer_epoch, 2);
        assert!(matches!(newer_state, ClientState::Failed(_)));
        assert_eq!(older_epoch, 1);
        assert_ne!(older_epoch, provider.epoch());
    }
}
