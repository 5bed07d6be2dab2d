//! # Analytics Data Provider
//!
//! Keeps the data screen's datasets fresh for whichever market or trader is
//! selected, on three cadences:
//!
//! | Cadence | Period | Market tab | Trader tab |
//! |---------|--------|------------|------------|
//! | fast    | 1s     | top of book | - |
//! | medium  | 5s     | trade list | - |
//! | slow    | 10s    | volume, top makers, top trades (base and quote), price history | volume, trade history, fees paid |
//!
//! Every change of [`DataKey`] bumps the generation, clears every dataset,
//! and re-arms the timers. A response is applied only if its generation is
//! still current and its per-slot sequence number is not older than the last
//! one applied to that slot.

use super::poll::PollHandle;
use super::query::{QueryParams, Route};
use lib_solana::data_api::types::{Fill, PricePoint, SortToken, TopMaker, TopOfBook, VolumePoint};
use lib_solana::{Cluster, DataApi, MarketRequest, TraderRequest};
use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const FAST_INTERVAL: Duration = Duration::from_secs(1);
pub const MEDIUM_INTERVAL: Duration = Duration::from_secs(5);
pub const SLOW_INTERVAL: Duration = Duration::from_secs(10);

pub const TRADER_PARAM: &str = "trader";
const MARKET_PARAM: &str = super::exchange::MARKET_PARAM;

// region: --- Key

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataTab {
    #[default]
    Market,
    Trader,
}

impl DataTab {
    /// `Trader` when the query already names a trader.
    pub fn initial(query: &QueryParams) -> Self {
        if query.get(TRADER_PARAM).is_some_and(|t| !t.is_empty()) {
            DataTab::Trader
        } else {
            DataTab::Market
        }
    }
}

/// Everything the datasets depend on. Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataKey {
    pub route: Route,
    pub tab: DataTab,
    pub cluster: Cluster,
    pub market: Option<String>,
    pub trader: Option<String>,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

enum FetchPlan {
    Market(MarketRequest),
    Trader(TraderRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Fast,
    Medium,
    Slow,
}

impl Cadence {
    fn period(self) -> Duration {
        match self {
            Cadence::Fast => FAST_INTERVAL,
            Cadence::Medium => MEDIUM_INTERVAL,
            Cadence::Slow => SLOW_INTERVAL,
        }
    }
}

impl DataKey {
    fn plan(&self) -> Option<FetchPlan> {
        if self.route != Route::Data {
            return None;
        }
        let market = self.market.clone().filter(|m| !m.is_empty())?;

        match self.tab {
            DataTab::Market => Some(FetchPlan::Market(MarketRequest {
                cluster: self.cluster,
                market,
                start_ms: self.start_ms,
                end_ms: self.end_ms,
            })),
            DataTab::Trader => {
                let trader = self.trader.clone().filter(|t| !t.is_empty())?;
                Some(FetchPlan::Trader(TraderRequest {
                    cluster: self.cluster,
                    trader,
                    market,
                    start_ms: self.start_ms,
                    end_ms: self.end_ms,
                }))
            }
        }
    }
}

impl FetchPlan {
    fn cadences(&self) -> &'static [Cadence] {
        match self {
            FetchPlan::Market(_) => &[Cadence::Fast, Cadence::Medium, Cadence::Slow],
            FetchPlan::Trader(_) => &[Cadence::Slow],
        }
    }
}

// endregion: --- Key

// region: --- Datasets

/// One dataset plus its ordering bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Slot<T> {
    pub data: Arc<T>,
    issued: u64,
    applied: u64,
}

impl<T> Slot<T> {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn apply(&mut self, seq: u64, data: T) -> bool {
        if seq < self.applied {
            return false;
        }
        self.data = Arc::new(data);
        self.applied = seq;
        true
    }

    /// `true` once any response has been applied since the last reset.
    pub fn is_loaded(&self) -> bool {
        self.applied > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarketData {
    pub top_of_book: Slot<TopOfBook>,
    pub trades: Slot<Vec<Fill>>,
    pub volume: Slot<Vec<VolumePoint>>,
    pub top_makers: Slot<Vec<TopMaker>>,
    pub top_trades_base: Slot<Vec<Fill>>,
    pub top_trades_quote: Slot<Vec<Fill>>,
    pub historical_prices: Slot<Vec<PricePoint>>,
}

#[derive(Debug, Clone, Default)]
pub struct TraderData {
    pub volume: Slot<Vec<VolumePoint>>,
    pub trade_history: Slot<Vec<Fill>>,
    pub fees_paid: Slot<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub generation: u64,
    pub market: MarketData,
    pub trader: TraderData,
}

type SlotFn<T> = fn(&mut Datasets) -> &mut Slot<T>;

// endregion: --- Datasets

pub struct AnalyticsDataProvider {
    api: Arc<dyn DataApi>,
    query: Arc<RwLock<QueryParams>>,
    key: RwLock<Option<DataKey>>,
    datasets: RwLock<Datasets>,
    timers: Mutex<Option<PollHandle>>,
}

impl std::fmt::Debug for AnalyticsDataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsDataProvider")
            .field("key", &*self.key.read())
            .field("generation", &self.datasets.read().generation)
            .finish()
    }
}

impl AnalyticsDataProvider {
    pub fn new(api: Arc<dyn DataApi>, query: Arc<RwLock<QueryParams>>) -> Self {
        Self {
            api,
            query,
            key: RwLock::new(None),
            datasets: RwLock::new(Datasets::default()),
            timers: Mutex::new(None),
        }
    }

    /// Current datasets. Cheap: slot payloads are shared.
    pub fn datasets(&self) -> Datasets {
        self.datasets.read().clone()
    }

    pub fn generation(&self) -> u64 {
        self.datasets.read().generation
    }

    pub fn key(&self) -> Option<DataKey> {
        self.key.read().clone()
    }

    /// Apply a new key. A key equal to the current one changes nothing.
    ///
    /// Otherwise every dataset is cleared, the old timers are cancelled, and
    /// timers for the new key are armed. Returns `true` on change.
    pub fn set_key(self: &Arc<Self>, key: DataKey) -> bool {
        {
            let mut current = self.key.write();
            if current.as_ref() == Some(&key) {
                return false;
            }
            *current = Some(key.clone());
        }

        let generation = {
            let mut datasets = self.datasets.write();
            let generation = datasets.generation + 1;
            *datasets = Datasets {
                generation,
                ..Datasets::default()
            };
            generation
        };

        // Old timers stop here
        let mut timers = self.timers.lock();
        *timers = None;

        let Some(plan) = key.plan() else {
            debug!(generation, route = ?key.route, tab = ?key.tab, "Analytics idle for key");
            return true;
        };

        if let FetchPlan::Trader(req) = &plan {
            let mut query = self.query.write();
            query.set(MARKET_PARAM, req.market.clone());
            query.set(TRADER_PARAM, req.trader.clone());
        }

        let plan = Arc::new(plan);
        let mut handle = PollHandle::new();
        for &cadence in plan.cadences() {
            let provider = Arc::clone(self);
            let plan = Arc::clone(&plan);
            handle.every(cadence.period(), move || {
                Arc::clone(&provider).tick(generation, cadence, Arc::clone(&plan))
            });
        }
        info!(generation, tab = ?key.tab, timers = handle.len(), "Analytics polling armed");
        *timers = Some(handle);
        true
    }

    /// Cancel polling and clear every dataset.
    pub fn stop(&self) {
        *self.timers.lock() = None;
        *self.key.write() = None;
        let mut datasets = self.datasets.write();
        let generation = datasets.generation + 1;
        *datasets = Datasets {
            generation,
            ..Datasets::default()
        };
    }

    async fn tick(self: Arc<Self>, generation: u64, cadence: Cadence, plan: Arc<FetchPlan>) {
        let start = Instant::now();
        let api = &self.api;

        match (&*plan, cadence) {
            (FetchPlan::Market(req), Cadence::Fast) => {
                self.fetch(generation, |d| &mut d.market.top_of_book, "top_of_book", api.top_of_book(req))
                    .await;
            }
            (FetchPlan::Market(req), Cadence::Medium) => {
                self.fetch(generation, |d| &mut d.market.trades, "trades", api.trade_list(req))
                    .await;
            }
            (FetchPlan::Market(req), Cadence::Slow) => {
                futures::join!(
                    self.fetch(generation, |d| &mut d.market.volume, "volume", api.market_volume(req)),
                    self.fetch(generation, |d| &mut d.market.top_makers, "top_makers", api.top_makers(req)),
                    self.fetch(
                        generation,
                        |d| &mut d.market.top_trades_base,
                        "top_trades_base",
                        api.top_trades(req, SortToken::Base)
                    ),
                    self.fetch(
                        generation,
                        |d| &mut d.market.top_trades_quote,
                        "top_trades_quote",
                        api.top_trades(req, SortToken::Quote)
                    ),
                    self.fetch(
                        generation,
                        |d| &mut d.market.historical_prices,
                        "historical_prices",
                        api.historical_prices(req)
                    ),
                );
            }
            (FetchPlan::Trader(req), Cadence::Slow) => {
                futures::join!(
                    self.fetch(generation, |d| &mut d.trader.volume, "trader_volume", api.trader_volume(req)),
                    self.fetch(
                        generation,
                        |d| &mut d.trader.trade_history,
                        "trade_history",
                        api.trade_history(req)
                    ),
                    self.fetch(generation, |d| &mut d.trader.fees_paid, "fees_paid", api.fees_paid(req)),
                );
            }
            (FetchPlan::Trader(_), _) => {}
        }

        debug!(
            generation,
            cadence = ?cadence,
            duration_ms = start.elapsed().as_millis() as u64,
            "Analytics tick"
        );
    }

    /// Issue a sequence number for `slot`, await `request`, then apply the result
    /// if it is still current. Failures leave the slot as it was.
    async fn fetch<T, Fut>(&self, generation: u64, slot: SlotFn<T>, dataset: &'static str, request: Fut)
    where
        Fut: Future<Output = lib_core::Result<T>>,
    {
        let seq = {
            let mut datasets = self.datasets.write();
            if datasets.generation != generation {
                return;
            }
            slot(&mut *datasets).issue()
        };

        match request.await {
            Ok(data) => {
                let mut datasets = self.datasets.write();
                if datasets.generation != generation {
                    debug!(dataset, generation, "Dropping response for a previous key");
                    return;
                }
                if !slot(&mut *datasets).apply(seq, data) {
                    debug!(dataset, seq, "Dropping out-of-order response");
                }
            }
            Err(e) => warn!(dataset, generation, error = %e, "Analytics fetch failed"),
        }
    }
}
