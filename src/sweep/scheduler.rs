//! Background sweep worker

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use super::evaluator::evaluate;
use crate::notify::{templates, Notifier};
use crate::price::PriceSource;
use crate::watch::{Watch, WatchStore};

/// Outcome counters for one sweep.
///
/// The skip counters are per watch: every examined watch lands in exactly
/// one of triggered / fetch_failures / quote_unavailable or passed
/// evaluation without triggering, even when the quote came from the
/// per-sweep cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Pending watches examined
    pub checked: usize,
    /// Watches whose condition held
    pub triggered: usize,
    /// Trigger notifications delivered (and flags flipped)
    pub notified: usize,
    /// Watches skipped because the quote fetch failed
    pub fetch_failures: usize,
    /// Watches skipped because the source had no quote
    pub quote_unavailable: usize,
    /// Trigger sends that failed and will be retried next tick
    pub notify_failures: usize,
}

/// Result of one quote lookup, cached per asset for the rest of the sweep
#[derive(Debug, Clone, Copy)]
enum QuoteOutcome {
    Price(f64),
    Unavailable,
    Failed,
}

/// Periodic sweep worker.
///
/// Each tick runs one sweep over a snapshot of the store. The sweep is
/// awaited inline in the timer loop, so ticks are serialized: an overrunning
/// sweep delays the next tick rather than overlapping it.
pub struct Sweeper {
    store: Arc<WatchStore>,
    prices: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl Sweeper {
    pub fn new(
        store: Arc<WatchStore>,
        prices: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            prices,
            notifier,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the background worker
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!("Sweep worker started with interval {:?}", self.interval);

            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately; the first real sweep waits one period
            ticker.tick().await;

            while self.running.load(Ordering::SeqCst) {
                ticker.tick().await;

                let stats = self.sweep().await;
                if stats.checked > 0 {
                    tracing::info!(
                        checked = stats.checked,
                        triggered = stats.triggered,
                        notified = stats.notified,
                        fetch_failures = stats.fetch_failures,
                        quote_unavailable = stats.quote_unavailable,
                        notify_failures = stats.notify_failures,
                        "Sweep complete"
                    );
                }
            }

            tracing::info!("Sweep worker stopped");
        })
    }

    /// Stop the worker after the current tick
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run one sweep over a snapshot of the store.
    ///
    /// Failures are confined to the watch they occur on: a fetch or notify
    /// error leaves that watch pending and the sweep moves on. Quotes are
    /// fetched once per distinct asset per sweep; a failed fetch is cached
    /// for the rest of the sweep so one bad asset costs one upstream call.
    pub async fn sweep(&self) -> SweepStats {
        let snapshot = self.store.snapshot();
        let mut stats = SweepStats::default();
        let mut quotes: HashMap<String, QuoteOutcome> = HashMap::new();

        for watch in snapshot.iter().filter(|w| !w.is_notified()) {
            stats.checked += 1;

            let outcome = match quotes.get(&watch.asset_id) {
                Some(cached) => *cached,
                None => {
                    let fetched = self.fetch_quote(watch).await;
                    quotes.insert(watch.asset_id.clone(), fetched);
                    fetched
                }
            };

            // Counted per watch, so the skip counters add up against
            // `checked` even when the quote came from the cache.
            let price = match outcome {
                QuoteOutcome::Price(price) => price,
                QuoteOutcome::Unavailable => {
                    stats.quote_unavailable += 1;
                    continue;
                }
                QuoteOutcome::Failed => {
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            if !evaluate(watch, price) {
                continue;
            }
            stats.triggered += 1;

            let subject = templates::trigger_subject(watch);
            let body = templates::trigger_body(watch, price);
            match self.notifier.send(&watch.recipient, &subject, &body).await {
                Ok(()) => {
                    watch.mark_notified();
                    stats.notified += 1;
                    tracing::info!(
                        watch_id = watch.id,
                        asset = %watch.asset_id,
                        price,
                        "Trigger notification sent"
                    );
                }
                Err(e) => {
                    // Flag stays false; the next tick retries the send.
                    stats.notify_failures += 1;
                    tracing::error!(
                        watch_id = watch.id,
                        asset = %watch.asset_id,
                        error = %e,
                        "Failed to send trigger notification"
                    );
                }
            }
        }

        stats
    }

    async fn fetch_quote(&self, watch: &Watch) -> QuoteOutcome {
        match self.prices.quote(&watch.asset_id).await {
            Ok(Some(price)) => QuoteOutcome::Price(price),
            Ok(None) => {
                tracing::warn!(
                    watch_id = watch.id,
                    asset = %watch.asset_id,
                    "No quote available"
                );
                QuoteOutcome::Unavailable
            }
            Err(e) => {
                tracing::error!(
                    watch_id = watch.id,
                    asset = %watch.asset_id,
                    error = %e,
                    "Quote fetch failed"
                );
                QuoteOutcome::Failed
            }
        }
    }
}
