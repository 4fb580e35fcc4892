//! Run statistics and tracing setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Counters updated by the tick loop; cheap enough to share across threads.
pub struct Metrics {
    tick_count: AtomicU64,
    creature_count: AtomicU64,
    food_count: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    policy_failures: AtomicU64,
    busy_nanos: AtomicU64,
    start_time: Instant,
    log_every: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(1000)
    }

    /// Logs a summary every `log_every` ticks (zero disables it).
    #[must_use]
    pub fn with_interval(log_every: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            creature_count: AtomicU64::new(0),
            food_count: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            policy_failures: AtomicU64::new(0),
            busy_nanos: AtomicU64::new(0),
            start_time: Instant::now(),
            log_every,
        }
    }

    pub fn record_tick(&self, duration: Duration, creatures: usize, food: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.creature_count.store(creatures as u64, Ordering::Relaxed);
        self.food_count.store(food as u64, Ordering::Relaxed);
        self.busy_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);

        if self.log_every > 0 && tick % self.log_every == 0 {
            tracing::info!(
                tick,
                creatures,
                food,
                births = self.births(),
                deaths = self.deaths(),
                duration_us = duration.as_micros() as u64,
                mean_tick_us = self.mean_tick().as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn record_births(&self, n: usize) {
        self.births.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_deaths(&self, n: usize) {
        self.deaths.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_policy_failures(&self, n: usize) {
        self.policy_failures.fetch_add(n as u64, Ordering::Relaxed);
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn creature_count(&self) -> u64 {
        self.creature_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn food_count(&self) -> u64 {
        self.food_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn policy_failures(&self) -> u64 {
        self.policy_failures.load(Ordering::Relaxed)
    }

    /// Mean wall time spent inside recorded ticks.
    #[must_use]
    pub fn mean_tick(&self) -> Duration {
        let ticks = self.tick_count();
        if ticks == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.busy_nanos.load(Ordering::Relaxed) / ticks)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` overrides the `info` default.
/// Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}

/// Replaces the default panic hook, which prints to stderr, with a tracing
/// event. Panics on worker threads are caught per creature and already
/// reported, so they log at `debug`; panics on the main thread log at `error`.
pub fn route_panics_to_tracing() {
    std::panic::set_hook(Box::new(|info| {
        let thread = std::thread::current();
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        if thread.name() == Some("main") {
            tracing::error!(%location, panic = %info, "Panicked");
        } else {
            tracing::debug!(%location, panic = %info, "Panic caught on worker thread");
        }
    }));
}
