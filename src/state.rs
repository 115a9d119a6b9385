use crate::config::AppConfig;
use crate::errors::CalcResult;
use crate::models::asb_yield::compute_yield;
use crate::models::price_curve::compute_price;
use crate::session::store::SessionStore;
use portable_atomic::AtomicU64;
use std::sync::Arc;

// ── Calculator inputs ──

/// AC performance distribution. Supplied once per session and reused for
/// every threshold query until the session is reset.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DistributionParams {
    pub mean: f64,
    pub sigma: f64,
}

impl DistributionParams {
    #[inline]
    pub fn yield_at(&self, kpi_criteria: f64) -> CalcResult<f64> {
        compute_yield(self.mean, self.sigma, kpi_criteria)
    }
}

/// Interpolation endpoints for the price curve. The default is the fixed
/// 220/190 pair; sessions may override either end.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PriceBounds {
    pub price_max: f64,
    pub price_min: f64,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            price_max: 220.0,
            price_min: 190.0,
        }
    }
}

impl PriceBounds {
    #[inline]
    pub fn price_for(&self, kpi_value: f64) -> CalcResult<f64> {
        compute_price(kpi_value, self.price_max, self.price_min)
    }
}

// ── Log entry ──

/// One successful calculation. Never constructed for a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LogEntry {
    pub kpi_criteria: f64,
    pub asb_yield: f64,
    pub price: f64,
}

// ── Request Counters (lock-free) ──

pub struct RequestCounters {
    pub submissions: AtomicU64,
    pub entries_recorded: AtomicU64,
    pub input_errors: AtomicU64,
    pub resets: AtomicU64,
    pub sessions_created: AtomicU64,
    pub sessions_evicted: AtomicU64,
}

impl RequestCounters {
    pub fn new() -> Self {
        Self {
            submissions: AtomicU64::new(0),
            entries_recorded: AtomicU64::new(0),
            input_errors: AtomicU64::new(0),
            resets: AtomicU64::new(0),
            sessions_created: AtomicU64::new(0),
            sessions_evicted: AtomicU64::new(0),
        }
    }
}

// ── Application shared state ──

pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub counters: RequestCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let sessions = SessionStore::new(config.max_sessions, config.default_price_bounds);
        Arc::new(Self {
            config,
            sessions,
            counters: RequestCounters::new(),
        })
    }
}
