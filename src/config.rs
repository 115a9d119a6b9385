use crate::errors::{CalcError, CalcResult};
use crate::state::PriceBounds;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    /// Bounds given to every new session before the user edits them.
    pub default_price_bounds: PriceBounds,
    pub max_sessions: usize,
    pub session_cookie: String,
}

impl AppConfig {
    pub fn from_env() -> CalcResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| CalcError::Config(format!("SERVER_PORT: {e}")))?;

        let price_max = env_var_or("DEFAULT_PRICE_MAX", "220")
            .parse::<f64>()
            .map_err(|e| CalcError::Config(format!("DEFAULT_PRICE_MAX: {e}")))?;

        let price_min = env_var_or("DEFAULT_PRICE_MIN", "190")
            .parse::<f64>()
            .map_err(|e| CalcError::Config(format!("DEFAULT_PRICE_MIN: {e}")))?;

        if !price_max.is_finite() || !price_min.is_finite() {
            return Err(CalcError::Config("default price bounds must be finite".into()));
        }

        let max_sessions = env_var_or("MAX_SESSIONS", "10000")
            .parse::<usize>()
            .map_err(|e| CalcError::Config(format!("MAX_SESSIONS: {e}")))?;

        if max_sessions == 0 {
            return Err(CalcError::Config("MAX_SESSIONS must be at least 1".into()));
        }

        Ok(Self {
            server_port,
            default_price_bounds: PriceBounds { price_max, price_min },
            max_sessions,
            session_cookie: env_var_or("SESSION_COOKIE", "asb_session"),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            default_price_bounds: PriceBounds::default(),
            max_sessions: 10_000,
            session_cookie: "asb_session".to_string(),
        }
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
