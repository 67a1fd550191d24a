use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::services::{Blender, DEFAULT_BEST_N};

/// Bounds applied to the `best_n` query parameter
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub default_best_n: usize,
    pub max_best_n: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            default_best_n: DEFAULT_BEST_N,
            max_best_n: 100,
        }
    }
}

impl From<&Config> for RequestLimits {
    fn from(config: &Config) -> Self {
        Self {
            default_best_n: config.default_best_n,
            max_best_n: config.max_best_n,
        }
    }
}

/// Shared application state
///
/// The blender is immutable once built, so handlers share it without locking.
/// Swapping in freshly loaded artifacts means building a new `AppState`.
#[derive(Clone)]
pub struct AppState {
    pub blender: Arc<Blender>,
    pub limits: RequestLimits,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(blender: Blender, limits: RequestLimits) -> Self {
        Self {
            blender: Arc::new(blender),
            limits,
            loaded_at: Utc::now(),
        }
    }
}
