//! Per-session context handed to every handler.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use parley_core::config::UserConfig;
use parley_core::types::{Clock, SystemClock};

/// Read-only facts about the session: who is speaking, where, and what time it is.
///
/// Owned by the session and passed to handlers by reference, so several
/// independent sessions can run side by side.
#[derive(Clone)]
pub struct SessionContext {
    pub user_name: String,
    pub city: String,
    pub locale: String,
    clock: Arc<dyn Clock>,
}

impl SessionContext {
    pub fn new(user: &UserConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_name: user.name.clone(),
            city: user.city.clone(),
            locale: user.locale.clone(),
            clock,
        }
    }

    /// Context for `user` reading the system clock.
    pub fn with_system_clock(user: &UserConfig) -> Self {
        Self::new(user, Arc::new(SystemClock))
    }

    /// Current local date-time, read at call time.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_name", &self.user_name)
            .field("city", &self.city)
            .field("locale", &self.locale)
            .finish()
    }
}
