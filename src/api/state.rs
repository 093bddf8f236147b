use std::sync::Arc;
use std::time::Duration;

use crate::bot::Dispatcher;
use crate::cooldown::CooldownTracker;
use crate::fetch::FarmSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FarmSource>,
    pub cooldowns: Arc<tokio::sync::RwLock<CooldownTracker>>,
}

impl AppState {
    pub fn new(source: Arc<dyn FarmSource>, cooldown_window: Duration) -> Self {
        Self {
            source,
            cooldowns: Arc::new(tokio::sync::RwLock::new(CooldownTracker::new(
                cooldown_window,
            ))),
        }
    }

    /// Chat dispatcher sharing this state's source and cooldowns.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.source.clone(), self.cooldowns.clone())
    }
}
