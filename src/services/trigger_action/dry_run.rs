use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use super::r#trait::TriggerAction;

/// Dry-run режим: вместо блокировки только логируем срабатывание
pub struct DryRunAction {
    fired_count: AtomicU64,
}

impl DryRunAction {
    pub fn new() -> Self {
        info!("Dry-run режим - блокировка сессии отключена");
        Self {
            fired_count: AtomicU64::new(0),
        }
    }

    pub fn fired_count(&self) -> u64 {
        self.fired_count.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl TriggerAction for DryRunAction {
    async fn fire(&self) -> Result<()> {
        let count = self.fired_count.fetch_add(1, Ordering::Relaxed) + 1;
        info!("Сработал триггер #{} (dry-run, сессия не блокируется)", count);
        Ok(())
    }
}
