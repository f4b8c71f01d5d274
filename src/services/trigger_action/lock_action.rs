use crate::error::{Result, WordlockError};
use std::process::Command;
use tracing::{debug, info, warn};

use super::r#trait::TriggerAction;

/// Блокировка сессии с двухуровневым fallback: loginctl, затем xset.
///
/// Неудача обоих вариантов возвращается как ошибка действия; вызывающий
/// логирует её и продолжает мониторинг.
pub struct SessionLockAction;

impl SessionLockAction {
    pub fn new() -> Self {
        Self
    }

    fn lock_via_loginctl(&self) -> Result<()> {
        debug!("Попытка блокировки через loginctl");
        let status = Command::new("loginctl")
            .arg("lock-session")
            .status()
            .map_err(|e| WordlockError::Action(format!("loginctl не найден: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(WordlockError::Action(format!(
                "loginctl завершился с кодом {:?}",
                status.code()
            )))
        }
    }

    fn lock_via_xset(&self) -> Result<()> {
        debug!("Попытка блокировки через xset");
        let status = Command::new("xset")
            .args(["s", "activate"])
            .status()
            .map_err(|e| WordlockError::Action(format!("xset не найден: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(WordlockError::Action(format!(
                "xset завершился с кодом {:?}",
                status.code()
            )))
        }
    }
}

#[async_trait::async_trait]
impl TriggerAction for SessionLockAction {
    async fn fire(&self) -> Result<()> {
        match self.lock_via_loginctl() {
            Ok(()) => {
                info!("Сессия заблокирована через loginctl");
                return Ok(());
            }
            Err(e) => {
                warn!("loginctl не сработал ({}), пробуем fallback через xset", e);
            }
        }

        match self.lock_via_xset() {
            Ok(()) => {
                info!("Сессия заблокирована через xset");
                Ok(())
            }
            Err(e) => Err(WordlockError::Action(format!(
                "ни loginctl, ни xset не смогли заблокировать сессию: {}",
                e
            ))),
        }
    }
}
