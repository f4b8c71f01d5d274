use crate::error::Result;

/// Trait for trigger actions that can run in different modes
#[async_trait::async_trait]
pub trait TriggerAction {
    /// Perform the configured side effect once per detected match
    async fn fire(&self) -> Result<()>;
}

/// Factory function to create an appropriate trigger action based on the dry_run flag
pub fn create_trigger_action(dry_run: bool) -> Box<dyn TriggerAction + Send> {
    if dry_run {
        Box::new(super::dry_run::DryRunAction::new())
    } else {
        Box::new(super::lock_action::SessionLockAction::new())
    }
}
