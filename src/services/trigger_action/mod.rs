//! TriggerAction service: responsibility and boundaries
//!
//! This module is responsible ONLY for performing the side effect once the
//! detector reports a match (locking the session, or logging in dry-run).
//! It MUST NOT contain any detection logic or touch the match buffer.

mod dry_run;
mod lock_action;
mod r#trait;

pub use self::r#trait::{create_trigger_action, TriggerAction};
