pub mod keyboard;

pub use keyboard::{KeyCode, KeyPressEvent};
