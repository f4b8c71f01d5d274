pub mod detector;
pub mod device_reader;
pub mod key_map;
pub mod layout;
pub mod trigger_action;

pub use detector::{EventAggregator, WordDetector};
pub use device_reader::DeviceReader;
pub use key_map::KeyMap;
pub use trigger_action::create_trigger_action;
