use std::fmt;

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Событие нажатия клавиши.
///
/// Создаётся читателем устройства, передаётся (move) в общий канал и дальше
/// принадлежит только агрегатору. В канал попадают исключительно нажатия:
/// отпускания и автоповторы отфильтровываются на стороне читателя.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPressEvent {
    pub key_code: KeyCode,
    pub device_name: String,
    pub timestamp: std::time::Instant,
}

impl KeyPressEvent {
    pub fn new(key_code: KeyCode, device_name: String) -> Self {
        Self {
            key_code,
            device_name,
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for KeyPressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] ({})",
            self.key_code,
            self.device_name,
            self.timestamp.elapsed().as_millis()
        )
    }
}
