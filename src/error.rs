use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordlockError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка перечисления устройств: {0}")]
    Enumeration(String),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Не удалось определить раскладку: {0}")]
    LayoutDetection(String),

    #[error("Ошибка действия блокировки: {0}")]
    Action(String),
}

impl WordlockError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(WordlockError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, WordlockError>;
