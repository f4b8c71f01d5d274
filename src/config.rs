use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// "auto" — мониторить все найденные клавиатуры, иначе путь к конкретному устройству
    pub device_path: String,
    /// Ёмкость общего канала событий (backpressure для читателей)
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// Слово-триггер: строчные латинские буквы, сравнение без нормализации
    pub trigger_word: String,
    /// "auto" — определить раскладку через localectl, иначе явный идентификатор
    pub layout: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "wordlock=info".to_string(),
            },
            input: InputConfig {
                device_path: "auto".to_string(),
                channel_capacity: 10,
            },
            detection: DetectionConfig {
                trigger_word: "pizza".to_string(),
                layout: "auto".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        // Дефолты подкладываются первым провайдером: файл может отсутствовать
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WORDLOCK_"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек ввода
        if self.input.channel_capacity == 0 {
            anyhow::bail!("channel_capacity должно быть больше 0");
        }

        // Валидация слова-триггера
        if self.detection.trigger_word.is_empty() {
            anyhow::bail!("trigger_word не может быть пустым");
        }

        if !self
            .detection
            .trigger_word
            .chars()
            .all(|c| c.is_ascii_lowercase())
        {
            anyhow::bail!(
                "trigger_word должно состоять из строчных латинских букв: '{}'",
                self.detection.trigger_word
            );
        }

        if self.detection.layout.is_empty() {
            anyhow::bail!("layout не может быть пустым (используйте \"auto\")");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.trigger_word, "pizza");
        assert_eq!(config.input.channel_capacity, 10);
    }

    #[test]
    fn test_invalid_trigger_word() {
        let mut config = Config::default();

        config.detection.trigger_word = "".to_string();
        assert!(config.validate().is_err());

        config.detection.trigger_word = "Pizza".to_string();
        assert!(config.validate().is_err());

        config.detection.trigger_word = "pi zza".to_string();
        assert!(config.validate().is_err());

        config.detection.trigger_word = "pizza".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_channel_capacity() {
        let mut config = Config::default();
        config.input.channel_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}
