use crate::error::{Result, WordlockError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти все клавиатурные устройства для мониторинга.
    ///
    /// device_path == "auto" — перечислить /dev/input/event* и отобрать все
    /// устройства с клавиатурными возможностями; иначе мониторится только
    /// указанное устройство. Пустой результат — фатальная ошибка для
    /// вызывающего: мониторить нечего.
    pub fn find_keyboards(device_path: &str) -> Result<Vec<(PathBuf, evdev::Device)>> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            if !path.exists() {
                return WordlockError::device_not_found(format!(
                    "Указанное устройство не найдено: {:?}",
                    path
                ));
            }

            let device = evdev::Device::open(&path).map_err(|e| {
                WordlockError::Permission(format!(
                    "Не удалось открыть устройство {:?}: {}",
                    path, e
                ))
            })?;

            if !Self::is_keyboard_device(&device) {
                return WordlockError::device_not_found(format!(
                    "Устройство {:?} не является клавиатурой",
                    path
                ));
            }

            info!("Используется указанное устройство: {:?}", path);
            return Ok(vec![(path, device)]);
        }

        Self::find_all_keyboards()
    }

    fn find_all_keyboards() -> Result<Vec<(PathBuf, evdev::Device)>> {
        info!("Начинаем поиск клавиатурных устройств...");

        let entries = fs::read_dir("/dev/input").map_err(|e| {
            WordlockError::Enumeration(format!("Нет доступа к /dev/input: {}", e))
        })?;

        let mut event_devices = Vec::new();

        for entry in entries {
            let entry = entry.map_err(WordlockError::Io)?;
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if name.starts_with("event") {
                event_devices.push(path);
            }
        }

        // Сортируем устройства по номеру для стабильного порядка
        event_devices.sort();

        let mut keyboards = Vec::new();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);

            match evdev::Device::open(&device_path) {
                Ok(device) => {
                    if Self::is_keyboard_device(&device) {
                        info!(
                            "Найдена клавиатура: {} ({:?})",
                            device.name().unwrap_or("Unknown"),
                            device_path
                        );
                        keyboards.push((device_path, device));
                    }
                }
                Err(e) => {
                    debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                }
            }
        }

        if keyboards.is_empty() {
            warn!("Клавиатурные устройства не найдены");
            return WordlockError::device_not_found(
                "Не найдено ни одного клавиатурного устройства. \
                 Убедитесь, что пользователь добавлен в группу 'input'",
            );
        }

        Ok(keyboards)
    }

    fn is_keyboard_device(device: &evdev::Device) -> bool {
        let device_name = device.name().unwrap_or("Unknown").to_lowercase();

        // Исключаем мыши и тачпады по имени устройства
        if device_name.contains("mouse")
            || device_name.contains("touchpad")
            || device_name.contains("trackpoint")
        {
            debug!("Исключаем устройство как мышь/тачпад: {}", device_name);
            return false;
        }

        // Проверяем, поддерживает ли устройство клавиатурные события
        device.supported_keys().map_or(false, |keys| {
            let basic_keys = keys.contains(evdev::KeyCode::KEY_A)
                && keys.contains(evdev::KeyCode::KEY_SPACE)
                && keys.contains(evdev::KeyCode::KEY_ENTER);

            let key_count = keys.iter().count();

            basic_keys && key_count > 20 // У настоящей клавиатуры много клавиш
        })
    }

    #[allow(dead_code)]
    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}
