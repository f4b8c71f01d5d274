use crate::events::{KeyCode, KeyPressEvent};
use evdev::{Device, EventType};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Читатель одного устройства ввода.
///
/// Владеет своим дескриптором устройства весь срок жизни и пересылает в общий
/// канал только события нажатия (value == 1). Отпускания, автоповторы и
/// события других типов молча отбрасываются. Ошибка чтения (устройство
/// отключено, права отозваны) завершает только этот читатель: остальные
/// читатели и агрегатор продолжают работать.
pub struct DeviceReader {
    device: Device,
    device_name: String,
    device_path: PathBuf,
    tx: mpsc::Sender<KeyPressEvent>,
}

impl DeviceReader {
    pub fn new(device_path: PathBuf, device: Device, tx: mpsc::Sender<KeyPressEvent>) -> Self {
        let device_name = device.name().unwrap_or("Unknown").to_string();
        Self {
            device,
            device_name,
            device_path,
            tx,
        }
    }

    pub async fn run(mut self) {
        info!(
            "Слушаем устройство: {} ({})",
            self.device_name,
            self.device_path.display()
        );

        loop {
            let events_vec = match self.device.fetch_events() {
                Ok(events) => events.collect::<Vec<_>>(),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
                    continue;
                }
                Err(e) => {
                    warn!(
                        "Ошибка чтения с устройства {}: {}. Останавливаем читатель.",
                        self.device_name, e
                    );
                    break;
                }
            };

            for event in events_vec {
                // Только нажатия: value 0 — отпускание, 2 — автоповтор
                if event.event_type() == EventType::KEY && event.value() == 1 {
                    let press =
                        KeyPressEvent::new(KeyCode::new(event.code()), self.device_name.clone());

                    // Полный канал притормаживает читатель (backpressure);
                    // закрытый канал означает, что агрегатор завершился
                    if self.tx.send(press).await.is_err() {
                        debug!(
                            "Канал закрыт, читатель {} завершает работу",
                            self.device_name
                        );
                        return;
                    }
                }
            }

            // Небольшая задержка для предотвращения 100% загрузки CPU
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        }

        info!("Читатель устройства {} завершён", self.device_name);
    }
}
