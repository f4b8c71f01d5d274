use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{create_trigger_action, layout, DeviceReader, EventAggregator, KeyMap, WordDetector};
use utils::DeviceFinder;

#[derive(Parser, Debug)]
#[command(name = "wordlock")]
#[command(about = "Демон мониторинга клавиатурного ввода: блокирует сессию при наборе слова-триггера")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "wordlock.toml")]
    config: String,

    /// Режим сухого запуска (без реальной блокировки)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск wordlock v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - блокировка сессии отключена");
    }

    // Проверка прав доступа
    utils::permissions::check_permissions()?;

    // Раскладка определяется один раз до запуска читателей; карта дальше
    // только читается
    let layout = if config.detection.layout == "auto" {
        match layout::detect_layout() {
            Ok(layout) => {
                info!("Определена раскладка клавиатуры: {}", layout);
                layout
            }
            Err(e) => {
                warn!(
                    "Не удалось определить раскладку, используем '{}'. Ошибка: {}",
                    layout::DEFAULT_LAYOUT,
                    e
                );
                layout::DEFAULT_LAYOUT.to_string()
            }
        }
    } else {
        info!("Используется раскладка из конфигурации: {}", config.detection.layout);
        config.detection.layout.clone()
    };

    let key_map = KeyMap::for_layout(&layout);

    // Отсутствие клавиатур - фатальная ошибка: мониторить нечего
    let devices = DeviceFinder::find_keyboards(&config.input.device_path)?;
    info!("Найдено клавиатурных устройств: {}", devices.len());

    // Общий канал: много производителей, один потребитель
    let (tx, rx) = mpsc::channel(config.input.channel_capacity);

    let mut reader_handles = Vec::with_capacity(devices.len());
    for (device_path, device) in devices {
        let reader = DeviceReader::new(device_path, device, tx.clone());
        reader_handles.push(tokio::spawn(reader.run()));
    }

    // Исходный отправитель больше не нужен: канал закроется, как только
    // выйдут все читатели, и агрегатор завершится сам
    drop(tx);

    let detector = WordDetector::new(key_map, &config.detection.trigger_word);
    let action = create_trigger_action(args.dry_run);
    let aggregator = EventAggregator::new(rx, detector, action);
    let mut aggregator_handle = tokio::spawn(aggregator.run());

    info!("Мониторинг клавиатурного ввода запущен");

    // Ожидание сигнала завершения либо самостоятельного выхода агрегатора
    // (все устройства отвалились)
    let mut aggregator_done = false;
    tokio::select! {
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
        }
        _ = &mut aggregator_handle => {
            warn!("Все читатели устройств завершились, агрегатор остановлен");
            aggregator_done = true;
        }
    }

    info!("Завершение работы...");

    // Прерываем читателей: их отправители закрываются, канал опустошается,
    // агрегатор выходит из цикла
    for handle in &reader_handles {
        handle.abort();
    }

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        for handle in reader_handles {
            let _ = handle.await;
        }
        if !aggregator_done {
            let _ = aggregator_handle.await;
        }
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("wordlock завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
