use crate::debug_if_enabled;
use crate::events::KeyPressEvent;
use crate::services::key_map::KeyMap;
use crate::services::trigger_action::TriggerAction;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Детектор слова-триггера: скользящее окно над потоком переведённых символов.
///
/// Буфер принадлежит исключительно агрегатору, блокировки не нужны.
/// Инварианты: длина буфера никогда не превышает длину слова; содержимое
/// буфера — последние принятые символы в порядке нажатия.
pub struct WordDetector {
    key_map: KeyMap,
    word: Vec<char>,
    buffer: VecDeque<char>,
}

impl WordDetector {
    pub fn new(key_map: KeyMap, trigger_word: &str) -> Self {
        Self {
            key_map,
            word: trigger_word.chars().collect(),
            buffer: VecDeque::with_capacity(trigger_word.len()),
        }
    }

    /// Обработать код нажатой клавиши; true — слово набрано полностью.
    ///
    /// Управляющая клавиша сбрасывает буфер, нераспознанный код не меняет
    /// состояние. После совпадения буфер очищается, поэтому детекция
    /// неперекрывающаяся: "pizzapizza" срабатывает ровно два раза.
    pub fn handle_key(&mut self, keycode: u16) -> bool {
        if KeyMap::is_control(keycode) {
            debug_if_enabled!("Управляющая клавиша {}, сброс буфера", keycode);
            self.buffer.clear();
            return false;
        }

        let Some(ch) = self.key_map.translate(keycode) else {
            return false;
        };

        self.buffer.push_back(ch);
        if self.buffer.len() > self.word.len() {
            self.buffer.pop_front();
        }

        if self.buffer.len() == self.word.len()
            && self.buffer.iter().eq(self.word.iter())
        {
            self.buffer.clear();
            return true;
        }

        false
    }

    pub fn trigger_word(&self) -> String {
        self.word.iter().collect()
    }

    #[cfg(test)]
    fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Агрегатор событий: единственный потребитель общего канала.
///
/// Вычитывает события от всех читателей устройств в порядке поступления,
/// прогоняет их через детектор и вызывает действие при каждом совпадении.
/// Завершается, когда канал закрыт, то есть все читатели вышли.
pub struct EventAggregator {
    rx: mpsc::Receiver<KeyPressEvent>,
    detector: WordDetector,
    action: Box<dyn TriggerAction + Send>,
}

impl EventAggregator {
    pub fn new(
        rx: mpsc::Receiver<KeyPressEvent>,
        detector: WordDetector,
        action: Box<dyn TriggerAction + Send>,
    ) -> Self {
        Self {
            rx,
            detector,
            action,
        }
    }

    pub async fn run(mut self) {
        info!(
            "Агрегатор запущен, слово-триггер: '{}'",
            self.detector.trigger_word()
        );

        while let Some(event) = self.rx.recv().await {
            debug_if_enabled!("Событие нажатия: {}", event);

            if self.detector.handle_key(event.key_code.value()) {
                info!(
                    "Обнаружено слово '{}' (последняя клавиша с устройства '{}')",
                    self.detector.trigger_word(),
                    event.device_name
                );

                // Ошибка действия логируется и не останавливает детекцию
                if let Err(e) = self.action.fire().await {
                    error!("Ошибка при выполнении действия: {}", e);
                }
            }
        }

        info!("Канал событий закрыт, агрегатор завершает работу");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, WordlockError};
    use crate::events::KeyCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // evdev-коды: p=25 i=23 z=44 a=30, enter=28 space=57 esc=1
    const P: u16 = 25;
    const I: u16 = 23;
    const Z: u16 = 44;
    const A: u16 = 30;
    const ENTER: u16 = 28;
    const SPACE: u16 = 57;
    const ESC: u16 = 1;

    fn detector(word: &str) -> WordDetector {
        WordDetector::new(KeyMap::for_layout("us"), word)
    }

    fn feed(det: &mut WordDetector, codes: &[u16]) -> usize {
        codes.iter().filter(|&&c| det.handle_key(c)).count()
    }

    #[test]
    fn test_exact_word_fires_once() {
        let mut det = detector("pizza");
        assert_eq!(feed(&mut det, &[P, I, Z, Z, A]), 1);
    }

    #[test]
    fn test_word_inside_longer_sequence() {
        let mut det = detector("pizza");
        // "zzapizzaz" содержит "pizza" как подстроку
        assert_eq!(feed(&mut det, &[Z, Z, A, P, I, Z, Z, A, Z]), 1);
    }

    #[test]
    fn test_non_overlapping_detection() {
        let mut det = detector("pizza");
        // "pizzapizza" — ровно два срабатывания, не три
        assert_eq!(feed(&mut det, &[P, I, Z, Z, A, P, I, Z, Z, A]), 2);
    }

    #[test]
    fn test_control_key_resets_buffer() {
        let mut det = detector("pizza");
        assert_eq!(feed(&mut det, &[P, I, Z, Z, ENTER, A]), 0);
        assert_eq!(feed(&mut det, &[P, I, Z, SPACE, Z, A]), 0);
        assert_eq!(feed(&mut det, &[P, ESC, I, Z, Z, A]), 0);
    }

    #[test]
    fn test_unmapped_code_leaves_buffer_unchanged() {
        let mut det = detector("pizza");
        // 999 нет в карте: буфер не меняется, слово всё равно набирается
        assert_eq!(feed(&mut det, &[P, I, 999, Z, Z, 999, A]), 1);
    }

    #[test]
    fn test_buffer_never_exceeds_word_length() {
        let mut det = detector("pizza");
        for _ in 0..100 {
            det.handle_key(Z);
            assert!(det.buffer_len() <= 5);
        }
    }

    #[test]
    fn test_buffer_cleared_after_match() {
        let mut det = detector("za");
        assert_eq!(feed(&mut det, &[Z, A]), 1);
        assert_eq!(det.buffer_len(), 0);
        // Одиночная "a" после совпадения не срабатывает
        assert!(!det.handle_key(A));
    }

    #[test]
    fn test_arbitrary_trigger_word() {
        let mut det = detector("zap");
        assert_eq!(feed(&mut det, &[Z, A, P]), 1);
        assert_eq!(feed(&mut det, &[A, Z, A, P, A]), 1);
    }

    struct CountingAction {
        fired: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TriggerAction for CountingAction {
        async fn fire(&self) -> Result<()> {
            self.fired.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WordlockError::Action("тестовая ошибка".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_aggregator_cross_device_interleave() {
        let (tx, rx) = mpsc::channel(10);
        let fired = Arc::new(AtomicUsize::new(0));
        let action = Box::new(CountingAction {
            fired: fired.clone(),
            fail: false,
        });

        let aggregator =
            EventAggregator::new(rx, detector("pizza"), action);
        let handle = tokio::spawn(aggregator.run());

        // Слово набрано вперемешку с двух устройств
        let sources = [("kbd-a", P), ("kbd-b", I), ("kbd-a", Z), ("kbd-b", Z), ("kbd-a", A)];
        for (device, code) in sources {
            tx.send(KeyPressEvent::new(KeyCode::new(code), device.to_string()))
                .await
                .unwrap();
        }
        drop(tx);

        handle.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_aggregator_survives_action_errors() {
        let (tx, rx) = mpsc::channel(10);
        let fired = Arc::new(AtomicUsize::new(0));
        let action = Box::new(CountingAction {
            fired: fired.clone(),
            fail: true,
        });

        let aggregator = EventAggregator::new(rx, detector("za"), action);
        let handle = tokio::spawn(aggregator.run());

        // Два совпадения подряд: ошибка первого не мешает второму
        for code in [Z, A, Z, A] {
            tx.send(KeyPressEvent::new(KeyCode::new(code), "kbd".to_string()))
                .await
                .unwrap();
        }
        drop(tx);

        handle.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_aggregator_exits_when_channel_closes() {
        let (tx, rx) = mpsc::channel::<KeyPressEvent>(10);
        let fired = Arc::new(AtomicUsize::new(0));
        let action = Box::new(CountingAction {
            fired: fired.clone(),
            fail: false,
        });

        let aggregator = EventAggregator::new(rx, detector("pizza"), action);
        let handle = tokio::spawn(aggregator.run());

        drop(tx);
        handle.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
