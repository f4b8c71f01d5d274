use once_cell::sync::Lazy;
use std::collections::HashMap;

// Управляющие клавиши: сбрасывают буфер детектора и не дают символа
const KEY_ESC: u16 = 1;
const KEY_ENTER: u16 = 28;
const KEY_SPACE: u16 = 57;

// Статическая базовая карта для раскладки "us"
static US_CODE_TO_CHAR: Lazy<HashMap<u16, char>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    map.insert(30, 'a'); // KEY_A
    map.insert(48, 'b'); // KEY_B
    map.insert(46, 'c'); // KEY_C
    map.insert(32, 'd'); // KEY_D
    map.insert(18, 'e'); // KEY_E
    map.insert(33, 'f'); // KEY_F
    map.insert(34, 'g'); // KEY_G
    map.insert(35, 'h'); // KEY_H
    map.insert(23, 'i'); // KEY_I
    map.insert(36, 'j'); // KEY_J
    map.insert(37, 'k'); // KEY_K
    map.insert(38, 'l'); // KEY_L
    map.insert(50, 'm'); // KEY_M
    map.insert(49, 'n'); // KEY_N
    map.insert(24, 'o'); // KEY_O
    map.insert(25, 'p'); // KEY_P
    map.insert(16, 'q'); // KEY_Q
    map.insert(19, 'r'); // KEY_R
    map.insert(31, 's'); // KEY_S
    map.insert(20, 't'); // KEY_T
    map.insert(22, 'u'); // KEY_U
    map.insert(47, 'v'); // KEY_V
    map.insert(17, 'w'); // KEY_W
    map.insert(45, 'x'); // KEY_X
    map.insert(21, 'y'); // KEY_Y
    map.insert(44, 'z'); // KEY_Z

    map
});

/// Неизменяемая карта перевода evdev-кода в символ.
///
/// Строится один раз при старте по идентификатору раскладки и дальше только
/// читается агрегатором. Коды, отсутствующие в карте, не переводятся.
#[derive(Debug, Clone)]
pub struct KeyMap {
    code_to_char: HashMap<u16, char>,
}

impl KeyMap {
    pub fn for_layout(layout: &str) -> Self {
        let mut code_to_char = US_CODE_TO_CHAR.clone();

        // В qwertz-раскладках физические Y и Z поменяны местами
        if layout == "de" || layout == "qwertz" {
            code_to_char.insert(21, 'z'); // KEY_Y
            code_to_char.insert(44, 'y'); // KEY_Z
        }

        Self { code_to_char }
    }

    /// Перевести код клавиши в символ; None — код не распознан
    pub fn translate(&self, keycode: u16) -> Option<char> {
        self.code_to_char.get(&keycode).copied()
    }

    /// Управляющая клавиша (Enter, Space, Escape) — сброс буфера
    pub fn is_control(keycode: u16) -> bool {
        matches!(keycode, KEY_ENTER | KEY_SPACE | KEY_ESC)
    }
}
