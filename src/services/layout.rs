use crate::error::{Result, WordlockError};
use std::process::Command;
use tracing::debug;

pub const DEFAULT_LAYOUT: &str = "us";

/// Определить текущую раскладку клавиатуры через `localectl status`.
///
/// Любая ошибка здесь не фатальна: вызывающий логирует предупреждение и
/// продолжает с раскладкой по умолчанию.
pub fn detect_layout() -> Result<String> {
    debug!("Попытка определить раскладку через localectl");
    let output = Command::new("localectl").arg("status").output().map_err(|e| {
        WordlockError::LayoutDetection(format!("Не удалось выполнить 'localectl status': {}", e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WordlockError::LayoutDetection(format!(
            "'localectl status' вернул ошибку: {}",
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_localectl_output(&stdout).ok_or_else(|| {
        WordlockError::LayoutDetection("X11 Layout не найден в выводе localectl".to_string())
    })
}

/// Вытащить первую раскладку из строки вида "X11 Layout: de,us"
fn parse_localectl_output(output: &str) -> Option<String> {
    for line in output.lines() {
        if line.contains("X11 Layout") {
            let layout = line.split(':').nth(1)?.trim();
            let first = layout.split(',').next()?.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_layout() {
        let output = "   System Locale: LANG=en_US.UTF-8\n       VC Keymap: us\n      X11 Layout: us\n";
        assert_eq!(parse_localectl_output(output), Some("us".to_string()));
    }

    #[test]
    fn test_parse_multiple_layouts_takes_first() {
        let output = "      X11 Layout: de,us\n       X11 Model: pc105\n";
        assert_eq!(parse_localectl_output(output), Some("de".to_string()));
    }

    #[test]
    fn test_parse_missing_layout_line() {
        let output = "   System Locale: LANG=en_US.UTF-8\n       VC Keymap: us\n";
        assert_eq!(parse_localectl_output(output), None);
    }

    #[test]
    fn test_parse_empty_layout_value() {
        let output = "      X11 Layout: \n";
        assert_eq!(parse_localectl_output(output), None);
    }
}
