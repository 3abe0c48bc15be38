use std::time::{SystemTime, UNIX_EPOCH};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        s.to_string()
    } else {
        let mut result = String::new();
        let mut width = 0;
        for c in s.chars() {
            let cw = c.width().unwrap_or(0);
            if width + cw + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            width += cw;
        }
        result
    }
}

/// Spinner glyph for the current wall-clock tick
pub fn spinner() -> &'static str {
    let ms = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    SPINNER_FRAMES[(ms / 100) as usize % SPINNER_FRAMES.len()]
}

pub fn format_result(result: Option<f64>) -> String {
    match result {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("1+1", 10), "1+1");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_string("123456789", 5), "1234…");
    }

    #[test]
    fn results_print_without_trailing_zero() {
        assert_eq!(format_result(Some(4.0)), "4");
        assert_eq!(format_result(Some(2.5)), "2.5");
        assert_eq!(format_result(None), "-");
    }
}
