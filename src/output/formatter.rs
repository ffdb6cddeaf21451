use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
pub fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format a place or score without a trailing ".0" ("2", "2.5", "1.67")
pub fn format_rank(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let formatted = format!("{:.2}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Format an optional rank, empty when absent
pub fn format_optional_rank(value: Option<f64>) -> String {
    value.map(format_rank).unwrap_or_default()
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Left-align `text` in a column of `width` characters, never cutting it
pub fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rank_whole() {
        assert_eq!(format_rank(1.0), "1");
        assert_eq!(format_rank(12.0), "12");
    }

    #[test]
    fn test_format_rank_fraction() {
        assert_eq!(format_rank(2.5), "2.5");
        assert_eq!(format_rank(1.75), "1.75");
        assert_eq!(format_rank(5.0 / 3.0), "1.67");
        assert_eq!(format_rank(2.001), "2");
    }

    #[test]
    fn test_format_optional_rank() {
        assert_eq!(format_optional_rank(None), "");
        assert_eq!(format_optional_rank(Some(4.0)), "4");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Alice", 20), "Alice");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("Alexandra Montgomery", 12), "Alexandra...");
    }

    #[test]
    fn test_truncate_name_unicode() {
        assert_eq!(truncate_name("Zoë Ångström", 12), "Zoë Ångström");
        assert_eq!(truncate_name("Zoë Ångström", 8), "Zoë Å...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Alice", 3), "Ali");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }
}
