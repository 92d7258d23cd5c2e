use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` in a foreground colour when colouring is enabled.
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}{text}{ResetColor}", SetForegroundColor(color))
    } else {
        text.to_string()
    }
}

pub fn bold(text: &str, enabled: bool) -> String {
    if enabled {
        format!(
            "{}{text}{}",
            SetAttribute(Attribute::Bold),
            SetAttribute(Attribute::Reset)
        )
    } else {
        text.to_string()
    }
}

/// Clip `text` to `width` terminal columns, marking the cut with an ellipsis,
/// and pad it with spaces up to `width`.
pub fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if text.width() <= width {
        let padding = width - text.width();
        return format!("{text}{}", " ".repeat(padding));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit("Home", 6), "Home  ");
    }

    #[test]
    fn test_fit_clips_long_text() {
        assert_eq!(fit("Our services", 6), "Our s…");
    }

    #[test]
    fn test_fit_never_exceeds_width() {
        assert_eq!(fit("Home", 0), "");
        assert_eq!(fit("Home", 1), "…");
        assert_eq!(fit("会社", 1), "…");
    }

    #[test]
    fn test_fit_counts_wide_characters() {
        // Each CJK character takes two columns.
        assert_eq!(fit("会社", 6), "会社  ");
        assert_eq!(fit("会社概要", 6), "会社… ");
    }

    #[test]
    fn test_plain_output_without_color() {
        assert_eq!(paint("home", Color::Green, false), "home");
        assert_eq!(bold("home", false), "home");
        assert_ne!(paint("home", Color::Green, true), "home");
    }
}
