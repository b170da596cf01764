use chrono::{DateTime, Local};
use unicode_width::UnicodeWidthChar;

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Coarse "how long ago" label for feed timestamps
pub fn relative_time(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 2 * 86_400 => "yesterday".to_string(),
        s => format!("{}d ago", s / 86_400),
    }
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with '…'
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            if max_width == 0 {
                return String::new();
            }
            // make room for the ellipsis
            while width + 1 > max_width {
                match out.pop() {
                    Some(last) => width -= last.width().unwrap_or(0),
                    None => break,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}
