use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::counters::{LoadAverage, MemoryCounters, Uptime};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_uptime(uptime: Uptime) -> String {
    format!("{} hours {} minutes", uptime.hours, uptime.minutes)
}

pub fn format_load(load: LoadAverage) -> String {
    format!("{:.2} , {:.2} , {:.2}", load.one, load.five, load.fifteen)
}

pub fn format_memory(memory: MemoryCounters) -> String {
    format!(
        "{} / {} MB ({:.1}%)",
        memory.used_mb(),
        memory.total_mb(),
        memory.used_percent()
    )
}
