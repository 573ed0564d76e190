use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::cpu::CpuUtilization;

/// Widest process name printed in the report.
pub const MAX_NAME_WIDTH: usize = 48;

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

/// `cpu_idle=12.34 cpu_system=...`, in the order of `CpuUtilization::categories`.
pub fn perf_data(utilization: &CpuUtilization) -> String {
    utilization
        .categories()
        .iter()
        .map(|(key, pct)| format!("{key}={pct:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}
