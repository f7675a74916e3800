//! Download progress formatting

/// Percentage step between progress lines.
pub const STEP: u64 = 10;

/// Whole percent of `current` out of `total`, clamped to 100.
pub fn percent(current: u64, total: Option<u64>) -> Option<u64> {
    let total = total.filter(|&t| t > 0)?;
    Some((current.saturating_mul(100) / total).min(100))
}

/// Human-readable byte count (`12.3 MiB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// One progress line: `fetching  40%  (12.0 MiB / 30.0 MiB)`.
pub fn format_progress(current: u64, total: Option<u64>) -> String {
    match (percent(current, total), total) {
        (Some(pct), Some(total)) => format!(
            "fetching {pct:>3}%  ({} / {})",
            format_size(current),
            format_size(total)
        ),
        _ => format!("fetching {}", format_size(current)),
    }
}
