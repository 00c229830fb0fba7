const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Size in binary units with at most two decimals, `Unknown` when absent or zero.
pub fn format_bytes(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) if bytes > 0 => scale(bytes as f64),
        _ => "Unknown".to_string(),
    }
}

/// Transfer rate such as `1.5 MB/s`, `N/A` when absent or zero.
pub fn format_speed(bytes_per_sec: Option<f64>) -> String {
    match bytes_per_sec {
        Some(speed) if speed > 0.0 && speed.is_finite() => format!("{}/s", scale(speed)),
        _ => "N/A".to_string(),
    }
}

/// Remaining time as `m:ss` or `h:mm:ss`, `N/A` when absent or zero.
pub fn format_eta(seconds: Option<u64>) -> String {
    match seconds {
        Some(seconds) if seconds > 0 => clock(seconds),
        _ => "N/A".to_string(),
    }
}

/// Media duration, `Unknown` when the extractor did not report one.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(seconds) if seconds >= 1.0 && seconds.is_finite() => clock(seconds as u64),
        _ => "Unknown".to_string(),
    }
}

fn scale(mut value: f64) -> String {
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

fn clock(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
