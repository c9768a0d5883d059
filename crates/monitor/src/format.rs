const UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with binary steps (e.g. `"1.5 KB"`).
///
/// The mantissa is rounded to `decimals` places and trailing zeros are
/// dropped. Zero, negative and non-finite inputs all give `"0 Bytes"`.
pub fn format_bytes(bytes: f64, decimals: usize) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_zeros(format!("{value:.decimals$}")), UNITS[unit])
}

fn trim_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a throughput given in Mbit/s.
pub fn format_bitrate(mbits: f64) -> String {
    if mbits < 1.0 {
        format!("{:.0} Kbps", mbits * 1000.0)
    } else if mbits > 1000.0 {
        format!("{:.2} Gbps", mbits / 1000.0)
    } else {
        format!("{mbits:.1} Mbps")
    }
}

/// Format an uptime as `"N days N hours N minutes"`.
///
/// Minutes are only shown for uptimes under a day; anything below a
/// minute reads `"0 minutes"`.
pub fn format_uptime(secs: u64) -> String {
    let days    = secs / 86_400;
    let hours   = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days} days "));
    }
    if hours > 0 {
        out.push_str(&format!("{hours} hours "));
    }
    if minutes > 0 && days == 0 {
        out.push_str(&format!("{minutes} minutes"));
    }

    let out = out.trim_end();
    if out.is_empty() {
        "0 minutes".to_string()
    } else {
        out.to_string()
    }
}
