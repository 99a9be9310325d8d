//! Duration rendering for operator output.

use std::time::Duration;

/// Compact rendering of how long a run took: `850ms`, `42s`, `2m 05s`, `1h 02m`.
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0 => format!("{}ms", elapsed.as_millis()),
        1..=59 => format!("{secs}s"),
        60..=3599 => format!("{}m {:02}s", secs / 60, secs % 60),
        _ => format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60),
    }
}
