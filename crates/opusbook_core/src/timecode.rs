//! Clock-style timestamp parsing and formatting.
//!
//! OverDrive marker times and ffmpeg status lines both use colon-separated
//! base-60 timestamps (`H:MM:SS[.fff]`, with a variable number of leading
//! components). The same parser serves the track prober and the progress
//! monitor so the two stay in agreement.

/// Parse a colon-separated base-60 timestamp into seconds.
///
/// Each component multiplies the running total by 60 before being added,
/// so `"3:05"` is 185 seconds and `"1:02:03.5"` is 3723.5 seconds.
/// Returns `None` if any component is not a number.
pub fn parse_clock(s: &str) -> Option<f64> {
    let mut total = 0.0_f64;
    for component in s.split(':') {
        let value: f64 = component.trim().parse().ok()?;
        total = total * 60.0 + value;
    }
    Some(total)
}

/// Format seconds as `HH:MM:SS` with the given fractional precision.
///
/// With `precision == 3` the output looks like `01:02:03.500`, the shape
/// opusenc expects in CHAPTERnn comments.
pub fn format_clock(secs: f64, precision: usize) -> String {
    let minutes = (secs / 60.0).floor();
    let seconds = secs - minutes * 60.0;
    let minutes = minutes as u64;
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if precision == 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds as u64)
    } else {
        format!(
            "{:02}:{:02}:{:0width$.precision$}",
            hours,
            minutes,
            seconds,
            width = 3 + precision,
            precision = precision
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_clock_handles_varying_component_counts() {
        assert_eq!(parse_clock("7"), Some(7.0));
        assert_eq!(parse_clock("3:05"), Some(185.0));
        assert_eq!(parse_clock("1:02:03.5"), Some(3723.5));
        assert_eq!(parse_clock("0:00:00.000"), Some(0.0));
    }

    #[test]
    fn parse_clock_rejects_garbage() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("abc"), None);
        assert_eq!(parse_clock("1:xx:00"), None);
    }

    #[test]
    fn format_clock_pads_components() {
        assert_eq!(format_clock(0.0, 3), "00:00:00.000");
        assert_eq!(format_clock(800.0, 3), "00:13:20.000");
        assert_eq!(format_clock(3661.5, 3), "01:01:01.500");
    }

    #[test]
    fn format_clock_zero_precision_truncates() {
        assert_eq!(format_clock(59.9, 0), "00:00:59");
        assert_eq!(format_clock(7200.0, 0), "02:00:00");
    }

    #[test]
    fn format_then_parse_roundtrips() {
        for &t in &[0.0, 1.5, 185.0, 3723.25, 86399.875] {
            let parsed = parse_clock(&format_clock(t, 3)).unwrap();
            assert!((parsed - t).abs() < 0.001, "roundtrip failed for {}", t);
        }
    }
}
