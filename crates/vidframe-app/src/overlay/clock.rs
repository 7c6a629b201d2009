/// Format elapsed seconds as a zero-padded `HH:MM:SS` clock.
///
/// The hour field is not wrapped, so 100+ hours produce a wider segment.
/// Negative and non-finite inputs render as `00:00:00`.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_clock_shaped(s: &str) -> bool {
        let parts: Vec<&str> = s.split(':').collect();
        parts.len() == 3
            && parts[0].len() >= 2
            && parts[1].len() == 2
            && parts[2].len() == 2
            && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
    }

    #[test]
    fn known_values() {
        assert_eq!(format_clock(3661.0), "01:01:01");
        assert_eq!(format_clock(59.0), "00:00:59");
        assert_eq!(format_clock(7200.0), "02:00:00");
        assert_eq!(format_clock(0.0), "00:00:00");
    }

    #[test]
    fn fractional_seconds_floor() {
        assert_eq!(format_clock(59.999), "00:00:59");
        assert_eq!(format_clock(60.0), "00:01:00");
    }

    #[test]
    fn hours_do_not_wrap() {
        assert_eq!(format_clock(100.0 * 3600.0), "100:00:00");
        assert_eq!(format_clock(123.0 * 3600.0 + 4.0 * 60.0 + 5.0), "123:04:05");
    }

    #[test]
    fn shape_holds_across_range() {
        let mut s = 0.0;
        while s < 400_000.0 {
            let out = format_clock(s);
            assert!(is_clock_shaped(&out), "bad clock {out} for {s}");
            s += 997.3;
        }
    }

    #[test]
    fn degenerate_inputs_render_zero() {
        assert_eq!(format_clock(-5.0), "00:00:00");
        assert_eq!(format_clock(f64::NAN), "00:00:00");
        assert_eq!(format_clock(f64::INFINITY), "00:00:00");
    }
}
