/// Format a duration in seconds as a zero-padded `HH:MM:SS` string.
///
/// Fractional seconds are truncated toward zero. The clock wraps at 24 hours,
/// like extracting the time of day of a point `secs` after an epoch midnight;
/// durations of a day or more therefore wrap silently.
pub fn secs_to_timestamp(secs: f32) -> String {
    let total = if secs > 0. { secs as u64 } else { 0 };
    format!(
        "{:02}:{:02}:{:02}",
        (total / 3600) % 24,
        (total / 60) % 60,
        total % 60
    )
}
