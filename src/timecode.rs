/*!
 * Timecode parsing and display formatting.
 *
 * Subtitle tracks carry timecodes as `HH:MM:SS,mmm`; reports display them
 * as `HH:MM:SS.ss`. The two formats are deliberately different and no
 * round-trip is guaranteed.
 */

use crate::errors::FormatError;

/// Parse an SRT timecode (`H+:MM:SS,mmm`) into seconds.
///
/// Hours may be any width. Minutes and seconds are not range checked, and
/// the millisecond field is read as an integer count of milliseconds, so
/// `00:00:01,5` is 1.005 seconds.
pub fn parse_timecode(timecode: &str) -> Result<f64, FormatError> {
    let invalid = |reason: &str| FormatError::InvalidTimecode {
        timecode: timecode.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = timecode.trim().split(':').collect();
    let &[hours, minutes, rest] = fields.as_slice() else {
        return Err(invalid("expected hours, minutes and seconds separated by ':'"));
    };

    let (seconds, millis) = rest
        .split_once(',')
        .ok_or_else(|| invalid("missing ',' before the milliseconds field"))?;

    let hours = parse_field(hours).ok_or_else(|| invalid("hours field is not a number"))?;
    let minutes = parse_field(minutes).ok_or_else(|| invalid("minutes field is not a number"))?;
    let seconds = parse_field(seconds).ok_or_else(|| invalid("seconds field is not a number"))?;
    let millis = parse_field(millis).ok_or_else(|| invalid("milliseconds field is not a number"))?;

    let whole = hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64;
    Ok(whole + millis as f64 / 1000.0)
}

fn parse_field(field: &str) -> Option<u64> {
    field.trim().parse::<u64>().ok()
}

/// Format seconds for display as `HH:MM:SS.ss`.
///
/// Hours and minutes are zero-padded to two digits (hours widen past 99),
/// seconds use a five-wide, two-decimal field: `7.5` becomes `00:00:07.50`.
pub fn format_seconds(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as i64;
    let minutes = (seconds.rem_euclid(3600.0) / 60.0).floor() as i64;
    let secs = seconds.rem_euclid(60.0);

    format!("{:02}:{:02}:{:05.2}", hours, minutes, secs)
}
