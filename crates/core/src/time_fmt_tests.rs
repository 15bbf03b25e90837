use super::*;

#[test]
fn format_then_parse_round_trips_to_the_millisecond() {
    let ms = 1_700_000_123_456;
    let formatted = format_epoch_ms(ms);
    assert_eq!(parse_epoch_ms(&formatted), Some(ms));
}

#[test]
fn parse_rejects_malformed_input() {
    assert_eq!(parse_epoch_ms("not a timestamp"), None);
}

#[test]
fn format_epoch_zero_is_unix_epoch() {
    assert_eq!(format_epoch_ms(0), "1970-01-01T00:00:00+00:00");
}
