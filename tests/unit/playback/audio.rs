use super::*;

#[test]
fn lead_converts_milliseconds_to_samples() {
    let rate = FrameRate::from_hz(48_000).unwrap();
    assert_eq!(lead_samples(rate, 100), 4_800);
    assert_eq!(lead_samples(rate, 0), 0);
}

#[test]
fn cursor_resyncs_when_behind() {
    assert_eq!(resync_cursor(None, 10), 10);
    assert_eq!(resync_cursor(Some(20), 10), 20);
    assert_eq!(resync_cursor(Some(5), 10), 10);
}
