use super::*;

fn rate() -> FrameRate {
    FrameRate::new(10, 1).unwrap()
}

#[test]
fn forward_frames_are_due_at_interval_start() {
    assert_eq!(due_presentation_time(rate(), 0, 1), 0);
    assert_eq!(due_presentation_time(rate(), 3, 1), 300_000_000);
}

#[test]
fn backward_frames_are_due_at_interval_end() {
    assert_eq!(due_presentation_time(rate(), 3, -1), 399_999_999);
    assert_eq!(rate().frame_at_time(due_presentation_time(rate(), 3, -1)), 3);
}

#[test]
fn lateness_depends_on_direction() {
    assert!(is_late(5, 4, 1));
    assert!(!is_late(5, 5, 1));
    assert!(!is_late(5, 6, 1));
    assert!(is_late(5, 6, -1));
    assert!(!is_late(5, 4, -1));
}

#[test]
fn render_position_catches_up_with_clock() {
    assert_eq!(next_render_frame(None, 7, 1), 7);
    assert_eq!(next_render_frame(Some(9), 7, 1), 9);
    assert_eq!(next_render_frame(Some(5), 7, 1), 7);
    assert_eq!(next_render_frame(Some(5), 7, -1), 5);
    assert_eq!(next_render_frame(Some(9), 7, -1), 7);
}
