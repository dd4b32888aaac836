use super::*;

fn ramp() -> Keyframes {
    Keyframes::new(
        vec![
            Keyframe {
                frame: 10.0,
                value: 0.0,
                ease: Ease::Linear,
            },
            Keyframe {
                frame: 20.0,
                value: 1.0,
                ease: Ease::Linear,
            },
        ],
        InterpMode::Linear,
    )
    .unwrap()
}

#[test]
fn keyframes_hold_outside_key_range() {
    let k = ramp();
    assert_eq!(k.value_at(-100.0), 0.0);
    assert_eq!(k.value_at(10.0), 0.0);
    assert_eq!(k.value_at(20.0), 1.0);
    assert_eq!(k.value_at(1e9), 1.0);
}

#[test]
fn keyframes_interpolate_fractional_frames() {
    let k = ramp();
    assert!((k.value_at(15.0) - 0.5).abs() < 1e-12);
    assert!((k.value_at(12.5) - 0.25).abs() < 1e-12);
}

#[test]
fn hold_mode_steps() {
    let k = Keyframes::new(ramp().keys().to_vec(), InterpMode::Hold).unwrap();
    assert_eq!(k.value_at(19.9), 0.0);
    assert_eq!(k.value_at(20.0), 1.0);
}

#[test]
fn easing_applies_toward_next_key() {
    let mut keys = ramp().keys().to_vec();
    keys[0].ease = Ease::InQuad;
    let k = Keyframes::new(keys, InterpMode::Linear).unwrap();
    assert!((k.value_at(15.0) - 0.25).abs() < 1e-12);
}

#[test]
fn validation_rejects_unsorted_and_empty() {
    assert!(Keyframes::new(vec![], InterpMode::Linear).is_err());
    let mut keys = ramp().keys().to_vec();
    keys.reverse();
    assert!(Keyframes::new(keys, InterpMode::Linear).is_err());
}

#[test]
fn keyframes_deserialize_with_defaults() {
    let k: Keyframes =
        serde_json::from_str(r#"{"keys":[{"frame":0,"value":0},{"frame":4,"value":2}]}"#).unwrap();
    assert_eq!(k.mode(), InterpMode::Linear);
    assert_eq!(k.value_at(2.0), 1.0);
}

#[test]
fn batched_values_match_pointwise() {
    let f = LinearFunction {
        slope: 2.0,
        intercept: 1.0,
    };
    let frames = [0.0, 1.0, 2.5];
    let mut out = [0.0; 3];
    f.values(&frames, &mut out);
    assert_eq!(out, [1.0, 3.0, 6.0]);
    assert_eq!(ConstantFunction(4.0).value_at(123.0), 4.0);
}
