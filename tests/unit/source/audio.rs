use super::*;

#[test]
fn silence_defines_nothing() {
    let src = SilenceSource::new(2).unwrap();
    let mut out = AudioFrame::new(2, 0, 9).unwrap();
    src.get_frame(&mut out).unwrap();
    assert!(out.is_current_empty());
    assert!(SilenceSource::new(0).is_err());
}

#[test]
fn pcm_clip_clips_request_to_clip_range() {
    let clip = PcmClipSource::new(2, vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]).unwrap();
    assert_eq!(clip.len(), 3);

    let mut out = AudioFrame::new(2, -2, 1).unwrap();
    clip.get_frame(&mut out).unwrap();
    assert_eq!(out.current_min_sample(), 0);
    assert_eq!(out.current_max_sample(), 1);
    assert_eq!(
        out.interleaved_or_silence(),
        vec![0.0, 0.0, 0.0, 0.0, 1.0, -1.0, 2.0, -2.0]
    );

    let mut past = AudioFrame::new(2, 10, 20).unwrap();
    clip.get_frame(&mut past).unwrap();
    assert!(past.is_current_empty());
}

#[test]
fn pcm_clip_validates_layout() {
    assert!(PcmClipSource::new(2, vec![0.0; 3]).is_err());
    let clip = PcmClipSource::new(1, vec![0.0; 4]).unwrap();
    let mut stereo = AudioFrame::new(2, 0, 1).unwrap();
    assert!(clip.get_frame(&mut stereo).is_err());
}

#[test]
fn sine_hits_quarter_period_peak() {
    let sine = SineSource::new(1.0, 0.5, 4, 1).unwrap();
    assert!(sine.value_at(0).abs() < 1e-6);
    assert!((sine.value_at(1) - 0.5).abs() < 1e-6);
    assert!((sine.value_at(-1) + 0.5).abs() < 1e-6);

    let mut out = AudioFrame::new(1, 0, 3).unwrap();
    sine.get_frame(&mut out).unwrap();
    assert_eq!(out.current_len(), 4);
    assert!((out.sample(1, 0) - 0.5).abs() < 1e-6);
}

#[test]
fn gain_scales_inner_source() {
    let clip = Arc::new(PcmClipSource::new(1, vec![1.0, 0.5]).unwrap());
    let gain = GainSource::new(clip, 2.0).unwrap();
    assert_eq!(gain.channels(), 1);
    let mut out = AudioFrame::new(1, 0, 1).unwrap();
    gain.get_frame(&mut out).unwrap();
    assert_eq!(out.interleaved_or_silence(), vec![2.0, 1.0]);
    assert!(GainSource::new(Arc::new(SilenceSource::new(1).unwrap()), f32::NAN).is_err());
}
