use super::*;
use crate::foundation::core::Rgba;
use crate::source::audio::SilenceSource;
use crate::source::video::SolidColorSource;

#[test]
fn lookups_by_name() {
    let mut reg = SourceRegistry::new();
    reg.insert_video("bg", Arc::new(SolidColorSource::new(Rgba::BLACK)));
    reg.insert_audio("quiet", Arc::new(SilenceSource::new(2).unwrap()));

    assert!(reg.video("bg").is_ok());
    assert_eq!(reg.audio("quiet").unwrap().channels(), 2);
    assert_eq!(reg.video_names().collect::<Vec<_>>(), vec!["bg"]);
}

#[test]
fn unknown_names_are_not_found() {
    let reg = SourceRegistry::new();
    assert!(matches!(reg.video("nope"), Err(MontageError::NotFound(_))));
    assert!(matches!(reg.audio("bg"), Err(MontageError::NotFound(_))));
}

#[test]
fn namespaces_are_separate() {
    let mut reg = SourceRegistry::new();
    reg.insert_video("x", Arc::new(SolidColorSource::new(Rgba::BLACK)));
    assert!(reg.audio("x").is_err());
}
