use super::*;
use crate::foundation::core::Rgba;
use crate::frame::audio::AudioFrame;
use crate::frame::video::RgbaFrame;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "montage_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

const BASIC: &str = r#"{
    "canvas": { "width": 4, "height": 4 },
    "frame_rate": { "num": 25, "den": 1 },
    "audio": { "sample_rate": 8, "channels": 1 },
    "sources": {
        "black": { "kind": "solid", "color": [0.0, 0.0, 0.0, 1.0] },
        "white": { "kind": "solid", "color": [1.0, 1.0, 1.0, 1.0],
                   "window": { "x": 0, "y": 0, "width": 2, "height": 2 } },
        "fade": { "kind": "cross_fade", "a": "black", "b": "white",
                  "mix": { "keys": [ { "frame": 0, "value": 0 }, { "frame": 4, "value": 1 } ] } },
        "tone": { "kind": "sine", "frequency": 2, "amplitude": 1.0 },
        "half": { "kind": "gain", "source": "tone", "gain": 0.5 }
    },
    "video": [
        { "source": "black", "x": 0, "width": 10 },
        { "source": "white", "x": 5, "width": 5, "z": 1 }
    ],
    "audio_items": [ { "source": "half", "x": 0, "width": 8, "tag": "music" } ]
}"#;

#[test]
fn builds_timelines_from_json() {
    let project = Project::from_json_str(BASIC, Path::new(".")).unwrap();
    assert_eq!(project.canvas(), Box2i::new(0, 0, 3, 3));
    assert_eq!(project.frame_rate(), FrameRate::new(25, 1).unwrap());
    assert_eq!(project.channels(), 1);
    assert_eq!(project.video().len(), 2);
    assert_eq!(project.audio().items()[0].tag(), Some("music"));
    assert_eq!(
        project.registry().video_names().collect::<Vec<_>>(),
        vec!["black", "fade", "white"]
    );

    let mut frame = RgbaFrame::new(project.canvas());
    project.video().get_frame(7, &mut frame).unwrap();
    assert_eq!(frame.pixel(0, 0), Rgba::WHITE);
    assert_eq!(frame.pixel(3, 3), Rgba::BLACK);

    let mut block = AudioFrame::new(1, 0, 7).unwrap();
    project.audio().get_frame(&mut block).unwrap();
    // 2 Hz at 8 samples/s peaks at sample 1.
    assert!((block.sample(1, 0) - 0.5).abs() < 1e-6);
}

#[test]
fn filter_sources_resolve_their_inputs() {
    let project = Project::from_json_str(BASIC, Path::new(".")).unwrap();
    let fade = project.registry().video("fade").unwrap();
    let mut frame = RgbaFrame::new(Box2i::new(0, 0, 0, 0));
    fade.get_frame(2, &mut frame).unwrap();
    assert_eq!(frame.pixel(0, 0), Rgba::new(0.5, 0.5, 0.5, 1.0));
}

#[test]
fn cycles_are_rejected() {
    let json = r#"{
        "canvas": { "width": 4, "height": 4 },
        "frame_rate": { "num": 25, "den": 1 },
        "sources": {
            "a": { "kind": "scale", "source": "b", "factor_x": 1, "factor_y": 1 },
            "b": { "kind": "scale", "source": "a", "factor_x": 1, "factor_y": 1 }
        }
    }"#;
    let err = Project::from_json_str(json, Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("depends on itself"), "{err}");
}

#[test]
fn media_kinds_must_match() {
    let json = r#"{
        "canvas": { "width": 4, "height": 4 },
        "frame_rate": { "num": 25, "den": 1 },
        "sources": {
            "tone": { "kind": "sine", "frequency": 440 },
            "big": { "kind": "scale", "source": "tone", "factor_x": 2, "factor_y": 2 }
        }
    }"#;
    assert!(matches!(
        Project::from_json_str(json, Path::new(".")),
        Err(MontageError::Validation(_))
    ));

    let json = r#"{
        "canvas": { "width": 4, "height": 4 },
        "frame_rate": { "num": 25, "den": 1 },
        "sources": { "tone": { "kind": "sine", "frequency": 440 } },
        "video": [ { "source": "tone", "x": 0, "width": 1 } ]
    }"#;
    assert!(matches!(
        Project::from_json_str(json, Path::new(".")),
        Err(MontageError::NotFound(_))
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        Project::from_json_str("{ not json", Path::new(".")),
        Err(MontageError::Serde(_))
    ));
}

#[test]
fn load_resolves_images_relative_to_project_file() {
    let dir = temp_dir("project_image");
    std::fs::create_dir_all(dir.join("media")).unwrap();
    let mut img = image::RgbaImage::new(2, 2);
    img.put_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
    img.save(dir.join("media").join("dot.png")).unwrap();

    let json = r#"{
        "canvas": { "width": 2, "height": 2 },
        "frame_rate": { "num": 1, "den": 1 },
        "sources": { "dot": { "kind": "image", "path": "media/dot.png" } },
        "video": [ { "source": "dot", "x": 0, "width": 1 } ]
    }"#;
    let path = dir.join("project.json");
    std::fs::write(&path, json).unwrap();

    let project = Project::load(&path).unwrap();
    assert_eq!(project.root(), dir.as_path());
    let mut frame = RgbaFrame::new(project.canvas());
    project.video().get_frame(0, &mut frame).unwrap();
    assert_eq!(frame.pixel(1, 1), Rgba::new(1.0, 0.0, 0.0, 1.0));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_reported() {
    let err = Project::load(Path::new("definitely/missing/project.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read project"), "{err}");
}
