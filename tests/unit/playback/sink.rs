use super::*;
use crate::foundation::core::Box2i;

#[test]
fn video_sink_clones_share_recording() {
    let sink = InMemoryVideoSink::new();
    let mut writer = sink.clone();
    let frame = RgbaFrame::new(Box2i::new(0, 0, 1, 1));
    writer.present(3, &frame).unwrap();
    writer.present(4, &frame).unwrap();
    assert_eq!(sink.indices(), vec![3, 4]);
    assert_eq!(sink.last().unwrap().0, 4);
    assert_eq!(sink.len(), 2);
}

#[test]
fn audio_sink_records_writes_and_flushes() {
    let sink = InMemoryAudioSink::new(2).unwrap();
    let mut writer = sink.clone();
    writer.write(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    writer.flush().unwrap();
    assert_eq!(sink.samples(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(sink.sample_frames(), 2);
    assert_eq!(sink.flushes(), 1);
    assert!(writer.write(&[1.0]).is_err());
    assert!(InMemoryAudioSink::new(0).is_err());
}

#[test]
fn tracing_sink_accepts_frames() {
    let mut sink = TracingVideoSink;
    sink.present(0, &RgbaFrame::new(Box2i::new(0, 0, 1, 1)))
        .unwrap();
}

#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn presented_log(level: tracing::Level) -> String {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let frame = RgbaFrame::new(Box2i::new(0, 0, 1, 1));
    tracing::subscriber::with_default(subscriber, || {
        TracingVideoSink.present(7, &frame).unwrap();
    });
    let bytes = capture.0.lock().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn tracing_sink_logs_frames_at_trace_only() {
    assert_eq!(presented_log(tracing::Level::INFO), "");
    assert_eq!(presented_log(tracing::Level::DEBUG), "");
    let log = presented_log(tracing::Level::TRACE);
    assert!(log.contains("present"), "{log}");
    assert!(log.contains("frame=7"), "{log}");
}
