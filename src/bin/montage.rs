use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use montage::{
    AudioPlaybackOpts, AudioPlayer, AudioSource, InMemoryAudioSink, PresentationClock, Project,
    Rational, ResampleKernel, RgbaFrame, ScaleParams, SystemPresentationClock, TracingVideoSink,
    VideoPlaybackOpts, VideoPlayer, VideoSource,
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "montage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame of a project's video timeline as a PNG.
    Frame(FrameArgs),
    /// Print the items composited at a frame, bottom to top.
    Items(ItemsArgs),
    /// Resample an image file.
    Scale(ScaleArgs),
    /// Play a project in real time into logging sinks.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index on the video timeline.
    #[arg(long, allow_negative_numbers = true)]
    frame: i64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ItemsArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index on the video timeline.
    #[arg(long, allow_negative_numbers = true)]
    frame: i64,
}

#[derive(Parser, Debug)]
struct ScaleArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Uniform scale factor.
    #[arg(long)]
    factor: f64,

    /// Reconstruction kernel.
    #[arg(long, value_enum, default_value_t = KernelChoice::Triangle)]
    kernel: KernelChoice,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Wall-clock seconds to run before stopping.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Playback speed as `n` or `n/d`; negative plays backwards.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    speed: Rational,

    /// Presentation time in seconds to start from.
    #[arg(long, default_value_t = 0.0)]
    start: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KernelChoice {
    Triangle,
    Lanczos3,
}

impl From<KernelChoice> for ResampleKernel {
    fn from(k: KernelChoice) -> Self {
        match k {
            KernelChoice::Triangle => ResampleKernel::Triangle,
            KernelChoice::Lanczos3 => ResampleKernel::Lanczos { lobes: 3 },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Items(args) => cmd_items(args),
        Command::Scale(args) => cmd_scale(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn load_project(path: &std::path::Path) -> anyhow::Result<Project> {
    Project::load(path).with_context(|| format!("load project '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let canvas = project.canvas();

    let mut frame = RgbaFrame::new(canvas);
    project
        .video()
        .get_frame(args.frame, &mut frame)
        .with_context(|| format!("render frame {}", args.frame))?;
    montage::save_frame_png(&frame, canvas, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_items(args: ItemsArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    for item in project.video().composite_list(args.frame) {
        let p = item.placement();
        println!(
            "{}\tz={}\tx={}\twidth={}\tsource_frame={}\t{}",
            item.id(),
            p.z,
            p.x,
            p.width,
            p.source_frame(args.frame),
            item.tag().unwrap_or("-")
        );
    }
    Ok(())
}

fn cmd_scale(args: ScaleArgs) -> anyhow::Result<()> {
    let src = montage::load_image_frame(&args.in_path)?;
    let params = ScaleParams::uniform(args.factor, args.kernel.into());

    let in_win = src.current_window();
    let width = (f64::from(in_win.width()) * args.factor).round().max(1.0) as u32;
    let height = (f64::from(in_win.height()) * args.factor).round().max(1.0) as u32;
    let target = montage::Box2i::from_origin_size(0, 0, width, height);

    let mut out = RgbaFrame::new(target);
    montage::scale_frame(&mut out, &src, &params)?;
    montage::save_frame_png(&out, target, &args.out)?;

    eprintln!("wrote {} ({width}x{height})", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );
    anyhow::ensure!(args.start.is_finite(), "--start must be finite");

    let project = load_project(&args.in_path)?;
    let clock = Arc::new(SystemPresentationClock::with_monotonic());
    clock.seek((args.start * 1e9).round() as i64);

    let video_source: Arc<dyn VideoSource> = project.video().clone();
    let mut video = VideoPlayer::spawn(
        video_source,
        clock.clone(),
        Box::new(TracingVideoSink),
        project.frame_rate(),
        project.canvas(),
        VideoPlaybackOpts::default(),
    )?;

    // No device output; collected samples are only counted.
    let audio_sink = InMemoryAudioSink::new(project.channels())?;
    let audio_source: Arc<dyn AudioSource> = project.audio().clone();
    let mut audio = AudioPlayer::spawn(
        audio_source,
        clock.clone(),
        Box::new(audio_sink.clone()),
        project.sample_rate()?,
        AudioPlaybackOpts::default(),
    )?;

    clock.play(args.speed);
    std::thread::sleep(Duration::from_secs_f64(args.seconds));
    clock.stop();

    video.shutdown()?;
    audio.shutdown()?;

    let stats = video.stats();
    eprintln!(
        "presented {} frames ({} late, {} source errors), wrote {} audio samples, clock at {} ns",
        stats.presented,
        stats.dropped_late,
        stats.source_errors,
        audio_sink.sample_frames(),
        clock.presentation_time()
    );
    Ok(())
}
