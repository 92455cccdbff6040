use std::path::Path;

use rayon::prelude::*;

use crate::{
    assets::labels::PreparedLabelStore,
    compile::plan::compile_frame,
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder, is_ffmpeg_on_path},
    eval::evaluator::Evaluator,
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{GaugeError, GaugeResult},
    panel::model::GaugePanel,
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    render::cpu::CpuBackend,
};

/// Evaluate + compile + render a single frame.
///
/// This is the primary one-shot API for producing pixels from a
/// [`GaugePanel`]:
/// 1. [`Evaluator::eval_frame`]
/// 2. [`compile_frame`]
/// 3. [`RenderBackend::render_plan`]
pub fn render_frame(
    panel: &GaugePanel,
    frame: FrameIndex,
    backend: &mut dyn RenderBackend,
    labels: &PreparedLabelStore,
) -> GaugeResult<FrameRGBA> {
    let eval = Evaluator::eval_frame(panel, frame)?;
    let plan = compile_frame(panel, &eval, labels)?;
    backend.render_plan(&plan, labels)
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Render a range of frames (inclusive start, exclusive end).
pub fn render_frames(
    panel: &GaugePanel,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    labels: &PreparedLabelStore,
    threading: &RenderThreading,
) -> GaugeResult<Vec<FrameRGBA>> {
    if range.is_empty() {
        return Err(GaugeError::validation("render range must be non-empty"));
    }
    if range.end.0 > panel.duration.0 {
        return Err(GaugeError::validation(
            "render range must be within panel duration",
        ));
    }

    if !threading.parallel {
        return render_chunk_sequential(panel, range, backend, labels);
    }

    let settings = backend.worker_render_settings().ok_or_else(|| {
        GaugeError::evaluation("parallel render requires backend worker settings support")
    })?;
    let pool = build_thread_pool(threading.threads)?;

    let mut out = Vec::with_capacity(range.len_frames() as usize);
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        out.append(&mut render_chunk_parallel_cpu(
            panel, chunk, labels, &settings, &pool,
        )?);
        chunk_start = chunk_end;
    }
    Ok(out)
}

/// Options for [`render_to_mp4`].
#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    /// Frame range to render (start inclusive, end exclusive).
    pub range: FrameRange,
    /// Background color to flatten alpha over (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Whether to overwrite the output file if it already exists.
    pub overwrite: bool,
    pub threading: RenderThreading,
}

impl Default for RenderToMp4Opts {
    fn default() -> Self {
        Self {
            range: FrameRange {
                start: FrameIndex(0),
                end: FrameIndex(1),
            },
            bg_rgba: [0, 0, 0, 255],
            overwrite: true,
            threading: RenderThreading::default(),
        }
    }
}

/// Render a panel to an MP4 by invoking the system `ffmpeg` binary.
///
/// `ffmpeg` must be installed and on `PATH`; this is checked up front.
/// MP4 output currently requires integer fps (`panel.fps.den == 1`).
pub fn render_to_mp4(
    panel: &GaugePanel,
    out_path: impl Into<std::path::PathBuf>,
    opts: RenderToMp4Opts,
    backend: &mut dyn RenderBackend,
    labels: &PreparedLabelStore,
) -> GaugeResult<()> {
    if opts.range.is_empty() {
        return Err(GaugeError::validation("render_to_mp4 range must be non-empty"));
    }
    if opts.range.end.0 > panel.duration.0 {
        return Err(GaugeError::validation(
            "render_to_mp4 range must be within panel duration",
        ));
    }
    let fps = if panel.fps.den == 1 {
        panel.fps.num
    } else {
        return Err(GaugeError::validation(
            "render_to_mp4 currently requires integer fps (fps.den == 1)",
        ));
    };

    if !is_ffmpeg_on_path() {
        return Err(GaugeError::evaluation(
            "ffmpeg is required for MP4 rendering, but was not found on PATH",
        ));
    }

    let cfg = EncodeConfig {
        width: panel.canvas.width,
        height: panel.canvas.height,
        fps,
        out_path: out_path.into(),
        overwrite: opts.overwrite,
    };
    let mut enc = FfmpegEncoder::new(cfg, opts.bg_rgba)?;

    let mut maybe_pool = None;
    let mut maybe_settings = None;
    if opts.threading.parallel {
        maybe_pool = Some(build_thread_pool(opts.threading.threads)?);
        maybe_settings = Some(backend.worker_render_settings().ok_or_else(|| {
            GaugeError::evaluation("parallel render_to_mp4 requires backend worker settings support")
        })?);
    }

    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);
    let mut chunk_start = opts.range.start.0;
    while chunk_start < opts.range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(opts.range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;

        let frames = if opts.threading.parallel {
            render_chunk_parallel_cpu(
                panel,
                chunk,
                labels,
                maybe_settings
                    .as_ref()
                    .expect("worker settings present when parallel"),
                maybe_pool.as_ref().expect("pool present when parallel"),
            )?
        } else {
            render_chunk_sequential(panel, chunk, backend, labels)?
        };

        for frame in &frames {
            enc.encode_frame(frame)?;
        }
        chunk_start = chunk_end;
    }

    enc.finish()
}

/// Write one rendered frame as a PNG.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> GaugeResult<()> {
    use anyhow::Context as _;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn render_chunk_sequential(
    panel: &GaugePanel,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    labels: &PreparedLabelStore,
) -> GaugeResult<Vec<FrameRGBA>> {
    let mut out = Vec::with_capacity(range.len_frames() as usize);
    for f in range.start.0..range.end.0 {
        out.push(render_frame(panel, FrameIndex(f), backend, labels)?);
    }
    Ok(out)
}

fn render_chunk_parallel_cpu(
    panel: &GaugePanel,
    range: FrameRange,
    labels: &PreparedLabelStore,
    settings: &RenderSettings,
    pool: &rayon::ThreadPool,
) -> GaugeResult<Vec<FrameRGBA>> {
    let frames: Vec<u64> = (range.start.0..range.end.0).collect();
    let rendered = pool.install(|| {
        frames
            .par_iter()
            .map_init(
                || CpuBackend::new(settings.clone()),
                |worker, f| -> GaugeResult<FrameRGBA> {
                    render_frame(panel, FrameIndex(*f), worker, labels)
                },
            )
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(rendered.len());
    for frame in rendered {
        out.push(frame?);
    }
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> GaugeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GaugeError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GaugeError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 { 1 } else { chunk_size as u64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::{Canvas, Fps},
        panel::model::PanelBuilder,
        render::backend::{BackendKind, create_backend},
    };

    fn small_panel() -> GaugePanel {
        PanelBuilder::new(
            Fps::new(30, 1).unwrap(),
            Canvas {
                width: 120,
                height: 240,
            },
            FrameIndex(4),
        )
        .seed(5)
        .gauge("g0", "G0", 3.0, "", Some(FrameIndex(0)))
        .build()
        .unwrap()
    }

    #[test]
    fn empty_range_is_rejected() {
        let panel = small_panel();
        let settings = RenderSettings::default();
        let mut backend = create_backend(BackendKind::Cpu, &settings).unwrap();
        let labels = PreparedLabelStore::empty(&panel);
        let range = FrameRange::new(FrameIndex(1), FrameIndex(1)).unwrap();
        assert!(
            render_frames(
                &panel,
                range,
                backend.as_mut(),
                &labels,
                &RenderThreading::default()
            )
            .is_err()
        );
    }

    #[test]
    fn out_of_duration_range_is_rejected() {
        let panel = small_panel();
        let settings = RenderSettings::default();
        let mut backend = create_backend(BackendKind::Cpu, &settings).unwrap();
        let labels = PreparedLabelStore::empty(&panel);
        let range = FrameRange::new(FrameIndex(0), FrameIndex(99)).unwrap();
        assert!(
            render_frames(
                &panel,
                range,
                backend.as_mut(),
                &labels,
                &RenderThreading::default()
            )
            .is_err()
        );
    }

    #[test]
    fn zero_worker_threads_is_rejected() {
        assert!(build_thread_pool(Some(0)).is_err());
    }
}
