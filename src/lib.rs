//! Liquidgauge renders banks of animated "liquid tank" level gauges.
//!
//! A [`GaugePanel`] describes a row of tanks on one canvas: each gauge has a
//! label, a raw level on a 0–5 scale, and an optional activation frame. The
//! liquid's height tracks the normalized level, its hue runs from cool blue
//! at 0 to warm red at 5, and its surface ripples continuously from a sum of
//! seeded sine oscillators.
//!
//! # Pipeline overview
//!
//! 1. **Evaluate**: `GaugePanel + FrameIndex -> EvaluatedPanel` (fill
//!    fraction, color, surface polyline per gauge)
//! 2. **Compile**: `EvaluatedPanel -> RenderPlan` (z-ordered draw ops)
//! 3. **Render**: `RenderPlan -> FrameRGBA` (CPU backend on `vello_cpu`)
//! 4. **Encode** (optional): PNG via `image`, or MP4 by streaming frames to
//!    the system `ffmpeg` binary
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: wave parameters derive from the panel
//!   seed, so equal panels render byte-identical frames.
//! - **No IO in renderers**: font loading and caption shaping are
//!   front-loaded in [`PreparedLabelStore`].
//! - **Premultiplied RGBA8** end-to-end.
//!
//! Hosts that drive their own frame callback can skip the panel pipeline and
//! tick a single [`GaugeState`] instead.

#![forbid(unsafe_code)]

mod animation;
mod assets;
mod compile;
mod encode;
mod eval;
mod foundation;
mod gauge;
mod layout;
mod panel;
mod render;

pub use animation::ease::Ease;
pub use animation::fill::{FILL_DURATION_SECS, FillAnimation, FillPhase};
pub use assets::labels::{
    GaugeCaptions, PreparedCaption, PreparedLabelStore, normalize_rel_path,
};
pub use assets::text::{TextBrushRgba8, TextLayoutEngine};
pub use compile::plan::{CaptionKind, DrawOp, RenderPlan, compile_frame};
pub use encode::ffmpeg::{EncodeConfig, FfmpegEncoder, ensure_parent_dir, is_ffmpeg_on_path};
pub use eval::evaluator::{EvaluatedGauge, EvaluatedPanel, Evaluator};
pub use foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Vec2,
};
pub use foundation::error::{GaugeError, GaugeResult};
pub use gauge::color::{HUE_COOL, HUE_WARM, LIQUID_OPACITY, level_hue, liquid_color};
pub use gauge::spec::{GaugeSpec, MAX_LEVEL, TankGeometry};
pub use gauge::state::{GaugeState, SurfaceSample};
pub use gauge::wave::{
    MICRO_AMPLITUDE, Oscillator, SAMPLE_STEP, SLOSH_AMPLITUDE, WAVE_COUNT, WaveParams,
    edge_attenuation, region_from_surface,
};
pub use layout::solver::{cell_size, resolve_row_offsets};
pub use panel::model::{Edges, GaugePanel, PanelBuilder, PanelLayout, PanelStyle, RowAlign};
pub use render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use render::cpu::CpuBackend;
pub use render::pipeline::{
    RenderThreading, RenderToMp4Opts, render_frame, render_frames, render_to_mp4, write_png,
};
