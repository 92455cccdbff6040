use crate::{
    animation::ease::Ease,
    animation::fill::{FillAnimation, FillPhase},
    foundation::core::{BezPath, Fps, Point, Rgba8Premul},
    foundation::math::stable_hash64,
    gauge::color::liquid_color,
    gauge::spec::{GaugeSpec, TankGeometry},
    gauge::wave::WaveParams,
};

/// Everything needed to paint one gauge frame. Derived and ephemeral:
/// recomputed per tick, never cached across ticks.
#[derive(Clone, Debug)]
pub struct SurfaceSample {
    pub frame: u64,
    pub fill_fraction: f64,
    pub phase: FillPhase,
    pub color: Rgba8Premul,
    /// Sampled surface polyline in tank-local coordinates.
    pub surface: Vec<Point>,
    /// Closed liquid region in tank-local coordinates.
    pub region: BezPath,
}

/// Imperative driver for hosts that tick a frame callback themselves.
///
/// Owns its wave parameters and fill state exclusively; instances share
/// nothing. The wave ripples from the first tick regardless of activation,
/// the fill rises only after [`GaugeState::activate`]. Dropping the value is
/// the cancellation story: there is no detached loop to outlive it.
#[derive(Clone, Debug)]
pub struct GaugeState {
    spec: GaugeSpec,
    geom: TankGeometry,
    params: WaveParams,
    fill: FillAnimation,
    frame: u64,
}

impl GaugeState {
    pub fn new(spec: GaugeSpec, geom: TankGeometry, fps: Fps, seed: u64) -> Self {
        let params = WaveParams::from_seed(stable_hash64(seed, &spec.id));
        let fill = FillAnimation::new(spec.target_fraction(), fps, Ease::OutCubic);
        Self {
            spec,
            geom,
            params,
            fill,
            frame: 0,
        }
    }

    pub fn spec(&self) -> &GaugeSpec {
        &self.spec
    }

    pub fn wave_params(&self) -> &WaveParams {
        &self.params
    }

    /// Latch the fill animation to start at the current frame. One-shot:
    /// repeated calls are no-ops.
    pub fn activate(&mut self) {
        self.fill.activate(self.frame);
    }

    pub fn phase(&self) -> FillPhase {
        self.fill.phase(self.frame)
    }

    /// Advance one frame and sample the surface for it.
    pub fn tick(&mut self) -> SurfaceSample {
        self.frame += 1;
        self.sample()
    }

    /// Sample the current frame without advancing.
    pub fn sample(&self) -> SurfaceSample {
        let fill_fraction = self.fill.fraction_at(self.frame);
        SurfaceSample {
            frame: self.frame,
            fill_fraction,
            phase: self.fill.phase(self.frame),
            color: liquid_color(self.spec.level),
            surface: self.params.sample_surface(self.frame, fill_fraction, &self.geom),
            region: self.params.surface_region(self.frame, fill_fraction, &self.geom),
        }
    }
}
