use std::f64::consts::{PI, TAU};

use crate::{
    foundation::core::{BezPath, Point},
    foundation::math::Rng64,
    gauge::spec::TankGeometry,
};

/// Number of independent sine oscillators summed into the surface.
pub const WAVE_COUNT: usize = 3;

/// Horizontal sampling step across the tank width, in logical units.
pub const SAMPLE_STEP: f64 = 2.0;

/// Whole-surface vertical oscillation ("slosh").
pub const SLOSH_SPEED: f64 = 0.018;
pub const SLOSH_AMPLITUDE: f64 = 2.2;

/// Fine high-frequency surface texture.
pub const MICRO_SPEED: f64 = 0.027;
pub const MICRO_X_SCALE: f64 = 0.19;
pub const MICRO_AMPLITUDE: f64 = 0.8;

/// One randomized sine generator contributing to the liquid surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    /// Peak vertical displacement, in `[5, 12)`.
    pub amplitude: f64,
    /// Horizontal wave count across the tank, in `[1.5, 4)`.
    pub frequency: f64,
    /// Phase advance per frame, in `[0.018, 0.0555)`.
    pub angular_speed: f64,
    /// Initial phase, in `[0, 2π)`.
    pub phase: f64,
}

/// Immutable per-gauge wave state: the oscillator set plus the slosh phase.
///
/// Drawn once from a seeded stream at construction and held for the gauge's
/// lifetime; two gauges with equal seeds ripple identically, which keeps
/// whole-panel renders reproducible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub oscillators: [Oscillator; WAVE_COUNT],
    pub slosh_phase: f64,
}

impl WaveParams {
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let oscillators = std::array::from_fn(|_| Oscillator {
            amplitude: 5.0 + rng.next_f64_01() * 7.0,
            frequency: 1.5 + rng.next_f64_01() * 2.5,
            angular_speed: (0.012 + rng.next_f64_01() * 0.025) * 1.5,
            phase: rng.next_f64_01() * TAU,
        });
        Self {
            oscillators,
            slosh_phase: rng.next_f64_01() * TAU,
        }
    }

    /// Sum of oscillator amplitudes; with slosh and micro terms this bounds
    /// the surface's deviation from the base height.
    pub fn amplitude_sum(&self) -> f64 {
        self.oscillators.iter().map(|o| o.amplitude).sum()
    }

    /// Sample the surface polyline for one frame.
    ///
    /// Pure: identical `(frame, fill_fraction, geometry)` on the same params
    /// always yield identical points. Sampling covers `x = 0` through
    /// `x = width` inclusive at [`SAMPLE_STEP`] intervals; `y` values are
    /// unclamped offsets around the base height `height * (1 - fill)`.
    pub fn sample_surface(
        &self,
        frame: u64,
        fill_fraction: f64,
        geom: &TankGeometry,
    ) -> Vec<Point> {
        let fill = fill_fraction.clamp(0.0, 1.0);
        let base_y = geom.height * (1.0 - fill);
        let frame = frame as f64;

        let steps = (geom.width / SAMPLE_STEP).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 1);
        for i in 0..=steps {
            let x = ((i as f64) * SAMPLE_STEP).min(geom.width);
            let attenuation = edge_attenuation(x, geom.width);

            let mut offset = 0.0;
            for osc in &self.oscillators {
                offset += osc.amplitude
                    * ((x / geom.width) * PI * osc.frequency
                        + frame * osc.angular_speed
                        + osc.phase)
                        .sin()
                    * attenuation;
            }
            let slosh = (frame * SLOSH_SPEED + self.slosh_phase).sin() * SLOSH_AMPLITUDE;
            let micro = (frame * MICRO_SPEED + x * MICRO_X_SCALE).sin() * MICRO_AMPLITUDE;

            points.push(Point::new(x, base_y + offset + slosh + micro));
        }
        points
    }

    /// Closed liquid region for one frame, in tank-local coordinates.
    pub fn surface_region(&self, frame: u64, fill_fraction: f64, geom: &TankGeometry) -> BezPath {
        let fill = fill_fraction.clamp(0.0, 1.0);
        region_from_surface(&self.sample_surface(frame, fill, geom), fill, geom)
    }
}

/// Close an already-sampled surface polyline into a paintable liquid region:
/// bottom edge, left wall up to the base height, the surface, right wall
/// back down. Surface `y` values are clamped to the tank's vertical extent
/// so wave crests never paint outside the tank.
pub fn region_from_surface(surface: &[Point], fill_fraction: f64, geom: &TankGeometry) -> BezPath {
    let base_y = geom.height * (1.0 - fill_fraction.clamp(0.0, 1.0));

    let mut path = BezPath::new();
    path.move_to((0.0, geom.height));
    path.line_to((0.0, base_y));
    for p in surface {
        path.line_to((p.x, p.y.clamp(0.0, geom.height)));
    }
    path.line_to((geom.width, geom.height));
    path.close_path();
    path
}

/// Damping factor pinning the wave near the tank walls: 1 at the center of
/// the tank, exactly 0.6 at either wall, never zero.
pub fn edge_attenuation(x: f64, width: f64) -> f64 {
    0.6 + 0.4 * (PI * x / width).sin()
}
