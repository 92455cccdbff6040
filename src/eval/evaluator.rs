use crate::{
    animation::fill::{FillAnimation, FillPhase},
    foundation::core::{FrameIndex, Point, Rgba8Premul, Vec2},
    foundation::error::{GaugeError, GaugeResult},
    foundation::math::stable_hash64,
    gauge::color::liquid_color,
    gauge::wave::WaveParams,
    layout::solver::resolve_row_offsets,
    panel::model::GaugePanel,
};

/// Fully evaluated panel state for one frame, ready for compilation.
#[derive(Clone, Debug)]
pub struct EvaluatedPanel {
    pub frame: FrameIndex,
    /// One node per gauge, in panel (paint) order.
    pub nodes: Vec<EvaluatedGauge>,
}

/// Per-gauge state the compiler consumes. Everything here is derived: the
/// surface polyline is recomputed from scratch each frame, never diffed.
#[derive(Clone, Debug)]
pub struct EvaluatedGauge {
    pub id: String,
    /// Top-left of the gauge cell on the canvas.
    pub origin: Vec2,
    pub fill_fraction: f64,
    pub fill_phase: FillPhase,
    pub color: Rgba8Premul,
    /// Sampled liquid surface in tank-local coordinates.
    pub surface: Vec<Point>,
}

/// Stateless evaluator from panel timeline to per-frame gauge state.
pub struct Evaluator;

impl Evaluator {
    /// Evaluate one frame. Pure and deterministic: wave parameters derive
    /// from `(panel.seed, gauge.id)`, and the fill fraction is a closed-form
    /// function of the frame counter.
    #[tracing::instrument(skip(panel))]
    pub fn eval_frame(panel: &GaugePanel, frame: FrameIndex) -> GaugeResult<EvaluatedPanel> {
        panel.validate()?;
        if frame.0 >= panel.duration.0 {
            return Err(GaugeError::evaluation("frame is out of bounds"));
        }

        let offsets = resolve_row_offsets(panel);
        let mut nodes = Vec::with_capacity(panel.gauges.len());

        for (idx, gauge) in panel.gauges.iter().enumerate() {
            let params = WaveParams::from_seed(stable_hash64(panel.seed, &gauge.id));
            let fill = FillAnimation::scheduled(
                gauge.target_fraction(),
                panel.fps,
                panel.style.fill_ease,
                gauge.activate_at.map(|f| f.0),
            );
            let fill_fraction = fill.fraction_at(frame.0);

            nodes.push(EvaluatedGauge {
                id: gauge.id.clone(),
                origin: offsets[idx],
                fill_fraction,
                fill_phase: fill.phase(frame.0),
                color: liquid_color(gauge.level),
                surface: params.sample_surface(frame.0, fill_fraction, &panel.style.tank),
            });
        }

        Ok(EvaluatedPanel { frame, nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::{Canvas, Fps},
        panel::model::PanelBuilder,
    };

    fn panel() -> GaugePanel {
        PanelBuilder::new(
            Fps::new(30, 1).unwrap(),
            Canvas {
                width: 480,
                height: 260,
            },
            FrameIndex(600),
        )
        .seed(7)
        .gauge("rust", "Rust", 2.6, "years", Some(FrameIndex(0)))
        .gauge("dormant", "Dormant", 4.0, "years", None)
        .build()
        .unwrap()
    }

    #[test]
    fn eval_is_deterministic() {
        let p = panel();
        let a = Evaluator::eval_frame(&p, FrameIndex(123)).unwrap();
        let b = Evaluator::eval_frame(&p, FrameIndex(123)).unwrap();
        assert_eq!(a.nodes.len(), 2);
        for (x, y) in a.nodes.iter().zip(&b.nodes) {
            assert_eq!(x.fill_fraction, y.fill_fraction);
            assert_eq!(x.surface, y.surface);
            assert_eq!(x.color, y.color);
        }
    }

    #[test]
    fn unactivated_gauge_stays_empty_forever() {
        let p = panel();
        for frame in [0, 100, 599] {
            let eval = Evaluator::eval_frame(&p, FrameIndex(frame)).unwrap();
            assert_eq!(eval.nodes[1].fill_fraction, 0.0);
            assert_eq!(eval.nodes[1].fill_phase, FillPhase::Idle);
        }
    }

    #[test]
    fn activated_gauge_settles_at_eight_seconds() {
        let p = panel();
        // 8 s at 30 fps after the frame-0 activation.
        let eval = Evaluator::eval_frame(&p, FrameIndex(240)).unwrap();
        assert!((eval.nodes[0].fill_fraction - 0.52).abs() < 1e-12);
        assert_eq!(eval.nodes[0].fill_phase, FillPhase::Settled);

        let later = Evaluator::eval_frame(&p, FrameIndex(500)).unwrap();
        assert_eq!(later.nodes[0].fill_fraction, eval.nodes[0].fill_fraction);
    }

    #[test]
    fn idle_gauges_still_ripple() {
        let p = panel();
        let a = Evaluator::eval_frame(&p, FrameIndex(10)).unwrap();
        let b = Evaluator::eval_frame(&p, FrameIndex(11)).unwrap();
        assert_ne!(a.nodes[1].surface, b.nodes[1].surface);
    }

    #[test]
    fn out_of_bounds_frame_is_an_error() {
        let p = panel();
        assert!(Evaluator::eval_frame(&p, FrameIndex(600)).is_err());
    }

    #[test]
    fn gauges_get_distinct_wave_streams() {
        let p = panel();
        let eval = Evaluator::eval_frame(&p, FrameIndex(50)).unwrap();
        let ys0: Vec<f64> = eval.nodes[0].surface.iter().map(|pt| pt.y).collect();
        let ys1: Vec<f64> = eval.nodes[1].surface.iter().map(|pt| pt.y).collect();
        assert_ne!(ys0, ys1);
    }
}
