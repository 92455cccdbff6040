use kurbo::Shape as _;

use crate::{
    assets::labels::PreparedLabelStore,
    eval::evaluator::EvaluatedPanel,
    foundation::core::{Affine, BezPath, Canvas, Rgba8Premul, Vec2},
    foundation::error::{GaugeError, GaugeResult},
    gauge::color::LIQUID_OPACITY,
    gauge::wave::region_from_surface,
    panel::model::GaugePanel,
};

// Tank chrome: translucent dark body behind the liquid, white border ring.
const TANK_BODY_RGB: (u8, u8, u8) = (34, 34, 34);
const TANK_BODY_OPACITY: f32 = 0.53;
const TANK_BORDER_OPACITY: f32 = 0.4;

const CAPTION_TOP_PAD: f64 = 8.0;
const CAPTION_LINE_GAP: f64 = 2.0;

const PATH_TOLERANCE: f64 = 0.1;

/// Backend-agnostic draw plan for a single frame: ops in paint order over
/// one canvas-sized surface.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
}

/// Which of a gauge's two caption lines an op draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptionKind {
    Label,
    Value,
}

/// Draw operation emitted by the compiler.
#[derive(Clone, Debug)]
pub enum DrawOp {
    FillPath {
        path: BezPath,
        transform: Affine,
        color: Rgba8Premul,
        opacity: f32,
        z: i32,
    },
    Caption {
        gauge_index: usize,
        kind: CaptionKind,
        transform: Affine,
        z: i32,
    },
}

impl DrawOp {
    fn z(&self) -> i32 {
        match self {
            Self::FillPath { z, .. } | Self::Caption { z, .. } => *z,
        }
    }
}

/// Compile an evaluated panel into a draw plan.
///
/// Per gauge, in z order: tank body, liquid region, border ring, captions.
/// Caption ops are emitted only for gauges the label store has shaped.
#[tracing::instrument(skip(panel, eval, labels))]
pub fn compile_frame(
    panel: &GaugePanel,
    eval: &EvaluatedPanel,
    labels: &PreparedLabelStore,
) -> GaugeResult<RenderPlan> {
    if eval.nodes.len() != panel.gauges.len() {
        return Err(GaugeError::evaluation(
            "evaluated node count does not match panel gauges",
        ));
    }

    let tank = &panel.style.tank;
    let rounded = kurbo::RoundedRect::new(0.0, 0.0, tank.width, tank.height, tank.corner_radius);
    let body_path = rounded.to_path(PATH_TOLERANCE);
    let border_path = kurbo::stroke(
        rounded.path_elements(PATH_TOLERANCE),
        &kurbo::Stroke::new(tank.border_width),
        &kurbo::StrokeOpts::default(),
        PATH_TOLERANCE,
    );

    let mut ops = Vec::with_capacity(eval.nodes.len() * 5);
    for (idx, node) in eval.nodes.iter().enumerate() {
        let to_cell = Affine::translate(node.origin);

        ops.push(DrawOp::FillPath {
            path: body_path.clone(),
            transform: to_cell,
            color: Rgba8Premul::from_straight_rgba(
                TANK_BODY_RGB.0,
                TANK_BODY_RGB.1,
                TANK_BODY_RGB.2,
                255,
            ),
            opacity: TANK_BODY_OPACITY,
            z: 0,
        });

        ops.push(DrawOp::FillPath {
            path: region_from_surface(&node.surface, node.fill_fraction, tank),
            transform: to_cell,
            color: node.color,
            opacity: LIQUID_OPACITY,
            z: 1,
        });

        ops.push(DrawOp::FillPath {
            path: border_path.clone(),
            transform: to_cell,
            color: Rgba8Premul::from_straight_rgba(255, 255, 255, 255),
            opacity: TANK_BORDER_OPACITY,
            z: 2,
        });

        if let Some(captions) = labels.captions_for(idx) {
            let label_x = (tank.width - f64::from(captions.label.width)) / 2.0;
            let label_y = tank.height + CAPTION_TOP_PAD;
            ops.push(DrawOp::Caption {
                gauge_index: idx,
                kind: CaptionKind::Label,
                transform: to_cell * Affine::translate(Vec2::new(label_x, label_y)),
                z: 3,
            });

            let value_x = (tank.width - f64::from(captions.value.width)) / 2.0;
            let value_y = label_y + f64::from(captions.label.height) + CAPTION_LINE_GAP;
            ops.push(DrawOp::Caption {
                gauge_index: idx,
                kind: CaptionKind::Value,
                transform: to_cell * Affine::translate(Vec2::new(value_x, value_y)),
                z: 3,
            });
        }
    }

    ops.sort_by_key(DrawOp::z);

    Ok(RenderPlan {
        canvas: panel.canvas,
        ops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        eval::evaluator::Evaluator,
        foundation::core::{Canvas, Fps, FrameIndex},
        panel::model::PanelBuilder,
    };

    fn panel() -> GaugePanel {
        PanelBuilder::new(
            Fps::new(30, 1).unwrap(),
            Canvas {
                width: 480,
                height: 260,
            },
            FrameIndex(60),
        )
        .seed(3)
        .gauge("a", "A", 1.0, "", Some(FrameIndex(0)))
        .gauge("b", "B", 5.0, "", Some(FrameIndex(0)))
        .build()
        .unwrap()
    }

    #[test]
    fn fontless_panel_compiles_three_ops_per_gauge() {
        let p = panel();
        let eval = Evaluator::eval_frame(&p, FrameIndex(10)).unwrap();
        let plan = compile_frame(&p, &eval, &PreparedLabelStore::empty(&p)).unwrap();
        assert_eq!(plan.ops.len(), 6);
        assert!(
            plan.ops
                .iter()
                .all(|op| matches!(op, DrawOp::FillPath { .. }))
        );
    }

    #[test]
    fn ops_are_sorted_by_z() {
        let p = panel();
        let eval = Evaluator::eval_frame(&p, FrameIndex(10)).unwrap();
        let plan = compile_frame(&p, &eval, &PreparedLabelStore::empty(&p)).unwrap();
        let zs: Vec<i32> = plan.ops.iter().map(DrawOp::z).collect();
        let mut sorted = zs.clone();
        sorted.sort();
        assert_eq!(zs, sorted);
    }

    #[test]
    fn liquid_uses_the_level_color() {
        let p = panel();
        let eval = Evaluator::eval_frame(&p, FrameIndex(10)).unwrap();
        let plan = compile_frame(&p, &eval, &PreparedLabelStore::empty(&p)).unwrap();

        let liquid_colors: Vec<Rgba8Premul> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillPath { z: 1, color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(liquid_colors.len(), 2);
        // Level 1 leans blue, level 5 leans red.
        assert!(liquid_colors[0].b > liquid_colors[0].r);
        assert!(liquid_colors[1].r > liquid_colors[1].b);
    }

    #[test]
    fn node_count_mismatch_is_rejected() {
        let p = panel();
        let mut eval = Evaluator::eval_frame(&p, FrameIndex(10)).unwrap();
        eval.nodes.pop();
        assert!(compile_frame(&p, &eval, &PreparedLabelStore::empty(&p)).is_err());
    }
}
