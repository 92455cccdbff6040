use crate::{
    assets::labels::PreparedLabelStore,
    compile::plan::{CaptionKind, DrawOp, RenderPlan},
    foundation::error::{GaugeError, GaugeResult},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
};

/// CPU backend rasterizing draw plans with `vello_cpu`.
pub struct CpuBackend {
    settings: RenderSettings,
    // Font handle rebuilt when the label store's font bytes change identity.
    font_cache: Option<(usize, vello_cpu::peniko::FontData)>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            font_cache: None,
        }
    }

    fn font_for(
        &mut self,
        labels: &PreparedLabelStore,
    ) -> GaugeResult<vello_cpu::peniko::FontData> {
        let bytes = labels
            .font_bytes()
            .ok_or_else(|| GaugeError::evaluation("caption op without a prepared font"))?;
        let key = std::sync::Arc::as_ptr(bytes) as usize;

        if let Some((cached_key, font)) = &self.font_cache
            && *cached_key == key
        {
            return Ok(font.clone());
        }

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        self.font_cache = Some((key, font.clone()));
        Ok(font)
    }
}

impl RenderBackend for CpuBackend {
    fn render_plan(
        &mut self,
        plan: &RenderPlan,
        labels: &PreparedLabelStore,
    ) -> GaugeResult<FrameRGBA> {
        let width_u16: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| GaugeError::evaluation("canvas width exceeds u16"))?;
        let height_u16: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| GaugeError::evaluation("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(plan.canvas.width),
                f64::from(plan.canvas.height),
            ));
        }

        for op in &plan.ops {
            draw_op(self, &mut ctx, op, labels)?;
        }

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn worker_render_settings(&self) -> Option<RenderSettings> {
        Some(self.settings.clone())
    }
}

fn draw_op(
    backend: &mut CpuBackend,
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
    labels: &PreparedLabelStore,
) -> GaugeResult<()> {
    match op {
        DrawOp::FillPath {
            path,
            transform,
            color,
            opacity,
            z: _,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            if *opacity < 1.0 {
                ctx.push_opacity_layer(*opacity);
            }
            let cpu_path = bezpath_to_cpu(path);
            ctx.fill_path(&cpu_path);
            if *opacity < 1.0 {
                ctx.pop_layer();
            }
            Ok(())
        }
        DrawOp::Caption {
            gauge_index,
            kind,
            transform,
            z: _,
        } => {
            let captions = labels.captions_for(*gauge_index).ok_or_else(|| {
                GaugeError::evaluation(format!(
                    "caption op for gauge {gauge_index} without prepared captions"
                ))
            })?;
            let caption = match kind {
                CaptionKind::Label => &captions.label,
                CaptionKind::Value => &captions.value,
            };

            let font = backend.font_for(labels)?;
            ctx.set_transform(affine_to_cpu(*transform));

            for line in caption.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }

            Ok(())
        }
    }
}

fn affine_to_cpu(a: crate::foundation::core::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: crate::foundation::core::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &crate::foundation::core::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
