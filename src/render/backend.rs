use crate::{
    assets::labels::PreparedLabelStore,
    compile::plan::RenderPlan,
    foundation::error::GaugeResult,
};

/// One rendered frame: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Backend seam: executes a [`RenderPlan`] into pixels.
pub trait RenderBackend {
    fn render_plan(
        &mut self,
        plan: &RenderPlan,
        labels: &PreparedLabelStore,
    ) -> GaugeResult<FrameRGBA>;

    /// Settings a parallel pipeline can use to spin up per-worker backends.
    /// `None` means the backend does not support worker cloning.
    fn worker_render_settings(&self) -> Option<RenderSettings>;
}

#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    Cpu,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Background the canvas is cleared to (straight RGBA8) before drawing.
    /// `None` leaves the canvas transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> GaugeResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
    }
}
