use std::collections::BTreeSet;

use crate::{
    animation::ease::Ease,
    foundation::core::{Canvas, Fps, FrameIndex},
    foundation::error::{GaugeError, GaugeResult},
    gauge::spec::{GaugeSpec, TankGeometry},
};

/// Declarative scene: a bank of gauges on one canvas with a shared clock.
///
/// Serializable to JSON and fully deterministic: `seed` drives every
/// randomized wave parameter, so equal panels render byte-identical frames.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GaugePanel {
    pub fps: Fps,
    pub canvas: Canvas,
    pub duration: FrameIndex, // total frames
    pub gauges: Vec<GaugeSpec>,
    pub seed: u64,
    #[serde(default)]
    pub layout: PanelLayout,
    #[serde(default)]
    pub style: PanelStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RowAlign {
    Start,
    Center,
    End,
}

/// Horizontal row placement of the fixed-size gauge cells.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelLayout {
    #[serde(default = "default_gap")]
    pub gap_px: f64,
    #[serde(default)]
    pub padding: Edges,
    #[serde(default = "default_align")]
    pub align_x: RowAlign,
    #[serde(default = "default_align")]
    pub align_y: RowAlign,
}

fn default_gap() -> f64 {
    16.0
}

fn default_align() -> RowAlign {
    RowAlign::Center
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            gap_px: default_gap(),
            padding: Edges::default(),
            align_x: default_align(),
            align_y: default_align(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelStyle {
    #[serde(default)]
    pub tank: TankGeometry,
    /// Vertical space under each tank reserved for its caption.
    #[serde(default = "default_caption_band")]
    pub caption_band_px: f64,
    /// Font file for captions, relative to the panel JSON. No font, no text.
    #[serde(default)]
    pub font_source: Option<String>,
    #[serde(default = "default_label_size")]
    pub label_size_px: f32,
    #[serde(default = "default_value_size")]
    pub value_size_px: f32,
    #[serde(default = "default_fill_ease")]
    pub fill_ease: Ease,
}

fn default_caption_band() -> f64 {
    44.0
}

fn default_label_size() -> f32 {
    13.0
}

fn default_value_size() -> f32 {
    11.0
}

fn default_fill_ease() -> Ease {
    Ease::OutCubic
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            tank: TankGeometry::default(),
            caption_band_px: default_caption_band(),
            font_source: None,
            label_size_px: default_label_size(),
            value_size_px: default_value_size(),
            fill_ease: default_fill_ease(),
        }
    }
}

impl GaugePanel {
    pub fn validate(&self) -> GaugeResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(GaugeError::validation("fps must have num>0 and den>0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(GaugeError::validation("canvas width/height must be > 0"));
        }
        if self.duration.0 == 0 {
            return Err(GaugeError::validation("duration must be > 0 frames"));
        }
        if self.style.tank.width <= 0.0 || self.style.tank.height <= 0.0 {
            return Err(GaugeError::validation("tank width/height must be > 0"));
        }

        let mut seen = BTreeSet::new();
        for gauge in &self.gauges {
            if gauge.id.trim().is_empty() {
                return Err(GaugeError::validation("gauge id must be non-empty"));
            }
            if !seen.insert(gauge.id.as_str()) {
                return Err(GaugeError::validation(format!(
                    "duplicate gauge id '{}'",
                    gauge.id
                )));
            }
            if !gauge.level.is_finite() {
                return Err(GaugeError::validation(format!(
                    "gauge '{}' level must be finite",
                    gauge.id
                )));
            }
        }

        Ok(())
    }
}

/// Builder for panels assembled in code rather than parsed from JSON.
pub struct PanelBuilder {
    fps: Fps,
    canvas: Canvas,
    duration: FrameIndex,
    seed: u64,
    layout: PanelLayout,
    style: PanelStyle,
    gauges: Vec<GaugeSpec>,
}

impl PanelBuilder {
    pub fn new(fps: Fps, canvas: Canvas, duration: FrameIndex) -> Self {
        Self {
            fps,
            canvas,
            duration,
            seed: 0,
            layout: PanelLayout::default(),
            style: PanelStyle::default(),
            gauges: Vec::new(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn layout(mut self, layout: PanelLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// Add a gauge that activates on the given timeline frame.
    pub fn gauge(
        mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        level: f64,
        unit_suffix: impl Into<String>,
        activate_at: Option<FrameIndex>,
    ) -> Self {
        self.gauges.push(GaugeSpec {
            id: id.into(),
            label: label.into(),
            level,
            unit_suffix: unit_suffix.into(),
            activate_at,
        });
        self
    }

    pub fn build(self) -> GaugeResult<GaugePanel> {
        let panel = GaugePanel {
            fps: self.fps,
            canvas: self.canvas,
            duration: self.duration,
            gauges: self.gauges,
            seed: self.seed,
            layout: self.layout,
            style: self.style,
        };
        panel.validate()?;
        Ok(panel)
    }
}
