use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    assets::text::{TextBrushRgba8, TextLayoutEngine},
    foundation::error::{GaugeError, GaugeResult},
    panel::model::GaugePanel,
};

const LABEL_BRUSH: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

// White at 80%, matching the dimmer value line under the label.
const VALUE_BRUSH: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 204,
};

/// One shaped caption line with its measured extent.
#[derive(Clone)]
pub struct PreparedCaption {
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    pub width: f32,
    pub height: f32,
}

/// Label + value captions for one gauge.
#[derive(Clone)]
pub struct GaugeCaptions {
    pub label: PreparedCaption,
    pub value: PreparedCaption,
}

/// Front-loaded caption store: font IO and text shaping happen here, once,
/// so evaluation and rendering stay IO-free. A panel without a configured
/// font gets an empty store and renders no captions.
pub struct PreparedLabelStore {
    font_bytes: Option<Arc<Vec<u8>>>,
    captions: Vec<Option<GaugeCaptions>>,
}

impl PreparedLabelStore {
    /// Store with no font: every caption lookup misses.
    pub fn empty(panel: &GaugePanel) -> Self {
        Self {
            font_bytes: None,
            captions: vec![None; panel.gauges.len()],
        }
    }

    /// Load the panel's font (relative to `assets_root`) and shape each
    /// gauge's label and value caption.
    pub fn prepare(panel: &GaugePanel, assets_root: &Path) -> GaugeResult<Self> {
        let Some(source) = &panel.style.font_source else {
            return Ok(Self::empty(panel));
        };

        let rel = normalize_rel_path(source)?;
        let path = assets_root.join(Path::new(&rel));
        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read font '{}'", path.display()))?;
        let font_bytes = Arc::new(bytes);

        let mut engine = TextLayoutEngine::new();
        let mut captions = Vec::with_capacity(panel.gauges.len());
        for gauge in &panel.gauges {
            let label = prepare_caption(
                &mut engine,
                &gauge.label,
                &font_bytes,
                panel.style.label_size_px,
                LABEL_BRUSH,
            )?;
            let value = prepare_caption(
                &mut engine,
                &gauge.value_caption(),
                &font_bytes,
                panel.style.value_size_px,
                VALUE_BRUSH,
            )?;
            captions.push(Some(GaugeCaptions { label, value }));
        }

        Ok(Self {
            font_bytes: Some(font_bytes),
            captions,
        })
    }

    pub fn font_bytes(&self) -> Option<&Arc<Vec<u8>>> {
        self.font_bytes.as_ref()
    }

    pub fn captions_for(&self, gauge_index: usize) -> Option<&GaugeCaptions> {
        self.captions.get(gauge_index).and_then(|c| c.as_ref())
    }
}

fn prepare_caption(
    engine: &mut TextLayoutEngine,
    text: &str,
    font_bytes: &[u8],
    size_px: f32,
    brush: TextBrushRgba8,
) -> GaugeResult<PreparedCaption> {
    let layout = engine.layout_plain(text, font_bytes, size_px, brush)?;
    let width = layout.width();
    let height = layout.height();
    Ok(PreparedCaption {
        layout: Arc::new(layout),
        width,
        height,
    })
}

/// Normalize and validate panel-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> GaugeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(GaugeError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(GaugeError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(GaugeError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(GaugeError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        foundation::core::{Canvas, Fps, FrameIndex},
        panel::model::PanelBuilder,
    };

    fn panel() -> GaugePanel {
        PanelBuilder::new(
            Fps::new(30, 1).unwrap(),
            Canvas {
                width: 200,
                height: 260,
            },
            FrameIndex(60),
        )
        .gauge("g0", "Rust", 2.6, "years", None)
        .build()
        .unwrap()
    }

    #[test]
    fn fontless_panel_prepares_an_empty_store() {
        let p = panel();
        let store = PreparedLabelStore::prepare(&p, Path::new(".")).unwrap();
        assert!(store.font_bytes().is_none());
        assert!(store.captions_for(0).is_none());
        assert!(store.captions_for(99).is_none());
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let mut p = panel();
        p.style.font_source = Some("fonts/nope.ttf".to_string());
        assert!(PreparedLabelStore::prepare(&p, Path::new("target")).is_err());
    }

    #[test]
    fn rel_path_normalization() {
        assert_eq!(normalize_rel_path("a/./b.ttf").unwrap(), "a/b.ttf");
        assert_eq!(normalize_rel_path("a\\b.ttf").unwrap(), "a/b.ttf");
        assert!(normalize_rel_path("/abs.ttf").is_err());
        assert!(normalize_rel_path("../up.ttf").is_err());
        assert!(normalize_rel_path("").is_err());
        assert!(normalize_rel_path("./.").is_err());
    }
}
