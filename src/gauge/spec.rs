use crate::foundation::core::FrameIndex;

/// Top of the level scale. Levels at or above this map to a full tank and
/// the warm end of the hue ramp.
pub const MAX_LEVEL: f64 = 5.0;

/// Declarative description of one gauge: what it measures and when it wakes.
///
/// `activate_at` is the timeline expression of the hosting page's
/// "entered the viewport" signal; `None` means the fill never starts (the
/// surface still ripples). The gauge performs no translation: `label` and
/// `unit_suffix` arrive ready to display.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GaugeSpec {
    pub id: String,
    pub label: String,
    pub level: f64,
    #[serde(default)]
    pub unit_suffix: String,
    #[serde(default)]
    pub activate_at: Option<FrameIndex>,
}

impl GaugeSpec {
    /// Normalized fill target in `[0, 1]`. Negative levels clamp to 0.
    pub fn target_fraction(&self) -> f64 {
        if !self.level.is_finite() {
            return 0.0;
        }
        (self.level / MAX_LEVEL).clamp(0.0, 1.0)
    }

    /// Caption under the tank, e.g. `"2.6years"` or `"3y"`.
    pub fn value_caption(&self) -> String {
        if self.level.is_finite() {
            format!("{}{}", self.level, self.unit_suffix)
        } else {
            format!("0{}", self.unit_suffix)
        }
    }
}

/// Fixed display footprint of a tank, in logical units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TankGeometry {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    #[serde(default = "default_border_width")]
    pub border_width: f64,
}

fn default_width() -> f64 {
    60.0
}

fn default_height() -> f64 {
    180.0
}

fn default_corner_radius() -> f64 {
    16.0
}

fn default_border_width() -> f64 {
    2.0
}

impl Default for TankGeometry {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            corner_radius: default_corner_radius(),
            border_width: default_border_width(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(level: f64) -> GaugeSpec {
        GaugeSpec {
            id: "g0".to_string(),
            label: "Rust".to_string(),
            level,
            unit_suffix: "years".to_string(),
            activate_at: None,
        }
    }

    #[test]
    fn target_fraction_clamps_both_ends() {
        assert_eq!(spec(-1.0).target_fraction(), 0.0);
        assert_eq!(spec(0.0).target_fraction(), 0.0);
        assert_eq!(spec(5.0).target_fraction(), 1.0);
        assert_eq!(spec(9.0).target_fraction(), 1.0);
        assert!((spec(2.6).target_fraction() - 0.52).abs() < 1e-12);
    }

    #[test]
    fn target_fraction_is_strictly_monotonic_in_range() {
        let mut prev = spec(0.1).target_fraction();
        for i in 2..50 {
            let cur = spec(0.1 * f64::from(i)).target_fraction().min(1.0);
            if cur < 1.0 {
                assert!(cur > prev);
            }
            prev = cur;
        }
    }

    #[test]
    fn value_caption_prints_like_the_level() {
        assert_eq!(spec(2.6).value_caption(), "2.6years");
        assert_eq!(spec(3.0).value_caption(), "3years");
        assert_eq!(spec(f64::NAN).value_caption(), "0years");
    }

    #[test]
    fn tank_geometry_defaults_match_footprint() {
        let g = TankGeometry::default();
        assert_eq!(g.width, 60.0);
        assert_eq!(g.height, 180.0);
    }
}
