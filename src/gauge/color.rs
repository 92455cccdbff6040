use crate::{foundation::core::Rgba8Premul, gauge::spec::MAX_LEVEL};

/// Hue at level 0: cool blue.
pub const HUE_COOL: f64 = 220.0;
/// Hue at the top of the scale: warm near-red.
pub const HUE_WARM: f64 = 10.0;

const SATURATION: f64 = 0.80;
const LIGHTNESS: f64 = 0.55;

/// Opacity the liquid region is painted with.
pub const LIQUID_OPACITY: f32 = 0.85;

/// Map a raw level to a hue in degrees, linearly from 220 (blue) at 0 down
/// to 10 (near red) at [`MAX_LEVEL`]. Out-of-range levels clamp to the ends;
/// the hue never leaves `[10, 220]`.
pub fn level_hue(level: f64) -> f64 {
    let level = if level.is_finite() {
        level.clamp(0.0, MAX_LEVEL)
    } else {
        0.0
    };
    HUE_COOL - (HUE_COOL - HUE_WARM) * level / MAX_LEVEL
}

/// Liquid color for a raw level: the mapped hue at fixed saturation and
/// lightness, fully opaque (translucency is applied as draw opacity).
pub fn liquid_color(level: f64) -> Rgba8Premul {
    hsl_to_rgba8(level_hue(level), SATURATION, LIGHTNESS)
}

/// Standard HSL -> RGB conversion (sRGB space, `s` and `l` in 0..1).
fn hsl_to_rgba8(h: f64, s: f64, l: f64) -> Rgba8Premul {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    if s == 0.0 {
        let v = to_u8(l);
        return Rgba8Premul::from_straight_rgba(v, v, v, 255);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    Rgba8Premul::from_straight_rgba(to_u8(r), to_u8(g), to_u8(b), 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_endpoints_are_exact() {
        assert_eq!(level_hue(0.0), 220.0);
        assert_eq!(level_hue(-2.0), 220.0);
        assert_eq!(level_hue(5.0), 10.0);
        assert_eq!(level_hue(99.0), 10.0);
        assert_eq!(level_hue(f64::NAN), 220.0);
    }

    #[test]
    fn hue_is_strictly_decreasing_in_range() {
        let mut prev = level_hue(0.0);
        for i in 1..=50 {
            let cur = level_hue(0.1 * f64::from(i));
            assert!(cur < prev, "hue must fall as level rises");
            prev = cur;
        }
    }

    #[test]
    fn hue_never_leaves_the_ramp() {
        for i in -10..=100 {
            let h = level_hue(0.1 * f64::from(i));
            assert!((10.0..=220.0).contains(&h));
        }
    }

    #[test]
    fn liquid_color_is_blue_at_zero_and_red_at_max() {
        let cool = liquid_color(0.0);
        assert!(cool.b > cool.r, "level 0 should lean blue");

        let warm = liquid_color(5.0);
        assert!(warm.r > warm.b, "level 5 should lean red");

        // Both ends are opaque; translucency is a draw-time opacity.
        assert_eq!(cool.a, 255);
        assert_eq!(warm.a, 255);
    }

    #[test]
    fn hsl_primary_sanity() {
        // h=0, full saturation, mid lightness is pure red.
        let c = hsl_to_rgba8(0.0, 1.0, 0.5);
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
    }
}
