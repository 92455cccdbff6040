use crate::foundation::error::{GaugeError, GaugeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> GaugeResult<Self> {
        if start.0 > end.0 {
            return Err(GaugeError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> GaugeResult<Self> {
        if den == 0 {
            return Err(GaugeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(GaugeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Smallest whole frame count spanning at least `secs` seconds.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_range_contains_boundaries() {
        let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
        assert!(!r.contains(FrameIndex(1)));
        assert!(r.contains(FrameIndex(2)));
        assert!(r.contains(FrameIndex(4)));
        assert!(!r.contains(FrameIndex(5)));
    }

    #[test]
    fn frame_range_rejects_inverted_bounds() {
        assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    }

    #[test]
    fn fps_ceil_spans_requested_duration() {
        let fps = Fps::new(30, 1).unwrap();
        assert_eq!(fps.secs_to_frames_ceil(8.0), 240);

        // NTSC-style fractional fps still covers the full 8 seconds.
        let fps = Fps::new(30000, 1001).unwrap();
        let frames = fps.secs_to_frames_ceil(8.0);
        assert!(fps.frames_to_secs(frames) >= 8.0);
        assert!(fps.frames_to_secs(frames - 1) < 8.0);
    }

    #[test]
    fn premul_conversion_rounds_to_nearest() {
        let c = Rgba8Premul::from_straight_rgba(255, 0, 0, 128);
        assert_eq!((c.r, c.g, c.b, c.a), (128, 0, 0, 128));

        let opaque = Rgba8Premul::from_straight_rgba(10, 20, 30, 255);
        assert_eq!((opaque.r, opaque.g, opaque.b, opaque.a), (10, 20, 30, 255));
    }
}
