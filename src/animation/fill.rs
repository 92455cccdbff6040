use crate::{animation::ease::Ease, foundation::core::Fps};

/// Wall-clock length of the fill animation, measured from activation.
pub const FILL_DURATION_SECS: f64 = 8.0;

/// Phase of the one-shot fill animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillPhase {
    /// Not yet activated; displayed fraction is 0.
    Idle,
    /// Rising toward the target fraction.
    Filling,
    /// Resting exactly on the target fraction. Terminal.
    Settled,
}

/// One-shot fill progression from 0 toward a target fraction.
///
/// Activation is a latch: the first [`FillAnimation::activate`] wins and
/// later calls are no-ops, so toggling the hosting signal cannot restart the
/// rise. The fraction is a pure function of the frame counter, monotonically
/// non-decreasing, and snaps exactly onto the target once the duration has
/// elapsed.
#[derive(Clone, Copy, Debug)]
pub struct FillAnimation {
    target: f64,
    duration_frames: u64,
    ease: Ease,
    activated_at: Option<u64>,
}

impl FillAnimation {
    /// Unactivated animation toward `target_fraction` (clamped to `[0, 1]`;
    /// non-finite input degrades to 0 rather than poisoning the gauge).
    pub fn new(target_fraction: f64, fps: Fps, ease: Ease) -> Self {
        let target = if target_fraction.is_finite() {
            target_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            target,
            duration_frames: fps.secs_to_frames_ceil(FILL_DURATION_SECS).max(1),
            ease,
            activated_at: None,
        }
    }

    /// Animation pre-activated on a timeline frame, for declarative panels.
    pub fn scheduled(
        target_fraction: f64,
        fps: Fps,
        ease: Ease,
        activate_at: Option<u64>,
    ) -> Self {
        let mut anim = Self::new(target_fraction, fps, ease);
        anim.activated_at = activate_at;
        anim
    }

    pub fn target_fraction(&self) -> f64 {
        self.target
    }

    /// Latch activation at `frame`. Idempotent once activated.
    pub fn activate(&mut self, frame: u64) {
        if self.activated_at.is_none() {
            self.activated_at = Some(frame);
        }
    }

    pub fn phase(&self, frame: u64) -> FillPhase {
        match self.activated_at {
            None => FillPhase::Idle,
            Some(start) if frame < start => FillPhase::Idle,
            Some(start) => {
                if frame - start >= self.duration_frames {
                    FillPhase::Settled
                } else {
                    FillPhase::Filling
                }
            }
        }
    }

    /// Displayed fill fraction at `frame`.
    pub fn fraction_at(&self, frame: u64) -> f64 {
        let Some(start) = self.activated_at else {
            return 0.0;
        };
        if frame < start {
            return 0.0;
        }

        let elapsed = frame - start;
        if elapsed >= self.duration_frames {
            // Snap: no floating-point residue once settled.
            return self.target;
        }
        let p = (elapsed as f64) / (self.duration_frames as f64);
        self.target * self.ease.apply(p)
    }
}
