use std::time::{Duration, Instant};

/// Default time a transition takes before it settles.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(600);

/// Control points of the `cubic-bezier(0.25, 0.8, 0.25, 1)` curve used for slide motion.
const EASE_X1: f32 = 0.25;
const EASE_Y1: f32 = 0.8;
const EASE_X2: f32 = 0.25;
const EASE_Y2: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    SlideHorizontal,
    Fade,
    None,
}

impl TransitionKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "fade" => Self::Fade,
            "none" => Self::None,
            _ => Self::SlideHorizontal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SlideHorizontal => "slide",
            Self::Fade => "fade",
            Self::None => "none",
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["slide", "fade", "none"]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Forward,
    Backward,
}

impl TransitionDirection {
    /// Forward when travelling to a later slide; anything else (including the
    /// current slide) counts as backward.
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// A transition in flight between two 1-based slide positions.
#[derive(Debug, Clone)]
pub struct ActiveTransition {
    pub from: usize,
    pub to: usize,
    pub kind: TransitionKind,
    pub direction: TransitionDirection,
    start: Instant,
    duration: Duration,
}

impl ActiveTransition {
    pub fn started_at(
        from: usize,
        to: usize,
        kind: TransitionKind,
        duration: Duration,
        start: Instant,
    ) -> Self {
        Self {
            from,
            to,
            kind,
            direction: TransitionDirection::between(from, to),
            start,
            duration,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.start + self.duration
    }

    /// Linear progress in `[0, 1]`.
    pub fn raw_progress_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress_at(&self, now: Instant) -> f32 {
        ease(self.raw_progress_at(now))
    }

    pub fn is_settled_at(&self, now: Instant) -> bool {
        now >= self.deadline()
    }
}

/// How one slide is placed while a transition runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideFrame {
    /// Horizontal offset as a fraction of the viewport width.
    pub offset: f32,
    pub opacity: f32,
}

impl SlideFrame {
    pub const RESTING: SlideFrame = SlideFrame {
        offset: 0.0,
        opacity: 1.0,
    };
    const HIDDEN: SlideFrame = SlideFrame {
        offset: 0.0,
        opacity: 0.0,
    };
}

/// Frames for the outgoing and incoming slide at eased `progress`.
///
/// Forward travel pushes the outgoing slide to the left while the incoming one
/// arrives from the right; backward travel mirrors that. The outgoing slide fades
/// as it leaves.
pub fn frames(
    kind: TransitionKind,
    direction: TransitionDirection,
    progress: f32,
) -> (SlideFrame, SlideFrame) {
    let p = progress.clamp(0.0, 1.0);
    match kind {
        TransitionKind::SlideHorizontal => {
            let sign = match direction {
                TransitionDirection::Forward => -1.0,
                TransitionDirection::Backward => 1.0,
            };
            let outgoing = SlideFrame {
                offset: sign * p,
                opacity: 1.0 - p,
            };
            let incoming = SlideFrame {
                offset: -sign * (1.0 - p),
                opacity: 1.0,
            };
            (outgoing, incoming)
        }
        TransitionKind::Fade => (
            SlideFrame {
                offset: 0.0,
                opacity: 1.0 - p,
            },
            SlideFrame {
                offset: 0.0,
                opacity: p,
            },
        ),
        TransitionKind::None => (SlideFrame::HIDDEN, SlideFrame::RESTING),
    }
}

/// `cubic-bezier(0.25, 0.8, 0.25, 1)` evaluated at linear time `t`.
pub fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let s = solve_curve_x(t);
    bezier(s, EASE_Y1, EASE_Y2)
}

/// Ease-out used for content reveal.
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate is `x`.
fn solve_curve_x(x: f32) -> f32 {
    // Newton first, bisection when the slope flattens out
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, EASE_X1, EASE_X2) - x;
        if err.abs() < 1e-5 {
            return s;
        }
        let slope = bezier_slope(s, EASE_X1, EASE_X2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, EASE_X1, EASE_X2);
        if (value - x).abs() < 1e-5 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        assert_eq!(ease(-3.0), 0.0);
        assert_eq!(ease(7.0), 1.0);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=100 {
            let value = ease(i as f32 / 100.0);
            assert!(value >= last, "ease dipped at step {i}: {value} < {last}");
            last = value;
        }
    }

    #[test]
    fn test_ease_front_loads_motion() {
        // The curve moves quickly early and settles gently
        assert!(ease(0.25) > 0.5, "got {}", ease(0.25));
        assert!(ease(0.5) > 0.8, "got {}", ease(0.5));
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(
            TransitionDirection::between(2, 5),
            TransitionDirection::Forward
        );
        assert_eq!(
            TransitionDirection::between(5, 2),
            TransitionDirection::Backward
        );
        assert_eq!(
            TransitionDirection::between(3, 3),
            TransitionDirection::Backward
        );
    }

    #[test]
    fn test_forward_slide_frames() {
        let kind = TransitionKind::SlideHorizontal;
        let (out, inc) = frames(kind, TransitionDirection::Forward, 0.0);
        assert_eq!(out.offset, 0.0);
        assert_eq!(inc.offset, 1.0);

        let (out, inc) = frames(kind, TransitionDirection::Forward, 1.0);
        assert_eq!(out.offset, -1.0);
        assert_eq!(out.opacity, 0.0);
        assert_eq!(inc.offset, 0.0);
        assert_eq!(inc.opacity, 1.0);
    }

    #[test]
    fn test_backward_slide_frames_are_mirrored() {
        let kind = TransitionKind::SlideHorizontal;
        let (fwd_out, fwd_in) = frames(kind, TransitionDirection::Forward, 0.4);
        let (back_out, back_in) = frames(kind, TransitionDirection::Backward, 0.4);
        assert_eq!(fwd_out.offset, -back_out.offset);
        assert_eq!(fwd_in.offset, -back_in.offset);
        assert_eq!(fwd_out.opacity, back_out.opacity);
    }

    #[test]
    fn test_fade_frames_cross_over() {
        let (out, inc) = frames(TransitionKind::Fade, TransitionDirection::Forward, 0.25);
        assert_eq!(out.offset, 0.0);
        assert_eq!(inc.offset, 0.0);
        assert!((out.opacity + inc.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settle_deadline() {
        let start = Instant::now();
        let t = ActiveTransition::started_at(
            1,
            2,
            TransitionKind::SlideHorizontal,
            DEFAULT_SETTLE,
            start,
        );
        assert!(!t.is_settled_at(start + Duration::from_millis(599)));
        assert!(t.is_settled_at(start + DEFAULT_SETTLE));
        assert!((t.raw_progress_at(start + Duration::from_millis(300)) - 0.5).abs() < 1e-4);
        assert_eq!(t.raw_progress_at(start + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_zero_duration_is_settled_immediately() {
        let start = Instant::now();
        let t = ActiveTransition::started_at(4, 1, TransitionKind::None, Duration::ZERO, start);
        assert!(t.is_settled_at(start));
        assert_eq!(t.raw_progress_at(start), 1.0);
        assert_eq!(t.direction, TransitionDirection::Backward);
    }

    #[test]
    fn test_kind_names() {
        for name in TransitionKind::all_names() {
            assert_eq!(TransitionKind::from_name(name).name(), *name);
        }
        assert_eq!(
            TransitionKind::from_name("bogus"),
            TransitionKind::SlideHorizontal
        );
    }
}
