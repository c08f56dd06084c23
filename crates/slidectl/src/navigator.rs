//! Slide navigation state machine.
//!
//! [`SlideNavigator`] is the only thing allowed to change which slide is shown.
//! Positions are 1-based. At most one transition is in flight; requests that
//! arrive while one is running, or that point outside the deck, are dropped
//! without raising an error.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::transition::{ActiveTransition, DEFAULT_SETTLE, TransitionDirection, TransitionKind};

/// Snapshot returned by [`SlideNavigator::current_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideInfo {
    pub position: usize,
    pub total: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub transitioning: bool,
}

/// Receives a notification every time a transition settles.
pub trait NavigationObserver {
    fn slide_changed(&mut self, info: &SlideInfo);
}

impl NavigationObserver for () {
    fn slide_changed(&mut self, _info: &SlideInfo) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    OutOfRange,
    InTransition,
}

/// The transition a navigation request started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub from: usize,
    pub to: usize,
    pub direction: TransitionDirection,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "ignored navigation is silent; inspect the outcome or discard it explicitly"]
pub enum Navigation {
    Started(PendingTransition),
    Ignored(IgnoreReason),
}

impl Navigation {
    pub fn is_started(&self) -> bool {
        matches!(self, Navigation::Started(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorOptions {
    /// Animated mode runs `kind` over `settle`; otherwise slides swap on the next tick.
    pub animated: bool,
    pub kind: TransitionKind,
    pub settle: Duration,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            animated: true,
            kind: TransitionKind::SlideHorizontal,
            settle: DEFAULT_SETTLE,
        }
    }
}

#[derive(Debug)]
pub struct SlideNavigator {
    total: usize,
    position: usize,
    transition: Option<ActiveTransition>,
    options: NavigatorOptions,
}

impl SlideNavigator {
    /// A navigator over `total` slides, starting on slide 1.
    ///
    /// Returns `None` for an empty deck.
    pub fn new(total: usize, options: NavigatorOptions) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self {
            total,
            position: 1,
            transition: None,
            options,
        })
    }

    /// Same as [`SlideNavigator::new`] but starting on `position`, clamped into the deck.
    pub fn starting_at(total: usize, position: usize, options: NavigatorOptions) -> Option<Self> {
        let mut nav = Self::new(total, options)?;
        nav.position = position.clamp(1, total);
        Some(nav)
    }

    pub fn options(&self) -> NavigatorOptions {
        self.options
    }

    pub fn is_animated(&self) -> bool {
        self.options.animated
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&ActiveTransition> {
        self.transition.as_ref()
    }

    pub fn current_info(&self) -> SlideInfo {
        SlideInfo {
            position: self.position,
            total: self.total,
            is_first: self.position == 1,
            is_last: self.position == self.total,
            transitioning: self.is_transitioning(),
        }
    }

    pub fn go_to(&mut self, target: usize) -> Navigation {
        self.go_to_at(target, Instant::now())
    }

    /// Start a transition to `target`, timed from `now`.
    pub fn go_to_at(&mut self, target: usize, now: Instant) -> Navigation {
        if target == 0 || target > self.total {
            tracing::debug!(
                slide = target,
                total = self.total,
                "navigation ignored: out of range"
            );
            return Navigation::Ignored(IgnoreReason::OutOfRange);
        }
        if self.transition.is_some() {
            tracing::debug!(slide = target, "navigation ignored: transition in flight");
            return Navigation::Ignored(IgnoreReason::InTransition);
        }

        let (kind, settle) = if self.options.animated {
            (self.options.kind, self.options.settle)
        } else {
            (TransitionKind::None, Duration::ZERO)
        };
        let transition = ActiveTransition::started_at(self.position, target, kind, settle, now);
        let pending = PendingTransition {
            from: transition.from,
            to: transition.to,
            direction: transition.direction,
        };
        tracing::debug!(
            from = pending.from,
            to = pending.to,
            direction = ?pending.direction,
            "transition started"
        );
        self.transition = Some(transition);
        Navigation::Started(pending)
    }

    pub fn next(&mut self) -> Navigation {
        self.next_at(Instant::now())
    }

    pub fn next_at(&mut self, now: Instant) -> Navigation {
        if self.transition.is_some() {
            return Navigation::Ignored(IgnoreReason::InTransition);
        }
        if self.position >= self.total {
            return Navigation::Ignored(IgnoreReason::OutOfRange);
        }
        self.go_to_at(self.position + 1, now)
    }

    pub fn previous(&mut self) -> Navigation {
        self.previous_at(Instant::now())
    }

    pub fn previous_at(&mut self, now: Instant) -> Navigation {
        if self.transition.is_some() {
            return Navigation::Ignored(IgnoreReason::InTransition);
        }
        if self.position <= 1 {
            return Navigation::Ignored(IgnoreReason::OutOfRange);
        }
        self.go_to_at(self.position - 1, now)
    }

    pub fn first(&mut self) -> Navigation {
        self.go_to(1)
    }

    pub fn last(&mut self) -> Navigation {
        self.go_to(self.total)
    }

    /// Commit the in-flight transition if its settle deadline has passed.
    pub fn tick(
        &mut self,
        now: Instant,
        observer: &mut impl NavigationObserver,
    ) -> Option<SlideInfo> {
        let settled = self
            .transition
            .as_ref()
            .is_some_and(|t| t.is_settled_at(now));
        if settled {
            self.settle(observer)
        } else {
            None
        }
    }

    /// Commit the in-flight transition right away and notify `observer`.
    ///
    /// Returns `None` when nothing was in flight.
    pub fn settle(&mut self, observer: &mut impl NavigationObserver) -> Option<SlideInfo> {
        let transition = self.transition.take()?;
        self.position = transition.to;
        let info = self.current_info();
        tracing::info!(
            position = info.position,
            total = info.total,
            "slide transition complete"
        );
        observer.slide_changed(&info);
        Some(info)
    }
}
