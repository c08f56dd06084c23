use std::time::{Duration, Instant};

use eframe::egui::{Key, Modifiers, Pos2, Vec2};

/// Minimum horizontal travel for a swipe, in points.
pub const SWIPE_MIN_DISTANCE: f32 = 50.0;
/// Gestures slower than this are drags, not swipes.
pub const SWIPE_MAX_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Previous,
    Next,
    First,
    Last,
    ToggleFullscreen,
    ShowHelp,
    CloseHelp,
    Quit,
}

impl Command {
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Command::Previous | Command::Next | Command::First | Command::Last
        )
    }
}

/// Keyboard bindings, checked in order. Every entry is consumed when it fires so
/// nothing else in the frame reacts to the same key.
pub const KEY_BINDINGS: &[(Modifiers, Key, Command)] = &[
    (Modifiers::NONE, Key::ArrowLeft, Command::Previous),
    (Modifiers::NONE, Key::ArrowRight, Command::Next),
    (Modifiers::NONE, Key::Home, Command::First),
    (Modifiers::NONE, Key::End, Command::Last),
    (Modifiers::NONE, Key::Space, Command::Next),
    (Modifiers::COMMAND, Key::F, Command::ToggleFullscreen),
    (Modifiers::NONE, Key::Questionmark, Command::ShowHelp),
    (Modifiers::SHIFT, Key::Slash, Command::ShowHelp),
    (Modifiers::NONE, Key::Escape, Command::CloseHelp),
    (Modifiers::NONE, Key::Q, Command::Quit),
];

/// Look up the command bound to `key` under `modifiers`.
pub fn command_for(key: Key, modifiers: Modifiers) -> Option<Command> {
    KEY_BINDINGS
        .iter()
        .find(|(pattern, bound, _)| *bound == key && modifiers.matches_logically(*pattern))
        .map(|(_, _, command)| *command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved right: go back.
    Previous,
    /// Finger moved left: go forward.
    Next,
}

impl Swipe {
    pub fn command(self) -> Command {
        match self {
            Swipe::Previous => Command::Previous,
            Swipe::Next => Command::Next,
        }
    }
}

/// Classify a finished gesture. Only quick, mostly horizontal strokes count.
pub fn classify_swipe(delta: Vec2, elapsed: Duration) -> Option<Swipe> {
    let horizontal = delta.x.abs();
    if horizontal > delta.y.abs() && horizontal > SWIPE_MIN_DISTANCE && elapsed < SWIPE_MAX_DURATION
    {
        if delta.x > 0.0 {
            Some(Swipe::Previous)
        } else {
            Some(Swipe::Next)
        }
    } else {
        None
    }
}

/// Tracks a primary pointer / touch press until it is released.
#[derive(Debug, Default)]
pub struct SwipeDetector {
    origin: Option<(Pos2, Instant)>,
}

impl SwipeDetector {
    pub fn begin(&mut self, pos: Pos2, at: Instant) {
        self.origin = Some((pos, at));
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    /// Finish the gesture started with [`SwipeDetector::begin`].
    pub fn finish(&mut self, pos: Pos2, at: Instant) -> Option<Swipe> {
        let (origin, started) = self.origin.take()?;
        classify_swipe(pos - origin, at.saturating_duration_since(started))
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_navigation_keys() {
        let none = Modifiers::NONE;
        assert_eq!(command_for(Key::ArrowLeft, none), Some(Command::Previous));
        assert_eq!(command_for(Key::ArrowRight, none), Some(Command::Next));
        assert_eq!(command_for(Key::Home, none), Some(Command::First));
        assert_eq!(command_for(Key::End, none), Some(Command::Last));
        assert_eq!(command_for(Key::Space, none), Some(Command::Next));
    }

    #[test]
    fn test_fullscreen_requires_command_modifier() {
        assert_eq!(command_for(Key::F, Modifiers::NONE), None);
        assert_eq!(
            command_for(Key::F, Modifiers::COMMAND),
            Some(Command::ToggleFullscreen)
        );
        assert_eq!(
            command_for(Key::F, Modifiers::CTRL | Modifiers::COMMAND),
            Some(Command::ToggleFullscreen)
        );
    }

    #[test]
    fn test_help_and_quit_keys() {
        assert_eq!(
            command_for(Key::Questionmark, Modifiers::NONE),
            Some(Command::ShowHelp)
        );
        assert_eq!(
            command_for(Key::Slash, Modifiers::SHIFT),
            Some(Command::ShowHelp)
        );
        assert_eq!(command_for(Key::Slash, Modifiers::NONE), None);
        assert_eq!(
            command_for(Key::Escape, Modifiers::NONE),
            Some(Command::CloseHelp)
        );
        assert_eq!(command_for(Key::Q, Modifiers::NONE), Some(Command::Quit));
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(command_for(Key::Z, Modifiers::NONE), None);
    }

    #[test]
    fn test_is_navigation() {
        assert!(Command::Next.is_navigation());
        assert!(Command::Last.is_navigation());
        assert!(!Command::ShowHelp.is_navigation());
        assert!(!Command::ToggleFullscreen.is_navigation());
    }

    #[test]
    fn test_swipe_left_goes_forward() {
        assert_eq!(classify_swipe(vec2(-80.0, 5.0), ms(300)), Some(Swipe::Next));
    }

    #[test]
    fn test_swipe_right_goes_back() {
        assert_eq!(
            classify_swipe(vec2(120.0, -30.0), ms(200)),
            Some(Swipe::Previous)
        );
    }

    #[test]
    fn test_short_swipe_ignored() {
        assert_eq!(classify_swipe(vec2(30.0, 0.0), ms(100)), None);
        assert_eq!(classify_swipe(vec2(-50.0, 0.0), ms(100)), None);
    }

    #[test]
    fn test_slow_swipe_ignored() {
        assert_eq!(classify_swipe(vec2(-200.0, 0.0), ms(500)), None);
        assert_eq!(classify_swipe(vec2(-200.0, 0.0), ms(499)), Some(Swipe::Next));
    }

    #[test]
    fn test_vertical_swipe_ignored() {
        assert_eq!(classify_swipe(vec2(-80.0, 120.0), ms(200)), None);
        assert_eq!(classify_swipe(vec2(80.0, 80.0), ms(200)), None);
    }

    #[test]
    fn test_detector_tracks_one_gesture() {
        let start = Instant::now();
        let mut swipe = SwipeDetector::default();
        assert_eq!(swipe.finish(pos2(0.0, 0.0), start), None);

        swipe.begin(pos2(400.0, 300.0), start);
        assert!(swipe.is_tracking());
        assert_eq!(
            swipe.finish(pos2(320.0, 305.0), start + ms(300)),
            Some(Swipe::Next)
        );
        assert!(!swipe.is_tracking());
        assert_eq!(swipe.finish(pos2(0.0, 0.0), start + ms(350)), None);
    }

    #[test]
    fn test_detector_cancel() {
        let start = Instant::now();
        let mut swipe = SwipeDetector::default();
        swipe.begin(pos2(400.0, 300.0), start);
        swipe.cancel();
        assert_eq!(swipe.finish(pos2(200.0, 300.0), start + ms(100)), None);
    }
}
