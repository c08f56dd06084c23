//! Decorative animation: particle bursts, floating background shapes and the
//! staggered reveal of slide content. None of this affects navigation.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use eframe::egui::{Color32, Vec2, vec2};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::transition::ease_out;

pub const PARTICLE_COLORS: [Color32; 6] = [
    Color32::from_rgb(0x21, 0x80, 0x8D),
    Color32::from_rgb(0xFF, 0x6B, 0x35),
    Color32::from_rgb(0xFF, 0x8E, 0x53),
    Color32::from_rgb(0x4C, 0xAF, 0x50),
    Color32::from_rgb(0x9C, 0x27, 0xB0),
    Color32::from_rgb(0x21, 0x96, 0xF3),
];

const PARTICLE_COUNT: usize = 8;
const PARTICLE_STAGGER: f32 = 0.1;
const PARTICLE_LIFETIME: f32 = 0.8;
const PARTICLE_MAX_SCALE: f32 = 3.0;
const BURST_LIFETIME: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub color: Color32,
    /// Seconds after the burst starts before this particle appears.
    pub delay: f32,
    /// Direction of travel, radians.
    pub heading: f32,
}

/// What a particle looks like at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub scale: f32,
    pub opacity: f32,
    /// Distance travelled from the burst origin, as a fraction of the spread.
    pub travel: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleBurst {
    start: Instant,
    particles: Vec<Particle>,
}

impl ParticleBurst {
    pub fn new(rng: &mut impl Rng, start: Instant) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|i| Particle {
                color: *PARTICLE_COLORS.choose(rng).unwrap_or(&PARTICLE_COLORS[0]),
                delay: i as f32 * PARTICLE_STAGGER,
                heading: i as f32 / PARTICLE_COUNT as f32 * TAU + rng.random_range(-0.3..0.3),
            })
            .collect();
        Self { start, particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.elapsed(now) >= BURST_LIFETIME + self.last_delay()
    }

    /// `None` while the particle is waiting for its delay or after it has faded.
    pub fn particle_state(&self, index: usize, now: Instant) -> Option<ParticleState> {
        let particle = self.particles.get(index)?;
        let local = self.elapsed(now) - particle.delay;
        if local < 0.0 || local >= PARTICLE_LIFETIME {
            return None;
        }
        let t = ease_out(local / PARTICLE_LIFETIME);
        Some(ParticleState {
            scale: 1.0 + (PARTICLE_MAX_SCALE - 1.0) * t,
            opacity: 1.0 - t,
            travel: t,
            rotation: std::f32::consts::PI * t,
        })
    }

    fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }

    fn last_delay(&self) -> f32 {
        self.particles.last().map(|p| p.delay).unwrap_or(0.0)
    }
}

const SHAPE_COUNT: usize = 5;
const SHAPE_OPACITY: f32 = 0.15;
const SHAPE_FLOAT_AMPLITUDE: f32 = 20.0;
const SHAPE_DRIFT_RANGE: f32 = 25.0;
const SHAPE_DRIFT_EASE: f32 = 1.5;

#[derive(Debug, Clone)]
pub struct FloatingShape {
    /// Resting position as a fraction of the viewport.
    pub anchor: Vec2,
    pub radius: f32,
    pub color: Color32,
    /// Length of one float cycle, seconds.
    pub period: f32,
    /// Seconds between drift retargets.
    pub drift_interval: f32,
    delay: f32,
    drift_from: Vec2,
    drift_to: Vec2,
    drift_changed: f32,
}

impl FloatingShape {
    pub fn color_with_opacity(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(
            self.color.r(),
            self.color.g(),
            self.color.b(),
            (SHAPE_OPACITY * 255.0) as u8,
        )
    }
}

/// Slowly floating background circles. They run on their own clock which stops
/// while paused, so an unfocused window does not jump on return.
#[derive(Debug, Clone)]
pub struct FloatingShapes {
    shapes: Vec<FloatingShape>,
    clock: f32,
    paused: bool,
}

impl FloatingShapes {
    pub fn new(rng: &mut impl Rng) -> Self {
        let shapes = (0..SHAPE_COUNT)
            .map(|i| FloatingShape {
                anchor: vec2(rng.random_range(0.1..0.9), rng.random_range(0.1..0.9)),
                radius: rng.random_range(60.0..160.0),
                color: PARTICLE_COLORS[i % PARTICLE_COLORS.len()],
                period: 20.0 + i as f32 * 3.0,
                drift_interval: 4.0 + i as f32,
                delay: i as f32 * 0.5,
                drift_from: Vec2::ZERO,
                drift_to: Vec2::ZERO,
                drift_changed: 0.0,
            })
            .collect();
        Self {
            shapes,
            clock: 0.0,
            paused: false,
        }
    }

    pub fn shapes(&self) -> &[FloatingShape] {
        &self.shapes
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns true when the paused state actually changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let changed = self.paused != paused;
        self.paused = paused;
        changed
    }

    pub fn advance(&mut self, dt: Duration, rng: &mut impl Rng) {
        if self.paused {
            return;
        }
        let previous = self.clock;
        self.clock += dt.as_secs_f32();
        for shape in &mut self.shapes {
            let ticks_before = (previous / shape.drift_interval).floor();
            let ticks_after = (self.clock / shape.drift_interval).floor();
            if ticks_after > ticks_before {
                shape.drift_from = Self::drift_at(shape, self.clock);
                shape.drift_to = vec2(
                    rng.random_range(-SHAPE_DRIFT_RANGE..SHAPE_DRIFT_RANGE),
                    rng.random_range(-SHAPE_DRIFT_RANGE..SHAPE_DRIFT_RANGE),
                );
                shape.drift_changed = self.clock;
            }
        }
    }

    /// Offset from the shape's anchor, in points.
    pub fn offset(&self, index: usize) -> Vec2 {
        let Some(shape) = self.shapes.get(index) else {
            return Vec2::ZERO;
        };
        let t = (self.clock - shape.delay).max(0.0);
        let phase = t / shape.period * TAU;
        let float = vec2(phase.sin(), (phase * 2.0).sin() * 0.5) * SHAPE_FLOAT_AMPLITUDE;
        float + Self::drift_at(shape, self.clock)
    }

    fn drift_at(shape: &FloatingShape, clock: f32) -> Vec2 {
        let t = ((clock - shape.drift_changed) / SHAPE_DRIFT_EASE).clamp(0.0, 1.0);
        shape.drift_from + (shape.drift_to - shape.drift_from) * ease_out(t)
    }
}

const TITLE_DELAY: f32 = 0.2;
const TITLE_DURATION: f32 = 0.6;
const TITLE_RISE: f32 = -20.0;
const CARD_DELAY: f32 = 0.3;
const CARD_STAGGER: f32 = 0.1;
const CARD_DURATION: f32 = 0.5;
const CARD_RISE: f32 = 30.0;
const CARD_START_SCALE: f32 = 0.9;

/// Opacity, vertical offset and scale of one animated element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealState {
    pub opacity: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl RevealState {
    pub const SHOWN: RevealState = RevealState {
        opacity: 1.0,
        offset_y: 0.0,
        scale: 1.0,
    };
}

/// Staggered entrance of a slide's title and cards after it settles.
#[derive(Debug, Clone, Copy)]
pub struct ContentReveal {
    position: usize,
    start: Instant,
}

impl ContentReveal {
    pub fn new(position: usize, start: Instant) -> Self {
        Self { position, start }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn title(&self, now: Instant) -> RevealState {
        let t = self.local(now, TITLE_DELAY, TITLE_DURATION);
        RevealState {
            opacity: t,
            offset_y: TITLE_RISE * (1.0 - t),
            scale: 1.0,
        }
    }

    pub fn card(&self, index: usize, now: Instant) -> RevealState {
        let delay = CARD_DELAY + index as f32 * CARD_STAGGER;
        let t = self.local(now, delay, CARD_DURATION);
        RevealState {
            opacity: t,
            offset_y: CARD_RISE * (1.0 - t),
            scale: CARD_START_SCALE + (1.0 - CARD_START_SCALE) * t,
        }
    }

    /// True once every element with index below `cards` has finished.
    pub fn is_finished(&self, cards: usize, now: Instant) -> bool {
        let last_card = CARD_DELAY + cards.saturating_sub(1) as f32 * CARD_STAGGER + CARD_DURATION;
        self.elapsed(now) >= last_card.max(TITLE_DELAY + TITLE_DURATION)
    }

    fn local(&self, now: Instant, delay: f32, duration: f32) -> f32 {
        ease_out(((self.elapsed(now) - delay) / duration).clamp(0.0, 1.0))
    }

    fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }
}

/// Delay before the first slide's content reveals after startup.
pub const STARTUP_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Pointer interaction with one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPointer {
    Idle,
    Hovered,
    Pressed,
}

/// Extra offset, scale and shadow strength applied to a card under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLift {
    pub offset_y: f32,
    pub scale: f32,
    pub shadow: f32,
}

impl CardPointer {
    pub fn new(hovered: bool, pressed: bool) -> Self {
        match (hovered, pressed) {
            (false, _) => Self::Idle,
            (true, false) => Self::Hovered,
            (true, true) => Self::Pressed,
        }
    }

    pub fn lift(self) -> CardLift {
        match self {
            Self::Idle => CardLift {
                offset_y: 0.0,
                scale: 1.0,
                shadow: 0.06,
            },
            Self::Hovered => CardLift {
                offset_y: -8.0,
                scale: 1.02,
                shadow: 0.15,
            },
            Self::Pressed => CardLift {
                offset_y: -4.0,
                scale: 0.98,
                shadow: 0.10,
            },
        }
    }
}
