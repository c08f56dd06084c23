use eframe::egui;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::chrome::Chrome;
use crate::config::Config;
use crate::deck::{Deck, DeckMeta, Slide};
use crate::effects::{
    CardPointer, ContentReveal, FloatingShapes, ParticleBurst, RevealState, STARTUP_REVEAL_DELAY,
};
use crate::input::{self, Command, SwipeDetector};
use crate::navigator::{Navigation, NavigatorOptions, SlideNavigator};
use crate::theme::Theme;
use crate::transition::{self, SlideFrame, TransitionKind};

const TOAST_DURATION: f32 = 1.5;
const TOAST_FADE_START: f32 = 1.0;
/// How long a fullscreen request may go unanswered before it counts as refused.
const FULLSCREEN_TIMEOUT: Duration = Duration::from_secs(1);
const PARTICLE_SPREAD: f32 = 140.0;
const PARTICLE_RADIUS: f32 = 5.0;

const SHORTCUTS: &[(&str, &str)] = &[
    ("\u{2192} / Space", "Next slide"),
    ("\u{2190}", "Previous slide"),
    ("Home", "First slide"),
    ("End", "Last slide"),
    ("Swipe", "Previous / next slide"),
    ("Ctrl+F", "Toggle fullscreen"),
    ("?", "Show this help"),
    ("Esc", "Close this help"),
    ("Q", "Quit"),
];

/// Flags from the command line. `None` means "not given", so the deck and the
/// config file get a say.
pub struct LaunchOptions {
    pub file: Option<PathBuf>,
    pub windowed: bool,
    pub start_slide: Option<usize>,
    pub animated: Option<bool>,
    pub transition: Option<TransitionKind>,
}

/// Effective settings after layering CLI flags over deck frontmatter over config.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    navigator: NavigatorOptions,
    start_slide: usize,
    theme: String,
}

fn resolve_settings(options: &LaunchOptions, meta: &DeckMeta, config: &Config) -> Settings {
    let kind = options
        .transition
        .or_else(|| frontmatter_transition(meta))
        .or_else(|| config.transition())
        .unwrap_or(TransitionKind::SlideHorizontal);
    let theme = frontmatter_theme(meta).unwrap_or_else(|| config.theme().to_string());
    Settings {
        navigator: NavigatorOptions {
            animated: options.animated.unwrap_or_else(|| config.animated()),
            kind,
            settle: config.settle(),
        },
        start_slide: options.start_slide.unwrap_or_else(|| config.start_slide()),
        theme,
    }
}

/// Unknown names are skipped so the config file still applies.
fn frontmatter_transition(meta: &DeckMeta) -> Option<TransitionKind> {
    let name = meta.transition.as_deref()?;
    if TransitionKind::all_names().contains(&name) {
        Some(TransitionKind::from_name(name))
    } else {
        tracing::warn!(transition = name, "unknown transition in deck frontmatter, ignoring");
        None
    }
}

fn frontmatter_theme(meta: &DeckMeta) -> Option<String> {
    let name = meta.theme.as_deref()?;
    if Theme::all_names().contains(&name) {
        Some(name.to_string())
    } else {
        tracing::warn!(theme = name, "unknown theme in deck frontmatter, ignoring");
        None
    }
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < TOAST_FADE_START {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - TOAST_FADE_START) / (TOAST_DURATION - TOAST_FADE_START)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

/// How one slide is drawn this frame: transition opacity plus the reveal clock.
#[derive(Clone, Copy)]
struct Placement {
    opacity: f32,
    scale: f32,
    reveal: Option<ContentReveal>,
    now: Instant,
}

impl Placement {
    fn title(&self) -> RevealState {
        self.reveal
            .map_or(RevealState::SHOWN, |r| r.title(self.now))
    }

    fn card(&self, index: usize) -> RevealState {
        self.reveal
            .map_or(RevealState::SHOWN, |r| r.card(index, self.now))
    }
}

struct PresentationApp {
    deck: Deck,
    navigator: SlideNavigator,
    chrome: Chrome,
    theme: Theme,
    swipe: SwipeDetector,
    burst: Option<ParticleBurst>,
    /// Absent when animation is off.
    shapes: Option<FloatingShapes>,
    reveal: Option<ContentReveal>,
    rng: StdRng,
    show_help: bool,
    toast: Option<Toast>,
    /// Hover position and primary button state, captured each frame.
    pointer: Option<(egui::Pos2, bool)>,
    /// Last fullscreen state reported by the window.
    fullscreen: Option<bool>,
    fullscreen_request: Option<(bool, Instant)>,
    last_frame: Instant,
}

impl PresentationApp {
    fn new(deck: Deck, navigator: SlideNavigator, theme: Theme) -> Self {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        let shapes = navigator
            .is_animated()
            .then(|| FloatingShapes::new(&mut rng));
        let chrome = Chrome::new(&navigator.current_info());
        let reveal = navigator.is_animated().then(|| {
            ContentReveal::new(navigator.position(), Instant::now() + STARTUP_REVEAL_DELAY)
        });
        Self {
            deck,
            navigator,
            chrome,
            theme,
            swipe: SwipeDetector::default(),
            burst: None,
            shapes,
            reveal,
            rng,
            show_help: false,
            toast: None,
            pointer: None,
            fullscreen: None,
            fullscreen_request: None,
            last_frame: Instant::now(),
        }
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        (rect.width() / 1280.0).min(rect.height() / 720.0).max(0.5)
    }

    /// Keyboard commands for this frame. Bound keys are removed from the event
    /// list whether or not the navigator accepts them.
    fn collect_commands(ctx: &egui::Context) -> Vec<Command> {
        ctx.input_mut(|i| {
            let mut commands = Vec::new();
            i.events.retain(|event| {
                let command = match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => input::command_for(*key, *modifiers),
                    // Layouts without a dedicated `?` key still deliver the text
                    egui::Event::Text(text) if text == "?" => Some(Command::ShowHelp),
                    _ => None,
                };
                match command {
                    Some(command) => {
                        commands.push(command);
                        false
                    }
                    None => true,
                }
            });
            commands
        })
    }

    fn apply(&mut self, ctx: &egui::Context, command: Command, now: Instant) {
        if command.is_navigation() {
            self.navigate(command, now);
            return;
        }
        match command {
            Command::ToggleFullscreen => {
                let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                self.fullscreen_request = Some((!fullscreen, now));
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
            }
            Command::ShowHelp => self.show_help = true,
            Command::CloseHelp => self.show_help = false,
            Command::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            _ => {}
        }
    }

    fn navigate(&mut self, command: Command, now: Instant) {
        let navigation = match command {
            Command::Previous => self.navigator.previous_at(now),
            Command::Next => self.navigator.next_at(now),
            Command::First => self.navigator.go_to_at(1, now),
            Command::Last => self.navigator.go_to_at(self.navigator.total(), now),
            _ => return,
        };
        let Navigation::Started(pending) = navigation else {
            return;
        };
        // Re-selecting the current slide keeps it in place
        if pending.from == pending.to {
            return;
        }
        self.reveal = None;
        if self.navigator.is_animated() {
            self.burst = Some(ParticleBurst::new(&mut self.rng, now));
        }
    }

    fn handle_swipe(&mut self, ctx: &egui::Context, now: Instant) {
        let (pressed, released, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };
        if pressed {
            self.swipe.begin(pos, now);
        }
        if released && self.swipe.is_tracking() {
            if self.navigator.is_transitioning() {
                self.swipe.cancel();
                return;
            }
            if let Some(swipe) = self.swipe.finish(pos, now) {
                tracing::debug!(?swipe, "swipe detected");
                self.navigate(swipe.command(), now);
            }
        }
    }

    fn sync_viewport(&mut self, ctx: &egui::Context, now: Instant) {
        let (fullscreen, focused) =
            ctx.input(|i| (i.viewport().fullscreen, i.viewport().focused));

        if let Some(fullscreen) = fullscreen {
            if self.fullscreen.is_some_and(|was| was != fullscreen) {
                tracing::info!(fullscreen, "fullscreen changed");
                self.toast = Some(Toast::new(if fullscreen {
                    "Fullscreen (Ctrl+F to exit)"
                } else {
                    "Exited fullscreen"
                }));
            }
            self.fullscreen = Some(fullscreen);
        }

        if let Some((wanted, requested)) = self.fullscreen_request {
            if fullscreen == Some(wanted) {
                self.fullscreen_request = None;
            } else if now.saturating_duration_since(requested) >= FULLSCREEN_TIMEOUT {
                tracing::warn!(wanted, "window did not change fullscreen state");
                self.toast = Some(Toast::new("Fullscreen is not available"));
                self.fullscreen_request = None;
            }
        }

        if let Some(shapes) = &mut self.shapes {
            let paused = focused == Some(false);
            if shapes.set_paused(paused) {
                tracing::info!(paused, "background animation");
            }
        }
    }

    fn advance_effects(&mut self, now: Instant, dt: Duration) {
        if let Some(shapes) = &mut self.shapes {
            shapes.advance(dt, &mut self.rng);
        }
        if self.burst.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.burst = None;
        }
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    fn is_animating(&self, now: Instant) -> bool {
        let reveal_running = self.reveal.is_some_and(|r| {
            let cards = self
                .deck
                .get(r.position())
                .map_or(0, |slide| slide.cards.len());
            !r.is_finished(cards, now)
        });
        self.burst.is_some()
            || reveal_running
            || self.toast.is_some()
            || self.shapes.as_ref().is_some_and(|s| !s.is_paused())
    }

    /// One frame of input, state and drawing. Split from `update` so it can run
    /// against a bare `egui::Context`.
    fn frame(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        for command in Self::collect_commands(ctx) {
            self.apply(ctx, command, now);
        }
        self.handle_swipe(ctx, now);

        if let Some(info) = self.navigator.tick(now, &mut self.chrome) {
            tracing::debug!(counter = %self.chrome.counter(), "chrome updated");
            if self.navigator.is_animated() {
                self.reveal = Some(ContentReveal::new(info.position, now));
            }
        }

        self.sync_viewport(ctx, now);
        self.advance_effects(now, dt);
        self.pointer =
            ctx.input(|i| i.pointer.hover_pos().map(|pos| (pos, i.pointer.primary_down())));

        let clicked = self.draw_navigation_bar(ctx);
        self.draw_stage(ctx, now);
        if self.show_help {
            self.draw_help(ctx);
        }
        if let Some(command) = clicked {
            self.navigate(command, now);
        }

        if self.is_animating(now) {
            ctx.request_repaint();
        } else if let Some(t) = self.navigator.transition() {
            ctx.request_repaint_after(t.deadline().saturating_duration_since(now));
        } else if let Some((_, requested)) = self.fullscreen_request {
            ctx.request_repaint_after(
                (requested + FULLSCREEN_TIMEOUT).saturating_duration_since(now),
            );
        }
    }

    fn draw_navigation_bar(&self, ctx: &egui::Context) -> Option<Command> {
        let mut clicked = None;
        egui::TopBottomPanel::bottom("navigation")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(self.theme.background)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                let button_size = egui::vec2(120.0, 36.0);
                ui.horizontal(|ui| {
                    let previous = egui::Button::new("\u{2190} Previous").min_size(button_size);
                    if ui
                        .add_enabled(self.chrome.previous_enabled(), previous)
                        .clicked()
                    {
                        clicked = Some(Command::Previous);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let next = egui::Button::new("Next \u{2192}").min_size(button_size);
                        if ui.add_enabled(self.chrome.next_enabled(), next).clicked() {
                            clicked = Some(Command::Next);
                        }
                        ui.centered_and_justified(|ui| {
                            ui.label(self.counter_text());
                        });
                    });
                });
            });
        clicked
    }

    fn counter_text(&self) -> egui::text::LayoutJob {
        let font_id = egui::FontId::monospace(18.0);
        let mut job = egui::text::LayoutJob::default();
        job.append(
            &self.chrome.current_label(),
            0.0,
            egui::TextFormat {
                font_id: font_id.clone(),
                color: self.theme.accent,
                ..Default::default()
            },
        );
        job.append(
            &format!(" / {}", self.chrome.total_label()),
            0.0,
            egui::TextFormat {
                font_id,
                color: Theme::with_opacity(self.theme.foreground, 0.6),
                ..Default::default()
            },
        );
        job
    }

    fn draw_stage(&self, ctx: &egui::Context, now: Instant) {
        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, bg);
                let scale = Self::compute_scale(rect);

                self.draw_shapes(&painter, rect, scale);
                self.draw_slides(&painter, rect, scale, now);
                self.draw_particles(&painter, rect, scale, now);
                self.draw_footer(&painter, rect, scale);
                self.draw_toast(&painter, rect, scale);

                if self.show_help {
                    painter.rect_filled(
                        rect,
                        0.0,
                        Theme::with_opacity(egui::Color32::BLACK, 0.35),
                    );
                }
            });
    }

    /// Slides to draw this frame, back to front.
    fn slide_layers(&self, now: Instant) -> Vec<(usize, SlideFrame)> {
        match self.navigator.transition() {
            Some(t) if t.from != t.to => {
                let (outgoing, incoming) =
                    transition::frames(t.kind, t.direction, t.progress_at(now));
                vec![(t.from, outgoing), (t.to, incoming)]
            }
            Some(t) => vec![(t.to, SlideFrame::RESTING)],
            None => vec![(self.navigator.position(), SlideFrame::RESTING)],
        }
    }

    fn draw_slides(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32, now: Instant) {
        for (position, frame) in self.slide_layers(now) {
            self.draw_slide(painter, position, rect, frame, scale, now);
        }
    }

    fn card_pointer(&self, slot: egui::Rect) -> CardPointer {
        if self.navigator.is_transitioning() || self.show_help {
            return CardPointer::Idle;
        }
        match self.pointer {
            Some((pos, down)) => CardPointer::new(slot.contains(pos), down),
            None => CardPointer::Idle,
        }
    }

    fn draw_slide(
        &self,
        painter: &egui::Painter,
        position: usize,
        rect: egui::Rect,
        frame: SlideFrame,
        scale: f32,
        now: Instant,
    ) {
        let Some(slide) = self.deck.get(position) else {
            return;
        };
        if frame.opacity <= 0.0 {
            return;
        }
        let rect = rect.translate(egui::vec2(frame.offset * rect.width(), 0.0));
        let placement = Placement {
            opacity: frame.opacity,
            scale,
            reveal: self
                .reveal
                .filter(|r| r.position() == position && !self.navigator.is_transitioning()),
            now,
        };
        let content = rect.shrink2(egui::vec2(96.0 * scale, 72.0 * scale));
        let y = self.draw_heading(painter, slide, content, placement);
        if !slide.cards.is_empty() {
            let area = egui::Rect::from_min_max(egui::pos2(content.left(), y), content.max);
            self.draw_cards(painter, &slide.cards, area, placement);
        }
    }

    /// Title, subtitle and paragraphs. Returns the y where cards start.
    fn draw_heading(
        &self,
        painter: &egui::Painter,
        slide: &Slide,
        content: egui::Rect,
        placement: Placement,
    ) -> f32 {
        let scale = placement.scale;
        let width = content.width();
        let title_state = placement.title();
        let mut y = content.top();

        if let Some(title) = &slide.title {
            let color = Theme::with_opacity(
                self.theme.heading_color,
                placement.opacity * title_state.opacity,
            );
            let galley = painter.layout(
                title.clone(),
                egui::FontId::proportional(self.theme.title_size * scale),
                color,
                width,
            );
            let height = galley.size().y;
            painter.galley(
                egui::pos2(content.left(), y + title_state.offset_y * scale),
                galley,
                color,
            );
            y += height + 20.0 * scale;
        }

        if let Some(subtitle) = &slide.subtitle {
            let color = Theme::with_opacity(
                self.theme.foreground,
                0.75 * placement.opacity * title_state.opacity,
            );
            let galley = painter.layout(
                subtitle.clone(),
                egui::FontId::proportional(self.theme.subtitle_size * scale),
                color,
                width,
            );
            let height = galley.size().y;
            painter.galley(
                egui::pos2(content.left(), y + title_state.offset_y * scale),
                galley,
                color,
            );
            y += height + 24.0 * scale;
        }

        let body_color = Theme::with_opacity(self.theme.foreground, placement.opacity);
        for paragraph in &slide.paragraphs {
            let galley = painter.layout(
                paragraph.clone(),
                egui::FontId::proportional(self.theme.body_size * scale),
                body_color,
                width,
            );
            let height = galley.size().y;
            painter.galley(egui::pos2(content.left(), y), galley, body_color);
            y += height + 16.0 * scale;
        }

        y + 16.0 * scale
    }

    fn draw_cards(
        &self,
        painter: &egui::Painter,
        cards: &[String],
        area: egui::Rect,
        placement: Placement,
    ) {
        let scale = placement.scale;
        let columns = match cards.len() {
            1 => 1,
            2 | 4 => 2,
            _ => 3,
        };
        let gap = 24.0 * scale;
        let padding = 20.0 * scale;
        let bar = 4.0 * scale;
        let card_width = (area.width() - gap * (columns - 1) as f32) / columns as f32;
        let text_width = card_width - padding * 2.0 - bar;
        let font_id = egui::FontId::proportional(self.theme.card_size * scale);

        let states: Vec<RevealState> = (0..cards.len()).map(|i| placement.card(i)).collect();
        let galleys: Vec<_> = cards
            .iter()
            .zip(&states)
            .map(|(text, state)| {
                let color = Theme::with_opacity(
                    self.theme.foreground,
                    placement.opacity * state.opacity,
                );
                painter.layout(text.clone(), font_id.clone(), color, text_width)
            })
            .collect();

        let mut y = area.top();
        for row_start in (0..cards.len()).step_by(columns) {
            let row_end = (row_start + columns).min(cards.len());
            let row_height = galleys[row_start..row_end]
                .iter()
                .map(|g| g.size().y)
                .fold(0.0, f32::max)
                + padding * 2.0;

            for (i, galley) in galleys.iter().enumerate().take(row_end).skip(row_start) {
                let state = states[i];
                let alpha = placement.opacity * state.opacity;
                if alpha <= 0.0 {
                    continue;
                }
                let column = (i - row_start) as f32;
                let slot = egui::Rect::from_min_size(
                    egui::pos2(area.left() + column * (card_width + gap), y),
                    egui::vec2(card_width, row_height),
                );
                let lift = self.card_pointer(slot).lift();
                let card = egui::Rect::from_center_size(
                    slot.center() + egui::vec2(0.0, (state.offset_y + lift.offset_y) * scale),
                    slot.size() * state.scale * lift.scale,
                );
                let radius = 12.0 * scale;
                painter.rect_filled(
                    card.translate(egui::vec2(0.0, 6.0 * scale)).expand(2.0 * scale),
                    radius,
                    Theme::with_opacity(egui::Color32::BLACK, lift.shadow * alpha),
                );
                painter.rect_filled(
                    card,
                    radius,
                    Theme::with_opacity(self.theme.card_background, alpha),
                );
                painter.rect_stroke(
                    card,
                    radius,
                    egui::Stroke::new(1.0, Theme::with_opacity(self.theme.foreground, 0.12 * alpha)),
                    egui::StrokeKind::Inside,
                );
                painter.rect_filled(
                    egui::Rect::from_min_size(card.min, egui::vec2(bar, card.height())),
                    2.0 * scale,
                    Theme::with_opacity(self.theme.accent, alpha),
                );
                let text_pos = card.min + egui::vec2(bar + padding, padding);
                painter.galley(text_pos, galley.clone(), self.theme.foreground);
            }
            y += row_height + gap;
        }
    }

    fn draw_shapes(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32) {
        let Some(shapes) = &self.shapes else {
            return;
        };
        for (i, shape) in shapes.shapes().iter().enumerate() {
            let center = rect.min + shape.anchor * rect.size() + shapes.offset(i) * scale;
            painter.circle_filled(center, shape.radius * scale, shape.color_with_opacity());
        }
    }

    fn draw_particles(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32, now: Instant) {
        let Some(burst) = &self.burst else {
            return;
        };
        let origin = rect.center();
        for (i, particle) in burst.particles().iter().enumerate() {
            let Some(state) = burst.particle_state(i, now) else {
                continue;
            };
            let angle = particle.heading + state.rotation * 0.25;
            let direction = egui::vec2(angle.cos(), angle.sin());
            let center = origin + direction * state.travel * PARTICLE_SPREAD * scale;
            painter.circle_filled(
                center,
                PARTICLE_RADIUS * state.scale * scale,
                Theme::with_opacity(particle.color, state.opacity),
            );
        }
    }

    fn draw_footer(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32) {
        let Some(footer) = &self.deck.meta().footer else {
            return;
        };
        let color = Theme::with_opacity(self.theme.foreground, 0.4);
        let galley = painter.layout_no_wrap(
            footer.clone(),
            egui::FontId::proportional(14.0 * scale),
            color,
        );
        let pos = egui::pos2(
            rect.center().x - galley.rect.width() / 2.0,
            rect.bottom() - 30.0 * scale,
        );
        painter.galley(pos, galley, color);
    }

    fn draw_toast(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32) {
        let Some(toast) = &self.toast else {
            return;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let bg = Theme::with_opacity(self.theme.card_background, opacity * 0.9);
        let galley = painter.layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.top() + 40.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        painter.rect_filled(toast_rect, 8.0 * scale, bg);
        painter.galley(
            egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding),
            galley,
            color,
        );
    }

    fn draw_help(&mut self, ctx: &egui::Context) {
        let mut close = false;
        let theme = &self.theme;
        egui::Area::new(egui::Id::new("help_overlay"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(theme.overlay_background)
                    .stroke(egui::Stroke::new(2.0, theme.accent))
                    .corner_radius(16.0)
                    .inner_margin(32.0)
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new("Keyboard Shortcuts")
                                .size(24.0)
                                .strong()
                                .color(theme.heading_color),
                        );
                        ui.add_space(16.0);
                        egui::Grid::new("help_shortcuts")
                            .num_columns(2)
                            .spacing([32.0, 10.0])
                            .show(ui, |ui| {
                                for (keys, action) in SHORTCUTS {
                                    ui.label(
                                        egui::RichText::new(*keys)
                                            .monospace()
                                            .size(16.0)
                                            .color(theme.accent),
                                    );
                                    ui.label(
                                        egui::RichText::new(*action)
                                            .size(16.0)
                                            .color(theme.foreground),
                                    );
                                    ui.end_row();
                                }
                            });
                        ui.add_space(20.0);
                        ui.vertical_centered(|ui| {
                            if ui
                                .add(egui::Button::new("Got it").min_size(egui::vec2(120.0, 32.0)))
                                .clicked()
                            {
                                close = true;
                            }
                        });
                    });
            });
        if close {
            self.show_help = false;
        }
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame(ctx);
    }
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let deck = match &options.file {
        Some(path) => Deck::load(path)?,
        None => Deck::sample()?,
    };
    let config = Config::load_or_default()?;
    let settings = resolve_settings(&options, deck.meta(), &config);

    if settings.start_slide == 0 || settings.start_slide > deck.slide_count() {
        tracing::warn!(
            requested = settings.start_slide,
            slides = deck.slide_count(),
            "start slide out of range, clamping"
        );
    }
    let navigator =
        SlideNavigator::starting_at(deck.slide_count(), settings.start_slide, settings.navigator)
            .ok_or_else(|| anyhow::anyhow!("Deck has no slides"))?;
    let theme = Theme::from_name(&settings.theme);

    tracing::info!(
        slides = deck.slide_count(),
        start = navigator.position(),
        animated = settings.navigator.animated,
        transition = settings.navigator.kind.name(),
        theme = %theme.name,
        "starting presentation"
    );

    let title = deck.meta().title.clone().unwrap_or_else(|| match &options.file {
        Some(path) => format!(
            "slidectl - {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "slidectl".to_string(),
    });

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if theme.name == "dark" {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(PresentationApp::new(deck, navigator, theme)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_at(start: usize, options: NavigatorOptions) -> PresentationApp {
        let deck = Deck::sample().unwrap();
        let navigator = SlideNavigator::starting_at(deck.slide_count(), start, options).unwrap();
        PresentationApp::new(deck, navigator, Theme::light())
    }

    fn app_with(options: NavigatorOptions) -> PresentationApp {
        app_at(1, options)
    }

    fn app() -> PresentationApp {
        app_with(NavigatorOptions::default())
    }

    fn key(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    fn pointer(x: f32, y: f32, pressed: bool) -> Vec<egui::Event> {
        let pos = egui::pos2(x, y);
        vec![
            egui::Event::PointerMoved(pos),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::NONE,
            },
        ]
    }

    fn run_frame(
        ctx: &egui::Context,
        app: &mut PresentationApp,
        events: Vec<egui::Event>,
    ) -> egui::FullOutput {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            events,
            ..Default::default()
        };
        ctx.run(input, |ctx| app.frame(ctx))
    }

    fn viewport_commands(output: &egui::FullOutput) -> Vec<egui::ViewportCommand> {
        output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map(|v| v.commands.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_arrow_key_starts_transition_and_settles() {
        let ctx = egui::Context::default();
        let mut app = app_with(NavigatorOptions {
            settle: Duration::from_millis(1),
            ..NavigatorOptions::default()
        });

        run_frame(&ctx, &mut app, vec![key(egui::Key::ArrowRight, egui::Modifiers::NONE)]);
        assert!(app.navigator.is_transitioning());
        assert!(app.burst.is_some(), "animated transitions start a particle burst");
        assert_eq!(app.chrome.counter(), "1 / 13", "chrome waits for the settle");

        std::thread::sleep(Duration::from_millis(10));
        run_frame(&ctx, &mut app, vec![]);
        assert_eq!(app.navigator.position(), 2);
        assert_eq!(app.chrome.counter(), "2 / 13");
        assert!(app.chrome.previous_enabled());
        assert_eq!(app.reveal.map(|r| r.position()), Some(2));
    }

    #[test]
    fn test_keys_during_transition_are_dropped() {
        let ctx = egui::Context::default();
        let mut app = app();

        run_frame(&ctx, &mut app, vec![key(egui::Key::ArrowRight, egui::Modifiers::NONE)]);
        run_frame(&ctx, &mut app, vec![key(egui::Key::End, egui::Modifiers::NONE)]);
        run_frame(&ctx, &mut app, vec![key(egui::Key::Space, egui::Modifiers::NONE)]);

        app.navigator.settle(&mut app.chrome);
        assert_eq!(app.navigator.position(), 2);
        assert!(!app.navigator.is_transitioning());
    }

    #[test]
    fn test_home_and_end() {
        let ctx = egui::Context::default();
        let mut app = app();

        run_frame(&ctx, &mut app, vec![key(egui::Key::End, egui::Modifiers::NONE)]);
        app.navigator.settle(&mut app.chrome);
        assert_eq!(app.chrome.counter(), "13 / 13");
        assert!(!app.chrome.next_enabled());

        run_frame(&ctx, &mut app, vec![key(egui::Key::Home, egui::Modifiers::NONE)]);
        app.navigator.settle(&mut app.chrome);
        assert_eq!(app.navigator.position(), 1);
    }

    #[test]
    fn test_help_overlay_toggles() {
        let ctx = egui::Context::default();
        let mut app = app();

        run_frame(&ctx, &mut app, vec![egui::Event::Text("?".to_string())]);
        assert!(app.show_help);
        assert!(!app.navigator.is_transitioning(), "help does not navigate");

        run_frame(&ctx, &mut app, vec![key(egui::Key::Escape, egui::Modifiers::NONE)]);
        assert!(!app.show_help);
    }

    #[test]
    fn test_ctrl_f_requests_fullscreen() {
        let ctx = egui::Context::default();
        let mut app = app();

        let output = run_frame(
            &ctx,
            &mut app,
            vec![key(
                egui::Key::F,
                egui::Modifiers::CTRL | egui::Modifiers::COMMAND,
            )],
        );
        assert!(
            viewport_commands(&output).contains(&egui::ViewportCommand::Fullscreen(true)),
            "expected a fullscreen request"
        );
        assert!(app.fullscreen_request.is_some());
    }

    #[test]
    fn test_plain_f_does_nothing() {
        let ctx = egui::Context::default();
        let mut app = app();

        let output = run_frame(&ctx, &mut app, vec![key(egui::Key::F, egui::Modifiers::NONE)]);
        assert!(viewport_commands(&output).is_empty());
        assert!(app.fullscreen_request.is_none());
    }

    #[test]
    fn test_q_closes_window() {
        let ctx = egui::Context::default();
        let mut app = app();

        let output = run_frame(&ctx, &mut app, vec![key(egui::Key::Q, egui::Modifiers::NONE)]);
        assert!(viewport_commands(&output).contains(&egui::ViewportCommand::Close));
    }

    #[test]
    fn test_swipe_left_goes_next() {
        let ctx = egui::Context::default();
        let mut app = app_at(3, NavigatorOptions::default());

        run_frame(&ctx, &mut app, pointer(600.0, 300.0, true));
        run_frame(&ctx, &mut app, pointer(520.0, 305.0, false));
        assert!(app.navigator.is_transitioning(), "an 80pt swipe navigates");

        app.navigator.settle(&mut app.chrome);
        assert_eq!(app.navigator.position(), 4);
        assert_eq!(app.chrome.counter(), "4 / 13");
    }

    #[test]
    fn test_swipe_right_goes_previous() {
        let ctx = egui::Context::default();
        let mut app = app_at(3, NavigatorOptions::default());

        run_frame(&ctx, &mut app, pointer(400.0, 300.0, true));
        run_frame(&ctx, &mut app, pointer(500.0, 290.0, false));

        app.navigator.settle(&mut app.chrome);
        assert_eq!(app.navigator.position(), 2);
    }

    #[test]
    fn test_short_swipe_is_ignored() {
        let ctx = egui::Context::default();
        let mut app = app();

        run_frame(&ctx, &mut app, pointer(600.0, 300.0, true));
        run_frame(&ctx, &mut app, pointer(570.0, 300.0, false));
        assert!(!app.navigator.is_transitioning());
        assert_eq!(app.navigator.position(), 1);
    }

    #[test]
    fn test_no_animation_skips_effects() {
        let ctx = egui::Context::default();
        let mut app = app_with(NavigatorOptions {
            animated: false,
            ..NavigatorOptions::default()
        });
        assert!(app.shapes.is_none());

        run_frame(&ctx, &mut app, vec![key(egui::Key::ArrowRight, egui::Modifiers::NONE)]);
        assert!(app.burst.is_none());
        assert_eq!(app.navigator.position(), 2, "instant navigation settles in the same frame");
        assert!(app.reveal.is_none());
    }

    #[test]
    fn test_settings_precedence() {
        let launch = LaunchOptions {
            file: None,
            windowed: true,
            start_slide: None,
            animated: None,
            transition: None,
        };
        let meta = DeckMeta {
            transition: Some("fade".to_string()),
            theme: Some("dark".to_string()),
            ..DeckMeta::default()
        };
        let mut config = Config::default();
        config.set("defaults.transition", "none").unwrap();
        config.set("defaults.theme", "light").unwrap();
        config.set("defaults.start_slide", "3").unwrap();

        let settings = resolve_settings(&launch, &meta, &config);
        assert_eq!(settings.navigator.kind, TransitionKind::Fade, "deck beats config");
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.start_slide, 3);
        assert!(settings.navigator.animated);

        let launch = LaunchOptions {
            start_slide: Some(7),
            animated: Some(false),
            transition: Some(TransitionKind::SlideHorizontal),
            ..launch
        };
        let settings = resolve_settings(&launch, &meta, &config);
        assert_eq!(settings.navigator.kind, TransitionKind::SlideHorizontal, "flags beat deck");
        assert_eq!(settings.start_slide, 7);
        assert!(!settings.navigator.animated);
    }

    #[test]
    fn test_unknown_frontmatter_names_fall_back_to_config() {
        let launch = LaunchOptions {
            file: None,
            windowed: true,
            start_slide: None,
            animated: None,
            transition: None,
        };
        let meta = DeckMeta {
            transition: Some("spin".to_string()),
            theme: Some("purple".to_string()),
            ..DeckMeta::default()
        };
        let mut config = Config::default();
        config.set("defaults.transition", "fade").unwrap();
        config.set("defaults.theme", "dark").unwrap();

        let settings = resolve_settings(&launch, &meta, &config);
        assert_eq!(settings.navigator.kind, TransitionKind::Fade);
        assert_eq!(settings.theme, "dark");
    }

    #[test]
    fn test_first_slide_reveals_after_startup() {
        let app = app();
        let reveal = app.reveal.expect("animated start reveals slide 1");
        assert_eq!(reveal.position(), 1);
        assert_eq!(reveal.title(Instant::now()).opacity, 0.0, "hidden until the delay");

        let still = app_with(NavigatorOptions {
            animated: false,
            ..NavigatorOptions::default()
        });
        assert!(still.reveal.is_none());
    }

    #[test]
    fn test_reselecting_current_slide_stays_put() {
        let ctx = egui::Context::default();
        let mut app = app();

        run_frame(&ctx, &mut app, vec![key(egui::Key::Home, egui::Modifiers::NONE)]);
        assert!(app.navigator.is_transitioning());
        assert!(app.burst.is_none(), "no burst without a slide change");
        assert_eq!(
            app.slide_layers(Instant::now()),
            vec![(1, SlideFrame::RESTING)]
        );
    }

    #[test]
    fn test_transition_draws_both_slides() {
        let ctx = egui::Context::default();
        let mut app = app();

        run_frame(&ctx, &mut app, vec![key(egui::Key::ArrowRight, egui::Modifiers::NONE)]);
        let layers = app.slide_layers(Instant::now());
        let positions: Vec<usize> = layers.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn test_card_pointer_follows_hover_and_press() {
        let mut app = app();
        let slot = egui::Rect::from_min_size(egui::pos2(100.0, 100.0), egui::vec2(200.0, 80.0));

        assert_eq!(app.card_pointer(slot), CardPointer::Idle);
        app.pointer = Some((egui::pos2(150.0, 120.0), false));
        assert_eq!(app.card_pointer(slot), CardPointer::Hovered);
        app.pointer = Some((egui::pos2(150.0, 120.0), true));
        assert_eq!(app.card_pointer(slot), CardPointer::Pressed);
        app.pointer = Some((egui::pos2(20.0, 20.0), true));
        assert_eq!(app.card_pointer(slot), CardPointer::Idle);

        app.pointer = Some((egui::pos2(150.0, 120.0), false));
        assert!(app.navigator.next().is_started());
        assert_eq!(
            app.card_pointer(slot),
            CardPointer::Idle,
            "cards do not react mid-transition"
        );
    }

    #[test]
    fn test_toast_fades_out() {
        let mut toast = Toast::new("hello");
        assert_eq!(toast.opacity(), 1.0);
        toast.start = Instant::now() - Duration::from_secs(5);
        assert_eq!(toast.opacity(), 0.0);
        assert!(toast.is_expired());
    }
}
