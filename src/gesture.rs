//! Gesture recognition from the raw pointer stream.
//!
//! Turns pointer enter/leave/press/release/move samples into discrete
//! gestures (click, double-click, long-press, circling, petting stroke,
//! fast flick, hover) plus drag start/move/end and a continuous
//! eye-direction bucket. Time is the caller's millisecond clock; timed
//! gestures (long-press, hover) surface through [`GestureClassifier::poll`].

use std::collections::VecDeque;
use std::f32::consts::PI;
use tracing::debug;

use crate::model::Position;

// ── Config ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// End-to-end speed (px/s) over the speed window that counts as a flick.
    pub flick_speed: f32,
    pub speed_window_ms: u64,
    /// The speed window must span more than this before speed is trusted.
    pub min_speed_span_ms: u64,
    pub petting_window_ms: u64,
    pub petting_min_points: usize,
    pub petting_min_path: f32,
    pub petting_max_path: f32,
    pub circle_window_ms: u64,
    pub circle_min_points: usize,
    /// Total signed angle (radians) a circling path must sweep.
    pub circle_min_sweep: f32,
    pub click_max_ms: u64,
    pub double_click_ms: u64,
    /// Movement (px) beyond which a press is no longer a click.
    pub jitter_px: f32,
    pub long_press_ms: u64,
    pub hover_ms: u64,
    /// Any faster movement cancels a pending hover.
    pub hover_cancel_speed: f32,
    pub reaction_ms: u64,
    pub flick_reaction_ms: u64,
    pub long_reaction_ms: u64,
    /// Eye dead-zone radius as a fraction of the pet width.
    pub eye_dead_zone: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            flick_speed: 800.0,
            speed_window_ms: 100,
            min_speed_span_ms: 10,
            petting_window_ms: 800,
            petting_min_points: 5,
            petting_min_path: 50.0,
            petting_max_path: 300.0,
            circle_window_ms: 1000,
            circle_min_points: 8,
            circle_min_sweep: 1.5 * PI,
            click_max_ms: 300,
            double_click_ms: 300,
            jitter_px: 2.0,
            long_press_ms: 600,
            hover_ms: 300,
            hover_cancel_speed: 50.0,
            reaction_ms: 600,
            flick_reaction_ms: 400,
            long_reaction_ms: 900,
            eye_dead_zone: 0.15,
        }
    }
}

impl GestureConfig {
    /// Per-segment speed limit for a stroke to count as petting.
    pub fn slow_speed(&self) -> f32 {
        self.flick_speed / 3.0
    }
}

// ── Signals ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSignal {
    Click,
    DoubleClick,
    LongPress { held_ms: u64 },
    Circle { clockwise: bool },
    PettingStroke { path_px: f32 },
    FastFlick { speed: f32 },
    HoverTilt,
}

impl GestureSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "double-click",
            Self::LongPress { .. } => "long-press",
            Self::Circle { .. } => "circling",
            Self::PettingStroke { .. } => "petting-stroke",
            Self::FastFlick { .. } => "fast-flick",
            Self::HoverTilt => "hover",
        }
    }

    /// Reaction animation and how long it stays active. Clicks have none.
    pub fn reaction(&self, cfg: &GestureConfig) -> Option<(&'static str, u64)> {
        match self {
            Self::Click => None,
            Self::DoubleClick => Some(("double-click-animation", cfg.reaction_ms)),
            Self::LongPress { .. } => Some(("long-press-animation", cfg.long_reaction_ms)),
            Self::Circle { clockwise: true } => {
                Some(("circle-clockwise-animation", cfg.long_reaction_ms))
            }
            Self::Circle { clockwise: false } => {
                Some(("circle-counterclockwise-animation", cfg.long_reaction_ms))
            }
            Self::PettingStroke { .. } => Some(("being-pet-animation", cfg.reaction_ms)),
            Self::FastFlick { .. } => Some(("look-around-fast", cfg.flick_reaction_ms)),
            Self::HoverTilt => Some(("tilt-head", cfg.reaction_ms)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recognized {
    Gesture(GestureSignal),
    DragStart { at: Position },
    DragMove { dx: f32, dy: f32 },
    DragEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Leave,
    Down,
    Up,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub t_ms: u64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32, t_ms: u64) -> Self {
        Self { kind, x, y, t_ms }
    }

    fn pos(&self) -> Position {
        Position { x: self.x, y: self.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeDirection {
    Center,
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl EyeDirection {
    /// Expression key of the matching look variant.
    pub fn expression(&self) -> Option<&'static str> {
        match self {
            Self::Center => None,
            Self::Left => Some("look_left"),
            Self::Right => Some("look_right"),
            Self::Up => Some("look_up"),
            Self::Down => Some("look_down"),
            Self::UpLeft => Some("look_up_left"),
            Self::UpRight => Some("look_up_right"),
            Self::DownLeft => Some("look_down_left"),
            Self::DownRight => Some("look_down_right"),
        }
    }
}

// ── State ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Sample {
    pos: Position,
    t_ms: u64,
}

fn dist(a: Position, b: Position) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

#[derive(Debug, Clone, Copy)]
struct Press {
    at: Position,
    t_ms: u64,
    long_fired: bool,
    /// Press already consumed as the second half of a double-click.
    consumed: bool,
}

#[derive(Debug, Clone, Copy)]
struct ActiveReaction {
    token: &'static str,
    until_ms: u64,
}

pub struct GestureClassifier {
    pub config: GestureConfig,
    center: Position,
    pet_width: f32,
    speed_window: VecDeque<Sample>,
    petting_window: VecDeque<Sample>,
    circle_window: VecDeque<Sample>,
    speed: f32,
    over_pet: bool,
    hover_since: Option<u64>,
    press: Option<Press>,
    drag_last: Option<Position>,
    last_click_ms: Option<u64>,
    last_pointer: Option<Position>,
    active: Option<ActiveReaction>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            center: Position::default(),
            pet_width: 0.0,
            speed_window: VecDeque::new(),
            petting_window: VecDeque::new(),
            circle_window: VecDeque::new(),
            speed: 0.0,
            over_pet: false,
            hover_since: None,
            press: None,
            drag_last: None,
            last_click_ms: None,
            last_pointer: None,
            active: None,
        }
    }

    /// Where the pet is drawn; circling and eye direction are measured
    /// around `center`.
    pub fn set_pet_frame(&mut self, center: Position, width: f32) {
        self.center = center;
        self.pet_width = width.max(0.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_last.is_some()
    }

    pub fn circle_window_len(&self) -> usize {
        self.circle_window.len()
    }

    pub fn petting_window_len(&self) -> usize {
        self.petting_window.len()
    }

    pub fn active_reaction(&self, now_ms: u64) -> Option<&'static str> {
        self.active
            .filter(|a| now_ms < a.until_ms)
            .map(|a| a.token)
    }

    fn clear_windows(&mut self) {
        self.speed_window.clear();
        self.petting_window.clear();
        self.circle_window.clear();
        self.speed = 0.0;
    }

    /// Activates `signal`'s reaction unless another one is still running.
    /// A flick always takes over.
    fn fire(&mut self, signal: GestureSignal, now_ms: u64, out: &mut Vec<Recognized>) {
        let flick = matches!(signal, GestureSignal::FastFlick { .. });
        if let Some((token, ms)) = signal.reaction(&self.config) {
            if !flick && self.active_reaction(now_ms).is_some() {
                return;
            }
            self.active = Some(ActiveReaction {
                token,
                until_ms: now_ms + ms,
            });
        }
        debug!(gesture = signal.as_str(), "gesture recognized");
        out.push(Recognized::Gesture(signal));
    }

    pub fn handle(&mut self, ev: PointerEvent) -> Vec<Recognized> {
        let mut out = Vec::new();
        let now = ev.t_ms;
        self.expire(now);
        self.last_pointer = Some(ev.pos());
        match ev.kind {
            PointerKind::Enter => {
                self.clear_windows();
                self.over_pet = true;
                self.hover_since = Some(now);
            }
            PointerKind::Leave => {
                self.clear_windows();
                self.over_pet = false;
                self.hover_since = None;
                if !self.is_dragging() {
                    self.press = None;
                }
            }
            PointerKind::Down => self.on_down(ev, &mut out),
            PointerKind::Up => self.on_up(ev, &mut out),
            PointerKind::Move => self.on_move(ev, &mut out),
        }
        out
    }

    fn on_down(&mut self, ev: PointerEvent, out: &mut Vec<Recognized>) {
        let now = ev.t_ms;
        self.hover_since = None;
        let double = self
            .last_click_ms
            .is_some_and(|t| now.saturating_sub(t) < self.config.double_click_ms);
        self.press = Some(Press {
            at: ev.pos(),
            t_ms: now,
            long_fired: false,
            consumed: double,
        });
        if double {
            self.last_click_ms = None;
            self.fire(GestureSignal::DoubleClick, now, out);
        }
    }

    fn on_up(&mut self, ev: PointerEvent, out: &mut Vec<Recognized>) {
        let now = ev.t_ms;
        if self.drag_last.take().is_some() {
            self.press = None;
            out.push(Recognized::DragEnd);
            return;
        }
        let Some(press) = self.press.take() else {
            return;
        };
        let quick = now.saturating_sub(press.t_ms) < self.config.click_max_ms;
        if quick && !press.long_fired && !press.consumed {
            self.last_click_ms = Some(now);
            self.fire(GestureSignal::Click, now, out);
        }
    }

    fn on_move(&mut self, ev: PointerEvent, out: &mut Vec<Recognized>) {
        let now = ev.t_ms;
        let pos = ev.pos();

        if let Some(last) = self.drag_last {
            self.drag_last = Some(pos);
            out.push(Recognized::DragMove {
                dx: pos.x - last.x,
                dy: pos.y - last.y,
            });
            return;
        }
        if let Some(press) = self.press {
            if dist(press.at, pos) > self.config.jitter_px {
                let at = press.at;
                self.press = None;
                self.hover_since = None;
                self.clear_windows();
                self.drag_last = Some(pos);
                debug!("drag started");
                out.push(Recognized::DragStart { at });
                out.push(Recognized::DragMove {
                    dx: pos.x - at.x,
                    dy: pos.y - at.y,
                });
                return;
            }
        }

        let sample = Sample { pos, t_ms: now };
        push_window(&mut self.speed_window, sample, self.config.speed_window_ms);
        self.speed = window_speed(&self.speed_window, self.config.min_speed_span_ms);

        if self.speed > self.config.flick_speed {
            self.hover_since = None;
            let speed = self.speed;
            self.clear_windows();
            self.fire(GestureSignal::FastFlick { speed }, now, out);
            return;
        }
        if self.speed > self.config.hover_cancel_speed {
            self.hover_since = None;
        }
        if self.active_reaction(now).is_some() {
            return;
        }

        if self.over_pet {
            push_window(&mut self.petting_window, sample, self.config.petting_window_ms);
            if let Some(path_px) = self.petting_stroke() {
                self.petting_window.clear();
                self.fire(GestureSignal::PettingStroke { path_px }, now, out);
                return;
            }
        }

        push_window(&mut self.circle_window, sample, self.config.circle_window_ms);
        if let Some(clockwise) = self.circling() {
            self.circle_window.clear();
            self.fire(GestureSignal::Circle { clockwise }, now, out);
        }
    }

    fn petting_stroke(&self) -> Option<f32> {
        let pts = &self.petting_window;
        if pts.len() < self.config.petting_min_points {
            return None;
        }
        let limit = self.config.slow_speed();
        let mut path = 0.0;
        for (a, b) in pts.iter().zip(pts.iter().skip(1)) {
            let d = dist(a.pos, b.pos);
            let dt = b.t_ms.saturating_sub(a.t_ms) as f32 / 1000.0;
            if dt > 0.0 && d / dt > limit {
                return None;
            }
            path += d;
        }
        (self.config.petting_min_path..=self.config.petting_max_path)
            .contains(&path)
            .then_some(path)
    }

    /// `Some(clockwise)` once the window sweeps far enough around the pet.
    fn circling(&self) -> Option<bool> {
        let pts = &self.circle_window;
        if pts.len() < self.config.circle_min_points {
            return None;
        }
        let angle = |p: &Sample| (p.pos.y - self.center.y).atan2(p.pos.x - self.center.x);
        let mut total = 0.0;
        for (a, b) in pts.iter().zip(pts.iter().skip(1)) {
            let mut delta = angle(b) - angle(a);
            if delta > PI {
                delta -= 2.0 * PI;
            } else if delta < -PI {
                delta += 2.0 * PI;
            }
            total += delta;
        }
        (total.abs() > self.config.circle_min_sweep).then_some(total < 0.0)
    }

    fn expire(&mut self, now_ms: u64) {
        if self.active.is_some_and(|a| now_ms >= a.until_ms) {
            self.active = None;
        }
    }

    /// Fires the time-based gestures whose deadlines have passed.
    pub fn poll(&mut self, now_ms: u64) -> Vec<Recognized> {
        let mut out = Vec::new();
        self.expire(now_ms);

        let long_due = self.press.filter(|p| {
            !p.long_fired
                && !p.consumed
                && now_ms.saturating_sub(p.t_ms) >= self.config.long_press_ms
        });
        if let Some(press) = long_due {
            if let Some(p) = self.press.as_mut() {
                p.long_fired = true;
            }
            let held_ms = now_ms.saturating_sub(press.t_ms);
            self.fire(GestureSignal::LongPress { held_ms }, now_ms, &mut out);
        }

        if let Some(since) = self.hover_since {
            if now_ms.saturating_sub(since) >= self.config.hover_ms {
                self.hover_since = None;
                let calm = self.speed < self.config.slow_speed();
                if self.over_pet && calm && !self.is_dragging() {
                    self.fire(GestureSignal::HoverTilt, now_ms, &mut out);
                }
            }
        }
        out
    }

    /// Eye bucket for the last known pointer position.
    pub fn eye_direction(&self, now_ms: u64, tracking: bool) -> EyeDirection {
        if !tracking || self.is_dragging() || self.active_reaction(now_ms).is_some() {
            return EyeDirection::Center;
        }
        let Some(p) = self.last_pointer else {
            return EyeDirection::Center;
        };
        eye_bucket(self.center, p, self.pet_width * self.config.eye_dead_zone)
    }
}

fn push_window(window: &mut VecDeque<Sample>, sample: Sample, span_ms: u64) {
    window.push_back(sample);
    while window
        .front()
        .is_some_and(|s| sample.t_ms.saturating_sub(s.t_ms) >= span_ms)
    {
        window.pop_front();
    }
}

fn window_speed(window: &VecDeque<Sample>, min_span_ms: u64) -> f32 {
    let (Some(first), Some(last)) = (window.front(), window.back()) else {
        return 0.0;
    };
    let span = last.t_ms.saturating_sub(first.t_ms);
    if span <= min_span_ms {
        return 0.0;
    }
    dist(first.pos, last.pos) / (span as f32 / 1000.0)
}

/// Screen coordinates: y grows downward.
pub fn eye_bucket(center: Position, pointer: Position, dead_zone: f32) -> EyeDirection {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    if (dx * dx + dy * dy).sqrt() <= dead_zone {
        return EyeDirection::Center;
    }
    let sector = (dy.atan2(dx) / (PI / 4.0)).round() as i32;
    match sector.rem_euclid(8) {
        0 => EyeDirection::Right,
        1 => EyeDirection::DownRight,
        2 => EyeDirection::Down,
        3 => EyeDirection::DownLeft,
        4 => EyeDirection::Left,
        5 => EyeDirection::UpLeft,
        6 => EyeDirection::Up,
        _ => EyeDirection::UpRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: PointerKind, x: f32, y: f32, t: u64) -> PointerEvent {
        PointerEvent::new(kind, x, y, t)
    }

    fn gestures(out: &[Recognized]) -> Vec<&'static str> {
        out.iter()
            .filter_map(|r| match r {
                Recognized::Gesture(g) => Some(g.as_str()),
                _ => None,
            })
            .collect()
    }

    fn classifier() -> GestureClassifier {
        let mut g = GestureClassifier::default();
        g.set_pet_frame(Position { x: 100.0, y: 100.0 }, 80.0);
        g
    }

    #[test]
    fn quick_press_is_a_click_then_double_click() {
        let mut g = classifier();
        assert!(g.handle(ev(PointerKind::Down, 100.0, 100.0, 0)).is_empty());
        let out = g.handle(ev(PointerKind::Up, 101.0, 100.0, 120));
        assert_eq!(gestures(&out), vec!["click"]);
        let out = g.handle(ev(PointerKind::Down, 100.0, 100.0, 300));
        assert_eq!(gestures(&out), vec!["double-click"]);
        let out = g.handle(ev(PointerKind::Up, 100.0, 100.0, 350));
        assert!(gestures(&out).is_empty());
        assert_eq!(g.active_reaction(400), Some("double-click-animation"));
        assert_eq!(g.active_reaction(900), None);
    }

    #[test]
    fn long_press_fires_once_and_blocks_click() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Down, 100.0, 100.0, 0));
        assert!(g.poll(599).is_empty());
        assert_eq!(gestures(&g.poll(600)), vec!["long-press"]);
        assert!(g.poll(700).is_empty());
        assert!(gestures(&g.handle(ev(PointerKind::Up, 100.0, 100.0, 800))).is_empty());
        assert_eq!(g.active_reaction(1400), Some("long-press-animation"));
        assert_eq!(g.active_reaction(1500), None);
    }

    #[test]
    fn moving_beyond_jitter_starts_a_drag() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Down, 100.0, 100.0, 0));
        let out = g.handle(ev(PointerKind::Move, 104.0, 100.0, 30));
        assert!(matches!(out[0], Recognized::DragStart { .. }));
        assert!(g.is_dragging());
        assert!(g.poll(1000).is_empty());
        assert_eq!(g.handle(ev(PointerKind::Up, 104.0, 100.0, 1100)), vec![Recognized::DragEnd]);
    }

    #[test]
    fn fast_flick_preempts_an_active_reaction() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Down, 100.0, 100.0, 0));
        g.poll(600);
        g.handle(ev(PointerKind::Up, 100.0, 100.0, 610));
        g.handle(ev(PointerKind::Move, 0.0, 0.0, 620));
        let out = g.handle(ev(PointerKind::Move, 100.0, 0.0, 680));
        assert_eq!(gestures(&out), vec!["fast-flick"]);
        assert_eq!(g.active_reaction(700), Some("look-around-fast"));
        assert_eq!(g.active_reaction(1080), None);
    }

    #[test]
    fn slow_stroke_over_pet_is_petting() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Enter, 60.0, 100.0, 0));
        let mut found = Vec::new();
        for i in 1..=6u64 {
            let out = g.handle(ev(PointerKind::Move, 60.0 + 15.0 * i as f32, 100.0, i * 100));
            found.extend(gestures(&out));
        }
        assert_eq!(found, vec!["petting-stroke"]);
        assert_eq!(g.petting_window_len(), 0);
    }

    #[test]
    fn held_double_click_is_not_a_long_press() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Down, 100.0, 100.0, 0));
        g.handle(ev(PointerKind::Up, 100.0, 100.0, 120));
        let out = g.handle(ev(PointerKind::Down, 100.0, 100.0, 300));
        assert_eq!(gestures(&out), vec!["double-click"]);
        assert!(g.poll(1000).is_empty());
        assert!(g.handle(ev(PointerKind::Up, 100.0, 100.0, 1100)).is_empty());
    }

    #[test]
    fn stroke_with_a_fast_segment_is_not_petting() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Enter, 60.0, 100.0, 0));
        let mut found = Vec::new();
        for (i, x) in [75.0, 90.0, 105.0, 145.0, 160.0, 175.0].into_iter().enumerate() {
            let out = g.handle(ev(PointerKind::Move, x, 100.0, (i as u64 + 1) * 100));
            found.extend(gestures(&out));
        }
        assert!(found.is_empty(), "{found:?}");
        assert_eq!(g.active_reaction(600), None);
    }

    #[test]
    fn short_stroke_is_not_petting() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Enter, 90.0, 100.0, 0));
        let mut found = Vec::new();
        for i in 1..=8u64 {
            let out = g.handle(ev(PointerKind::Move, 90.0 + 5.0 * i as f32, 100.0, i * 100));
            found.extend(gestures(&out));
        }
        assert!(found.is_empty(), "{found:?}");
        assert_eq!(g.petting_window_len(), 8);
    }

    #[test]
    fn hover_waits_out_an_active_reaction() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Down, 100.0, 100.0, 0));
        g.handle(ev(PointerKind::Up, 100.0, 100.0, 50));
        g.handle(ev(PointerKind::Down, 100.0, 100.0, 100));
        g.handle(ev(PointerKind::Up, 100.0, 100.0, 150));
        g.handle(ev(PointerKind::Enter, 100.0, 100.0, 200));
        assert!(g.poll(500).is_empty());
        assert_eq!(g.active_reaction(500), Some("double-click-animation"));
        assert!(g.poll(800).is_empty());
    }

    #[test]
    fn slow_gestures_do_not_preempt_a_reaction() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Down, 100.0, 100.0, 0));
        g.poll(600);
        g.handle(ev(PointerKind::Up, 100.0, 100.0, 610));
        g.handle(ev(PointerKind::Enter, 60.0, 100.0, 620));
        let mut found = Vec::new();
        for i in 1..=6u64 {
            let out = g.handle(ev(PointerKind::Move, 60.0 + 15.0 * i as f32, 100.0, 700 + i * 100));
            found.extend(gestures(&out));
        }
        assert!(found.is_empty(), "{found:?}");
        assert_eq!(g.petting_window_len(), 0);
        assert_eq!(g.active_reaction(1300), Some("long-press-animation"));
    }

    #[test]
    fn hover_needs_a_calm_pointer() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Enter, 100.0, 100.0, 0));
        assert_eq!(gestures(&g.poll(300)), vec!["hover"]);

        let mut g = classifier();
        g.handle(ev(PointerKind::Enter, 100.0, 100.0, 0));
        g.handle(ev(PointerKind::Move, 110.0, 100.0, 50));
        g.handle(ev(PointerKind::Move, 120.0, 100.0, 100));
        assert!(g.poll(400).is_empty());
    }

    #[test]
    fn eye_buckets_follow_screen_axes() {
        let c = Position { x: 0.0, y: 0.0 };
        let at = |x, y| eye_bucket(c, Position { x, y }, 12.0);
        assert_eq!(at(5.0, 5.0), EyeDirection::Center);
        assert_eq!(at(50.0, 0.0), EyeDirection::Right);
        assert_eq!(at(0.0, -50.0), EyeDirection::Up);
        assert_eq!(at(-50.0, 50.0), EyeDirection::DownLeft);
        assert_eq!(at(-50.0, -1.0), EyeDirection::Left);
    }

    #[test]
    fn eyes_center_while_reacting_or_untracked() {
        let mut g = classifier();
        g.handle(ev(PointerKind::Move, 200.0, 100.0, 0));
        assert_eq!(g.eye_direction(0, true), EyeDirection::Right);
        assert_eq!(g.eye_direction(0, false), EyeDirection::Center);
        g.handle(ev(PointerKind::Enter, 100.0, 100.0, 10));
        g.poll(400);
        assert_eq!(g.eye_direction(400, true), EyeDirection::Center);
    }
}
