//! The single orchestrator: owns the pet's status, every component and
//! every timer. Hosts drive it with pointer events, commands and
//! [`PetEngine::advance`].

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::arbiter::AnimationArbiter;
use crate::catalog::Catalog;
use crate::config::{self, Settings};
use crate::gesture::{GestureClassifier, GestureConfig, GestureSignal, PointerEvent, Recognized};
use crate::model::{
    Bubble, BubbleKind, DayPhase, InteractionType, ItemKind, PetStatus, Position, Rules,
    SavedPet, SAVE_VERSION,
};
use crate::ports::{
    Frame, HostCommand, HostShell, Notification, NotificationKind, NotificationSink, PetStore,
    RenderSink,
};
use crate::progress::{self, Notice};
use crate::scheduler::{
    self, Glide, TimerKind, Timers, BLINK_MS, EXPRESSION_REFRESH_MS, GLIDE_MS, IDLE_DEFAULT_MS,
};
use crate::sim::{LevelUp, StatusSimulator};

const BUBBLE_MS: u64 = 3_000;
const EVENT_BUBBLE_MS: u64 = 5_000;
const EVENT_EXPRESSION_MS: u64 = 3_000;
const LEVEL_UP_MS: u64 = 1_500;

#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub catalog: Catalog,
    pub rules: Rules,
    pub gesture: GestureConfig,
    pub seed: u64,
    pub tick_interval_ms: u64,
    /// Overrides the pet type stored in the snapshot.
    pub pet_type: Option<String>,
    pub pet_size: (f32, f32),
    pub viewport: (f32, f32),
    pub eye_tracking: bool,
    pub fixed_hour: Option<u32>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            catalog: Catalog::standard(),
            rules: Rules::default(),
            gesture: GestureConfig::default(),
            seed: 0xC0FFEE,
            tick_interval_ms: scheduler::TICK_MS,
            pet_type: None,
            pet_size: (96.0, 96.0),
            viewport: (800.0, 600.0),
            eye_tracking: true,
            fixed_hour: None,
        }
    }
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings, catalog: Catalog) -> Self {
        Self {
            catalog,
            seed: settings.seed.unwrap_or_else(rand::random),
            tick_interval_ms: settings.tick_interval_ms(),
            pet_type: Some(settings.pet_type.clone()),
            pet_size: (settings.pet_width, settings.pet_height),
            eye_tracking: settings.eye_tracking,
            fixed_hour: settings.fixed_hour,
            ..Self::default()
        }
    }
}

pub struct PetEngine<S, N, H> {
    catalog: Catalog,
    status: PetStatus,
    pet_type: String,
    requested_pet_type: Option<String>,
    position: Position,
    pet_size: (f32, f32),
    viewport: (f32, f32),
    sim: StatusSimulator,
    rng: StdRng,
    gestures: GestureClassifier,
    arbiter: AnimationArbiter,
    timers: Timers,
    glide: Option<Glide>,
    tick_interval_ms: u64,
    last_tick_ms: u64,
    fixed_hour: Option<u32>,
    tracking: bool,
    menu_open: bool,
    running: bool,
    store: S,
    notifier: N,
    shell: H,
}

impl<S: PetStore, N: NotificationSink, H: HostShell> PetEngine<S, N, H> {
    pub fn new(options: EngineOptions, store: S, notifier: N, shell: H) -> Self {
        let landed_ms = options.catalog.duration_ms("landed", 400);
        Self {
            status: PetStatus::default(),
            pet_type: "default".to_string(),
            requested_pet_type: options.pet_type,
            position: Position { x: 20.0, y: 20.0 },
            pet_size: options.pet_size,
            viewport: options.viewport,
            sim: StatusSimulator::new(options.rules, options.seed),
            rng: StdRng::seed_from_u64(options.seed.rotate_left(17) ^ 0x5eed),
            gestures: GestureClassifier::new(options.gesture),
            arbiter: AnimationArbiter::new(landed_ms),
            timers: Timers::default(),
            glide: None,
            tick_interval_ms: options.tick_interval_ms.max(1),
            last_tick_ms: 0,
            fixed_hour: options.fixed_hour,
            tracking: options.eye_tracking,
            menu_open: false,
            running: false,
            catalog: options.catalog,
            store,
            notifier,
            shell,
        }
    }

    // ── Lifecycle ──────────────────────────────────────────

    /// Loads the snapshot (or defaults) and arms every timer.
    pub fn start(&mut self, now_ms: u64) {
        if self.running {
            return;
        }
        let saved = match self.store.load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!("could not load pet, starting fresh: {e:#}");
                None
            }
        };
        let mut stored_type = None;
        if let Some(saved) = saved {
            if saved.version > SAVE_VERSION {
                warn!(version = saved.version, "snapshot is newer than this build");
            }
            self.status = saved.status;
            self.status.clamp_all();
            self.status.inventory.sanitize(&self.catalog);
            self.status.bubble = Bubble::default();
            if let Some(p) = saved.position {
                self.position = p;
            }
            stored_type = Some(saved.pet_type_id);
        }
        let wanted = self.requested_pet_type.clone().or(stored_type);
        self.pet_type = match wanted {
            Some(id) if self.catalog.pet_type(&id).is_some() => id,
            Some(id) => {
                warn!(pet_type = %id, "unknown pet type, using default");
                "default".to_string()
            }
            None => "default".to_string(),
        };

        self.running = true;
        self.last_tick_ms = now_ms;
        self.sync_pet_frame();
        self.timers.arm(TimerKind::StatusTick, now_ms + self.tick_interval_ms);
        self.timers.arm(TimerKind::ExpressionRefresh, now_ms);
        self.arm_idle(now_ms);
        self.arm_blink(now_ms);
        self.arm_relocate(now_ms);
        let notices = progress::evaluate(&mut self.status, &self.catalog, now_ms);
        self.publish(notices, now_ms);
        info!(level = self.status.level, pet_type = %self.pet_type, "pet engine started");
    }

    /// Saves and disarms every timer.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.persist();
        self.timers.clear();
        self.glide = None;
        self.running = false;
        info!("pet engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs everything due up to `now_ms`, in deadline order.
    pub fn advance(&mut self, now_ms: u64) {
        if !self.running {
            return;
        }
        for r in self.gestures.poll(now_ms) {
            self.on_recognized(r, now_ms);
        }
        while let Some((kind, at)) = self.timers.pop_due(now_ms) {
            self.on_timer(kind, at);
        }
        if let Some(glide) = self.glide {
            self.position = glide.position_at(now_ms);
            if glide.done(now_ms) {
                self.glide = None;
            }
            self.sync_pet_frame();
        }
    }

    // ── Timers ─────────────────────────────────────────────

    fn arm_idle(&mut self, from_ms: u64) {
        let delay = scheduler::idle_delay_ms(&self.status, &mut self.rng);
        self.timers.arm(TimerKind::IdlePose, from_ms + delay);
    }

    fn arm_blink(&mut self, from_ms: u64) {
        let delay = scheduler::blink_delay_ms(&mut self.rng);
        self.timers.arm(TimerKind::Blink, from_ms + delay);
    }

    fn arm_relocate(&mut self, from_ms: u64) {
        if self.arbiter.is_dragging() || self.menu_open {
            self.timers.cancel(TimerKind::Relocate);
            return;
        }
        let delay = scheduler::relocation_delay_ms(&mut self.rng);
        self.timers.arm(TimerKind::Relocate, from_ms + delay);
    }

    fn on_timer(&mut self, kind: TimerKind, at: u64) {
        match kind {
            TimerKind::StatusTick => self.on_tick(at),
            TimerKind::IdlePose => {
                let mut next_from = at;
                if !self.menu_open && !self.arbiter.is_dragging() {
                    let pose = scheduler::pick_idle_pose(
                        &self.status,
                        &self.catalog,
                        self.sim.rules(),
                        &mut self.rng,
                    );
                    if let Some(pose) = pose {
                        let ms = self.catalog.duration_ms(&pose, IDLE_DEFAULT_MS);
                        debug!(pose = %pose, ms, "idle pose");
                        self.arbiter.set_idle(&pose, at, ms);
                        next_from = at + ms;
                    }
                }
                self.arm_idle(next_from);
            }
            TimerKind::Blink => {
                if scheduler::can_blink(&self.status) && !self.arbiter.idle_playing(at) {
                    self.arbiter.blink(at, BLINK_MS);
                }
                self.arm_blink(at);
            }
            TimerKind::Relocate => {
                if let Some(prev) = self.glide.take() {
                    self.position = prev.position_at(at);
                }
                let target = scheduler::relocation_target(
                    self.position,
                    self.viewport,
                    self.pet_size,
                    &mut self.rng,
                );
                match target {
                    Some(to) => {
                        self.glide = Some(Glide {
                            from: self.position,
                            to,
                            start_ms: at,
                            duration_ms: GLIDE_MS,
                        });
                        self.arbiter.set_idle("walk-animation", at, GLIDE_MS);
                        self.arm_relocate(at + GLIDE_MS);
                    }
                    None => {
                        debug!("viewport too small to wander");
                        self.arm_relocate(at);
                    }
                }
            }
            TimerKind::ExpressionRefresh => {
                let available = self.expressions().clone();
                self.arbiter
                    .reroll_flavor(&mut self.rng, self.status.level, &available);
                self.timers
                    .arm(TimerKind::ExpressionRefresh, at + EXPRESSION_REFRESH_MS);
            }
            TimerKind::BubbleExpiry => {
                if self.status.bubble.expires_at_ms.is_some_and(|t| t <= at) {
                    self.status.bubble = Bubble::default();
                }
            }
        }
    }

    fn phase(&self) -> DayPhase {
        DayPhase::from_hour(config::local_hour(self.fixed_hour))
    }

    fn on_tick(&mut self, at: u64) {
        let elapsed = Duration::from_millis(at.saturating_sub(self.last_tick_ms));
        self.last_tick_ms = at;
        let phase = self.phase();
        let report = self
            .sim
            .tick(&mut self.status, &self.catalog, elapsed, phase);

        if let Some(ev) = &report.event {
            let ms = self.catalog.duration_ms(ev.animation(), 500);
            self.arbiter.pulse(ev.animation(), at, ms);
            self.arbiter
                .override_expression(ev.expression(), at, EVENT_EXPRESSION_MS);
            let text = ev.message();
            self.show_bubble(&text, BubbleKind::Speech, at, EVENT_BUBBLE_MS);
            self.notifier
                .notify(Notification::new(NotificationKind::Event, text));
        }
        let mut notices: Vec<Notice> = report.level_ups.into_iter().map(Notice::LevelUp).collect();
        notices.extend(progress::evaluate(&mut self.status, &self.catalog, at));
        self.publish(notices, at);
        self.maybe_bubble(at);
        self.persist();
        self.timers
            .arm(TimerKind::StatusTick, at + self.tick_interval_ms);
    }

    fn maybe_bubble(&mut self, at: u64) {
        if self.status.bubble.active {
            return;
        }
        let rules = self.sim.rules();
        let (need_p, warn_p) = (
            rules.bubble_chance.clamp(0.0, 1.0) as f64,
            rules.warning_chance.clamp(0.0, 1.0) as f64,
        );
        let need = scheduler::need_bubble(&self.status, rules);
        let warning = scheduler::warning_bubble(&self.status, rules);
        if let Some(text) = need.filter(|_| self.rng.gen_bool(need_p)) {
            self.show_bubble(text, BubbleKind::Thought, at, BUBBLE_MS);
            self.notifier
                .notify(Notification::new(NotificationKind::Need, text));
        } else if let Some(text) = warning.filter(|_| self.rng.gen_bool(warn_p)) {
            self.show_bubble(text, BubbleKind::Speech, at, BUBBLE_MS);
            self.notifier
                .notify(Notification::new(NotificationKind::Need, text));
        }
    }

    fn show_bubble(&mut self, text: &str, kind: BubbleKind, at: u64, ms: u64) {
        self.status.bubble = Bubble {
            active: true,
            text: text.to_string(),
            kind,
            expires_at_ms: Some(at + ms),
        };
        self.timers.arm(TimerKind::BubbleExpiry, at + ms);
    }

    fn publish(&mut self, notices: Vec<Notice>, at: u64) {
        for notice in notices {
            let kind = match &notice {
                Notice::AchievementUnlocked { .. } => NotificationKind::Unlock,
                Notice::TaskActivated { .. } | Notice::TaskCompleted { .. } => {
                    NotificationKind::Task
                }
                Notice::LevelUp(up) => {
                    self.level_up_pulse(up, at);
                    NotificationKind::LevelUp
                }
            };
            self.notifier.notify(Notification::new(kind, notice.message()));
        }
    }

    fn level_up_pulse(&mut self, up: &LevelUp, at: u64) {
        let token = match up.level {
            0..=4 => "level-up-small",
            5..=9 => "level-up-medium",
            _ => "level-up-large",
        };
        let ms = self.catalog.duration_ms(token, LEVEL_UP_MS);
        self.arbiter.pulse(token, at, ms);
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot) {
            warn!("save failed, will retry next tick: {e:#}");
        }
    }

    pub fn snapshot(&self) -> SavedPet {
        SavedPet {
            version: SAVE_VERSION,
            status: self.status.clone(),
            pet_type_id: self.pet_type.clone(),
            position: Some(self.position),
            saved_at: Some(Utc::now()),
        }
    }

    // ── Input ──────────────────────────────────────────────

    pub fn handle_pointer(&mut self, ev: PointerEvent) {
        if !self.running {
            return;
        }
        for r in self.gestures.handle(ev) {
            self.on_recognized(r, ev.t_ms);
        }
    }

    fn on_recognized(&mut self, r: Recognized, now_ms: u64) {
        match r {
            Recognized::Gesture(GestureSignal::Click | GestureSignal::PettingStroke { .. }) => {
                self.interact(now_ms, InteractionType::Petting, 0.0, None);
            }
            Recognized::Gesture(_) => {}
            Recognized::DragStart { .. } => {
                self.arbiter.drag_started();
                self.glide = None;
                self.timers.cancel(TimerKind::IdlePose);
                self.timers.cancel(TimerKind::Blink);
                self.timers.cancel(TimerKind::Relocate);
            }
            Recognized::DragMove { dx, dy } => {
                self.position.x += dx;
                self.position.y += dy;
                self.sync_pet_frame();
            }
            Recognized::DragEnd => {
                self.arbiter.drag_ended(now_ms);
                self.arm_idle(now_ms);
                self.arm_blink(now_ms);
                self.arm_relocate(now_ms);
                self.persist();
            }
        }
    }

    /// Performs an interaction; `false` means a precondition failed and
    /// nothing changed.
    pub fn interact(
        &mut self,
        now_ms: u64,
        interaction: InteractionType,
        magnitude: f32,
        required: Option<ItemKind>,
    ) -> bool {
        if !self.running {
            return false;
        }
        let outcome = match self.sim.try_interact(
            &mut self.status,
            &self.catalog,
            interaction,
            magnitude,
            required,
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("{e}");
                return false;
            }
        };
        if let Some(effect) = self.catalog.effect(interaction) {
            let token = effect.pulse.clone();
            let ms = self.catalog.duration_ms(&token, 600);
            self.arbiter.pulse(&token, now_ms, ms);
        }
        let mut notices: Vec<Notice> = outcome.level_ups.into_iter().map(Notice::LevelUp).collect();
        notices.extend(progress::evaluate(&mut self.status, &self.catalog, now_ms));
        self.publish(notices, now_ms);
        self.persist();
        true
    }

    pub fn command(&mut self, cmd: HostCommand) {
        debug!(?cmd, "host command");
        self.shell.command(cmd);
    }

    pub fn set_menu_open(&mut self, open: bool, now_ms: u64) {
        if self.menu_open == open {
            return;
        }
        self.menu_open = open;
        if open {
            self.arbiter.clear_idle();
            self.glide = None;
        }
        self.arm_relocate(now_ms);
    }

    pub fn set_tracking(&mut self, enabled: bool) {
        self.tracking = enabled;
    }

    pub fn tracking(&self) -> bool {
        self.tracking
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    pub fn accept_task(&mut self, id: &str, now_ms: u64) -> bool {
        match progress::accept_task(&mut self.status, &self.catalog, id) {
            Ok(accepted) => {
                let notices = progress::evaluate(&mut self.status, &self.catalog, now_ms);
                self.publish(notices, now_ms);
                accepted
            }
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    pub fn add_item(&mut self, id: &str, qty: u32) -> bool {
        match self.status.inventory.add_item(&self.catalog, id, qty) {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    pub fn remove_item(&mut self, id: &str, qty: u32) -> u32 {
        self.status.inventory.remove_item(id, qty)
    }

    // ── Output ─────────────────────────────────────────────

    fn expressions(&self) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.catalog
            .pet_type(&self.pet_type)
            .map_or(&EMPTY, |p| &p.expressions)
    }

    fn sync_pet_frame(&mut self) {
        let center = Position {
            x: self.position.x + self.pet_size.0 / 2.0,
            y: self.position.y + self.pet_size.1 / 2.0,
        };
        self.gestures.set_pet_frame(center, self.pet_size.0);
    }

    pub fn frame(&self, now_ms: u64) -> Frame {
        let reaction = self.gestures.active_reaction(now_ms);
        let look = self
            .gestures
            .eye_direction(now_ms, self.tracking)
            .expression();
        let choice = self
            .arbiter
            .choose(now_ms, reaction, look, &self.status, self.expressions());
        Frame {
            pet_type: self.pet_type.clone(),
            expression: choice.expression,
            animation: choice.animation,
            blinking: choice.blinking,
            look,
            position: self.position,
            bubble: self.status.bubble.active.then(|| self.status.bubble.clone()),
            status: self.status.clone(),
        }
    }

    pub fn render(&self, now_ms: u64, sink: &mut dyn RenderSink) {
        sink.render(&self.frame(now_ms));
    }

    pub fn status(&self) -> &PetStatus {
        &self.status
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn gestures(&self) -> &GestureClassifier {
        &self.gestures
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn shell(&self) -> &H {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut H {
        &mut self.shell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PointerKind;
    use crate::model::{Caps, MAX_LEVEL};
    use crate::ports::MemoryStore;

    type TestEngine = PetEngine<MemoryStore, Vec<Notification>, Vec<HostCommand>>;

    fn engine_with(store: MemoryStore) -> TestEngine {
        let options = EngineOptions {
            rules: Rules::quiet(),
            fixed_hour: Some(12),
            ..EngineOptions::default()
        };
        PetEngine::new(options, store, Vec::new(), Vec::new())
    }

    fn engine() -> TestEngine {
        engine_with(MemoryStore::default())
    }

    #[test]
    fn one_hour_fast_forward_runs_sixty_ticks() {
        let mut e = engine();
        e.start(0);
        e.advance(3_600_000);
        assert_eq!(e.store().saves, 60);
        assert!(e.status().hunger > 50.0);
        assert_eq!(e.timers().due_at(TimerKind::StatusTick), Some(3_660_000));
    }

    #[test]
    fn corrupt_or_missing_snapshot_yields_defaults() {
        let mut e = engine();
        e.start(0);
        assert_eq!(e.status().level, 1);
        assert_eq!(e.status().mood, 80.0);
    }

    #[test]
    fn loaded_snapshot_is_clamped_and_sanitized() {
        let mut saved = SavedPet {
            version: SAVE_VERSION,
            status: PetStatus::default(),
            pet_type_id: "martian".into(),
            position: Some(Position { x: 50.0, y: 60.0 }),
            saved_at: None,
        };
        saved.status.mood = 500.0;
        let mut e = engine_with(MemoryStore::with(saved));
        e.start(0);
        assert_eq!(e.status().mood, 100.0);
        assert_eq!(e.frame(0).pet_type, "default");
        assert_eq!(e.position(), Position { x: 50.0, y: 60.0 });
    }

    #[test]
    fn failed_saves_are_retried_next_tick() {
        let mut e = engine_with(MemoryStore {
            fail_saves: true,
            ..MemoryStore::default()
        });
        e.start(0);
        e.advance(60_000);
        assert_eq!(e.store().saves, 0);
        e.store_mut().fail_saves = false;
        e.advance(120_000);
        assert_eq!(e.store().saves, 1);
        let saved = e.store().saved.as_ref().unwrap();
        assert_eq!(saved.status.exp, e.status().exp);
        assert_eq!(saved.status.hunger, e.status().hunger);
    }

    #[test]
    fn click_pets_the_pet() {
        let mut e = engine();
        e.start(0);
        let (cx, cy) = (20.0 + 48.0, 20.0 + 48.0);
        e.handle_pointer(PointerEvent::new(PointerKind::Down, cx, cy, 100));
        e.handle_pointer(PointerEvent::new(PointerKind::Up, cx, cy, 150));
        assert_eq!(e.status().interaction_count(InteractionType::Petting), 1);
        assert_eq!(e.frame(200).animation.as_deref(), Some("happy-animation"));
        assert!(e
            .notifier()
            .iter()
            .any(|n| n.kind == NotificationKind::Unlock));
    }

    #[test]
    fn drag_moves_the_pet_and_suspends_idle() {
        let mut e = engine();
        e.start(0);
        e.handle_pointer(PointerEvent::new(PointerKind::Down, 60.0, 60.0, 100));
        e.handle_pointer(PointerEvent::new(PointerKind::Move, 70.0, 65.0, 120));
        assert!(!e.timers().is_armed(TimerKind::IdlePose));
        assert!(!e.timers().is_armed(TimerKind::Relocate));
        assert_eq!(e.frame(130).animation.as_deref(), Some("picked-up"));
        e.handle_pointer(PointerEvent::new(PointerKind::Up, 70.0, 65.0, 200));
        assert_eq!(e.position(), Position { x: 30.0, y: 25.0 });
        assert_eq!(e.frame(300).animation.as_deref(), Some("landed"));
        assert!(e.timers().is_armed(TimerKind::IdlePose));
    }

    #[test]
    fn open_menu_suppresses_relocation() {
        let mut e = engine();
        e.start(0);
        assert!(e.timers().is_armed(TimerKind::Relocate));
        e.set_menu_open(true, 10);
        assert!(!e.timers().is_armed(TimerKind::Relocate));
        e.set_menu_open(false, 20);
        assert!(e.timers().is_armed(TimerKind::Relocate));
    }

    #[test]
    fn commands_pass_through_untouched() {
        let mut e = engine();
        e.start(0);
        let before = e.status().clone();
        e.command(HostCommand::TakePhoto);
        e.command(HostCommand::Exit);
        assert_eq!(e.shell(), &vec![HostCommand::TakePhoto, HostCommand::Exit]);
        assert_eq!(e.status(), &before);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut e = engine();
        e.start(0);
        assert!(!e.add_item("plutonium", 1));
        assert!(!e.accept_task("task_nope", 0));
        assert!(e.status().inventory.is_empty());
    }

    #[test]
    fn out_of_range_snapshot_is_repaired() {
        let mut saved = SavedPet {
            version: SAVE_VERSION,
            status: PetStatus {
                level: 4_000_000_000,
                exp: u32::MAX,
                ..PetStatus::default()
            },
            pet_type_id: "default".into(),
            position: None,
            saved_at: None,
        };
        saved.status.caps.mood = -1.0;
        saved.status.caps.cleanliness = f32::INFINITY;
        let mut e = engine_with(MemoryStore::with(saved));
        e.start(0);
        e.advance(120_000);
        let st = e.status();
        assert_eq!(st.level, MAX_LEVEL);
        assert_eq!(st.caps.mood, Caps::for_level(MAX_LEVEL));
        assert_eq!(st.caps.cleanliness, Caps::for_level(MAX_LEVEL));
        assert!(st.mood >= 0.0 && st.mood <= st.caps.mood);
        assert!(st.hunger >= 0.0 && st.hunger <= st.caps.hunger);
    }

    #[test]
    fn blinks_never_start_during_idle_or_when_low() {
        let mut e = engine();
        e.start(0);
        let mut blinks = 0;
        let mut was_blinking = false;
        for t in 1..=30_000 {
            e.advance(t);
            let f = e.frame(t);
            if f.blinking && !was_blinking {
                blinks += 1;
                assert_eq!(f.animation.as_deref(), Some("blink-animation"), "at {t}");
            }
            was_blinking = f.blinking;
        }
        assert!(blinks > 0);

        let saved = SavedPet {
            version: SAVE_VERSION,
            status: PetStatus {
                mood: 25.0,
                ..PetStatus::default()
            },
            pet_type_id: "default".into(),
            position: None,
            saved_at: None,
        };
        let mut e = engine_with(MemoryStore::with(saved));
        e.start(0);
        for t in (0..=30_000).step_by(50) {
            e.advance(t);
            assert!(!e.frame(t).blinking, "blinked at {t}");
        }
    }

    #[test]
    fn open_menu_stops_idle_poses_but_not_ticks() {
        let mut e = engine();
        e.start(0);
        e.set_menu_open(true, 0);
        for t in (0..=300_000).step_by(100) {
            e.advance(t);
            let anim = e.frame(t).animation;
            assert!(
                matches!(anim.as_deref(), None | Some("blink-animation")),
                "{anim:?} at {t}"
            );
        }
        assert_eq!(e.store().saves, 5);
        assert_eq!(e.position(), Position { x: 20.0, y: 20.0 });
    }

    #[test]
    fn fast_forward_chains_relocations() {
        let mut stepped = engine();
        let mut jumped = engine();
        stepped.start(0);
        jumped.start(0);
        for t in (0..=120_000).step_by(50) {
            stepped.advance(t);
        }
        jumped.advance(120_000);
        assert_eq!(stepped.position(), jumped.position());
        assert_ne!(jumped.position(), Position { x: 20.0, y: 20.0 });
    }

    #[test]
    fn stop_saves_and_disarms() {
        let mut e = engine();
        e.start(0);
        e.stop();
        assert!(!e.is_running());
        assert_eq!(e.store().saves, 1);
        assert_eq!(e.timers().due_at(TimerKind::StatusTick), None);
        e.advance(600_000);
        assert_eq!(e.store().saves, 1);
    }
}
