use anyhow::Context;
use crossterm::style::Color;
use deskpet::config::{load_settings, save_settings_atomic, Paths, Settings};
use deskpet::ports::NotificationSink;
use deskpet::{
    Catalog, EngineOptions, HostCommand, JsonFileStore, Notification, PetEngine, PointerEvent,
    PointerKind, RenderSink,
};
use std::collections::VecDeque;
use std::fs;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::input::{collect_input_nonblocking, map_event, Action};
use crate::render::{draw_text, Terminal};

/// Shows one notification at a time, each for at least its minimum
/// display time.
#[derive(Default)]
pub(crate) struct Toasts {
    queue: VecDeque<Notification>,
    current: Option<(Notification, Instant)>,
}

impl NotificationSink for Toasts {
    fn notify(&mut self, note: Notification) {
        info!(kind = ?note.kind, "{}", note.text);
        self.queue.push_back(note);
    }
}

impl Toasts {
    fn current(&mut self, now: Instant) -> Option<&Notification> {
        let expired = self.current.as_ref().map_or(true, |(n, since)| {
            now.saturating_duration_since(*since) >= Duration::from_millis(n.min_display_ms)
        });
        if expired {
            self.current = self.queue.pop_front().map(|n| (n, now));
        }
        self.current.as_ref().map(|(n, _)| n)
    }
}

type Engine = PetEngine<JsonFileStore, Toasts, Vec<HostCommand>>;

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    engine: Engine,
    term: Terminal,
    started: Instant,
    pointer_inside: bool,
    menu_open: bool,
    should_quit: bool,
}

fn load_catalog(paths: &Paths) -> Catalog {
    match fs::read_to_string(&paths.catalog_path) {
        Ok(s) => Catalog::from_json(&s).unwrap_or_else(|e| {
            warn!("catalog unreadable, using the built-in one: {e:#}");
            Catalog::standard()
        }),
        Err(_) => Catalog::standard(),
    }
}

impl App {
    fn init(paths: Paths) -> anyhow::Result<Self> {
        let settings = load_settings(&paths.settings_path);
        let term = Terminal::begin()?;
        let options = EngineOptions {
            viewport: term.viewport(),
            ..EngineOptions::from_settings(&settings, load_catalog(&paths))
        };
        let store = JsonFileStore::new(&paths.save_path);
        let mut engine = PetEngine::new(options, store, Toasts::default(), Vec::new());
        engine.start(0);
        Ok(Self {
            settings,
            paths,
            engine,
            term,
            started: Instant::now(),
            pointer_inside: false,
            menu_open: false,
            should_quit: false,
        })
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);

        while !self.should_quit {
            let frame_start = Instant::now();
            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_event(ev) {
                    self.apply(action);
                }
            }
            let now = self.now_ms();
            self.engine.advance(now);
            let commands: Vec<HostCommand> = self.engine.shell_mut().drain(..).collect();
            for cmd in commands {
                self.host_command(cmd, now)?;
            }
            self.render_frame(now)?;
            spin_sleep(frame_dt, frame_start);
        }

        self.engine.stop();
        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        let now = self.now_ms();
        match action {
            Action::Interact {
                interaction,
                magnitude,
                item,
            } => {
                self.engine.interact(now, interaction, magnitude, item);
            }
            Action::Pointer { kind, x, y } => self.pointer(kind, x, y, now),
            Action::Command(cmd) => self.engine.command(cmd),
            Action::ToggleMenu => {
                self.menu_open = !self.menu_open;
                self.engine.set_menu_open(self.menu_open, now);
            }
            Action::ToggleTracking => {
                self.settings.eye_tracking = !self.engine.tracking();
                self.engine.set_tracking(self.settings.eye_tracking);
            }
            Action::Gift => {
                for id in ["basic_food", "soap", "ball"] {
                    self.engine.add_item(id, 1);
                }
            }
            Action::Resize { cols, rows } => {
                self.term.resize(cols, rows);
                let (w, h) = self.term.viewport();
                self.engine.set_viewport(w, h);
            }
        }
    }

    /// Synthesizes enter/leave from the pet's footprint before forwarding
    /// the raw event.
    fn pointer(&mut self, kind: PointerKind, x: f32, y: f32, now: u64) {
        let pos = self.engine.position();
        let inside = x >= pos.x
            && x <= pos.x + self.settings.pet_width
            && y >= pos.y
            && y <= pos.y + self.settings.pet_height;
        if inside != self.pointer_inside && !self.engine.gestures().is_dragging() {
            self.pointer_inside = inside;
            let edge = if inside {
                PointerKind::Enter
            } else {
                PointerKind::Leave
            };
            self.engine.handle_pointer(PointerEvent::new(edge, x, y, now));
        }
        self.engine.handle_pointer(PointerEvent::new(kind, x, y, now));
    }

    fn host_command(&mut self, cmd: HostCommand, now: u64) -> anyhow::Result<()> {
        match cmd {
            HostCommand::Exit => self.should_quit = true,
            HostCommand::TakePhoto => {
                let frame = self.engine.frame(now);
                fs::create_dir_all(&self.paths.photo_dir)?;
                let name = format!("photo-{}.json", chrono::Local::now().format("%Y%m%d-%H%M%S"));
                let path = self.paths.photo_dir.join(name);
                let data = serde_json::to_vec_pretty(&frame)?;
                fs::write(&path, data).with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "photo saved");
            }
            HostCommand::OpenSettings => {
                save_settings_atomic(&self.paths.settings_path, &self.settings)?;
                info!(path = %self.paths.settings_path.display(), "settings written for editing");
            }
            HostCommand::Minimize => info!("minimize is not available in a terminal"),
        }
        Ok(())
    }

    fn render_frame(&mut self, now: u64) -> anyhow::Result<()> {
        let frame = self.engine.frame(now);
        self.term.render(&frame);
        if self.menu_open {
            draw_text(&mut self.term.cur, 1, 8, "[menu open]", Color::Yellow);
        }
        let row = self.term.rows.saturating_sub(2);
        if let Some(note) = self.engine.notifier_mut().current(Instant::now()) {
            draw_text(&mut self.term.cur, 1, row, &note.text, Color::Green);
        }
        self.term.present()
    }
}

pub(crate) fn run(paths: Paths) -> anyhow::Result<()> {
    let mut app = App::init(paths)?;
    app.run()
}

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        if end - t > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
