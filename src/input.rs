use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use deskpet::{HostCommand, InteractionType, ItemKind, PointerKind};
use std::time::Duration;

/// Terminal cells are treated as 8x16 screen pixels.
pub(crate) const CELL_W: f32 = 8.0;
pub(crate) const CELL_H: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    Interact {
        interaction: InteractionType,
        magnitude: f32,
        item: Option<ItemKind>,
    },
    Pointer {
        kind: PointerKind,
        x: f32,
        y: f32,
    },
    Command(HostCommand),
    ToggleMenu,
    ToggleTracking,
    Gift,
    Resize {
        cols: u16,
        rows: u16,
    },
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Event>> {
    let mut out = Vec::new();
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        out.push(event::read()?);
        if out.len() >= 64 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: Event) -> Option<Action> {
    match ev {
        Event::Key(k) if k.kind != KeyEventKind::Release => map_key(k.code, k.modifiers),
        Event::Mouse(m) => map_mouse(m),
        Event::Resize(cols, rows) => Some(Action::Resize { cols, rows }),
        _ => None,
    }
}

fn interact(interaction: InteractionType, magnitude: f32, item: Option<ItemKind>) -> Action {
    Action::Interact {
        interaction,
        magnitude,
        item,
    }
}

fn map_key(code: KeyCode, mods: KeyModifiers) -> Option<Action> {
    if code == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Command(HostCommand::Exit));
    }
    let KeyCode::Char(ch) = code else {
        return match code {
            KeyCode::Esc => Some(Action::Command(HostCommand::Exit)),
            KeyCode::Tab => Some(Action::ToggleMenu),
            _ => None,
        };
    };
    match ch.to_ascii_lowercase() {
        'f' => Some(interact(InteractionType::Feed, 20.0, Some(ItemKind::Food))),
        'c' => Some(interact(InteractionType::Clean, 30.0, Some(ItemKind::CleaningSupply))),
        'p' => Some(interact(InteractionType::Play, 15.0, Some(ItemKind::Toy))),
        't' => Some(interact(InteractionType::Train, 0.0, None)),
        'l' => Some(interact(InteractionType::Learn, 0.0, None)),
        's' => Some(interact(InteractionType::Special, 10.0, None)),
        'g' => Some(Action::Gift),
        'm' => Some(Action::ToggleMenu),
        'e' => Some(Action::ToggleTracking),
        'o' => Some(Action::Command(HostCommand::OpenSettings)),
        'x' => Some(Action::Command(HostCommand::TakePhoto)),
        'n' => Some(Action::Command(HostCommand::Minimize)),
        'q' => Some(Action::Command(HostCommand::Exit)),
        _ => None,
    }
}

fn map_mouse(m: MouseEvent) -> Option<Action> {
    let kind = match m.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
        MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => PointerKind::Move,
        _ => return None,
    };
    Some(Action::Pointer {
        kind,
        x: m.column as f32 * CELL_W + CELL_W / 2.0,
        y: m.row as f32 * CELL_H + CELL_H / 2.0,
    })
}
