//! Collaborator boundaries: persistence, rendering, host commands and
//! notifications. The engine talks to the outside world only through
//! these traits.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::model::{Bubble, PetStatus, Position, SavedPet};

pub const MIN_NOTIFICATION_MS: u64 = 3_000;

pub trait PetStore {
    /// `Ok(None)` means nothing has been saved yet.
    fn load(&mut self) -> Result<Option<SavedPet>>;
    fn save(&mut self, snapshot: &SavedPet) -> Result<()>;
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub pet_type: String,
    pub expression: String,
    pub animation: Option<String>,
    pub blinking: bool,
    pub look: Option<&'static str>,
    pub position: Position,
    pub bubble: Option<Bubble>,
    pub status: PetStatus,
}

pub trait RenderSink {
    fn render(&mut self, frame: &Frame);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCommand {
    OpenSettings,
    Exit,
    TakePhoto,
    Minimize,
}

pub trait HostShell {
    fn command(&mut self, cmd: HostCommand);
}

impl HostShell for Vec<HostCommand> {
    fn command(&mut self, cmd: HostCommand) {
        self.push(cmd);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Unlock,
    Task,
    LevelUp,
    Need,
    Event,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    pub min_display_ms: u64,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            min_display_ms: MIN_NOTIFICATION_MS,
        }
    }
}

pub trait NotificationSink {
    fn notify(&mut self, note: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, note: Notification) {
        self.push(note);
    }
}

/// Keeps the last snapshot in memory. `fail_saves` makes every save fail,
/// for exercising the retry path.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub saved: Option<SavedPet>,
    pub saves: u32,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn with(saved: SavedPet) -> Self {
        Self {
            saved: Some(saved),
            ..Self::default()
        }
    }
}

impl PetStore for MemoryStore {
    fn load(&mut self) -> Result<Option<SavedPet>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, snapshot: &SavedPet) -> Result<()> {
        if self.fail_saves {
            bail!("memory store refused the save");
        }
        self.saved = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}
