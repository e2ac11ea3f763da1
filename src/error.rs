use thiserror::Error;

use crate::model::{InteractionType, ItemKind};

/// Everything the simulation core can refuse to do.
///
/// None of these cross the engine boundary as panics: the public surface
/// logs them and degrades to a no-op (or a `false` return for
/// [`crate::engine::PetEngine::interact`]).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PetError {
    #[error("unknown item id `{0}`")]
    UnknownItem(String),
    #[error("unknown task id `{0}`")]
    UnknownTask(String),
    #[error("interaction `{interaction}` failed: {reason}")]
    Precondition {
        interaction: InteractionType,
        reason: Precondition,
    },
}

/// Why an interaction was refused before any mutation happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precondition {
    NoItem(ItemKind),
    NotEnoughEnergy { needed: f32, have: f32 },
    Locked { level_required: u32 },
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoItem(kind) => write!(f, "no {kind} in inventory"),
            Self::NotEnoughEnergy { needed, have } => {
                write!(f, "needs {needed:.0} energy, has {have:.0}")
            }
            Self::Locked { level_required } => write!(f, "unlocks at level {level_required}"),
        }
    }
}
