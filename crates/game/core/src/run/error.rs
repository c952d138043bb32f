use crate::combat::BattleError;
use crate::entity::{EnemyKind, LoadoutError};
use crate::error::{ErrorSeverity, GameError};
use crate::items::{InventoryError, Potion};

/// Errors surfaced by the run controller.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("choice {index} is out of range for {len} options")]
    InvalidChoice { index: usize, len: usize },

    #[error("no decision is pending")]
    NoPendingDecision,

    #[error("the run is over")]
    RunOver,

    #[error("costs {price} gold, only {gold} available")]
    InsufficientGold { price: u32, gold: u32 },

    #[error("no template for enemy {0}")]
    MissingTemplate(EnemyKind),

    #[error(transparent)]
    Loadout(#[from] LoadoutError),

    #[error(transparent)]
    Potions(#[from] InventoryError<Potion>),

    #[error(transparent)]
    Battle(#[from] BattleError),
}

impl GameError for RunError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidChoice { .. } | Self::NoPendingDecision => ErrorSeverity::Validation,
            Self::InsufficientGold { .. } => ErrorSeverity::Recoverable,
            Self::RunOver => ErrorSeverity::Fatal,
            Self::MissingTemplate(_) => ErrorSeverity::Internal,
            Self::Loadout(e) => e.severity(),
            Self::Potions(e) => e.severity(),
            Self::Battle(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidChoice { .. } => "RUN_INVALID_CHOICE",
            Self::NoPendingDecision => "RUN_NO_PENDING_DECISION",
            Self::RunOver => "RUN_OVER",
            Self::InsufficientGold { .. } => "RUN_INSUFFICIENT_GOLD",
            Self::MissingTemplate(_) => "RUN_MISSING_TEMPLATE",
            Self::Loadout(e) => e.error_code(),
            Self::Potions(e) => e.error_code(),
            Self::Battle(e) => e.error_code(),
        }
    }
}
