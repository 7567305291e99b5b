//! Simulation errors.
//!
//! Every error here is a violation of a caller contract. They fall into two
//! classes, see [`ErrorKind`].

use thiserror::Error;

use crate::entity::{ItemId, UnitId};

/// Result alias for simulation operations.
pub type Result<T, E = SimError> = std::result::Result<T, E>;

/// Broad classification of a [`SimError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An argument was outside its allowed domain.
    InvalidArgument,
    /// The operation is not allowed in the current state.
    InvalidState,
}

/// Errors raised by unit, usable and battlefield operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Damage or heal amount below zero (or NaN).
    #[error("amount must be non-negative, got {amount}")]
    NegativeAmount {
        /// Offending amount
        amount: f32,
    },

    /// Base damage outside the open interval (0, 100).
    #[error("damage amount must be in (0, 100), got {amount}")]
    DamageOutOfRange {
        /// Offending amount
        amount: f32,
    },

    /// Effect built for one unit was attached to another.
    #[error("effect targets unit {effect_target} but was added to unit {unit}")]
    EffectTargetMismatch {
        /// Unit the effect was built for
        effect_target: UnitId,
        /// Unit it was attached to
        unit: UnitId,
    },

    /// Usable constructed with invalid parameters.
    #[error("invalid usable: {0}")]
    InvalidUsable(&'static str),

    /// Usable used while its cooldown is running.
    #[error("usable is on cooldown")]
    UsableNotReady,

    /// Dead marker requested for a living unit, or requested twice.
    #[error("dead marker unavailable for unit {0}")]
    DeadMarkerUnavailable(UnitId),

    /// Attack target is dead, unknown or friendly.
    #[error("unit {attacker} cannot attack unit {target}")]
    InvalidAttackTarget {
        /// Unit given the order
        attacker: UnitId,
        /// Requested target
        target: UnitId,
    },

    /// No unit with this id exists.
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    /// No item with this id exists.
    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    /// Ability or inventory slot index out of range.
    #[error("no usable in slot {0}")]
    UnknownSlot(usize),

    /// Item further away than the pickup radius.
    #[error("item {0} is out of pickup range")]
    ItemOutOfRange(ItemId),

    /// Hero-only operation on a regular unit.
    #[error("unit {0} is not a hero")]
    NotAHero(UnitId),

    /// Ability or item used by a dead hero.
    #[error("unit {0} is dead")]
    CasterDead(UnitId),
}

impl SimError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NegativeAmount { .. }
            | Self::DamageOutOfRange { .. }
            | Self::EffectTargetMismatch { .. }
            | Self::InvalidUsable(_)
            | Self::UnknownSlot(_) => ErrorKind::InvalidArgument,
            Self::UsableNotReady
            | Self::DeadMarkerUnavailable(_)
            | Self::InvalidAttackTarget { .. }
            | Self::UnknownUnit(_)
            | Self::UnknownItem(_)
            | Self::ItemOutOfRange(_)
            | Self::NotAHero(_)
            | Self::CasterDead(_) => ErrorKind::InvalidState,
        }
    }
}

/// Reject negative and NaN amounts.
pub(crate) fn ensure_non_negative(amount: f32) -> Result<()> {
    if amount >= 0.0 {
        Ok(())
    } else {
        Err(SimError::NegativeAmount { amount })
    }
}
