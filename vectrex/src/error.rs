//! Three tiers of failure, matching how much the caller can do about each:
//! structural configuration errors refuse to start at all, recoverable
//! hardware quirks are policy-driven (ignore, log, or escalate to an
//! error), and everything that crosses back out to a host is a single
//! [`EmulatorError`].

use std::collections::HashSet;

use thiserror::Error;

/// Fatal at construction time; the emulator never reaches a running state.
#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("ROM image is {actual} bytes, larger than the {max} byte cartridge window")]
    RomTooLarge { actual: usize, max: usize },

    #[error("cartridge header failed validation: {detail}")]
    InvalidCartridgeHeader { detail: String },

    #[error("BIOS image must be exactly {expected} bytes, got {actual}")]
    BiosSizeMismatch { expected: usize, actual: usize },

    #[error("bus ranges {first:?} and {second:?} overlap")]
    OverlappingBusRange {
        first: (u16, u16),
        second: (u16, u16),
    },

    #[error("quirk of kind {0:?} escalated to a fatal error by policy")]
    QuirkEscalated(QuirkKind),
}

/// What a quirk policy does when a given kind of quirk is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum QuirkAction {
    /// Silently continue; the common case for well-understood hardware
    /// accidents that real cartridges rely on (e.g. cartridge ROM writes).
    #[default]
    Ignore,
    /// Emit a `tracing` warning every time the quirk is hit.
    Log,
    /// Emit a `tracing` warning only the first time each distinct kind is
    /// hit, to avoid flooding logs from a hot loop that re-triggers it
    /// every frame.
    LogOnce,
    /// Treat the quirk as fatal and return `Err(EmulatorError::QuirkEscalated)`.
    Fail,
}

/// Which policy bucket a quirk kind falls into: `Undefined` behavior is
/// behavior real hardware exhibits but the original engineers never
/// documented (e.g. reading unmapped bus addresses); `Unsupported` is
/// behavior this emulator deliberately does not model (e.g. the PSG's I/O
/// ports, which no Vectrex cartridge wires up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuirkClass {
    Undefined,
    Unsupported,
}

/// A specific, nameable hardware quirk this emulator can hit during
/// normal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuirkKind {
    /// A write landed on cartridge or BIOS ROM.
    RomWrite,
    /// A read or write landed on the $8000-$C7FF unmapped range.
    UnmappedAccess,
    /// A read or write landed on the $D800-$DFFF illegal range.
    IllegalRangeAccess,
    /// An indexed addressing postbyte used a reserved encoding.
    ReservedIndexedPostbyte,
    /// The PSG's R14/R15 I/O ports were accessed; no Vectrex board wires
    /// them to anything.
    PsgIoPortWrite,
    /// The CPU fetched an opcode with no defined behavior.
    UnhandledOpcode,
    /// Firmware requested Timer1's continuous-reload (free-running) mode;
    /// only one-shot mode is modeled.
    Timer1FreeRunningMode,
}

impl QuirkKind {
    fn class(self) -> QuirkClass {
        match self {
            QuirkKind::RomWrite
            | QuirkKind::UnmappedAccess
            | QuirkKind::IllegalRangeAccess
            | QuirkKind::ReservedIndexedPostbyte
            | QuirkKind::UnhandledOpcode => QuirkClass::Undefined,
            QuirkKind::PsgIoPortWrite | QuirkKind::Timer1FreeRunningMode => {
                QuirkClass::Unsupported
            }
        }
    }
}

/// Configures what happens when each class of quirk is encountered.
/// Defaults to ignoring both, matching how a cartridge running on real
/// hardware simply never notices these paths are undefined.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct QuirkPolicy {
    pub undefined: QuirkAction,
    pub unsupported: QuirkAction,
}

impl QuirkPolicy {
    fn action_for(&self, kind: QuirkKind) -> QuirkAction {
        match kind.class() {
            QuirkClass::Undefined => self.undefined,
            QuirkClass::Unsupported => self.unsupported,
        }
    }
}

/// Applies a [`QuirkPolicy`] to quirks reported during emulation,
/// deduplicating `LogOnce` kinds across the lifetime of the emulator.
#[derive(Debug, Default)]
pub struct QuirkReporter {
    policy: QuirkPolicy,
    logged_once: HashSet<QuirkKind>,
}

impl QuirkReporter {
    pub fn new(policy: QuirkPolicy) -> Self {
        Self {
            policy,
            logged_once: HashSet::new(),
        }
    }

    /// Report a quirk, applying policy. Returns `Err` only when the
    /// configured action is `Fail`.
    pub fn report(
        &mut self,
        kind: QuirkKind,
        detail: impl Into<String>,
    ) -> Result<(), EmulatorError> {
        match self.policy.action_for(kind) {
            QuirkAction::Ignore => {}
            QuirkAction::Log => {
                tracing::warn!(?kind, detail = %detail.into(), "hardware quirk");
            }
            QuirkAction::LogOnce => {
                if self.logged_once.insert(kind) {
                    tracing::warn!(?kind, detail = %detail.into(), "hardware quirk (first occurrence)");
                }
            }
            QuirkAction::Fail => return Err(EmulatorError::QuirkEscalated(kind)),
        }
        Ok(())
    }
}
