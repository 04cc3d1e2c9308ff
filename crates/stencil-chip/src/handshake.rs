//! The engine's two-edge handshake, modelled as a pure state machine.
//!
//! The engine signals both "request accepted" and "run complete" through
//! the single CTRL flag. The driver distinguishes the two events by the
//! explicit clear it performs in between:
//!
//! ```text
//! driver writes GO=1 ──▶ poll until CTRL reads 0   (busy acknowledgement)
//! driver writes GO=0 ──▶ poll until CTRL reads ≠0  (completion)
//! ```
//!
//! "Flag cleared after being set" and "flag set after being cleared" are
//! two separate synchronisation events on the same wire. There is no
//! timeout at any phase: if the engine never answers, the driver blocks —
//! that is the hardware contract, not a software decision.

/// Driver-visible phase of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request outstanding.
    Idle,
    /// GO written, waiting for the engine to drop the flag.
    Requested,
    /// Busy ack observed, GO cleared, waiting for the flag to rise.
    Accepted,
    /// Flag observed high after the clear; the run is finished.
    Complete,
}

impl Phase {
    /// Advance the phase given the value a CTRL poll just returned.
    ///
    /// Polls in `Idle` or `Complete` do not move the machine; those
    /// phases only advance through [`Phase::start`] / a new dispatch.
    #[must_use]
    pub const fn observe(self, ctrl: u32) -> Self {
        match (self, ctrl) {
            (Self::Requested, 0) => Self::Accepted,
            (Self::Accepted, v) if v != 0 => Self::Complete,
            (p, _) => p,
        }
    }

    /// Phase entered by writing GO=1 from idle.
    #[must_use]
    pub const fn start(self) -> Self {
        match self {
            Self::Idle | Self::Complete => Self::Requested,
            p => p,
        }
    }
}
