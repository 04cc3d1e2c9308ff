//! Register window of the stencil offload engine.
//!
//! The engine exposes four 32-bit registers on its AXI-lite slave port.
//! Offset 0x0 is a single physical location with two roles: a write sets
//! the start flag (GO), a read observes the completion flag (DONE). The
//! two roles must never be modelled as independent fields — the whole
//! handshake rides on that aliasing.
//!
//! ```text
//! 0x0  CTRL     write: GO flag      read: DONE flag   (aliased)
//! 0x4  SIZE     write: grid side length (cells)
//! 0x8  SRC_PTR  write: source buffer base address
//! 0xc  DST_PTR  write: destination buffer base address
//! ```
//!
//! Dispatch order is fixed: SIZE, SRC_PTR, DST_PTR, then the handshake
//! (see [`crate::handshake`]). The engine latches the three parameter
//! registers on the rising edge of GO.

/// Combined control/status register. GO on write, DONE on read.
pub const CTRL: usize = 0x0;

/// Grid side length in cells. Latched when GO rises.
pub const SIZE: usize = 0x4;

/// Source buffer base address. Latched when GO rises.
pub const SRC_PTR: usize = 0x8;

/// Destination buffer base address. Latched when GO rises.
pub const DST_PTR: usize = 0xc;

/// Bytes covered by the register window, for mapping granularity.
pub const WINDOW_LEN: usize = 0x10;

/// CTRL register values.
pub mod ctrl {
    /// Written to CTRL to request a run.
    pub const START: u32 = 1;
    /// Written to CTRL to withdraw the start request after the busy ack.
    pub const CLEAR: u32 = 0;
}

#[cfg(test)]
#[allow(clippy::assertions_on_constants)] // compile-time layout validation
mod tests {
    use super::*;

    #[test]
    fn go_and_done_share_one_location() {
        // The handshake depends on the aliasing; a regression here would
        // silently split the flag into two registers.
        assert_eq!(CTRL, 0x0);
    }

    #[test]
    fn parameter_registers_non_overlapping() {
        assert_ne!(SIZE, SRC_PTR);
        assert_ne!(SRC_PTR, DST_PTR);
        assert!(SIZE > CTRL && SRC_PTR > SIZE && DST_PTR > SRC_PTR);
        assert!(DST_PTR + 4 <= WINDOW_LEN);
    }
}
