//! Memory-mapped access to the engine's register window.
//!
//! The engine's four registers live at a fixed physical base address
//! (a platform constant, typically taken from the device tree or the
//! generated hardware header). [`MappedRegisters`] maps that window from
//! `/dev/mem` and exposes volatile 32-bit accessors; [`RegisterBlock`]
//! is the seam the dispatch logic is written against, so the handshake
//! sequencing is testable without silicon.
//!
//! rustix covers the mmap/munmap syscalls; libc remains only for the
//! `O_SYNC` open flag rustix's std-interop path does not carry.

// MMIO registers are naturally aligned by hardware, so pointer casts are safe
#![allow(clippy::cast_ptr_alignment)]

use crate::error::{Result, StencilError};
use rustix::mm::{mmap, munmap, MapFlags, ProtFlags};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsFd;
use std::ptr::NonNull;

/// 32-bit register access, the seam between dispatch logic and silicon.
///
/// Reads take `&mut self`: on real hardware a read can have side effects,
/// and mock implementations consume scripted responses.
pub trait RegisterBlock: std::fmt::Debug + Send {
    /// Read the 32-bit register at `offset`.
    fn read32(&mut self, offset: usize) -> u32;

    /// Write the 32-bit register at `offset`.
    fn write32(&mut self, offset: usize, value: u32);
}

/// The engine's register window mapped from `/dev/mem`.
pub struct MappedRegisters {
    ptr: NonNull<u8>,
    len: usize,
    base: usize,
    _mem: File,
}

impl std::fmt::Debug for MappedRegisters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRegisters")
            .field("base", &format_args!("{:#x}", self.base))
            .field("len", &self.len)
            .finish()
    }
}

// SAFETY: MappedRegisters owns its mapping exclusively; the mapped window
// is process-wide and carries no thread-local state, so moving the handle
// between threads is sound.
unsafe impl Send for MappedRegisters {}

impl MappedRegisters {
    /// Map the register window at physical address `base`.
    ///
    /// `base` must be page-aligned; the mapping is opened with `O_SYNC`
    /// so accesses reach the device uncached.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not page-aligned, `/dev/mem` cannot
    /// be opened (usually a permissions problem), or the mmap fails.
    pub fn map(base: usize) -> Result<Self> {
        let page = rustix::param::page_size();
        if base % page != 0 {
            return Err(StencilError::map_failed(format!(
                "base {base:#x} is not aligned to the {page}-byte page size"
            )));
        }

        let mem = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open("/dev/mem")
            .map_err(|e| {
                StencilError::map_failed(format!("cannot open /dev/mem: {e}. Running as root?"))
            })?;

        // One page covers the whole 16-byte window; mmap cannot go finer.
        let len = page;

        // SAFETY: mmap of a device window. Invariants: (1) mem is a valid
        // fd, just opened; (2) len is one page, non-zero; (3) MAP_SHARED
        // so writes reach the device; (4) offset is the page-aligned
        // physical base; (5) the pointer is unmapped exactly once in Drop.
        let ptr = unsafe {
            let addr = mmap(
                std::ptr::null_mut(),
                len,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                mem.as_fd(),
                base as u64,
            )
            .map_err(|e| StencilError::map_failed(format!("mmap of {base:#x} failed: {e}")))?;

            NonNull::new(addr.cast::<u8>()).expect("mmap returns non-null on success")
        };

        tracing::info!("mapped register window {base:#x} ({len} bytes at {ptr:p})");

        Ok(Self {
            ptr,
            len,
            base,
            _mem: mem,
        })
    }
}

impl RegisterBlock for MappedRegisters {
    fn read32(&mut self, offset: usize) -> u32 {
        assert!(offset + 4 <= self.len, "register offset out of window");
        // SAFETY: volatile read required for MMIO - the device changes the
        // value behind the compiler's back. ptr is valid for len bytes
        // (mapped in map()), offset+4 <= len, and the window is u32-aligned.
        unsafe { std::ptr::read_volatile(self.ptr.as_ptr().add(offset).cast::<u32>()) }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        assert!(offset + 4 <= self.len, "register offset out of window");
        // SAFETY: volatile write required for MMIO - it triggers device
        // side effects and must not be elided or reordered. Same bounds
        // and alignment invariants as read32.
        unsafe {
            std::ptr::write_volatile(self.ptr.as_ptr().add(offset).cast::<u32>(), value);
        }
    }
}

impl Drop for MappedRegisters {
    fn drop(&mut self) {
        // SAFETY: ptr/len come from the successful mmap in map(); Drop
        // runs at most once and no other references to the mapping exist.
        unsafe {
            let _ = munmap(self.ptr.as_ptr().cast(), self.len);
        }
        tracing::debug!("unmapped register window {:#x}", self.base);
    }
}
