//! Filter backend implementations.
//!
//! Two backends share the [`crate::GridFilter`] seam:
//! - **software** — CPU reference loop, ground truth and always available
//! - **accelerator** — dispatches rounds to the offload engine over its
//!   memory-mapped register window

pub mod accelerator;
pub mod software;

pub use accelerator::AcceleratorFilter;
pub use software::SoftwareFilter;
