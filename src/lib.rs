//! Workspace placeholder crate.
//!
//! This crate exists so host applications can depend on `ppc-workspace` and
//! pull in the individual workspace crates (`core-playback`, `core-browse`,
//! `core-runtime`, `bridge-traits`) without wiring each one individually.

pub use bridge_traits;
pub use core_browse;
pub use core_playback;
pub use core_runtime;
