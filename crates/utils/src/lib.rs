//! Shared utilities for cellar
//!
//! Small helpers used by the store and the command line binary: installing
//! the tracing subscriber, writing files atomically and locating the XDG
//! directories cellar reads its configuration from and keeps its data in.

pub mod atomic_file;
pub mod tracing;
pub mod xdg;

pub use atomic_file::*;
pub use xdg::*;
