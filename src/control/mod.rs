//! # Host lifecycle control.
//!
//! The debounced idle state machine that decides when the hosting process
//! should stop: never while work is pending or clients are attached, and
//! never kept alive indefinitely by transient disconnects.

mod lifecycle;

pub use lifecycle::{Lifecycle, Phase};
