//! # Generic multicast observation for async data producers.
//!
//! [`Multicast`] generalizes the notification invariant the scheduler's
//! observable futures rely on — a terminal event is delivered exactly once
//! to every current observer — for arbitrary data producers. Binding this
//! to UI components is out of scope here.

mod multicast;

pub use multicast::{Multicast, Observe};
