//! Core logic with no UI concerns.
//!
//! Both components reach the outside world only through the
//! [`HostSurface`](crate::host::HostSurface) they are handed.

pub mod listing;
pub mod relay;
