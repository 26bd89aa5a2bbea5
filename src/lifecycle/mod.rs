//! Run lifecycle coordination.

pub mod cancel;

pub use cancel::{CancelHandle, CancelToken};
