// src/core/mod.rs

pub mod classify;
pub mod key_pool;
pub mod key_rotation;

pub use classify::{classify, FailureClass};
pub use key_pool::{KeyPool, RotationCursor};
pub use key_rotation::{AttemptOutcome, KeyRotationProxy};
