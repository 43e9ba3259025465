//! Errors raised by the core types themselves.
//!
//! Sub-crates keep their own enums and wrap `DtsError` with `#[from]` where a
//! core check can fail beneath them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtsError {
    #[error("tick_duration_secs must be positive and finite, got {0}")]
    InvalidTickDuration(f32),
}

pub type DtsResult<T> = Result<T, DtsError>;
