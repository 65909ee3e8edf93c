//! Domain layer for the learning platform: course and lesson model,
//! content validation, quiz evaluation, and learner progress.
//!
//! This crate is pure and synchronous. Persistence lives in `storage`,
//! orchestration in `services`.

#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progress;
pub mod time;

pub use error::Error;
pub use time::Clock;
