//! # kata-core
//!
//! Record types shared across the kata-sync crates:
//! - [`ChallengeRecord`] and [`Solution`], the persisted shape of a completed kata
//! - [`ChallengeId`], the opaque source-assigned identity
//! - [`CompletedAt`], a completion timestamp that keeps its source text
//! - id-based diffing between the remote catalog and the local store

pub mod completed_at;
pub mod diff;
pub mod id;
pub mod record;

pub use completed_at::CompletedAt;
pub use diff::{dedupe_by_id, new_records};
pub use id::ChallengeId;
pub use record::{ChallengeRecord, Solution};
