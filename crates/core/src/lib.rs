//! Domain model for the mediaq encoding-job client.
//!
//! Pure data types and validation with no I/O: storage accounts and the
//! read-only [`account::AccountRegistry`], asset handles, task and job
//! drafts, the job state machine, and job templates. All remote
//! interaction lives in the `mediaq-client` crate.

pub mod account;
pub mod asset;
pub mod error;
pub mod job;
pub mod task;
pub mod template;
pub mod types;
