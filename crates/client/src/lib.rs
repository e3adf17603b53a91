//! Orchestration client for a remote media-encoding service.
//!
//! Provides the REST wrapper ([`api::MediaApi`]), the [`service::MediaService`]
//! seam it implements, asset creation, job submission with structured
//! storage-account errors, bounded completion polling, job templates, and
//! the [`client::MediaClient`] facade created once per process.

pub mod api;
pub mod assets;
pub mod client;
pub mod config;
pub mod poller;
pub mod resources;
pub mod service;
pub mod submit;
pub mod templates;
