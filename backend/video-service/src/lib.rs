//! Video Service
//!
//! Backend for uploads, live streams, sharing and comments on a third-party
//! hosted video platform. Correlates the platform's out-of-band lifecycle
//! events with client-side intent, maintains the sharing graph, and fans
//! live comments out to viewers per video.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;
pub mod websocket;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
