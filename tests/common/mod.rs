//! Common test infrastructure
//!
//! Spawns a mock of the hosted generation API so tests can drive the real
//! HTTP provider end to end. Tests should only import from this module.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{MockGemini, MockReply, QUALITY_MODEL, SONG_REPLY};
//!
//! #[tokio::test]
//! async fn test_generate() {
//!     let server = MockGemini::spawn().await;
//!     server.script(QUALITY_MODEL, vec![MockReply::text(SONG_REPLY)]);
//!     let tiers = server.model_tiers();
//! }
//! ```

mod constants;
mod server;

// Public API - this is what tests import
pub use constants::*;
pub use server::{MockGemini, MockReply};
