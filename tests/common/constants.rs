//! Shared values for end-to-end tests

#![allow(dead_code)]

pub const QUALITY_MODEL: &str = "test-pro";
pub const SPEED_MODEL: &str = "test-flash";
pub const TEST_API_KEY: &str = "test-key-123";

/// Maximum time to wait for the mock server to accept connections.
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// A well formed reply with all three blocks.
pub const SONG_REPLY: &str = "Here you go!\n\n\
--- BLOCK 1: META ---\n\
**Title:** Neon Caravan\n\
**Voice Description:** Raspy male lead with a whispered hook\n\
\n\
--- BLOCK 2: STYLE PROMPT ---\n\
Mahraganat, Synthwave, Autotune, 128bpm\n\
\n\
--- BLOCK 3: LYRICS ---\n\
[Intro]\n\
(Yeah)\n\
[Chorus]\n\
Lights on the dunes tonight";
