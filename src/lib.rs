//! # vsrc - video source decoding
//!
//! Recovers the playable source list that third-party embed players serve
//! as an obfuscated payload.
//!
//! ## Features
//!
//! - Bit-exact decoding of the three-layer keyed cipher
//! - Master key derivation from client and server keys
//! - Companion encoder for round-trip testing
//! - Pluggable client key extraction with ordered pattern fallbacks
//! - Cached server key retrieval with retries
//! - Fallback across candidate servers
//!
//! ## Example
//!
//! ```rust,no_run
//! use vsrc::{decode, SourcePayload};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plaintext = decode("cFo+IVlk...", "client-key", "server-key")?;
//!     for source in SourcePayload::parse(&plaintext)?.into_video_sources() {
//!         println!("{} ({})", source.url, source.quality);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cipher;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod utils;

// Re-export main types
pub use crate::cipher::{decode, decode_with_master_key, derive_master_key, encode, MasterKey};
pub use crate::config::ExtractorConfig;
pub use crate::core::{SourcePayload, SubtitleTrack, VideoSource};
pub use crate::error::VsrcError;
pub use crate::extract::{
    EmbedCandidate, ExtractedSources, HttpKeyFetcher, KeyExtractor, KeyPattern,
    PatternKeyExtractor, RemoteKeyFetcher, SourceExtractor, StaticKeyFetcher,
};
pub use crate::utils::MasterKeyCache;

/// Result type alias for vsrc operations
pub type Result<T> = std::result::Result<T, VsrcError>;
