//! Extraction layer feeding the decoder: client keys, server keys, fallback servers

pub mod extractor;
pub mod key_extractor;
pub mod retry;
pub mod server_key;

pub use extractor::*;
pub use key_extractor::*;
pub use retry::*;
pub use server_key::*;
