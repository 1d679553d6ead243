//! Source extraction across fallback servers

use crate::cipher::decoder::decode_with_master_key;
use crate::config::ExtractorConfig;
use crate::core::source::{SourcePayload, VideoSource};
use crate::error::VsrcError;
use crate::extract::key_extractor::KeyExtractor;
use crate::extract::server_key::RemoteKeyFetcher;
use crate::utils::cache::MasterKeyCache;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Encoded payload and embed page served by one server
#[derive(Debug, Clone)]
pub struct EmbedCandidate {
    /// Server name, for logging and the result
    pub server: String,
    /// Raw embed page markup holding the client key
    pub embed_html: String,
    /// Base64 ciphertext returned by the embed API
    pub ciphertext: String,
}

impl EmbedCandidate {
    pub fn new<S, H, C>(server: S, embed_html: H, ciphertext: C) -> Self
    where
        S: Into<String>,
        H: Into<String>,
        C: Into<String>,
    {
        Self {
            server: server.into(),
            embed_html: embed_html.into(),
            ciphertext: ciphertext.into(),
        }
    }
}

/// Sources recovered from the first working server
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSources {
    pub server: String,
    pub sources: Vec<VideoSource>,
}

enum Attempt {
    Found(ExtractedSources),
    Exhausted { stale_key: bool },
}

/// Turns embed candidates into playable sources.
///
/// A failing candidate is logged and skipped; the caller only sees an error
/// when no candidate works.
pub struct SourceExtractor {
    key_extractor: Arc<dyn KeyExtractor>,
    key_fetcher: Arc<dyn RemoteKeyFetcher>,
    master_keys: MasterKeyCache,
}

impl SourceExtractor {
    /// Create a new extractor
    pub fn new(
        key_extractor: Arc<dyn KeyExtractor>,
        key_fetcher: Arc<dyn RemoteKeyFetcher>,
        config: &ExtractorConfig,
    ) -> Self {
        Self {
            key_extractor,
            key_fetcher,
            master_keys: MasterKeyCache::new(config.master_key_cache_capacity),
        }
    }

    /// Try each candidate in order and return the first that yields sources.
    ///
    /// When every candidate that got as far as decoding produced a malformed
    /// payload, the server key has probably rotated: it is refetched once and
    /// the candidates are tried again.
    pub async fn extract(&self, candidates: &[EmbedCandidate]) -> Result<ExtractedSources> {
        if candidates.is_empty() {
            return Err(VsrcError::NoSourceFound);
        }

        let server_key = self.key_fetcher.fetch_key().await?;
        match self.try_candidates(candidates, &server_key) {
            Attempt::Found(found) => return Ok(found),
            Attempt::Exhausted { stale_key: false } => return Err(VsrcError::NoSourceFound),
            Attempt::Exhausted { stale_key: true } => {}
        }

        info!("All payloads malformed, refreshing server key");
        self.key_fetcher.invalidate().await;
        let fresh_key = self.key_fetcher.fetch_key().await?;
        if fresh_key == server_key {
            return Err(VsrcError::NoSourceFound);
        }

        match self.try_candidates(candidates, &fresh_key) {
            Attempt::Found(found) => Ok(found),
            Attempt::Exhausted { .. } => Err(VsrcError::NoSourceFound),
        }
    }

    fn try_candidates(&self, candidates: &[EmbedCandidate], server_key: &str) -> Attempt {
        let mut decoded_any = false;
        let mut stale_key = true;

        for candidate in candidates {
            match self.decode_candidate(candidate, server_key) {
                Ok(sources) => {
                    info!("Server {} yielded {} sources", candidate.server, sources.len());
                    return Attempt::Found(ExtractedSources {
                        server: candidate.server.clone(),
                        sources,
                    });
                }
                Err(err) => {
                    warn!("Discarding server {}: {}", candidate.server, err);
                    match err {
                        VsrcError::MalformedPayload(_) => decoded_any = true,
                        VsrcError::KeyNotFound(_) | VsrcError::EmptyInput(_) => {}
                        _ => stale_key = false,
                    }
                }
            }
        }

        Attempt::Exhausted {
            stale_key: stale_key && decoded_any,
        }
    }

    /// Decode one candidate with a known server key
    pub fn decode_candidate(
        &self,
        candidate: &EmbedCandidate,
        server_key: &str,
    ) -> Result<Vec<VideoSource>> {
        let client_key = self
            .key_extractor
            .extract(&candidate.embed_html)
            .ok_or_else(|| {
                VsrcError::KeyNotFound(format!("client key in {} embed page", candidate.server))
            })?;
        if server_key.is_empty() {
            return Err(VsrcError::EmptyInput("server key".to_string()));
        }
        debug!("Decoding {} payload", candidate.server);

        let master_key = self.master_keys.get_or_derive(&client_key, server_key);
        let plaintext = decode_with_master_key(&candidate.ciphertext, &master_key)?;
        Ok(SourcePayload::parse(&plaintext)?.into_video_sources())
    }
}
