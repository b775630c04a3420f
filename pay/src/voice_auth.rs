use crate::types::{AuthConfig, VoiceAuthResult};
use log::{info, warn};
use rand::Rng;
use voxchain_intent::hash_voice_sample;

/// Simulated voice check. Hashes the sample as an identity proxy and accepts
/// with the configured probability; there is no biometric comparison.
pub struct VoiceAuthenticator {
    config: AuthConfig,
}

impl VoiceAuthenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn authenticate(&self, voice_sample_data_uri: &str) -> VoiceAuthResult {
        let hash = match hash_voice_sample(voice_sample_data_uri) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Voice sample hashing failed: {}", e);
                return VoiceAuthResult::failed(None, format!("Authentication failed: {}", e));
            }
        };

        info!("Generated voice auth hash {}", hash);

        if rand::rng().random_bool(self.config.acceptance_rate) {
            VoiceAuthResult::authenticated(
                hash.to_string(),
                format!("Authenticated successfully! Voice Hash: {}...", hash.short()),
            )
        } else {
            VoiceAuthResult::failed(
                Some(hash.to_string()),
                "Authentication failed. Please try again.".to_string(),
            )
        }
    }
}
