use crate::types::error::VoiceprintError;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Keccak-256 digest of a decoded voice sample, `0x`-prefixed lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceprintHash(pub String);

impl VoiceprintHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters for display, e.g. `0x1c8aff95`
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(10) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for VoiceprintHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Split a `data:<mime>;base64,<payload>` URI and decode the payload
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, VoiceprintError> {
    let rest = data_uri
        .trim()
        .strip_prefix("data:")
        .ok_or(VoiceprintError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(VoiceprintError::MissingPayload)?;

    if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(VoiceprintError::NotBase64);
    }

    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    if bytes.is_empty() {
        return Err(VoiceprintError::Empty);
    }
    Ok(bytes)
}

pub fn hash_bytes(bytes: &[u8]) -> VoiceprintHash {
    let digest = Keccak256::digest(bytes);
    VoiceprintHash(format!("0x{}", hex::encode(digest)))
}

/// Hash a voice sample given as a base64 data URI
pub fn hash_voice_sample(data_uri: &str) -> Result<VoiceprintHash, VoiceprintError> {
    let bytes = decode_data_uri(data_uri)?;
    Ok(hash_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_known_vector() {
        // keccak256("") and keccak256("abc")
        assert_eq!(
            hash_bytes(b"").as_str(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hash_bytes(b"abc").as_str(),
            "0x4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_hash_voice_sample() {
        // "abc" in base64
        let hash = hash_voice_sample("data:audio/webm;base64,YWJj").unwrap();
        assert_eq!(hash, hash_bytes(b"abc"));
        assert_eq!(hash.short(), "0x4e03657a");
    }

    #[test]
    fn test_short_respects_char_boundaries() {
        let hash: VoiceprintHash = serde_json::from_str("\"0xéééééééééé\"").unwrap();
        assert_eq!(hash.short(), "0xéééééééé");
        assert_eq!(VoiceprintHash("0xab".to_string()).short(), "0xab");
    }

    #[test]
    fn test_mime_parameters_allowed() {
        let hash = hash_voice_sample("data:audio/webm;codecs=opus;base64,YWJj").unwrap();
        assert_eq!(hash, hash_bytes(b"abc"));
    }

    #[test]
    fn test_rejects_malformed_uris() {
        assert_eq!(hash_voice_sample("YWJj"), Err(VoiceprintError::NotDataUri));
        assert_eq!(
            hash_voice_sample("data:audio/webm;base64"),
            Err(VoiceprintError::MissingPayload)
        );
        assert_eq!(
            hash_voice_sample("data:text/plain,abc"),
            Err(VoiceprintError::NotBase64)
        );
        assert_eq!(hash_voice_sample("data:audio/webm;base64,"), Err(VoiceprintError::Empty));
        assert!(matches!(
            hash_voice_sample("data:audio/webm;base64,@@@"),
            Err(VoiceprintError::Decode(_))
        ));
    }
}
