//! # Notification Public Keys
//!
//! The scheme follows the key material:
//!
//! | Key file | Scheme |
//! |----------|--------|
//! | PEM `PUBLIC KEY` (SPKI) with the RSA OID | RSA PKCS#1 v1.5 over SHA-256 |
//! | PEM `RSA PUBLIC KEY` (PKCS#1) | RSA PKCS#1 v1.5 over SHA-256 |
//! | PEM `PUBLIC KEY` (SPKI) with the Ed25519 OID | Ed25519 |
//! | 64 hex characters | Ed25519 (raw 32-byte key) |
//!
//! Dashboards sign fleet notifications with RSA. Surrounding whitespace is
//! ignored.

use crate::domain::errors::{KeyLoadError, SignatureError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::{DecodePublicKey, EncodePublicKey};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::path::Path;

const PEM_MARKER: &str = "-----BEGIN";
const PKCS1_MARKER: &str = "-----BEGIN RSA PUBLIC KEY-----";

/// Verification key for notification signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// RSA key; signatures are PKCS#1 v1.5 over the SHA-256 digest.
    Rsa(RsaPublicKey),
    /// Ed25519 key.
    Ed25519(VerifyingKey),
}

impl PublicKey {
    /// Create an Ed25519 key from raw bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, KeyLoadError> {
        VerifyingKey::from_bytes(bytes)
            .map(Self::Ed25519)
            .map_err(|e| KeyLoadError::Format(e.to_string()))
    }

    /// Parse PEM or hex key material.
    pub fn parse(text: &str) -> Result<Self, KeyLoadError> {
        let text = text.trim();
        if text.starts_with(PKCS1_MARKER) {
            return RsaPublicKey::from_pkcs1_pem(text)
                .map(Self::Rsa)
                .map_err(|e| KeyLoadError::Format(e.to_string()));
        }
        if text.starts_with(PEM_MARKER) {
            return Self::parse_spki(text);
        }

        let raw = hex::decode(text).map_err(|e| KeyLoadError::Format(e.to_string()))?;
        let bytes: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| KeyLoadError::Format(format!("expected 32 bytes, got {}", raw.len())))?;
        Self::from_bytes(&bytes)
    }

    /// SPKI decoding checks the algorithm OID, so at most one attempt succeeds.
    fn parse_spki(pem: &str) -> Result<Self, KeyLoadError> {
        if let Ok(key) = RsaPublicKey::from_public_key_pem(pem) {
            return Ok(Self::Rsa(key));
        }
        VerifyingKey::from_public_key_pem(pem)
            .map(Self::Ed25519)
            .map_err(|e| KeyLoadError::Format(format!("neither RSA nor Ed25519: {e}")))
    }

    /// Read and parse a key file.
    pub fn from_file(path: &Path) -> Result<Self, KeyLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| KeyLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Signature scheme, for logs.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "rsa-pkcs1v15-sha256",
            Self::Ed25519(_) => "ed25519",
        }
    }

    /// Hex encoding accepted by [`PublicKey::parse`]. Ed25519 only.
    pub fn to_hex(&self) -> Option<String> {
        match self {
            Self::Rsa(_) => None,
            Self::Ed25519(key) => Some(hex::encode(key.as_bytes())),
        }
    }

    /// SPKI PEM encoding accepted by [`PublicKey::parse`].
    pub fn to_pem(&self) -> Result<String, KeyLoadError> {
        let pem = match self {
            Self::Rsa(key) => key.to_public_key_pem(LineEnding::LF),
            Self::Ed25519(key) => key.to_public_key_pem(LineEnding::LF),
        };
        pem.map_err(|e| KeyLoadError::Format(e.to_string()))
    }

    /// Verify a base64 signature over `message`.
    pub fn verify(&self, message: &[u8], signature_b64: &str) -> Result<(), SignatureError> {
        let raw = STANDARD
            .decode(signature_b64)
            .map_err(|e| SignatureError::Encoding(e.to_string()))?;

        match self {
            Self::Rsa(key) => {
                if raw.len() != key.size() {
                    return Err(SignatureError::Length(raw.len()));
                }
                let digest = Sha256::digest(message);
                key.verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &raw)
                    .map_err(|_| SignatureError::Mismatch)
            }
            Self::Ed25519(key) => {
                let signature =
                    Signature::from_slice(&raw).map_err(|_| SignatureError::Length(raw.len()))?;
                key.verify(message, &signature)
                    .map_err(|_| SignatureError::Mismatch)
            }
        }
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(key: RsaPublicKey) -> Self {
        Self::Rsa(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signer::NotificationSigner;

    fn signer() -> NotificationSigner {
        NotificationSigner::from_seed([0x42; 32])
    }

    #[test]
    fn test_verify_valid_signature() {
        let signer = signer();
        let signature = signer.sign("payload");

        assert!(signer.public_key().verify(b"payload", &signature).is_ok());
    }

    #[test]
    fn test_tampered_payload_fails() {
        let signer = signer();
        let signature = signer.sign("payload");

        assert_eq!(
            signer.public_key().verify(b"payl0ad", &signature),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_wrong_key_fails() {
        let signature = signer().sign("payload");
        let other = NotificationSigner::from_seed([0x07; 32]).public_key();

        assert_eq!(
            other.verify(b"payload", &signature),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_non_base64_signature() {
        let result = signer().public_key().verify(b"payload", "%%% not base64 %%%");
        assert!(matches!(result, Err(SignatureError::Encoding(_))));
    }

    #[test]
    fn test_short_signature() {
        let short = STANDARD.encode([1u8; 10]);
        let result = signer().public_key().verify(b"payload", &short);
        assert_eq!(result, Err(SignatureError::Length(10)));
    }

    #[test]
    fn test_empty_signature() {
        let result = signer().public_key().verify(b"payload", "");
        assert_eq!(result, Err(SignatureError::Length(0)));
    }

    #[test]
    fn test_parse_hex() {
        let key = signer().public_key();
        let parsed = PublicKey::parse(&format!("  {}\n", key.to_hex().unwrap())).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_parse_pem() {
        let key = signer().public_key();
        let pem = key.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));

        assert_eq!(PublicKey::parse(&pem).unwrap(), key);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            PublicKey::parse("definitely not a key"),
            Err(KeyLoadError::Format(_))
        ));
        assert!(matches!(
            PublicKey::parse("abcd"),
            Err(KeyLoadError::Format(_))
        ));
        assert!(matches!(
            PublicKey::parse("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----"),
            Err(KeyLoadError::Format(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = PublicKey::from_file(Path::new("/nonexistent/notification.pub"));
        assert!(matches!(result, Err(KeyLoadError::Io { .. })));
    }

    const RSA_PUBLIC: &str = include_str!("../../testdata/rsa_public.pem");
    const RSA_PUBLIC_PKCS1: &str = include_str!("../../testdata/rsa_public_pkcs1.pem");
    const RSA_PRIVATE: &str = include_str!("../../testdata/rsa_private.pem");
    /// Produced with `openssl dgst -sha256 -sign rsa_private.pem`.
    const RSA_SIGNATURE: &str = include_str!("../../testdata/rsa_payload.sig");
    const RSA_SIGNED_PAYLOAD: &[u8] = br#"{"api_id":"fleet-api"}"#;

    fn rsa_sign(payload: &[u8]) -> String {
        use rsa::pkcs8::DecodePrivateKey;

        let private = rsa::RsaPrivateKey::from_pkcs8_pem(RSA_PRIVATE).unwrap();
        let digest = Sha256::digest(payload);
        STANDARD.encode(private.sign(Pkcs1v15Sign::new::<Sha256>(), &digest).unwrap())
    }

    #[test]
    fn test_rsa_spki_key_verifies_openssl_signature() {
        let key = PublicKey::parse(RSA_PUBLIC).unwrap();

        assert!(matches!(key, PublicKey::Rsa(_)));
        assert_eq!(key.algorithm(), "rsa-pkcs1v15-sha256");
        assert!(key.verify(RSA_SIGNED_PAYLOAD, RSA_SIGNATURE.trim()).is_ok());
    }

    #[test]
    fn test_rsa_pkcs1_key_matches_spki_key() {
        let spki = PublicKey::parse(RSA_PUBLIC).unwrap();
        let pkcs1 = PublicKey::parse(RSA_PUBLIC_PKCS1).unwrap();

        assert_eq!(spki, pkcs1);
        assert!(pkcs1.verify(RSA_SIGNED_PAYLOAD, RSA_SIGNATURE.trim()).is_ok());
    }

    #[test]
    fn test_rsa_rejects_tampered_payload() {
        let key = PublicKey::parse(RSA_PUBLIC).unwrap();

        assert_eq!(
            key.verify(br#"{"api_id":"other-api"}"#, RSA_SIGNATURE.trim()),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_rsa_signs_arbitrary_payloads() {
        let key = PublicKey::parse(RSA_PUBLIC).unwrap();
        let signature = rsa_sign(b"reload");

        assert!(key.verify(b"reload", &signature).is_ok());
        assert_eq!(key.verify(b"reload!", &signature), Err(SignatureError::Mismatch));
    }

    #[test]
    fn test_rsa_rejects_ed25519_signature() {
        let key = PublicKey::parse(RSA_PUBLIC).unwrap();
        let ed25519_signature = signer().sign("payload");

        assert_eq!(
            key.verify(b"payload", &ed25519_signature),
            Err(SignatureError::Length(64))
        );
    }

    #[test]
    fn test_rsa_pem_roundtrip() {
        let key = PublicKey::parse(RSA_PUBLIC).unwrap();

        assert_eq!(PublicKey::parse(&key.to_pem().unwrap()).unwrap(), key);
        assert!(key.to_hex().is_none());
    }
}
