//! # Notification
//!
//! The unit of communication on the broadcast channel.
//!
//! ## Wire Format
//!
//! ```text
//! {"command": "<string>", "payload": "<string>", "signature": "<base64>"}
//! ```
//!
//! Decoding is lenient the way fleet publishers expect:
//!
//! - every field is optional and defaults to the empty string
//! - `null` counts as absent
//! - field names match case-insensitively (`Command`, `PAYLOAD`)
//! - unrecognised fields are ignored
//!
//! A field holding anything other than a string or `null` is malformed.

use crate::command::NotificationCommand;
use crate::errors::DecodeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A typed, optionally signed message carrying a command and an opaque payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// What the publisher wants receivers to do.
    pub command: NotificationCommand,

    /// Command-specific body, typically serialized JSON.
    pub payload: String,

    /// Base64 signature over `payload`. Empty when unsigned.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub signature: String,
}

impl<'de> Deserialize<'de> for Notification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut notification = Self::default();

        for (key, value) in fields {
            let slot = match key.to_ascii_lowercase().as_str() {
                "command" => None,
                "payload" => Some(&mut notification.payload),
                "signature" => Some(&mut notification.signature),
                _ => continue,
            };
            let Some(text) = Option::<String>::deserialize(value)
                .map_err(|e| <D::Error as serde::de::Error>::custom(format!("field `{key}`: {e}")))?
            else {
                continue;
            };
            match slot {
                Some(field) => *field = text,
                None => notification.command = NotificationCommand::from(text),
            }
        }

        Ok(notification)
    }
}

impl Notification {
    /// Build an unsigned notification.
    pub fn new(command: NotificationCommand, payload: impl Into<String>) -> Self {
        Self {
            command,
            payload: payload.into(),
            signature: String::new(),
        }
    }

    /// Attach a base64 signature.
    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Decode transport bytes.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Encode for publishing.
    pub fn encode(&self) -> Result<Vec<u8>, DecodeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Whether the publisher attached a signature.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_message() {
        let raw = br#"{"command":"NoticeConfigUpdate","payload":"{\"a\":1}","signature":"c2ln"}"#;
        let notification = Notification::decode(raw).unwrap();

        assert_eq!(notification.command, NotificationCommand::ConfigUpdate);
        assert_eq!(notification.payload, r#"{"a":1}"#);
        assert_eq!(notification.signature, "c2ln");
        assert!(notification.is_signed());
    }

    #[test]
    fn test_missing_signature_is_empty() {
        let raw = br#"{"command":"GroupReload","payload":""}"#;
        let notification = Notification::decode(raw).unwrap();

        assert_eq!(notification.command, NotificationCommand::GroupReload);
        assert!(notification.signature.is_empty());
        assert!(!notification.is_signed());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let raw = br#"{"command":"ApiAdded","payload":"x","extra":{"nested":true}}"#;
        let notification = Notification::decode(raw).unwrap();
        assert_eq!(notification.command, NotificationCommand::ApiAdded);
    }

    #[test]
    fn test_empty_object_defaults() {
        let notification = Notification::decode(b"{}").unwrap();
        assert_eq!(notification, Notification::default());
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        let inputs: [&[u8]; 5] = [
            b"",
            b"not json",
            b"[1,2,3]",
            br#"{"command": 42}"#,
            &[0xFF, 0xFE, 0x00],
        ];
        for raw in inputs {
            assert!(
                matches!(Notification::decode(raw), Err(DecodeError::Malformed(_))),
                "expected decode failure for {raw:?}"
            );
        }
    }

    #[test]
    fn test_null_fields_are_empty() {
        let raw = br#"{"command":"NoticeConfigUpdate","payload":null,"signature":null}"#;
        let notification = Notification::decode(raw).unwrap();

        assert_eq!(notification.command, NotificationCommand::ConfigUpdate);
        assert!(notification.payload.is_empty());
        assert!(!notification.is_signed());

        let all_null = Notification::decode(br#"{"command":null}"#).unwrap();
        assert_eq!(all_null, Notification::default());
    }

    #[test]
    fn test_field_names_match_any_case() {
        let raw = br#"{"Command":"NoticeConfigUpdate","PAYLOAD":"{}","Signature":"c2ln"}"#;
        let notification = Notification::decode(raw).unwrap();

        assert_eq!(notification.command, NotificationCommand::ConfigUpdate);
        assert_eq!(notification.payload, "{}");
        assert_eq!(notification.signature, "c2ln");
    }

    #[test]
    fn test_wrongly_typed_known_field_is_malformed() {
        for raw in [
            &br#"{"payload": {"nested": true}}"#[..],
            br#"{"Signature": 7}"#,
            br#"{"COMMAND": ["NoticeConfigUpdate"]}"#,
        ] {
            assert!(matches!(Notification::decode(raw), Err(DecodeError::Malformed(_))));
        }
    }

    #[test]
    fn test_encode_omits_empty_signature() {
        let notification = Notification::new(NotificationCommand::GatewayDrlStatus, "{}");
        let encoded = String::from_utf8(notification.encode().unwrap()).unwrap();

        assert!(encoded.contains(r#""command":"NoticeGatewayDRLNotification""#));
        assert!(!encoded.contains("signature"));
    }

    #[test]
    fn test_encode_keeps_unknown_command_verbatim() {
        let notification =
            Notification::new(NotificationCommand::from("CustomThing"), "p").with_signature("abc");
        let decoded = Notification::decode(&notification.encode().unwrap()).unwrap();
        assert_eq!(decoded, notification);
    }
}
