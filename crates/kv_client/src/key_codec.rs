//! Conversion between logical keys/values and the gateway's base64 wire form.
//!
//! The key-value gateway transports keys and values as base64 strings over
//! JSON. Text is always converted to its UTF-8 byte sequence before being
//! base64 encoded, which keeps any non-ASCII content intact. Decoding reverses
//! this exactly, so `decode(&encode(s)) == s` holds for every string.
//!
//! Two engines are available:
//!
//! - the primary engine, standard alphabet with mandatory padding;
//! - a compatibility engine, standard alphabet with optional padding on
//!   decode. It produces byte-identical output on encode.
//!
//! [`decode_lenient`] chains both engines with a final passthrough and reports
//! which tier produced the result.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use tracing::debug;

use crate::errors::CodecError;

#[cfg(test)]
#[path = "key_codec_tests.rs"]
mod tests;

const COMPAT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The decoding strategy that produced a [`Decoded`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTier {
    /// Strict base64 followed by strict UTF-8.
    Primary,

    /// The compatibility engine accepted the input. Unpadded base64 is
    /// accepted, and bytes that are not UTF-8 are read as one code point per
    /// byte, which is what records written by a code-point encoder look like.
    Compatibility,

    /// The input is not base64 at all and is returned unchanged.
    Passthrough,
}

/// Text recovered by [`decode_lenient`], tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub tier: DecodeTier,
}

impl Decoded {
    /// Returns `true` if the text was actually decoded rather than passed through.
    pub fn was_decoded(&self) -> bool {
        self.tier != DecodeTier::Passthrough
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Encodes text as base64 over its UTF-8 bytes.
///
/// # Examples
///
/// ```rust
/// use kv_client::key_codec;
///
/// assert_eq!(key_codec::encode("/plugin_templates/t1"), "L3BsdWdpbl90ZW1wbGF0ZXMvdDE=");
/// assert_eq!(key_codec::encode("ü"), "w7w=");
/// ```
pub fn encode(text: &str) -> String {
    encode_bytes(text.as_bytes())
}

/// Encodes raw bytes as base64.
///
/// Range ends are not always valid UTF-8 (a successor bound can end in any
/// byte), so they are encoded through this function.
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Encodes text with the compatibility engine.
///
/// Kept for parity with legacy writers that fell back to a second encoder.
/// The output is identical to [`encode`] for every input, and since [`encode`]
/// cannot fail no production path needs this fallback.
pub fn encode_compat(text: &str) -> String {
    COMPAT_ENGINE.encode(text.as_bytes())
}

/// Decodes a base64 wire string back into text.
///
/// # Errors
///
/// * `CodecError::InvalidBase64` - the input is not padded standard base64
/// * `CodecError::InvalidUtf8` - the decoded bytes are not valid UTF-8
pub fn decode(wire: &str) -> Result<String, CodecError> {
    let bytes = decode_bytes(wire)?;
    Ok(String::from_utf8(bytes)?)
}

/// Decodes a base64 wire string into raw bytes.
pub fn decode_bytes(wire: &str) -> Result<Vec<u8>, CodecError> {
    Ok(STANDARD.decode(wire)?)
}

/// Decodes a wire string, falling back through the compatibility engine and
/// finally returning the input unchanged.
///
/// This never fails. Callers inspect [`Decoded::tier`] to decide whether a
/// passthrough result is acceptable for them.
pub fn decode_lenient(wire: &str) -> Decoded {
    let primary_error = match decode(wire) {
        Ok(text) => {
            return Decoded {
                text,
                tier: DecodeTier::Primary,
            }
        }
        Err(e) => e,
    };

    let compact: String = wire.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match COMPAT_ENGINE.decode(compact.as_bytes()) {
        Ok(bytes) => {
            debug!(
                reason = %primary_error,
                "Primary decode failed, using compatibility decoding"
            );
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
            };
            Decoded {
                text,
                tier: DecodeTier::Compatibility,
            }
        }
        Err(compat_error) => {
            debug!(
                reason = %compat_error,
                "Value is not base64, passing it through unchanged"
            );
            Decoded {
                text: wire.to_string(),
                tier: DecodeTier::Passthrough,
            }
        }
    }
}
