//! Cross-provider ID transforms. Each dialect's batch/file IDs have their
//! own wire syntax; these functions translate between that native syntax
//! and the canonical form used once a request has crossed into the
//! dispatch layer. All transforms MUST round-trip exactly — see the unit
//! tests below.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Gemini canonical `files-XYZ` <-> native `files/XYZ`.
pub fn gemini_file_id_to_canonical(native: &str) -> String {
    native.replacen('/', "-", 1)
}

pub fn gemini_file_id_from_canonical(canonical: &str) -> String {
    canonical.replacen('-', "/", 1)
}

/// Gemini canonical `batches-XYZ` <-> native `batches/XYZ`.
pub fn gemini_batch_id_to_canonical(native: &str) -> String {
    native.replacen('/', "-", 1)
}

pub fn gemini_batch_id_from_canonical(canonical: &str) -> String {
    canonical.replacen('-', "/", 1)
}

/// Bedrock canonical IDs are base64(ARN) so they survive being routed
/// through a URL path segment and dialect converters that otherwise assume
/// an opaque, separator-free ID string.
pub fn bedrock_arn_to_canonical(arn: &str) -> String {
    BASE64.encode(arn.as_bytes())
}

#[derive(Debug, Clone)]
pub enum IdDecodeError {
    Base64(String),
    Utf8,
}

pub fn bedrock_arn_from_canonical(canonical: &str) -> Result<String, IdDecodeError> {
    let bytes = BASE64
        .decode(canonical.as_bytes())
        .map_err(|e| IdDecodeError::Base64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| IdDecodeError::Utf8)
}

/// OpenAI IDs are already canonical-shaped; passthrough, kept as a named
/// function so call sites read uniformly across dialects.
pub fn openai_id_to_canonical(native: &str) -> String {
    native.to_string()
}

pub fn openai_id_from_canonical(canonical: &str) -> String {
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_file_id_round_trips() {
        let native = "files/abc-123";
        let canonical = gemini_file_id_to_canonical(native);
        assert_eq!(canonical, "files-abc-123");
        assert_eq!(gemini_file_id_from_canonical(&canonical), native);
    }

    #[test]
    fn gemini_batch_id_round_trips() {
        let native = "batches/xyz-789";
        let canonical = gemini_batch_id_to_canonical(native);
        assert_eq!(canonical, "batches-xyz-789");
        assert_eq!(gemini_batch_id_from_canonical(&canonical), native);
    }

    #[test]
    fn gemini_id_only_replaces_first_separator() {
        // a model/resource name may itself contain '/' or '-'; only the
        // first separator denotes the resource-type boundary.
        let native = "files/a/b-c";
        let canonical = gemini_file_id_to_canonical(native);
        assert_eq!(gemini_file_id_from_canonical(&canonical), native);
    }

    #[test]
    fn bedrock_arn_round_trips() {
        let arn = "arn:aws:bedrock:us-east-1:123456789012:model-invocation-job/abc123";
        let canonical = bedrock_arn_to_canonical(arn);
        let decoded = bedrock_arn_from_canonical(&canonical).expect("valid id");
        assert_eq!(decoded, arn);
    }

    #[test]
    fn bedrock_arn_decode_rejects_garbage() {
        assert!(bedrock_arn_from_canonical("not-base64!!").is_err());
    }

    #[test]
    fn openai_id_is_passthrough() {
        let id = "file-abc123";
        assert_eq!(openai_id_to_canonical(id), id);
        assert_eq!(openai_id_from_canonical(id), id);
    }
}
