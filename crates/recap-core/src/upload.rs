//! Upload decoding: size-checked buffer read, lossy UTF-8 decode, no format
//! sniffing. Stateless; the gateway owns the "field missing" case.

use crate::error::CoreError;

/// Hard ceiling for an uploaded transcript file. Enforced client-side as a
/// pre-flight check and here as the authoritative limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A decoded upload: the text content plus the original filename, which the
/// client echoes back in its success alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedText {
    pub filename: String,
    pub content: String,
}

/// Decodes an uploaded file as UTF-8 text. Invalid sequences are replaced
/// rather than rejected, matching what the form client expects for stray
/// bytes in exported transcripts.
pub fn decode_upload(filename: &str, bytes: &[u8]) -> Result<UploadedText, CoreError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(
            "File size must be less than 10MB".to_string(),
        ));
    }
    Ok(UploadedText {
        filename: filename.to_string(),
        content: String::from_utf8_lossy(bytes).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_text() {
        let up = decode_upload("notes.txt", b"Alice opened the meeting.").unwrap();
        assert_eq!(up.filename, "notes.txt");
        assert_eq!(up.content, "Alice opened the meeting.");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let up = decode_upload("export.txt", &[b'o', b'k', 0xFF, b'!']).unwrap();
        assert_eq!(up.content, "ok\u{FFFD}!");
    }

    #[test]
    fn payload_at_the_limit_is_accepted() {
        let bytes = vec![b'a'; MAX_UPLOAD_BYTES];
        assert!(decode_upload("big.txt", &bytes).is_ok());
    }

    #[test]
    fn payload_over_the_limit_is_a_validation_error() {
        let bytes = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        let err = decode_upload("huge.txt", &bytes).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }
}
