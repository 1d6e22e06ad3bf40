use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use std::path::Path;
use tokio::fs;

use crate::error::ChefError;
use crate::model::VideoBlob;

/// Largest decoded video sent inline.
///
/// The 20 MB inline request limit covers the base64 text, which is a third
/// larger than the bytes, plus the prompt around it.
pub const MAX_INLINE_BYTES: usize = 14 * 1024 * 1024;

/// Decode a `data:<mimetype>;base64,<encoded_data>` URI into a [`VideoBlob`].
///
/// # Errors
/// Returns [`ChefError::MediaRead`] if:
/// - The string is not a base64 data URI
/// - The media type is missing or not a video type
/// - The payload is empty, not valid base64, or too large
pub fn decode_data_uri(uri: &str) -> Result<VideoBlob, ChefError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| media_error("expected a data URI starting with 'data:'"))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| media_error("data URI has no ',' separating header and payload"))?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default().trim().to_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(media_error("data URI must use base64 encoding"));
    }
    if !is_video_media_type(&media_type) {
        return Err(media_error(&format!(
            "unrecognized media type '{}'",
            media_type
        )));
    }

    // Some encoders wrap long base64 lines
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(media_error("video payload is empty"));
    }

    let data = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| media_error(&format!("invalid base64 payload: {}", e)))?;

    check_payload(&data)?;
    debug!("Decoded {} video ({} bytes)", media_type, data.len());

    Ok(VideoBlob { media_type, data })
}

/// Encode a blob back into a base64 data URI
pub fn encode_data_uri(blob: &VideoBlob) -> String {
    format!("data:{};base64,{}", blob.media_type, STANDARD.encode(&blob.data))
}

/// Read a video file, inferring its media type from the extension
pub async fn load_video_file(path: &Path) -> Result<VideoBlob, ChefError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let media_type = media_type_for_extension(extension).ok_or_else(|| {
        media_error(&format!(
            "cannot tell the video format of '{}'",
            path.display()
        ))
    })?;

    let data = fs::read(path)
        .await
        .map_err(|e| media_error(&format!("failed to read '{}': {}", path.display(), e)))?;
    check_payload(&data)?;

    Ok(VideoBlob {
        media_type: media_type.to_string(),
        data,
    })
}

/// Media type for a video file extension (case-insensitive)
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    let media_type = match extension.to_lowercase().as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" | "qt" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        _ => return None,
    };
    Some(media_type)
}

fn is_video_media_type(media_type: &str) -> bool {
    match media_type.split_once('/') {
        Some((kind, subtype)) => {
            kind == "video"
                && !subtype.is_empty()
                && subtype
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-+.".contains(c))
        }
        None => false,
    }
}

fn check_payload(data: &[u8]) -> Result<(), ChefError> {
    if data.is_empty() {
        return Err(media_error("video payload is empty"));
    }
    if data.len() > MAX_INLINE_BYTES {
        return Err(media_error(&format!(
            "video is {} bytes, the limit is {} bytes",
            data.len(),
            MAX_INLINE_BYTES
        )));
    }
    Ok(())
}

fn media_error(message: &str) -> ChefError {
    ChefError::MediaRead(message.to_string())
}
