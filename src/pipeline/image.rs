use base64::{engine::general_purpose, Engine};

use crate::errors::PipelineError;
use crate::models::ImagePayload;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Turn the `image` field of a request into a payload for the vision model.
///
/// Accepts raw base64 or a `data:<mime>;base64,<data>` URL as produced by
/// `FileReader.readAsDataURL`.
pub fn decode_image_payload(raw: &str) -> Result<ImagePayload, PipelineError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(rejected("No image data provided".to_string()));
    }

    let (declared_mime, data) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| rejected("Malformed image data URL".to_string()))?;
            let params = header
                .strip_suffix(";base64")
                .ok_or_else(|| rejected("Image data URL is not base64".to_string()))?;
            // Drop parameters such as `;name=photo.jpg`
            let mime = params.split(';').next().unwrap_or_default().trim();
            (Some(mime.to_string()).filter(|m| m.starts_with("image/")), data)
        }
        None => (None, raw),
    };

    let bytes = general_purpose::STANDARD
        .decode(data)
        .map_err(|e| rejected(format!("Image is not valid base64: {}", e)))?;

    if bytes.is_empty() {
        return Err(rejected("No image data provided".to_string()));
    }

    let mime_type = declared_mime
        .or_else(|| sniff_mime_type(&bytes).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

    log::debug!("📊 Image size: {} bytes ({})", bytes.len(), mime_type);

    Ok(ImagePayload {
        mime_type,
        data: data.to_string(),
    })
}

fn rejected(reason: String) -> PipelineError {
    log::warn!("⚠️ Rejected image: {}", reason);
    PipelineError::Input(reason)
}

fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
