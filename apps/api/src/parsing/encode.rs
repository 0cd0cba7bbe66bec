use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::PageImage;

/// Wraps a rendered page as a `data:` URL for an `image_url` content part.
pub fn to_data_url(page: &PageImage) -> String {
    format!("data:{};base64,{}", page.mime, STANDARD.encode(&page.bytes))
}
