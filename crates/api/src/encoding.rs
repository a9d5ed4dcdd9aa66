//! Frame-to-wire image encoding.
//!
//! Frames and annotated images ship to clients as JPEG data URIs inside
//! JSON bodies.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::RgbImage;

use crate::error::AppError;

/// Encode a frame as a `data:image/jpeg;base64,...` URI.
pub fn jpeg_data_uri(image: &RgbImage) -> Result<String, AppError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .map_err(|e| AppError::InternalError(format!("failed to encode frame: {e}")))?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        BASE64.encode(buf.get_ref())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn data_uri_round_trips_through_jpeg() {
        let img = RgbImage::from_pixel(64, 48, Rgb([200, 30, 30]));

        let uri = jpeg_data_uri(&img).unwrap();
        let payload = uri.strip_prefix("data:image/jpeg;base64,").unwrap();

        let bytes = BASE64.decode(payload).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
    }
}
