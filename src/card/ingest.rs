//! Background image ingestion: decode + EXIF orientation correction.

use std::io::Cursor;

use image::DynamicImage;

use super::CardError;

/// Decode JPEG/PNG bytes and rotate/flip the pixels so they match the
/// intended visual orientation. Byte acquisition (upload, URL fetch) is the
/// caller's problem; this never touches the network.
pub fn ingest(bytes: &[u8]) -> Result<DynamicImage, CardError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CardError::ImageDecode(e.to_string()))?;

    let orientation = exif_orientation(bytes).unwrap_or(1);
    Ok(apply_orientation(img, orientation))
}

/// EXIF orientation tag (1..=8), if the container carries one.
/// Plain PNGs without an eXIf chunk simply report `None`.
fn exif_orientation(bytes: &[u8]) -> Option<u32> {
    let mut reader = std::io::BufReader::new(Cursor::new(bytes));
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
}

/// Apply one of the eight EXIF orientations. Unknown values pass through.
fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    use image::imageops;

    match orientation {
        2 => DynamicImage::ImageRgba8(imageops::flip_horizontal(&img)),
        3 => DynamicImage::ImageRgba8(imageops::rotate180(&img)),
        4 => DynamicImage::ImageRgba8(imageops::flip_vertical(&img)),
        5 => DynamicImage::ImageRgba8(imageops::flip_horizontal(&imageops::rotate90(&img))),
        6 => DynamicImage::ImageRgba8(imageops::rotate90(&img)),
        7 => DynamicImage::ImageRgba8(imageops::flip_horizontal(&imageops::rotate270(&img))),
        8 => DynamicImage::ImageRgba8(imageops::rotate270(&img)),
        _ => img,
    }
}
