//! Image stream decoding.
//!
//! JPEG (`DCTDecode`) and JPEG2000 (`JPXDecode`) streams already hold a
//! complete file in their native container and pass through verbatim.
//! `FlateDecode` or unfiltered streams are raw samples and are reassembled
//! into a PNG from the stream dictionary's geometry entries.

use std::io::{Cursor, Read};

use flate2::read::ZlibDecoder;
use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Document, Object, Stream};

#[derive(Debug)]
pub(crate) struct DecodedImage {
    pub data: Vec<u8>,
    pub ext: &'static str,
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// First filter name, if any (`Filter` may be a name or an array).
fn primary_filter(stream: &Stream) -> Option<String> {
    stream.dict.get(b"Filter").ok().and_then(|f| match f {
        Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
        Object::Array(arr) => arr.first().and_then(|f| match f {
            Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
            _ => None,
        }),
        _ => None,
    })
}

fn dict_u32(stream: &Stream, key: &[u8]) -> Result<u32, String> {
    stream
        .dict
        .get(key)
        .ok()
        .and_then(|o| o.as_i64().ok())
        .map(|v| v as u32)
        .ok_or_else(|| format!("missing {} entry", String::from_utf8_lossy(key)))
}

/// Color space name; arrays (e.g. `[/ICCBased 12 0 R]`) report their head.
fn color_space_name(doc: &Document, stream: &Stream) -> String {
    let object = match stream.dict.get(b"ColorSpace") {
        Ok(o) => resolve(doc, o),
        Err(_) => return "DeviceGray".to_string(),
    };

    match object {
        Object::Name(n) => String::from_utf8_lossy(n).to_string(),
        Object::Array(arr) => arr
            .first()
            .map(|head| match resolve(doc, head) {
                Object::Name(n) => String::from_utf8_lossy(n).to_string(),
                _ => "Unknown".to_string(),
            })
            .unwrap_or_else(|| "Unknown".to_string()),
        _ => "Unknown".to_string(),
    }
}

/// Decode one image XObject stream into file bytes plus extension.
pub(crate) fn decode_image(doc: &Document, stream: &Stream) -> Result<DecodedImage, String> {
    match primary_filter(stream).as_deref() {
        // Native JPEG, pass through untouched
        Some("DCTDecode") => Ok(DecodedImage {
            data: stream.content.clone(),
            ext: "jpg",
        }),
        // Native JPEG2000
        Some("JPXDecode") => Ok(DecodedImage {
            data: stream.content.clone(),
            ext: "jp2",
        }),
        Some("FlateDecode") => {
            let mut decoder = ZlibDecoder::new(&stream.content[..]);
            let mut decoded = Vec::new();
            decoder
                .read_to_end(&mut decoded)
                .map_err(|e| format!("FlateDecode failed: {}", e))?;
            raw_to_png(doc, stream, decoded)
        }
        None => raw_to_png(doc, stream, stream.content.clone()),
        Some(other) => Err(format!("Unsupported image filter: {}", other)),
    }
}

/// Reassemble raw samples into a PNG; PNG is the fallback format when the
/// stream has no native container.
fn raw_to_png(doc: &Document, stream: &Stream, samples: Vec<u8>) -> Result<DecodedImage, String> {
    let width = dict_u32(stream, b"Width")?;
    let height = dict_u32(stream, b"Height")?;
    let bits = stream
        .dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8) as u32;
    let color_space = color_space_name(doc, stream);

    if bits != 8 {
        return Err(format!("Unsupported bit depth: {}", bits));
    }

    let img = samples_to_image(&samples, width, height, &color_space)?;

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| format!("PNG encode failed: {}", e))?;

    Ok(DecodedImage {
        data: png,
        ext: "png",
    })
}

fn samples_to_image(
    samples: &[u8],
    width: u32,
    height: u32,
    color_space: &str,
) -> Result<DynamicImage, String> {
    let pixels = (width as usize) * (height as usize);

    match color_space {
        "DeviceRGB" | "CalRGB" => {
            let expected = pixels * 3;
            if samples.len() < expected {
                return Err(format!(
                    "RGB sample data too short: {} bytes (expected {})",
                    samples.len(),
                    expected
                ));
            }
            let img = RgbImage::from_raw(width, height, samples[..expected].to_vec())
                .ok_or("Failed to build RGB image from samples")?;
            Ok(DynamicImage::ImageRgb8(img))
        }
        "DeviceGray" | "CalGray" => {
            if samples.len() < pixels {
                return Err(format!(
                    "Gray sample data too short: {} bytes (expected {})",
                    samples.len(),
                    pixels
                ));
            }
            let img = GrayImage::from_raw(width, height, samples[..pixels].to_vec())
                .ok_or("Failed to build grayscale image from samples")?;
            Ok(DynamicImage::ImageLuma8(img))
        }
        "DeviceCMYK" => {
            let expected = pixels * 4;
            if samples.len() < expected {
                return Err(format!(
                    "CMYK sample data too short: {} bytes (expected {})",
                    samples.len(),
                    expected
                ));
            }
            let mut rgb = Vec::with_capacity(pixels * 3);
            for chunk in samples[..expected].chunks(4) {
                let c = chunk[0] as f32 / 255.0;
                let m = chunk[1] as f32 / 255.0;
                let y = chunk[2] as f32 / 255.0;
                let k = chunk[3] as f32 / 255.0;
                rgb.push(((1.0 - c) * (1.0 - k) * 255.0) as u8);
                rgb.push(((1.0 - m) * (1.0 - k) * 255.0) as u8);
                rgb.push(((1.0 - y) * (1.0 - k) * 255.0) as u8);
            }
            let img = RgbImage::from_raw(width, height, rgb)
                .ok_or("Failed to build RGB image from CMYK samples")?;
            Ok(DynamicImage::ImageRgb8(img))
        }
        // ICC profiles don't name a layout; guess from the sample count
        "ICCBased" => {
            if samples.len() >= pixels * 3 {
                let img = RgbImage::from_raw(width, height, samples[..pixels * 3].to_vec())
                    .ok_or("Failed to build RGB image from ICCBased samples")?;
                Ok(DynamicImage::ImageRgb8(img))
            } else if samples.len() >= pixels {
                let img = GrayImage::from_raw(width, height, samples[..pixels].to_vec())
                    .ok_or("Failed to build grayscale image from ICCBased samples")?;
                Ok(DynamicImage::ImageLuma8(img))
            } else {
                Err("Could not determine ICCBased sample layout".to_string())
            }
        }
        other => Err(format!("Unsupported color space: {}", other)),
    }
}
