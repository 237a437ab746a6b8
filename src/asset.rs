// Sprite loading. Decoding goes through the `image` crate; only 32-bit files
// are accepted, and ones without an alpha mask (BI_RGB) come out opaque.

use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat};
use tracing::{info, warn};

use crate::error::Error;
use crate::types::{argb, Bitmap};

pub const PLACEHOLDER_SIZE: usize = 64;
/// Checker cell edge in pixels.
pub const CHECKER_CELL: usize = 8;
pub const CHECKER_A: u32 = 0xFF_FF_00_FF;
pub const CHECKER_B: u32 = 0xFF_00_00_00;

/// Read and decode a BMP file.
pub fn load_bitmap(path: &Path) -> Result<Bitmap, Error> {
    let bytes = std::fs::read(path).map_err(|e| Error::AssetLoad(format!("{}: {e}", path.display())))?;
    decode_bitmap(&bytes)
}

/// Decode BMP bytes into a packed ARGB bitmap.
pub fn decode_bitmap(bytes: &[u8]) -> Result<Bitmap, Error> {
    let bpp = bits_per_pixel(bytes)?;
    if bpp != 32 {
        return Err(Error::AssetFormat(format!("expected 32 bits per pixel, got {bpp}")));
    }
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Bmp)
        .map_err(|e| Error::AssetLoad(format!("Decode BMP: {e}")))?;
    to_bitmap(img)
}

/// `biBitCount` straight from the header. The decoder reports 32-bit BI_RGB
/// files as RGB, so its colour type can't tell us the stored depth.
fn bits_per_pixel(bytes: &[u8]) -> Result<u16, Error> {
    if bytes.len() < 30 || &bytes[..2] != b"BM" {
        return Err(Error::AssetLoad("Decode BMP: missing BM header".into()));
    }
    let header_size = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);
    // BITMAPCOREHEADER has 16-bit dimensions, which moves the field up
    let at = if header_size == 12 { 24 } else { 28 };
    Ok(u16::from_le_bytes([bytes[at], bytes[at + 1]]))
}

fn to_bitmap(img: DynamicImage) -> Result<Bitmap, Error> {
    // no alpha channel in the file means every pixel is opaque
    let has_alpha = match img.color() {
        ColorType::Rgba8 => true,
        ColorType::Rgb8 => false,
        other => return Err(Error::AssetFormat(format!("unsupported pixel layout {other:?}"))),
    };
    let rgba = img.into_rgba8();
    let (w, h) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|p| argb(if has_alpha { p[3] } else { 0xFF }, p[0], p[1], p[2]))
        .collect();
    Bitmap::new(w as usize, h as usize, pixels)
        .ok_or_else(|| Error::AssetFormat(format!("pixel count does not match {w}x{h}")))
}

/// Procedural stand-in: two colours alternating every `CHECKER_CELL` pixels.
pub fn checkerboard(width: usize, height: usize) -> Bitmap {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let odd = (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 1;
            pixels.push(if odd { CHECKER_B } else { CHECKER_A });
        }
    }
    Bitmap::new(width, height, pixels).unwrap_or_else(|| Bitmap::filled(width, height, CHECKER_A))
}

/// Load the sprite at `path`, or fall back to the checkerboard with a warning.
pub fn load_or_placeholder(path: Option<&Path>) -> Bitmap {
    let Some(path) = path else {
        info!("no sprite configured, using placeholder");
        return checkerboard(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE);
    };
    match load_bitmap(path) {
        Ok(bmp) => {
            info!(path = %path.display(), width = bmp.width(), height = bmp.height(), "loaded sprite");
            bmp
        }
        Err(e) => {
            warn!("{e}; using placeholder sprite");
            checkerboard(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_bmp(img: DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Bmp).unwrap();
        out.into_inner()
    }

    #[test]
    fn rgba_bmp_decodes_to_argb() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 128]));
        img.put_pixel(2, 1, Rgba([1, 2, 3, 255]));
        let bmp = decode_bitmap(&encode_bmp(DynamicImage::ImageRgba8(img))).unwrap();
        assert_eq!((bmp.width(), bmp.height()), (3, 2));
        assert_eq!(bmp.pixels()[0], argb(128, 255, 0, 0));
        assert_eq!(bmp.pixels()[5], argb(255, 1, 2, 3));
    }

    #[test]
    fn rgb_bmp_is_rejected() {
        let img = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        let err = decode_bitmap(&encode_bmp(DynamicImage::ImageRgb8(img))).unwrap_err();
        assert!(matches!(err, Error::AssetFormat(_)), "{err}");
    }

    /// 2x1 BITMAPINFOHEADER file, 32 bpp, BI_RGB, pixels stored as BGRX.
    fn bi_rgb_32(pixels: [[u8; 4]; 2]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&62u32.to_le_bytes()); // file size
        out.extend_from_slice(&[0; 4]); // reserved
        out.extend_from_slice(&54u32.to_le_bytes()); // pixel data offset
        out.extend_from_slice(&40u32.to_le_bytes()); // biSize
        out.extend_from_slice(&2i32.to_le_bytes()); // biWidth
        out.extend_from_slice(&1i32.to_le_bytes()); // biHeight, bottom-up
        out.extend_from_slice(&1u16.to_le_bytes()); // biPlanes
        out.extend_from_slice(&32u16.to_le_bytes()); // biBitCount
        out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        out.extend_from_slice(&8u32.to_le_bytes()); // biSizeImage
        out.extend_from_slice(&[0; 16]); // resolution, palette counts
        for p in pixels {
            out.extend_from_slice(&p);
        }
        out
    }

    #[test]
    fn bi_rgb_32bpp_decodes_opaque() {
        let bytes = bi_rgb_32([[3, 2, 1, 0], [0, 0, 255, 0]]);
        let bmp = decode_bitmap(&bytes).unwrap();
        assert_eq!((bmp.width(), bmp.height()), (2, 1));
        assert_eq!(bmp.pixels(), &[argb(0xFF, 1, 2, 3), argb(0xFF, 255, 0, 0)]);
    }

    #[test]
    fn header_depth_is_read_from_file() {
        assert_eq!(bits_per_pixel(&bi_rgb_32([[0; 4]; 2])).unwrap(), 32);
        let rgb = encode_bmp(DynamicImage::ImageRgb8(RgbImage::new(1, 1)));
        assert_eq!(bits_per_pixel(&rgb).unwrap(), 24);
    }

    #[test]
    fn garbage_is_a_load_error() {
        assert!(matches!(decode_bitmap(b"not a bitmap"), Err(Error::AssetLoad(_))));
    }

    #[test]
    fn checkerboard_alternates_every_eight_pixels() {
        let bmp = checkerboard(32, 32);
        let at = |x: usize, y: usize| bmp.pixels()[y * 32 + x];
        assert_eq!(at(0, 0), CHECKER_A);
        assert_eq!(at(7, 7), CHECKER_A);
        assert_eq!(at(8, 0), CHECKER_B);
        assert_eq!(at(0, 8), CHECKER_B);
        assert_eq!(at(8, 8), CHECKER_A);
        assert_eq!(at(31, 16), CHECKER_B);
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let bmp = load_or_placeholder(Some(&dir.path().join("nope.bmp")));
        assert_eq!(bmp, checkerboard(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
    }

    #[test]
    fn file_on_disk_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.bmp");
        let img = RgbaImage::from_pixel(5, 7, Rgba([10, 20, 30, 40]));
        std::fs::write(&path, encode_bmp(DynamicImage::ImageRgba8(img))).unwrap();
        let bmp = load_or_placeholder(Some(&path));
        assert_eq!((bmp.width(), bmp.height()), (5, 7));
        assert!(bmp.pixels().iter().all(|&p| p == argb(40, 10, 20, 30)));
    }
}
