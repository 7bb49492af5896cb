use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GenericImageView;

use super::error::LogoError;

/// A decoded logo, flattened onto white and deflate-compressed as 8-bit RGB
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Logo {
    /// Read and decode a PNG or JPEG logo from disk.
    ///
    /// The file handle is closed before this returns.
    pub fn load(path: &Path) -> Result<Self, LogoError> {
        let bytes = fs::read(path).map_err(|source| LogoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LogoError> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(LogoError::Empty);
        }

        // Alpha is blended against the white page
        let rgba = decoded.to_rgba8();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            for channel in [r, g, b] {
                let blended = (channel as u32 * a as u32 + 255 * (255 - a as u32)) / 255;
                rgb.push(blended as u8);
            }
        }

        Ok(Self {
            width,
            height,
            data: flate_compress(&rgb).map_err(LogoError::Compress)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Zlib stream for a FlateDecode image XObject
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn flate_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use flate2::read::ZlibDecoder;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut raw = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut raw).unwrap();
        raw
    }

    fn png(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, pixel));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png() {
        let logo = Logo::from_bytes(&png(4, 2, Rgba([46, 134, 193, 255]))).unwrap();
        assert_eq!((logo.width(), logo.height()), (4, 2));

        let raw = inflate(logo.data());
        assert_eq!(raw.len(), 4 * 2 * 3);
        assert_eq!(&raw[..3], &[46, 134, 193]);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let logo = Logo::from_bytes(&png(1, 1, Rgba([0, 0, 0, 0]))).unwrap();
        let raw = inflate(logo.data());
        assert_eq!(raw, vec![255, 255, 255]);
    }

    #[test]
    fn compressed_stream_inflates_to_its_input() {
        let data: Vec<u8> = (0..=255u8).cycle().take(3 * 1024).collect();
        let compressed = flate_compress(&data).unwrap();
        assert!(!compressed.is_empty());
        assert_eq!(inflate(&compressed), data);
    }

    #[test]
    fn compress_failure_names_the_logo() {
        let err = LogoError::Compress(std::io::Error::other("sink closed"));
        assert_eq!(err.to_string(), "failed to compress logo: sink closed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Logo::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, LogoError::Decode(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Logo::load(Path::new("/nonexistent/logo.png")).unwrap_err();
        assert!(matches!(err, LogoError::Io { .. }));
    }
}
