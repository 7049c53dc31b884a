// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::Rgba;

use crate::bitmap::Bitmap;
use crate::error::TextureError;

/// Something that can produce pixels for a region of a texture.
///
/// `bitmap` is called once per load and may fail by returning `None`; the
/// bitmap is dropped as soon as it has been uploaded.
pub trait TextureSource: fmt::Display {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn bitmap(&self) -> Option<Bitmap>;
}

/// A source placed at a fixed offset within a texture.
#[derive(Clone)]
pub struct PositionedSource {
    source: Rc<dyn TextureSource>,
    x: i32,
    y: i32,
}

impl PositionedSource {
    pub fn new(source: Rc<dyn TextureSource>, x: i32, y: i32) -> Self {
        Self { source, x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn source(&self) -> &Rc<dyn TextureSource> {
        &self.source
    }

    /// Same source allocation at the same offset.
    pub fn matches(&self, source: &Rc<dyn TextureSource>, x: i32, y: i32) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.source), Rc::as_ptr(source))
            && self.x == x
            && self.y == y
    }
}

impl TextureSource for PositionedSource {
    fn width(&self) -> u32 {
        self.source.width()
    }

    fn height(&self) -> u32 {
        self.source.height()
    }

    fn bitmap(&self) -> Option<Bitmap> {
        self.source.bitmap()
    }
}

impl fmt::Display for PositionedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl fmt::Debug for PositionedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionedSource")
            .field("source", &self.source.to_string())
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

/// Image file decoded from disk every time a bitmap is requested.
#[derive(Debug, Clone)]
pub struct FileTextureSource {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl FileTextureSource {
    /// Reads only the image header to learn the dimensions.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref().to_path_buf();
        let (width, height) = image::image_dimensions(&path)?;
        Ok(Self {
            path,
            width,
            height,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextureSource for FileTextureSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bitmap(&self) -> Option<Bitmap> {
        match image::open(&self.path) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                log::warn!("Failed to decode {:?}: {}", self.path, e);
                None
            }
        }
    }
}

impl fmt::Display for FileTextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileTextureSource({})", self.path.display())
    }
}

/// Encoded image bytes kept in memory, e.g. from `include_bytes!`.
#[derive(Debug, Clone)]
pub struct EncodedTextureSource {
    name: String,
    bytes: Rc<[u8]>,
    width: u32,
    height: u32,
}

impl EncodedTextureSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Rc<[u8]>>) -> Result<Self, TextureError> {
        let bytes = bytes.into();
        let decoded = image::load_from_memory(&bytes)?;
        Ok(Self {
            name: name.into(),
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }
}

impl TextureSource for EncodedTextureSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bitmap(&self) -> Option<Bitmap> {
        match image::load_from_memory(&self.bytes) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                log::warn!("Failed to decode {}: {}", self.name, e);
                None
            }
        }
    }
}

impl fmt::Display for EncodedTextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedTextureSource({})", self.name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SolidColorTextureSource {
    width: u32,
    height: u32,
    color: Rgba<u8>,
}

impl SolidColorTextureSource {
    pub fn new(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            color: Rgba(rgba),
        }
    }
}

impl TextureSource for SolidColorTextureSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bitmap(&self) -> Option<Bitmap> {
        Some(Bitmap::from_pixel(self.width, self.height, self.color))
    }
}

impl fmt::Display for SolidColorTextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.color.0;
        write!(
            f,
            "SolidColorTextureSource({}x{} #{:02x}{:02x}{:02x}{:02x})",
            self.width, self.height, r, g, b, a
        )
    }
}

/// Pixels generated per texel by a function of (x, y).
pub struct ProceduralTextureSource<F>
where
    F: Fn(u32, u32) -> Rgba<u8>,
{
    name: String,
    width: u32,
    height: u32,
    generator: F,
}

impl<F> ProceduralTextureSource<F>
where
    F: Fn(u32, u32) -> Rgba<u8>,
{
    pub fn new(name: impl Into<String>, width: u32, height: u32, generator: F) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            generator,
        }
    }
}

impl<F> TextureSource for ProceduralTextureSource<F>
where
    F: Fn(u32, u32) -> Rgba<u8>,
{
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bitmap(&self) -> Option<Bitmap> {
        Some(Bitmap::from_fn(self.width, self.height, |x, y| {
            (self.generator)(x, y)
        }))
    }
}

impl<F> fmt::Display for ProceduralTextureSource<F>
where
    F: Fn(u32, u32) -> Rgba<u8>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProceduralTextureSource({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn encode_png(bitmap: &Bitmap) -> Vec<u8> {
        let mut bytes = Vec::new();
        bitmap
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("Failed to encode png");
        bytes
    }

    #[test]
    fn test_positioned_source_delegates_to_wrapped_source() {
        let solid: Rc<dyn TextureSource> = Rc::new(SolidColorTextureSource::new(8, 4, [1, 2, 3, 4]));
        let positioned = PositionedSource::new(solid.clone(), 16, 32);

        assert_eq!(positioned.width(), 8);
        assert_eq!(positioned.height(), 4);
        assert_eq!(positioned.x(), 16);
        assert_eq!(positioned.y(), 32);
        assert_eq!(positioned.to_string(), solid.to_string());
        let bitmap = positioned.bitmap().expect("Solid source always has a bitmap");
        assert_eq!(bitmap.get_pixel(7, 3).0, [1, 2, 3, 4]);
    }

    #[test]
    fn test_matches_uses_identity_not_equality() {
        let a: Rc<dyn TextureSource> = Rc::new(SolidColorTextureSource::new(2, 2, [0, 0, 0, 255]));
        let b: Rc<dyn TextureSource> = Rc::new(SolidColorTextureSource::new(2, 2, [0, 0, 0, 255]));
        let positioned = PositionedSource::new(a.clone(), 0, 0);

        assert!(positioned.matches(&a, 0, 0));
        assert!(!positioned.matches(&b, 0, 0));
        assert!(!positioned.matches(&a, 1, 0));
    }

    #[test]
    fn test_procedural_source_generates_per_texel() {
        let checker = ProceduralTextureSource::new("checker", 4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let bitmap = checker.bitmap().expect("Procedural source always has a bitmap");
        assert_eq!(bitmap.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(bitmap.get_pixel(1, 0).0, [0, 0, 0, 255]);
        assert_eq!(checker.to_string(), "ProceduralTextureSource(checker)");
    }

    #[test]
    fn test_encoded_source_reads_dimensions_and_decodes() {
        let original = Bitmap::from_pixel(3, 5, Rgba([10, 20, 30, 255]));
        let source = EncodedTextureSource::new("sprite.png", encode_png(&original))
            .expect("Failed to create encoded source");

        assert_eq!((source.width(), source.height()), (3, 5));
        assert_eq!(source.bitmap(), Some(original));
    }

    #[test]
    fn test_encoded_source_rejects_garbage() {
        let result = EncodedTextureSource::new("garbage", vec![0u8, 1, 2, 3]);
        assert!(matches!(result, Err(TextureError::Image(_))));
    }

    #[test]
    fn test_file_source_returns_none_once_file_is_gone() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("tile.png");
        Bitmap::from_pixel(2, 2, Rgba([9, 9, 9, 255]))
            .save(&path)
            .expect("Failed to write png");

        let source = FileTextureSource::new(&path).expect("Failed to create file source");
        assert_eq!((source.width(), source.height()), (2, 2));
        assert!(source.bitmap().is_some());

        std::fs::remove_file(&path).expect("Failed to remove png");
        assert!(source.bitmap().is_none());
    }

    #[test]
    fn test_file_source_missing_file_fails_construction() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let result = FileTextureSource::new(dir.path().join("missing.png"));
        assert!(result.is_err());
    }
}
