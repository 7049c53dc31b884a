// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use crate::error::TextureError;

/// CPU-side pixels handed to the graphics context: RGBA8, row-major, tightly packed.
pub type Bitmap = image::RgbaImage;

/// Zero-filled (transparent black) RGBA8 buffer used to allocate texture storage.
///
/// Fails instead of panicking when the size does not fit in memory.
pub fn placeholder_pixels(width: u32, height: u32) -> Result<Vec<u8>, TextureError> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|texels| texels.checked_mul(4))
        .ok_or_else(|| {
            TextureError::Context(format!(
                "{}x{} placeholder overflows the address space",
                width, height
            ))
        })?;

    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).map_err(|e| {
        TextureError::Context(format!(
            "Cannot allocate {}x{} placeholder: {}",
            width, height, e
        ))
    })?;
    pixels.resize(len, 0u8);
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_transparent_and_sized() {
        let pixels = placeholder_pixels(4, 2).expect("Small placeholder fits");
        assert_eq!(pixels.len(), 32);
        assert!(pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_oversized_placeholder_is_an_error() {
        let result = placeholder_pixels(1 << 31, 1 << 31);
        assert!(matches!(result, Err(TextureError::Context(_))));
    }
}
