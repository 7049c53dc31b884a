// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use std::cell::RefCell;
use std::collections::HashMap;

use image::GenericImage;

use crate::bitmap::Bitmap;
use crate::error::TextureError;
use crate::gl_context::GraphicsContext;
use crate::handles::HardwareTextureId;

#[derive(Debug)]
struct SoftwareTexture {
    image: Option<Bitmap>,
    parameters: HashMap<u32, i32>,
    env_parameters: HashMap<u32, i32>,
}

#[derive(Debug, Default)]
struct SoftwareState {
    next_id: u32,
    bound: Option<HardwareTextureId>,
    textures: HashMap<HardwareTextureId, SoftwareTexture>,
}

/// A [`GraphicsContext`] that keeps texture storage in system memory.
///
/// Validates uploads the way a GL driver does, which makes it usable for
/// offline atlas compositing as well as for tests. Texture names start at 1
/// and are never reused.
#[derive(Debug, Default)]
pub struct SoftwareContext {
    state: RefCell<SoftwareState>,
}

impl SoftwareContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound_texture(&self) -> Option<HardwareTextureId> {
        self.state.borrow().bound
    }

    pub fn is_texture(&self, texture: HardwareTextureId) -> bool {
        self.state.borrow().textures.contains_key(&texture)
    }

    /// Number of live (generated and not deleted) textures.
    pub fn texture_count(&self) -> usize {
        self.state.borrow().textures.len()
    }

    /// Copy of the texture's storage, `None` if it was never allocated.
    pub fn texture_image(&self, texture: HardwareTextureId) -> Option<Bitmap> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .and_then(|t| t.image.clone())
    }

    pub fn parameter(&self, texture: HardwareTextureId, parameter: u32) -> Option<i32> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .and_then(|t| t.parameters.get(&parameter).copied())
    }

    pub fn env_parameter(&self, texture: HardwareTextureId, parameter: u32) -> Option<i32> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .and_then(|t| t.env_parameters.get(&parameter).copied())
    }

    fn with_bound<R>(
        &self,
        f: impl FnOnce(&mut SoftwareTexture) -> R,
    ) -> Result<R, String> {
        let mut state = self.state.borrow_mut();
        let bound = state.bound.ok_or_else(|| "no texture bound".to_string())?;
        let texture = state
            .textures
            .get_mut(&bound)
            .ok_or_else(|| format!("bound texture {} was deleted", bound))?;
        Ok(f(texture))
    }
}

impl GraphicsContext for SoftwareContext {
    fn generate_texture(&self) -> Result<HardwareTextureId, TextureError> {
        let mut state = self.state.borrow_mut();
        state.next_id = state
            .next_id
            .checked_add(1)
            .ok_or_else(|| TextureError::Context("texture names exhausted".to_string()))?;
        let id = HardwareTextureId(state.next_id);
        state.textures.insert(
            id,
            SoftwareTexture {
                image: None,
                parameters: HashMap::new(),
                env_parameters: HashMap::new(),
            },
        );
        Ok(id)
    }

    fn bind_texture(&self, texture: Option<HardwareTextureId>) {
        self.state.borrow_mut().bound = texture;
    }

    fn delete_texture(&self, texture: HardwareTextureId) {
        let mut state = self.state.borrow_mut();
        state.textures.remove(&texture);
        if state.bound == Some(texture) {
            state.bound = None;
        }
    }

    fn tex_parameter_i32(&self, parameter: u32, value: i32) {
        if let Err(e) = self.with_bound(|t| t.parameters.insert(parameter, value)) {
            log::trace!("Dropped texture parameter 0x{:04X}: {}", parameter, e);
        }
    }

    fn tex_env_i32(&self, parameter: u32, value: i32) {
        if let Err(e) = self.with_bound(|t| t.env_parameters.insert(parameter, value)) {
            log::trace!("Dropped texture environment 0x{:04X}: {}", parameter, e);
        }
    }

    fn tex_image_2d(&self, width: u32, height: u32, pixels: &[u8]) -> Result<(), TextureError> {
        let image = Bitmap::from_raw(width, height, pixels.to_vec()).ok_or_else(|| {
            TextureError::Context(format!(
                "{} bytes of pixel data do not describe a {}x{} RGBA image",
                pixels.len(),
                width,
                height
            ))
        })?;
        self.with_bound(|t| t.image = Some(image))
            .map_err(TextureError::Context)
    }

    fn tex_sub_image_2d(&self, x: i32, y: i32, bitmap: &Bitmap) -> Result<(), TextureError> {
        let invalid = |reason: String| TextureError::InvalidUpload { x, y, reason };

        self.with_bound(|t| {
            let Some(image) = t.image.as_mut() else {
                return Err(invalid("texture storage was never allocated".to_string()));
            };
            let fits = x >= 0
                && y >= 0
                && x as u64 + bitmap.width() as u64 <= image.width() as u64
                && y as u64 + bitmap.height() as u64 <= image.height() as u64;
            if !fits {
                return Err(invalid(format!(
                    "{}x{} region exceeds {}x{} texture",
                    bitmap.width(),
                    bitmap.height(),
                    image.width(),
                    image.height()
                )));
            }
            image
                .copy_from(bitmap, x as u32, y as u32)
                .map_err(|e| invalid(e.to_string()))
        })
        .map_err(invalid)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn allocated(gl: &SoftwareContext, width: u32, height: u32) -> HardwareTextureId {
        let id = gl.generate_texture().expect("Failed to generate texture");
        gl.bind_texture(Some(id));
        gl.tex_image_2d(width, height, &vec![0u8; (width * height * 4) as usize])
            .expect("Failed to allocate storage");
        id
    }

    #[test]
    fn test_generated_names_are_unique_and_non_zero() {
        let gl = SoftwareContext::new();
        let a = gl.generate_texture().unwrap();
        let b = gl.generate_texture().unwrap();
        gl.delete_texture(a);
        let c = gl.generate_texture().unwrap();

        assert_eq!(a, HardwareTextureId(1));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(gl.texture_count(), 2);
    }

    #[test]
    fn test_sub_image_writes_into_region() {
        let gl = SoftwareContext::new();
        let id = allocated(&gl, 4, 4);
        let patch = Bitmap::from_pixel(2, 1, Rgba([255, 0, 0, 255]));

        gl.tex_sub_image_2d(1, 2, &patch).expect("Upload should fit");

        let image = gl.texture_image(id).unwrap();
        assert_eq!(image.get_pixel(1, 2).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(3, 2).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_sub_image_out_of_bounds_is_invalid_upload() {
        let gl = SoftwareContext::new();
        allocated(&gl, 4, 4);
        let patch = Bitmap::from_pixel(2, 2, Rgba([1, 1, 1, 1]));

        assert!(matches!(
            gl.tex_sub_image_2d(3, 0, &patch),
            Err(TextureError::InvalidUpload { x: 3, y: 0, .. })
        ));
        assert!(matches!(
            gl.tex_sub_image_2d(-1, 0, &patch),
            Err(TextureError::InvalidUpload { .. })
        ));
    }

    #[test]
    fn test_sub_image_without_binding_is_invalid_upload() {
        let gl = SoftwareContext::new();
        let patch = Bitmap::from_pixel(1, 1, Rgba([1, 1, 1, 1]));
        assert!(matches!(
            gl.tex_sub_image_2d(0, 0, &patch),
            Err(TextureError::InvalidUpload { .. })
        ));
    }

    #[test]
    fn test_deleting_bound_texture_unbinds_it() {
        let gl = SoftwareContext::new();
        let id = allocated(&gl, 2, 2);
        gl.tex_parameter_i32(glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        assert_eq!(gl.parameter(id, glow::TEXTURE_MIN_FILTER), Some(glow::LINEAR as i32));

        gl.delete_texture(id);

        assert_eq!(gl.bound_texture(), None);
        assert!(!gl.is_texture(id));
        assert_eq!(gl.parameter(id, glow::TEXTURE_MIN_FILTER), None);
    }

    #[test]
    fn test_tex_image_rejects_short_buffer() {
        let gl = SoftwareContext::new();
        let id = gl.generate_texture().unwrap();
        gl.bind_texture(Some(id));
        assert!(matches!(
            gl.tex_image_2d(2, 2, &[0u8; 3]),
            Err(TextureError::Context(_))
        ));
    }
}
