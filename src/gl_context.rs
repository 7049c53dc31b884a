// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use crate::bitmap::Bitmap;
use crate::error::TextureError;
use crate::handles::HardwareTextureId;

/// The slice of a GL context a [`crate::Texture`] needs.
///
/// Every call targets `TEXTURE_2D` and acts on whatever texture is currently
/// bound, exactly like the driver. Callers must stay on the thread that owns
/// the context; holding a `&impl GraphicsContext` is the proof of that.
pub trait GraphicsContext {
    fn generate_texture(&self) -> Result<HardwareTextureId, TextureError>;

    fn bind_texture(&self, texture: Option<HardwareTextureId>);

    fn delete_texture(&self, texture: HardwareTextureId);

    fn tex_parameter_i32(&self, parameter: u32, value: i32);

    fn tex_env_i32(&self, parameter: u32, value: i32);

    /// Allocates storage for the bound texture from tightly packed RGBA8 pixels.
    fn tex_image_2d(&self, width: u32, height: u32, pixels: &[u8]) -> Result<(), TextureError>;

    /// Overwrites a region of the bound texture. Fails with
    /// [`TextureError::InvalidUpload`] if the region does not fit.
    fn tex_sub_image_2d(&self, x: i32, y: i32, bitmap: &Bitmap) -> Result<(), TextureError>;
}

#[cfg(not(target_arch = "wasm32"))]
mod glow_backend {
    use super::*;
    use glow::HasContext;
    use std::num::NonZeroU32;

    fn native(texture: HardwareTextureId) -> Option<glow::Texture> {
        NonZeroU32::new(texture.0).map(glow::NativeTexture)
    }

    /// Throws away errors left behind by unrelated calls so the next check
    /// only sees our own.
    unsafe fn drain_errors(gl: &glow::Context) {
        for _ in 0..16 {
            if gl.get_error() == glow::NO_ERROR {
                break;
            }
        }
    }

    unsafe fn check_upload(gl: &glow::Context, x: i32, y: i32) -> Result<(), TextureError> {
        match gl.get_error() {
            glow::NO_ERROR => Ok(()),
            glow::INVALID_VALUE => Err(TextureError::InvalidUpload {
                x,
                y,
                reason: "GL_INVALID_VALUE".to_string(),
            }),
            glow::INVALID_OPERATION => Err(TextureError::InvalidUpload {
                x,
                y,
                reason: "GL_INVALID_OPERATION".to_string(),
            }),
            glow::INVALID_ENUM => Err(TextureError::InvalidUpload {
                x,
                y,
                reason: "GL_INVALID_ENUM".to_string(),
            }),
            other => Err(TextureError::Context(format!("GL error 0x{:04X}", other))),
        }
    }

    impl GraphicsContext for glow::Context {
        fn generate_texture(&self) -> Result<HardwareTextureId, TextureError> {
            let texture = unsafe { self.create_texture() }.map_err(TextureError::Context)?;
            Ok(HardwareTextureId(texture.0.get()))
        }

        fn bind_texture(&self, texture: Option<HardwareTextureId>) {
            unsafe {
                HasContext::bind_texture(self, glow::TEXTURE_2D, texture.and_then(native));
            }
        }

        fn delete_texture(&self, texture: HardwareTextureId) {
            if let Some(texture) = native(texture) {
                unsafe { HasContext::delete_texture(self, texture) };
            }
        }

        fn tex_parameter_i32(&self, parameter: u32, value: i32) {
            unsafe { HasContext::tex_parameter_i32(self, glow::TEXTURE_2D, parameter, value) };
        }

        fn tex_env_i32(&self, parameter: u32, value: i32) {
            // No fixed-function pipeline in GL3 / ES2+ contexts.
            log::trace!(
                "Ignoring texture environment 0x{:04X} = 0x{:04X}",
                parameter,
                value
            );
        }

        fn tex_image_2d(&self, width: u32, height: u32, pixels: &[u8]) -> Result<(), TextureError> {
            unsafe {
                drain_errors(self);
                HasContext::tex_image_2d(
                    self,
                    glow::TEXTURE_2D,
                    0,
                    glow::RGBA as i32,
                    width as i32,
                    height as i32,
                    0,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    Some(pixels),
                );
                match self.get_error() {
                    glow::NO_ERROR => Ok(()),
                    other => Err(TextureError::Context(format!(
                        "Allocating {}x{} texture storage failed with GL error 0x{:04X}",
                        width, height, other
                    ))),
                }
            }
        }

        fn tex_sub_image_2d(&self, x: i32, y: i32, bitmap: &Bitmap) -> Result<(), TextureError> {
            unsafe {
                drain_errors(self);
                HasContext::tex_sub_image_2d(
                    self,
                    glow::TEXTURE_2D,
                    0,
                    x,
                    y,
                    bitmap.width() as i32,
                    bitmap.height() as i32,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    glow::PixelUnpackData::Slice(bitmap.as_raw()),
                );
                check_upload(self, x, y)
            }
        }
    }
}
