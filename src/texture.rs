// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use std::fmt;
use std::rc::Rc;

use crate::bitmap::placeholder_pixels;
use crate::error::TextureError;
use crate::gl_context::GraphicsContext;
use crate::handles::HardwareTextureId;
use crate::texture_options::{TextureOptions, TEXTURE_ENV_MODE};
use crate::texture_source::{PositionedSource, TextureSource};
use crate::texture_state_listener::TextureStateListener;

/// A power-of-two GPU texture composited from any number of positioned sources.
///
/// Starts unloaded. [`Texture::load`] allocates the hardware object and
/// uploads every source; [`Texture::unload`] deletes it again. Both may be
/// repeated any number of times, and a fresh hardware id is assigned on each
/// load.
pub struct Texture {
    width: u32,
    height: u32,
    hardware_id: Option<HardwareTextureId>,
    loaded: bool,
    options: TextureOptions,
    sources: Vec<PositionedSource>,
    listener: Option<Rc<dyn TextureStateListener>>,
}

impl Texture {
    /// `width` and `height` must be powers of two (32, 64, 128, ...).
    pub fn new(width: u32, height: u32, options: TextureOptions) -> Result<Self, TextureError> {
        Self::build(width, height, options, None)
    }

    /// Like [`Texture::new`], with a listener that is told about loads,
    /// unloads and rejected source uploads.
    pub fn with_listener(
        width: u32,
        height: u32,
        options: TextureOptions,
        listener: Rc<dyn TextureStateListener>,
    ) -> Result<Self, TextureError> {
        Self::build(width, height, options, Some(listener))
    }

    fn build(
        width: u32,
        height: u32,
        options: TextureOptions,
        listener: Option<Rc<dyn TextureStateListener>>,
    ) -> Result<Self, TextureError> {
        if !width.is_power_of_two() || !height.is_power_of_two() {
            return Err(TextureError::NonPowerOfTwo { width, height });
        }

        Ok(Self {
            width,
            height,
            hardware_id: None,
            loaded: false,
            options,
            sources: Vec::new(),
            listener,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn options(&self) -> &TextureOptions {
        &self.options
    }

    /// `None` while unloaded.
    pub fn hardware_id(&self) -> Option<HardwareTextureId> {
        self.hardware_id
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn sources(&self) -> &[PositionedSource] {
        &self.sources
    }

    /// Places `source` with its top-left corner at (`x`, `y`). Overlaps are
    /// allowed; later sources are drawn over earlier ones.
    pub fn add_source(&mut self, source: Rc<dyn TextureSource>, x: i32, y: i32) {
        self.sources.push(PositionedSource::new(source, x, y));
    }

    /// Removes the most recently added entry for this exact source and offset.
    pub fn remove_source(&mut self, source: &Rc<dyn TextureSource>, x: i32, y: i32) {
        if let Some(index) = self.sources.iter().rposition(|s| s.matches(source, x, y)) {
            self.sources.remove(index);
        }
    }

    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }

    /// Creates the hardware texture and uploads every source into it.
    ///
    /// A source without a bitmap is logged and skipped. A source the context
    /// refuses to write is reported to the listener if there is one; without a
    /// listener the load is aborted, the hardware texture is released again and
    /// the error is returned.
    pub fn load<C: GraphicsContext + ?Sized>(&mut self, gl: &C) -> Result<(), TextureError> {
        if self.loaded {
            return Err(TextureError::AlreadyLoaded);
        }

        let id = gl.generate_texture()?;
        self.hardware_id = Some(id);

        if let Err(e) = self.upload(gl, id) {
            gl.delete_texture(id);
            self.hardware_id = None;
            return Err(e);
        }

        self.loaded = true;
        log::debug!(
            "Loaded {}x{} texture {} ({} sources)",
            self.width,
            self.height,
            id,
            self.sources.len()
        );

        if let Some(listener) = &self.listener {
            listener.on_loaded(self);
        }
        Ok(())
    }

    pub fn unload<C: GraphicsContext + ?Sized>(&mut self, gl: &C) {
        let Some(id) = self.hardware_id.take() else {
            log::debug!("Unload of a {}x{} texture that is not on hardware", self.width, self.height);
            return;
        };

        gl.delete_texture(id);
        self.loaded = false;
        log::debug!("Unloaded texture {}", id);

        if let Some(listener) = &self.listener {
            listener.on_unloaded(self);
        }
    }

    /// Forgets the hardware texture without asking the context to delete it,
    /// for when the context itself was lost and took its objects with it.
    pub fn invalidate(&mut self) {
        self.hardware_id = None;
        self.loaded = false;
    }

    fn upload<C: GraphicsContext + ?Sized>(
        &self,
        gl: &C,
        id: HardwareTextureId,
    ) -> Result<(), TextureError> {
        gl.bind_texture(Some(id));
        gl.tex_image_2d(
            self.width,
            self.height,
            &placeholder_pixels(self.width, self.height)?,
        )?;
        self.apply_options(gl);
        self.write_sources(gl)
    }

    fn apply_options<C: GraphicsContext + ?Sized>(&self, gl: &C) {
        let options = &self.options;
        gl.tex_parameter_i32(glow::TEXTURE_MIN_FILTER, options.min_filter.gl_value() as i32);
        gl.tex_parameter_i32(glow::TEXTURE_MAG_FILTER, options.mag_filter.gl_value() as i32);
        gl.tex_parameter_i32(glow::TEXTURE_WRAP_S, options.wrap_s.gl_value() as i32);
        gl.tex_parameter_i32(glow::TEXTURE_WRAP_T, options.wrap_t.gl_value() as i32);
        gl.tex_env_i32(TEXTURE_ENV_MODE, options.environment.gl_value() as i32);
    }

    fn write_sources<C: GraphicsContext + ?Sized>(&self, gl: &C) -> Result<(), TextureError> {
        for source in &self.sources {
            let Some(bitmap) = source.bitmap() else {
                log::error!("Bitmap was null! TextureSource: {}", source);
                continue;
            };

            let result = gl.tex_sub_image_2d(source.x(), source.y(), &bitmap);
            // Release the pixels before the next source is decoded.
            drop(bitmap);

            match result {
                Ok(()) => log::trace!("Uploaded {} at ({}, {})", source, source.x(), source.y()),
                Err(e) => {
                    log::error!("Error loading: {}: {}", source, e);
                    match &self.listener {
                        Some(listener) => listener.on_source_upload_failure(self, source, &e),
                        None => return Err(e),
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("hardware_id", &self.hardware_id)
            .field("loaded", &self.loaded)
            .field("options", &self.options)
            .field("sources", &self.sources)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
