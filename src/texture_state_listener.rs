// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use crate::error::TextureError;
use crate::texture::Texture;
use crate::texture_source::PositionedSource;

/// Observer of a [`Texture`]'s hardware lifecycle.
///
/// Registering a listener also changes the failure policy of
/// [`Texture::load`]: a rejected sub-image upload is handed to
/// `on_source_upload_failure` instead of aborting the load.
pub trait TextureStateListener {
    fn on_loaded(&self, _texture: &Texture) {}

    fn on_unloaded(&self, _texture: &Texture) {}

    fn on_source_upload_failure(
        &self,
        _texture: &Texture,
        _source: &PositionedSource,
        _cause: &TextureError,
    ) {
    }
}

/// Swallows every notification. Useful to make upload failures non-fatal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTextureStateListener;

impl TextureStateListener for NoopTextureStateListener {}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTextureStateListener;

impl TextureStateListener for LoggingTextureStateListener {
    fn on_loaded(&self, texture: &Texture) {
        log::info!(
            "Loaded {}x{} texture {:?} with {} source(s)",
            texture.width(),
            texture.height(),
            texture.hardware_id(),
            texture.sources().len()
        );
    }

    fn on_unloaded(&self, texture: &Texture) {
        log::info!("Unloaded {}x{} texture", texture.width(), texture.height());
    }

    fn on_source_upload_failure(
        &self,
        _texture: &Texture,
        source: &PositionedSource,
        cause: &TextureError,
    ) {
        log::warn!(
            "Skipped {} at ({}, {}): {}",
            source,
            source.x(),
            source.y(),
            cause
        );
    }
}
