// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

pub mod bitmap;
pub mod error;
pub mod gl_context;
pub mod handles;
pub mod settings;
pub mod software_context;
pub mod texture;
pub mod texture_options;
pub mod texture_resource_manager;
pub mod texture_source;
pub mod texture_state_listener;

#[cfg(test)]
mod test_support;

pub use crate::bitmap::Bitmap;
pub use crate::error::TextureError;
pub use crate::gl_context::GraphicsContext;
pub use crate::handles::{HardwareTextureId, TextureHandle};
pub use crate::settings::{AtlasManifest, ManifestError, SourceEntry};
pub use crate::software_context::SoftwareContext;
pub use crate::texture::Texture;
pub use crate::texture_options::{TextureEnvironment, TextureFilter, TextureOptions, TextureWrap};
pub use crate::texture_resource_manager::TextureResourceManager;
pub use crate::texture_source::{
    EncodedTextureSource, FileTextureSource, PositionedSource, ProceduralTextureSource,
    SolidColorTextureSource, TextureSource,
};
pub use crate::texture_state_listener::{
    LoggingTextureStateListener, NoopTextureStateListener, TextureStateListener,
};
