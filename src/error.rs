// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Width and height of a texture must be a power of two (got {width}x{height})")]
    NonPowerOfTwo { width: u32, height: u32 },

    #[error("Texture is already loaded to hardware")]
    AlreadyLoaded,

    /// The driver rejected a sub-image write (region out of bounds, nothing
    /// bound, format mismatch).
    #[error("Invalid sub-image upload at ({x}, {y}): {reason}")]
    InvalidUpload { x: i32, y: i32, reason: String },

    #[error("Graphics context error: {0}")]
    Context(String),

    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}
