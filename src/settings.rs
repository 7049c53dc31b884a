// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};
use thiserror::Error;

use crate::error::TextureError;
use crate::texture::Texture;
use crate::texture_options::TextureOptions;
use crate::texture_source::{FileTextureSource, SolidColorTextureSource, TextureSource};
use crate::texture_state_listener::TextureStateListener;

/// One entry of an atlas manifest, placed at (`x`, `y`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceEntry {
    /// Image file; relative paths resolve against the manifest's directory.
    File { path: PathBuf, x: i32, y: i32 },
    Solid {
        width: u32,
        height: u32,
        color: [u8; 4],
        x: i32,
        y: i32,
    },
}

/// TOML description of a single composited texture.
///
/// ```toml
/// width = 256
/// height = 256
///
/// [options]
/// min_filter = "linear"
/// mag_filter = "linear"
/// wrap_s = "clamp_to_edge"
/// wrap_t = "clamp_to_edge"
/// environment = "modulate"
///
/// [[sources]]
/// kind = "file"
/// path = "sprites/player.png"
/// x = 0
/// y = 0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasManifest {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub options: TextureOptions,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Cannot read or write atlas manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed atlas manifest: {0}")]
    Serde(#[from] toml::de::Error),

    #[error("Cannot encode atlas manifest: {0}")]
    SerdeSer(#[from] toml::ser::Error),

    #[error("Atlas manifest describes an unusable texture: {0}")]
    Texture(#[from] TextureError),
}

impl AtlasManifest {
    /// Parses the TOML manifest at `path`. Source paths are left relative;
    /// they are resolved by [`AtlasManifest::build_texture`].
    pub fn load_from_file(path: &Path) -> Result<Self, ManifestError> {
        Ok(toml::from_str(&fs::read_to_string(path)?)?)
    }

    /// Writes the manifest as TOML, creating missing parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ManifestError> {
        let encoded = toml::to_string_pretty(self)?;
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)?,
            _ => {}
        }
        fs::write(path, encoded)?;
        Ok(())
    }

    /// Creates the (unloaded) texture with every source attached in manifest order.
    pub fn build_texture(
        &self,
        base_dir: &Path,
        listener: Option<Rc<dyn TextureStateListener>>,
    ) -> Result<Texture, ManifestError> {
        let mut texture = match listener {
            Some(listener) => Texture::with_listener(self.width, self.height, self.options, listener)?,
            None => Texture::new(self.width, self.height, self.options)?,
        };

        for entry in &self.sources {
            let (source, x, y): (Rc<dyn TextureSource>, i32, i32) = match entry {
                SourceEntry::File { path, x, y } => {
                    (Rc::new(FileTextureSource::new(base_dir.join(path))?), *x, *y)
                }
                SourceEntry::Solid {
                    width,
                    height,
                    color,
                    x,
                    y,
                } => (
                    Rc::new(SolidColorTextureSource::new(*width, *height, *color)),
                    *x,
                    *y,
                ),
            };
            texture.add_source(source, x, y);
        }

        Ok(texture)
    }
}
