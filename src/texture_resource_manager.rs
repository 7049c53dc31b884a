// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use slotmap::SlotMap;

use crate::error::TextureError;
use crate::gl_context::GraphicsContext;
use crate::handles::TextureHandle;
use crate::texture::Texture;

/// Owns textures and defers their hardware work to [`TextureResourceManager::update`],
/// which must run on the thread that owns the graphics context.
#[derive(Debug, Default)]
pub struct TextureResourceManager {
    textures: SlotMap<TextureHandle, Texture>,
    to_be_loaded: Vec<TextureHandle>,
    to_be_unloaded: Vec<TextureHandle>,
}

impl TextureResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, texture: Texture) -> TextureHandle {
        self.textures.insert(texture)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle)
    }

    pub fn get_mut(&mut self, handle: TextureHandle) -> Option<&mut Texture> {
        self.textures.get_mut(handle)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Queues `handle` for loading on the next update. Cancels a pending unload.
    pub fn request_load(&mut self, handle: TextureHandle) {
        if !self.textures.contains_key(handle) {
            log::warn!("Ignoring load request for unknown texture {:?}", handle);
            return;
        }
        self.to_be_unloaded.retain(|&h| h != handle);
        if !self.to_be_loaded.contains(&handle) {
            self.to_be_loaded.push(handle);
        }
    }

    /// Queues `handle` for unloading on the next update. Cancels a pending load.
    pub fn request_unload(&mut self, handle: TextureHandle) {
        if !self.textures.contains_key(handle) {
            log::warn!("Ignoring unload request for unknown texture {:?}", handle);
            return;
        }
        self.to_be_loaded.retain(|&h| h != handle);
        if !self.to_be_unloaded.contains(&handle) {
            self.to_be_unloaded.push(handle);
        }
    }

    pub fn is_load_pending(&self, handle: TextureHandle) -> bool {
        self.to_be_loaded.contains(&handle)
    }

    /// Runs the queued loads, then the queued unloads. A failed load does not
    /// stop the others; every failure is returned with its handle.
    pub fn update<C: GraphicsContext + ?Sized>(
        &mut self,
        gl: &C,
    ) -> Vec<(TextureHandle, TextureError)> {
        let mut failures = Vec::new();

        for handle in std::mem::take(&mut self.to_be_loaded) {
            let Some(texture) = self.textures.get_mut(handle) else {
                continue;
            };
            if texture.is_loaded() {
                continue;
            }
            if let Err(e) = texture.load(gl) {
                log::error!("Failed to load texture {:?}: {}", handle, e);
                failures.push((handle, e));
            }
        }

        for handle in std::mem::take(&mut self.to_be_unloaded) {
            if let Some(texture) = self.textures.get_mut(handle) {
                if texture.is_loaded() {
                    texture.unload(gl);
                }
            }
        }

        failures
    }

    /// The graphics context was lost: every loaded texture forgets its hardware
    /// object and is queued to be loaded again, unless an unload was pending.
    pub fn invalidate_all(&mut self) {
        for (handle, texture) in self.textures.iter_mut() {
            if texture.is_loaded() {
                texture.invalidate();
                if !self.to_be_unloaded.contains(&handle) && !self.to_be_loaded.contains(&handle) {
                    self.to_be_loaded.push(handle);
                }
            }
        }
        self.to_be_unloaded.clear();
        log::debug!("Queued {} texture(s) for reload", self.to_be_loaded.len());
    }

    pub fn remove<C: GraphicsContext + ?Sized>(
        &mut self,
        gl: &C,
        handle: TextureHandle,
    ) -> Option<Texture> {
        self.to_be_loaded.retain(|&h| h != handle);
        self.to_be_unloaded.retain(|&h| h != handle);
        let mut texture = self.textures.remove(handle)?;
        if texture.is_loaded() {
            texture.unload(gl);
        }
        Some(texture)
    }

    pub fn unload_all<C: GraphicsContext + ?Sized>(&mut self, gl: &C) {
        self.to_be_loaded.clear();
        self.to_be_unloaded.clear();
        for (_, texture) in self.textures.iter_mut() {
            if texture.is_loaded() {
                texture.unload(gl);
            }
        }
    }
}
