// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use slotmap::new_key_type;
use std::fmt;

/// Name of a texture object as handed out by the graphics driver.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct HardwareTextureId(pub u32);

impl fmt::Display for HardwareTextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

new_key_type! {
    pub struct TextureHandle;
}
