// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use serde::{Deserialize, Serialize};

// Fixed-function texture environment (GLES 1.x). glow only carries the
// programmable-pipeline enums, so these are spelled out here.
pub const TEXTURE_ENV_MODE: u32 = 0x2200;
pub const MODULATE: u32 = 0x2100;
pub const DECAL: u32 = 0x2101;
pub const REPLACE: u32 = 0x1E01;
pub const BLEND: u32 = 0x0BE2;
pub const ADD: u32 = 0x0104;

/// No mipmapped variants: textures are uploaded at level 0 only, and a
/// mipmapped minification filter would leave them incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl TextureFilter {
    pub fn gl_value(self) -> u32 {
        match self {
            TextureFilter::Nearest => glow::NEAREST,
            TextureFilter::Linear => glow::LINEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl TextureWrap {
    pub fn gl_value(self) -> u32 {
        match self {
            TextureWrap::Repeat => glow::REPEAT,
            TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
            TextureWrap::MirroredRepeat => glow::MIRRORED_REPEAT,
        }
    }
}

/// How texels combine with the incoming fragment colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureEnvironment {
    Modulate,
    Replace,
    Decal,
    Blend,
    Add,
}

impl TextureEnvironment {
    pub fn gl_value(self) -> u32 {
        match self {
            TextureEnvironment::Modulate => MODULATE,
            TextureEnvironment::Replace => REPLACE,
            TextureEnvironment::Decal => DECAL,
            TextureEnvironment::Blend => BLEND,
            TextureEnvironment::Add => ADD,
        }
    }
}

/// Sampling settings of a [`crate::Texture`]. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureOptions {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub environment: TextureEnvironment,
}

impl TextureOptions {
    pub const NEAREST: TextureOptions = TextureOptions::new(
        TextureFilter::Nearest,
        TextureFilter::Nearest,
        TextureWrap::ClampToEdge,
        TextureWrap::ClampToEdge,
        TextureEnvironment::Modulate,
    );
    pub const BILINEAR: TextureOptions = TextureOptions::new(
        TextureFilter::Linear,
        TextureFilter::Linear,
        TextureWrap::ClampToEdge,
        TextureWrap::ClampToEdge,
        TextureEnvironment::Modulate,
    );
    pub const REPEATING: TextureOptions = TextureOptions::new(
        TextureFilter::Nearest,
        TextureFilter::Nearest,
        TextureWrap::Repeat,
        TextureWrap::Repeat,
        TextureEnvironment::Modulate,
    );
    pub const REPEATING_BILINEAR: TextureOptions = TextureOptions::new(
        TextureFilter::Linear,
        TextureFilter::Linear,
        TextureWrap::Repeat,
        TextureWrap::Repeat,
        TextureEnvironment::Modulate,
    );
    pub const DEFAULT: TextureOptions = TextureOptions::NEAREST;

    pub const fn new(
        min_filter: TextureFilter,
        mag_filter: TextureFilter,
        wrap_s: TextureWrap,
        wrap_t: TextureWrap,
        environment: TextureEnvironment,
    ) -> Self {
        Self {
            min_filter,
            mag_filter,
            wrap_s,
            wrap_t,
            environment,
        }
    }
}

impl Default for TextureOptions {
    fn default() -> Self {
        TextureOptions::DEFAULT
    }
}
