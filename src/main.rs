// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use log::{error, info};
use texture_atlas::{
    AtlasManifest, LoggingTextureStateListener, ManifestError, SoftwareContext, TextureError,
};

fn compose(manifest_path: &Path, output_path: &Path) -> Result<(), ManifestError> {
    let manifest = AtlasManifest::load_from_file(manifest_path)?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let mut texture =
        manifest.build_texture(base_dir, Some(Rc::new(LoggingTextureStateListener)))?;
    let gl = SoftwareContext::new();
    texture.load(&gl)?;

    let image = texture
        .hardware_id()
        .and_then(|id| gl.texture_image(id))
        .ok_or_else(|| TextureError::Context("composited texture has no storage".to_string()))?;
    image.save(output_path).map_err(TextureError::from)?;

    info!(
        "Wrote {}x{} atlas with {} source(s) to {}",
        texture.width(),
        texture.height(),
        texture.sources().len(),
        output_path.display()
    );
    Ok(())
}

/// `(manifest, output)` from `argv`, or `None` if the arity is wrong.
fn parse_args(args: &[String]) -> Option<(PathBuf, PathBuf)> {
    match args {
        [_, manifest, output] => Some((PathBuf::from(manifest), PathBuf::from(output))),
        _ => None,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let Some((manifest_path, output_path)) = parse_args(&args) else {
        let program = args.first().map(String::as_str).unwrap_or("atlas-compose");
        eprintln!("Usage: {} <manifest.toml> <output.png>", program);
        return ExitCode::FAILURE;
    };

    match compose(&manifest_path, &output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to compose {}: {}", manifest_path.display(), e);
            ExitCode::FAILURE
        }
    }
}
