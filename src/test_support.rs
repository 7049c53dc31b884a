// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
//! Fixtures shared by the unit tests.
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::{Mutex, Once};

use crate::bitmap::Bitmap;
use crate::error::TextureError;
use crate::texture::Texture;
use crate::texture_source::{PositionedSource, TextureSource};
use crate::texture_state_listener::TextureStateListener;

/// A source whose bitmap can never be produced.
pub struct NullSource {
    name: &'static str,
}

impl NullSource {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl TextureSource for NullSource {
    fn width(&self) -> u32 {
        4
    }

    fn height(&self) -> u32 {
        4
    }

    fn bitmap(&self) -> Option<Bitmap> {
        None
    }
}

impl fmt::Display for NullSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NullSource({})", self.name)
    }
}

/// Counts lifecycle callbacks and keeps (source, x, y, cause) of each failure.
#[derive(Default)]
pub struct RecordingListener {
    pub loaded: Cell<usize>,
    pub unloaded: Cell<usize>,
    pub failures: RefCell<Vec<(String, i32, i32, String)>>,
}

impl TextureStateListener for RecordingListener {
    fn on_loaded(&self, texture: &Texture) {
        assert!(texture.is_loaded());
        self.loaded.set(self.loaded.get() + 1);
    }

    fn on_unloaded(&self, texture: &Texture) {
        assert!(!texture.is_loaded());
        self.unloaded.set(self.unloaded.get() + 1);
    }

    fn on_source_upload_failure(
        &self,
        _texture: &Texture,
        source: &PositionedSource,
        cause: &TextureError,
    ) {
        self.failures.borrow_mut().push((
            source.to_string(),
            source.x(),
            source.y(),
            cause.to_string(),
        ));
    }
}

struct CapturingLogger;

static LOGGER: CapturingLogger = CapturingLogger;
static CAPTURED: Mutex<Option<Vec<(log::Level, String)>>> = Mutex::new(None);
static INSTALL: Once = Once::new();

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut captured) = CAPTURED.lock() {
            if let Some(records) = captured.as_mut() {
                records.push((record.level(), record.args().to_string()));
            }
        }
    }

    fn flush(&self) {}
}

/// Runs `f` and returns everything logged meanwhile. Callers must be `#[serial]`.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> Vec<(log::Level, String)> {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("Logger already installed");
        log::set_max_level(log::LevelFilter::Trace);
    });

    *CAPTURED.lock().unwrap() = Some(Vec::new());
    let _ = f();
    CAPTURED.lock().unwrap().take().unwrap_or_default()
}
