//! Test support: a scripted engine and photo fixtures.
//!
//! The scripted engine recognizes photos by their pixel dimensions, which a
//! grayscale copy keeps, so tests can follow an image through preprocessing.

use image::{Rgb, RgbImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tinyface_core::{
    DetectedFace, Descriptor, DetectorMode, EngineError, Rect, RecognitionEngine, SampleIndex,
};

pub const SCRIPT_FILE: &str = "script.json";

pub const ALICE: &[f32] = &[0.1, 0.2, 0.3];
pub const ALICE_2: &[f32] = &[0.12, 0.21, 0.3];
pub const BOB: &[f32] = &[0.9, -0.4, 0.1];
pub const STRANGER: &[f32] = &[-0.8, 0.8, 0.8];

/// Faces per photo, keyed by `"{width}x{height}"`.
pub type Script = HashMap<String, Vec<DetectedFace>>;

#[derive(Debug, Default)]
pub struct ScriptedEngine {
    script: Script,
    fail_on: Option<String>,
    index: SampleIndex,
    released: bool,
    /// Every path handed to `detect`, in call order.
    pub seen: Vec<PathBuf>,
    pub modes: Vec<DetectorMode>,
    pub sample_syncs: usize,
    pub releases: usize,
}

impl ScriptedEngine {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    /// Fail detection on photos of this size.
    pub fn failing_on(mut self, width: u32, height: u32) -> Self {
        self.fail_on = Some(dims_key(width, height));
        self
    }

    pub fn write_script(model_dir: &Path, script: &Script) {
        let json = serde_json::to_string(script).unwrap();
        std::fs::write(model_dir.join(SCRIPT_FILE), json).unwrap();
    }
}

fn dims_key(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}

impl RecognitionEngine for ScriptedEngine {
    fn initialize(model_dir: &Path) -> Result<Self, EngineError> {
        let path = model_dir.join(SCRIPT_FILE);
        let text = std::fs::read_to_string(&path)
            .map_err(|_| EngineError::ModelNotFound(path.display().to_string()))?;
        let script = serde_json::from_str(&text).map_err(|e| EngineError::InferenceFailed(e.to_string()))?;
        Ok(Self::new(script))
    }

    fn detect(&mut self, image: &Path, mode: DetectorMode) -> Result<Vec<DetectedFace>, EngineError> {
        if self.released {
            return Err(EngineError::Released);
        }
        self.seen.push(image.to_path_buf());
        self.modes.push(mode);

        let img = tinyface_image::load_image(image).map_err(|e| EngineError::ImageUnreadable(e.to_string()))?;
        let key = dims_key(img.width(), img.height());
        if self.fail_on.as_deref() == Some(key.as_str()) {
            return Err(EngineError::InferenceFailed(format!("scripted failure on {key}")));
        }
        Ok(self.script.get(&key).cloned().unwrap_or_default())
    }

    fn set_samples(&mut self, descriptors: Vec<Descriptor>, categories: Vec<usize>) {
        self.index.set(descriptors, categories);
        self.sample_syncs += 1;
    }

    fn classify(&self, descriptor: &Descriptor, tolerance: f32) -> Option<usize> {
        self.index.classify(descriptor, tolerance)
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.releases += 1;
        }
    }
}

pub fn face(left: i32, values: &[f32]) -> DetectedFace {
    DetectedFace {
        rect: Rect::new(left, 10, left + 20, 30),
        descriptor: Descriptor::new(values.to_vec()),
    }
}

/// Write a gradient JPEG of the given size.
pub fn write_photo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([((x * 3) % 256) as u8, ((y * 5) % 256) as u8, 128])
    });
    img.save(&path).unwrap();
    path
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
