//! The recognizer facade: sample ingestion, recognition and classification.

use crate::config::{RecognizerConfig, Settings};
use crate::error::{Error, Result};
use crate::preprocess::Preprocessor;
use image::RgbImage;
use std::path::Path;
use tinyface_core::{
    ClassifiedFace, DetectedFace, EngineError, Rect, RecognitionEngine, SampleDatabase, SampleLoader,
    SampleRecord, SampleSaver,
};
use tinyface_image::LabelPainter;

/// Temp-file prefix for images that are recognized rather than ingested.
const PROBE_KEY: &str = "tinyface-probe-";

/// Owns one engine handle, its configuration and the sample database.
///
/// Single-threaded: every call blocks until the engine and file I/O finish.
/// Share across threads only behind a lock, or build one recognizer per worker.
pub struct Recognizer<E: RecognitionEngine> {
    settings: Settings,
    loader: Option<Box<dyn SampleLoader>>,
    saver: Option<Box<dyn SampleSaver>>,
    preprocessor: Preprocessor,
    engine: E,
    samples: SampleDatabase,
    /// Whether the engine's sample set mirrors `samples` position for position.
    engine_in_sync: bool,
    closed: bool,
}

impl<E: RecognitionEngine> Recognizer<E> {
    /// Build a recognizer, loading the engine from the configured model path.
    pub fn new(config: RecognizerConfig) -> Result<Self> {
        Self::with_engine(config, E::initialize)
    }

    /// Build a recognizer with a custom engine constructor.
    ///
    /// Fails with [`Error::ModelPathMissing`] before `init` runs when no model
    /// path is configured; `init` errors come back unchanged as [`Error::Engine`].
    pub fn with_engine<F>(config: RecognizerConfig, init: F) -> Result<Self>
    where
        F: FnOnce(&Path) -> std::result::Result<E, EngineError>,
    {
        let RecognizerConfig {
            settings,
            loader,
            saver,
        } = config;

        let model_path = settings
            .model_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(Error::ModelPathMissing)?;
        settings.validate()?;

        let engine = init(&model_path).map_err(Error::Engine)?;
        tracing::info!(
            model_path = %model_path.display(),
            tolerance = settings.tolerance,
            use_cnn = settings.use_cnn,
            use_gray = settings.use_gray,
            "recognizer ready"
        );

        Ok(Self {
            preprocessor: Preprocessor::new(settings.temp_dir()),
            settings,
            loader,
            saver,
            engine,
            samples: SampleDatabase::new(),
            engine_in_sync: true,
            closed: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn samples(&self) -> &SampleDatabase {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    /// Replace the sample database with the configured loader's output.
    ///
    /// No-op without a loader.
    pub fn load_samples(&mut self, locators: &[&str]) -> Result<()> {
        self.ensure_open()?;
        let Some(loader) = self.loader.as_ref() else {
            return Ok(());
        };

        let records = loader.load(locators)?;
        tracing::info!(count = records.len(), "samples loaded");
        self.samples.replace(records);
        self.engine_in_sync = false;
        Ok(())
    }

    /// Persist the sample database through the configured saver.
    ///
    /// No-op without a saver.
    pub fn save_samples(&self, locators: &[&str]) -> Result<()> {
        self.ensure_open()?;
        let Some(saver) = self.saver.as_ref() else {
            return Ok(());
        };

        saver.save(self.samples.records(), locators)?;
        tracing::info!(count = self.samples.len(), "samples saved");
        Ok(())
    }

    /// Add the only face on `path` to the database under `id`.
    ///
    /// The image must hold exactly one face. Duplicate ids are allowed.
    pub fn add_image_to_samples(&mut self, path: impl AsRef<Path>, id: &str) -> Result<()> {
        self.ensure_open()?;
        let path = path.as_ref();

        let prepared = self.preprocessor.prepare(path, id, self.settings.use_cnn)?;
        let mut faces = self
            .engine
            .detect(prepared.path(), self.settings.detector_mode())
            .map_err(Error::Engine)?;

        let face = match faces.len() {
            0 => return Err(Error::NoFaceOnImage),
            1 => faces.swap_remove(0),
            n => {
                tracing::debug!(image = %path.display(), faces = n, "sample image rejected");
                return Err(Error::NotASingleFaceOnImage);
            }
        };

        let index = self.samples.push(SampleRecord::new(id, face.descriptor));
        self.engine_in_sync = false;
        tracing::debug!(id, index, image = %path.display(), "sample added");
        Ok(())
    }

    /// The face on an image expected to hold exactly one.
    pub fn recognize_single(&mut self, path: impl AsRef<Path>) -> Result<DetectedFace> {
        self.ensure_open()?;
        let path = path.as_ref();

        let prepared = self.preprocessor.prepare(path, PROBE_KEY, self.settings.use_gray)?;
        let face = self
            .engine
            .detect_single(prepared.path(), self.settings.detector_mode())
            .map_err(Error::Recognize)?;

        face.ok_or(Error::NotASingleFaceOnImage)
    }

    /// Every face on an image, left to right. Empty when there are none.
    pub fn recognize_multiples(&mut self, path: impl AsRef<Path>) -> Result<Vec<DetectedFace>> {
        self.ensure_open()?;
        let path = path.as_ref();

        let prepared = self.preprocessor.prepare(path, PROBE_KEY, self.settings.use_gray)?;
        let mut faces = self
            .engine
            .detect(prepared.path(), self.settings.detector_mode())
            .map_err(Error::Recognize)?;

        faces.sort_by_key(|f| f.rect.left);
        tracing::debug!(image = %path.display(), faces = faces.len(), "faces recognized");
        Ok(faces)
    }

    /// Identify the only face on an image.
    ///
    /// Fails with [`Error::ClassificationFailed`] when no sample lies within tolerance.
    pub fn classify(&mut self, path: impl AsRef<Path>) -> Result<ClassifiedFace> {
        let face = self.recognize_single(path)?;
        self.sync_engine_samples();
        self.resolve(&face).ok_or(Error::ClassificationFailed)
    }

    /// Identify every face on an image, left to right. Unmatched faces are skipped.
    pub fn classify_multiples(&mut self, path: impl AsRef<Path>) -> Result<Vec<ClassifiedFace>> {
        let faces = self.recognize_multiples(path)?;
        self.sync_engine_samples();

        let matched: Vec<ClassifiedFace> = faces.iter().filter_map(|f| self.resolve(f)).collect();
        tracing::debug!(detected = faces.len(), matched = matched.len(), "faces classified");
        Ok(matched)
    }

    /// Outline classified faces on a copy of the source image.
    pub fn draw_faces(&self, path: impl AsRef<Path>, faces: &[ClassifiedFace]) -> Result<RgbImage> {
        let rects: Vec<Rect> = faces.iter().map(|f| f.rect).collect();
        draw(path.as_ref(), &rects)
    }

    /// Outline raw detections on a copy of the source image.
    pub fn draw_detections(&self, path: impl AsRef<Path>, faces: &[DetectedFace]) -> Result<RgbImage> {
        let rects: Vec<Rect> = faces.iter().map(|f| f.rect).collect();
        draw(path.as_ref(), &rects)
    }

    /// Outline classified faces and have `painter` write each sample id under its box.
    pub fn draw_labeled_faces(
        &self,
        path: impl AsRef<Path>,
        faces: &[ClassifiedFace],
        painter: &mut impl LabelPainter,
    ) -> Result<RgbImage> {
        let img = tinyface_image::load_image(path.as_ref())?;
        let labeled: Vec<(Rect, &str)> = faces.iter().map(|f| (f.rect, f.id())).collect();
        Ok(tinyface_image::draw_labeled(&img, &labeled, painter))
    }

    /// Release the engine. Safe to call more than once; every other
    /// operation fails with [`Error::Closed`] afterwards.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.engine.release();
        self.closed = true;
        tracing::info!("recognizer closed");
    }

    /// Rebuild the engine's sample set from the database so that reported
    /// indices are positions in it.
    fn sync_engine_samples(&mut self) {
        if self.engine_in_sync {
            return;
        }
        let (descriptors, categories) = self.samples.searchable_set();
        self.engine.set_samples(descriptors, categories);
        self.engine_in_sync = true;
        tracing::debug!(count = self.samples.len(), "engine samples synced");
    }

    fn resolve(&self, face: &DetectedFace) -> Option<ClassifiedFace> {
        let index = self.engine.classify(&face.descriptor, self.settings.tolerance)?;
        let Some(sample) = self.samples.get(index) else {
            tracing::warn!(index, samples = self.samples.len(), "engine reported an index outside the sample database");
            return None;
        };
        Some(ClassifiedFace {
            sample: sample.clone(),
            index,
            rect: face.rect,
        })
    }
}

impl<E: RecognitionEngine> Drop for Recognizer<E> {
    fn drop(&mut self) {
        self.close();
    }
}

fn draw(path: &Path, rects: &[Rect]) -> Result<RgbImage> {
    let img = tinyface_image::load_image(path)?;
    Ok(tinyface_image::draw_outlines(&img, rects))
}
