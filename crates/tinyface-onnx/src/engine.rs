use crate::detector::ScrfdDetector;
use crate::embedder::ArcFaceEmbedder;
use std::path::Path;
use tinyface_core::{
    DetectedFace, Descriptor, DetectorMode, EngineError, RecognitionEngine, SampleIndex,
};

pub const DETECTOR_MODEL_FILE: &str = "det_10g.onnx";
pub const EMBEDDER_MODEL_FILE: &str = "w600k_r50.onnx";

/// Detector input side for [`DetectorMode::Standard`].
pub const STANDARD_INPUT_SIZE: usize = 320;
/// Detector input side for [`DetectorMode::Cnn`].
pub const CNN_INPUT_SIZE: usize = 640;

struct Models {
    detector: ScrfdDetector,
    embedder: ArcFaceEmbedder,
}

/// ONNX Runtime recognition engine.
///
/// Owns both model sessions until [`release`](RecognitionEngine::release).
pub struct OnnxEngine {
    models: Option<Models>,
    samples: SampleIndex,
}

fn input_size(mode: DetectorMode) -> usize {
    match mode {
        DetectorMode::Standard => STANDARD_INPUT_SIZE,
        DetectorMode::Cnn => CNN_INPUT_SIZE,
    }
}

impl RecognitionEngine for OnnxEngine {
    fn initialize(model_dir: &Path) -> Result<Self, EngineError> {
        if !model_dir.is_dir() {
            return Err(EngineError::ModelNotFound(model_dir.display().to_string()));
        }

        let detector = ScrfdDetector::load(&model_dir.join(DETECTOR_MODEL_FILE))?;
        let embedder = ArcFaceEmbedder::load(&model_dir.join(EMBEDDER_MODEL_FILE))?;
        tracing::info!(dir = %model_dir.display(), "ONNX engine ready");

        Ok(Self {
            models: Some(Models { detector, embedder }),
            samples: SampleIndex::new(),
        })
    }

    fn detect(&mut self, image: &Path, mode: DetectorMode) -> Result<Vec<DetectedFace>, EngineError> {
        let models = self.models.as_mut().ok_or(EngineError::Released)?;

        let gray = tinyface_image::load_image(image)
            .map_err(|e| EngineError::ImageUnreadable(e.to_string()))?
            .to_luma8();

        let detections = models.detector.detect(&gray, input_size(mode))?;
        tracing::debug!(image = %image.display(), ?mode, count = detections.len(), "faces detected");

        let mut faces = Vec::with_capacity(detections.len());
        for det in &detections {
            let Some(landmarks) = det.landmarks.as_ref() else {
                tracing::warn!(confidence = det.confidence, "detection without landmarks skipped");
                continue;
            };
            let descriptor = models.embedder.embed(&gray, landmarks)?;
            faces.push(DetectedFace {
                rect: det.rect(gray.width(), gray.height()),
                descriptor,
            });
        }
        Ok(faces)
    }

    fn set_samples(&mut self, descriptors: Vec<Descriptor>, categories: Vec<usize>) {
        self.samples.set(descriptors, categories);
    }

    fn classify(&self, descriptor: &Descriptor, tolerance: f32) -> Option<usize> {
        self.samples.classify(descriptor, tolerance)
    }

    fn release(&mut self) {
        if self.models.take().is_some() {
            tracing::info!("ONNX engine released");
        }
    }
}
