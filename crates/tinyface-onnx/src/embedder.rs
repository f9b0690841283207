//! ArcFace descriptor extraction via ONNX Runtime.
//!
//! Produces 512-dimensional, L2-normalized descriptors from aligned
//! 112×112 face crops (w600k_r50 model).

use crate::alignment::{self, Landmarks, ALIGNED_SIZE};
use crate::OnnxError;
use image::GrayImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use tinyface_core::Descriptor;

const ARCFACE_MEAN: f32 = 127.5;
const ARCFACE_STD: f32 = 127.5; // symmetric, unlike SCRFD
pub const ARCFACE_DESCRIPTOR_DIM: usize = 512;

/// ArcFace-based descriptor extractor.
pub struct ArcFaceEmbedder {
    session: Session,
}

impl ArcFaceEmbedder {
    /// Load the ArcFace ONNX model from the given path.
    pub fn load(model_path: &Path) -> Result<Self, OnnxError> {
        if !model_path.is_file() {
            return Err(OnnxError::ModelNotFound(model_path.display().to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        tracing::info!(
            path = %model_path.display(),
            inputs = ?session.inputs().iter().map(|i| i.name()).collect::<Vec<_>>(),
            "loaded ArcFace model"
        );

        Ok(Self { session })
    }

    /// Align the face described by `landmarks` and extract its descriptor.
    pub fn embed(&mut self, image: &GrayImage, landmarks: &Landmarks) -> Result<Descriptor, OnnxError> {
        let aligned = alignment::align_face(image, landmarks);
        let input = to_tensor(&aligned);

        let outputs = self.session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;
        let (_, raw) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| OnnxError::InferenceFailed(format!("descriptor extraction: {e}")))?;

        if raw.len() != ARCFACE_DESCRIPTOR_DIM {
            return Err(OnnxError::InferenceFailed(format!(
                "expected {ARCFACE_DESCRIPTOR_DIM}-dim descriptor, got {}",
                raw.len()
            )));
        }

        Ok(Descriptor::new(l2_normalize(raw)))
    }
}

/// Aligned grayscale crop → normalized NCHW tensor with the channel replicated three times.
fn to_tensor(aligned: &GrayImage) -> Array4<f32> {
    let size = ALIGNED_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in aligned.enumerate_pixels() {
        let normalized = (pixel[0] as f32 - ARCFACE_MEAN) / ARCFACE_STD;
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = normalized;
        }
    }
    tensor
}

fn l2_normalize(raw: &[f32]) -> Vec<f32> {
    let norm = raw.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        raw.iter().map(|v| v / norm).collect()
    } else {
        raw.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_tensor_shape() {
        let crop = GrayImage::from_pixel(ALIGNED_SIZE, ALIGNED_SIZE, Luma([128]));
        assert_eq!(to_tensor(&crop).shape(), &[1, 3, 112, 112]);
    }

    #[test]
    fn test_tensor_normalization() {
        let crop = GrayImage::from_pixel(ALIGNED_SIZE, ALIGNED_SIZE, Luma([255]));
        let tensor = to_tensor(&crop);
        assert!((tensor[[0, 1, 50, 60]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tensor_channels_identical() {
        let crop = GrayImage::from_fn(ALIGNED_SIZE, ALIGNED_SIZE, |x, y| Luma([((x + y) % 256) as u8]));
        let tensor = to_tensor(&crop);
        for y in 0..112 {
            for x in 0..112 {
                assert_eq!(tensor[[0, 0, y, x]], tensor[[0, 1, y, x]]);
                assert_eq!(tensor[[0, 1, y, x]], tensor[[0, 2, y, x]]);
            }
        }
    }

    #[test]
    fn test_l2_normalize_unit_length() {
        let v = l2_normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6 && (v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector_unchanged() {
        assert_eq!(l2_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }
}
