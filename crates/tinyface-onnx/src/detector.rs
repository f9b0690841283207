//! SCRFD face detector via ONNX Runtime.
//!
//! Letterboxes a grayscale image into a square input, runs the 3-stride
//! anchor-free SCRFD head and suppresses overlapping boxes.

use crate::alignment::Landmarks;
use crate::OnnxError;
use image::imageops::{self, FilterType};
use image::GrayImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use tinyface_core::Rect;

const SCRFD_MEAN: f32 = 127.5;
const SCRFD_STD: f32 = 128.0;
const SCRFD_CONFIDENCE_THRESHOLD: f32 = 0.5;
const SCRFD_NMS_THRESHOLD: f32 = 0.4;
const SCRFD_STRIDES: [usize; 3] = [8, 16, 32];
const SCRFD_ANCHORS_PER_CELL: usize = 2;

/// One raw detection in source-image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    pub landmarks: Option<Landmarks>,
}

impl Detection {
    fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection-over-union with another detection.
    fn iou(&self, other: &Detection) -> f32 {
        let inter_w = ((self.x + self.width).min(other.x + other.width) - self.x.max(other.x)).max(0.0);
        let inter_h = ((self.y + self.height).min(other.y + other.height) - self.y.max(other.y)).max(0.0);
        let inter = inter_w * inter_h;
        let union = self.area() + other.area() - inter;
        if union > 0.0 {
            inter / union
        } else {
            0.0
        }
    }

    /// Whole-pixel rectangle clipped to the source image.
    pub fn rect(&self, image_width: u32, image_height: u32) -> Rect {
        Rect::from_xywh(self.x, self.y, self.width, self.height).clamp_to(image_width, image_height)
    }
}

/// Placement of the resized image inside the square network input.
#[derive(Debug, Clone, Copy)]
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

impl Letterbox {
    /// Network-input coordinates back to source-image coordinates.
    fn unmap(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Output tensor indices for one stride: (score, bbox, kps).
type StrideOutputIndices = (usize, usize, usize);

/// Raw head outputs for one stride.
struct StrideOutputs<'a> {
    stride: usize,
    scores: &'a [f32],
    bboxes: &'a [f32],
    kps: &'a [f32],
}

/// SCRFD-based face detector.
pub struct ScrfdDetector {
    session: Session,
    /// Per-stride output indices for strides [8, 16, 32], discovered at load time.
    stride_indices: [StrideOutputIndices; 3],
}

impl ScrfdDetector {
    /// Load the SCRFD ONNX model from the given path.
    pub fn load(model_path: &Path) -> Result<Self, OnnxError> {
        if !model_path.is_file() {
            return Err(OnnxError::ModelNotFound(model_path.display().to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        let output_names: Vec<String> = session.outputs().iter().map(|o| o.name().to_string()).collect();
        tracing::info!(path = %model_path.display(), outputs = ?output_names, "loaded SCRFD model");

        if output_names.len() < 9 {
            return Err(OnnxError::InferenceFailed(format!(
                "SCRFD model requires 9 outputs (3 strides × score/bbox/kps), got {}",
                output_names.len()
            )));
        }

        let stride_indices = discover_output_indices(&output_names);
        tracing::debug!(?stride_indices, "SCRFD output tensor mapping");

        Ok(Self {
            session,
            stride_indices,
        })
    }

    /// Detect faces at the given square input size, sorted by confidence.
    pub fn detect(&mut self, image: &GrayImage, input_size: usize) -> Result<Vec<Detection>, OnnxError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OnnxError::InferenceFailed("empty image".into()));
        }

        let (input, letterbox) = letterbox(image, input_size);
        let stride_indices = self.stride_indices;
        let outputs = self.session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let mut all = Vec::new();
        for (&stride, &(score_idx, bbox_idx, kps_idx)) in SCRFD_STRIDES.iter().zip(stride_indices.iter()) {
            let extract = |idx: usize, what: &str| {
                outputs[idx]
                    .try_extract_tensor::<f32>()
                    .map(|(_, data)| data)
                    .map_err(|e| OnnxError::InferenceFailed(format!("{what} stride {stride}: {e}")))
            };
            let head = StrideOutputs {
                stride,
                scores: extract(score_idx, "scores")?,
                bboxes: extract(bbox_idx, "bboxes")?,
                kps: extract(kps_idx, "kps")?,
            };
            all.extend(decode_stride(&head, input_size, &letterbox, SCRFD_CONFIDENCE_THRESHOLD));
        }

        Ok(nms(all, SCRFD_NMS_THRESHOLD))
    }
}

/// Resize to fit `input_size`×`input_size`, centre it and normalize into an NCHW tensor.
///
/// Padding uses the mean value so it normalizes to 0.0.
fn letterbox(image: &GrayImage, input_size: usize) -> (Array4<f32>, Letterbox) {
    let (width, height) = image.dimensions();
    let side = input_size as f32;
    let scale = (side / width as f32).min(side / height as f32);

    let new_w = ((width as f32 * scale).round() as u32).clamp(1, input_size as u32);
    let new_h = ((height as f32 * scale).round() as u32).clamp(1, input_size as u32);
    let pad_x = (input_size as u32 - new_w) / 2;
    let pad_y = (input_size as u32 - new_h) / 2;

    let resized = imageops::resize(image, new_w, new_h, FilterType::Triangle);

    let mut tensor = Array4::<f32>::zeros((1, 3, input_size, input_size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let normalized = (pixel[0] as f32 - SCRFD_MEAN) / SCRFD_STD;
        let (ty, tx) = ((y + pad_y) as usize, (x + pad_x) as usize);
        // Grayscale replicated across the three input channels.
        for c in 0..3 {
            tensor[[0, c, ty, tx]] = normalized;
        }
    }

    let info = Letterbox {
        scale,
        pad_x: pad_x as f32,
        pad_y: pad_y as f32,
    };
    (tensor, info)
}

/// Map output tensors to stride slots by name ("score_8", "bbox_16", "kps_32", ...).
///
/// Falls back to the standard positional layout when the names are generic:
///   [0-2] = scores, [3-5] = bboxes, [6-8] = kps (strides 8, 16, 32)
fn discover_output_indices(names: &[String]) -> [StrideOutputIndices; 3] {
    let find = |prefix: &str, stride: usize| {
        let target = format!("{prefix}_{stride}");
        names.iter().position(|n| *n == target)
    };

    let named: Option<Vec<StrideOutputIndices>> = SCRFD_STRIDES
        .iter()
        .map(|&s| Some((find("score", s)?, find("bbox", s)?, find("kps", s)?)))
        .collect();

    match named {
        Some(v) => {
            tracing::info!("SCRFD: using name-based output tensor mapping");
            [v[0], v[1], v[2]]
        }
        None => {
            tracing::info!(?names, "SCRFD: output names not recognized, using positional mapping");
            [(0, 3, 6), (1, 4, 7), (2, 5, 8)]
        }
    }
}

/// Decode one stride's anchors into detections above `threshold`.
fn decode_stride(head: &StrideOutputs<'_>, input_size: usize, letterbox: &Letterbox, threshold: f32) -> Vec<Detection> {
    let stride = head.stride;
    let step = stride as f32;
    let grid = input_size / stride;
    let num_anchors = grid * grid * SCRFD_ANCHORS_PER_CELL;

    let mut detections = Vec::new();
    for idx in 0..num_anchors {
        let score = head.scores.get(idx).copied().unwrap_or(0.0);
        if score <= threshold {
            continue;
        }
        let Some(offsets) = head.bboxes.get(idx * 4..idx * 4 + 4) else {
            continue;
        };

        let cell = idx / SCRFD_ANCHORS_PER_CELL;
        let anchor_x = (cell % grid) as f32 * step;
        let anchor_y = (cell / grid) as f32 * step;

        let (x1, y1) = letterbox.unmap(anchor_x - offsets[0] * step, anchor_y - offsets[1] * step);
        let (x2, y2) = letterbox.unmap(anchor_x + offsets[2] * step, anchor_y + offsets[3] * step);

        let landmarks = head.kps.get(idx * 10..idx * 10 + 10).map(|kps| {
            std::array::from_fn(|i| letterbox.unmap(anchor_x + kps[i * 2] * step, anchor_y + kps[i * 2 + 1] * step))
        });

        detections.push(Detection {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            confidence: score,
            landmarks,
        });
    }
    detections
}

/// Greedy non-maximum suppression; output is sorted by descending confidence.
fn nms(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Detection> = Vec::new();
    for candidate in detections {
        if keep.iter().all(|kept| kept.iou(&candidate) <= iou_threshold) {
            keep.push(candidate);
        }
    }
    keep
}
