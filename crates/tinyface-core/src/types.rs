use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Face descriptor: a fixed-length embedding vector produced by a recognition engine.
///
/// Immutable once produced. Two descriptors of different length are never
/// comparable and sit at infinite distance from each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(Vec<f32>);

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean distance to another descriptor.
    pub fn distance(&self, other: &Descriptor) -> f32 {
        if self.0.len() != other.0.len() {
            return f32::INFINITY;
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

impl From<Vec<f32>> for Descriptor {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Axis-aligned bounding box in source-image pixel coordinates.
///
/// `left`/`top` are inclusive, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from a floating-point `x, y, width, height` box, rounding to whole pixels.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x.round() as i32,
            top: y.round() as i32,
            right: (x + width).round() as i32,
            bottom: (y + height).round() as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Clip to an image of the given dimensions.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let w = width.min(i32::MAX as u32) as i32;
        let h = height.min(i32::MAX as u32) as i32;
        Self {
            left: self.left.clamp(0, w),
            top: self.top.clamp(0, h),
            right: self.right.clamp(0, w),
            bottom: self.bottom.clamp(0, h),
        }
    }
}

/// One known identity's reference descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub id: String,
    pub descriptor: Descriptor,
}

impl SampleRecord {
    pub fn new(id: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            id: id.into(),
            descriptor,
        }
    }
}

/// A face found by a detection call. Transient; never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub rect: Rect,
    pub descriptor: Descriptor,
}

/// A detection resolved to a known identity.
///
/// `sample` shares the record held by the sample database rather than copying it;
/// `index` is the record's position in the database at classification time.
#[derive(Debug, Clone)]
pub struct ClassifiedFace {
    pub sample: Arc<SampleRecord>,
    pub index: usize,
    pub rect: Rect,
}

impl ClassifiedFace {
    /// Identity label of the matched sample.
    pub fn id(&self) -> &str {
        &self.sample.id
    }
}
