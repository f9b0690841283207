//! Face alignment via 4-DOF similarity transform.
//!
//! Warps a detected face onto the canonical 112×112 ArcFace crop using the
//! five InsightFace reference landmarks and a least-squares fit.

use image::{GrayImage, Luma};

/// Five-point landmarks: left eye, right eye, nose, left mouth, right mouth.
pub type Landmarks = [(f32, f32); 5];

/// ArcFace reference landmarks for a 112×112 output.
pub const REFERENCE_LANDMARKS_112: Landmarks = [
    (38.2946, 51.6963),
    (73.5318, 51.5014),
    (56.0252, 71.7366),
    (41.5493, 92.3655),
    (70.7299, 92.2041),
];

pub const ALIGNED_SIZE: u32 = 112;

/// Similarity transform `dst = [[a, -b], [b, a]] * src + [tx, ty]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub a: f32,
    pub b: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Similarity {
    pub const IDENTITY: Similarity = Similarity {
        a: 1.0,
        b: 0.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Least-squares fit mapping `src` points onto `dst` points.
    ///
    /// Each point pair contributes two rows to the normal equations:
    ///   sx * a - sy * b + tx = dx
    ///   sy * a + sx * b + ty = dy
    pub fn estimate(src: &Landmarks, dst: &Landmarks) -> Self {
        let mut normal = [[0.0f32; 5]; 4];

        for (&(sx, sy), &(dx, dy)) in src.iter().zip(dst.iter()) {
            for (row, rhs) in [([sx, -sy, 1.0, 0.0], dx), ([sy, sx, 0.0, 1.0], dy)] {
                for j in 0..4 {
                    for k in 0..4 {
                        normal[j][k] += row[j] * row[k];
                    }
                    normal[j][4] += row[j] * rhs;
                }
            }
        }

        match solve(normal) {
            Some([a, b, tx, ty]) => Self { a, b, tx, ty },
            None => Self::IDENTITY,
        }
    }

    /// Map a destination point back into source space.
    pub fn invert_point(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let det = self.a * self.a + self.b * self.b;
        if det.abs() < 1e-12 {
            return None;
        }
        let dx = x - self.tx;
        let dy = y - self.ty;
        Some(((self.a * dx + self.b * dy) / det, (-self.b * dx + self.a * dy) / det))
    }

    /// Sample `src` through the inverse transform into a `size`×`size` image.
    ///
    /// Bilinear interpolation; pixels mapping outside `src` are black.
    pub fn warp(&self, src: &GrayImage, size: u32) -> GrayImage {
        let (w, h) = (src.width() as i64, src.height() as i64);
        let sample = |x: i64, y: i64| -> f32 {
            if x >= 0 && x < w && y >= 0 && y < h {
                src.get_pixel(x as u32, y as u32)[0] as f32
            } else {
                0.0
            }
        };

        GrayImage::from_fn(size, size, |ox, oy| {
            let Some((sx, sy)) = self.invert_point(ox as f32, oy as f32) else {
                return Luma([0]);
            };
            let x0 = sx.floor() as i64;
            let y0 = sy.floor() as i64;
            let fx = sx - x0 as f32;
            let fy = sy - y0 as f32;

            let val = sample(x0, y0) * (1.0 - fx) * (1.0 - fy)
                + sample(x0 + 1, y0) * fx * (1.0 - fy)
                + sample(x0, y0 + 1) * (1.0 - fx) * fy
                + sample(x0 + 1, y0 + 1) * fx * fy;
            Luma([val.round().clamp(0.0, 255.0) as u8])
        })
    }
}

/// Gaussian elimination with partial pivoting on a 4×4 augmented system.
#[allow(clippy::needless_range_loop)]
fn solve(mut m: [[f32; 5]; 4]) -> Option<[f32; 4]> {
    for col in 0..4 {
        let pivot_row = (col..4).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        m.swap(col, pivot_row);

        let pivot = m[col][col];
        if pivot.abs() < 1e-12 {
            return None;
        }
        for row in (col + 1)..4 {
            let factor = m[row][col] / pivot;
            for j in col..5 {
                m[row][j] -= factor * m[col][j];
            }
        }
    }

    let mut x = [0.0f32; 4];
    for i in (0..4).rev() {
        let tail: f32 = ((i + 1)..4).map(|j| m[i][j] * x[j]).sum();
        x[i] = (m[i][4] - tail) / m[i][i];
    }
    Some(x)
}

/// Align a detected face to the canonical 112×112 ArcFace crop.
pub fn align_face(image: &GrayImage, landmarks: &Landmarks) -> GrayImage {
    Similarity::estimate(landmarks, &REFERENCE_LANDMARKS_112).warp(image, ALIGNED_SIZE)
}
