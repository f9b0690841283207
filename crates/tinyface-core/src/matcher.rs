//! Nearest-sample matching with a maximum-distance cutoff.

use crate::types::Descriptor;

/// Best gallery entry for a probe descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Position of the entry in the gallery slice.
    pub index: usize,
    pub distance: f32,
}

/// Strategy for finding the nearest gallery descriptor within a tolerance.
///
/// The tolerance is a maximum distance: smaller values mean stricter matching.
pub trait Matcher {
    fn nearest(&self, probe: &Descriptor, gallery: &[Descriptor], tolerance: f32) -> Option<Match>;
}

/// Euclidean-distance matcher.
///
/// Scans the whole gallery. A candidate is accepted when its distance is
/// `<= tolerance`; ties resolve to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanMatcher;

impl Matcher for EuclideanMatcher {
    fn nearest(&self, probe: &Descriptor, gallery: &[Descriptor], tolerance: f32) -> Option<Match> {
        let mut best: Option<Match> = None;

        for (index, candidate) in gallery.iter().enumerate() {
            let distance = probe.distance(candidate);
            if distance.is_nan() {
                continue;
            }
            let is_better = match best {
                None => true,
                Some(prev) => distance < prev.distance,
            };
            if is_better {
                best = Some(Match { index, distance });
            }
        }

        best.filter(|m| m.distance <= tolerance)
    }
}

/// Searchable sample set held by an engine binding.
///
/// Pairs each descriptor with a category; classification returns the category
/// of the nearest descriptor, or `None` when nothing lies within tolerance.
#[derive(Debug, Default)]
pub struct SampleIndex<M: Matcher = EuclideanMatcher> {
    descriptors: Vec<Descriptor>,
    categories: Vec<usize>,
    matcher: M,
}

impl SampleIndex<EuclideanMatcher> {
    pub fn new() -> Self {
        Self::with_matcher(EuclideanMatcher)
    }
}

impl<M: Matcher> SampleIndex<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            descriptors: Vec::new(),
            categories: Vec::new(),
            matcher,
        }
    }

    /// Replace the whole sample set.
    ///
    /// Extra entries on either side are dropped when the lengths disagree.
    pub fn set(&mut self, mut descriptors: Vec<Descriptor>, mut categories: Vec<usize>) {
        if descriptors.len() != categories.len() {
            tracing::warn!(
                descriptors = descriptors.len(),
                categories = categories.len(),
                "sample set length mismatch; truncating to the shorter side"
            );
            let n = descriptors.len().min(categories.len());
            descriptors.truncate(n);
            categories.truncate(n);
        }
        self.descriptors = descriptors;
        self.categories = categories;
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn classify(&self, probe: &Descriptor, tolerance: f32) -> Option<usize> {
        let found = self.matcher.nearest(probe, &self.descriptors, tolerance)?;
        tracing::trace!(index = found.index, distance = found.distance, "nearest sample");
        self.categories.get(found.index).copied()
    }
}
