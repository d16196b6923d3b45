//! Cloud of tracked feature points following one face.

use nalgebra::Point2;

use crate::frame::GrayFrame;
use crate::integration::PointTracker;

/// Tracked 2D points plus their centroid and a frozen spread baseline.
///
/// `spread` is measured at (re)initialization only. Outlier pruning compares
/// every later frame against that baseline, so a momentarily tight cluster
/// does not become permanently intolerant and slow dispersion does not raise
/// the bar.
#[derive(Debug, Clone)]
pub struct FeatureCloud {
    points: Vec<Point2<f32>>,
    centroid: Point2<f32>,
    spread: f64,
    reference: Option<GrayFrame>,
    budget: usize,
    prune_multiplier: f64,
}

impl FeatureCloud {
    /// Empty cloud holding at most `budget` points.
    pub fn new(budget: usize, prune_multiplier: f64) -> Self {
        Self {
            points: Vec::new(),
            centroid: Point2::origin(),
            spread: 0.0,
            reference: None,
            budget,
            prune_multiplier,
        }
    }

    /// Seed the cloud on `frame`.
    ///
    /// Returns `false` and leaves the cloud empty when `seeds` is empty; the
    /// centroid and spread then keep their previous values.
    pub fn initialize(&mut self, frame: &GrayFrame, mut seeds: Vec<Point2<f32>>) -> bool {
        seeds.truncate(self.budget);
        self.reference = Some(frame.clone());
        self.points = seeds;

        if self.points.is_empty() {
            return false;
        }
        self.centroid = mean(&self.points);
        self.spread = spread(&self.points, &self.centroid);
        log::debug!(
            "Seeded {} features, spread {:.2}",
            self.points.len(),
            self.spread
        );
        true
    }

    /// Reseed on relocalization. Same as [`initialize`](Self::initialize).
    pub fn reset(&mut self, frame: &GrayFrame, seeds: Vec<Point2<f32>>) -> bool {
        self.initialize(frame, seeds)
    }

    /// Follow the points into `next` and drop the ones that were lost or
    /// wandered away from the cluster. Returns the surviving points.
    pub fn advance<T: PointTracker>(
        &mut self,
        next: &GrayFrame,
        tracker: &mut T,
    ) -> Vec<Point2<f32>> {
        let reference = self.reference.replace(next.clone());
        let prev = match reference {
            Some(prev) if !self.points.is_empty() => prev,
            _ => {
                self.points.clear();
                return Vec::new();
            }
        };

        let found = match tracker.track(&prev, &self.points, next) {
            Ok(tracked) => tracked.into_valid(),
            Err(e) => {
                log::warn!("Point tracker failed, dropping {} features: {}", self.points.len(), e);
                Vec::new()
            }
        };

        if found.is_empty() {
            self.points.clear();
            return Vec::new();
        }

        self.centroid = mean(&found);
        self.points = self.prune(&found);
        self.points.clone()
    }

    /// Keep the candidates strictly closer to the centroid than
    /// `prune_multiplier * spread` (squared distance).
    pub fn prune(&self, candidates: &[Point2<f32>]) -> Vec<Point2<f32>> {
        let bound = self.prune_multiplier * self.spread;
        candidates
            .iter()
            .filter(|p| squared_distance(p, &self.centroid) < bound)
            .copied()
            .collect()
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    #[inline]
    pub fn centroid(&self) -> Point2<f32> {
        self.centroid
    }

    /// Mean squared distance to the centroid at the last (re)initialization.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn budget(&self) -> usize {
        self.budget
    }
}

fn squared_distance(p: &Point2<f32>, q: &Point2<f32>) -> f64 {
    let dx = f64::from(p.x) - f64::from(q.x);
    let dy = f64::from(p.y) - f64::from(q.y);
    dx * dx + dy * dy
}

/// Arithmetic mean of a non-empty point set.
fn mean(points: &[Point2<f32>]) -> Point2<f32> {
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0f64, 0.0f64), |(sx, sy), p| {
        (sx + f64::from(p.x), sy + f64::from(p.y))
    });
    Point2::new((sx / n) as f32, (sy / n) as f32)
}

/// Mean squared distance of a non-empty point set to `centroid`.
fn spread(points: &[Point2<f32>], centroid: &Point2<f32>) -> f64 {
    points.iter().map(|p| squared_distance(p, centroid)).sum::<f64>() / points.len() as f64
}
