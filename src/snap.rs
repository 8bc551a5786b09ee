use glam::*;

use crate::{MeasurementGraph, PairId};

/// The feature of a pair a [`SnapCandidate`] lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    /// Point A of the pair.
    PointA,

    /// Point B of the pair.
    PointB,

    /// The midpoint of the pair.
    Midpoint,
}

/// The closest snappable feature to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    /// The position to snap to.
    pub position: Vec3,
    /// The distance from the target.
    pub distance: f32,
    /// The feature kind.
    pub kind: SnapKind,
    /// The pair owning the feature.
    pub pair: PairId,
}

/// Find the closest feature of `graph` strictly within `threshold` of `target`.
///
/// Features are scanned as every point A, then every point B, then every midpoint, each in
/// insertion order. A candidate must be strictly closer than the best so far, so the first
/// encountered wins ties.
pub fn find_snap(target: Vec3, graph: &MeasurementGraph, threshold: f32) -> Option<SnapCandidate> {
    let features = graph
        .iter()
        .map(|pair| (pair.id(), SnapKind::PointA, pair.a().position))
        .chain(
            graph
                .iter()
                .map(|pair| (pair.id(), SnapKind::PointB, pair.b().position)),
        )
        .chain(
            graph
                .iter()
                .map(|pair| (pair.id(), SnapKind::Midpoint, pair.midpoint())),
        );

    features
        .fold(
            (threshold, None),
            |(closest, best), (pair, kind, position)| {
                let distance = target.distance(position);
                if distance < closest {
                    (
                        distance,
                        Some(SnapCandidate {
                            position,
                            distance,
                            kind,
                            pair,
                        }),
                    )
                } else {
                    (closest, best)
                }
            },
        )
        .1
}
