use glam::*;

use crate::{Camera, MeasureRenderer, PairVisuals};

/// Format a distance in meters for display.
///
/// Distances of at least a meter are shown in meters with two decimals, shorter ones in whole
/// centimeters truncated toward zero.
pub fn format_distance(meters: f32) -> String {
    if meters >= 1.0 {
        format!("{meters:.2} m")
    } else {
        format!("{} cm", (meters * 100.0).trunc() as i32)
    }
}

/// A straight segment between two world positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// The start.
    pub start: Vec3,
    /// The end.
    pub end: Vec3,
}

impl Segment {
    /// Create a new segment.
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Get the length.
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Get the midpoint.
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }
}

/// A distance label anchored in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// The text.
    pub text: String,
    /// The anchor position.
    pub anchor: Vec3,
}

impl Label {
    /// The default upward offset of the anchor from the segment midpoint.
    pub const DEFAULT_BIAS: f32 = 0.02;

    /// Create the label of a segment, anchored `bias` above its midpoint.
    pub fn for_segment(segment: &Segment, bias: f32) -> Self {
        Self {
            text: format_distance(segment.length()),
            anchor: segment.midpoint() + Camera::UP * bias,
        }
    }
}

/// The identity of a [`MeasurementPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u32);

/// The identity of a [`MeasurementPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(pub u32);

/// A placed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementPoint {
    /// The identity.
    pub id: PointId,
    /// The world position.
    pub position: Vec3,
}

/// A completed two point measurement.
///
/// Pairs are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPair {
    id: PairId,
    a: MeasurementPoint,
    b: MeasurementPoint,
    distance: f32,
    label: Label,
}

impl MeasurementPair {
    /// Get the identity.
    pub fn id(&self) -> PairId {
        self.id
    }

    /// Get point A.
    pub fn a(&self) -> &MeasurementPoint {
        &self.a
    }

    /// Get point B.
    pub fn b(&self) -> &MeasurementPoint {
        &self.b
    }

    /// Get the segment from A to B.
    pub fn segment(&self) -> Segment {
        Segment::new(self.a.position, self.b.position)
    }

    /// Get the midpoint between A and B.
    pub fn midpoint(&self) -> Vec3 {
        self.segment().midpoint()
    }

    /// Get the distance between A and B in meters.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Get the label.
    pub fn label(&self) -> &Label {
        &self.label
    }
}

#[derive(Debug)]
struct Entry {
    pair: MeasurementPair,
    visuals: PairVisuals,
}

/// The placed measurements of a session, in insertion order.
#[derive(Debug)]
pub struct MeasurementGraph {
    entries: Vec<Entry>,
    label_bias: f32,
    next_point_id: u32,
    next_pair_id: u32,
}

impl MeasurementGraph {
    /// Create a new empty graph.
    pub fn new(label_bias: f32) -> Self {
        Self {
            entries: Vec::new(),
            label_bias,
            next_point_id: 0,
            next_pair_id: 0,
        }
    }

    /// Get the number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MeasurementPair> + Clone + '_ {
        self.entries.iter().map(|entry| &entry.pair)
    }

    /// Get a pair.
    pub fn get(&self, id: PairId) -> Option<&MeasurementPair> {
        self.entry(id).map(|entry| &entry.pair)
    }

    /// Get the visuals of a pair.
    pub fn visuals(&self, id: PairId) -> Option<&PairVisuals> {
        self.entry(id).map(|entry| &entry.visuals)
    }

    /// Append a new pair from `a` to `b`.
    ///
    /// `spawn_visuals` is called once with the new pair to create its visuals, which the graph
    /// then owns.
    pub fn add_pair(
        &mut self,
        a: Vec3,
        b: Vec3,
        spawn_visuals: impl FnOnce(&MeasurementPair) -> PairVisuals,
    ) -> &MeasurementPair {
        let segment = Segment::new(a, b);
        let pair = MeasurementPair {
            id: PairId(self.next_pair_id),
            a: MeasurementPoint {
                id: PointId(self.next_point_id),
                position: a,
            },
            b: MeasurementPoint {
                id: PointId(self.next_point_id + 1),
                position: b,
            },
            distance: segment.length(),
            label: Label::for_segment(&segment, self.label_bias),
        };
        self.next_pair_id += 1;
        self.next_point_id += 2;

        let visuals = spawn_visuals(&pair);

        log::debug!(
            "Added pair {:?} of {} ({})",
            pair.id,
            pair.distance,
            pair.label.text
        );

        self.entries.push(Entry { pair, visuals });
        &self.entries[self.entries.len() - 1].pair
    }

    /// Remove all pairs, requesting destruction of every visual they own.
    ///
    /// Returns the number of pairs removed.
    pub fn clear(&mut self, renderer: &mut dyn MeasureRenderer) -> usize {
        let count = self.entries.len();

        for entry in self.entries.drain(..) {
            entry
                .visuals
                .handles()
                .into_iter()
                .for_each(|handle| renderer.destroy(handle));
        }

        if count > 0 {
            log::debug!("Cleared {count} pairs");
        }

        count
    }

    fn entry(&self, id: PairId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.pair.id == id)
    }
}

impl Default for MeasurementGraph {
    fn default() -> Self {
        Self::new(Label::DEFAULT_BIAS)
    }
}
