use glam::*;

use crate::{
    Camera, DepthSampler, GeometryHit, GeometryRaycaster, Pose, TrackableType, nearest_hit,
};

/// Where a [`ResolvedPoint`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointSource {
    /// Unprojected from the dense depth frame.
    Depth,

    /// The nearest geometry raycast hit.
    GeometryRaycast,
}

/// The order in which the [`PointResolver`] consults its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResolvePolicy {
    /// Depth when a valid sample exists, otherwise the geometry raycast.
    #[default]
    DepthFirst,

    /// The geometry raycast when it hits, otherwise depth.
    RaycastFirst,

    /// Depth only.
    DepthOnly,

    /// The geometry raycast only.
    RaycastOnly,
}

impl ResolvePolicy {
    /// Get the sources to try, in order.
    pub const fn order(&self) -> &'static [PointSource] {
        match self {
            Self::DepthFirst => &[PointSource::Depth, PointSource::GeometryRaycast],
            Self::RaycastFirst => &[PointSource::GeometryRaycast, PointSource::Depth],
            Self::DepthOnly => &[PointSource::Depth],
            Self::RaycastOnly => &[PointSource::GeometryRaycast],
        }
    }
}

/// The world point found under the crosshair for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPoint {
    /// The pose of the point.
    ///
    /// Depth points carry [`Quat::IDENTITY`] since a single sample has no surface orientation.
    pub pose: Pose,
    /// The source of the point.
    pub source: PointSource,
}

/// Resolves the world point under the crosshair.
#[derive(Debug)]
pub struct PointResolver {
    /// The policy.
    policy: ResolvePolicy,
    /// The trackables the geometry raycast may hit.
    trackables: TrackableType,
    /// Reusable raycast hit buffer, cleared on every raycast.
    hits: Vec<GeometryHit>,
}

impl PointResolver {
    /// Create a new resolver.
    pub fn new(policy: ResolvePolicy, trackables: TrackableType) -> Self {
        Self {
            policy,
            trackables,
            hits: Vec::new(),
        }
    }

    /// Get the policy.
    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    /// Set the policy.
    pub fn set_policy(&mut self, policy: ResolvePolicy) {
        self.policy = policy;
    }

    /// Get the trackables.
    pub fn trackables(&self) -> TrackableType {
        self.trackables
    }

    /// Resolve the point under `crosshair`, a normalized screen point.
    ///
    /// Sources are tried in the order of the [`ResolvePolicy`], returning the first that yields
    /// a point.
    pub fn resolve(
        &mut self,
        crosshair: Vec2,
        camera: &Camera,
        sampler: &DepthSampler,
        raycaster: &mut dyn GeometryRaycaster,
    ) -> Option<ResolvedPoint> {
        let resolved = self.policy.order().iter().find_map(|source| match source {
            PointSource::Depth => Self::resolve_depth(crosshair, camera, sampler),
            PointSource::GeometryRaycast => self.resolve_raycast(crosshair, raycaster),
        });

        match &resolved {
            Some(point) => log::trace!(
                "Resolved {:?} point at {}",
                point.source,
                point.pose.position
            ),
            None => log::trace!("No point found at {crosshair}"),
        }

        resolved
    }

    /// Resolve using the depth frame.
    fn resolve_depth(
        crosshair: Vec2,
        camera: &Camera,
        sampler: &DepthSampler,
    ) -> Option<ResolvedPoint> {
        let depth = sampler.sample(crosshair)?;

        Some(ResolvedPoint {
            pose: Pose::from_position(camera.unproject(crosshair, depth)),
            source: PointSource::Depth,
        })
    }

    /// Resolve using the geometry raycast.
    fn resolve_raycast(
        &mut self,
        crosshair: Vec2,
        raycaster: &mut dyn GeometryRaycaster,
    ) -> Option<ResolvedPoint> {
        self.hits.clear();
        raycaster.raycast(crosshair, self.trackables, &mut self.hits);

        nearest_hit(&self.hits).map(|hit| ResolvedPoint {
            pose: hit.pose,
            source: PointSource::GeometryRaycast,
        })
    }
}

impl Default for PointResolver {
    fn default() -> Self {
        Self::new(ResolvePolicy::default(), TrackableType::default())
    }
}
