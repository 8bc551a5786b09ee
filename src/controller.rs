use glam::*;

use crate::{
    Approach, Camera, DepthSampler, DepthSource, Error, GeometryRaycaster, Haptics, Label,
    MeasureConfig, MeasureRenderer, MeasurementGraph, MeasurementPair, PairId, PairVisuals,
    PointResolver, ResolvedPoint, Segment, SnapCandidate, VisualHandle,
    config::validate_crosshair, find_snap, look_rotation,
};

/// The interaction state, derived from whether a pending start exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionState {
    /// Awaiting the first point of a pair.
    Idle,

    /// Awaiting the second point of a pair.
    PointPending,
}

/// The first point of an in-progress pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingStart {
    /// The position.
    pub position: Vec3,
    /// The placement marker, handed over to the pair on completion.
    pub marker: VisualHandle,
}

/// The crosshair marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Whether a point was resolved this tick.
    pub visible: bool,
    /// The displayed position, animated toward [`Marker::target`].
    pub position: Vec3,
    /// The displayed rotation.
    pub rotation: Quat,
    /// The position a place action commits, the snap position if any, otherwise the resolved
    /// point.
    pub target: Vec3,
    /// The resolved point of this tick.
    pub resolved: Option<ResolvedPoint>,
    /// The snap candidate of this tick.
    pub snap: Option<SnapCandidate>,
}

impl Marker {
    /// A hidden marker at the origin.
    pub const HIDDEN: Self = Self {
        visible: false,
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        target: Vec3::ZERO,
        resolved: None,
        snap: None,
    };

    /// Check if the marker is snapped.
    pub fn is_snapped(&self) -> bool {
        self.snap.is_some()
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::HIDDEN
    }
}

/// The live preview of an in-progress pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// From the pending start to the marker target.
    pub segment: Segment,
    /// The live distance label.
    pub label: Label,
    /// The billboard rotation of the label.
    pub label_rotation: Quat,
}

/// The outcome of a place action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// A pending start was recorded.
    Started { position: Vec3 },

    /// A pair was completed.
    Completed { pair: PairId, distance: f32 },
}

/// Drives point acquisition, snapping and placement, once per frame.
pub struct MeasureController {
    /// The configuration.
    config: MeasureConfig,

    /// The depth feed, absent on devices without a depth sensor.
    depth_source: Option<Box<dyn DepthSource>>,
    /// The geometry raycaster.
    raycaster: Box<dyn GeometryRaycaster>,
    /// The haptics.
    haptics: Box<dyn Haptics>,
    /// The renderer.
    renderer: Box<dyn MeasureRenderer>,

    /// The depth sampler.
    sampler: DepthSampler,
    /// The point resolver.
    resolver: PointResolver,
    /// The measurement graph.
    graph: MeasurementGraph,

    /// The pending start.
    pending: Option<PendingStart>,
    /// The marker.
    marker: Marker,
    /// The animated offset of the marker from the resolved point.
    marker_offset: Vec3,
    /// The snap position that last fired a haptic pulse.
    last_snap: Option<Vec3>,
    /// The live preview.
    preview: Option<Preview>,
    /// The billboard rotations of the pair labels, in pair order.
    label_rotations: Vec<Quat>,
    /// Whether any point has been resolved since creation.
    surface_found: bool,
}

impl MeasureController {
    /// Create a new builder.
    pub fn builder() -> MeasureControllerBuilder {
        MeasureControllerBuilder::new()
    }

    /// Get the configuration.
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Get the interaction state.
    pub fn state(&self) -> InteractionState {
        match self.pending {
            Some(..) => InteractionState::PointPending,
            None => InteractionState::Idle,
        }
    }

    /// Get the pending start position.
    pub fn pending_start(&self) -> Option<Vec3> {
        self.pending.map(|pending| pending.position)
    }

    /// Get the marker.
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Get the live preview.
    ///
    /// This is [`None`] while idle and on ticks where no point was resolved.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Get the measurement graph.
    pub fn graph(&self) -> &MeasurementGraph {
        &self.graph
    }

    /// Iterate the placed pairs in insertion order.
    pub fn pairs(&self) -> impl ExactSizeIterator<Item = &MeasurementPair> + Clone + '_ {
        self.graph.iter()
    }

    /// Get the billboard rotations of the pair labels, in pair order.
    pub fn label_rotations(&self) -> &[Quat] {
        &self.label_rotations
    }

    /// Check if any point has been resolved since creation.
    pub fn surface_found(&self) -> bool {
        self.surface_found
    }

    /// Get the depth sampler.
    pub fn sampler(&self) -> &DepthSampler {
        &self.sampler
    }

    /// Move the crosshair to a normalized screen point.
    pub fn set_crosshair(&mut self, crosshair: Vec2) -> Result<(), Error> {
        validate_crosshair(crosshair)?;
        self.config.crosshair = crosshair;
        Ok(())
    }

    /// Advance one frame of `dt` seconds seen from `camera`.
    pub fn tick(&mut self, dt: f32, camera: &Camera) -> &Marker {
        self.update_depth();

        match self.resolver.resolve(
            self.config.crosshair,
            camera,
            &self.sampler,
            self.raycaster.as_mut(),
        ) {
            Some(resolved) => {
                if !self.surface_found {
                    log::info!("Surface found via {:?}", resolved.source);
                    self.surface_found = true;
                }

                self.update_marker(resolved, dt, camera);
                self.update_preview(camera);
            }
            None => {
                self.hide_marker();
                self.preview = None;
            }
        }

        self.update_label_rotations(camera);

        &self.marker
    }

    /// Place a point at the marker target.
    ///
    /// Returns [`None`] without any change when the marker is not visible.
    pub fn place(&mut self) -> Option<Placement> {
        if !self.marker.visible {
            log::debug!("Ignoring place while marker is inactive");
            return None;
        }

        let position = self.marker.target;

        match self.pending.take() {
            None => {
                let marker = self.renderer.spawn_marker(position);
                self.pending = Some(PendingStart { position, marker });

                log::debug!("Started pair at {position}");

                Some(Placement::Started { position })
            }
            Some(start) => {
                let renderer = &mut self.renderer;
                let pair = self.graph.add_pair(start.position, position, |pair| PairVisuals {
                    point_a: start.marker,
                    point_b: renderer.spawn_marker(pair.b().position),
                    segment: renderer.spawn_segment(pair.segment()),
                    label: renderer.spawn_label(pair.label()),
                });

                log::info!("Measured {}", pair.label().text);

                let placement = Placement::Completed {
                    pair: pair.id(),
                    distance: pair.distance(),
                };

                self.preview = None;

                Some(placement)
            }
        }
    }

    /// Remove every pair and the pending start, returning to [`InteractionState::Idle`].
    pub fn reset(&mut self) {
        let cleared = self.graph.clear(self.renderer.as_mut());

        if let Some(start) = self.pending.take() {
            self.renderer.destroy(start.marker);
        }

        self.hide_marker();
        self.preview = None;
        self.label_rotations.clear();

        log::info!("Reset {cleared} measurements");
    }

    /// Ingest the latest depth frame if it is new.
    fn update_depth(&mut self) {
        let Some(frame) = self
            .depth_source
            .as_mut()
            .and_then(|source| source.latest_depth_frame())
        else {
            return;
        };

        if let Err(e) = self.sampler.update(frame) {
            log::warn!("Dropping depth frame {}: {e}", frame.sequence);
        }
    }

    /// Snap, animate and orient the marker toward the resolved point.
    fn update_marker(&mut self, resolved: ResolvedPoint, dt: f32, camera: &Camera) {
        let raw = resolved.pose.position;
        let snap = find_snap(raw, &self.graph, self.config.snap_threshold);

        match snap {
            Some(candidate) => {
                let is_new = self.last_snap.is_none_or(|last| {
                    last.distance(candidate.position) > self.config.snap_change_epsilon
                });

                if is_new {
                    log::trace!("Snapped to {:?} of {:?}", candidate.kind, candidate.pair);
                    self.config.haptic_pulse.fire(self.haptics.as_mut());
                    self.last_snap = Some(candidate.position);
                }
            }
            None => self.last_snap = None,
        }

        let rate = self.config.smoothing_rate;
        let target = snap.map_or(raw, |candidate| candidate.position);

        self.marker_offset = self.marker_offset.approach(target - raw, rate, dt);
        let position = raw + self.marker_offset;

        let target_rotation = match snap {
            Some(..) => look_rotation(camera.pos - position, Camera::UP),
            None => resolved.pose.rotation * self.config.marker_rest_rotation,
        };
        // A marker that just appeared starts at its target rotation.
        let rotation = match self.marker.visible {
            true => self.marker.rotation.approach(target_rotation, rate, dt),
            false => target_rotation,
        };

        self.marker = Marker {
            visible: true,
            position,
            rotation,
            target,
            resolved: Some(resolved),
            snap,
        };
    }

    /// Update the live preview while a pair is pending.
    fn update_preview(&mut self, camera: &Camera) {
        self.preview = self.pending.map(|start| {
            let segment = Segment::new(start.position, self.marker.target);
            let label = Label::for_segment(&segment, self.config.label_bias);
            let label_rotation = billboard(label.anchor, camera);

            Preview {
                segment,
                label,
                label_rotation,
            }
        });
    }

    /// Face every pair label toward the viewer.
    fn update_label_rotations(&mut self, camera: &Camera) {
        self.label_rotations.clear();
        self.label_rotations.extend(
            self.graph
                .iter()
                .map(|pair| billboard(pair.label().anchor, camera)),
        );
    }

    /// Hide the marker and forget any snap.
    fn hide_marker(&mut self) {
        self.marker = Marker::HIDDEN;
        self.marker_offset = Vec3::ZERO;
        self.last_snap = None;
    }
}

impl std::fmt::Debug for MeasureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasureController")
            .field("config", &self.config)
            .field("has_depth_source", &self.depth_source.is_some())
            .field("sampler", &self.sampler)
            .field("resolver", &self.resolver)
            .field("graph", &self.graph)
            .field("pending", &self.pending)
            .field("marker", &self.marker)
            .field("preview", &self.preview)
            .field("surface_found", &self.surface_found)
            .finish_non_exhaustive()
    }
}

/// Rotation of a label at `anchor` so its text reads from the camera.
fn billboard(anchor: Vec3, camera: &Camera) -> Quat {
    look_rotation(anchor - camera.pos, Camera::UP)
}

/// Builder of [`MeasureController`].
///
/// The raycaster, haptics and renderer are required, the depth source is optional.
#[derive(Default)]
pub struct MeasureControllerBuilder {
    config: MeasureConfig,
    depth_source: Option<Box<dyn DepthSource>>,
    raycaster: Option<Box<dyn GeometryRaycaster>>,
    haptics: Option<Box<dyn Haptics>>,
    renderer: Option<Box<dyn MeasureRenderer>>,
}

impl MeasureControllerBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn config(mut self, config: MeasureConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the depth source.
    pub fn depth_source(mut self, depth_source: impl DepthSource + 'static) -> Self {
        self.depth_source = Some(Box::new(depth_source));
        self
    }

    /// Set the geometry raycaster.
    pub fn raycaster(mut self, raycaster: impl GeometryRaycaster + 'static) -> Self {
        self.raycaster = Some(Box::new(raycaster));
        self
    }

    /// Set the haptics.
    pub fn haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Some(Box::new(haptics));
        self
    }

    /// Set the renderer.
    pub fn renderer(mut self, renderer: impl MeasureRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Build the controller.
    pub fn build(self) -> Result<MeasureController, Error> {
        self.config.validate()?;

        let raycaster = self
            .raycaster
            .ok_or(Error::MissingCollaborator("raycaster"))?;
        let haptics = self.haptics.ok_or(Error::MissingCollaborator("haptics"))?;
        let renderer = self
            .renderer
            .ok_or(Error::MissingCollaborator("renderer"))?;

        if self.depth_source.is_none() {
            log::debug!("No depth source, resolving with geometry raycasts only");
        }

        log::debug!("Creating measure controller with {:?}", self.config);

        Ok(MeasureController {
            resolver: PointResolver::new(self.config.resolve_policy, self.config.trackables),
            graph: MeasurementGraph::new(self.config.label_bias),
            config: self.config,

            depth_source: self.depth_source,
            raycaster,
            haptics,
            renderer,

            sampler: DepthSampler::new(),

            pending: None,
            marker: Marker::HIDDEN,
            marker_offset: Vec3::ZERO,
            last_snap: None,
            preview: None,
            label_rotations: Vec::new(),
            surface_found: false,
        })
    }
}
