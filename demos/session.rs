use std::{cell::Cell, rc::Rc};

use clap::Parser;
use colored::Colorize;
use glam::*;

use ar_ruler as ruler;

/// The command line arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "\
    A synthetic measuring session over a flat floor.\n\
    \n\
    The camera looks down at the floor, places a point, walks forward and places a second \
    point. It then walks back next to the first point to show snapping and measures a second \
    pair from there, before resetting the session.\
    "
)]
struct Args {
    /// Distance in meters to walk between the two points of the first pair.
    #[arg(short, long, default_value_t = 1.5)]
    distance: f32,

    /// Height of the camera above the floor in meters.
    #[arg(long, default_value_t = 1.4)]
    height: f32,

    /// The snap threshold in meters.
    #[arg(short, long, default_value_t = 0.05)]
    snap_threshold: f32,

    /// Number of frames each walk takes.
    #[arg(short, long, default_value_t = 30)]
    frames: u32,

    /// Simulate a depth sensor in addition to plane raycasts.
    #[arg(long)]
    depth: bool,
}

/// The size of the synthetic depth frames, odd so the center sample is exact.
const DEPTH_SIZE: UVec2 = uvec2(65, 49);

fn main() -> Result<(), ruler::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let floor = Floor { height: 0.0 };
    let camera = Rc::new(Cell::new(
        ruler::Camera::new(std::f32::consts::FRAC_PI_3, 0.75).with_pose(
            vec3(0.0, floor.height + args.height, 0.0),
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4),
        ),
    ));

    let mut builder = ruler::MeasureController::builder()
        .config(ruler::MeasureConfig::default().with_snap_threshold(args.snap_threshold))
        .raycaster(FloorRaycaster {
            floor,
            camera: camera.clone(),
        })
        .haptics(ConsoleHaptics)
        .renderer(ConsoleRenderer::default());
    if args.depth {
        builder = builder.depth_source(FloorDepthSource {
            floor,
            camera: camera.clone(),
            frame: None,
        });
    }

    let mut session = Session {
        controller: builder.build()?,
        camera,
        frames: args.frames.max(1),
    };

    let start = session.camera.get().pos;
    let forward = vec3(0.0, 0.0, -args.distance);
    let side = vec3(args.distance, 0.0, 0.0);

    session.walk_to(start);
    session.place();
    session.walk_to(start + forward);
    session.place();

    println!("{}", "Walking back to the first point".bold());
    session.walk_to(start + vec3(args.snap_threshold * 0.5, 0.0, 0.0));
    session.place();
    session.walk_to(start + side);
    session.place();

    println!("{}", "Measurements".bold());
    for pair in session.controller.pairs() {
        println!(
            "  {:?}: {} -> {} = {}",
            pair.id(),
            pair.a().position,
            pair.b().position,
            pair.label().text.green().bold()
        );
    }

    session.controller.reset();

    Ok(())
}

/// The scripted user.
struct Session {
    controller: ruler::MeasureController,
    camera: Rc<Cell<ruler::Camera>>,
    frames: u32,
}

impl Session {
    const DT: f32 = 1.0 / 60.0;

    /// Move the camera to `target` over the configured number of frames.
    fn walk_to(&mut self, target: Vec3) {
        let from = self.camera.get().pos;

        for frame in 1..=self.frames {
            let mut camera = self.camera.get();
            camera.pos = from.lerp(target, frame as f32 / self.frames as f32);
            self.camera.set(camera);

            self.controller.tick(Self::DT, &camera);
        }

        let marker = self.controller.marker();
        match marker.snap {
            Some(snap) => println!(
                "  marker at {} {}",
                marker.target,
                format!("snapped to {:?} of {:?}", snap.kind, snap.pair).cyan()
            ),
            None if marker.visible => println!("  marker at {}", marker.target),
            None => println!("  {}", "no surface".yellow()),
        }
    }

    fn place(&mut self) {
        match self.controller.place() {
            Some(ruler::Placement::Started { position }) => {
                println!("{} at {position}", "Started".cyan());
            }
            Some(ruler::Placement::Completed { pair, distance }) => {
                println!(
                    "{} {pair:?}: {}",
                    "Completed".green(),
                    ruler::format_distance(distance).bold()
                );
            }
            None => println!("{}", "Nothing to place on".yellow()),
        }
    }
}

/// A horizontal infinite floor.
#[derive(Debug, Clone, Copy)]
struct Floor {
    height: f32,
}

impl Floor {
    /// Intersect the ray through `uv` with the floor.
    fn hit(&self, camera: &ruler::Camera, uv: Vec2) -> Option<Vec3> {
        let dir = camera.unproject(uv, 1.0) - camera.pos;
        if dir.y >= 0.0 {
            return None;
        }

        let t = (self.height - camera.pos.y) / dir.y;
        Some(camera.pos + dir * t)
    }
}

/// Raycasts the floor as a single detected plane.
struct FloorRaycaster {
    floor: Floor,
    camera: Rc<Cell<ruler::Camera>>,
}

impl ruler::GeometryRaycaster for FloorRaycaster {
    fn raycast(
        &mut self,
        screen_point: Vec2,
        trackables: ruler::TrackableType,
        hits: &mut Vec<ruler::GeometryHit>,
    ) {
        if !trackables.contains(ruler::TrackableType::PLANE_WITHIN_POLYGON) {
            return;
        }

        let camera = self.camera.get();
        hits.extend(
            self.floor
                .hit(&camera, screen_point)
                .map(|position| ruler::GeometryHit {
                    pose: ruler::Pose::from_position(position),
                    distance: position.distance(camera.pos),
                    trackable: ruler::TrackableType::PLANE_WITHIN_POLYGON,
                }),
        );
    }
}

/// Renders millimeter depth of the floor every frame.
struct FloorDepthSource {
    floor: Floor,
    camera: Rc<Cell<ruler::Camera>>,
    frame: Option<ruler::DepthFrame>,
}

impl ruler::DepthSource for FloorDepthSource {
    fn latest_depth_frame(&mut self) -> Option<&ruler::DepthFrame> {
        let camera = self.camera.get();
        let floor = self.floor;
        let max_index = (DEPTH_SIZE - UVec2::ONE).as_vec2();

        let samples = (0..DEPTH_SIZE.y)
            .flat_map(|y| (0..DEPTH_SIZE.x).map(move |x| uvec2(x, y)))
            .map(|pixel| {
                floor
                    .hit(&camera, pixel.as_vec2() / max_index)
                    .map_or(0, |position| {
                        ((position - camera.pos).dot(camera.get_forward()) * 1000.0).round() as u16
                    })
            })
            .collect::<Vec<_>>();

        let sequence = self.frame.as_ref().map_or(0, |frame| frame.sequence + 1);
        self.frame = Some(ruler::DepthFrame::from_millimeters(
            sequence,
            DEPTH_SIZE.x,
            DEPTH_SIZE.y,
            &samples,
        ));

        self.frame.as_ref()
    }
}

/// Prints haptic pulses.
struct ConsoleHaptics;

impl ruler::Haptics for ConsoleHaptics {
    fn pulse(&mut self, duration_ms: u32, intensity: u8) {
        println!("  {}", format!("bzz {duration_ms} ms @ {intensity}").magenta());
    }
}

/// Prints visual lifecycle events.
#[derive(Debug, Default)]
struct ConsoleRenderer {
    next_handle: u64,
}

impl ConsoleRenderer {
    fn next_handle(&mut self) -> ruler::VisualHandle {
        let handle = ruler::VisualHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl ruler::MeasureRenderer for ConsoleRenderer {
    fn spawn_marker(&mut self, position: Vec3) -> ruler::VisualHandle {
        let handle = self.next_handle();
        println!("  {} marker {handle:?} at {position}", "+".green());
        handle
    }

    fn spawn_segment(&mut self, segment: ruler::Segment) -> ruler::VisualHandle {
        let handle = self.next_handle();
        println!(
            "  {} segment {handle:?} from {} to {}",
            "+".green(),
            segment.start,
            segment.end
        );
        handle
    }

    fn spawn_label(&mut self, label: &ruler::Label) -> ruler::VisualHandle {
        let handle = self.next_handle();
        println!(
            "  {} label {handle:?} \"{}\" at {}",
            "+".green(),
            label.text,
            label.anchor
        );
        handle
    }

    fn destroy(&mut self, handle: ruler::VisualHandle) {
        println!("  {} {handle:?}", "-".red());
    }
}
