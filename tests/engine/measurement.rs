use ar_ruler::{
    Label, MeasurementGraph, PairId, PairVisuals, PointId, Segment, VisualHandle,
    format_distance, glam::*,
};

use crate::common::{RecordingRenderer, RenderLog, given};

#[test]
fn test_format_distance_when_at_least_a_meter_should_use_meters() {
    assert_eq!(format_distance(2.0), "2.00 m");
    assert_eq!(format_distance(1.0), "1.00 m");
    assert_eq!(format_distance(1.234), "1.23 m");
    assert_eq!(format_distance(12.5), "12.50 m");
}

#[test]
fn test_format_distance_when_below_a_meter_should_truncate_centimeters() {
    assert_eq!(format_distance(0.999), "99 cm");
    assert_eq!(format_distance(0.456), "45 cm");
    assert_eq!(format_distance(0.009), "0 cm");
    assert_eq!(format_distance(0.0), "0 cm");
}

#[test]
fn test_segment_should_report_length_and_midpoint() {
    let segment = Segment::new(vec3(1.0, 2.0, 3.0), vec3(4.0, 6.0, 3.0));

    assert_eq!(segment.length(), 5.0);
    assert_eq!(segment.midpoint(), vec3(2.5, 4.0, 3.0));
}

#[test]
fn test_label_for_segment_should_anchor_above_midpoint() {
    let segment = Segment::new(Vec3::ZERO, vec3(0.0, 0.0, -0.5));

    let label = Label::for_segment(&segment, Label::DEFAULT_BIAS);

    assert_eq!(label.text, "50 cm");
    given::assert_vec3_near(label.anchor, vec3(0.0, 0.02, -0.25));
}

#[test]
fn test_measurement_graph_add_pair_should_assign_sequential_ids() {
    let graph = given::graph(&[
        (Vec3::ZERO, vec3(2.0, 0.0, 0.0)),
        (Vec3::ZERO, vec3(0.0, 0.3, 0.0)),
    ]);

    let pairs = graph.iter().collect::<Vec<_>>();

    assert_eq!(graph.len(), 2);
    assert_eq!(pairs[0].id(), PairId(0));
    assert_eq!(pairs[0].a().id, PointId(0));
    assert_eq!(pairs[0].b().id, PointId(1));
    assert_eq!(pairs[1].id(), PairId(1));
    assert_eq!(pairs[1].a().id, PointId(2));
    assert_eq!(pairs[1].b().id, PointId(3));
}

#[test]
fn test_measurement_graph_add_pair_should_measure_and_label() {
    let graph = given::graph(&[(Vec3::ZERO, vec3(0.0, 0.0, 2.0))]);

    let pair = graph.get(PairId(0)).expect("pair");

    assert_eq!(pair.distance(), 2.0);
    assert_eq!(pair.label().text, "2.00 m");
    assert_eq!(pair.midpoint(), vec3(0.0, 0.0, 1.0));
    assert_eq!(pair.segment(), Segment::new(Vec3::ZERO, vec3(0.0, 0.0, 2.0)));
    assert_eq!(
        graph.visuals(PairId(0)).map(PairVisuals::handles),
        Some([VisualHandle(0), VisualHandle(1), VisualHandle(2), VisualHandle(3)])
    );
    assert_eq!(graph.get(PairId(1)), None);
}

#[test]
fn test_measurement_graph_add_pair_should_pass_new_pair_to_spawner() {
    let mut graph = MeasurementGraph::new(0.1);
    let mut seen = None;

    graph.add_pair(Vec3::ZERO, Vec3::X, |pair| {
        seen = Some(pair.clone());
        PairVisuals {
            point_a: VisualHandle(7),
            point_b: VisualHandle(8),
            segment: VisualHandle(9),
            label: VisualHandle(10),
        }
    });

    let seen = seen.expect("spawner called");
    assert_eq!(graph.iter().next(), Some(&seen));
    given::assert_vec3_near(seen.label().anchor, vec3(0.5, 0.1, 0.0));
}

#[test]
fn test_measurement_graph_clear_should_destroy_every_visual() {
    let mut renderer = RecordingRenderer::default();
    let mut graph = rendered_graph(&renderer, &[Vec3::X, Vec3::Y, Vec3::Z]);

    let cleared = graph.clear(&mut renderer);

    assert_eq!(cleared, 3);
    assert!(graph.is_empty());
    assert_eq!(graph.iter().len(), 0);

    let log = renderer.0.borrow();
    assert!(log.alive.is_empty());
    assert_eq!(log.destroyed.len(), 12);
    assert_eq!(log.destroyed[..4], [0, 1, 2, 3].map(VisualHandle));
}

#[test]
fn test_measurement_graph_clear_when_empty_should_do_nothing() {
    let mut renderer = RecordingRenderer::default();
    let mut graph = MeasurementGraph::default();

    assert_eq!(graph.clear(&mut renderer), 0);
    assert_eq!(graph.clear(&mut renderer), 0);
    assert!(renderer.0.borrow().destroyed.is_empty());
}

#[test]
fn test_measurement_graph_after_clear_should_keep_ids_increasing() {
    let mut renderer = RecordingRenderer::default();
    let mut graph = rendered_graph(&renderer, &[Vec3::X]);
    graph.clear(&mut renderer);

    let log = renderer.0.clone();
    let id = graph
        .add_pair(Vec3::ZERO, Vec3::Y, |_| spawn_visuals(&mut log.borrow_mut()))
        .id();

    assert_eq!(id, PairId(1));
    assert_eq!(graph.len(), 1);
}

fn spawn_visuals(log: &mut RenderLog) -> PairVisuals {
    PairVisuals {
        point_a: log.spawn(),
        point_b: log.spawn(),
        segment: log.spawn(),
        label: log.spawn(),
    }
}

/// A graph of pairs from the origin to each of `ends`, with visuals spawned on `renderer`.
fn rendered_graph(renderer: &RecordingRenderer, ends: &[Vec3]) -> MeasurementGraph {
    let mut graph = MeasurementGraph::default();
    for end in ends {
        graph.add_pair(Vec3::ZERO, *end, |_| {
            spawn_visuals(&mut renderer.0.borrow_mut())
        });
    }
    graph
}
