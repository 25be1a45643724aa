mod support;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tracker_map::domain::{LngLat, ZoneOrigin};
use tracker_map::domain::ports::RenderSurface;
use tracker_map::domain::surface::ControlKind;
use tracker_map::interface_adapters::operator::read_operator_commands;
use tracker_map::use_cases::edit_modes::EditMode;
use tracker_map::use_cases::{MapCommand, map_task};

#[tokio::test]
async fn fixtures_load_into_a_rendered_map() {
    let h = support::loaded_session().await;

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.trackers, 4);
    assert_eq!(snapshot.zones, 3);
    // Sheremetyevo starts hidden.
    assert_eq!(snapshot.drawn_zones, 2);
    assert_eq!(snapshot.tasks, 3);
    assert_eq!(snapshot.markers, 4);
    assert!(h.session.is_simulating());
    assert!(h.surface.has_layer("geozone-fill-1"));
    assert!(!h.surface.has_layer("geozone-fill-2"));
}

#[tokio::test]
async fn moving_tracker_advances_along_its_route() {
    let mut h = support::loaded_session().await;
    let start = h.session.trackers().get("4").expect("moving tracker").coordinates;

    h.session.frame(Duration::ZERO);
    h.session.frame(Duration::from_millis(4000));

    let moved = h.session.trackers().get("4").expect("moving tracker");
    assert_ne!(moved.coordinates, start);
    assert!(moved.speed.is_some_and(|s| s <= 60));
    assert_eq!(
        h.surface.marker("tracker-4").expect("moving marker").position,
        moved.coordinates
    );
}

#[tokio::test]
async fn operator_script_names_the_zone_drawn_in_drawing_mode() {
    let h = support::loaded_session().await;
    let script = concat!(
        "{\"type\":\"DrawComplete\",\"data\":{\"ring\":[[50,50],[51,50],[51,51],[50,50]]}}\n",
        "{\"type\":\"ToggleDrawMode\"}\n",
        "{\"type\":\"DrawComplete\",\"data\":{\"ring\":[[37.60,55.75],[37.61,55.75],[37.61,55.76],[37.60,55.75]]}}\n",
        "{\"type\":\"ConfirmZoneName\",\"data\":{\"name\":\"Depot\"}}\n",
        "{\"type\":\"Toggle3D\"}\n",
    );
    let (tx, rx) = mpsc::channel(16);

    read_operator_commands(script.as_bytes(), tx).await;
    let session = map_task(h.session, rx, Duration::from_millis(5), Arc::new(Notify::new())).await;

    assert!(session.is_closed());
    assert_eq!(h.dialog.requests(), vec![format!("gz-{}", support::NOW_MILLIS)]);
    let zones = session.zones().all();
    assert_eq!(zones.len(), 4);
    let selected = session.zones().selected().expect("named zone selected");
    assert_eq!(selected.name, "Depot");
    assert_eq!(selected.origin, ZoneOrigin::Drawn);
    assert_eq!(selected.ring.first(), Some(&LngLat::new(37.60, 55.75)));
    assert!(session.is_3d());
    assert_eq!(session.edit_mode(), EditMode::Idle);

    assert!(h.surface.layer_ids().is_empty());
    assert!(h.surface.marker_ids().is_empty());
    assert!(!h.surface.controls().contains(&ControlKind::Draw));
}

#[tokio::test]
async fn notify_stops_the_loop_and_cleans_the_surface() {
    let h = support::loaded_session().await;
    let (tx, rx) = mpsc::channel(4);
    tx.send(MapCommand::ToggleFollow).await.expect("queue command");
    let shutdown = Arc::new(Notify::new());
    shutdown.notify_one();

    let session = map_task(h.session, rx, Duration::from_millis(5), shutdown).await;

    assert!(session.is_closed());
    assert!(h.surface.source_ids().is_empty());
    assert!(!session.is_simulating());
    drop(tx);
}
