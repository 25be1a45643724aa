// Map session: owns the collections and every map component, driven by one loop.

use super::edit_modes::{EditEvent, EditMode, EditModeMachine};
use super::geozones::GeoZoneStore;
use super::markers::TrackerMarkers;
use super::motion::MotionEngine;
use super::tasks::TaskStore;
use super::trackers::TrackerStore;
use super::types::{FleetSnapshot, MapCommand, PositionReport};
use super::view::ViewController;
use super::zone_sync::ZoneSynchronizer;
use crate::domain::format::{format_coordinates, format_date};
use crate::domain::ports::{
    Clock, DomainDataSource, DrawTool, GeocodeTool, NamingDialog, PositionSink, RenderSurface,
};
use crate::domain::tuning::Tuning;
use crate::domain::{GeoZone, PositionUpdate, Task, ZoneOrigin};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{Notify, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Position sink feeding the session's own report queue.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PositionReport>,
}

impl PositionSink for ChannelSink {
    fn publish(&self, tracker_id: &str, update: PositionUpdate) {
        // The receiver lives in the same session; a send only fails during teardown.
        let _ = self.tx.send(PositionReport {
            tracker_id: tracker_id.to_string(),
            update,
        });
    }
}

/// Collaborators injected into a session.
pub struct SessionPorts<S, D, G, N, C> {
    pub surface: S,
    pub draw: D,
    pub geocoder: G,
    pub dialog: N,
    pub clock: C,
}

pub struct MapSession<S, D, G, N, C> {
    clock: C,
    dialog: N,
    trackers: TrackerStore,
    zones: GeoZoneStore,
    tasks: TaskStore,
    engine: MotionEngine<ChannelSink>,
    positions: mpsc::UnboundedReceiver<PositionReport>,
    feedback: mpsc::UnboundedReceiver<MapCommand>,
    zone_sync: ZoneSynchronizer<S>,
    markers: TrackerMarkers<S>,
    edit: EditModeMachine<S, D, G, C>,
    view: ViewController<S>,
    closed: bool,
}

impl<S, D, G, N, C> MapSession<S, D, G, N, C>
where
    S: RenderSurface + Clone,
    D: DrawTool,
    G: GeocodeTool,
    N: NamingDialog,
    C: Clock + Clone,
{
    pub fn new(ports: SessionPorts<S, D, G, N, C>, tuning: Tuning) -> Self {
        let (position_tx, positions) = mpsc::unbounded_channel();
        let (feedback_tx, feedback) = mpsc::unbounded_channel();

        // Clicks come back through the command queue; the components never decide policy.
        let zone_clicks = feedback_tx.clone();
        let zone_sync = ZoneSynchronizer::new(
            ports.surface.clone(),
            tuning.zones,
            Box::new(move |id: &str| {
                let _ = zone_clicks.send(MapCommand::SelectZone { id: id.to_string() });
            }),
        );
        let markers = TrackerMarkers::new(
            ports.surface.clone(),
            Box::new(move |id: &str| {
                let _ = feedback_tx.send(MapCommand::SelectTracker { id: id.to_string() });
            }),
        );

        Self {
            edit: EditModeMachine::new(
                ports.surface.clone(),
                ports.draw,
                ports.geocoder,
                ports.clock.clone(),
            ),
            view: ViewController::new(ports.surface, tuning.view),
            clock: ports.clock,
            dialog: ports.dialog,
            trackers: TrackerStore::new(),
            zones: GeoZoneStore::new(),
            tasks: TaskStore::new(),
            engine: MotionEngine::new(ChannelSink { tx: position_tx }, tuning.motion),
            positions,
            feedback,
            zone_sync,
            markers,
            closed: false,
        }
    }

    /// Materializes the collections, renders them and starts the moving tracker.
    ///
    /// Fetch failures are logged and leave the affected collection empty.
    pub async fn load<DS>(&mut self, source: &DS)
    where
        DS: DomainDataSource + ?Sized,
    {
        let trackers = source.fetch_trackers().await.unwrap_or_else(|error| {
            error!(%error, "failed to fetch trackers");
            Vec::new()
        });
        let zones = source.fetch_geozones().await.unwrap_or_else(|error| {
            error!(%error, "failed to fetch geozones");
            Vec::new()
        });
        let tasks = source.fetch_tasks().await.unwrap_or_else(|error| {
            error!(%error, "failed to fetch tasks");
            Vec::new()
        });

        self.trackers.load(trackers);
        self.zones.load(zones);
        self.tasks.load(tasks);

        self.sync_zones();
        self.markers.place(self.trackers.all());
        self.setup_moving_tracker(source).await;

        let snapshot = self.snapshot();
        info!(
            trackers = snapshot.trackers,
            zones = snapshot.zones,
            tasks = snapshot.tasks,
            assigned_trackers = self.tasks.assigned_trackers().len(),
            "fleet loaded"
        );
    }

    /// One scheduler frame: advance the simulation, apply emitted positions, follow.
    pub fn frame(&mut self, now: Duration) {
        if self.closed {
            return;
        }
        self.engine.tick(now);

        while let Ok(report) = self.positions.try_recv() {
            self.trackers
                .update_position(&report.tracker_id, report.update, self.clock.now());
            self.markers.move_moving(report.update);
        }

        self.view.follow(&mut self.trackers);
    }

    /// Applies an operator command plus any click feedback it produced.
    ///
    /// Breaks when the session should end.
    pub fn handle(&mut self, command: MapCommand) -> ControlFlow<()> {
        if self.closed {
            return ControlFlow::Break(());
        }
        self.apply(command)?;

        while let Ok(command) = self.feedback.try_recv() {
            self.apply(command)?;
        }
        ControlFlow::Continue(())
    }

    /// Stops the simulation and releases everything placed on the surface.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.engine.stop();
        self.edit.teardown();
        self.zone_sync.teardown();
        self.markers.teardown();
        self.view.teardown();
        info!("map session closed");
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            trackers: self.trackers.all().len(),
            zones: self.zones.all().len(),
            drawn_zones: self.zone_sync.drawn_ids().count(),
            tasks: self.tasks.all().len(),
            markers: self.markers.placed_ids().count()
                + usize::from(self.markers.moving_id().is_some()),
        }
    }

    pub fn trackers(&self) -> &TrackerStore {
        &self.trackers
    }

    pub fn zones(&self) -> &GeoZoneStore {
        &self.zones
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit.mode()
    }

    pub fn pending_zone(&self) -> Option<&GeoZone> {
        self.edit.pending()
    }

    pub fn is_3d(&self) -> bool {
        self.view.is_3d()
    }

    pub fn is_simulating(&self) -> bool {
        self.engine.is_running()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    async fn setup_moving_tracker<DS>(&mut self, source: &DS)
    where
        DS: DomainDataSource + ?Sized,
    {
        let Some(moving) = self.trackers.moving().cloned() else {
            debug!("no moving tracker, simulation idle");
            return;
        };
        let route = match source.fetch_moving_route().await {
            Ok(route) => route,
            Err(error) => {
                error!(%error, "failed to fetch moving tracker route");
                return;
            }
        };
        let Some(start) = route.position(0) else {
            warn!(tracker_id = %moving.id, "moving tracker route is empty");
            return;
        };

        self.engine.load(route, moving.id.clone());
        if self.engine.tracker_id() != Some(moving.id.as_str()) {
            return;
        }
        if let Err(error) = self.markers.place_moving(&moving, start) {
            warn!(tracker_id = %moving.id, %error, "failed to place moving marker");
        }
        self.engine.start();
    }

    fn apply(&mut self, command: MapCommand) -> ControlFlow<()> {
        match command {
            MapCommand::ToggleDrawMode => {
                if let Err(error) = self.edit.toggle_drawing() {
                    warn!(%error, "failed to enter drawing mode");
                }
            }
            MapCommand::ToggleSmartZoneMode => {
                if let Err(error) = self.edit.toggle_smart_zone() {
                    warn!(%error, "failed to enter smart zone mode");
                }
            }
            MapCommand::ExitEditMode => self.edit.exit(),
            MapCommand::DrawComplete { drawn } => {
                let events = self.edit.on_draw_complete(drawn);
                self.apply_edit_events(events);
            }
            MapCommand::GeocodeResult(result) => {
                let events = self.edit.on_geocode_result(result);
                self.apply_edit_events(events);
            }
            MapCommand::ConfirmZoneName { name } => match self.edit.confirm_name(name) {
                Some(zone) => self.commit_zone(zone),
                None => debug!("no pending zone to name"),
            },
            MapCommand::ToggleZoneVisibility { id } => {
                if self.zones.toggle_visibility(&id, false) {
                    self.sync_zones();
                } else {
                    debug!(zone_id = %id, "visibility toggle for unknown zone");
                }
            }
            MapCommand::DeleteZone { id } => {
                if self.zones.delete(&id) {
                    self.sync_zones();
                }
            }
            MapCommand::SelectZone { id } => self.select_zone(&id),
            MapCommand::CenterOnZone { id } => self.zone_sync.center_on(&id),
            MapCommand::SelectTracker { id } => {
                if let Some(tracker) = self.trackers.get(&id) {
                    info!(
                        tracker_id = %id,
                        position = %format_coordinates(tracker.coordinates),
                        last_update = %format_date(tracker.last_update.naive_utc()),
                        assigned = self.tasks.is_tracker_assigned(&id),
                        "tracker selected"
                    );
                }
                self.trackers.select(&id);
            }
            MapCommand::SetTrackerColor { id, color } => {
                self.trackers.update_color(&id, color);
                self.markers.restyle(self.trackers.all());
            }
            MapCommand::SetTrackerPhoto { id, photo } => {
                self.trackers.update_photo(&id, photo);
                self.markers.restyle(self.trackers.all());
            }
            MapCommand::RemoveTrackerPhoto { id } => {
                self.trackers.remove_photo(&id);
                self.markers.restyle(self.trackers.all());
            }
            MapCommand::AddTask(task) => self.add_task(task),
            MapCommand::SelectTask { id } => {
                if let Some(task) = self.tasks.get(&id) {
                    info!(
                        task_id = %id,
                        tracker_id = %task.tracker_id,
                        deadline = %format_date(task.deadline),
                        "task selected"
                    );
                }
                self.tasks.select(&id);
            }
            MapCommand::DeleteTask { id } => {
                if !self.tasks.delete(&id) {
                    debug!(task_id = %id, "delete requested for unknown task");
                }
            }
            MapCommand::ToggleFollow => {
                self.trackers.toggle_follow();
            }
            MapCommand::Toggle3D => {
                self.view.toggle_3d();
            }
            MapCommand::Pointer(event) => {
                if !self.zone_sync.handle_pointer(&event) && !self.markers.handle_pointer(&event) {
                    debug!(?event, "pointer event without owner");
                }
            }
            MapCommand::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn apply_edit_events(&mut self, events: Vec<EditEvent>) {
        for event in events {
            match event {
                // Geocoded names are authoritative, so smart zones skip the dialog.
                EditEvent::ZoneProposed(zone) if zone.origin == ZoneOrigin::SmartZone => {
                    self.commit_zone(zone);
                }
                EditEvent::ZoneProposed(zone) => {
                    debug!(zone_id = %zone.id, "zone pending until named");
                }
                EditEvent::NameRequested => {
                    if let Some(pending) = self.edit.pending() {
                        self.dialog.request_open(pending);
                    }
                }
            }
        }
    }

    // A required task needs a tracker no other required task holds.
    fn add_task(&mut self, task: Task) {
        if task.required {
            let ids = self.trackers.ids();
            if !self.tasks.available_trackers(&ids).contains(&task.tracker_id.as_str()) {
                warn!(
                    task_id = %task.id,
                    tracker_id = %task.tracker_id,
                    "tracker unknown or already on a required task, task rejected"
                );
                return;
            }
        }
        debug!(task_id = %task.id, deadline = %format_date(task.deadline), "creating task");
        self.tasks.add(task);
    }

    fn commit_zone(&mut self, zone: GeoZone) {
        let id = zone.id.clone();
        self.zones.add(zone);
        self.zones.select(&id);
        self.sync_zones();
    }

    fn select_zone(&mut self, id: &str) {
        if self.zones.get(id).is_none() {
            debug!(zone_id = id, "select requested for unknown zone");
            return;
        }
        self.zones.select(id);
        self.sync_zones();
        info!(
            zone_id = id,
            tasks = self.tasks.tasks_for_zone(id).count(),
            "zone selected"
        );
    }

    fn sync_zones(&mut self) {
        self.zone_sync.synchronize(self.zones.all());
    }
}

/// Drives a session until shutdown is notified, a `Shutdown` command arrives,
/// or the command channel closes.
pub async fn map_task<S, D, G, N, C>(
    mut session: MapSession<S, D, G, N, C>,
    mut command_rx: mpsc::Receiver<MapCommand>,
    frame_interval: Duration,
    shutdown: Arc<Notify>,
) -> MapSession<S, D, G, N, C>
where
    S: RenderSurface + Clone,
    D: DrawTool,
    G: GeocodeTool,
    N: NamingDialog,
    C: Clock + Clone,
{
    // The interval is the frame scheduler; late frames are skipped, not replayed.
    let mut interval = tokio::time::interval(frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let started = Instant::now();

    'frames: loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("shutdown requested");
                break;
            }
            _ = interval.tick() => {}
        }

        loop {
            match command_rx.try_recv() {
                Ok(command) => {
                    if session.handle(command).is_break() {
                        break 'frames;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("operator input closed");
                    break 'frames;
                }
            }
        }

        session.frame(started.elapsed());
    }

    session.shutdown();
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::surface::{
        ControlKind, DrawnGeometry, GeocodeResult, PointerEvent, PointerEventKind, PointerTarget,
    };
    use crate::domain::{LngLat, Route, TrackerState};
    use crate::interface_adapters::controls::{
        HeadlessDrawTool, HeadlessGeocoder, LoggingNamingDialog,
    };
    use crate::interface_adapters::headless::HeadlessSurface;
    use crate::use_cases::test_support::{
        FixedClock, StaticDataSource, task, tracker, unit_square, zone,
    };

    type Session = MapSession<
        HeadlessSurface,
        HeadlessDrawTool,
        HeadlessGeocoder,
        LoggingNamingDialog,
        FixedClock,
    >;

    struct Fixture {
        surface: HeadlessSurface,
        draw: HeadlessDrawTool,
        dialog: LoggingNamingDialog,
        session: Session,
    }

    fn fixture() -> Fixture {
        let surface = HeadlessSurface::new();
        let draw = HeadlessDrawTool::new();
        let dialog = LoggingNamingDialog::new();
        let session = MapSession::new(
            SessionPorts {
                surface: surface.clone(),
                draw: draw.clone(),
                geocoder: HeadlessGeocoder::new(),
                dialog: dialog.clone(),
                clock: FixedClock::at_millis(1_700_000_000_000),
            },
            Tuning::default(),
        );
        Fixture {
            surface,
            draw,
            dialog,
            session,
        }
    }

    fn data_source() -> StaticDataSource {
        StaticDataSource {
            trackers: Some(vec![
                tracker("1", TrackerState::Stopped),
                tracker("2", TrackerState::Moving),
            ]),
            zones: Some(vec![zone("1", true), zone("2", false)]),
            tasks: Some(vec![task("1", "1", "1", true)]),
            route: Some(Route::from_points([(0.0, 0.0), (1.0, 1.0)])),
        }
    }

    fn send(session: &mut Session, command: MapCommand) {
        assert!(session.handle(command).is_continue());
    }

    async fn loaded() -> Fixture {
        let mut f = fixture();
        f.session.load(&data_source()).await;
        f
    }

    #[tokio::test]
    async fn when_loaded_then_visible_zones_markers_and_simulation_are_set_up() {
        let f = loaded().await;

        let snapshot = f.session.snapshot();
        assert_eq!(snapshot.trackers, 2);
        assert_eq!(snapshot.zones, 2);
        assert_eq!(snapshot.drawn_zones, 1);
        assert_eq!(snapshot.markers, 2);
        assert!(f.session.is_simulating());
        let moving = f.surface.marker("tracker-2").expect("moving marker");
        assert_eq!(moving.position, LngLat::new(0.0, 0.0));
    }

    #[tokio::test]
    async fn when_a_fetch_fails_then_that_collection_stays_empty() {
        let mut f = fixture();
        let source = StaticDataSource {
            zones: None,
            route: None,
            ..data_source()
        };

        f.session.load(&source).await;

        let snapshot = f.session.snapshot();
        assert_eq!(snapshot.zones, 0);
        assert_eq!(snapshot.trackers, 2);
        assert!(!f.session.is_simulating());
    }

    #[tokio::test]
    async fn when_frames_advance_then_moving_tracker_and_marker_follow_route() {
        let mut f = loaded().await;

        f.session.frame(Duration::ZERO);
        f.session.frame(Duration::from_millis(4000));

        let moving = f.session.trackers().get("2").expect("tracker");
        assert_eq!(moving.coordinates, LngLat::new(0.5, 0.5));
        assert_eq!(moving.speed, Some(60));
        assert_eq!(
            f.surface.marker("tracker-2").expect("marker").position,
            LngLat::new(0.5, 0.5)
        );
    }

    #[tokio::test]
    async fn when_following_then_camera_tracks_the_moving_tracker() {
        let mut f = loaded().await;
        send(&mut f.session, MapCommand::ToggleFollow);

        f.session.frame(Duration::ZERO);
        f.session.frame(Duration::from_millis(2000));

        assert_eq!(f.surface.camera().center, LngLat::new(0.25, 0.25));
    }

    #[tokio::test]
    async fn when_drawn_zone_is_named_then_it_is_added_selected_and_drawn() {
        let mut f = loaded().await;
        send(&mut f.session, MapCommand::ToggleDrawMode);
        f.draw.draw(DrawnGeometry::Polygon(vec![unit_square()]));

        send(&mut f.session, MapCommand::DrawComplete { drawn: None });
        assert_eq!(f.dialog.requests(), vec!["gz-1700000000000".to_string()]);
        assert_eq!(f.session.zones().all().len(), 2);

        send(&mut f.session, MapCommand::ConfirmZoneName {
            name: "Depot".into(),
        });

        let selected = f.session.zones().selected().expect("selected zone");
        assert_eq!(selected.name, "Depot");
        assert!(f.surface.has_layer("geozone-fill-gz-1700000000000"));
        assert!(f.session.pending_zone().is_none());
    }

    fn drawn_square(offset: f64) -> Option<DrawnGeometry> {
        let ring = unit_square()
            .into_iter()
            .map(|p| LngLat::new(p.lng + offset, p.lat + offset))
            .collect();
        Some(DrawnGeometry::Polygon(vec![ring]))
    }

    fn pending_start(session: &Session) -> Option<LngLat> {
        session.pending_zone().and_then(|z| z.ring.first().copied())
    }

    #[tokio::test]
    async fn when_drawings_arrive_back_to_back_then_pending_zone_has_the_latest_ring() {
        let mut f = loaded().await;
        send(&mut f.session, MapCommand::DrawComplete { drawn: drawn_square(50.0) });
        assert!(f.session.pending_zone().is_none());
        assert!(f.draw.drawn().is_empty());

        send(&mut f.session, MapCommand::ToggleDrawMode);
        send(&mut f.session, MapCommand::DrawComplete { drawn: drawn_square(0.0) });
        assert_eq!(pending_start(&f.session), Some(LngLat::new(0.0, 0.0)));

        send(&mut f.session, MapCommand::DrawComplete { drawn: drawn_square(5.0) });
        assert_eq!(pending_start(&f.session), Some(LngLat::new(5.0, 5.0)));
        assert_eq!(f.dialog.requests().len(), 2);
    }

    #[tokio::test]
    async fn when_required_task_targets_a_held_tracker_then_it_is_rejected() {
        let mut f = loaded().await;

        send(&mut f.session, MapCommand::AddTask(task("2", "1", "1", true)));
        assert!(f.session.tasks().get("2").is_none());

        send(&mut f.session, MapCommand::AddTask(task("3", "1", "2", true)));
        send(&mut f.session, MapCommand::AddTask(task("4", "1", "1", false)));

        assert_eq!(f.session.tasks().all().len(), 3);
        assert_eq!(f.session.tasks().selected().map(|t| t.id.as_str()), Some("4"));
        assert_eq!(f.session.tasks().assigned_trackers(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn when_required_task_names_an_unknown_tracker_then_it_is_rejected() {
        let mut f = loaded().await;

        send(&mut f.session, MapCommand::AddTask(task("2", "1", "99", true)));

        assert_eq!(f.session.tasks().all().len(), 1);
    }

    #[tokio::test]
    async fn when_geocode_result_arrives_then_smart_zone_is_committed_without_dialog() {
        let mut f = loaded().await;
        send(&mut f.session, MapCommand::ToggleSmartZoneMode);

        send(&mut f.session, MapCommand::GeocodeResult(GeocodeResult {
            place_name: Some("Belgrade".into()),
            bbox: Some([10.0, 20.0, 12.0, 22.0]),
        }));

        assert!(f.dialog.requests().is_empty());
        let selected = f.session.zones().selected().expect("selected zone");
        assert_eq!(selected.name, "Belgrade");
        assert_eq!(selected.origin, ZoneOrigin::SmartZone);
        assert_eq!(f.session.edit_mode(), EditMode::SmartZone);
    }

    #[tokio::test]
    async fn when_zone_fill_is_clicked_then_zone_is_selected() {
        let mut f = loaded().await;

        send(&mut f.session, MapCommand::Pointer(PointerEvent {
            target: PointerTarget::Layer("geozone-fill-1".into()),
            kind: PointerEventKind::Click,
            feature_id: None,
        }));

        assert_eq!(f.session.zones().selected().map(|z| z.id.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn when_tracker_marker_is_clicked_then_tracker_is_selected() {
        let mut f = loaded().await;
        let click = f
            .surface
            .simulate_marker_click("tracker-1")
            .expect("marker exists");

        send(&mut f.session, MapCommand::Pointer(click));

        assert_eq!(f.session.trackers().selected().map(|t| t.id.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn when_hidden_zone_is_shown_then_it_is_drawn() {
        let mut f = loaded().await;

        send(&mut f.session, MapCommand::ToggleZoneVisibility { id: "2".into() });

        assert_eq!(f.session.snapshot().drawn_zones, 2);
        send(&mut f.session, MapCommand::DeleteZone { id: "2".into() });
        assert!(!f.surface.has_layer("geozone-fill-2"));
    }

    #[tokio::test]
    async fn when_shut_down_then_surface_is_left_clean() {
        let mut f = loaded().await;
        send(&mut f.session, MapCommand::ToggleDrawMode);

        assert!(f.session.handle(MapCommand::Shutdown).is_break());
        f.session.shutdown();

        assert!(f.surface.layer_ids().is_empty());
        assert!(f.surface.source_ids().is_empty());
        assert!(f.surface.marker_ids().is_empty());
        assert!(!f.surface.controls().contains(&ControlKind::Draw));
        assert!(!f.session.is_simulating());
    }

    #[tokio::test]
    async fn when_shutdown_command_is_sent_then_map_task_returns_closed_session() {
        let f = loaded().await;
        let (tx, rx) = mpsc::channel(8);
        tx.send(MapCommand::Toggle3D).await.expect("queue command");
        tx.send(MapCommand::Shutdown).await.expect("queue command");

        let session = map_task(
            f.session,
            rx,
            Duration::from_millis(5),
            Arc::new(Notify::new()),
        )
        .await;

        assert!(session.is_closed());
        assert!(session.is_3d());
        assert!(f.surface.layer_ids().is_empty());
    }
}
