//! The session engine that drives per-user check-in conversations.

use std::collections::HashMap;
use std::sync::Arc;

use attendance_store::{AttendanceRecord, AttendanceStore};
use checkin_core::{Coordinates, EventKind, Geofence, InboundEvent, LocationReport, Prompt};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::sink::ReplySink;
use crate::state::{judge_location, LocationCheck, LocationVerdict, Phase};
use crate::tracker::{AttemptTracker, DEFAULT_MAX_ATTEMPTS};

/// Configuration for the session engine.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Failure limit per check-in session.
    pub max_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// The check-in state machine orchestrator.
///
/// The engine:
/// - Keeps exactly one live session per user
/// - Serializes all events for one user behind that user's lock,
///   while sessions for different users run fully concurrently
/// - Consults the geofence and the attempt tracker on every submission
/// - Appends to the attendance store exactly once per success
/// - Emits prompts through the injected [`ReplySink`]
pub struct SessionEngine<S: ReplySink> {
    geofence: Arc<dyn Geofence>,
    store: Arc<dyn AttendanceStore>,
    tracker: AttemptTracker,
    sessions: RwLock<HashMap<String, Arc<Mutex<Phase>>>>,
    sink: S,
}

impl<S: ReplySink> SessionEngine<S> {
    /// Create a new engine with the given components.
    pub fn new(
        geofence: Arc<dyn Geofence>,
        store: Arc<dyn AttendanceStore>,
        sink: S,
        config: SessionConfig,
    ) -> Self {
        Self {
            geofence,
            store,
            tracker: AttemptTracker::new(config.max_attempts),
            sessions: RwLock::new(HashMap::new()),
            sink,
        }
    }

    /// Handle one inbound event end-to-end.
    ///
    /// Validation failures never escape: they are converted into a
    /// counted failure branch. Only store and delivery errors
    /// propagate.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), SessionError> {
        let InboundEvent {
            user_id,
            display_name,
            kind,
        } = event;

        match kind {
            EventKind::Entry => self.handle_entry(&user_id, display_name.as_deref()).await,
            EventKind::Checkin => self.handle_checkin(&user_id).await,
            EventKind::Location(report) => self.handle_location(&user_id, report).await,
            EventKind::InvalidPayload => self.handle_invalid_payload(&user_id).await,
            EventKind::Cancel => self.handle_cancel(&user_id).await,
        }
    }

    /// Current phase of a user's live session, if any.
    pub async fn phase(&self, user_id: &str) -> Option<Phase> {
        let cell = self.sessions.read().await.get(user_id).cloned()?;
        let phase = *cell.lock().await;
        Some(phase)
    }

    /// Get the attempt tracker.
    pub fn tracker(&self) -> &AttemptTracker {
        &self.tracker
    }

    /// Get the attendance store.
    pub fn store(&self) -> &Arc<dyn AttendanceStore> {
        &self.store
    }

    /// Get the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle the entry command: register the user and open (or reset)
    /// their session.
    async fn handle_entry(
        &self,
        user_id: &str,
        display_name: Option<&str>,
    ) -> Result<(), SessionError> {
        if self.store.get_user(user_id).await?.is_some() {
            info!("Returning user: {}", user_id);
        } else {
            info!("New user: {}", user_id);
        }
        self.store.register_user(user_id, display_name).await?;

        let cell = {
            let mut sessions = self.sessions.write().await;
            sessions
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Phase::AwaitingCheckinCommand)))
                .clone()
        };

        let mut phase = cell.lock().await;
        // A repeated entry command resets any in-flight session rather
        // than creating a duplicate.
        *phase = Phase::AwaitingCheckinCommand;
        self.tracker.reset(user_id).await;

        self.sink.send(user_id, &Prompt::Welcome).await
    }

    /// Handle the check-in command: reset the attempt allowance and
    /// ask for a live location.
    async fn handle_checkin(&self, user_id: &str) -> Result<(), SessionError> {
        let Some(cell) = self.session(user_id).await else {
            return self.redirect_to_entry(user_id).await;
        };

        let mut phase = cell.lock().await;
        if *phase == Phase::Terminated {
            drop(phase);
            return self.redirect_to_entry(user_id).await;
        }

        self.tracker.reset(user_id).await;
        *phase = Phase::AwaitingLocation;
        info!("Check-in started for {}", user_id);

        self.sink.send(user_id, &Prompt::PromptForLocation).await
    }

    /// Handle a location report.
    async fn handle_location(
        &self,
        user_id: &str,
        report: LocationReport,
    ) -> Result<(), SessionError> {
        let Some(cell) = self.session(user_id).await else {
            return self.redirect_to_entry(user_id).await;
        };

        let mut phase = cell.lock().await;
        match *phase {
            Phase::Terminated => {
                drop(phase);
                self.redirect_to_entry(user_id).await
            }
            // Not checking in yet; no attempt is consumed.
            Phase::AwaitingCheckinCommand => self.sink.send(user_id, &Prompt::Welcome).await,
            Phase::AwaitingLocation => {
                let check = match Coordinates::new(report.latitude, report.longitude) {
                    Ok(point) => {
                        let decision = self.geofence.check(point);
                        debug!(
                            "Location from {}: {:.3} km from center (inside: {})",
                            user_id, decision.distance_km, decision.inside
                        );
                        if decision.inside {
                            LocationCheck::Inside {
                                distance_km: decision.distance_km,
                            }
                        } else {
                            LocationCheck::Outside {
                                distance_km: decision.distance_km,
                            }
                        }
                    }
                    Err(err) => {
                        // Treated exactly like a malformed payload:
                        // one attempt, the invalid-data prompt.
                        warn!("Rejected coordinates from {}: {}", user_id, err);
                        LocationCheck::Invalid
                    }
                };

                match check {
                    LocationCheck::Inside { .. } => {
                        self.accept(user_id, &mut phase, &report).await
                    }
                    _ => self.reject(user_id, &mut phase, check).await,
                }
            }
        }
    }

    /// Handle a submission that carried no usable location payload.
    async fn handle_invalid_payload(&self, user_id: &str) -> Result<(), SessionError> {
        let Some(cell) = self.session(user_id).await else {
            return self.redirect_to_entry(user_id).await;
        };

        let mut phase = cell.lock().await;
        match *phase {
            Phase::Terminated => {
                drop(phase);
                self.redirect_to_entry(user_id).await
            }
            Phase::AwaitingCheckinCommand => self.sink.send(user_id, &Prompt::Welcome).await,
            Phase::AwaitingLocation => {
                self.reject(user_id, &mut phase, LocationCheck::Invalid)
                    .await
            }
        }
    }

    /// Handle the cancel command: end the session in any phase.
    async fn handle_cancel(&self, user_id: &str) -> Result<(), SessionError> {
        let Some(cell) = self.session(user_id).await else {
            return self.redirect_to_entry(user_id).await;
        };

        let mut phase = cell.lock().await;
        if *phase == Phase::Terminated {
            drop(phase);
            return self.redirect_to_entry(user_id).await;
        }

        info!("User {} cancelled the session", user_id);
        *phase = Phase::Terminated;
        self.remove_session(user_id).await;

        self.sink.send(user_id, &Prompt::Farewell).await
    }

    /// Accept an inside-geofence submission: record attendance exactly
    /// once and terminate the session.
    async fn accept(
        &self,
        user_id: &str,
        phase: &mut Phase,
        report: &LocationReport,
    ) -> Result<(), SessionError> {
        let display_name = self
            .store
            .get_user(user_id)
            .await?
            .and_then(|user| user.display_name);

        self.store
            .append(AttendanceRecord {
                user_id: user_id.to_string(),
                display_name,
                timestamp: report.received_at,
                latitude: report.latitude,
                longitude: report.longitude,
            })
            .await?;
        self.tracker.record_success(user_id).await;

        *phase = Phase::Terminated;
        self.remove_session(user_id).await;
        info!("Attendance recorded for {} at {}", user_id, report.received_at);

        self.sink.send(user_id, &Prompt::ConfirmSuccess).await
    }

    /// Count one failed submission and either re-prompt or terminate.
    async fn reject(
        &self,
        user_id: &str,
        phase: &mut Phase,
        check: LocationCheck,
    ) -> Result<(), SessionError> {
        let remaining = self.tracker.record_failure(user_id).await;

        match judge_location(&check, remaining) {
            LocationVerdict::Retry(prompt) => {
                debug!(
                    "Failed submission from {} ({} attempts remaining)",
                    user_id, remaining
                );
                self.sink.send(user_id, &prompt).await
            }
            LocationVerdict::Exhausted => {
                info!("Attempts exhausted for {}", user_id);
                *phase = Phase::Terminated;
                self.remove_session(user_id).await;
                self.sink.send(user_id, &Prompt::ExhaustedAttempts).await
            }
            // Accept verdicts are handled before failures are counted.
            LocationVerdict::Accept => Ok(()),
        }
    }

    /// Look up a user's live session.
    async fn session(&self, user_id: &str) -> Option<Arc<Mutex<Phase>>> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Drop a terminated session; a later entry command starts fresh.
    async fn remove_session(&self, user_id: &str) {
        self.sessions.write().await.remove(user_id);
    }

    /// Point a user with no live session at the entry command.
    async fn redirect_to_entry(&self, user_id: &str) -> Result<(), SessionError> {
        debug!("No live session for {}; redirecting to entry command", user_id);
        self.sink.send(user_id, &Prompt::RequestEntryCommand).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_store::MemoryStore;
    use checkin_core::CircularGeofence;

    const CENTER_LAT: f64 = 19.523731621451685;
    const CENTER_LON: f64 = -99.2536655776822;

    /// A sink that records every prompt for later inspection.
    #[derive(Debug, Clone, Default)]
    struct RecordingSink {
        prompts: Arc<std::sync::Mutex<Vec<(String, Prompt)>>>,
    }

    impl RecordingSink {
        fn prompts(&self) -> Vec<(String, Prompt)> {
            self.prompts.lock().unwrap().clone()
        }

        fn last(&self) -> Option<Prompt> {
            self.prompts.lock().unwrap().last().map(|(_, p)| p.clone())
        }
    }

    #[async_trait::async_trait]
    impl ReplySink for RecordingSink {
        async fn send(&self, user_id: &str, prompt: &Prompt) -> Result<(), SessionError> {
            self.prompts
                .lock()
                .unwrap()
                .push((user_id.to_string(), prompt.clone()));
            Ok(())
        }
    }

    /// A sink whose deliveries always bounce.
    #[derive(Debug, Clone, Default)]
    struct FailingSink;

    #[async_trait::async_trait]
    impl ReplySink for FailingSink {
        async fn send(&self, _user_id: &str, _prompt: &Prompt) -> Result<(), SessionError> {
            Err(SessionError::Delivery("channel unavailable".to_string()))
        }
    }

    fn engine() -> (SessionEngine<RecordingSink>, RecordingSink, Arc<MemoryStore>) {
        let center = Coordinates::new(CENTER_LAT, CENTER_LON).unwrap();
        let geofence = Arc::new(CircularGeofence::new(center, 5.0).unwrap());
        let store = Arc::new(MemoryStore::new());
        let sink = RecordingSink::default();
        let engine = SessionEngine::new(
            geofence,
            store.clone(),
            sink.clone(),
            SessionConfig::default(),
        );
        (engine, sink, store)
    }

    async fn start_checkin(engine: &SessionEngine<RecordingSink>, user: &str) {
        engine
            .handle(InboundEvent::entry(user, Some("Ana".to_string())))
            .await
            .unwrap();
        engine.handle(InboundEvent::checkin(user)).await.unwrap();
    }

    #[tokio::test]
    async fn test_successful_checkin_records_attendance() {
        let (engine, sink, store) = engine();
        start_checkin(&engine, "user-1").await;

        engine
            .handle(InboundEvent::location("user-1", CENTER_LAT, CENTER_LON))
            .await
            .unwrap();

        assert_eq!(sink.last(), Some(Prompt::ConfirmSuccess));
        assert_eq!(engine.phase("user-1").await, None);
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 0);

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "user-1");
        assert_eq!(records[0].display_name.as_deref(), Some("Ana"));
        assert_eq!(records[0].latitude, CENTER_LAT);
        assert_eq!(records[0].longitude, CENTER_LON);
    }

    #[tokio::test]
    async fn test_outside_geofence_counts_down_then_exhausts() {
        let (engine, sink, store) = engine();
        start_checkin(&engine, "user-1").await;

        // ~10.9 km away, three times.
        for expected_remaining in [2u32, 1] {
            engine
                .handle(InboundEvent::location("user-1", 19.6, -99.30))
                .await
                .unwrap();
            assert_eq!(
                sink.last(),
                Some(Prompt::RejectOutsideGeofence {
                    remaining_attempts: expected_remaining
                })
            );
            assert_eq!(engine.phase("user-1").await, Some(Phase::AwaitingLocation));
        }

        engine
            .handle(InboundEvent::location("user-1", 19.6, -99.30))
            .await
            .unwrap();
        assert_eq!(sink.last(), Some(Prompt::ExhaustedAttempts));
        assert_eq!(engine.phase("user-1").await, None);
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 0);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_three_invalid_payloads_terminate_without_record() {
        let (engine, sink, store) = engine();
        start_checkin(&engine, "user-1").await;

        for expected_remaining in [2u32, 1] {
            engine
                .handle(InboundEvent::invalid_payload("user-1"))
                .await
                .unwrap();
            assert_eq!(
                sink.last(),
                Some(Prompt::RejectInvalidPayload {
                    remaining_attempts: expected_remaining
                })
            );
        }

        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();
        assert_eq!(sink.last(), Some(Prompt::ExhaustedAttempts));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_and_outside_share_one_counter() {
        let (engine, sink, store) = engine();
        start_checkin(&engine, "user-1").await;

        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();
        assert_eq!(
            sink.last(),
            Some(Prompt::RejectInvalidPayload {
                remaining_attempts: 2
            })
        );

        engine
            .handle(InboundEvent::location("user-1", 19.6, -99.30))
            .await
            .unwrap();
        assert_eq!(
            sink.last(),
            Some(Prompt::RejectOutsideGeofence {
                remaining_attempts: 1
            })
        );

        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();
        assert_eq!(sink.last(), Some(Prompt::ExhaustedAttempts));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_count_as_invalid_data() {
        let (engine, sink, _store) = engine();
        start_checkin(&engine, "user-1").await;

        engine
            .handle(InboundEvent::location("user-1", 95.0, 0.0))
            .await
            .unwrap();
        assert_eq!(
            sink.last(),
            Some(Prompt::RejectInvalidPayload {
                remaining_attempts: 2
            })
        );
        assert_eq!(engine.phase("user-1").await, Some(Phase::AwaitingLocation));
    }

    #[tokio::test]
    async fn test_success_after_failures() {
        let (engine, sink, store) = engine();
        start_checkin(&engine, "user-1").await;

        engine
            .handle(InboundEvent::location("user-1", 19.6, -99.30))
            .await
            .unwrap();
        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();
        engine
            .handle(InboundEvent::location("user-1", CENTER_LAT, CENTER_LON))
            .await
            .unwrap();

        assert_eq!(sink.last(), Some(Prompt::ConfirmSuccess));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 0);
    }

    #[tokio::test]
    async fn test_cancel_ends_session_without_counting() {
        let (engine, sink, store) = engine();
        start_checkin(&engine, "user-1").await;

        engine
            .handle(InboundEvent::cancel("user-1"))
            .await
            .unwrap();

        assert_eq!(sink.last(), Some(Prompt::Farewell));
        assert_eq!(engine.phase("user-1").await, None);
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 0);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_events_without_session_redirect_to_entry() {
        let (engine, sink, _store) = engine();

        engine.handle(InboundEvent::checkin("user-1")).await.unwrap();
        assert_eq!(sink.last(), Some(Prompt::RequestEntryCommand));

        engine
            .handle(InboundEvent::location("user-1", CENTER_LAT, CENTER_LON))
            .await
            .unwrap();
        assert_eq!(sink.last(), Some(Prompt::RequestEntryCommand));
    }

    #[tokio::test]
    async fn test_location_before_checkin_command_is_not_counted() {
        let (engine, sink, _store) = engine();
        engine
            .handle(InboundEvent::entry("user-1", None))
            .await
            .unwrap();

        engine
            .handle(InboundEvent::location("user-1", 19.6, -99.30))
            .await
            .unwrap();

        assert_eq!(sink.last(), Some(Prompt::Welcome));
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 0);
        assert_eq!(
            engine.phase("user-1").await,
            Some(Phase::AwaitingCheckinCommand)
        );
    }

    #[tokio::test]
    async fn test_repeated_entry_resets_session() {
        let (engine, sink, _store) = engine();
        start_checkin(&engine, "user-1").await;
        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();

        engine
            .handle(InboundEvent::entry("user-1", None))
            .await
            .unwrap();

        assert_eq!(sink.last(), Some(Prompt::Welcome));
        assert_eq!(
            engine.phase("user-1").await,
            Some(Phase::AwaitingCheckinCommand)
        );
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 0);
    }

    #[tokio::test]
    async fn test_checkin_restart_resets_allowance() {
        let (engine, sink, _store) = engine();
        start_checkin(&engine, "user-1").await;
        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();
        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();

        engine.handle(InboundEvent::checkin("user-1")).await.unwrap();
        assert_eq!(sink.last(), Some(Prompt::PromptForLocation));

        engine
            .handle(InboundEvent::invalid_payload("user-1"))
            .await
            .unwrap();
        assert_eq!(
            sink.last(),
            Some(Prompt::RejectInvalidPayload {
                remaining_attempts: 2
            })
        );
    }

    #[tokio::test]
    async fn test_state_updates_survive_delivery_failure() {
        let center = Coordinates::new(CENTER_LAT, CENTER_LON).unwrap();
        let geofence = Arc::new(CircularGeofence::new(center, 5.0).unwrap());
        let store = Arc::new(MemoryStore::new());
        let engine = SessionEngine::new(
            geofence,
            store.clone(),
            FailingSink,
            SessionConfig::default(),
        );

        // The welcome bounces, but the session still opens.
        let err = engine
            .handle(InboundEvent::entry("user-1", Some("Ana".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Delivery(_)));
        assert_eq!(
            engine.phase("user-1").await,
            Some(Phase::AwaitingCheckinCommand)
        );

        engine
            .handle(InboundEvent::checkin("user-1"))
            .await
            .unwrap_err();
        assert_eq!(engine.phase("user-1").await, Some(Phase::AwaitingLocation));

        // A failed submission still consumes an attempt.
        engine
            .handle(InboundEvent::location("user-1", 19.6, -99.30))
            .await
            .unwrap_err();
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 1);
        assert_eq!(engine.phase("user-1").await, Some(Phase::AwaitingLocation));

        // A successful submission still records exactly once and
        // terminates, so a re-prompt can resume consistently.
        engine
            .handle(InboundEvent::location("user-1", CENTER_LAT, CENTER_LON))
            .await
            .unwrap_err();
        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "user-1");
        assert_eq!(engine.phase("user-1").await, None);
        assert_eq!(engine.tracker().failed_attempts("user-1").await, 0);
    }

    #[tokio::test]
    async fn test_cancel_before_checkin_command() {
        let (engine, sink, store) = engine();
        engine
            .handle(InboundEvent::entry("user-1", None))
            .await
            .unwrap();

        engine.handle(InboundEvent::cancel("user-1")).await.unwrap();

        assert_eq!(sink.last(), Some(Prompt::Farewell));
        assert_eq!(engine.phase("user-1").await, None);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_users_run_independently() {
        let (engine, sink, store) = engine();
        start_checkin(&engine, "user-1").await;
        start_checkin(&engine, "user-2").await;

        engine
            .handle(InboundEvent::location("user-1", 19.6, -99.30))
            .await
            .unwrap();
        engine
            .handle(InboundEvent::location("user-2", CENTER_LAT, CENTER_LON))
            .await
            .unwrap();

        let prompts = sink.prompts();
        assert!(prompts.contains(&(
            "user-1".to_string(),
            Prompt::RejectOutsideGeofence {
                remaining_attempts: 2
            }
        )));
        assert!(prompts.contains(&("user-2".to_string(), Prompt::ConfirmSuccess)));

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "user-2");
    }
}
