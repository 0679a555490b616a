//! Timed escalation sequencer.
//!
//! At most one response sequence runs at a time. The active slot lives in a
//! [`watch`] channel so status readers never block the worker, and starting
//! a sequence is a single check-and-set on that slot. Each sequence runs in
//! its own task and waits in ticks; every tick races the sequence's
//! [`CancellationToken`] so an acknowledgment lands within one tick.
//!
//! A reset bumps the slot generation. A worker whose generation is no longer
//! current stops at its next step without touching any device.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use homeguard_domain::command::SecurityCommand;
use homeguard_domain::error::SequenceError;
use homeguard_domain::hazard::{AlarmType, HazardKind};
use homeguard_domain::sequence::{EmergencyCall, SequenceOutcome, SequenceState, SequenceStatus};
use homeguard_domain::severity::NotificationSeverity;

/// What a running sequence drives.
pub trait SequenceDriver: Send + Sync {
    /// Send a command to colleagues; returns how many received it.
    fn command(&self, command: SecurityCommand) -> usize;

    /// Publish a progress message on the notification chain.
    fn announce(&self, severity: NotificationSeverity, event: &str, message: &str);
}

/// Tick length and wait budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTiming {
    pub tick: Duration,
    /// Ticks per motion wait (primary and escalation).
    pub motion_hold_ticks: u32,
    /// Ticks to wait for an acknowledgment before a fire or gas alarm blinks.
    pub primary_ack_ticks: u32,
    /// Blink iterations before the fire station is called.
    pub blink_ticks: u32,
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            motion_hold_ticks: 5,
            primary_ack_ticks: 10,
            blink_ticks: 10,
        }
    }
}

/// Contents of the active-sequence slot.
#[derive(Debug, Clone, Default)]
pub struct SequenceSlot {
    status: SequenceStatus,
    cancel: CancellationToken,
}

impl SequenceSlot {
    #[must_use]
    pub fn status(&self) -> SequenceStatus {
        self.status
    }
}

/// An active slot taken by [`Sequencer::claim`], not yet running.
#[must_use = "an unlaunched claim releases the slot when dropped"]
pub struct SequenceClaim {
    worker: Option<PendingWorker>,
}

struct PendingWorker {
    slot: Arc<watch::Sender<SequenceSlot>>,
    timing: SequenceTiming,
    hazard: HazardKind,
    generation: u64,
    token: CancellationToken,
    plan: Plan,
}

impl SequenceClaim {
    /// Spawn the worker for the claimed sequence. Returns its generation.
    pub fn launch(mut self, driver: Arc<dyn SequenceDriver>) -> u64 {
        let Some(pending) = self.worker.take() else {
            return 0;
        };
        let generation = pending.generation;
        tracing::debug!(hazard = %pending.hazard, generation, "sequence started");
        let worker = Worker {
            slot: pending.slot,
            timing: pending.timing,
            hazard: pending.hazard,
            generation,
            token: pending.token,
            driver,
        };
        tokio::spawn(worker.run(pending.plan));
        generation
    }
}

impl Drop for SequenceClaim {
    fn drop(&mut self) {
        let Some(pending) = self.worker.take() else {
            return;
        };
        pending.slot.send_if_modified(|slot| {
            if slot.status.generation != pending.generation || !slot.status.is_active() {
                return false;
            }
            slot.status.state = SequenceState::Idle;
            slot.status.hazard = None;
            true
        });
        tracing::debug!(hazard = %pending.hazard, "sequence claim released");
    }
}

/// Owner of the single active-sequence slot.
pub struct Sequencer {
    slot: Arc<watch::Sender<SequenceSlot>>,
    timing: SequenceTiming,
}

impl Sequencer {
    #[must_use]
    pub fn new(timing: SequenceTiming) -> Self {
        let (slot, _) = watch::channel(SequenceSlot::default());
        Self {
            slot: Arc::new(slot),
            timing,
        }
    }

    #[must_use]
    pub fn timing(&self) -> SequenceTiming {
        self.timing
    }

    /// Start the response sequence for `hazard`.
    ///
    /// Must be called from within a tokio runtime. Returns the generation of
    /// the new sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Busy`] when a sequence is already running
    /// (nothing is started or queued) and [`SequenceError::Unsupported`] for
    /// hazards that have no response sequence.
    pub fn start(
        &self,
        hazard: HazardKind,
        driver: Arc<dyn SequenceDriver>,
    ) -> Result<u64, SequenceError> {
        Ok(self.claim(hazard)?.launch(driver))
    }

    /// Take the active slot for `hazard` without running anything yet.
    ///
    /// The slot reads as [`SequenceState::Arming`] until the returned claim
    /// is launched. Dropping the claim unlaunched releases the slot.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start).
    pub fn claim(&self, hazard: HazardKind) -> Result<SequenceClaim, SequenceError> {
        let plan = match hazard {
            HazardKind::Motion | HazardKind::Intrusion => Plan::Motion,
            HazardKind::Smoke | HazardKind::Gas => Plan::Fire(hazard.alarm_type()),
            HazardKind::SystemError => return Err(SequenceError::Unsupported { kind: hazard }),
        };

        let token = CancellationToken::new();
        let mut claimed = Err(SequenceError::Busy { active: hazard });
        self.slot.send_if_modified(|slot| {
            if slot.status.is_active() {
                claimed = Err(SequenceError::Busy {
                    active: slot.status.hazard.unwrap_or(hazard),
                });
                return false;
            }
            let generation = slot.status.generation + 1;
            slot.status = SequenceStatus {
                state: SequenceState::Arming,
                hazard: Some(hazard),
                generation,
                last_outcome: None,
            };
            slot.cancel = token.clone();
            claimed = Ok(generation);
            true
        });
        let generation = claimed?;

        Ok(SequenceClaim {
            worker: Some(PendingWorker {
                slot: Arc::clone(&self.slot),
                timing: self.timing,
                hazard,
                generation,
                token,
                plan,
            }),
        })
    }

    /// Acknowledge the running sequence.
    ///
    /// Returns `false` (and does nothing) when no sequence is active.
    pub fn acknowledge(&self) -> bool {
        let slot = self.slot.borrow();
        if !slot.status.is_active() {
            return false;
        }
        slot.cancel.cancel();
        true
    }

    /// Force the slot back to idle. The running worker, if any, stops at its
    /// next step.
    pub fn reset(&self) {
        self.slot.send_modify(|slot| {
            slot.cancel.cancel();
            let was_active = slot.status.is_active();
            slot.status = SequenceStatus {
                state: SequenceState::Idle,
                hazard: None,
                generation: slot.status.generation + 1,
                last_outcome: if was_active {
                    Some(SequenceOutcome::Reset)
                } else {
                    slot.status.last_outcome
                },
            };
            slot.cancel = CancellationToken::new();
        });
        tracing::debug!("sequence slot reset");
    }

    #[must_use]
    pub fn status(&self) -> SequenceStatus {
        self.slot.borrow().status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status().is_active()
    }

    /// Receiver that observes every slot change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SequenceSlot> {
        self.slot.subscribe()
    }

    /// Resolve once no sequence is active.
    pub async fn wait_idle(&self) {
        let mut rx = self.slot.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|slot| !slot.status.is_active()).await;
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(SequenceTiming::default())
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        if self.is_active() {
            self.reset();
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Plan {
    Motion,
    Fire(AlarmType),
}

/// The worker's generation is no longer current.
struct Stale;

#[derive(Debug, PartialEq, Eq)]
enum Wait {
    Acknowledged,
    Elapsed,
}

struct Worker {
    slot: Arc<watch::Sender<SequenceSlot>>,
    timing: SequenceTiming,
    hazard: HazardKind,
    generation: u64,
    token: CancellationToken,
    driver: Arc<dyn SequenceDriver>,
}

impl Worker {
    async fn run(self, plan: Plan) {
        self.driver.announce(
            NotificationSeverity::Info,
            "SEQUENCE_STARTED",
            &format!("{} response sequence started", self.hazard),
        );

        let result = match plan {
            Plan::Motion => self.motion().await,
            Plan::Fire(alarm_type) => self.fire(alarm_type).await,
        };

        match result.and_then(|outcome| self.finish(outcome).map(|()| outcome)) {
            Ok(outcome) => {
                let message = match outcome {
                    SequenceOutcome::Acknowledged => {
                        format!("{} sequence acknowledged", self.hazard)
                    }
                    SequenceOutcome::Escalated(EmergencyCall::Police) => {
                        format!("{} sequence escalated to police", self.hazard)
                    }
                    SequenceOutcome::Escalated(EmergencyCall::FireStation) => {
                        format!("{} sequence escalated to fire station", self.hazard)
                    }
                    SequenceOutcome::Reset => format!("{} sequence reset", self.hazard),
                };
                self.driver
                    .announce(NotificationSeverity::Info, "SEQUENCE_FINISHED", &message);
            }
            Err(Stale) => {
                tracing::debug!(hazard = %self.hazard, generation = self.generation, "sequence superseded");
            }
        }
    }

    async fn motion(&self) -> Result<SequenceOutcome, Stale> {
        let hold = self.timing.motion_hold_ticks;

        self.command(SecurityCommand::ActivateAlarm(AlarmType::Intrusion))?;
        self.command(SecurityCommand::StartRecording)?;

        self.transition(SequenceState::WaitingAckPrimary)?;
        if self.wait(hold).await == Wait::Acknowledged {
            return self.stand_down_motion();
        }

        self.transition(SequenceState::Escalating)?;
        self.command(SecurityCommand::TurnOnLights)?;

        self.transition(SequenceState::WaitingAckEscalation)?;
        if self.wait(hold).await == Wait::Acknowledged {
            return self.stand_down_motion();
        }

        self.transition(SequenceState::Resolving)?;
        self.command(SecurityCommand::CallPolice)?;
        self.command(SecurityCommand::SilenceAlarm)?;
        self.command(SecurityCommand::StopRecording)?;
        Ok(SequenceOutcome::Escalated(EmergencyCall::Police))
    }

    fn stand_down_motion(&self) -> Result<SequenceOutcome, Stale> {
        self.transition(SequenceState::Resolving)?;
        self.command(SecurityCommand::DeactivateAlarm)?;
        self.command(SecurityCommand::StopRecording)?;
        Ok(SequenceOutcome::Acknowledged)
    }

    async fn fire(&self, alarm_type: AlarmType) -> Result<SequenceOutcome, Stale> {
        self.command(SecurityCommand::ActivateAlarm(alarm_type))?;

        self.transition(SequenceState::WaitingAckPrimary)?;
        if self.wait(self.timing.primary_ack_ticks).await == Wait::Acknowledged {
            self.transition(SequenceState::Resolving)?;
            self.command(SecurityCommand::DeactivateAlarm)?;
            return Ok(SequenceOutcome::Acknowledged);
        }

        self.transition(SequenceState::Escalating)?;
        self.command(SecurityCommand::StartBlinking)?;

        self.transition(SequenceState::WaitingAckEscalation)?;
        for _ in 0..self.timing.blink_ticks {
            self.command(SecurityCommand::BlinkOnce)?;
            if self.tick().await == Wait::Acknowledged {
                self.transition(SequenceState::Resolving)?;
                self.command(SecurityCommand::StopBlinking)?;
                self.command(SecurityCommand::DeactivateAlarm)?;
                return Ok(SequenceOutcome::Acknowledged);
            }
        }
        self.command(SecurityCommand::StopBlinking)?;

        self.transition(SequenceState::Resolving)?;
        self.command(SecurityCommand::CallFireStation)?;
        self.command(SecurityCommand::DeactivateAlarm)?;
        self.command(SecurityCommand::TurnOnLights)?;
        Ok(SequenceOutcome::Escalated(EmergencyCall::FireStation))
    }

    async fn wait(&self, ticks: u32) -> Wait {
        for _ in 0..ticks {
            if self.tick().await == Wait::Acknowledged {
                return Wait::Acknowledged;
            }
        }
        Wait::Elapsed
    }

    async fn tick(&self) -> Wait {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Wait::Acknowledged,
            () = tokio::time::sleep(self.timing.tick) => Wait::Elapsed,
        }
    }

    fn ensure_current(&self) -> Result<(), Stale> {
        if self.slot.borrow().status.generation == self.generation {
            Ok(())
        } else {
            Err(Stale)
        }
    }

    fn command(&self, command: SecurityCommand) -> Result<(), Stale> {
        self.ensure_current()?;
        self.driver.command(command);
        Ok(())
    }

    fn transition(&self, state: SequenceState) -> Result<(), Stale> {
        let mut current = false;
        self.slot.send_if_modified(|slot| {
            if slot.status.generation != self.generation {
                return false;
            }
            current = true;
            slot.status.state = state;
            true
        });
        if !current {
            return Err(Stale);
        }
        tracing::debug!(hazard = %self.hazard, generation = self.generation, %state, "sequence transition");
        Ok(())
    }

    fn finish(&self, outcome: SequenceOutcome) -> Result<(), Stale> {
        let mut current = false;
        self.slot.send_if_modified(|slot| {
            if slot.status.generation != self.generation {
                return false;
            }
            current = true;
            slot.status.state = SequenceState::Idle;
            slot.status.hazard = None;
            slot.status.last_outcome = Some(outcome);
            true
        });
        if current { Ok(()) } else { Err(Stale) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::{Instant, sleep};

    // ── Recording driver ───────────────────────────────────────────

    struct RecordingDriver {
        origin: Instant,
        commands: Mutex<Vec<(u64, SecurityCommand)>>,
        announcements: Mutex<Vec<String>>,
    }

    impl RecordingDriver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                origin: Instant::now(),
                commands: Mutex::new(Vec::new()),
                announcements: Mutex::new(Vec::new()),
            })
        }

        fn commands(&self) -> Vec<SecurityCommand> {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .map(|(_, c)| c.clone())
                .collect()
        }

        /// Whole seconds since the driver was created at which `command` was
        /// first sent.
        fn sent_at(&self, command: &SecurityCommand) -> Option<u64> {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .find(|(_, c)| c == command)
                .map(|(at, _)| *at)
        }

        fn count(&self, command: &SecurityCommand) -> usize {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, c)| c == command)
                .count()
        }
    }

    impl SequenceDriver for RecordingDriver {
        fn command(&self, command: SecurityCommand) -> usize {
            let at = self.origin.elapsed().as_secs();
            self.commands.lock().unwrap().push((at, command));
            1
        }

        fn announce(&self, _severity: NotificationSeverity, event: &str, _message: &str) {
            self.announcements.lock().unwrap().push(event.to_string());
        }
    }

    fn sequencer() -> Sequencer {
        Sequencer::new(SequenceTiming::default())
    }

    // ── Motion ─────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_escalate_unacknowledged_motion_to_police_after_ten_ticks() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Motion, driver.clone()).unwrap();
        seq.wait_idle().await;

        assert_eq!(
            driver.commands(),
            vec![
                SecurityCommand::ActivateAlarm(AlarmType::Intrusion),
                SecurityCommand::StartRecording,
                SecurityCommand::TurnOnLights,
                SecurityCommand::CallPolice,
                SecurityCommand::SilenceAlarm,
                SecurityCommand::StopRecording,
            ]
        );
        assert_eq!(driver.sent_at(&SecurityCommand::TurnOnLights), Some(5));
        assert_eq!(driver.sent_at(&SecurityCommand::CallPolice), Some(10));
        assert_eq!(
            seq.status().last_outcome,
            Some(SequenceOutcome::Escalated(EmergencyCall::Police))
        );
        assert!(!seq.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn should_stand_down_motion_without_police_when_acknowledged_early() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Motion, driver.clone()).unwrap();
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(seq.status().state, SequenceState::WaitingAckPrimary);
        assert!(seq.acknowledge());
        seq.wait_idle().await;

        assert_eq!(
            driver.commands(),
            vec![
                SecurityCommand::ActivateAlarm(AlarmType::Intrusion),
                SecurityCommand::StartRecording,
                SecurityCommand::DeactivateAlarm,
                SecurityCommand::StopRecording,
            ]
        );
        assert_eq!(driver.sent_at(&SecurityCommand::DeactivateAlarm), Some(2));
        assert_eq!(
            seq.status().last_outcome,
            Some(SequenceOutcome::Acknowledged)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_accept_acknowledgment_during_escalation_wait() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Motion, driver.clone()).unwrap();
        sleep(Duration::from_millis(6500)).await;
        assert_eq!(seq.status().state, SequenceState::WaitingAckEscalation);
        seq.acknowledge();
        seq.wait_idle().await;

        assert_eq!(driver.count(&SecurityCommand::TurnOnLights), 1);
        assert_eq!(driver.count(&SecurityCommand::CallPolice), 0);
        assert_eq!(driver.count(&SecurityCommand::DeactivateAlarm), 1);
    }

    // ── Smoke / gas ────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_blink_ten_times_then_call_fire_station_for_unacknowledged_smoke() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Smoke, driver.clone()).unwrap();
        seq.wait_idle().await;

        let mut expected = vec![
            SecurityCommand::ActivateAlarm(AlarmType::Fire),
            SecurityCommand::StartBlinking,
        ];
        expected.extend(std::iter::repeat_n(SecurityCommand::BlinkOnce, 10));
        expected.extend([
            SecurityCommand::StopBlinking,
            SecurityCommand::CallFireStation,
            SecurityCommand::DeactivateAlarm,
            SecurityCommand::TurnOnLights,
        ]);
        assert_eq!(driver.commands(), expected);
        assert_eq!(driver.sent_at(&SecurityCommand::StartBlinking), Some(10));
        assert_eq!(driver.sent_at(&SecurityCommand::CallFireStation), Some(20));
        assert_eq!(
            seq.status().last_outcome,
            Some(SequenceOutcome::Escalated(EmergencyCall::FireStation))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_only_deactivate_when_gas_acknowledged_before_blinking() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Gas, driver.clone()).unwrap();
        sleep(Duration::from_millis(4500)).await;
        seq.acknowledge();
        seq.wait_idle().await;

        assert_eq!(
            driver.commands(),
            vec![
                SecurityCommand::ActivateAlarm(AlarmType::GasLeak),
                SecurityCommand::DeactivateAlarm,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_restore_steady_light_when_acknowledged_while_blinking() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Gas, driver.clone()).unwrap();
        sleep(Duration::from_millis(13_500)).await;
        seq.acknowledge();
        seq.wait_idle().await;

        let commands = driver.commands();
        assert_eq!(driver.count(&SecurityCommand::BlinkOnce), 4);
        assert_eq!(
            &commands[commands.len() - 2..],
            &[SecurityCommand::StopBlinking, SecurityCommand::DeactivateAlarm]
        );
        assert_eq!(driver.count(&SecurityCommand::CallFireStation), 0);
    }

    // ── Slot ───────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_reject_second_hazard_while_busy_without_side_effects() {
        let seq = sequencer();
        let driver = RecordingDriver::new();
        let other = RecordingDriver::new();

        seq.start(HazardKind::Motion, driver.clone()).unwrap();
        let result = seq.start(HazardKind::Smoke, other.clone());

        assert_eq!(
            result,
            Err(SequenceError::Busy {
                active: HazardKind::Motion
            })
        );
        seq.wait_idle().await;
        assert!(other.commands().is_empty());
        assert_eq!(seq.status().generation, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_hold_slot_while_claimed_and_release_it_on_drop() {
        let seq = sequencer();

        let claim = seq.claim(HazardKind::Gas).unwrap();
        assert_eq!(seq.status().state, SequenceState::Arming);
        assert!(matches!(
            seq.claim(HazardKind::Motion),
            Err(SequenceError::Busy {
                active: HazardKind::Gas
            })
        ));

        drop(claim);

        let status = seq.status();
        assert_eq!(status.state, SequenceState::Idle);
        assert_eq!(status.hazard, None);
        let generation = seq.start(HazardKind::Motion, RecordingDriver::new()).unwrap();
        assert_eq!(generation, 2);
        seq.reset();
    }

    #[tokio::test(start_paused = true)]
    async fn should_run_claimed_sequence_once_launched() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        let claim = seq.claim(HazardKind::Smoke).unwrap();
        assert_eq!(claim.launch(driver.clone()), 1);
        seq.wait_idle().await;

        assert_eq!(
            seq.status().last_outcome,
            Some(SequenceOutcome::Escalated(EmergencyCall::FireStation))
        );
        assert_eq!(driver.count(&SecurityCommand::CallFireStation), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_stale_worker_after_reset() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Motion, driver.clone()).unwrap();
        sleep(Duration::from_millis(1500)).await;
        seq.reset();

        let status = seq.status();
        assert_eq!(status.state, SequenceState::Idle);
        assert_eq!(status.generation, 2);
        assert_eq!(status.last_outcome, Some(SequenceOutcome::Reset));

        let sent = driver.commands().len();
        sleep(Duration::from_secs(30)).await;
        assert_eq!(driver.commands().len(), sent);
        assert_eq!(seq.status().last_outcome, Some(SequenceOutcome::Reset));
    }

    #[tokio::test(start_paused = true)]
    async fn should_start_new_sequence_after_previous_completes() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Gas, driver.clone()).unwrap();
        seq.acknowledge();
        seq.wait_idle().await;
        let generation = seq.start(HazardKind::Motion, driver.clone()).unwrap();

        assert_eq!(generation, 2);
        assert!(seq.is_active());
    }

    #[tokio::test]
    async fn should_ignore_acknowledgment_while_idle() {
        let seq = sequencer();
        assert!(!seq.acknowledge());
        assert_eq!(seq.status(), SequenceStatus::default());
    }

    #[tokio::test]
    async fn should_refuse_hazards_without_a_sequence() {
        let seq = sequencer();
        let result = seq.start(HazardKind::SystemError, RecordingDriver::new());
        assert_eq!(
            result,
            Err(SequenceError::Unsupported {
                kind: HazardKind::SystemError
            })
        );
        assert!(!seq.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn should_announce_start_and_finish() {
        let seq = sequencer();
        let driver = RecordingDriver::new();

        seq.start(HazardKind::Smoke, driver.clone()).unwrap();
        seq.acknowledge();
        seq.wait_idle().await;

        assert_eq!(
            *driver.announcements.lock().unwrap(),
            vec!["SEQUENCE_STARTED", "SEQUENCE_FINISHED"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_transitions_to_subscribers() {
        let seq = sequencer();
        let mut rx = seq.subscribe();

        seq.start(HazardKind::Motion, RecordingDriver::new()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status().hazard, Some(HazardKind::Motion));

        rx.wait_for(|slot| slot.status().state == SequenceState::WaitingAckPrimary)
            .await
            .unwrap();
    }
}
