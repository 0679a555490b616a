//! End-to-end scenarios for the full homeguard stack.
//!
//! Each test wires the complete application (virtual home, real colleagues,
//! real notification chain, real mediator) and drives it on paused tokio
//! time, so a ten-second escalation finishes instantly.

use std::sync::Arc;
use std::time::Duration;

use homeguard_adapter_virtual::VirtualHome;
use homeguard_app::activity_log::RecentActivityLog;
use homeguard_app::colleague::{
    AlarmColleague, CameraColleague, DetectorColleague, EmergencyService,
    EmergencyServiceColleague, LightColleague,
};
use homeguard_app::mediator::SecurityMediator;
use homeguard_app::notification::{ChainConfig, NotificationChainBuilder};
use homeguard_app::ports::{ActivityLog, AlarmDevice, CameraDevice, Device};
use homeguard_app::sequencer::SequenceTiming;
use homeguard_app::services::StateManager;
use homeguard_domain::device::AlarmState;
use homeguard_domain::error::{HistoryError, HomeGuardError};
use homeguard_domain::hazard::{AlarmType, HazardKind};
use homeguard_domain::operating_state::OperatingState;
use homeguard_domain::sequence::{EmergencyCall, SequenceOutcome};
use tokio::time::{Instant, sleep};

struct Fixture {
    home: Arc<VirtualHome>,
    log: Arc<RecentActivityLog>,
    mediator: SecurityMediator,
    lights: Arc<LightColleague>,
    detectors: Arc<DetectorColleague>,
    emergency: Arc<EmergencyServiceColleague>,
}

/// Wire the full stack with a quiet chain (no console handler).
fn fixture() -> Fixture {
    let home = Arc::new(VirtualHome::new());
    let log = Arc::new(RecentActivityLog::default());
    let shared_log: Arc<dyn ActivityLog> = log.clone();

    let chain = NotificationChainBuilder::new(shared_log.clone()).from_config(&ChainConfig {
        console: false,
        ..ChainConfig::default()
    });
    let mediator = SecurityMediator::new(chain, shared_log.clone(), SequenceTiming::default());

    let lights = Arc::new(LightColleague::new(home.light_devices()));
    let detectors = Arc::new(DetectorColleague::new(home.detector_devices()));
    let emergency = Arc::new(EmergencyServiceColleague::new(shared_log.clone()));

    mediator.register(Arc::new(
        AlarmColleague::new(home.alarm_device()).with_activity_log(shared_log),
    ));
    mediator.register(lights.clone());
    mediator.register(Arc::new(CameraColleague::new(home.camera_devices())));
    mediator.register(detectors.clone());
    mediator.register(emergency.clone());

    Fixture {
        home,
        log,
        mediator,
        lights,
        detectors,
        emergency,
    }
}

fn services(fixture: &Fixture) -> Vec<EmergencyService> {
    fixture.emergency.calls().into_iter().map(|c| c.service).collect()
}

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_escalate_unacknowledged_motion_to_police() {
    let f = fixture();
    let started = Instant::now();

    f.mediator.handle_motion_detected();
    assert!(f.mediator.is_sequence_active());
    f.mediator.wait_for_idle().await;

    assert_eq!(started.elapsed().as_secs(), 10);
    let alarm = f.home.alarm();
    assert_eq!(alarm.alarm_state(), AlarmState::Triggered);
    assert_eq!(alarm.last_trigger(), Some(AlarmType::Intrusion));
    assert!(f.home.lights().iter().all(|l| l.is_on()));
    assert!(f.home.cameras().iter().all(|c| !c.is_recording()));
    assert_eq!(services(&f), vec![EmergencyService::Police]);
    assert!(f.log.contains("Calling police"));
    assert!(!f.mediator.is_sequence_active());
    assert_eq!(
        f.mediator.sequence_status().last_outcome,
        Some(SequenceOutcome::Escalated(EmergencyCall::Police))
    );
}

#[tokio::test(start_paused = true)]
async fn should_record_while_motion_sequence_waits() {
    let f = fixture();

    f.mediator.handle_motion_detected();
    sleep(Duration::from_millis(1500)).await;

    assert!(f.home.cameras().iter().all(|c| c.is_recording()));
    assert!(f.home.alarm().is_siren_active());
    assert!(f.home.lights().iter().all(|l| !l.is_on()));
}

#[tokio::test(start_paused = true)]
async fn should_keep_alarm_triggered_after_wrong_disarm_code() {
    let f = fixture();
    f.mediator.handle_motion_detected();
    sleep(Duration::from_millis(1500)).await;

    let err = f.mediator.disarm_alarm("0000").unwrap_err();

    assert!(matches!(err, HomeGuardError::Device(_)));
    assert_eq!(f.home.alarm().alarm_state(), AlarmState::Triggered);
    assert!(f.mediator.is_sequence_active());

    f.mediator.disarm_alarm("1234").unwrap();
    f.mediator.wait_for_idle().await;

    assert_eq!(f.home.alarm().alarm_state(), AlarmState::Disarmed);
    assert!(services(&f).is_empty());
    assert_eq!(
        f.mediator.sequence_status().last_outcome,
        Some(SequenceOutcome::Acknowledged)
    );
}

// ---------------------------------------------------------------------------
// Fire and gas
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_stand_down_smoke_acknowledged_in_first_window() {
    let f = fixture();
    f.mediator.handle_smoke_detected();
    sleep(Duration::from_millis(3500)).await;
    assert!(f.home.alarm().is_siren_active());

    assert!(f.mediator.acknowledge_alarm());
    f.mediator.wait_for_idle().await;
    sleep(Duration::from_secs(30)).await;

    let alarm = f.home.alarm();
    assert!(!alarm.is_siren_active());
    assert_eq!(alarm.alarm_state(), AlarmState::Disarmed);
    assert_eq!(alarm.last_trigger(), Some(AlarmType::Fire));
    assert!(!f.lights.is_blinking());
    assert!(f.home.lights().iter().all(|l| !l.is_on()));
    assert!(services(&f).is_empty());
    assert_eq!(
        f.mediator.sequence_status().last_outcome,
        Some(SequenceOutcome::Acknowledged)
    );
}

#[tokio::test(start_paused = true)]
async fn should_call_fire_station_for_unacknowledged_gas() {
    let f = fixture();
    let started = Instant::now();

    f.mediator.handle_gas_detected();
    f.mediator.wait_for_idle().await;

    assert_eq!(started.elapsed().as_secs(), 20);
    assert_eq!(services(&f), vec![EmergencyService::FireStation]);
    assert!(f.home.lights().iter().all(|l| l.is_on()));
    assert!(!f.lights.is_blinking());
    let alarm = f.home.alarm();
    assert!(!alarm.is_siren_active());
    assert_eq!(alarm.last_trigger(), Some(AlarmType::GasLeak));
    assert_eq!(
        f.mediator.sequence_status().last_outcome,
        Some(SequenceOutcome::Escalated(EmergencyCall::FireStation))
    );
}

#[tokio::test(start_paused = true)]
async fn should_drop_motion_while_gas_sequence_escalates() {
    let f = fixture();
    f.mediator.handle_gas_detected();
    sleep(Duration::from_millis(12_500)).await;
    assert!(f.lights.is_blinking());
    let before = f.mediator.sequence_status();

    f.mediator.handle_motion_detected();

    let after = f.mediator.sequence_status();
    assert!(f.mediator.is_sequence_active());
    assert_eq!(after.hazard, Some(HazardKind::Gas));
    assert_eq!(after.generation, before.generation);
    assert!(f.log.contains("Ignoring motion hazard: gas sequence already active"));
    assert!(!f.log.contains("Motion detected by"));

    f.mediator.wait_for_idle().await;
    assert_eq!(services(&f), vec![EmergencyService::FireStation]);
}

#[tokio::test(start_paused = true)]
async fn should_start_gas_sequence_from_detector_reading() {
    let f = fixture();
    let gas = f.home.detector(HazardKind::Gas).unwrap();

    assert!(gas.set_reading(180.0));
    assert_eq!(f.detectors.scan(), 1);

    assert_eq!(f.mediator.sequence_status().hazard, Some(HazardKind::Gas));
    assert!(f.log.contains("Gas leak detected by"));
    assert_eq!(f.detectors.scan(), 0);

    f.mediator.reset_sequence();

    assert!(!f.mediator.is_sequence_active());
    assert_eq!(
        f.mediator.sequence_status().last_outcome,
        Some(SequenceOutcome::Reset)
    );
}

// ---------------------------------------------------------------------------
// Operating state history
// ---------------------------------------------------------------------------

#[test]
fn should_drop_redo_branch_after_new_state() {
    let home = Arc::new(VirtualHome::new());
    let log = Arc::new(RecentActivityLog::default());
    let states = StateManager::new(home.clone(), log.clone());

    assert!(states.set_state(OperatingState::LowPower));
    assert!(home.appliances().iter().all(|a| !a.is_on()));
    assert!(states.set_state(OperatingState::Sleep));
    assert_eq!(states.go_to_previous(), Ok(OperatingState::LowPower));
    assert_eq!(states.current_state(), OperatingState::LowPower);
    assert!(states.can_go_next());

    assert!(states.set_state(OperatingState::Normal));

    assert!(!states.can_go_next());
    assert_eq!(states.go_to_next(), Err(HistoryError::NothingToRedo));
    assert_eq!(states.current_state(), OperatingState::Normal);
    assert!(log.contains("Leaving Low Power mode"));
}

#[test]
fn should_keep_security_devices_powered_in_sleep() {
    let home = Arc::new(VirtualHome::new());
    let states = StateManager::new(home.clone(), Arc::new(RecentActivityLog::default()));
    states.set_state(OperatingState::HighPerformance);

    states.set_state(OperatingState::Sleep);

    assert!(home.alarm().is_on());
    assert!(home.cameras().iter().all(|c| c.is_on()));
    assert!(home.detectors().iter().all(|d| d.is_on()));
    assert!(home.lights().iter().all(|l| !l.is_on()));
}
