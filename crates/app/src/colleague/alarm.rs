use std::sync::Arc;

use homeguard_domain::command::{ColleagueKind, SecurityCommand};
use homeguard_domain::device::AlarmState;
use homeguard_domain::error::HomeGuardError;
use homeguard_domain::event::SecurityEvent;
use homeguard_domain::hazard::AlarmType;
use homeguard_domain::id::ColleagueId;
use homeguard_domain::severity::NotificationSeverity;

use super::{Colleague, ColleagueLink};
use crate::ports::{ActivityLog, AlarmDevice, Device};

/// Code the system itself uses to stand the alarm down.
pub const DEFAULT_SERVICE_CODE: &str = "1234";

/// Drives the alarm panel.
pub struct AlarmColleague {
    id: ColleagueId,
    link: ColleagueLink,
    alarm: Option<Arc<dyn AlarmDevice>>,
    service_code: String,
    log: Option<Arc<dyn ActivityLog>>,
}

impl AlarmColleague {
    pub fn new(alarm: Arc<dyn AlarmDevice>) -> Self {
        Self {
            id: ColleagueId::new(),
            link: ColleagueLink::new(),
            alarm: Some(alarm),
            service_code: DEFAULT_SERVICE_CODE.to_string(),
            log: None,
        }
    }

    /// A colleague with no panel attached. Every command is skipped.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            id: ColleagueId::new(),
            link: ColleagueLink::new(),
            alarm: None,
            service_code: DEFAULT_SERVICE_CODE.to_string(),
            log: None,
        }
    }

    /// Code used by [`SecurityCommand::DeactivateAlarm`].
    #[must_use]
    pub fn with_service_code(mut self, code: impl Into<String>) -> Self {
        self.service_code = code.into();
        self
    }

    /// Also write skipped arming steps to `log`.
    #[must_use]
    pub fn with_activity_log(mut self, log: Arc<dyn ActivityLog>) -> Self {
        self.log = Some(log);
        self
    }

    fn activate(
        &self,
        alarm: &dyn AlarmDevice,
        alarm_type: AlarmType,
    ) -> Result<Vec<SecurityEvent>, HomeGuardError> {
        if alarm.alarm_state() == AlarmState::Triggered {
            // no automatic re-arm after an earlier trigger
            let previous = alarm
                .last_trigger()
                .map_or_else(|| "unknown".to_string(), |t| t.to_string());
            tracing::warn!(requested = %alarm_type, %previous, "alarm already triggered, arming skipped");
            if let Some(log) = &self.log {
                log.log(
                    NotificationSeverity::Warning,
                    &format!(
                        "{} already triggered ({previous}), {alarm_type} alarm not armed",
                        alarm.name()
                    ),
                );
            }
            return Ok(Vec::new());
        }
        if !alarm.is_on() {
            alarm.turn_on()?;
        }
        alarm.arm()?;
        alarm.trigger(alarm_type)?;
        Ok(vec![SecurityEvent::AlarmTriggered])
    }

    fn stand_down(alarm: &dyn AlarmDevice, code: &str) -> Result<Vec<SecurityEvent>, HomeGuardError> {
        let was_active = alarm.alarm_state() == AlarmState::Triggered || alarm.is_siren_active();
        alarm.disarm(code)?;
        alarm.silence();
        if was_active {
            Ok(vec![SecurityEvent::AlarmAcknowledged])
        } else {
            Ok(Vec::new())
        }
    }
}

impl Colleague for AlarmColleague {
    fn id(&self) -> ColleagueId {
        self.id
    }

    fn kind(&self) -> ColleagueKind {
        ColleagueKind::Alarm
    }

    fn link(&self) -> &ColleagueLink {
        &self.link
    }

    fn receive(&self, command: &SecurityCommand) -> Result<Vec<SecurityEvent>, HomeGuardError> {
        let Some(alarm) = self.alarm.as_deref() else {
            tracing::warn!(%command, "no alarm device attached, skipping");
            return Ok(Vec::new());
        };

        match command {
            SecurityCommand::ActivateAlarm(alarm_type) => self.activate(alarm, *alarm_type),
            SecurityCommand::DeactivateAlarm => Self::stand_down(alarm, &self.service_code),
            SecurityCommand::Disarm { code } => Self::stand_down(alarm, code),
            SecurityCommand::SilenceAlarm => {
                alarm.silence();
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::activity_log::RecentActivityLog;
    use homeguard_domain::device::DeviceCategory;
    use homeguard_domain::error::DeviceError;
    use homeguard_domain::id::DeviceId;
    use std::sync::Mutex;

    // ── Fake panel ─────────────────────────────────────────────────

    #[derive(Default)]
    struct PanelState {
        on: bool,
        state: AlarmState,
        siren: bool,
        last: Option<AlarmType>,
        triggers: usize,
    }

    pub(crate) struct FakeAlarm {
        id: DeviceId,
        pin: String,
        state: Mutex<PanelState>,
    }

    impl FakeAlarm {
        pub(crate) fn new(pin: &str) -> Arc<Self> {
            Arc::new(Self {
                id: DeviceId::new(),
                pin: pin.to_string(),
                state: Mutex::new(PanelState::default()),
            })
        }

        pub(crate) fn triggers(&self) -> usize {
            self.state.lock().unwrap().triggers
        }
    }

    impl Device for FakeAlarm {
        fn id(&self) -> DeviceId {
            self.id
        }
        fn name(&self) -> &str {
            "Panel"
        }
        fn category(&self) -> DeviceCategory {
            DeviceCategory::Alarm
        }
        fn turn_on(&self) -> Result<(), DeviceError> {
            self.state.lock().unwrap().on = true;
            Ok(())
        }
        fn turn_off(&self) -> Result<(), DeviceError> {
            self.state.lock().unwrap().on = false;
            Ok(())
        }
        fn is_on(&self) -> bool {
            self.state.lock().unwrap().on
        }
        fn is_critical(&self) -> bool {
            true
        }
    }

    impl AlarmDevice for FakeAlarm {
        fn arm(&self) -> Result<(), DeviceError> {
            let mut s = self.state.lock().unwrap();
            if s.state == AlarmState::Disarmed {
                s.state = AlarmState::ArmedAway;
            }
            Ok(())
        }
        fn trigger(&self, alarm_type: AlarmType) -> Result<(), DeviceError> {
            let mut s = self.state.lock().unwrap();
            if s.state.is_armed() {
                s.state = AlarmState::Triggered;
                s.siren = true;
                s.last = Some(alarm_type);
                s.triggers += 1;
            }
            Ok(())
        }
        fn silence(&self) {
            self.state.lock().unwrap().siren = false;
        }
        fn disarm(&self, code: &str) -> Result<(), DeviceError> {
            if code != self.pin {
                return Err(DeviceError::InvalidCredential {
                    device: "Panel".to_string(),
                });
            }
            let mut s = self.state.lock().unwrap();
            s.state = AlarmState::Disarmed;
            s.siren = false;
            Ok(())
        }
        fn alarm_state(&self) -> AlarmState {
            self.state.lock().unwrap().state
        }
        fn is_siren_active(&self) -> bool {
            self.state.lock().unwrap().siren
        }
        fn last_trigger(&self) -> Option<AlarmType> {
            self.state.lock().unwrap().last
        }
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[test]
    fn should_trigger_once_per_activation() {
        let panel = FakeAlarm::new("1234");
        let colleague = AlarmColleague::new(panel.clone());

        let first = colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Fire))
            .unwrap();
        let second = colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Fire))
            .unwrap();

        assert_eq!(first, vec![SecurityEvent::AlarmTriggered]);
        assert!(second.is_empty());
        assert_eq!(panel.triggers(), 1);
        assert_eq!(panel.last_trigger(), Some(AlarmType::Fire));
        assert!(panel.is_on());
    }

    #[test]
    fn should_log_skipped_arming_when_already_triggered() {
        let panel = FakeAlarm::new("1234");
        let log = Arc::new(RecentActivityLog::default());
        let colleague = AlarmColleague::new(panel.clone()).with_activity_log(log.clone());
        colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Intrusion))
            .unwrap();
        colleague.receive(&SecurityCommand::SilenceAlarm).unwrap();

        let events = colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Fire))
            .unwrap();

        assert!(events.is_empty());
        assert!(!panel.is_siren_active());
        assert_eq!(panel.last_trigger(), Some(AlarmType::Intrusion));
        let entry = &log.recent(1)[0];
        assert_eq!(entry.severity, NotificationSeverity::Warning);
        assert_eq!(
            entry.message,
            "Panel already triggered (INTRUSION), FIRE alarm not armed"
        );
    }

    #[test]
    fn should_raise_acknowledged_only_when_deactivating_active_alarm() {
        let panel = FakeAlarm::new("1234");
        let colleague = AlarmColleague::new(panel.clone());

        let idle = colleague.receive(&SecurityCommand::DeactivateAlarm).unwrap();
        assert!(idle.is_empty());

        colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Intrusion))
            .unwrap();
        let events = colleague.receive(&SecurityCommand::DeactivateAlarm).unwrap();

        assert_eq!(events, vec![SecurityEvent::AlarmAcknowledged]);
        assert_eq!(panel.alarm_state(), AlarmState::Disarmed);
        assert!(!panel.is_siren_active());
    }

    #[test]
    fn should_keep_alarm_triggered_when_silenced() {
        let panel = FakeAlarm::new("1234");
        let colleague = AlarmColleague::new(panel.clone());
        colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Intrusion))
            .unwrap();

        colleague.receive(&SecurityCommand::SilenceAlarm).unwrap();

        assert!(!panel.is_siren_active());
        assert_eq!(panel.alarm_state(), AlarmState::Triggered);
    }

    #[test]
    fn should_reject_wrong_disarm_code_and_stay_triggered() {
        let panel = FakeAlarm::new("1234");
        let colleague = AlarmColleague::new(panel.clone());
        colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Intrusion))
            .unwrap();

        let result = colleague.receive(&SecurityCommand::Disarm {
            code: "0000".to_string(),
        });

        assert!(matches!(
            result,
            Err(HomeGuardError::Device(DeviceError::InvalidCredential { .. }))
        ));
        assert_eq!(panel.alarm_state(), AlarmState::Triggered);
    }

    #[test]
    fn should_use_configured_service_code_for_deactivation() {
        let panel = FakeAlarm::new("4321");
        let colleague = AlarmColleague::new(panel.clone()).with_service_code("4321");
        colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::GasLeak))
            .unwrap();

        let events = colleague.receive(&SecurityCommand::DeactivateAlarm).unwrap();

        assert_eq!(events, vec![SecurityEvent::AlarmAcknowledged]);
    }

    #[test]
    fn should_skip_commands_without_device() {
        let colleague = AlarmColleague::detached();
        let events = colleague
            .receive(&SecurityCommand::ActivateAlarm(AlarmType::Fire))
            .unwrap();
        assert!(events.is_empty());
    }
}
