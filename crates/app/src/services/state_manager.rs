//! State manager: switches the home between operating states and walks
//! the state history in both directions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use homeguard_domain::device::DeviceCategory;
use homeguard_domain::error::HistoryError;
use homeguard_domain::operating_state::OperatingState;
use homeguard_domain::severity::NotificationSeverity;
use homeguard_domain::state_history::StateHistory;

use crate::ports::{ActivityLog, BulkOutcome, DeviceCatalog};

/// Device-side effects of an operating state.
pub trait StateBehavior: Send {
    fn state(&self) -> OperatingState;

    /// Applied when the state becomes current.
    fn enter(&self, catalog: &dyn DeviceCatalog, log: &dyn ActivityLog);

    /// Applied when the state is left.
    fn exit(&self, _catalog: &dyn DeviceCatalog, log: &dyn ActivityLog) {
        log.log(
            NotificationSeverity::Info,
            &format!("Leaving {} mode", self.state().name()),
        );
    }
}

struct NormalBehavior;

impl StateBehavior for NormalBehavior {
    fn state(&self) -> OperatingState {
        OperatingState::Normal
    }

    fn enter(&self, _catalog: &dyn DeviceCatalog, log: &dyn ActivityLog) {
        log.log(
            NotificationSeverity::Info,
            "Entering Normal mode: all systems operational",
        );
    }
}

struct HighPerformanceBehavior;

impl StateBehavior for HighPerformanceBehavior {
    fn state(&self) -> OperatingState {
        OperatingState::HighPerformance
    }

    fn enter(&self, catalog: &dyn DeviceCatalog, log: &dyn ActivityLog) {
        log.log(
            NotificationSeverity::Info,
            "Entering High Performance mode: every device on",
        );
        report(self.state(), &catalog.turn_all_on(), log);
    }
}

struct LowPowerBehavior;

impl StateBehavior for LowPowerBehavior {
    fn state(&self) -> OperatingState {
        OperatingState::LowPower
    }

    fn enter(&self, catalog: &dyn DeviceCatalog, log: &dyn ActivityLog) {
        log.log(
            NotificationSeverity::Info,
            "Entering Low Power mode: entertainment devices off",
        );
        report(self.state(), &catalog.turn_off_category(DeviceCategory::Tv), log);
        report(
            self.state(),
            &catalog.turn_off_category(DeviceCategory::SoundSystem),
            log,
        );
    }
}

struct SleepBehavior;

impl StateBehavior for SleepBehavior {
    fn state(&self) -> OperatingState {
        OperatingState::Sleep
    }

    fn enter(&self, catalog: &dyn DeviceCatalog, log: &dyn ActivityLog) {
        log.log(
            NotificationSeverity::Info,
            "Entering Sleep mode: non-critical devices off",
        );
        report(self.state(), &catalog.turn_all_off(), log);
    }
}

fn report(state: OperatingState, outcome: &BulkOutcome, log: &dyn ActivityLog) {
    for failure in &outcome.failures {
        tracing::warn!(%state, error = %failure, "device did not follow state change");
        log.log(
            NotificationSeverity::Warning,
            &format!("{state} change incomplete: {failure}"),
        );
    }
}

/// Build the behavior for `state`.
#[must_use]
pub fn behavior_for(state: OperatingState) -> Box<dyn StateBehavior> {
    match state {
        OperatingState::Normal => Box::new(NormalBehavior),
        OperatingState::HighPerformance => Box::new(HighPerformanceBehavior),
        OperatingState::LowPower => Box::new(LowPowerBehavior),
        OperatingState::Sleep => Box::new(SleepBehavior),
    }
}

struct Current {
    state: OperatingState,
    behavior: Box<dyn StateBehavior>,
    history: StateHistory,
}

/// Owns the current operating state and its history.
///
/// Every transition runs under one lock, so history queries never observe
/// a half-applied change.
pub struct StateManager<C> {
    catalog: C,
    log: Arc<dyn ActivityLog>,
    current: Mutex<Current>,
}

impl<C: DeviceCatalog> StateManager<C> {
    /// Start in [`OperatingState::Normal`].
    pub fn new(catalog: C, log: Arc<dyn ActivityLog>) -> Self {
        Self::with_initial(catalog, log, OperatingState::Normal)
    }

    /// Start in `initial`, applying its behavior.
    pub fn with_initial(catalog: C, log: Arc<dyn ActivityLog>, initial: OperatingState) -> Self {
        let behavior = behavior_for(initial);
        behavior.enter(&catalog, log.as_ref());
        Self {
            catalog,
            log,
            current: Mutex::new(Current {
                state: initial,
                behavior,
                history: StateHistory::new(initial),
            }),
        }
    }

    /// Switch to `state` and record it.
    ///
    /// Returns `false` (and records nothing) when `state` is already current.
    #[tracing::instrument(skip(self))]
    pub fn set_state(&self, state: OperatingState) -> bool {
        let mut current = self.lock();
        if current.state == state {
            return false;
        }
        self.apply(&mut current, state);
        current.history.push(state);
        true
    }

    /// Return to the previous state in the history.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToUndo`] at the oldest entry.
    pub fn go_to_previous(&self) -> Result<OperatingState, HistoryError> {
        let mut current = self.lock();
        let state = current.history.undo()?.state();
        self.apply(&mut current, state);
        Ok(state)
    }

    /// Advance to the next state in the history.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToRedo`] at the newest entry.
    pub fn go_to_next(&self) -> Result<OperatingState, HistoryError> {
        let mut current = self.lock();
        let state = current.history.redo()?.state();
        self.apply(&mut current, state);
        Ok(state)
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.lock().history.can_undo()
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.lock().history.can_redo()
    }

    #[must_use]
    pub fn current_state(&self) -> OperatingState {
        self.lock().state
    }

    #[must_use]
    pub fn current_name(&self) -> &'static str {
        self.current_state().name()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn apply(&self, current: &mut Current, state: OperatingState) {
        let from = current.state;
        current.behavior.exit(&self.catalog, self.log.as_ref());
        current.behavior = behavior_for(state);
        current.behavior.enter(&self.catalog, self.log.as_ref());
        current.state = state;
        tracing::info!(%from, to = %state, "operating state changed");
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
