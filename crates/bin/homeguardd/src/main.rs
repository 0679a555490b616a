//! # homeguardd: homeguard daemon
//!
//! Composition root that wires the virtual home, the colleagues and the
//! security mediator together and runs the operator console on stdin.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Construct the virtual device catalog and the colleagues driving it
//! - Construct the notification chain and the mediator, register colleagues
//! - Construct the operating-state manager over the same catalog
//! - Read operator commands until `quit` or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod console;

use std::sync::Arc;

use anyhow::Context;
use homeguard_adapter_virtual::VirtualHome;
use homeguard_app::activity_log::RecentActivityLog;
use homeguard_app::colleague::{
    AlarmColleague, CameraColleague, DetectorColleague, EmergencyServiceColleague, LightColleague,
};
use homeguard_app::mediator::SecurityMediator;
use homeguard_app::notification::NotificationChainBuilder;
use homeguard_app::ports::{ActivityLog, AlarmDevice, CameraDevice, Device};
use homeguard_app::services::StateManager;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::console::{ConsoleCommand, ConsoleError, HELP};

enum Flow {
    Continue,
    Quit,
}

struct Daemon {
    home: Arc<VirtualHome>,
    log: Arc<RecentActivityLog>,
    mediator: SecurityMediator,
    detectors: Arc<DetectorColleague>,
    states: StateManager<Arc<VirtualHome>>,
}

impl Daemon {
    fn build(config: &Config) -> Self {
        let home = Arc::new(VirtualHome::new());
        let log = Arc::new(RecentActivityLog::default());
        let shared_log: Arc<dyn ActivityLog> = log.clone();

        let builder = NotificationChainBuilder::new(shared_log.clone());
        let chain = match config.notifications.preference {
            Some(preference) => builder.from_preference(preference),
            None => builder.from_config(&config.chain_config()),
        };
        tracing::info!(handlers = ?chain.handler_names(), "notification chain ready");

        let mediator = SecurityMediator::new(chain, shared_log.clone(), config.timing());
        let detectors = Arc::new(DetectorColleague::new(home.detector_devices()));
        let cameras = CameraColleague::new(home.camera_devices());
        cameras.enable_motion_detection(true);

        mediator.register(Arc::new(
            AlarmColleague::new(home.alarm_device()).with_activity_log(shared_log.clone()),
        ));
        mediator.register(Arc::new(LightColleague::new(home.light_devices())));
        mediator.register(Arc::new(cameras));
        mediator.register(detectors.clone());
        mediator.register(Arc::new(EmergencyServiceColleague::with_numbers(
            shared_log.clone(),
            config.emergency_numbers(),
        )));

        let states = StateManager::new(home.clone(), shared_log);

        Self {
            home,
            log,
            mediator,
            detectors,
            states,
        }
    }

    fn execute(&self, command: ConsoleCommand) -> anyhow::Result<Flow> {
        match command {
            ConsoleCommand::Motion => self.mediator.handle_motion_detected(),
            ConsoleCommand::Smoke => self.mediator.handle_smoke_detected(),
            ConsoleCommand::Gas => self.mediator.handle_gas_detected(),
            ConsoleCommand::Reading { hazard, value } => match self.home.detector(hazard) {
                Some(detector) => {
                    if detector.set_reading(value) {
                        let reported = self.detectors.scan();
                        println!("{} triggered, {reported} hazard(s) reported", detector.name());
                    } else {
                        println!("{} reads {value}", detector.name());
                    }
                }
                None => println!("no {hazard} detector installed"),
            },
            ConsoleCommand::Scan => {
                let reported = self.detectors.scan();
                println!("{reported} hazard(s) reported");
            }
            ConsoleCommand::Ack => {
                if !self.mediator.acknowledge_alarm() {
                    println!("no active sequence");
                }
            }
            ConsoleCommand::Disarm(code) => match self.mediator.disarm_alarm(&code) {
                Ok(()) => println!("alarm disarmed"),
                Err(err) => println!("disarm failed: {:#}", anyhow::Error::new(err)),
            },
            ConsoleCommand::Reset => self.mediator.reset_sequence(),
            ConsoleCommand::State(state) => {
                if self.states.set_state(state) {
                    println!("operating state: {state}");
                } else {
                    println!("already in {state}");
                }
            }
            ConsoleCommand::Undo => match self.states.go_to_previous() {
                Ok(state) => println!("operating state: {state}"),
                Err(err) => println!("{err}"),
            },
            ConsoleCommand::Redo => match self.states.go_to_next() {
                Ok(state) => println!("operating state: {state}"),
                Err(err) => println!("{err}"),
            },
            ConsoleCommand::Status => {
                let snapshot = serde_json::to_string_pretty(&self.snapshot())
                    .context("failed to render status")?;
                println!("{snapshot}");
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn snapshot(&self) -> serde_json::Value {
        let alarm = self.home.alarm();
        let recent: Vec<String> = self
            .log
            .recent(5)
            .into_iter()
            .map(|entry| format!("[{}] {}", entry.severity, entry.message))
            .collect();
        serde_json::json!({
            "sequence": self.mediator.sequence_status(),
            "operating_state": {
                "state": self.states.current_state(),
                "name": self.states.current_name(),
                "can_undo": self.states.can_go_previous(),
                "can_redo": self.states.can_go_next(),
            },
            "alarm": {
                "state": alarm.alarm_state(),
                "siren": alarm.is_siren_active(),
            },
            "lights_on": self.home.lights().iter().filter(|l| l.is_on()).count(),
            "cameras_recording": self.home.cameras().iter().filter(|c| c.is_recording()).count(),
            "colleagues": self.mediator.colleague_count(),
            "recent_activity": recent,
        })
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn spawn_status_logger(mediator: &SecurityMediator) -> JoinHandle<()> {
    let mut updates = WatchStream::new(mediator.subscribe_sequence());
    tokio::spawn(async move {
        let mut last = None;
        while let Some(slot) = updates.next().await {
            let status = slot.status();
            let key = (status.state, status.generation);
            if last == Some(key) {
                continue;
            }
            last = Some(key);
            tracing::info!(
                state = %status.state,
                hazard = ?status.hazard,
                generation = status.generation,
                outcome = ?status.last_outcome,
                "sequence status"
            );
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    let daemon = Daemon::build(&config);
    let status_logger = spawn_status_logger(&daemon.mediator);
    tracing::info!(
        tick_ms = config.sequence.tick_ms,
        state = %daemon.states.current_state(),
        "homeguardd ready"
    );
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for ctrl-c")?;
                tracing::info!("shutdown requested");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match ConsoleCommand::parse(&line) {
                    Ok(command) => {
                        if let Flow::Quit = daemon.execute(command)? {
                            break;
                        }
                    }
                    Err(ConsoleError::Empty) => {}
                    Err(err) => println!("{err}"),
                }
            }
        }
    }

    if daemon.mediator.is_sequence_active() {
        daemon.mediator.reset_sequence();
    }
    status_logger.abort();
    tracing::info!("homeguardd stopped");
    Ok(())
}
