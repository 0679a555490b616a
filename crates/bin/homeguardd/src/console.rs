//! Operator console: one command per stdin line.

use std::str::FromStr;

use homeguard_domain::hazard::HazardKind;
use homeguard_domain::operating_state::OperatingState;

pub const HELP: &str = "\
commands:
  motion | smoke | gas       signal a hazard as the operator
  reading <smoke|gas> <v>    feed a reading to the virtual detector, then scan
  scan                       report every triggered detector
  ack                        acknowledge the active sequence
  disarm <code>              disarm the alarm panel
  reset                      force-clear the active sequence
  state <normal|high|low|sleep>
  undo | redo                walk the operating-state history
  status                     print a JSON snapshot
  help | quit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Motion,
    Smoke,
    Gas,
    Reading { hazard: HazardKind, value: f64 },
    Scan,
    Ack,
    Disarm(String),
    Reset,
    State(OperatingState),
    Undo,
    Redo,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },
}

impl ConsoleCommand {
    /// Parse one input line. Words are whitespace separated and the command
    /// word is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] for blank lines, unknown words and missing or
    /// malformed arguments.
    pub fn parse(line: &str) -> Result<Self, ConsoleError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ConsoleError::Empty);
        };
        let args: Vec<&str> = words.collect();
        let head = head.to_ascii_lowercase();

        let command = match (head.as_str(), args.as_slice()) {
            ("motion", []) => Self::Motion,
            ("smoke", []) => Self::Smoke,
            ("gas", []) => Self::Gas,
            ("scan", []) => Self::Scan,
            ("ack", []) => Self::Ack,
            ("reset", []) => Self::Reset,
            ("undo", []) => Self::Undo,
            ("redo", []) => Self::Redo,
            ("status", []) => Self::Status,
            ("help", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            ("disarm", [code]) => Self::Disarm((*code).to_string()),
            ("disarm", _) => return Err(usage("disarm", "a single <code>")),
            ("state", [name]) => OperatingState::from_str(name)
                .map(Self::State)
                .map_err(|_| usage("state", "one of normal, high, low, sleep"))?,
            ("state", _) => return Err(usage("state", "one of normal, high, low, sleep")),
            ("reading", [kind, value]) => Self::Reading {
                hazard: parse_detector(kind)?,
                value: value
                    .parse()
                    .map_err(|_| usage("reading", "a numeric value"))?,
            },
            ("reading", _) => return Err(usage("reading", "<smoke|gas> <value>")),
            (
                "motion" | "smoke" | "gas" | "scan" | "ack" | "reset" | "undo" | "redo"
                | "status" | "help" | "quit" | "exit",
                _,
            ) => {
                return Err(ConsoleError::Usage {
                    command: "this command",
                    expected: "no arguments",
                });
            }
            (other, _) => return Err(ConsoleError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn parse_detector(kind: &str) -> Result<HazardKind, ConsoleError> {
    match kind.to_ascii_lowercase().as_str() {
        "smoke" => Ok(HazardKind::Smoke),
        "gas" => Ok(HazardKind::Gas),
        _ => Err(usage("reading", "a detector kind of smoke or gas")),
    }
}

fn usage(command: &'static str, expected: &'static str) -> ConsoleError {
    ConsoleError::Usage { command, expected }
}
