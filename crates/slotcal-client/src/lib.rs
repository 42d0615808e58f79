//! Calendar state, configuration and the `slotcal` CLI
//!
//! [`state::SlotCalendar`] is the embeddable part: it owns the displayed week
//! and drives a data provider. The rest of the crate wires it to a config
//! file and a terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;
pub mod state;

pub use cli::Cli;
pub use config::{ClientConfig, ConfigError, ProviderKind};
pub use error::{ClientError, ClientResult};
pub use state::{
    CalendarState, CompletedLoad, FailurePolicy, LoadOutcome, LoadPhase, LoadTicket,
    PendingLoad, SlotCalendar, SlotCalendarBuilder, SlotQuery,
};
