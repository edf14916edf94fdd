//! Scribe core: pure job lifecycle state machine and view-model projection.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, SettledOutcome};
pub use state::{ControllerState, JobId, JobUpdate, Outcome, OutputFormat, Phase};
pub use update::update;
pub use view_model::{format_timer, progress_phase_label, ControllerViewModel};
