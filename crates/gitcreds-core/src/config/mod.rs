//! Configure inputs: layering, defaults and the CI event context.

pub mod event;
pub mod inputs;

pub use event::EventContext;
pub use inputs::{Auth, Inputs, Settings, SshSettings};
