#![forbid(unsafe_code)]

//! Elm-style runtime: model/update/view loop, subscriptions, and a
//! deterministic simulator for tests.

pub mod program;
pub mod simulator;
pub mod subscription;

pub use program::{Cmd, EventSource, HeadlessEvents, Model, Program, ProgramConfig};
pub use simulator::ProgramSimulator;
pub use subscription::{Every, StopSignal, SubId, Subscription};
