#![forbid(unsafe_code)]

//! just-write: type onto a gliding timeline, then read it back as text.
//!
//! Each keystroke is stamped with the current value of a caret that glides
//! forward every animation frame, and drawn where that stamp falls on a
//! wrapped timeline. A read/write toggle flattens the log to plain text.

pub mod app;
pub mod chrome;
pub mod cli;
pub mod config;
pub mod input;
pub mod logging;
pub mod reading;
pub mod timeline;
pub mod writing;

pub use app::{AppModel, Msg, View};
pub use config::TimelineConfig;
pub use timeline::{Letter, LetterLog, Position, position};
