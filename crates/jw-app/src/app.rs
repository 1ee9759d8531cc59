#![forbid(unsafe_code)]

//! Top-level application model.
//!
//! `AppModel` owns the letter log and the active view. It routes keys to
//! the timeline or the footer controls, runs the read/write toggle and the
//! clear action, and declares the animation tick only while writing.
//! Clicks resolve against the hit regions of the last drawn frame.

use std::cell::RefCell;

use jw_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use jw_core::geometry::Rect;
use jw_render::frame::{Frame, HitGrid};
use jw_runtime::{Cmd, Every, Model, Subscription};
use tracing::{debug, info};

use crate::chrome::{self, ChromeLayout, Control};
use crate::config::TimelineConfig;
use crate::input::Keystroke;
use crate::reading::ReadingView;
use crate::timeline::LetterLog;
use crate::writing::WritingView;

/// Subscription ID of the animation tick.
pub const FRAME_TICK_ID: u64 = 0x4A57_4652; // "JWFR"

/// The active view.
#[derive(Debug, Clone)]
pub enum View {
    /// Letters laid out on the timeline, with the gliding caret.
    Writing(WritingView),
    /// The log flattened to plain text.
    Reading(ReadingView),
}

/// Application messages.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Keyboard input.
    Key(KeyEvent),
    /// Mouse input.
    Mouse(MouseEvent),
    /// Terminal size changed (also sent once at startup).
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// One animation frame.
    Frame,
    /// Switch between writing and reading.
    ToggleMode,
    /// Empty the log.
    Clear,
    /// Leave the program.
    Quit,
    /// Input with no effect.
    Noop,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Msg::Key(key),
            Event::Mouse(mouse) => Msg::Mouse(mouse),
            Event::Resize { width, height } => Msg::Resize { width, height },
            Event::Tick => Msg::Frame,
            Event::Focus(_) => Msg::Noop,
        }
    }
}

/// Application state.
#[derive(Debug)]
pub struct AppModel {
    log: LetterLog,
    view: View,
    focus: Option<Control>,
    config: TimelineConfig,
    width: u16,
    height: u16,
    /// Hit regions of the last drawn frame.
    hits: RefCell<Option<HitGrid>>,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl AppModel {
    /// Start in writing mode with an empty log. The container is measured
    /// when the first resize arrives.
    pub fn new(config: TimelineConfig) -> Self {
        let log = LetterLog::new();
        let view = View::Writing(WritingView::mount(&log, 0, config));
        Self {
            log,
            view,
            focus: None,
            config,
            width: 0,
            height: 0,
            hits: RefCell::new(None),
        }
    }

    /// The letter log.
    pub fn log(&self) -> &LetterLog {
        &self.log
    }

    /// The active view.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// `true` while the writing view is active.
    pub fn is_writing(&self) -> bool {
        matches!(self.view, View::Writing(_))
    }

    /// The writing view's caret, if writing.
    pub fn caret(&self) -> Option<f64> {
        match &self.view {
            View::Writing(w) => Some(w.caret()),
            View::Reading(_) => None,
        }
    }

    /// The focused footer control.
    pub fn focus(&self) -> Option<Control> {
        self.focus
    }

    /// Timeline configuration in use.
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Layout for the last known terminal size.
    pub fn layout(&self) -> ChromeLayout {
        ChromeLayout::compute(Rect::from_size(self.width, self.height), self.is_writing())
    }

    fn toggle_mode(&mut self) {
        let container = self.layout().container;
        self.view = match self.view {
            View::Writing(_) => {
                info!(letters = self.log.len(), "switched to reading");
                View::Reading(ReadingView::new(container.width, container.height))
            }
            View::Reading(_) => {
                info!(letters = self.log.len(), "switched to writing");
                View::Writing(WritingView::mount(&self.log, container.width, self.config))
            }
        };
    }

    fn clear(&mut self) {
        info!(letters = self.log.len(), "log cleared");
        self.log.clear();
        if let View::Writing(w) = &mut self.view {
            w.sync_with_log(&self.log);
        }
    }

    fn activate(&mut self, control: Control) -> Cmd<Msg> {
        self.focus = None;
        match control {
            Control::ReadWrite => self.toggle_mode(),
            Control::Clear => self.clear(),
        }
        Cmd::none()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.kind == KeyEventKind::Release {
            return Cmd::none();
        }

        if key.ctrl() {
            match key.code {
                KeyCode::Char('c' | 'q') => return Cmd::quit(),
                KeyCode::Char('r') => return Cmd::msg(Msg::ToggleMode),
                KeyCode::Char('l') => return Cmd::msg(Msg::Clear),
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = Some(Control::next(self.focus));
                return Cmd::none();
            }
            KeyCode::BackTab => {
                self.focus = Some(Control::prev(self.focus));
                return Cmd::none();
            }
            KeyCode::Escape => {
                self.focus = None;
                return Cmd::none();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(control) = self.focus {
                    return self.activate(control);
                }
            }
            _ => {}
        }

        match &mut self.view {
            View::Writing(w) => {
                if let Some(keystroke) = Keystroke::from_key(&key) {
                    w.handle_keystroke(&mut self.log, keystroke);
                }
            }
            View::Reading(r) => {
                r.handle_key(&key, &self.log);
            }
        }
        Cmd::none()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Cmd<Msg> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Cmd::none();
        }
        let hit = self
            .hits
            .borrow()
            .as_ref()
            .and_then(|grid| grid.hit_test(mouse.x, mouse.y));
        match hit.and_then(Control::from_hit_id) {
            Some(control) => {
                debug!(?control, x = mouse.x, y = mouse.y, "control clicked");
                self.activate(control)
            }
            None => Cmd::none(),
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let container = self.layout().container;
        match &mut self.view {
            View::Writing(w) => w.resize(container.width),
            View::Reading(r) => r.resize(container.width, container.height, &self.log),
        }
    }
}

impl Model for AppModel {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        info!(
            time_speed = self.config.time_speed,
            line_height = self.config.line_height,
            "just-write started"
        );
        Cmd::none()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Mouse(mouse) => self.handle_mouse(mouse),
            Msg::Resize { width, height } => {
                self.resize(width, height);
                Cmd::none()
            }
            Msg::Frame => {
                if let View::Writing(w) = &mut self.view {
                    w.frame_tick();
                }
                Cmd::none()
            }
            Msg::ToggleMode => {
                self.focus = None;
                self.toggle_mode();
                Cmd::none()
            }
            Msg::Clear => {
                self.focus = None;
                self.clear();
                Cmd::none()
            }
            Msg::Quit => Cmd::quit(),
            Msg::Noop => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let writing = self.is_writing();
        let layout = ChromeLayout::compute(frame.bounds(), writing);

        chrome::render_header(frame, layout.header);
        match &self.view {
            View::Writing(w) => w.render(&self.log, frame, layout.container),
            View::Reading(r) => r.render(&self.log, frame, layout.container),
        }
        chrome::render_footer(frame, &layout, writing, self.focus);
        if frame.hit_grid.is_some() {
            self.hits.replace(frame.hit_grid.clone());
        }
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Msg>>> {
        match self.view {
            View::Writing(_) => vec![Box::new(Every::with_id(
                FRAME_TICK_ID,
                self.config.frame_interval,
                || Msg::Frame,
            ))],
            View::Reading(_) => vec![],
        }
    }
}
