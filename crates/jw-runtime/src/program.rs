#![forbid(unsafe_code)]

//! The update/view loop.
//!
//! A [`Model`] owns all state. Terminal input becomes [`Event`]s, each
//! converted into the model's message type and fed to `update`, which may
//! answer with a [`Cmd`]. After every update the model's declared
//! subscriptions are reconciled, and the next iteration repaints whatever
//! changed.
//!
//! Startup order matters for layout: `init` runs first, then the terminal
//! size arrives as an ordinary `Event::Resize`, and only then is the first
//! frame drawn. Every subscription is stopped and joined before
//! [`Program::run`] returns.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use jw_core::event::Event;
use jw_core::terminal_session::TerminalSession;
use jw_render::buffer::Buffer;
use jw_render::diff::BufferDiff;
use jw_render::frame::Frame;
use jw_render::presenter::Presenter;
use tracing::{debug, debug_span, info, info_span};

use crate::subscription::{Subscription, SubscriptionManager};

/// Application state and its reactions.
pub trait Model: Sized {
    /// What `update` consumes. Terminal events convert into it.
    type Message: From<Event> + Send + 'static;

    /// Startup effects, run once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// React to one message.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Draw the whole screen. Called with a blank frame that records hit
    /// regions, so clicks can be resolved against what was drawn.
    fn view(&self, frame: &mut Frame);

    /// Background sources wanted in the current state. An ID that stops
    /// appearing here is stopped.
    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        Vec::new()
    }
}

/// An effect for the runtime to carry out after `update`.
#[derive(Debug, Default)]
pub enum Cmd<M> {
    #[default]
    None,
    /// Leave the loop after the current batch.
    Quit,
    /// Run in order, stopping at a quit.
    Batch(Vec<Cmd<M>>),
    /// Feed a message straight back into `update`.
    Msg(M),
    /// Record a line in the log file. Never printed to the terminal.
    Log(String),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(line: impl Into<String>) -> Self {
        Self::Log(line.into())
    }

    /// Combine commands, dropping no-ops. Zero or one remaining command is
    /// returned unwrapped.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut kept: Vec<Self> = cmds
            .into_iter()
            .filter(|cmd| !matches!(cmd, Self::None))
            .collect();
        if kept.len() > 1 {
            Self::Batch(kept)
        } else {
            kept.pop().unwrap_or_default()
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Quit => "quit",
            Self::Batch(_) => "batch",
            Self::Msg(_) => "msg",
            Self::Log(_) => "log",
        }
    }
}

/// Where the loop gets its size and input from.
pub trait EventSource {
    /// `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Block for at most `timeout`; `true` when `read_event` has something.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<bool>;

    /// The next event, or `None` for input that maps to no [`Event`].
    fn read_event(&mut self) -> io::Result<Option<Event>>;
}

impl EventSource for TerminalSession {
    fn size(&self) -> io::Result<(u16, u16)> {
        TerminalSession::size(self)
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<bool> {
        TerminalSession::poll_event(self, timeout)
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        TerminalSession::read_event(self)
    }
}

/// Scripted input for running a program without a terminal.
///
/// Events are handed out in order. With the script exhausted, a poll just
/// sleeps out its timeout.
#[derive(Debug, Clone)]
pub struct HeadlessEvents {
    size: (u16, u16),
    script: VecDeque<Event>,
}

impl HeadlessEvents {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: (width, height),
            script: VecDeque::new(),
        }
    }

    /// Append `events` to the script.
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.script.extend(events);
        self
    }
}

impl EventSource for HeadlessEvents {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok(self.size)
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<bool> {
        let ready = !self.script.is_empty();
        if !ready {
            thread::sleep(timeout);
        }
        Ok(ready)
    }

    fn read_event(&mut self) -> io::Result<Option<Event>> {
        let next = self.script.pop_front();
        if let Some(Event::Resize { width, height }) = next {
            self.size = (width, height);
        }
        Ok(next)
    }
}

/// Loop tuning.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Longest a single input poll may block, which bounds subscription
    /// latency.
    pub poll_timeout: Duration,
    /// Wall-clock limit, for demos and smoke runs.
    pub exit_after: Option<Duration>,
    /// Bracket each frame in synchronized-output mode.
    pub sync_output: bool,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(8),
            exit_after: None,
            sync_output: true,
        }
    }
}

/// A model wired to an input source and an output writer.
pub struct Program<M: Model, E: EventSource, W: Write> {
    model: M,
    events: E,
    presenter: Presenter<W>,
    subscriptions: SubscriptionManager<M::Message>,
    config: ProgramConfig,
    /// What the terminal shows; `None` means unknown, so repaint all.
    shown: Option<Buffer>,
    size: (u16, u16),
    running: bool,
    dirty: bool,
    frames: u64,
}

impl<M: Model, E: EventSource, W: Write> Program<M, E, W> {
    pub fn new(model: M, events: E, writer: W, config: ProgramConfig) -> io::Result<Self> {
        let size = events.size()?;
        Ok(Self {
            model,
            presenter: Presenter::new(writer, config.sync_output),
            events,
            subscriptions: SubscriptionManager::new(),
            config,
            shown: None,
            size,
            running: true,
            dirty: true,
            frames: 0,
        })
    }

    /// Loop until the model quits or `exit_after` passes.
    ///
    /// Subscriptions are joined and the cursor shown again on every exit,
    /// including errors.
    pub fn run(&mut self) -> io::Result<()> {
        let outcome = self.event_loop();
        self.subscriptions.stop_all();
        let cursor = self.presenter.show_cursor();
        info!(frames = self.frames, "program finished");
        outcome.and(cursor)
    }

    /// Take back the model and the writer.
    pub fn into_parts(self) -> io::Result<(M, W)> {
        Ok((self.model, self.presenter.into_inner()?))
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn event_loop(&mut self) -> io::Result<()> {
        let started = Instant::now();
        let init = info_span!("jw.program.init").in_scope(|| self.model.init());
        self.perform(init);

        let (width, height) = self.size;
        self.dispatch(M::Message::from(Event::Resize { width, height }), "mount");
        self.sync_subscriptions();

        self.presenter.hide_cursor()?;
        self.presenter.clear_screen()?;
        self.paint()?;

        while self.running {
            if let Some(limit) = self.config.exit_after
                && started.elapsed() >= limit
            {
                info!(?limit, "exit-after reached");
                break;
            }

            let mut ready = self.events.poll_event(self.config.poll_timeout)?;
            while ready && self.running {
                if let Some(event) = self.events.read_event()? {
                    self.on_event(event)?;
                }
                ready = self.events.poll_event(Duration::ZERO)?;
            }

            let pending = self.subscriptions.drain_messages();
            if !pending.is_empty() {
                for msg in pending {
                    if !self.running {
                        break;
                    }
                    self.dispatch(msg, "subscription");
                }
                self.sync_subscriptions();
            }

            if self.dirty && self.running {
                self.paint()?;
            }
        }
        Ok(())
    }

    fn on_event(&mut self, event: Event) -> io::Result<()> {
        if let Event::Resize { width, height } = event {
            debug!(width, height, "resized");
            self.size = (width, height);
            self.shown = None;
            self.presenter.reset();
            self.presenter.clear_screen()?;
        }
        self.dispatch(M::Message::from(event), "event");
        self.sync_subscriptions();
        Ok(())
    }

    fn dispatch(&mut self, msg: M::Message, source: &'static str) {
        let span = debug_span!(
            "jw.program.update",
            source,
            elapsed_us = tracing::field::Empty,
            cmd = tracing::field::Empty
        );
        let cmd = span.in_scope(|| {
            let started = Instant::now();
            let cmd = self.model.update(msg);
            span.record("elapsed_us", started.elapsed().as_micros() as u64);
            span.record("cmd", cmd.kind());
            cmd
        });
        self.dirty = true;
        self.perform(cmd);
    }

    fn sync_subscriptions(&mut self) {
        self.subscriptions.reconcile(self.model.subscriptions());
    }

    fn perform(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(msg) => self.dispatch(msg, "cmd"),
            Cmd::Log(line) => info!(target: "jw.app", "{line}"),
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    self.perform(cmd);
                }
            }
        }
    }

    fn paint(&mut self) -> io::Result<()> {
        self.dirty = false;
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.frames += 1;
        let _span = debug_span!("jw.program.render", frame = self.frames, width, height).entered();

        let mut frame = Frame::with_hit_grid(width, height);
        self.model.view(&mut frame);
        let diff = match self.shown.as_ref() {
            Some(prev) if (prev.width(), prev.height()) == (width, height) => {
                BufferDiff::compute(prev, &frame.buffer)
            }
            _ => BufferDiff::full(&frame.buffer),
        };
        self.presenter.present(&frame.buffer, &diff)?;
        self.shown = Some(frame.buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::Every;
    use jw_core::event::{KeyCode, KeyEvent};
    use jw_render::cell::Cell;
    use jw_render::frame::HitId;

    struct Echo {
        typed: String,
        size: (u16, u16),
        ticks: u32,
        ticking: bool,
        hit_at_origin: std::cell::Cell<Option<HitId>>,
    }

    #[derive(Debug)]
    enum EchoMsg {
        Char(char),
        Resize(u16, u16),
        Tick,
        StopTicking,
        Quit,
        Ignore,
    }

    impl From<Event> for EchoMsg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(k) if k.is_char('q') => EchoMsg::Quit,
                Event::Key(k) if k.is_char('s') => EchoMsg::StopTicking,
                Event::Key(KeyEvent {
                    code: KeyCode::Char(c),
                    ..
                }) => EchoMsg::Char(c),
                Event::Resize { width, height } => EchoMsg::Resize(width, height),
                _ => EchoMsg::Ignore,
            }
        }
    }

    impl Model for Echo {
        type Message = EchoMsg;

        fn update(&mut self, msg: EchoMsg) -> Cmd<EchoMsg> {
            match msg {
                EchoMsg::Char(c) => {
                    self.typed.push(c);
                    Cmd::log(format!("typed {c}"))
                }
                EchoMsg::Resize(w, h) => {
                    self.size = (w, h);
                    Cmd::none()
                }
                EchoMsg::Tick => {
                    self.ticks += 1;
                    Cmd::none()
                }
                EchoMsg::StopTicking => {
                    self.ticking = false;
                    Cmd::none()
                }
                EchoMsg::Quit => Cmd::quit(),
                EchoMsg::Ignore => Cmd::none(),
            }
        }

        fn view(&self, frame: &mut Frame) {
            frame.buffer.set_string(0, 0, &self.typed, Cell::default());
            frame.register_hit_region(frame.bounds(), HitId::new(9));
            self.hit_at_origin.set(frame.hit_test(0, 0));
        }

        fn subscriptions(&self) -> Vec<Box<dyn Subscription<EchoMsg>>> {
            if self.ticking {
                vec![Box::new(Every::new(Duration::from_millis(1), || {
                    EchoMsg::Tick
                }))]
            } else {
                vec![]
            }
        }
    }

    fn echo(ticking: bool) -> Echo {
        Echo {
            typed: String::new(),
            size: (0, 0),
            ticks: 0,
            ticking,
            hit_at_origin: std::cell::Cell::new(None),
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    #[test]
    fn batch_collapses() {
        assert!(matches!(Cmd::<()>::batch(vec![]), Cmd::None));
        assert!(matches!(Cmd::<()>::batch(vec![Cmd::none(), Cmd::quit()]), Cmd::Quit));
        assert!(matches!(
            Cmd::<()>::batch(vec![Cmd::quit(), Cmd::log("x")]),
            Cmd::Batch(v) if v.len() == 2
        ));
    }

    #[test]
    fn initial_size_is_delivered_before_first_frame() {
        let events = HeadlessEvents::new(20, 3).with_events([key('q')]);
        let mut program =
            Program::new(echo(false), events, Vec::new(), ProgramConfig::default()).unwrap();
        program.run().unwrap();
        assert_eq!(program.model().size, (20, 3));
    }

    #[test]
    fn typed_keys_reach_model_and_output() {
        let events = HeadlessEvents::new(20, 3).with_events([key('h'), key('i'), key('q')]);
        let mut program =
            Program::new(echo(false), events, Vec::new(), ProgramConfig::default()).unwrap();
        program.run().unwrap();
        let (model, out) = program.into_parts().unwrap();
        assert_eq!(model.typed, "hi");
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains('h') && out.contains('i'));
        assert!(out.ends_with("\x1b[?25h"));
    }

    #[test]
    fn painted_frames_record_hit_regions() {
        let events = HeadlessEvents::new(20, 3).with_events([key('q')]);
        let mut program =
            Program::new(echo(false), events, Vec::new(), ProgramConfig::default()).unwrap();
        program.run().unwrap();
        assert_eq!(program.model().hit_at_origin.get(), Some(HitId::new(9)));
    }

    #[test]
    fn resize_event_updates_model() {
        let events = HeadlessEvents::new(20, 3).with_events([
            Event::Resize {
                width: 30,
                height: 5,
            },
            key('q'),
        ]);
        let mut program =
            Program::new(echo(false), events, Vec::new(), ProgramConfig::default()).unwrap();
        program.run().unwrap();
        assert_eq!(program.model().size, (30, 5));
    }

    #[test]
    fn exit_after_stops_an_idle_program() {
        let config = ProgramConfig {
            exit_after: Some(Duration::from_millis(30)),
            ..ProgramConfig::default()
        };
        let mut program =
            Program::new(echo(true), HeadlessEvents::new(10, 2), Vec::new(), config).unwrap();
        program.run().unwrap();
        assert!(program.model().ticks > 0);
    }

    #[test]
    fn zero_sized_terminal_does_not_render() {
        let events = HeadlessEvents::new(0, 0).with_events([key('a'), key('q')]);
        let mut program =
            Program::new(echo(false), events, Vec::new(), ProgramConfig::default()).unwrap();
        program.run().unwrap();
        assert_eq!(program.model().typed, "a");
    }
}
