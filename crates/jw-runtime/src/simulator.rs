#![forbid(unsafe_code)]

//! Drive a [`Model`] by hand.
//!
//! No terminal and no threads: tests inject events, stand in for the tick
//! with [`send_n`](ProgramSimulator::send_n) and render into frames that
//! carry a hit grid, so clicks can be aimed at what was drawn.
//!
//! ```ignore
//! let mut sim = ProgramSimulator::new(App::new(Config::default()));
//! sim.mount(40, 10);
//! sim.inject_event(Event::Key(KeyEvent::new(KeyCode::Char('h'))));
//! sim.send_n(4, || Msg::Tick);
//! let frame = sim.capture_frame(40, 10);
//! ```

use jw_core::event::Event;
use jw_render::frame::Frame;

use crate::program::{Cmd, Model};
use crate::subscription::SubId;

/// A model plus the effects its commands had.
pub struct ProgramSimulator<M: Model> {
    model: M,
    running: bool,
    logs: Vec<String>,
    last_frame: Option<Frame>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Wrap `model` without initializing it.
    pub fn new(model: M) -> Self {
        Self {
            model,
            running: true,
            logs: Vec::new(),
            last_frame: None,
        }
    }

    /// Run `Model::init` and its command.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.apply(cmd);
    }

    /// Initialize, then report a terminal of `width` x `height` the way
    /// the program loop does on startup.
    pub fn mount(&mut self, width: u16, height: u16) {
        self.init();
        self.inject_event(Event::Resize { width, height });
    }

    /// Deliver one terminal event.
    pub fn inject_event(&mut self, event: Event) {
        self.send(M::Message::from(event));
    }

    /// Deliver events in order, dropping the rest once the model quits.
    pub fn inject_events(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.inject_event(event);
        }
    }

    /// Deliver a message. Ignored after quit.
    pub fn send(&mut self, msg: M::Message) {
        if self.running {
            let cmd = self.model.update(msg);
            self.apply(cmd);
        }
    }

    /// Deliver `n` messages built by `make`.
    pub fn send_n(&mut self, n: usize, make: impl Fn() -> M::Message) {
        for _ in 0..n {
            self.send(make());
        }
    }

    /// What the model subscribes to right now.
    pub fn subscription_ids(&self) -> Vec<SubId> {
        self.model
            .subscriptions()
            .iter()
            .map(|sub| sub.id())
            .collect()
    }

    /// Render into a fresh `width` x `height` frame.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Frame {
        let mut frame = Frame::with_hit_grid(width, height);
        self.model.view(&mut frame);
        self.last_frame.insert(frame)
    }

    /// The frame from the latest [`capture_frame`](Self::capture_frame).
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// `false` once the model returned `Cmd::Quit`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Text of every `Cmd::Log`, oldest first.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    fn apply(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Log(line) => self.logs.push(line),
            Cmd::Msg(msg) => self.send(msg),
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    self.apply(cmd);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{Every, Subscription};
    use jw_core::event::{KeyCode, KeyEvent};
    use jw_render::cell::Cell;
    use std::time::Duration;

    #[derive(Default)]
    struct Tally {
        count: u32,
        started: bool,
        frozen: bool,
    }

    #[derive(Debug)]
    enum Msg {
        Bump,
        BumpTwice,
        Freeze,
        Report,
        Stop,
        Ignore,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            let Event::Key(key) = event else {
                return Msg::Ignore;
            };
            match key.code {
                KeyCode::Char('b') => Msg::Bump,
                KeyCode::Char('f') => Msg::Freeze,
                KeyCode::Char('r') => Msg::Report,
                KeyCode::Char('s') => Msg::Stop,
                _ => Msg::Ignore,
            }
        }
    }

    impl Model for Tally {
        type Message = Msg;

        fn init(&mut self) -> Cmd<Msg> {
            self.started = true;
            Cmd::none()
        }

        fn update(&mut self, msg: Msg) -> Cmd<Msg> {
            match msg {
                Msg::Bump => self.count += 1,
                Msg::BumpTwice => {
                    return Cmd::batch(vec![Cmd::msg(Msg::Bump), Cmd::msg(Msg::Bump)]);
                }
                Msg::Freeze => self.frozen = true,
                Msg::Report => return Cmd::log(format!("count={}", self.count)),
                Msg::Stop => return Cmd::quit(),
                Msg::Ignore => {}
            }
            Cmd::none()
        }

        fn view(&self, frame: &mut Frame) {
            frame
                .buffer
                .set_string(0, 0, &self.count.to_string(), Cell::default());
        }

        fn subscriptions(&self) -> Vec<Box<dyn Subscription<Msg>>> {
            if self.frozen {
                Vec::new()
            } else {
                vec![Box::new(Every::with_id(3, Duration::from_millis(5), || {
                    Msg::Bump
                }))]
            }
        }
    }

    fn press(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    #[test]
    fn mount_initializes() {
        let mut sim = ProgramSimulator::new(Tally::default());
        sim.mount(10, 2);
        assert!(sim.model().started);
    }

    #[test]
    fn events_and_messages_reach_update() {
        let mut sim = ProgramSimulator::new(Tally::default());
        sim.inject_events([press('b'), press('x'), press('b')]);
        sim.send_n(3, || Msg::Bump);
        assert_eq!(sim.model().count, 5);
    }

    #[test]
    fn batched_messages_run_in_place() {
        let mut sim = ProgramSimulator::new(Tally::default());
        sim.send(Msg::BumpTwice);
        assert_eq!(sim.model().count, 2);
    }

    #[test]
    fn nothing_arrives_after_quit() {
        let mut sim = ProgramSimulator::new(Tally::default());
        sim.inject_events([press('b'), press('s'), press('b')]);
        sim.send(Msg::Bump);
        assert!(!sim.is_running());
        assert_eq!(sim.model().count, 1);
    }

    #[test]
    fn log_lines_are_kept() {
        let mut sim = ProgramSimulator::new(Tally::default());
        sim.inject_events([press('b'), press('r')]);
        assert_eq!(sim.logs(), ["count=1"]);
    }

    #[test]
    fn declared_subscriptions_track_the_model() {
        let mut sim = ProgramSimulator::new(Tally::default());
        assert_eq!(sim.subscription_ids(), vec![3]);
        sim.inject_event(press('f'));
        assert!(sim.subscription_ids().is_empty());
    }

    #[test]
    fn captured_frame_has_view_and_hit_grid() {
        let mut sim = ProgramSimulator::new(Tally::default());
        sim.send_n(12, || Msg::Bump);
        let frame = sim.capture_frame(4, 1);
        assert_eq!(frame.buffer.get(1, 0).and_then(|c| c.content.as_char()), Some('2'));
        assert!(frame.hit_grid.is_some());
        assert!(sim.last_frame().is_some());
    }
}
