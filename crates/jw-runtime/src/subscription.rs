#![forbid(unsafe_code)]

//! Declarative background sources, such as the animation tick.
//!
//! A model never starts or cancels a timer itself. It lists what it wants
//! from `Model::subscriptions()`, and after every update the runtime
//! reconciles that list against what is running, keyed by [`SubId`]:
//! new IDs get a thread, vanished IDs are stopped and joined, and IDs present
//! in both keep running untouched. Ceasing to declare a subscription is how
//! it is released, and the join guarantees no message from it arrives
//! afterwards.

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Identity of a subscription across reconciles.
pub type SubId = u64;

/// A long-lived message source run on its own thread.
pub trait Subscription<M: Send + 'static>: Send {
    /// Stable identity. Two declarations with the same ID are the same
    /// subscription.
    fn id(&self) -> SubId;

    /// Produce messages into `sender` until `stop` fires or the receiver
    /// goes away.
    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal);
}

#[derive(Default)]
struct StopFlag {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopFlag {
    fn guard(&self) -> MutexGuard<'_, bool> {
        // A subscription that panicked while holding the lock must not block
        // shutdown.
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The subscription side of a stop request.
#[derive(Clone)]
pub struct StopSignal(Arc<StopFlag>);

impl StopSignal {
    pub(crate) fn pair() -> (Self, StopTrigger) {
        let flag = Arc::new(StopFlag::default());
        (Self(Arc::clone(&flag)), StopTrigger(flag))
    }

    /// `true` once the runtime asked the subscription to stop.
    pub fn is_stopped(&self) -> bool {
        *self.0.guard()
    }

    /// Sleep for `duration` unless stopped first. Returns `true` when
    /// stopped.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut stopped = self.0.guard();
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = self
                .0
                .wake
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

/// The runtime side of a stop request.
pub(crate) struct StopTrigger(Arc<StopFlag>);

impl StopTrigger {
    pub(crate) fn stop(&self) {
        *self.0.guard() = true;
        self.0.wake.notify_all();
    }
}

struct Running {
    id: SubId,
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl Running {
    fn stop_and_join(mut self) {
        self.trigger.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.trigger.stop();
    }
}

/// Owns the running subscriptions of one program and the channel they
/// report through.
pub struct SubscriptionManager<M: Send + 'static> {
    running: Vec<Running>,
    sender: mpsc::Sender<M>,
    receiver: mpsc::Receiver<M>,
}

impl<M: Send + 'static> SubscriptionManager<M> {
    /// A manager with nothing running.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            running: Vec::new(),
            sender,
            receiver,
        }
    }

    /// Make the running set match `declared`.
    pub fn reconcile(&mut self, declared: Vec<Box<dyn Subscription<M>>>) {
        let wanted: HashSet<SubId> = declared.iter().map(|s| s.id()).collect();

        let (keep, release): (Vec<_>, Vec<_>) = self
            .running
            .drain(..)
            .partition(|r| wanted.contains(&r.id));
        self.running = keep;
        for r in release {
            debug!(sub_id = r.id, "subscription released");
            r.stop_and_join();
        }

        let mut seen: HashSet<SubId> = self.running.iter().map(|r| r.id).collect();
        for sub in declared {
            let id = sub.id();
            if !seen.insert(id) {
                continue;
            }
            debug!(sub_id = id, "subscription acquired");
            let (signal, trigger) = StopSignal::pair();
            let sender = self.sender.clone();
            self.running.push(Running {
                id,
                trigger,
                thread: Some(thread::spawn(move || sub.run(sender, signal))),
            });
        }
        trace!(running = self.running.len(), "subscriptions reconciled");
    }

    /// Messages produced since the last drain.
    pub fn drain_messages(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }

    /// IDs currently running, oldest first.
    pub fn active_ids(&self) -> Vec<SubId> {
        self.running.iter().map(|r| r.id).collect()
    }

    /// Stop and join everything.
    pub fn stop_all(&mut self) {
        for r in self.running.drain(..) {
            r.stop_and_join();
        }
    }
}

impl<M: Send + 'static> Default for SubscriptionManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> Drop for SubscriptionManager<M> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Emits a message every `interval` until released.
///
/// ```ignore
/// fn subscriptions(&self) -> Vec<Box<dyn Subscription<Msg>>> {
///     vec![Box::new(Every::new(Duration::from_millis(16), || Msg::Frame))]
/// }
/// ```
pub struct Every<M: Send + 'static> {
    id: SubId,
    interval: Duration,
    make_msg: Box<dyn Fn() -> M + Send + Sync>,
}

impl<M: Send + 'static> Every<M> {
    /// A ticker identified by its interval.
    pub fn new(interval: Duration, make_msg: impl Fn() -> M + Send + Sync + 'static) -> Self {
        Self::with_id(interval.as_nanos() as u64, interval, make_msg)
    }

    /// A ticker with an explicit ID, so changing the interval does not
    /// restart it under a new identity.
    pub fn with_id(
        id: SubId,
        interval: Duration,
        make_msg: impl Fn() -> M + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            interval,
            make_msg: Box::new(make_msg),
        }
    }

    /// Time between messages.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<M: Send + 'static> Subscription<M> for Every<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal) {
        let mut ticks = 0u64;
        while !stop.wait_timeout(self.interval) && sender.send((self.make_msg)()).is_ok() {
            ticks += 1;
        }
        trace!(sub_id = self.id, ticks, "ticker finished");
    }
}
