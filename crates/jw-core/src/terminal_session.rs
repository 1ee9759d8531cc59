#![forbid(unsafe_code)]

//! Terminal ownership for the lifetime of the editor.
//!
//! [`TerminalSession`] puts the terminal in raw mode, optionally switches
//! to the alternate screen and captures the mouse, and undoes each of those
//! in reverse order when dropped. A panic hook and, on Unix, a SIGINT/SIGTERM
//! thread run the same restore path so a crash never leaves the shell raw.
//!
//! ```no_run
//! use jw_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     mouse_capture: true,
//! })?;
//! let (cols, rows) = session.size()?;
//! # let _ = (cols, rows);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::{cursor, event as cte, execute, terminal};

use crate::event::Event;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::{Handle, Signals};

/// Which optional terminal modes to enable. Raw mode is always on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Draw on the alternate screen, restoring the shell's screen on exit.
    pub alternate_screen: bool,
    /// Report mouse clicks (SGR encoding).
    pub mouse_capture: bool,
}

/// A terminal mode the session switched on and must switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Raw,
    AlternateScreen,
    MouseCapture,
}

impl Mode {
    fn enable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Raw => terminal::enable_raw_mode(),
            Self::AlternateScreen => execute!(out, terminal::EnterAlternateScreen),
            Self::MouseCapture => execute!(out, cte::EnableMouseCapture),
        }
    }

    fn disable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Raw => terminal::disable_raw_mode(),
            Self::AlternateScreen => execute!(out, terminal::LeaveAlternateScreen),
            Self::MouseCapture => execute!(out, cte::DisableMouseCapture),
        }
    }
}

/// Raw-mode terminal guard. Only one should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    /// Modes switched on so far, in order.
    enabled: Vec<Mode>,
    #[cfg(unix)]
    signals: Option<SignalGuard>,
}

impl TerminalSession {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Fails if any requested mode cannot be enabled. Modes already enabled
    /// are switched back off before returning.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        let mut session = Self {
            options,
            enabled: Vec::with_capacity(3),
            #[cfg(unix)]
            signals: None,
        };

        let wanted = [
            Some(Mode::Raw),
            options.alternate_screen.then_some(Mode::AlternateScreen),
            options.mouse_capture.then_some(Mode::MouseCapture),
        ];
        let mut out = io::stdout();
        for mode in wanted.into_iter().flatten() {
            mode.enable(&mut out)?;
            crate::info!(?mode, "terminal mode enabled");
            session.enabled.push(mode);
        }

        #[cfg(unix)]
        {
            session.signals = Some(SignalGuard::new()?);
        }
        Ok(session)
    }

    /// Columns and rows.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for input. `Ok(false)` on timeout.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        cte::poll(timeout)
    }

    /// Read one event, blocking. `Ok(None)` for input the editor ignores.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        Ok(Event::from_crossterm(cte::read()?))
    }

    /// The options the session was opened with.
    pub fn options(&self) -> SessionOptions {
        self.options
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        #[cfg(unix)]
        drop(self.signals.take());

        let mut out = io::stdout();
        let _ = execute!(out, cursor::Show);
        while let Some(mode) = self.enabled.pop() {
            let _ = mode.disable(&mut out);
            crate::info!(?mode, "terminal mode disabled");
        }
        let _ = out.flush();
    }
}

/// Restore everything a session could have enabled, ignoring failures.
fn restore_terminal() {
    let mut out = io::stdout();
    let _ = execute!(out, cursor::Show);
    for mode in [Mode::MouseCapture, Mode::AlternateScreen, Mode::Raw] {
        let _ = mode.disable(&mut out);
    }
    let _ = out.flush();
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

/// Restores the terminal and exits on SIGINT or SIGTERM.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("jw-signals".into())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    crate::warn!(signal, "terminated by signal");
                    restore_terminal();
                    std::process::exit(128 + signal);
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
