//! Terminal abstraction - viewport geometry, session lifecycle, and signals
//!
//! [`TerminalSession`] owns the raw-mode/alternate-screen state for the whole
//! process. Restoration is funneled through one function guarded by an
//! atomic flag, so it runs exactly once whether the session ends by drop,
//! by panic (via the panic hook), or by a termination signal.

use crate::error::{Result, ViewerError};
use crate::event::AppEvent;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::OnceLock;

/// Character-cell dimensions of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in columns
    pub cols: u16,
    /// Height in rows
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Viewport { cols, rows }
    }

    /// Query the current terminal size
    ///
    /// Always asks the terminal; callers re-query on every redraw instead of
    /// caching the result.
    pub fn query() -> Result<Self> {
        let (cols, rows) =
            crossterm::terminal::size().map_err(|source| ViewerError::TerminalQuery {
                action: "get terminal size",
                source,
            })?;

        if cols == 0 || rows == 0 {
            return Err(ViewerError::TerminalQuery {
                action: "get terminal size",
                source: io::Error::other(format!("terminal reported {}x{}", cols, rows)),
            });
        }

        Ok(Viewport { cols, rows })
    }

    /// Pixel rows available to an image: two per cell, minus one for the status line
    pub fn usable_pixel_height(&self) -> u32 {
        (2 * self.rows as u32).saturating_sub(1)
    }
}

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Raw mode plus alternate screen, held for the lifetime of the value
///
/// Only one session may exist per process. Dropping it (or calling
/// [`TerminalSession::leave`]) switches back to the normal screen and
/// restores the saved terminal attributes.
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Switch to the alternate screen and put input into raw mode
    pub fn enter() -> Result<Self> {
        if SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ViewerError::TerminalQuery {
                action: "start terminal session",
                source: io::Error::other("a terminal session is already active"),
            });
        }
        install_panic_hook();

        // Constructed before any mode change so a failure below still restores
        let session = TerminalSession { _private: () };

        crossterm::terminal::enable_raw_mode().map_err(|source| ViewerError::TerminalQuery {
            action: "enable raw mode",
            source,
        })?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide,
        )?;

        log::debug!("terminal session entered");
        Ok(session)
    }

    /// End the session now
    pub fn leave(self) {
        drop(self);
    }

    /// Whether a session currently holds the terminal
    pub fn is_active() -> bool {
        SESSION_ACTIVE.load(Ordering::SeqCst)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Restore the terminal if a session is active
///
/// Returns false when there was nothing to restore. Safe to call from any
/// exit path; only the first call after [`TerminalSession::enter`] acts.
pub fn restore_terminal() -> bool {
    if !SESSION_ACTIVE.swap(false, Ordering::SeqCst) {
        return false;
    }

    let mut stdout = io::stdout();
    let _ = crossterm::execute!(
        stdout,
        crossterm::style::ResetColor,
        crossterm::cursor::Show,
        crossterm::terminal::LeaveAlternateScreen,
    );
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();

    log::debug!("terminal session restored");
    true
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

/// Forwards resize and termination signals into the event channel
///
/// The handler itself never touches the screen; it only enqueues an
/// [`AppEvent`] for the thread that owns the gallery.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalListener {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalListener {
    pub fn spawn(events: Sender<AppEvent>) -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGWINCH};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGWINCH, SIGINT, SIGTERM, SIGHUP, SIGQUIT])
            .map_err(io::Error::other)?;
        let handle = signals.handle();

        let thread = std::thread::Builder::new()
            .name("sketch-signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    let event = if signal == SIGWINCH {
                        AppEvent::Resize
                    } else {
                        log::warn!("termination signal {} received", signal);
                        AppEvent::Terminate(signal)
                    };
                    if events.send(event).is_err() {
                        break;
                    }
                }
            })?;

        Ok(SignalListener {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalListener {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// No resize notifications off unix; redraws happen on input only
#[cfg(not(unix))]
#[derive(Debug)]
pub struct SignalListener;

#[cfg(not(unix))]
impl SignalListener {
    pub fn spawn(_events: Sender<AppEvent>) -> io::Result<Self> {
        log::debug!("no resize signal on this platform; the gallery redraws on key presses only");
        Ok(SignalListener)
    }
}
