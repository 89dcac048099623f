//! Authentication gate for protected collections.
//!
//! The gate opens an external surface (a browser window, a helper process)
//! and polls it once per [`POLL_INTERVAL`] until it closes. Time is passed
//! in explicitly so the owner's event loop decides when to tick.

use std::fmt;
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

/// Cadence at which a pending surface is checked.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Name of the surface for one auth context, so distinct contexts don't collide.
pub fn auth_window_name(session_id: &str) -> String {
    format!("tuinav_auth_{session_id}")
}

/// What a poll of the external surface observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceStatus {
    Open,
    Closed,
    Unreachable,
}

/// A handle on an opened authentication surface.
pub trait AuthSurface {
    fn status(&mut self) -> SurfaceStatus;
}

/// Opens authentication surfaces. Returns `None` when the environment
/// refuses to open one.
pub trait AuthOpener {
    fn open(&mut self, url: &str, window_name: &str) -> Option<Box<dyn AuthSurface>>;
}

/// Cancellation token for a running poll. Cloning shares the token.
#[derive(Debug, Clone, Default)]
pub struct PollHandle {
    cancelled: Arc<AtomicBool>,
}

impl PollHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the poll. Calling it again is a no-op.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Showing the login affordance.
    Unauthenticated,
    /// Surface opened; waiting for it to close.
    PendingConfirmation,
    /// Surface closed; the user may reload. Terminal.
    Attempted,
}

/// Outcome of a poll tick, consumed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    AuthCompleted,
    /// The surface could not be reached. Polling stops and the gate stays
    /// in [`AuthState::PendingConfirmation`].
    AuthUnreachable,
}

/// State machine for one protected collection.
pub struct AuthGate {
    url: String,
    session_id: String,
    state: AuthState,
    surface: Option<Box<dyn AuthSurface>>,
    poll: Option<PollHandle>,
    next_poll: Option<Instant>,
    warning: Option<String>,
}

impl AuthGate {
    pub fn new(url: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session_id: session_id.into(),
            state: AuthState::Unauthenticated,
            surface: None,
            poll: None,
            next_poll: None,
            warning: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Warning recorded when the surface turned out to be unreachable.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_polling(&self) -> bool {
        self.next_poll.is_some() && self.poll.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    /// When the next poll is due, if one is scheduled.
    pub fn next_poll_due(&self) -> Option<Instant> {
        if self.is_polling() {
            self.next_poll
        } else {
            None
        }
    }

    /// Open the surface and begin polling.
    ///
    /// Only valid from `Unauthenticated`; returns `None` otherwise and
    /// leaves the gate untouched.
    pub fn start_auth(&mut self, opener: &mut dyn AuthOpener, now: Instant) -> Option<PollHandle> {
        if self.state != AuthState::Unauthenticated {
            return None;
        }
        let window_name = auth_window_name(&self.session_id);
        self.surface = opener.open(&self.url, &window_name);
        info!(
            url = %self.url,
            window = %window_name,
            opened = self.surface.is_some(),
            "authentication surface requested"
        );

        let handle = PollHandle::new();
        self.poll = Some(handle.clone());
        self.next_poll = Some(now + POLL_INTERVAL);
        self.state = AuthState::PendingConfirmation;
        Some(handle)
    }

    /// Poll the surface if a check is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Option<AuthEvent> {
        let due = self.next_poll_due()?;
        if now < due {
            return None;
        }
        self.next_poll = Some(now + POLL_INTERVAL);

        let status = match self.surface.as_mut() {
            Some(surface) => surface.status(),
            None => SurfaceStatus::Unreachable,
        };
        match status {
            SurfaceStatus::Open => None,
            SurfaceStatus::Unreachable => {
                warn!(url = %self.url, "unable to access authentication surface");
                self.warning = Some(format!("unable to access {}", self.url));
                self.cancel();
                Some(AuthEvent::AuthUnreachable)
            }
            SurfaceStatus::Closed => {
                info!(url = %self.url, "authentication surface closed");
                self.cancel();
                self.state = AuthState::Attempted;
                Some(AuthEvent::AuthCompleted)
            }
        }
    }

    /// Stop polling and release the surface. Safe to call any number of times.
    pub fn cancel(&mut self) {
        if let Some(handle) = &self.poll {
            handle.cancel();
        }
        self.next_poll = None;
        self.surface = None;
    }
}

impl Drop for AuthGate {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("url", &self.url)
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("has_surface", &self.surface.is_some())
            .field("next_poll", &self.next_poll)
            .field("warning", &self.warning)
            .finish()
    }
}

/// Opens surfaces by running a shell command with the URL as its argument;
/// the surface counts as closed once the process exits.
#[derive(Debug, Clone)]
pub struct ProcessOpener {
    command: String,
}

impl ProcessOpener {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The platform's URL opener.
    pub fn platform_default() -> Self {
        let command = if cfg!(target_os = "windows") {
            "start \"\""
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Self::new(command)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn spawn(&self, url: &str, window_name: &str) -> std::io::Result<Child> {
        let mut process = if cfg!(target_os = "windows") {
            let mut process = ProcessCommand::new("cmd");
            process.arg("/C").arg(format!("{} {}", self.command, url));
            process
        } else {
            let mut process = ProcessCommand::new("sh");
            process
                .arg("-c")
                .arg(format!("{} \"$1\"", self.command))
                .arg("tuinav")
                .arg(url);
            process
        };
        process
            .env("TUINAV_AUTH_WINDOW", window_name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}

impl AuthOpener for ProcessOpener {
    fn open(&mut self, url: &str, window_name: &str) -> Option<Box<dyn AuthSurface>> {
        match self.spawn(url, window_name) {
            Ok(child) => Some(Box::new(ProcessSurface { child })),
            Err(e) => {
                warn!(command = %self.command, error = %e, "failed to launch auth command");
                None
            }
        }
    }
}

struct ProcessSurface {
    child: Child,
}

impl AuthSurface for ProcessSurface {
    fn status(&mut self) -> SurfaceStatus {
        match self.child.try_wait() {
            Ok(Some(_)) => SurfaceStatus::Closed,
            Ok(None) => SurfaceStatus::Open,
            Err(_) => SurfaceStatus::Unreachable,
        }
    }
}

impl Drop for ProcessSurface {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            if let Err(e) = self.child.kill() {
                warn!(pid = self.child.id(), error = %e, "failed to stop auth command");
            }
            let _ = self.child.wait();
        }
    }
}
