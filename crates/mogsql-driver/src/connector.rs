//! The seam between the driver and the wire client it wraps.
//!
//! The driver never speaks the protocol itself. A [`Connector`] turns a DSN
//! into a live [`Connection`] and delivers asynchronous server messages to
//! the [`Handlers`] it was given.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use mogsql_core::{Connection, Cx, Error, Outcome};

/// A notice (warning or informational message) sent by the server outside
/// of any result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    /// Severity as sent, e.g. `WARNING` or `NOTICE`
    pub severity: String,
    pub message: String,
    pub hint: Option<String>,
}

/// A `NOTIFY` delivered on a channel the session listens to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub channel: String,
    /// Payload; empty when none was sent
    pub extra: String,
    /// Process ID of the notifying backend
    pub be_pid: u32,
}

pub type NoticeHandler = Arc<dyn Fn(&Notice) + Send + Sync>;
pub type NotificationHandler = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Callbacks a connection invokes for asynchronous server messages.
#[derive(Clone, Default)]
pub struct Handlers {
    pub notice: Option<NoticeHandler>,
    pub notification: Option<NotificationHandler>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_notice(mut self, f: impl Fn(&Notice) + Send + Sync + 'static) -> Self {
        self.notice = Some(Arc::new(f));
        self
    }

    pub fn on_notification(mut self, f: impl Fn(&Notification) + Send + Sync + 'static) -> Self {
        self.notification = Some(Arc::new(f));
        self
    }

    pub fn notice(&self, notice: &Notice) {
        if let Some(f) = &self.notice {
            f(notice);
        }
    }

    pub fn notification(&self, notification: &Notification) {
        if let Some(f) = &self.notification {
            f(notification);
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("notice", &self.notice.is_some())
            .field("notification", &self.notification.is_some())
            .finish()
    }
}

/// Opens connections for a DSN.
///
/// Implementations report a server that refuses SSL as
/// `ConnectionErrorKind::SslNotSupported`, either from `connect` or from the
/// first round trip on the returned connection.
pub trait Connector: Send + Sync {
    type Conn: Connection + 'static;

    fn connect(
        &self,
        cx: &Cx,
        dsn: &str,
        handlers: Handlers,
    ) -> impl Future<Output = Outcome<Self::Conn, Error>> + Send;
}
