//! Printing of server notices and notifications.

use mogsql_core::OutputSinks;

use crate::connector::{Handlers, Notice, Notification};

/// Lines printed for a notice: the message, then the hint if there is one.
pub fn notice_lines(notice: &Notice) -> Vec<String> {
    let mut lines = vec![format!("{}:  {}", notice.severity, notice.message)];
    if let Some(hint) = notice.hint.as_deref().filter(|h| !h.is_empty()) {
        lines.push(format!("HINT:  {hint}"));
    }
    lines
}

pub fn notification_line(n: &Notification) -> String {
    let payload = if n.extra.is_empty() {
        String::new()
    } else {
        format!("with payload \"{}\" ", n.extra)
    };
    format!(
        "Asynchronous notification \"{}\" {}received from server process with PID {}.",
        n.channel, payload, n.be_pid
    )
}

/// Handlers that print notices to stderr and notifications to stdout.
pub fn printing(sinks: &OutputSinks) -> Handlers {
    let err = sinks.clone();
    let out = sinks.clone();
    Handlers::new()
        .on_notice(move |notice| {
            for line in notice_lines(notice) {
                if let Err(e) = err.err_line(&line) {
                    tracing::debug!(error = %e, "failed to print notice");
                }
            }
        })
        .on_notification(move |n| {
            if let Err(e) = out.out_line(&notification_line(n)) {
                tracing::debug!(error = %e, "failed to print notification");
            }
        })
}
