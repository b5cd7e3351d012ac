//! Host output streams handed to drivers.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// A writer shared between the host and driver callbacks.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// The host's standard output and standard error.
///
/// Driver callbacks (server notices, notifications) may fire at any point
/// while a statement runs, so both streams are shared behind a mutex.
#[derive(Clone)]
pub struct OutputSinks {
    stdout: SharedWriter,
    stderr: SharedWriter,
}

impl OutputSinks {
    pub fn new(stdout: SharedWriter, stderr: SharedWriter) -> Self {
        Self { stdout, stderr }
    }

    /// Sinks bound to the process streams.
    pub fn stdio() -> Self {
        Self::new(
            Arc::new(Mutex::new(io::stdout())),
            Arc::new(Mutex::new(io::stderr())),
        )
    }

    pub fn stdout(&self) -> &SharedWriter {
        &self.stdout
    }

    pub fn stderr(&self) -> &SharedWriter {
        &self.stderr
    }

    /// Write `line` plus a newline to stdout.
    pub fn out_line(&self, line: &str) -> io::Result<()> {
        write_line(&self.stdout, line)
    }

    /// Write `line` plus a newline to stderr.
    pub fn err_line(&self, line: &str) -> io::Result<()> {
        write_line(&self.stderr, line)
    }
}

impl std::fmt::Debug for OutputSinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSinks").finish_non_exhaustive()
    }
}

fn write_line(w: &SharedWriter, line: &str) -> io::Result<()> {
    // A poisoned lock only means another writer panicked mid-line.
    let mut guard = match w.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    writeln!(guard, "{line}")?;
    guard.flush()
}

/// An in-memory writer whose contents can be read back, for capturing output.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let bytes = match self.bytes.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn shared(&self) -> SharedWriter {
        Arc::new(Mutex::new(self.clone()))
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.bytes.lock() {
            Ok(mut guard) => guard.extend_from_slice(buf),
            Err(poisoned) => poisoned.into_inner().extend_from_slice(buf),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl OutputSinks {
    /// Sinks that capture into a pair of buffers, returned as `(sinks, stdout, stderr)`.
    pub fn capture() -> (Self, CaptureBuffer, CaptureBuffer) {
        let out = CaptureBuffer::new();
        let err = CaptureBuffer::new();
        (Self::new(out.shared(), err.shared()), out, err)
    }
}
