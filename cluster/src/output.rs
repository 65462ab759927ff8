//! Where captured `cf` output goes.
//!
//! `OutputSink` receives the stdout/stderr of every `cf` command the harness
//! runs, mirroring what a developer would see in a terminal. `SharedBuffer`
//! is an in-memory writer used for the `cf logs` tail and for tests that
//! assert on captured output.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable, thread-safe destination for captured command output.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Forward everything to the process stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Discard everything.
    #[must_use]
    pub fn discard() -> Self {
        Self::new(io::sink())
    }

    /// Write `bytes` to the sink. Write errors are logged, never returned.
    pub fn write_bytes(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writer.write_all(bytes).and_then(|()| writer.flush()) {
            tracing::warn!(error = %e, "failed to write command output to sink");
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

/// Growable in-memory byte buffer shared between a writer and its readers.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, chunk: &[u8]) {
        self.lock().extend_from_slice(chunk);
    }

    /// Lossy UTF-8 snapshot of everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
