//! Background `cf logs` tail owned by an app handle.
//!
//! The child's stdout is pumped into a [`SharedBuffer`] for later inspection
//! and its stderr into the cluster's [`OutputSink`]. [`LogTail::stop`] kills
//! the child, reaps it and joins the pump task. Dropping a `LogTail` without
//! stopping it still kills the child (`kill_on_drop`).

use std::io::ErrorKind;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;

use crate::output::{OutputSink, SharedBuffer};

#[derive(Debug)]
pub struct LogTail {
    child: Child,
    pump: JoinHandle<()>,
}

impl LogTail {
    /// Take ownership of a spawned `cf logs` child and start pumping its
    /// output. Must be called from within a tokio runtime.
    pub fn attach(mut child: Child, buffer: SharedBuffer, sink: OutputSink) -> Self {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let pump = tokio::spawn(async move {
            tokio::join!(
                pump(stdout, |chunk| buffer.append(chunk)),
                pump(stderr, |chunk| sink.write_bytes(chunk)),
            );
        });
        Self { child, pump }
    }

    /// OS process id, `None` once the child has been reaped.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Kill the child and wait for the pump to drain.
    ///
    /// A child that already exited on its own is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be delivered to a child
    /// that is still running.
    pub async fn stop(mut self) -> Result<()> {
        let exited = self
            .child
            .try_wait()
            .context("cannot poll cf logs")?
            .is_some();
        if exited {
            tracing::debug!("cf logs had already exited");
        } else {
            match self.child.start_kill() {
                Ok(()) => {}
                // Raced with the child exiting between try_wait and kill.
                Err(e) if e.kind() == ErrorKind::InvalidInput => {}
                Err(e) => return Err(e).context("cannot kill cf logs"),
            }
        }
        if let Err(e) = self.child.wait().await {
            tracing::warn!(error = %e, "cannot reap cf logs");
        }
        if let Err(e) = self.pump.await {
            tracing::warn!(error = %e, "cf logs pump task failed");
        }
        Ok(())
    }
}

async fn pump(reader: Option<impl AsyncRead + Unpin>, mut write: impl FnMut(&[u8])) {
    let Some(mut reader) = reader else {
        return;
    };
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => write(&chunk[..n]),
            Err(e) => {
                tracing::warn!(error = %e, "cf logs stream closed");
                break;
            }
        }
    }
}
