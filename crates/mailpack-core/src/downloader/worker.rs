//! Background fetch-and-install with a progress queue.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use super::Downloader;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::transport::InboundTransport;
use crate::{MailpackError, Result};

/// One project to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub name: String,
    pub version: String,
}

impl InstallRequest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// What a finished install worker hands back: the downloader and the
/// batch result with its full error.
pub type InstallOutcome<T> = (Downloader<T>, Result<PathBuf>);

/// A running install batch.
///
/// Drain [`events`](InstallHandle::events) until a `Finished` or `Failed`
/// event arrives, then [`join`](InstallHandle::join) to get the downloader
/// back together with the typed result.
pub struct InstallHandle<T: InboundTransport> {
    events: Receiver<ProgressEvent>,
    handle: JoinHandle<InstallOutcome<T>>,
}

impl<T: InboundTransport> InstallHandle<T> {
    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> Result<InstallOutcome<T>> {
        self.handle
            .join()
            .map_err(|_| MailpackError::InvalidState("The install worker panicked.".to_string()))
    }
}

/// Fetch every requested project on a worker thread, then install them.
///
/// The downloader must already be logged in.
pub fn spawn_install<T>(
    mut downloader: Downloader<T>,
    requests: Vec<InstallRequest>,
    overwrite: bool,
) -> InstallHandle<T>
where
    T: InboundTransport + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded();

    let handle = thread::spawn(move || {
        let result = run_batch(&mut downloader, &requests, overwrite, &tx);
        let event = match &result {
            Ok(root) => ProgressEvent::Finished(root.clone()),
            Err(e) => {
                downloader.clear_pending();
                ProgressEvent::Failed(e.to_string())
            }
        };
        let _ = tx.send(event);
        (downloader, result)
    });

    InstallHandle { events: rx, handle }
}

fn run_batch<T: InboundTransport>(
    downloader: &mut Downloader<T>,
    requests: &[InstallRequest],
    overwrite: bool,
    tx: &Sender<ProgressEvent>,
) -> Result<PathBuf> {
    for request in requests {
        tx.report(format!("Downloading {} {}...", request.name, request.version));
        downloader.fetch(&request.name, &request.version)?;
    }
    tx.report("Download finished, installing...".to_string());
    downloader.install(overwrite, tx)
}
