//! Background writer for session state.
//!
//! Transitions hand a snapshot of the history to the writer thread and
//! return immediately. Snapshots that queue up while a write is in flight
//! are coalesced: only the newest one reaches the store.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use easel_core::PersistenceError;

use crate::history::History;
use crate::session::SessionPersistence;

enum WriteRequest {
    Save(Box<History>),
    Flush(Sender<Option<PersistenceError>>),
}

/// Handle to the writer thread. Dropping it drains the queue and joins.
pub(crate) struct SessionWriter {
    sender: Option<Sender<WriteRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionWriter {
    pub(crate) fn spawn(persistence: SessionPersistence) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("easel-session-writer".to_string())
            .spawn(move || run(persistence, receiver))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queues `history` for writing. Returns `false` if the writer is gone.
    pub(crate) fn save(&self, history: &History) -> bool {
        match &self.sender {
            Some(sender) => sender
                .send(WriteRequest::Save(Box::new(history.clone())))
                .is_ok(),
            None => false,
        }
    }

    /// Waits until everything queued so far is written.
    ///
    /// Reports the first write failure since the previous flush.
    pub(crate) fn flush(&self) -> Result<(), PersistenceError> {
        let sender = self.sender.as_ref().ok_or(PersistenceError::WriterStopped)?;
        let (ack, done) = mpsc::channel();
        sender
            .send(WriteRequest::Flush(ack))
            .map_err(|_| PersistenceError::WriterStopped)?;

        match done.recv() {
            Ok(None) => Ok(()),
            Ok(Some(failure)) => Err(failure),
            Err(_) => Err(PersistenceError::WriterStopped),
        }
    }

    /// Writes whatever is queued and stops the thread.
    pub(crate) fn shutdown(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Session writer panicked");
            }
        }
    }
}

impl Drop for SessionWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(persistence: SessionPersistence, receiver: Receiver<WriteRequest>) {
    let mut failure = None;

    while let Ok(first) = receiver.recv() {
        let mut latest = None;
        let mut waiting = Vec::new();
        let mut next = Some(first);

        while let Some(request) = next {
            match request {
                WriteRequest::Save(history) => latest = Some(history),
                WriteRequest::Flush(ack) => waiting.push(ack),
            }
            next = receiver.try_recv().ok();
        }

        if let Some(history) = latest {
            if let Err(e) = persistence.save(&history) {
                tracing::warn!("Failed to persist session: {}", e);
                failure.get_or_insert(e);
            }
        }

        for ack in waiting {
            let _ = ack.send(failure.take());
        }
    }

    tracing::debug!("Session writer stopped");
}
