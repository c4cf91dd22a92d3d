use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
#[cfg(test)]
use std::time::Duration;

use crate::app::Message;

/// Sending half handed to a background job.
#[derive(Debug, Clone)]
pub(super) struct TaskSender {
    inner: Sender<Message>,
}

impl TaskSender {
    /// Post a completion. Returns `false` once the event loop is gone.
    pub(super) fn send(&self, msg: Message) -> bool {
        if self.inner.send(msg).is_ok() {
            return true;
        }
        tracing::debug!("event loop gone; dropping completion");
        false
    }
}

/// Runs collaborator calls off the UI thread and collects their completions.
#[derive(Debug)]
pub(super) struct TaskRunner {
    sender: Sender<Message>,
    receiver: Receiver<Message>,
}

impl TaskRunner {
    pub(super) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Run `job` on a named worker thread.
    pub(super) fn spawn<F>(&self, name: &str, job: F)
    where
        F: FnOnce(&TaskSender) + Send + 'static,
    {
        let tx = TaskSender {
            inner: self.sender.clone(),
        };
        let spawned = thread::Builder::new()
            .name(format!("pagewise-{name}"))
            .spawn(move || job(&tx));
        if let Err(err) = spawned {
            tracing::error!(task = name, %err, "failed to spawn worker thread");
            crate::perf::log_event("task.spawn.error", format!("task={name} err={err}"));
        }
    }

    /// Queue a message for the next loop iteration.
    pub(super) fn post(&self, msg: Message) {
        if self.sender.send(msg).is_err() {
            tracing::debug!("task channel closed; dropping message");
        }
    }

    pub(super) fn try_recv(&self) -> Option<Message> {
        match self.receiver.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    #[cfg(test)]
    pub(super) fn recv_timeout(&self, timeout: Duration) -> Option<Message> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}
