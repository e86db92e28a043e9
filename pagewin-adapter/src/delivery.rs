use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use crate::FetchResult;

/// Wakes the interaction thread after a result was posted (e.g. requests a repaint).
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Creates the channel carrying fetch results from workers to the interaction thread.
pub fn channel<T>(waker: Option<Waker>) -> (Poster<T>, Inbox<T>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let open = Arc::new(Mutex::new(true));
    (
        Poster {
            tx,
            waker,
            open: Arc::clone(&open),
        },
        Inbox { rx, open },
    )
}

/// Sending half, cloned into every fetch job.
pub struct Poster<T> {
    tx: Sender<FetchResult<T>>,
    waker: Option<Waker>,
    open: Arc<Mutex<bool>>,
}

impl<T> Clone for Poster<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
            open: Arc::clone(&self.open),
        }
    }
}

impl<T> Poster<T> {
    /// Hands `result` to the interaction thread.
    ///
    /// If the inbox was closed or dropped the result is handed back.
    pub fn post(&self, result: FetchResult<T>) -> Result<(), FetchResult<T>> {
        let open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if !*open {
            return Err(result);
        }
        self.tx.send(result).map_err(|e| e.into_inner())?;
        drop(open);
        if let Some(waker) = &self.waker {
            waker();
        }
        Ok(())
    }
}

/// Receiving half, owned by the adapter on the interaction thread.
pub struct Inbox<T> {
    rx: Receiver<FetchResult<T>>,
    open: Arc<Mutex<bool>>,
}

impl<T> Inbox<T> {
    /// Refuses every later post. Results posted before the call stay receivable, so draining
    /// afterwards sees all of them.
    pub fn close(&self) {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }

    pub fn try_recv(&self) -> Option<FetchResult<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks until a result arrives. `None` once every poster is gone.
    pub fn recv(&self) -> Option<FetchResult<T>> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchResult<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
