use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Trailing-edge debouncer with a cancel-on-supersede contract: a new
/// trigger aborts the pending one, so the last trigger within a window
/// always wins and a superseded computation is never applied after a
/// newer one.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    pub async fn trigger<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let window = self.window;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            task.await;
        }));
    }
}
