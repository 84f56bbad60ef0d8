//! Background expiry sweeper: a dedicated thread running
//! [`CacheEngine::sweep_expired`] at a fixed interval, independent of access.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::engine::CacheEngine;

/// Owns the sweeper thread; dropping it stops the thread.
pub struct SweeperHandle {
    stop: Sender<()>,
    join: Option<JoinHandle<()>>,
}

/// Spawn a sweeper over `engine` at the configured interval.
pub fn spawn<T>(engine: Arc<CacheEngine<T>>) -> SweeperHandle
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let interval = Duration::from_secs(engine.config().sweep_interval_secs.max(1));
    let (stop, rx) = mpsc::channel::<()>();
    let join = std::thread::spawn(move || loop {
        match rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                debug!("cache sweeper stopping");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                engine.sweep_expired();
            }
        }
    });
    SweeperHandle {
        stop,
        join: Some(join),
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}
