// 6.0: scheduler. one background thread ticking the feed manager at the
// configured cadence. ticks that land while a refresh is in flight are
// dropped, not queued, so refreshes never overlap.

use crate::feed::FeedManager;
use crate::types::Timestamp;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

pub struct SchedulerHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

// Spawns the tick loop. The feed manager sits behind a mutex because hosts
// may trigger out-of-band refreshes or reads on it between ticks.
pub fn spawn(feed: Arc<Mutex<FeedManager>>, interval: Duration) -> SchedulerHandle {
    let (stop_tx, stop_rx) = bounded(1);
    let thread = thread::spawn(move || run_loop(feed, interval, stop_rx));
    SchedulerHandle {
        stop_tx,
        thread: Some(thread),
    }
}

fn run_loop(feed: Arc<Mutex<FeedManager>>, interval: Duration, stop_rx: Receiver<()>) {
    {
        let mut feed = feed.lock();
        if let Err(err) = feed.bootstrap(Timestamp::now()) {
            warn!(%err, "initial feed bootstrap failed");
        }
    }

    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                {
                    let mut feed = feed.lock();
                    match feed.refresh(Timestamp::now()) {
                        Ok(inserted) => debug!(inserted, "scheduled refresh complete"),
                        Err(err) => warn!(%err, "scheduled refresh failed, cache unchanged"),
                    }
                }
                // a refresh that ran long may have left ticks queued. skip
                // them so firings are dropped rather than bursted.
                while ticker.try_recv().is_ok() {}
            }
            recv(stop_rx) -> _ => break,
        }
    }
}

impl SchedulerHandle {
    pub fn stop(mut self) {
        self.stop_inner();
    }

    fn stop_inner(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.stop_tx.send(());
            let _ = thread.join();
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop_inner();
    }
}
