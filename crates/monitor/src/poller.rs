use chrono::Utc;
use dash_config::OverlapPolicy;
use dash_core::event::{Message, PollData, PollResult, PollSource};
use dash_core::Result;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Hands out request sequence numbers shared by every poll task.
///
/// Numbers start at 1 and strictly increase, so a result can be compared
/// with the last one applied for its source even across task generations.
#[derive(Debug, Clone, Default)]
pub struct SequenceGen(Arc<AtomicU64>);

impl SequenceGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A background task polling one source.
///
/// Each cycle awaits its request before the next tick is taken, so at most
/// one request per source is in flight. The task stops on [`cancel`] or
/// when the handle is dropped, and on its own once the event bus closes.
///
/// [`cancel`]: PollTask::cancel
#[derive(Debug)]
pub struct PollTask {
    source: PollSource,
    task:   JoinHandle<()>,
}

impl PollTask {
    /// Poll `fetch` every `every`, starting immediately.
    pub fn spawn<F, Fut>(
        source: PollSource,
        every: Duration,
        overlap: OverlapPolicy,
        seq: SequenceGen,
        tx: mpsc::Sender<Message>,
        fetch: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<PollData>> + Send + 'static,
    {
        let name = source.clone();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(match overlap {
                OverlapPolicy::Skip  => MissedTickBehavior::Skip,
                OverlapPolicy::Queue => MissedTickBehavior::Burst,
            });

            loop {
                ticker.tick().await;
                let n = seq.next();
                if !poll_cycle(&name, n, &tx, fetch()).await {
                    break;
                }
            }
            debug!("Poll task for {name} stopped");
        });

        Self { source, task }
    }

    /// Fetch `fetch` a single time, then finish.
    pub fn once<F, Fut>(source: PollSource, seq: SequenceGen, tx: mpsc::Sender<Message>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<PollData>> + Send + 'static,
    {
        let name = source.clone();
        let task = tokio::spawn(async move {
            poll_cycle(&name, seq.next(), &tx, fetch()).await;
        });

        Self { source, task }
    }

    pub fn source(&self) -> &PollSource {
        &self.source
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Await one request and forward the outcome. Returns `false` once the bus is closed.
async fn poll_cycle<Fut>(source: &PollSource, seq: u64, tx: &mpsc::Sender<Message>, request: Fut) -> bool
where
    Fut: Future<Output = Result<PollData>>,
{
    let message = match request.await {
        Ok(data) => Message::Polled(PollResult {
            source: source.clone(),
            seq,
            at: Utc::now(),
            data,
        }),
        Err(e) => {
            warn!("Polling {source} failed: {e}");
            Message::PollFailed {
                source: source.clone(),
                seq,
                error: e.to_string(),
            }
        }
    };
    tx.send(message).await.is_ok()
}
