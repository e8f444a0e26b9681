use crate::{
    core::config::FeedConfig,
    feeds::{
        boundaries::load_boundaries, fetch::FeedFetcher, seismic::load_seismic, FeedEvent,
    },
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Runs each feed download as its own task and hands the results to the
/// UI thread over a channel.
///
/// Every spawned download sends exactly one [`FeedEvent`], success or not.
pub struct FeedLoader {
    runtime: Handle,
    tx: Sender<FeedEvent>,
    rx: Receiver<FeedEvent>,
    outstanding: usize,
}

impl FeedLoader {
    pub fn new(runtime: Handle) -> Self {
        let (tx, rx) = unbounded();
        Self {
            runtime,
            tx,
            rx,
            outstanding: 0,
        }
    }

    /// Start both feeds; they complete in no particular order
    pub fn spawn_all(&mut self, fetcher: Arc<dyn FeedFetcher>, feeds: &FeedConfig) {
        self.spawn_seismic(fetcher.clone(), feeds.seismic_url.clone());
        self.spawn_boundaries(fetcher, feeds.boundary_url.clone());
    }

    pub fn spawn_seismic(&mut self, fetcher: Arc<dyn FeedFetcher>, url: String) {
        let tx = self.tx.clone();
        self.outstanding += 1;
        self.runtime.spawn(async move {
            let result = load_seismic(fetcher.as_ref(), &url).await;
            if let Err(e) = &result {
                log::error!("Earthquake feed {} failed: {}", url, e);
            }
            let _ = tx.send(FeedEvent::Seismic(result));
        });
    }

    pub fn spawn_boundaries(&mut self, fetcher: Arc<dyn FeedFetcher>, url: String) {
        let tx = self.tx.clone();
        self.outstanding += 1;
        self.runtime.spawn(async move {
            let result = load_boundaries(fetcher.as_ref(), &url).await;
            if let Err(e) = &result {
                log::error!("Plate boundary feed {} failed: {}", url, e);
            }
            let _ = tx.send(FeedEvent::Boundaries(result));
        });
    }

    /// Next finished download, if any, without blocking
    pub fn try_recv(&mut self) -> Option<FeedEvent> {
        let event = self.rx.try_recv().ok()?;
        self.outstanding = self.outstanding.saturating_sub(1);
        Some(event)
    }

    /// Every download that finished since the last call
    pub fn drain(&mut self) -> Vec<FeedEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Downloads started but not yet received
    pub fn pending(&self) -> usize {
        self.outstanding
    }
}

/// Fetch both feeds concurrently on the current task
pub async fn load_all(fetcher: &dyn FeedFetcher, feeds: &FeedConfig) -> (FeedEvent, FeedEvent) {
    let (seismic, boundaries) = futures::join!(
        load_seismic(fetcher, &feeds.seismic_url),
        load_boundaries(fetcher, &feeds.boundary_url)
    );
    (FeedEvent::Seismic(seismic), FeedEvent::Boundaries(boundaries))
}
