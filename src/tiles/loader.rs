use crate::{prelude::HashSet, MapError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use reqwest::Client;
use tokio::runtime::Handle;

/// Outcome of one tile download
#[derive(Debug)]
pub struct TileResult {
    pub url: String,
    pub data: Result<Vec<u8>>,
}

/// Fetches tiles on a tokio runtime and reports completed downloads over a
/// channel that the UI thread drains once per frame.
pub struct TileLoader {
    client: Client,
    runtime: Handle,
    tx: Sender<TileResult>,
    rx: Receiver<TileResult>,
    in_flight: HashSet<String>,
    failed: HashSet<String>,
}

impl TileLoader {
    pub fn new(client: Client, runtime: Handle) -> Self {
        let (tx, rx) = unbounded();
        Self {
            client,
            runtime,
            tx,
            rx,
            in_flight: HashSet::default(),
            failed: HashSet::default(),
        }
    }

    /// Start downloading `url` unless it is already pending or has failed
    /// before. Returns whether a new download was started.
    pub fn request(&mut self, url: &str) -> bool {
        if self.in_flight.contains(url) || self.failed.contains(url) {
            return false;
        }
        self.in_flight.insert(url.to_string());

        let client = self.client.clone();
        let tx = self.tx.clone();
        let url = url.to_string();
        self.runtime.spawn(async move {
            log::debug!("fetch tile {}", url);
            let data = download(&client, &url).await;
            if let Err(e) = &data {
                log::warn!("tile {} download failed: {}", url, e);
            }
            let _ = tx.send(TileResult { url, data });
        });
        true
    }

    /// Collect every download that finished since the last call
    pub fn drain(&mut self) -> Vec<TileResult> {
        let results: Vec<TileResult> = self.rx.try_iter().collect();
        for result in &results {
            self.in_flight.remove(&result.url);
            if result.data.is_err() {
                self.failed.insert(result.url.clone());
            }
        }
        results
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Allow previously failed URLs to be requested again
    pub fn forget_failures(&mut self) {
        if !self.failed.is_empty() {
            log::debug!("retrying {} failed tiles", self.failed.len());
            self.failed.clear();
        }
    }
}

async fn download(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(MapError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on port 9 locally; requests fail fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9/0/0/0.png";

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn wait_for_results(loader: &mut TileLoader) -> Vec<TileResult> {
        let mut results = Vec::new();
        for _ in 0..200 {
            results.extend(loader.drain());
            if !results.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(25));
        }
        results
    }

    #[test]
    fn test_failed_download_is_not_retried() {
        let runtime = runtime();
        let mut loader = TileLoader::new(Client::new(), runtime.handle().clone());

        assert!(loader.request(UNREACHABLE));
        assert!(!loader.request(UNREACHABLE), "duplicate request while in flight");

        let results = wait_for_results(&mut loader);
        assert_eq!(results.len(), 1);
        assert!(results[0].data.is_err());
        assert_eq!(loader.pending(), 0);
        assert!(!loader.request(UNREACHABLE), "failed tiles are not requested again");
    }

    #[test]
    fn test_forgotten_failures_are_requested_again() {
        let runtime = runtime();
        let mut loader = TileLoader::new(Client::new(), runtime.handle().clone());

        assert!(loader.request(UNREACHABLE));
        assert_eq!(wait_for_results(&mut loader).len(), 1);
        assert!(!loader.request(UNREACHABLE));

        loader.forget_failures();
        assert!(loader.request(UNREACHABLE));
        assert_eq!(loader.pending(), 1);
        assert_eq!(wait_for_results(&mut loader).len(), 1);
    }
}
