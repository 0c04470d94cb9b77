use std::sync::Arc;

use thiserror::Error;

use crate::response::panic_message;
use crate::vision::frame::Frame;
use crate::vision::landmarks::{LandmarkError, LandmarkSet, LandmarkSource};

type BoxedSource = Box<dyn LandmarkSource>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("landmark pool is closed")]
    Closed,
    #[error("landmark extraction panicked: {0}")]
    Panicked(String),
    #[error("landmark extraction task failed: {0}")]
    Join(String),
    #[error(transparent)]
    Landmark(#[from] LandmarkError),
}

/// Fixed set of independently-initialized landmark sources.
///
/// Each source serves one request at a time; with a single source every
/// inference call is serialized. Inference runs on the blocking thread pool.
pub struct LandmarkPool {
    idle_tx: flume::Sender<BoxedSource>,
    idle_rx: flume::Receiver<BoxedSource>,
    size: usize,
}

/// Returns the source to the pool when dropped, including during unwinding.
struct Lease {
    source: Option<BoxedSource>,
    home: flume::Sender<BoxedSource>,
}

impl Lease {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, LandmarkError> {
        match self.source.as_mut() {
            Some(source) => source.detect(frame),
            None => Err(LandmarkError::Output("lease holds no source".to_string())),
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if let Some(source) = self.source.take() {
            if self.home.send(source).is_err() {
                tracing::warn!("Landmark pool dropped before source was returned");
            }
        }
    }
}

impl LandmarkPool {
    pub fn new(sources: Vec<BoxedSource>) -> Self {
        let (idle_tx, idle_rx) = flume::unbounded();
        let size = sources.len();
        for source in sources {
            // 接收端由 pool 自身持有，send 不会失败
            let _ = idle_tx.send(source);
        }
        Self {
            idle_tx,
            idle_rx,
            size,
        }
    }

    pub fn single(source: impl LandmarkSource + 'static) -> Self {
        Self::new(vec![Box::new(source)])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of sources not currently leased.
    pub fn idle(&self) -> usize {
        self.idle_rx.len()
    }

    pub async fn detect(&self, frame: Arc<Frame>) -> Result<Vec<LandmarkSet>, PoolError> {
        let source = self
            .idle_rx
            .recv_async()
            .await
            .map_err(|_| PoolError::Closed)?;
        let mut lease = Lease {
            source: Some(source),
            home: self.idle_tx.clone(),
        };

        let task = tokio::task::spawn_blocking(move || {
            let span = tracing::debug_span!("landmarks", width = frame.width(), height = frame.height());
            let _guard = span.enter();
            let start = std::time::Instant::now();
            let faces = lease.detect(&frame);
            tracing::debug!(latency_ms = %start.elapsed().as_millis(), "Landmark inference finished");
            faces
        });

        match task.await {
            Ok(faces) => Ok(faces?),
            Err(e) if e.is_panic() => Err(PoolError::Panicked(panic_message(e.into_panic().as_ref()))),
            Err(e) => Err(PoolError::Join(e.to_string())),
        }
    }
}
