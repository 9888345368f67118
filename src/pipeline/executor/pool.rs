//! Bounded worker pool for asynchronous conversions.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};

use tracing::{debug, instrument};

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::conversions::{OutputImage, RawConverter};
use crate::pipeline::encode::{ContainerEncoder, ImageCrateEncoder};
use crate::pipeline::options::{ConversionOptions, OutputFormat};
use crate::pipeline::render::{RawLoaderEngine, RenderEngine};
use crate::pipeline::source::ConversionInput;

/// Asynchronous front-end over [`RawConverter`].
///
/// Submissions run on a bounded worker pool; a saturated pool queues new
/// work rather than rejecting it. In-flight conversions share nothing with
/// each other beyond that queue. There is no cancellation and no timeout:
/// dropping a [`ConversionHandle`] abandons the result, it does not stop
/// the work.
pub struct AsyncRawConverter<R, E>
where
    R: RenderEngine + Send + Sync + 'static,
    E: ContainerEncoder + Send + Sync + 'static,
{
    converter: Arc<RawConverter<R, E>>,
    pool: rayon::ThreadPool,
}

impl AsyncRawConverter<RawLoaderEngine, ImageCrateEncoder> {
    /// Default engine and encoder, one worker per available core.
    pub fn new() -> Result<Self> {
        Self::with_converter(RawConverter::new(), default_worker_count())
    }
}

impl<R, E> AsyncRawConverter<R, E>
where
    R: RenderEngine + Send + Sync + 'static,
    E: ContainerEncoder + Send + Sync + 'static,
{
    pub fn with_converter(converter: RawConverter<R, E>, workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("rawbridge-worker-{i}"))
            .build()
            .map_err(|e| ConvertError::Io(std::io::Error::other(e)))?;
        Ok(Self {
            converter: Arc::new(converter),
            pool,
        })
    }

    /// Submits a conversion without blocking the caller.
    ///
    /// Validation runs synchronously: a malformed request returns `Err`
    /// here and never reaches the pool. The input is copied into an owned
    /// value before the hand-off, because the caller's borrow is not
    /// guaranteed to outlive the worker.
    #[instrument(skip(self, input, options))]
    pub fn convert_async(
        &self,
        input: ConversionInput<'_>,
        format: OutputFormat,
        options: &ConversionOptions,
    ) -> Result<ConversionHandle> {
        self.converter.validate(&input, options)?;

        let owned_input = input.to_owned_input();
        let options = options.clone();
        let converter = Arc::clone(&self.converter);
        let (tx, rx) = channel();

        debug!("queueing conversion on worker pool");
        self.pool.spawn(move || {
            let result = converter.convert(owned_input.as_input(), format, &options);
            // the handle may already be gone; an abandoned result is fine
            let _ = tx.send(result);
        });

        Ok(ConversionHandle { rx })
    }

    /// String-and-bag variant of [`convert_async`](Self::convert_async).
    /// Format and option errors are returned synchronously.
    pub fn convert_raw_async(
        &self,
        input: ConversionInput<'_>,
        output_format: &str,
        options: Option<&serde_json::Value>,
    ) -> Result<ConversionHandle> {
        let format = OutputFormat::parse(output_format)?;
        let options = ConversionOptions::from_json(options)?;
        self.convert_async(input, format, &options)
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}

/// One pending conversion. Exactly one result or error is delivered for
/// each submission; consuming the handle with [`wait`](Self::wait) is the
/// usual way to take it.
#[derive(Debug)]
pub struct ConversionHandle {
    rx: Receiver<Result<OutputImage>>,
}

impl ConversionHandle {
    /// Blocks until the worker delivers the result.
    pub fn wait(self) -> Result<OutputImage> {
        match self.rx.recv() {
            Ok(result) => result,
            Err(_) => Err(ConvertError::WorkerDisconnected),
        }
    }

    /// Non-blocking poll. `None` while the conversion is still queued or
    /// executing; the result is handed out at most once.
    pub fn try_wait(&self) -> Option<Result<OutputImage>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ConvertError::WorkerDisconnected)),
        }
    }
}
