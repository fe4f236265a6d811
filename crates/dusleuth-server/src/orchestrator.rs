/// Per-request orchestration: acknowledge, race, apologise, finish.
///
/// Each request goes through the same sequence:
///
/// 1. The header fragment is written and flushed immediately.
/// 2. The walk starts on a background task (blocking pool for the
///    filesystem work).
/// 3. The request path races the walk-finished signal against the apology
///    timer. If the timer wins it writes the apology and then keeps
///    waiting for the walk, which is never interrupted.
/// 4. The request path hands the sink to the background task, which
///    writes the body and returns.
///
/// Writes are ordered by ownership rather than by a lock: the sink has
/// exactly one owner at any time and changes hands once, through a
/// `oneshot`, after the request path has finished its own writes. The
/// walk-finished signal is raised as soon as the report and chart payload
/// are computed, before the body is written.
///
/// A client that disconnects does not stop the walk; its result still lands
/// in the cache and the failed writes are only logged.
use crate::error::{Result, ServeError};
use crate::path::LogicalPath;
use crate::render::{self, BodyView};
use dusleuth_core::encode::{self, Chart};
use dusleuth_core::model::humanize_bytes;
use dusleuth_core::{Report, Walker};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

/// Output stream of one response.
pub trait ResponseSink: Send + 'static {
    fn write(&mut self, chunk: String) -> io::Result<()>;

    /// Push buffered output to the client. Sinks that never buffer keep
    /// the default.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink feeding a streaming HTTP body. Every chunk is forwarded as its own
/// frame, so there is nothing to flush.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResponseSink for ChannelSink {
    fn write(&mut self, chunk: String) -> io::Result<()> {
        self.tx
            .send(chunk)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "client disconnected"))
    }
}

/// What a request asks for.
#[derive(Debug, Clone, Default)]
pub struct InspectRequest {
    pub path: LogicalPath,
    pub chart: Chart,
}

/// Serves inspection requests for one base directory.
#[derive(Debug, Clone)]
pub struct Inspector {
    walker: Walker,
    base_path: PathBuf,
    apology_timeout: Duration,
}

impl Inspector {
    pub fn new(walker: Walker, base_path: impl Into<PathBuf>, apology_timeout: Duration) -> Self {
        Self {
            walker,
            base_path: base_path.into(),
            apology_timeout,
        }
    }

    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    /// Walk `path` on the blocking pool.
    pub async fn report(&self, path: &LogicalPath) -> Result<Arc<Report>> {
        let walker = self.walker.clone();
        let base = self.base_path.clone();
        let sub = path.relative();
        Ok(tokio::task::spawn_blocking(move || walker.walk(&base, &sub)).await?)
    }

    /// Nested tree of `path` as pretty JSON, for the non-streaming mode.
    pub async fn nested_json(&self, path: &LogicalPath) -> Result<String> {
        let report = self.report(path).await?;
        let tree = encode::nested(&report, &path.to_string());
        Ok(serde_json::to_string_pretty(&tree)?)
    }

    /// Serve one streamed request into `sink`.
    ///
    /// Returns once the body has been written (or has failed to be). Every
    /// error is logged here; the result is informational.
    pub async fn inspect<S: ResponseSink>(&self, request: InspectRequest, mut sink: S) -> Result<()> {
        let InspectRequest { path, chart } = request;
        debug!(path = %path, ?chart, "inspect request");

        if let Err(err) = write_fragment(&mut sink, render::header(&path)) {
            debug!(error = %err, "header write failed, client gone");
        }

        let (done_tx, mut done_rx) = oneshot::channel::<()>();
        let (sink_tx, sink_rx) = oneshot::channel::<S>();

        let inspector = self.clone();
        let task_path = path.clone();
        let task = tokio::spawn(async move {
            let report = match inspector.report(&task_path).await {
                Ok(report) => report,
                Err(err) => {
                    // Release the hand-off first so the request path keeps
                    // the sink and can report the failure.
                    drop(sink_rx);
                    drop(done_tx);
                    return Err(err);
                }
            };
            let chart = chart
                .encode(&report, &task_path.to_string())
                .map(|payload| serde_json::to_string(&payload))
                .transpose();
            let _ = done_tx.send(());

            let Ok(mut sink) = sink_rx.await else {
                return Ok(());
            };
            let chart = match chart {
                Ok(chart) => chart,
                Err(err) => {
                    let _ = write_fragment(&mut sink, render::server_error());
                    return Err(ServeError::Encoding(err));
                }
            };

            let rows = encode::rows(&report);
            let total = humanize_bytes(report.total());
            let body = render::body(&BodyView {
                path: &task_path,
                rows: &rows,
                total: &total,
                chart: chart.as_deref(),
            });
            write_fragment(&mut sink, body).map_err(ServeError::from)
        });

        tokio::select! {
            biased;
            _ = &mut done_rx => {}
            _ = tokio::time::sleep(self.apology_timeout) => {
                debug!(path = %path, timeout = ?self.apology_timeout, "walk is slow, apologising");
                if let Err(err) = write_fragment(&mut sink, render::apology()) {
                    debug!(error = %err, "apology write failed, client gone");
                }
                let _ = done_rx.await;
            }
        }

        let unclaimed = sink_tx.send(sink).err();
        let result = match task.await {
            Ok(result) => result,
            Err(join) => Err(ServeError::Task(join)),
        };

        match &result {
            Ok(()) => debug!(path = %path, "inspect finished"),
            Err(err) if err.is_disconnect() => {
                debug!(path = %path, error = %err, "client disconnected before the body was written")
            }
            Err(err) => {
                error!(path = %path, error = %err, "inspect failed");
                if let Some(mut sink) = unclaimed {
                    let _ = write_fragment(&mut sink, render::server_error());
                }
            }
        }
        result
    }
}

fn write_fragment<S: ResponseSink>(sink: &mut S, fragment: String) -> io::Result<()> {
    sink.write(fragment)?;
    sink.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dusleuth_core::{DirItem, DirReader, FsReader, SystemClock, TtlCache, WalkError};
    use std::fs;
    use std::path::Path;
    use std::sync::mpsc as std_mpsc;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Blocks the first listing until the test opens the gate.
    struct GatedReader {
        gate: Mutex<Option<std_mpsc::Receiver<()>>>,
    }

    impl GatedReader {
        fn new() -> (std_mpsc::Sender<()>, Self) {
            let (tx, rx) = std_mpsc::channel();
            let reader = Self {
                gate: Mutex::new(Some(rx)),
            };
            (tx, reader)
        }
    }

    impl DirReader for GatedReader {
        fn read_dir(&self, path: &Path) -> std::result::Result<Vec<DirItem>, WalkError> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.recv();
            }
            FsReader.read_dir(path)
        }
    }

    struct PanicReader;

    impl DirReader for PanicReader {
        fn read_dir(&self, _path: &Path) -> std::result::Result<Vec<DirItem>, WalkError> {
            panic!("disk on fire");
        }
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), [0u8; 2]).unwrap();
        fs::write(tmp.path().join("b"), [0u8; 3]).unwrap();
        fs::create_dir(tmp.path().join("c")).unwrap();
        fs::write(tmp.path().join("c").join("d"), [0u8; 4]).unwrap();
        fs::create_dir(tmp.path().join("emptyDir")).unwrap();
        tmp
    }

    fn inspector(reader: Arc<dyn DirReader>, base: &Path, apology: Duration) -> Inspector {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(30), Arc::new(SystemClock)));
        Inspector::new(Walker::new(reader, cache), base, apology)
    }

    #[tokio::test]
    async fn fast_walk_skips_apology() {
        let tmp = fixture();
        let inspector = inspector(Arc::new(FsReader), tmp.path(), Duration::from_secs(60));
        let (sink, mut rx) = ChannelSink::new();

        inspector
            .inspect(InspectRequest::default(), sink)
            .await
            .unwrap();

        let header = rx.recv().await.unwrap();
        assert!(header.contains("<h1>/</h1>"));
        let body = rx.recv().await.unwrap();
        assert!(body.contains("<p>Total: 9 B</p>"));
        assert!(rx.recv().await.is_none(), "no further fragments expected");
    }

    /// The apology must arrive after the header and strictly before the
    /// body, and the total must still be complete. Runs on paused time, so
    /// the timer fires exactly when the clock is moved past it.
    #[tokio::test(start_paused = true)]
    async fn slow_walk_apologises_before_body() {
        let tmp = fixture();
        let (gate, reader) = GatedReader::new();
        let timeout = Duration::from_secs(2);
        let inspector = inspector(Arc::new(reader), tmp.path(), timeout);
        let (sink, mut rx) = ChannelSink::new();

        let handle = tokio::spawn(async move {
            inspector.inspect(InspectRequest::default(), sink).await
        });

        let header = rx.recv().await.unwrap();
        assert!(header.contains("<h1>/</h1>"));

        tokio::time::advance(timeout - Duration::from_millis(1)).await;
        assert!(rx.try_recv().is_err(), "nothing is written before the timeout");

        tokio::time::advance(Duration::from_millis(1)).await;
        let apology = rx.recv().await.unwrap();
        assert!(apology.contains("Please wait"));

        gate.send(()).unwrap();
        let body = rx.recv().await.unwrap();
        assert!(body.contains("<p>Total: 9 B</p>"));
        assert!(body.contains("44.4%"));

        handle.await.unwrap().unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn chart_payload_is_embedded() {
        let tmp = fixture();
        let inspector = inspector(Arc::new(FsReader), tmp.path(), Duration::from_secs(60));
        let (sink, mut rx) = ChannelSink::new();
        let request = InspectRequest {
            path: LogicalPath::default(),
            chart: Chart::Flat,
        };

        inspector.inspect(request, sink).await.unwrap();

        let _header = rx.recv().await.unwrap();
        let body = rx.recv().await.unwrap();
        assert!(body.contains(r#""ids":["a","b","c","c/d","emptyDir"]"#));
        assert!(body.contains(r#""values":[2,3,0,4,0]"#));
    }

    /// A vanished client must not stop the walk: the result is cached and
    /// the failure is reported as a disconnect.
    #[tokio::test]
    async fn disconnected_client_still_populates_cache() {
        let tmp = fixture();
        let inspector = inspector(Arc::new(FsReader), tmp.path(), Duration::from_secs(60));
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        let err = inspector
            .inspect(InspectRequest::default(), sink)
            .await
            .unwrap_err();
        assert!(err.is_disconnect());
        assert!(!inspector.walker().cache().is_empty());
    }

    /// A crashed walk surfaces as a server error fragment after the header.
    #[tokio::test]
    async fn crashed_walk_reports_server_error() {
        let tmp = fixture();
        let inspector = inspector(Arc::new(PanicReader), tmp.path(), Duration::from_secs(60));
        let (sink, mut rx) = ChannelSink::new();

        let err = inspector
            .inspect(InspectRequest::default(), sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ServeError::Task(_)));

        let _header = rx.recv().await.unwrap();
        let error = rx.recv().await.unwrap();
        assert!(error.contains("Internal server error"));
    }

    #[tokio::test]
    async fn nested_json_names_root_after_path() {
        let tmp = fixture();
        let inspector = inspector(Arc::new(FsReader), tmp.path(), Duration::from_secs(60));

        let json = inspector
            .nested_json(&LogicalPath::parse(Some("/c")))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "name": "/c", "children": [ { "name": "d", "value": 4 } ] })
        );
    }
}
