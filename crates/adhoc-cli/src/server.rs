//! HTTP front end.
//!
//! Every request goes through one fallback handler that resolves the path
//! against a [`SortedFs`] and either streams a file, streams a directory
//! listing, or redirects. Store calls block, so they run on the blocking
//! pool and hand their output to the response body through a small bounded
//! channel; a slow client therefore stalls the reader instead of growing a
//! buffer.

use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::headers::{ByteRange, http_date, not_modified_since};
use crate::listing::{ListingFormat, ListingRenderer};
use adhoc_httpd_core::{DirEntry, FileHandle, FileSystem, ReadLimit, StorePath, Terminal};
use adhoc_httpd_files::LocalFs;
use adhoc_httpd_order::{SortedFs, SortedHandle};
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{
    ACCEPT, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, HeaderMap, HeaderValue,
    IF_MODIFIED_SINCE, LAST_MODIFIED, LOCATION, RANGE,
};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::Stream;
use futures_util::stream;
use std::future::Future;
use std::io::{self, Read, Seek, SeekFrom};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Entries requested from a directory per listing read.
pub const LISTING_BATCH: usize = 100;

/// Size of each file body chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Chunks buffered between a blocking reader and the response body.
const CHANNEL_DEPTH: usize = 4;

type Chunk = io::Result<Bytes>;

#[derive(Debug)]
struct AppState<S> {
    fs: SortedFs<S>,
    listing: ListingFormat,
}

/// Builds the request router over `fs`.
///
/// `listing` is the format used when a request does not ask for one.
pub fn router<S>(fs: SortedFs<S>, listing: ListingFormat) -> Router
where
    S: FileSystem + 'static,
    S::Handle: 'static,
{
    Router::new()
        .fallback(handle::<S>)
        .with_state(Arc::new(AppState { fs, listing }))
}

/// A bound, not yet running, static file server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    app: Router,
    root: PathBuf,
}

impl Server {
    /// Validates `config`, opens the root, and binds the listener.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the root cannot be opened, or
    /// the address cannot be bound.
    pub async fn bind(config: &ServerConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;

        let store = LocalFs::new(&config.root)
            .with_context(|| format!("cannot serve {}", config.root.display()))?;
        let root = store.root().to_path_buf();
        let app = router(SortedFs::new(store, config.order), config.listing);

        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        tracing::debug!(
            root = %root.display(),
            window = config.order.window_size,
            min_batch = config.order.min_batch_size,
            listing = %config.listing,
            "server bound"
        );

        Ok(Self {
            listener,
            app,
            root,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Canonical directory being served.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serves until the process is killed.
    pub async fn run(self) -> io::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` completes, then drains open connections.
    pub async fn run_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn handle<S>(
    State(state): State<Arc<AppState<S>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response
where
    S: FileSystem + 'static,
    S::Handle: 'static,
{
    tracing::debug!(%method, %uri, "request");
    match respond(&state, &method, &uri, &headers).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn respond<S>(
    state: &Arc<AppState<S>>,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, ServeError>
where
    S: FileSystem + 'static,
    S::Handle: 'static,
{
    if method != Method::GET && method != Method::HEAD {
        return Err(ServeError::MethodNotAllowed {
            method: method.to_string(),
        });
    }
    let head = method == Method::HEAD;

    let raw = uri.path();
    let decoded = urlencoding::decode(raw).map_err(|e| ServeError::BadRequest {
        reason: e.to_string(),
    })?;
    if decoded.ends_with("/index.html") {
        return redirect("./");
    }
    let path = StorePath::new(&*decoded)?;
    let wants_dir = decoded.ends_with('/');

    let handle = open(state, path.clone()).await?;
    let stat = handle.stat()?;

    if !handle.is_dir() {
        if wants_dir {
            return redirect(&with_query(raw.trim_end_matches('/'), uri.query()));
        }
        return serve_file(handle, &stat, headers, head);
    }

    if !wants_dir {
        return redirect(&with_query(&format!("{raw}/"), uri.query()));
    }

    match open(state, path.join("index.html")?).await {
        Ok(index) if !index.is_dir() => {
            let index_stat = index.stat()?;
            return serve_file(index, &index_stat, headers, head);
        }
        Ok(_) => {}
        Err(ServeError::Store(err)) if err.is_not_found() => {}
        Err(err) => return Err(err),
    }

    let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());
    let format = ListingFormat::negotiate(uri.query(), accept, state.listing);
    Ok(listing_response(handle, path, format, head))
}

async fn open<S>(
    state: &Arc<AppState<S>>,
    path: StorePath,
) -> Result<SortedHandle<S::Handle>, ServeError>
where
    S: FileSystem + 'static,
    S::Handle: 'static,
{
    let state = Arc::clone(state);
    let handle = tokio::task::spawn_blocking(move || state.fs.open(&path)).await??;
    Ok(handle)
}

fn with_query(path: &str, query: Option<&str>) -> String {
    query.map_or_else(|| path.to_string(), |query| format!("{path}?{query}"))
}

fn redirect(location: &str) -> Result<Response, ServeError> {
    let location = HeaderValue::from_str(location)?;
    Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response())
}

fn serve_file<H>(
    handle: H,
    stat: &DirEntry,
    request: &HeaderMap,
    head: bool,
) -> Result<Response, ServeError>
where
    H: Read + Seek + Send + 'static,
{
    let size = stat.size();
    let mut headers = HeaderMap::new();

    if let Some(modified) = stat.modified() {
        headers.insert(LAST_MODIFIED, HeaderValue::from_str(&http_date(modified))?);
        if let Some(since) = request.get(IF_MODIFIED_SINCE).and_then(|v| v.to_str().ok())
            && not_modified_since(modified, since)
        {
            return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
        }
    }

    let mime = mime_guess::from_path(stat.name()).first_or_octet_stream();
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(mime.as_ref())?);
    headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    let range = request
        .get(RANGE)
        .and_then(|v| v.to_str().ok())
        .map_or(ByteRange::Full, |v| ByteRange::parse(v, size));
    if let Some(content_range) = range.content_range(size) {
        headers.insert(CONTENT_RANGE, HeaderValue::from_str(&content_range)?);
    }

    let status = match range {
        ByteRange::Full => StatusCode::OK,
        ByteRange::Partial { .. } => StatusCode::PARTIAL_CONTENT,
        ByteRange::Unsatisfiable => {
            return Ok((StatusCode::RANGE_NOT_SATISFIABLE, headers).into_response());
        }
    };

    let length = range.byte_count(size);
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    if head {
        return Ok((status, headers).into_response());
    }

    let body = stream_file(handle, range.start(), length, stat.name().to_string());
    Ok((status, headers, body).into_response())
}

fn stream_file<H>(mut handle: H, start: u64, length: u64, name: String) -> Body
where
    H: Read + Seek + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_DEPTH);
    tokio::task::spawn_blocking(move || {
        if let Err(e) = handle.seek(SeekFrom::Start(start)) {
            tracing::warn!(file = %name, error = %e, "seek failed");
            let _ = tx.blocking_send(Err(e));
            return;
        }

        let mut remaining = length;
        while remaining > 0 {
            let want = usize::try_from(remaining).map_or(CHUNK_SIZE, |r| r.min(CHUNK_SIZE));
            let mut buf = vec![0_u8; want];
            match handle.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    buf.truncate(n);
                    remaining = remaining.saturating_sub(n as u64);
                    if tx.blocking_send(Ok(Bytes::from(buf))).is_err() {
                        tracing::debug!(file = %name, "client went away");
                        return;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "read failed");
                    let _ = tx.blocking_send(Err(e));
                    return;
                }
            }
        }
    });
    Body::from_stream(receiver_stream(rx))
}

fn listing_response<H>(handle: H, path: StorePath, format: ListingFormat, head: bool) -> Response
where
    H: FileHandle + 'static,
{
    let content_type = [(CONTENT_TYPE, HeaderValue::from_static(format.content_type()))];
    if head {
        return (StatusCode::OK, content_type).into_response();
    }

    let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_DEPTH);
    let renderer = ListingRenderer::new(format, path);
    tokio::task::spawn_blocking(move || write_listing(handle, renderer, &tx));
    (StatusCode::OK, content_type, Body::from_stream(receiver_stream(rx))).into_response()
}

/// Reads `handle` to the end in bounded batches, sending each rendered
/// chunk as soon as it is produced.
fn write_listing<H: FileHandle>(
    mut handle: H,
    mut renderer: ListingRenderer,
    tx: &mpsc::Sender<Chunk>,
) {
    let send = |text: String| tx.blocking_send(Ok(Bytes::from(text))).is_ok();

    if !send(renderer.header()) {
        return;
    }

    let error = loop {
        let batch = handle.read_entries(ReadLimit::at_most(LISTING_BATCH));
        if !batch.entries.is_empty() && !send(renderer.entries(&batch.entries)) {
            tracing::debug!(written = renderer.written(), "client went away mid-listing");
            return;
        }
        match batch.terminal {
            None => {}
            Some(Terminal::EndOfStream) => break None,
            Some(Terminal::Failed(err)) => {
                tracing::warn!(
                    error = %err,
                    written = renderer.written(),
                    "directory listing cut short"
                );
                break Some(err);
            }
        }
    };

    let _ = send(renderer.footer(error.as_ref()));
    tracing::debug!(written = renderer.written(), "listing complete");
}

fn receiver_stream(rx: mpsc::Receiver<Chunk>) -> impl Stream<Item = Chunk> + Send + 'static {
    stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|chunk| (chunk, rx)) })
}
