//! Hands signing requests to a browser wallet through a one-shot local web page.

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use colored::Colorize;
use parking_lot::Mutex;
use safe_multisig::{InteractiveSigner, SafeError, SignerResponse, SigningRequest};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const PAGE: &str = include_str!("page.html");
const REQUEST_PLACEHOLDER: &str = "__SIGNING_REQUEST__";

/// [`InteractiveSigner`] backed by whatever wallet extension the operator's browser has.
#[derive(Debug, Clone)]
pub struct BrowserSigner {
    port: u16,
    cancel: CancellationToken,
}

impl BrowserSigner {
    pub fn new(port: u16, cancel: CancellationToken) -> Self {
        Self { port, cancel }
    }
}

#[async_trait]
impl InteractiveSigner for BrowserSigner {
    async fn request(&self, request: SigningRequest) -> Result<SignerResponse, SafeError> {
        let session = SigningSession::bind(self.port, &request).await?;
        println!(
            "{}",
            format!("Open http://{} in a browser with your wallet installed", session.local_addr())
                .bright_cyan()
        );

        let raw = session.wait(self.cancel.clone()).await?;
        request.parse_response(&raw)
    }
}

/// What the page posts back once the wallet answered.
#[derive(Debug, Deserialize)]
struct PageResult {
    result: Option<String>,
    error: Option<String>,
}

struct PageState {
    page: String,
    served: AtomicBool,
    result: Mutex<Option<oneshot::Sender<PageResult>>>,
}

/// A local endpoint serving one signing page and accepting one result.
pub struct SigningSession {
    listener: TcpListener,
    state: Arc<PageState>,
    result: oneshot::Receiver<PageResult>,
}

impl SigningSession {
    /// Binds `127.0.0.1:port`. Port `0` picks a free one.
    pub async fn bind(port: u16, request: &SigningRequest) -> Result<Self, SafeError> {
        let json = request.to_json().map_err(|e| SafeError::Signer(e.to_string()))?;
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))
            .await
            .map_err(|e| SafeError::Signer(format!("failed to listen on port {port}: {e}")))?;

        let (tx, rx) = oneshot::channel();
        let state = Arc::new(PageState {
            page: render_page(&json.to_string()),
            served: AtomicBool::new(false),
            result: Mutex::new(Some(tx)),
        });

        Ok(Self { listener, state, result: rx })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr().unwrap_or_else(|_| (Ipv4Addr::LOCALHOST, 0).into())
    }

    /// Serves until the page reported a result or `cancel` fires, then shuts the endpoint down.
    pub async fn wait(self, cancel: CancellationToken) -> Result<String, SafeError> {
        let Self { listener, state, result } = self;

        let app = Router::new()
            .route("/", get(serve_page))
            .route("/result", post(receive_result))
            .with_state(state);

        let shutdown = cancel.child_token();
        let server =
            axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned());
        let server = tokio::spawn(async move { server.await });

        let outcome = tokio::select! {
            res = result => res.map_err(|_| SafeError::Signer("signing page went away".into())),
            _ = cancel.cancelled() => Err(SafeError::SigningCancelled),
        };

        shutdown.cancel();
        match server.await {
            Ok(Ok(())) => debug!("signing endpoint shut down"),
            Ok(Err(e)) => warn!(%e, "signing endpoint failed"),
            Err(e) => warn!(%e, "signing endpoint task failed"),
        }

        match outcome? {
            PageResult { result: Some(value), .. } => Ok(value),
            PageResult { error: Some(error), .. } => Err(SafeError::Signer(error)),
            PageResult { result: None, error: None } => {
                Err(SafeError::Signer("wallet returned nothing".into()))
            }
        }
    }
}

/// Embeds the request JSON into the page. `</` is escaped so the payload cannot close the
/// surrounding `<script>` element.
fn render_page(request_json: &str) -> String {
    PAGE.replace(REQUEST_PLACEHOLDER, &request_json.replace("</", "<\\/"))
}

async fn serve_page(State(state): State<Arc<PageState>>) -> Response {
    if state.served.swap(true, Ordering::SeqCst) {
        return (StatusCode::GONE, "this signing page was already opened").into_response();
    }
    debug!("serving signing page");
    Html(state.page.clone()).into_response()
}

async fn receive_result(
    State(state): State<Arc<PageState>>,
    Json(result): Json<PageResult>,
) -> StatusCode {
    match state.result.lock().take() {
        Some(sender) => {
            let _ = sender.send(result);
            StatusCode::OK
        }
        None => StatusCode::GONE,
    }
}
