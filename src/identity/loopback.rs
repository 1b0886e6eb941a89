use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::error::IdentityError;

const DONE_PAGE: &str =
    "<html><body><p>Authentication complete. You can close this window.</p></body></html>";
const WAITING_PAGE: &str = "<html><body><p>Waiting for authentication...</p></body></html>";

/// Query parameters of the authorization redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationResponse {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl AuthorizationResponse {
    fn is_final(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }
}

/// One-shot HTTP listener on the loopback interface receiving the redirect.
pub struct LoopbackRedirect {
    listener: TcpListener,
    addr: SocketAddr,
}

impl LoopbackRedirect {
    /// Binds an ephemeral port on 127.0.0.1.
    pub async fn bind() -> Result<Self, IdentityError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| IdentityError::Callback(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| IdentityError::Callback(e.to_string()))?;
        Ok(Self { listener, addr })
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.addr.port())
    }

    /// Serves until a redirect carrying a code or an error arrives.
    /// Blocks as long as the user takes.
    pub async fn wait(self) -> Result<AuthorizationResponse, IdentityError> {
        let (tx, mut rx) = mpsc::channel::<AuthorizationResponse>(1);
        let received = Arc::new(Mutex::new(None));

        let app = Router::new()
            .route("/", get(handle_redirect))
            .with_state(tx);

        let shutdown = {
            let received = received.clone();
            async move {
                if let Some(response) = rx.recv().await {
                    *received.lock().await = Some(response);
                }
            }
        };

        debug!("waiting for authorization redirect on {}", self.addr);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| IdentityError::Callback(e.to_string()))?;

        let response = received.lock().await.take();
        response.ok_or_else(|| IdentityError::Callback("listener closed without a redirect".into()))
    }
}

async fn handle_redirect(
    State(tx): State<mpsc::Sender<AuthorizationResponse>>,
    Query(response): Query<AuthorizationResponse>,
) -> Html<&'static str> {
    if !response.is_final() {
        return Html(WAITING_PAGE);
    }
    let _ = tx.try_send(response);
    Html(DONE_PAGE)
}
