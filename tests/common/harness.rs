//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use matchrate::embedding::{EncoderLoader, MockLoader, SbertLoader, StubEncoder};
use matchrate::gateway::{HandlerState, create_router_with_state};
use matchrate::service::SimilarityService;
use matchrate::Config;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub port: u16,
    /// Time the mock loader spends inside `load`.
    pub load_delay: Duration,
    pub fail_load: bool,
    /// Text the stub encoder refuses to encode.
    pub failing_text: Option<String>,
}

impl TestServerConfig {
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing_text = Some(text.into());
        self
    }
}

pub struct TestServer<L: EncoderLoader = MockLoader> {
    pub addr: SocketAddr,
    pub service: Arc<SimilarityService<L>>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl<L: EncoderLoader> TestServer<L> {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl<L: EncoderLoader> Drop for TestServer<L> {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server backed by [`MockLoader`]: no model files, deterministic
/// bag-of-words embeddings, and a load counter on `server.service.loader()`.
pub async fn spawn_test_server(
    config: TestServerConfig,
) -> Result<TestServer<MockLoader>, ServerStartupError> {
    let mut encoder = StubEncoder::default();
    if let Some(text) = config.failing_text.clone() {
        encoder = encoder.failing_on(text);
    }

    let loader = MockLoader::new()
        .with_encoder(encoder)
        .with_load_delay(config.load_delay);
    if config.fail_load {
        loader.set_failing(true);
    }

    spawn_server_with_loader(config.port, loader).await
}

/// Spawns a server with the production SBERT loader, configured from
/// `MATCHRATE_*` variables exactly as the binary would be.
pub async fn spawn_real_server(
    config: TestServerConfig,
) -> Result<TestServer<SbertLoader>, ServerStartupError> {
    let app_config =
        Config::from_env().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    app_config
        .validate()
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    spawn_server_with_loader(config.port, SbertLoader::new(app_config.sbert_config())).await
}

async fn spawn_server_with_loader<L: EncoderLoader>(
    port: u16,
    loader: L,
) -> Result<TestServer<L>, ServerStartupError> {
    let port = if port == 0 {
        find_available_port().await?
    } else {
        port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let service = Arc::new(SimilarityService::new(loader));
    let app = create_router_with_state(HandlerState::new(Arc::clone(&service)));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        service,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
