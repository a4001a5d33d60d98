//! HTTP echo server
//!
//! Every request, whatever its method or path, is answered with its own
//! `full_path` and pretty-printed JSON body. In delayed mode the handler draws
//! one delay from the [`DelayGenerator`] and sleeps for it before responding;
//! in passthrough mode it responds immediately.

use crate::{
    delay::DelayGenerator,
    error::{AppError, Result},
    logging::{Logger, RequestLogger},
    models::Config,
    types::EchoMode,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    Router,
};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

/// Shared state handed to the echo handler
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<DelayGenerator>,
    pub mode: EchoMode,
    pub logger: RequestLogger,
}

impl AppState {
    pub fn new(generator: DelayGenerator, mode: EchoMode, logger: RequestLogger) -> Self {
        Self {
            generator: Arc::new(generator),
            mode,
            logger,
        }
    }

    /// Build the generator and mode described by `config`
    pub fn from_config(config: &Config, logger: RequestLogger) -> Result<Self> {
        let latency = config.latency_config()?;
        let generator = match config.seed {
            Some(seed) => DelayGenerator::seeded(latency, seed),
            None => DelayGenerator::with_thread_rng(latency),
        };

        Ok(Self::new(generator, config.echo_mode(), logger))
    }
}

/// Router answering every method and path with the echo handler
pub fn router(state: AppState) -> Router {
    Router::new().fallback(echo).with_state(state)
}

async fn echo(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> (StatusCode, String) {
    let started = Instant::now();
    let request_id = RequestLogger::new_request_id();
    let full_path = full_path(&uri);

    state.logger.log_request_received(&request_id, method.as_str(), &full_path).await;

    let response = echo_body(&full_path, &body);

    match state.mode {
        EchoMode::Delayed => {
            let sample = state.generator.generate();
            state.logger.log_delay(&request_id, sample, state.generator.config(), &response).await;
            tokio::time::sleep(sample.as_duration()).await;
        }
        EchoMode::Passthrough => state.logger.log_passthrough(&request_id).await,
    }

    state.logger.log_response_sent(&request_id, StatusCode::OK.as_u16(), started.elapsed()).await;

    (StatusCode::OK, response)
}

/// Path plus `?` and the query string; the `?` is present even when the query is empty
pub fn full_path(uri: &Uri) -> String {
    format!("{}?{}", uri.path(), uri.query().unwrap_or(""))
}

/// Response text: full path, pretty JSON body (`null` if absent or not JSON), trailing newline
pub fn echo_body(full_path: &str, body: &[u8]) -> String {
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(body).unwrap_or(Value::Null)
    };

    let pretty = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "null".to_string());
    format!("{}\n{}\n", full_path, pretty)
}

/// Bound echo server ready to accept connections
pub struct ReflectorServer {
    listener: TcpListener,
    state: AppState,
    local_addr: SocketAddr,
    logger: Logger,
}

impl ReflectorServer {
    /// Bind the listener; port 0 picks a free port
    pub async fn bind(addr: SocketAddr, state: AppState) -> Result<Self> {
        let logger = state.logger.logger().clone();
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                let error = AppError::server(format!("Failed to bind {}: {}", addr, e));
                logger.error("failed to bind listener")
                    .field("listen", addr.to_string())
                    .error_info(&error)
                    .log()
                    .await;
                return Err(error);
            }
        };
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            state,
            local_addr,
            logger,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until Ctrl-C
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; run until the process is killed
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` resolves; in-flight requests finish their delay first
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mode = match self.state.mode {
            EchoMode::Delayed => "delayed",
            EchoMode::Passthrough => "passthrough",
        };
        let latency = *self.state.generator.config();

        self.logger.info(&format!("listening on {}", self.local_addr))
            .field("mode", mode)
            .field("min_latency", latency.min_latency())
            .field("max_latency", latency.max_latency())
            .field("shape", latency.shape().name())
            .log()
            .await;

        if latency.was_inverted() {
            crate::log_warn!(self.logger, "latency range was inverted, serving {}..{}",
                latency.min_latency(), latency.max_latency());
        }

        let logger = self.logger;
        if let Err(e) = axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
        {
            let error = AppError::server(format!("HTTP server error: {}", e));
            crate::log_error!(logger, "{}", error);
            return Err(error);
        }

        crate::log_info!(logger, "server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::LatencyConfig;
    use crate::types::DistributionShape;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn quiet_logger() -> RequestLogger {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(crate::logging::LogLevel::Error);
        RequestLogger::from_logger(logger, false)
    }

    fn state(min: f64, max: f64, mode: EchoMode) -> AppState {
        let latency = LatencyConfig::new(min, max, DistributionShape::Uniform).unwrap();
        AppState::new(DelayGenerator::seeded(latency, 1), mode, quiet_logger())
    }

    async fn spawn(state: AppState) -> (SocketAddr, oneshot::Sender<()>, tokio::task::JoinHandle<Result<()>>) {
        let server = ReflectorServer::bind("127.0.0.1:0".parse().unwrap(), state).await.unwrap();
        let addr = server.local_addr();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_with_shutdown(async {
            let _ = rx.await;
        }));
        (addr, tx, handle)
    }

    #[tokio::test]
    async fn test_bind_to_taken_port_is_server_error() {
        let holder = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = holder.local_addr().unwrap();

        let result = ReflectorServer::bind(addr, state(0.0, 0.0, EchoMode::Delayed)).await;
        let error = match result {
            Ok(_) => panic!("bind to {} should fail while the port is held", addr),
            Err(error) => error,
        };

        assert!(matches!(error, AppError::Server(_)));
        assert_eq!(error.category(), "SERVER");
        assert!(error.to_string().contains("Failed to bind"));
    }

    #[tokio::test]
    async fn test_inverted_range_serves_and_stops() {
        let latency = LatencyConfig::new(0.02, 0.01, DistributionShape::Uniform).unwrap();
        assert!(latency.was_inverted());
        let state = AppState::new(DelayGenerator::seeded(latency, 9), EchoMode::Delayed, quiet_logger());
        let (addr, shutdown, handle) = spawn(state).await;

        let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
        assert_eq!(response.status(), 200);

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[test]
    fn test_full_path_always_has_question_mark() {
        let uri: Uri = "/health".parse().unwrap();
        assert_eq!(full_path(&uri), "/health?");

        let uri: Uri = "/health?id=3&x=y".parse().unwrap();
        assert_eq!(full_path(&uri), "/health?id=3&x=y");
    }

    #[test]
    fn test_echo_body_formats() {
        assert_eq!(echo_body("/a?", b""), "/a?\nnull\n");
        assert_eq!(echo_body("/a?", b"not json"), "/a?\nnull\n");
        assert_eq!(echo_body("/a?", b"[1]"), "/a?\n[\n  1\n]\n");
        assert_eq!(echo_body("/a?", br#"{"b":1,"a":{"c":true}}"#),
            "/a?\n{\n  \"b\": 1,\n  \"a\": {\n    \"c\": true\n  }\n}\n");
    }

    #[test]
    fn test_state_from_config() {
        let mut config = Config::default();
        config.min_latency = 2.0;
        config.max_latency = 1.0;
        config.passthrough = true;
        config.seed = Some(5);

        let state = AppState::from_config(&config, quiet_logger()).unwrap();
        assert_eq!(state.mode, EchoMode::Passthrough);
        assert_eq!(state.generator.config().min_latency(), 1.0);
        assert_eq!(state.generator.config().max_latency(), 2.0);
    }

    #[tokio::test]
    async fn test_echoes_path_and_body() {
        let (addr, shutdown, handle) = spawn(state(0.0, 0.0, EchoMode::Delayed)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/some/path?q=1", addr))
            .json(&serde_json::json!({"name": "reflector"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let text = response.text().await.unwrap();
        assert_eq!(text, "/some/path?q=1\n{\n  \"name\": \"reflector\"\n}\n");

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_any_method_is_echoed() {
        let (addr, shutdown, handle) = spawn(state(0.0, 0.0, EchoMode::Passthrough)).await;
        let client = reqwest::Client::new();

        for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE, reqwest::Method::PATCH] {
            let response = client.request(method, format!("http://{}/x", addr)).send().await.unwrap();
            assert_eq!(response.status(), 200);
            assert_eq!(response.text().await.unwrap(), "/x?\nnull\n");
        }

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let (addr, shutdown, handle) = spawn(state(0.2, 0.2, EchoMode::Delayed)).await;

        let started = Instant::now();
        let response = reqwest::get(format!("http://{}/health?id=1", addr)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(started.elapsed() >= Duration::from_millis(200));

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_passthrough_skips_delay() {
        let (addr, shutdown, handle) = spawn(state(5.0, 5.0, EchoMode::Passthrough)).await;

        let started = Instant::now();
        let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(started.elapsed() < Duration::from_secs(5));

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_delays_overlap_across_requests() {
        let (addr, shutdown, handle) = spawn(state(0.3, 0.3, EchoMode::Delayed)).await;

        let started = Instant::now();
        let requests: Vec<_> = (0..5)
            .map(|n| tokio::spawn(reqwest::get(format!("http://{}/health?id={}", addr, n))))
            .collect();
        for request in requests {
            assert_eq!(request.await.unwrap().unwrap().status(), 200);
        }

        // Five sequential delays would take 1.5s
        assert!(started.elapsed() < Duration::from_millis(1200));

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_server_error() {
        let (addr, shutdown, handle) = spawn(state(0.0, 0.0, EchoMode::Passthrough)).await;

        let err = ReflectorServer::bind(addr, state(0.0, 0.0, EchoMode::Passthrough)).await.err().unwrap();
        assert_eq!(err.category(), "SERVER");

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
