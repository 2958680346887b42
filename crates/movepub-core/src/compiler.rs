//! Remote compiler client.
//!
//! One JSON POST per compile, no retries. While a request is in flight the
//! shared [`BusyFlag`] is raised; it is lowered when the request settles,
//! whatever the outcome.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_net::http::Request;
use tracing::{debug, error, info};

use crate::config::compile_endpoint;
use crate::error::CompileError;
use crate::models::{AddressTarget, CompileRequest, CompileResult};

// =============================================================================
// Busy Flag
// =============================================================================

type BusyListener = Box<dyn Fn(bool)>;

#[derive(Default)]
struct BusyInner {
    busy: Cell<bool>,
    listener: RefCell<Option<BusyListener>>,
}

/// Observable in-flight flag.
///
/// Raised and lowered only by the core; the presentation layer reads it or
/// subscribes with [`BusyFlag::on_change`].
#[derive(Clone, Default)]
pub struct BusyFlag {
    inner: Rc<BusyInner>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.get()
    }

    /// Register the single listener notified on every transition.
    pub fn on_change(&self, listener: impl Fn(bool) + 'static) {
        *self.inner.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Raise the flag. `None` if it is already raised.
    pub(crate) fn enter(&self) -> Option<BusyGuard> {
        if self.is_busy() {
            return None;
        }
        self.set(true);
        Some(BusyGuard { flag: self.clone() })
    }

    fn set(&self, busy: bool) {
        self.inner.busy.set(busy);
        if let Some(listener) = self.inner.listener.borrow().as_ref() {
            listener(busy);
        }
    }
}

/// Lowers the flag when dropped.
pub(crate) struct BusyGuard {
    flag: BusyFlag,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Sends a JSON body and returns the response text.
#[allow(async_fn_in_trait)]
pub trait CompileTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<String, CompileError>;
}

/// Browser `fetch` transport.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpTransport;

impl CompileTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<String, CompileError> {
        let response = Request::post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| CompileError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| CompileError::Network(e.to_string()))?;

        let status = response.status();
        match response.text().await {
            Ok(text) => classify(status, text),
            // An unreadable error body still reports the status.
            Err(_) if !response.ok() => classify(status, String::new()),
            Err(e) => Err(CompileError::Network(e.to_string())),
        }
    }
}

/// Longest compiler diagnostic carried in [`CompileError::Http`].
const MAX_ERROR_BODY_CHARS: usize = 1_000;

/// Map a compiler response to its body, or to [`CompileError::Http`]
/// carrying the compiler's own message for non-2xx statuses.
pub(crate) fn classify(status: u16, body: String) -> Result<String, CompileError> {
    if (200..=299).contains(&status) {
        return Ok(body);
    }
    let trimmed = body.trim();
    let body = match trimmed.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    };
    Err(CompileError::Http { status, body })
}

// =============================================================================
// Client
// =============================================================================

/// Client for the compile endpoint.
pub struct CompilerClient<T> {
    transport: T,
    endpoint: String,
    busy: BusyFlag,
}

impl<T: CompileTransport> CompilerClient<T> {
    /// Client for the configured endpoint with its own busy flag.
    pub fn new(transport: T) -> Self {
        Self::with_endpoint(transport, compile_endpoint())
    }

    pub fn with_endpoint(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            busy: BusyFlag::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn busy(&self) -> &BusyFlag {
        &self.busy
    }

    /// Send `request` and parse the compiler output.
    ///
    /// Fails with [`CompileError::Busy`] if another request holds the flag.
    pub async fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError> {
        let Some(_guard) = self.busy.enter() else {
            return Err(CompileError::Busy);
        };

        let outcome = self.send(request).await;
        match &outcome {
            Ok(_) => info!(endpoint = %self.endpoint, "compile succeeded"),
            Err(e) => error!(endpoint = %self.endpoint, error = %e, "compile request failed"),
        }
        outcome
    }

    async fn send(&self, request: &CompileRequest) -> Result<CompileResult, CompileError> {
        let body =
            serde_json::to_string(request).map_err(|e| CompileError::Encode(e.to_string()))?;
        debug!(
            files = request.bundle.files.len(),
            sender_mode = matches!(request.target, AddressTarget::SenderAddress(_)),
            bytes = body.len(),
            "sending compile request"
        );
        let text = self.transport.post_json(&self.endpoint, body).await?;
        CompileResult::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NamedAddresses, ProjectBundle, build_compile_request};

    /// Transport that records the request and replays a canned response.
    struct CannedTransport {
        response: Result<String, CompileError>,
        seen: RefCell<Vec<(String, String)>>,
        observed_busy: RefCell<Option<BusyFlag>>,
        busy_during_call: Cell<bool>,
    }

    impl CannedTransport {
        fn new(response: Result<&str, CompileError>) -> Self {
            Self {
                response: response.map(str::to_string),
                seen: RefCell::default(),
                observed_busy: RefCell::default(),
                busy_during_call: Cell::new(false),
            }
        }
    }

    impl CompileTransport for &CannedTransport {
        async fn post_json(&self, url: &str, body: String) -> Result<String, CompileError> {
            if let Some(flag) = self.observed_busy.borrow().as_ref() {
                self.busy_during_call.set(flag.is_busy());
            }
            self.seen.borrow_mut().push((url.to_string(), body));
            self.response.clone()
        }
    }

    fn request() -> CompileRequest {
        build_compile_request(
            &ProjectBundle::default(),
            AddressTarget::NamedAddresses(NamedAddresses::default()),
        )
    }

    #[tokio::test]
    async fn test_compile_success() {
        let transport = CannedTransport::new(Ok(r#"{"metadataBytes":"0x1234","byteCode":["0xabcd"]}"#));
        let client = CompilerClient::with_endpoint(&transport, "http://compiler.test/compile");
        *transport.observed_busy.borrow_mut() = Some(client.busy().clone());

        let result = client.compile(&request()).await.unwrap();
        assert_eq!(result.metadata_bytes(), Some("0x1234"));
        assert!(transport.busy_during_call.get());
        assert!(!client.busy().is_busy());

        let seen = transport.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "http://compiler.test/compile");
        assert_eq!(
            seen[0].1,
            r#"{"files":[],"toml":{"content":""},"namedAddresses":{}}"#
        );
    }

    #[tokio::test]
    async fn test_http_error_clears_busy() {
        let transport = CannedTransport::new(Err(CompileError::Http {
            status: 500,
            body: String::new(),
        }));
        let client = CompilerClient::with_endpoint(&transport, "http://compiler.test/compile");
        let err = client.compile(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error 500");
        assert!(!client.busy().is_busy());
    }

    #[test]
    fn test_classify_success_passes_body_through() {
        assert_eq!(classify(200, "{}".to_string()), Ok("{}".to_string()));
    }

    #[test]
    fn test_classify_keeps_compiler_diagnostic() {
        let body = "  {\"error\":\"unbound module 0x1::missing\"}\n";
        let err = classify(400, body.to_string()).unwrap_err();
        assert_eq!(
            err,
            CompileError::Http {
                status: 400,
                body: r#"{"error":"unbound module 0x1::missing"}"#.to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            r#"HTTP error 400: {"error":"unbound module 0x1::missing"}"#
        );
    }

    #[test]
    fn test_classify_truncates_long_diagnostic() {
        let body = "é".repeat(MAX_ERROR_BODY_CHARS + 10);
        let Err(CompileError::Http { status, body }) = classify(502, body) else {
            panic!("expected an HTTP error");
        };
        assert_eq!(status, 502);
        assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        assert!(body.ends_with("..."));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let transport = CannedTransport::new(Ok("Service Unavailable"));
        let client = CompilerClient::with_endpoint(&transport, "http://compiler.test/compile");
        let err = client.compile(&request()).await.unwrap_err();
        assert!(matches!(err, CompileError::InvalidJson(_)));
        assert!(!client.busy().is_busy());
    }

    #[tokio::test]
    async fn test_rejects_reentrant_compile() {
        let transport = CannedTransport::new(Ok("{}"));
        let client = CompilerClient::with_endpoint(&transport, "http://compiler.test/compile");
        let _held = client.busy().enter().unwrap();
        assert_eq!(client.compile(&request()).await, Err(CompileError::Busy));
        assert!(transport.seen.borrow().is_empty());
    }

    #[test]
    fn test_busy_flag_notifies_transitions() {
        let flag = BusyFlag::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        flag.on_change(move |busy| sink.borrow_mut().push(busy));

        {
            let _guard = flag.enter().unwrap();
            assert!(flag.is_busy());
            assert!(flag.enter().is_none());
        }
        assert!(!flag.is_busy());
        assert_eq!(*events.borrow(), vec![true, false]);
    }
}
