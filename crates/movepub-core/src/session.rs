//! Session state shared by the compile and publish pipeline.
//!
//! The [`Session`] owns every piece of mutable state: the selected bundle,
//! the named-address registry, the compile-result slot, the busy flag and the
//! last publish phase. The presentation layer calls its operations and
//! mirrors the [`SessionEvent`]s it emits; it never writes session state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::collector::{SelectedFile, collect_package};
use crate::compiler::{BusyFlag, CompileTransport, CompilerClient};
use crate::config::CompileMode;
use crate::error::{PreconditionError, SessionError};
use crate::models::{
    AddressTarget, BundleSummary, CompileResult, NamedAddressRegistry, Notification,
    ProjectBundle, build_compile_request,
};
use crate::publish::{ChainClient, PublishOutcome, PublishPhase, Publisher, Wallet};

/// State change reported to the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Busy(bool),
    /// A selection finished reading (`Some`) or was cleared (`None`).
    BundleChanged(Option<BundleSummary>),
    RegistryChanged(NamedAddressRegistry),
    ResultChanged(Option<CompileResult>),
    PublishPhase(PublishPhase),
    Notify(Notification),
}

type Observer = Rc<dyn Fn(SessionEvent)>;

/// Compile/publish session for one page.
pub struct Session<T> {
    mode: CompileMode,
    compiler: CompilerClient<T>,
    bundle: RefCell<Option<ProjectBundle>>,
    /// Bumped on every selection or clear; reads from an older selection are dropped.
    selection: Cell<u64>,
    registry: RefCell<NamedAddressRegistry>,
    result: RefCell<Option<CompileResult>>,
    phase: Cell<PublishPhase>,
    observer: Observer,
}

impl<T: CompileTransport> Session<T> {
    pub fn new(
        compiler: CompilerClient<T>,
        mode: CompileMode,
        observer: impl Fn(SessionEvent) + 'static,
    ) -> Self {
        let observer: Observer = Rc::new(observer);
        let busy_observer = observer.clone();
        compiler
            .busy()
            .on_change(move |busy| busy_observer(SessionEvent::Busy(busy)));

        Self {
            mode,
            compiler,
            bundle: RefCell::new(None),
            selection: Cell::new(0),
            registry: RefCell::new(NamedAddressRegistry::new()),
            result: RefCell::new(None),
            phase: Cell::new(PublishPhase::Idle),
            observer,
        }
    }

    fn emit(&self, event: SessionEvent) {
        (self.observer)(event);
    }

    fn notify(&self, notification: Notification) {
        self.emit(SessionEvent::Notify(notification));
    }

    fn reject(&self, error: PreconditionError) -> PreconditionError {
        warn!(%error, "action rejected");
        self.notify(Notification::error("Cannot continue", error.to_string()));
        error
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> CompileMode {
        self.mode
    }

    pub fn busy(&self) -> &BusyFlag {
        self.compiler.busy()
    }

    pub fn is_busy(&self) -> bool {
        self.busy().is_busy()
    }

    pub fn bundle_summary(&self) -> Option<BundleSummary> {
        self.bundle.borrow().as_ref().map(ProjectBundle::summary)
    }

    pub fn registry(&self) -> NamedAddressRegistry {
        self.registry.borrow().clone()
    }

    pub fn result(&self) -> Option<CompileResult> {
        self.result.borrow().clone()
    }

    /// Phase of the current or last publish attempt.
    pub fn phase(&self) -> PublishPhase {
        self.phase.get()
    }

    // =========================================================================
    // File Selection
    // =========================================================================

    /// Read a new selection into the bundle slot.
    ///
    /// The previous bundle is discarded as soon as the selection starts.
    /// Returns `Ok(None)` if a newer selection or a clear happened while
    /// the files were being read.
    pub async fn select_files<F: SelectedFile>(
        &self,
        files: &[F],
    ) -> Result<Option<BundleSummary>, SessionError> {
        if self.is_busy() {
            return Err(self.reject(PreconditionError::Busy).into());
        }

        let epoch = self.selection.get() + 1;
        self.selection.set(epoch);
        if self.bundle.borrow_mut().take().is_some() {
            self.emit(SessionEvent::BundleChanged(None));
        }

        let collected = collect_package(files).await;
        if self.selection.get() != epoch {
            debug!(epoch, "discarding superseded selection");
            return Ok(None);
        }

        match collected {
            Ok(bundle) => {
                let summary = bundle.summary();
                *self.bundle.borrow_mut() = Some(bundle);
                self.emit(SessionEvent::BundleChanged(Some(summary.clone())));
                Ok(Some(summary))
            }
            Err(error) => {
                warn!(%error, "file selection failed");
                self.notify(Notification::error("Upload failed", error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Discard the current selection, including one still being read.
    pub fn clear_files(&self) {
        self.selection.set(self.selection.get() + 1);
        self.bundle.borrow_mut().take();
        self.emit(SessionEvent::BundleChanged(None));
    }

    // =========================================================================
    // Named Addresses
    // =========================================================================

    /// Apply one registry transition.
    pub fn update_registry(&self, f: impl FnOnce(NamedAddressRegistry) -> NamedAddressRegistry) {
        let next = f(self.registry());
        *self.registry.borrow_mut() = next.clone();
        self.emit(SessionEvent::RegistryChanged(next));
    }

    /// Add a row for each `_` placeholder declared in the selected manifest.
    ///
    /// Returns the number of placeholders found.
    pub fn seed_manifest_addresses(&self) -> usize {
        let Some(manifest) = self.bundle_summary().and_then(|s| s.manifest) else {
            return 0;
        };
        let names = manifest.unresolved_addresses();
        if !names.is_empty() {
            self.update_registry(|registry| registry.with_names(names.iter().copied()));
        }
        names.len()
    }

    // =========================================================================
    // Compile
    // =========================================================================

    /// Compile the selected bundle.
    ///
    /// On success the result replaces the slot. On failure the slot keeps
    /// whatever it held before.
    pub async fn compile(&self, account: Option<&str>) -> Result<CompileResult, SessionError> {
        let request = {
            let bundle = self.bundle.borrow();
            let Some(account) = account else {
                return Err(self.reject(PreconditionError::NoAccount).into());
            };
            let Some(bundle) = bundle.as_ref().filter(|b| !b.is_empty()) else {
                return Err(self.reject(PreconditionError::NoFiles).into());
            };
            let target = match self.mode {
                CompileMode::NamedAddresses => {
                    AddressTarget::NamedAddresses(self.registry.borrow().to_named_addresses())
                }
                CompileMode::SenderAddress if account.is_empty() => {
                    return Err(self.reject(PreconditionError::EmptySender).into());
                }
                CompileMode::SenderAddress => AddressTarget::SenderAddress(account.to_string()),
            };
            build_compile_request(bundle, target)
        };

        match self.compiler.compile(&request).await {
            Ok(result) => {
                *self.result.borrow_mut() = Some(result.clone());
                self.phase.set(PublishPhase::Idle);
                self.emit(SessionEvent::ResultChanged(Some(result.clone())));
                self.emit(SessionEvent::PublishPhase(PublishPhase::Idle));
                Ok(result)
            }
            Err(error) => {
                self.notify(Notification::error("Compilation failed", error.to_string()));
                Err(error.into())
            }
        }
    }

    // =========================================================================
    // Publish
    // =========================================================================

    /// Publish the held compile result.
    ///
    /// The result is taken out of the slot first, so a second attempt needs
    /// a fresh compile. The outcome notification is emitted exactly once.
    pub async fn publish<W: Wallet, C: ChainClient>(
        &self,
        publisher: &Publisher<W, C>,
    ) -> Result<PublishOutcome, PreconditionError> {
        if self.is_busy() {
            return Err(self.reject(PreconditionError::Busy));
        }
        let taken = self.result.borrow_mut().take();
        let Some(result) = taken else {
            return Err(self.reject(PreconditionError::NoCompileResult));
        };
        let Some(_guard) = self.busy().enter() else {
            *self.result.borrow_mut() = Some(result);
            return Err(self.reject(PreconditionError::Busy));
        };
        self.emit(SessionEvent::ResultChanged(None));

        let outcome = publisher
            .publish(result, |state| {
                let phase = state.phase();
                debug!(phase = phase.label(), "publish phase");
                self.phase.set(phase);
                self.emit(SessionEvent::PublishPhase(phase));
            })
            .await;

        match &outcome {
            PublishOutcome::Confirmed(hash) => {
                info!(%hash, "publish confirmed");
                self.notify(Notification::published(hash, publisher.network()));
            }
            PublishOutcome::Failed(error) => {
                self.notify(Notification::publish_failed(error));
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChainError, CompileError, PublishError, WalletError};
    use crate::mock::{MockChain, MockFile, MockTransport, MockWallet};
    use crate::models::{EntryField, NotificationKind, TransactionHash};

    type Events = Rc<RefCell<Vec<SessionEvent>>>;

    fn session(transport: MockTransport, mode: CompileMode) -> (Session<MockTransport>, Events) {
        let events: Events = Rc::default();
        let sink = events.clone();
        let compiler = CompilerClient::with_endpoint(transport, "http://compiler.test/compile");
        let session = Session::new(compiler, mode, move |event| sink.borrow_mut().push(event));
        (session, events)
    }

    fn package() -> Vec<MockFile> {
        vec![
            MockFile::new("Move.toml", "[package]\nname = \"hello\"\n\n[addresses]\nhello = \"_\"\n"),
            MockFile::new("hello.move", "module hello::hello {}"),
        ]
    }

    fn notifications(events: &Events) -> Vec<Notification> {
        events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Notify(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    const COMPILED: &str = r#"{"metadataBytes":"0x1234","byteCode":["0xabcd"]}"#;

    #[tokio::test]
    async fn test_select_and_clear() {
        let (session, events) = session(MockTransport::new(), CompileMode::NamedAddresses);
        let summary = session.select_files(&package()).await.unwrap().unwrap();
        assert_eq!(summary.file_count, 2);
        assert!(summary.has_manifest);
        assert_eq!(session.bundle_summary(), Some(summary.clone()));

        session.clear_files();
        assert_eq!(session.bundle_summary(), None);
        assert_eq!(
            events.borrow().last(),
            Some(&SessionEvent::BundleChanged(None))
        );
    }

    #[tokio::test]
    async fn test_read_failure_notifies_and_leaves_no_bundle() {
        let (session, events) = session(MockTransport::new(), CompileMode::NamedAddresses);
        let files = vec![
            MockFile::new("a.move", "module a"),
            MockFile::failing("b.move", "not utf-8"),
        ];
        let err = session.select_files(&files).await.unwrap_err();
        assert!(matches!(err, SessionError::FileRead(_)));
        assert_eq!(session.bundle_summary(), None);

        let notes = notifications(&events);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Destructive);
        assert_eq!(notes[0].description, "Error reading file: b.move (not utf-8)");
    }

    #[tokio::test]
    async fn test_compile_preconditions() {
        let transport = MockTransport::new();
        let (session, events) = session(transport.clone(), CompileMode::NamedAddresses);

        assert_eq!(
            session.compile(Some("0x1")).await,
            Err(SessionError::Precondition(PreconditionError::NoFiles))
        );
        session.select_files(&package()).await.unwrap();
        assert_eq!(
            session.compile(None).await,
            Err(SessionError::Precondition(PreconditionError::NoAccount))
        );
        assert!(transport.requests().is_empty());
        assert_eq!(notifications(&events).len(), 2);
    }

    #[tokio::test]
    async fn test_sender_mode_requires_address() {
        let transport = MockTransport::new().respond(COMPILED);
        let (session, _) = session(transport.clone(), CompileMode::SenderAddress);
        session.select_files(&package()).await.unwrap();

        assert_eq!(
            session.compile(Some("")).await,
            Err(SessionError::Precondition(PreconditionError::EmptySender))
        );
        session.compile(Some("0xcafe")).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&transport.requests()[0]).unwrap();
        assert_eq!(body["senderAddress"], "0xcafe");
        assert!(body.get("namedAddresses").is_none());
    }

    #[tokio::test]
    async fn test_compile_sends_registry_and_fills_slot() {
        let transport = MockTransport::new().respond(COMPILED);
        let (session, events) = session(transport.clone(), CompileMode::NamedAddresses);
        session.select_files(&package()).await.unwrap();
        assert_eq!(session.seed_manifest_addresses(), 1);
        session.update_registry(|r| r.with_field(0, EntryField::Address, "0x42"));

        let result = session.compile(Some("0x42")).await.unwrap();
        assert_eq!(session.result(), Some(result));

        let body: serde_json::Value = serde_json::from_str(&transport.requests()[0]).unwrap();
        assert_eq!(body["namedAddresses"]["hello"], "0x42");
        assert_eq!(body["files"][0]["name"], "hello.move");

        let busy: Vec<bool> = events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Busy(b) => Some(*b),
                _ => None,
            })
            .collect();
        assert_eq!(busy, vec![true, false]);
    }

    #[tokio::test]
    async fn test_failed_compile_keeps_previous_result() {
        let transport = MockTransport::new()
            .respond(COMPILED)
            .fail(CompileError::Http {
                status: 500,
                body: "internal error".to_string(),
            })
            .respond("<html>oops</html>");
        let (session, events) = session(transport, CompileMode::NamedAddresses);
        session.select_files(&package()).await.unwrap();

        let first = session.compile(Some("0x1")).await.unwrap();
        assert_eq!(
            session.compile(Some("0x1")).await,
            Err(SessionError::Compile(CompileError::Http {
                status: 500,
                body: "internal error".to_string(),
            }))
        );
        assert_eq!(session.result(), Some(first.clone()));
        assert!(matches!(
            session.compile(Some("0x1")).await,
            Err(SessionError::Compile(CompileError::InvalidJson(_)))
        ));
        assert_eq!(session.result(), Some(first));
        assert!(!session.is_busy());
        let notes = notifications(&events);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "Compilation failed");
        assert_eq!(notes[0].description, "HTTP error 500: internal error");
    }

    #[tokio::test]
    async fn test_publish_consumes_result() {
        let transport = MockTransport::new().respond(COMPILED);
        let (session, events) = session(transport, CompileMode::NamedAddresses);
        session.select_files(&package()).await.unwrap();
        session.compile(Some("0x1")).await.unwrap();

        let wallet = MockWallet::submitting("0xdeadbeef");
        let publisher = Publisher::new(wallet.clone(), MockChain::confirming());
        let outcome = session.publish(&publisher).await.unwrap();
        assert_eq!(
            outcome,
            PublishOutcome::Confirmed(TransactionHash::new("0xdeadbeef"))
        );
        assert_eq!(session.phase(), PublishPhase::Confirmed);
        assert_eq!(session.result(), None);
        assert!(!session.is_busy());

        let notes = notifications(&events);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Success");

        assert_eq!(
            session.publish(&publisher).await,
            Err(PreconditionError::NoCompileResult)
        );
        assert_eq!(wallet.calls(), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_notifies_once() {
        let transport = MockTransport::new().respond(COMPILED);
        let (session, events) = session(transport, CompileMode::NamedAddresses);
        session.select_files(&package()).await.unwrap();
        session.compile(Some("0x1")).await.unwrap();
        events.borrow_mut().clear();

        let publisher = Publisher::new(
            MockWallet::submitting("0xfeed"),
            MockChain::failing(ChainError::Failed("Move abort".to_string())),
        );
        let outcome = session.publish(&publisher).await.unwrap();
        assert!(matches!(
            outcome,
            PublishOutcome::Failed(PublishError::ConfirmationFailure(_))
        ));

        let notes = notifications(&events);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Transaction submission failed");
        assert!(notes[0].description.starts_with("Your transaction failed to submit."));
        assert_eq!(session.phase(), PublishPhase::Failed);
    }

    #[tokio::test]
    async fn test_rejected_signature_reaches_failed() {
        let transport = MockTransport::new().respond(COMPILED);
        let (session, _) = session(transport, CompileMode::NamedAddresses);
        session.select_files(&package()).await.unwrap();
        session.compile(Some("0x1")).await.unwrap();

        let publisher = Publisher::new(
            MockWallet::rejecting(WalletError::RequestRejected("User rejected".to_string())),
            MockChain::confirming(),
        );
        let outcome = session.publish(&publisher).await.unwrap();
        assert!(matches!(
            outcome,
            PublishOutcome::Failed(PublishError::SigningRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_publish_rejected_while_busy() {
        let (session, _) = session(MockTransport::new(), CompileMode::NamedAddresses);
        let _held = session.busy().enter().unwrap();
        let publisher = Publisher::new(MockWallet::submitting("0x1"), MockChain::confirming());
        assert_eq!(
            session.publish(&publisher).await,
            Err(PreconditionError::Busy)
        );
    }
}
