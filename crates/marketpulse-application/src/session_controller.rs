//! Session state controller.
//!
//! Owns the in-memory [`SessionState`] and is the only writer of the session
//! keys in the preference store. Sign-in and sign-up go through an
//! [`AuthGateway`]; whatever happens remotely, callers get an
//! [`AuthOutcome`] back and never an error.
//!
//! Two guards keep responses from racing each other:
//!
//! - **Single flight**: one login/signup at a time per controller. A second
//!   submission while one is pending returns [`AuthOutcome::Busy`] without
//!   calling the gateway.
//! - **Generation token**: each submission captures the generation at call
//!   time. `logout` and `shutdown` advance it, so a response that arrives
//!   afterwards is discarded without touching memory or the store.

use chrono::Local;
use marketpulse_core::auth::{AuthGateway, GatewayError, LoginRequest, SignupRequest};
use marketpulse_core::preference::{PreferenceStore, keys};
use marketpulse_core::session::SessionState;
use marketpulse_core::validation::{FieldError, validate_login, validate_signup};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Shown when a failed sign-in carries no server detail.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please check your credentials.";
/// Shown when a failed sign-up carries no server detail.
pub const SIGNUP_FALLBACK_MESSAGE: &str = "Signup failed. Please try again.";

/// Result of a login or signup submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session is now authenticated; carries the new snapshot.
    Authenticated(SessionState),
    /// The service refused, was unreachable, or answered nonsense.
    Rejected { message: String },
    /// Input failed validation; nothing was sent.
    Invalid(Vec<FieldError>),
    /// Another submission is still pending; nothing was sent.
    Busy,
    /// The response arrived after logout or shutdown and was dropped.
    Discarded,
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }

    /// Top-of-form message for rejected submissions.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AuthOutcome::Rejected { message } => Some(message),
            _ => None,
        }
    }
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Manages authentication status and the signed-in user's profile.
pub struct SessionController {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn PreferenceStore>,
    state: watch::Sender<SessionState>,
    in_flight: AtomicBool,
    generation: AtomicU64,
    shut_down: AtomicBool,
    /// Serializes commits against logout/shutdown.
    commit_lock: Mutex<()>,
}

impl SessionController {
    /// Creates the controller and restores any persisted session.
    ///
    /// The store is consulted only here. A persisted flag without a name and
    /// email behind it is treated as debris from an interrupted write: the
    /// session keys are removed and the session starts anonymous.
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<dyn PreferenceStore>) -> Self {
        let initial = restore_session(store.as_ref());
        let (state, _) = watch::channel(initial);

        Self {
            gateway,
            store,
            state,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
            commit_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// True while a login or signup is awaiting the gateway.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Receiver for route guards and displays.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Signs in with `email` and `password`.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        if self.is_shut_down() {
            return AuthOutcome::Discarded;
        }
        let Some(_guard) = InFlightGuard::try_acquire(&self.in_flight) else {
            tracing::debug!("Login ignored: a submission is already pending");
            return AuthOutcome::Busy;
        };

        let errors = validate_login(email, password);
        if !errors.is_empty() {
            return AuthOutcome::Invalid(errors);
        }

        let email = email.trim();
        let generation = self.generation.load(Ordering::Acquire);
        tracing::info!(email, "Signing in");

        let request = LoginRequest::new(email, password);
        match self.gateway.login(&request).await {
            Ok(response) => {
                let session = response
                    .user
                    .and_then(|user| SessionState::authenticated(user.name, email, user.dob.as_deref()));
                match session {
                    Some(session) => self.commit(generation, session),
                    None => {
                        tracing::warn!("Login response carried no usable user");
                        self.reject(generation, None, LOGIN_FALLBACK_MESSAGE)
                    }
                }
            }
            Err(e) => self.reject(generation, Some(&e), LOGIN_FALLBACK_MESSAGE),
        }
    }

    /// Creates an account and signs in with it.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        date_of_birth: &str,
    ) -> AuthOutcome {
        if self.is_shut_down() {
            return AuthOutcome::Discarded;
        }
        let Some(_guard) = InFlightGuard::try_acquire(&self.in_flight) else {
            tracing::debug!("Signup ignored: a submission is already pending");
            return AuthOutcome::Busy;
        };

        let today = Local::now().date_naive();
        let errors = validate_signup(name, email, password, date_of_birth, today);
        if !errors.is_empty() {
            return AuthOutcome::Invalid(errors);
        }

        let (name, email, date_of_birth) = (name.trim(), email.trim(), date_of_birth.trim());
        let generation = self.generation.load(Ordering::Acquire);
        tracing::info!(email, "Creating account");

        let request = SignupRequest::new(name, email, password, date_of_birth);
        match self.gateway.signup(&request).await {
            // The account is the one just submitted; the response body is not consulted.
            Ok(_) => match SessionState::authenticated(name, email, Some(date_of_birth)) {
                Some(session) => self.commit(generation, session),
                None => self.reject(generation, None, SIGNUP_FALLBACK_MESSAGE),
            },
            Err(e) => self.reject(generation, Some(&e), SIGNUP_FALLBACK_MESSAGE),
        }
    }

    /// Clears the session and its persisted keys.
    ///
    /// Any submission still pending is invalidated. A no-op after
    /// [`shutdown`](Self::shutdown).
    pub fn logout(&self) {
        let _commit = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_shut_down() {
            return;
        }
        self.generation.fetch_add(1, Ordering::AcqRel);

        for key in keys::SESSION_REMOVE_ORDER {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to remove '{}' from preference store: {}", key, e);
            }
        }
        self.state.send_replace(SessionState::anonymous());
        tracing::info!("Signed out");
    }

    /// Tears the controller down. Pending responses will be discarded and
    /// later calls do nothing.
    pub fn shutdown(&self) {
        let _commit = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.shut_down.store(true, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::debug!("Session controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.is_shut_down() && self.generation.load(Ordering::Acquire) == generation
    }

    fn commit(&self, generation: u64, session: SessionState) -> AuthOutcome {
        let _commit = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(generation) {
            tracing::warn!("Discarding stale authentication response");
            return AuthOutcome::Discarded;
        }

        persist_session(self.store.as_ref(), &session);
        self.state.send_replace(session.clone());
        tracing::info!(name = session.name(), "Signed in");
        AuthOutcome::Authenticated(session)
    }

    fn reject(&self, generation: u64, error: Option<&GatewayError>, fallback: &str) -> AuthOutcome {
        if !self.is_current(generation) {
            return AuthOutcome::Discarded;
        }
        if let Some(e) = error {
            tracing::warn!("Authentication failed: {}", e);
        }

        let message = error
            .and_then(GatewayError::detail)
            .unwrap_or(fallback)
            .to_string();
        AuthOutcome::Rejected { message }
    }
}

/// Writes the session in [`keys::SESSION_WRITE_ORDER`], stopping at the
/// first failure so the flag is never written ahead of its data.
fn persist_session(store: &dyn PreferenceStore, session: &SessionState) {
    for key in keys::SESSION_WRITE_ORDER {
        let value = match key {
            keys::USER_NAME => session.name(),
            keys::USER_EMAIL => session.email(),
            keys::USER_DOB => session.stored_date_of_birth(),
            keys::IS_AUTHENTICATED => keys::AUTHENTICATED_FLAG,
            _ => continue,
        };
        if let Err(e) = store.set(key, value) {
            tracing::warn!(
                "Failed to persist '{}': {}; session will not survive a restart",
                key,
                e
            );
            return;
        }
    }
}

fn restore_session(store: &dyn PreferenceStore) -> SessionState {
    if store.get(keys::IS_AUTHENTICATED).as_deref() != Some(keys::AUTHENTICATED_FLAG) {
        return SessionState::anonymous();
    }

    let name = store.get(keys::USER_NAME).unwrap_or_default();
    let email = store.get(keys::USER_EMAIL).unwrap_or_default();
    let dob = store.get(keys::USER_DOB);

    match SessionState::authenticated(name, email, dob.as_deref()) {
        Some(session) => {
            tracing::info!(name = session.name(), "Restored persisted session");
            session
        }
        None => {
            tracing::warn!("Persisted session is incomplete; clearing it");
            for key in keys::SESSION_REMOVE_ORDER {
                if let Err(e) = store.remove(key) {
                    tracing::warn!("Failed to remove '{}' from preference store: {}", key, e);
                }
            }
            SessionState::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marketpulse_core::auth::{AuthResponse, AuthUser};
    use marketpulse_core::error::{PulseError, Result};
    use marketpulse_core::validation::FormField;
    use marketpulse_infrastructure::MemoryPreferenceStore;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    type GatewayResult = std::result::Result<AuthResponse, GatewayError>;

    /// Gateway returning a fixed result, optionally parked until released.
    struct MockGateway {
        result: GatewayResult,
        calls: AtomicUsize,
        last_login: Mutex<Option<LoginRequest>>,
        last_signup: Mutex<Option<SignupRequest>>,
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    impl MockGateway {
        fn new(result: GatewayResult) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
                last_login: Mutex::new(None),
                last_signup: Mutex::new(None),
                gate: None,
            }
        }

        fn user(name: &str, dob: Option<&str>) -> Self {
            Self::new(Ok(AuthResponse {
                user: Some(AuthUser {
                    name: name.to_string(),
                    email: None,
                    dob: dob.map(str::to_string),
                }),
            }))
        }

        fn rejected(status: u16, detail: Option<&str>) -> Self {
            Self::new(Err(GatewayError::Rejected {
                status,
                detail: detail.map(str::to_string),
            }))
        }

        /// Parks each call: signals `entered`, then waits for `release`.
        fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
            self.gate = Some((entered, release));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn respond(&self) -> GatewayResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            self.result.clone()
        }
    }

    #[async_trait]
    impl AuthGateway for MockGateway {
        async fn login(&self, request: &LoginRequest) -> GatewayResult {
            *self.last_login.lock().unwrap() = Some(request.clone());
            self.respond().await
        }

        async fn signup(&self, request: &SignupRequest) -> GatewayResult {
            *self.last_signup.lock().unwrap() = Some(request.clone());
            self.respond().await
        }
    }

    /// Store whose writes to `fail_on` always fail.
    struct FlakyStore {
        inner: MemoryPreferenceStore,
        fail_on: &'static str,
    }

    impl PreferenceStore for FlakyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == self.fail_on {
                return Err(PulseError::storage("quota exceeded"));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn setup(gateway: MockGateway) -> (Arc<MockGateway>, Arc<MemoryPreferenceStore>, SessionController) {
        let gateway = Arc::new(gateway);
        let store = Arc::new(MemoryPreferenceStore::new());
        let controller = SessionController::new(gateway.clone(), store.clone());
        (gateway, store, controller)
    }

    fn authenticated_store() -> Arc<MemoryPreferenceStore> {
        Arc::new(MemoryPreferenceStore::with_entries([
            (keys::USER_NAME, "Ada"),
            (keys::USER_EMAIL, "ada@example.com"),
            (keys::USER_DOB, "1990-01-01"),
            (keys::IS_AUTHENTICATED, "true"),
        ]))
    }

    #[tokio::test]
    async fn test_login_success_populates_session() {
        let (_, store, controller) = setup(MockGateway::user("Ada", Some("1990-01-01")));

        let outcome = controller.login("a@b.com", "secret").await;

        let expected = SessionState::authenticated("Ada", "a@b.com", Some("1990-01-01")).unwrap();
        assert_eq!(outcome, AuthOutcome::Authenticated(expected.clone()));
        assert_eq!(controller.session(), expected);
        assert!(!controller.is_loading());

        assert_eq!(store.get(keys::IS_AUTHENTICATED).as_deref(), Some("true"));
        assert_eq!(store.get(keys::USER_NAME).as_deref(), Some("Ada"));
        assert_eq!(store.get(keys::USER_EMAIL).as_deref(), Some("a@b.com"));
        assert_eq!(store.get(keys::USER_DOB).as_deref(), Some("1990-01-01"));
    }

    #[tokio::test]
    async fn test_login_without_dob_stores_empty_string() {
        let (_, store, controller) = setup(MockGateway::user("Ada", None));

        assert!(controller.login("a@b.com", "secret").await.is_authenticated());
        assert_eq!(controller.session().date_of_birth(), None);
        assert_eq!(store.get(keys::USER_DOB).as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_login_rejected_with_detail() {
        let (_, store, controller) = setup(MockGateway::rejected(401, Some("Invalid credentials")));

        let outcome = controller.login("a@b.com", "wrong").await;

        assert_eq!(outcome.error_message(), Some("Invalid credentials"));
        assert!(!controller.session().is_authenticated());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_use_fallback_message() {
        for error in [
            GatewayError::Rejected { status: 500, detail: None },
            GatewayError::Transport("connection refused".into()),
            GatewayError::MalformedResponse("eof".into()),
        ] {
            let (_, _, controller) = setup(MockGateway::new(Err(error)));
            let outcome = controller.login("a@b.com", "pw").await;
            assert_eq!(outcome.error_message(), Some(LOGIN_FALLBACK_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_login_response_without_user_is_failure() {
        let (_, store, controller) = setup(MockGateway::new(Ok(AuthResponse::default())));

        let outcome = controller.login("a@b.com", "pw").await;

        assert_eq!(outcome.error_message(), Some(LOGIN_FALLBACK_MESSAGE));
        assert!(!controller.is_authenticated());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_existing_session_untouched() {
        let gateway = Arc::new(MockGateway::rejected(401, Some("Invalid credentials")));
        let store = authenticated_store();
        let controller = SessionController::new(gateway, store.clone());
        let before = controller.session();
        let stored_before = store.snapshot();

        controller.login("other@b.com", "wrong").await;

        assert_eq!(controller.session(), before);
        assert_eq!(store.snapshot(), stored_before);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_gateway() {
        let (gateway, _, controller) = setup(MockGateway::user("Ada", None));

        let outcome = controller.login("not-an-email", "").await;

        match outcome {
            AuthOutcome::Invalid(errors) => {
                let fields: Vec<FormField> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec![FormField::Email, FormField::Password]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(gateway.calls(), 0);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_login_trims_email_and_keeps_password() {
        let (gateway, _, controller) = setup(MockGateway::user("Ada", None));

        controller.login("  a@b.com ", " pass word ").await;

        let request = gateway.last_login.lock().unwrap().clone().unwrap();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.password, " pass word ");
    }

    #[tokio::test]
    async fn test_second_login_while_pending_is_busy() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(
            MockGateway::user("Ada", Some("1990-01-01")).gated(entered.clone(), release.clone()),
        );
        let store = Arc::new(MemoryPreferenceStore::new());
        let controller = Arc::new(SessionController::new(gateway.clone(), store));

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.login("a@b.com", "secret").await }
        });
        entered.notified().await;
        assert!(controller.is_loading());

        let second = controller.login("other@b.com", "secret").await;
        assert_eq!(second, AuthOutcome::Busy);
        let signup = controller
            .signup("Bob", "bob@b.com", "pw", "1991-02-03")
            .await;
        assert_eq!(signup, AuthOutcome::Busy);

        release.notify_one();
        let outcome = first.await.unwrap();

        assert!(outcome.is_authenticated());
        assert_eq!(gateway.calls(), 1);
        assert_eq!(controller.session().email(), "a@b.com");
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_loading_flag_released_when_future_dropped() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(MockGateway::user("Ada", None).gated(entered.clone(), release));
        let controller = Arc::new(SessionController::new(
            gateway,
            Arc::new(MemoryPreferenceStore::new()),
        ));

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.login("a@b.com", "secret").await }
        });
        entered.notified().await;
        assert!(controller.is_loading());

        pending.abort();
        let _ = pending.await;
        assert!(!controller.is_loading());
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_response_after_shutdown_is_discarded() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(
            MockGateway::user("Ada", Some("1990-01-01")).gated(entered.clone(), release.clone()),
        );
        let store = Arc::new(MemoryPreferenceStore::new());
        let old = Arc::new(SessionController::new(gateway, store.clone()));

        let pending = tokio::spawn({
            let old = old.clone();
            async move { old.login("a@b.com", "secret").await }
        });
        entered.notified().await;

        old.shutdown();
        let replacement = SessionController::new(
            Arc::new(MockGateway::rejected(401, None)),
            store.clone(),
        );

        release.notify_one();
        assert_eq!(pending.await.unwrap(), AuthOutcome::Discarded);

        assert!(!old.is_authenticated());
        assert!(!replacement.is_authenticated());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_logout_invalidates_pending_login() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(MockGateway::user("Ada", None).gated(entered.clone(), release.clone()));
        let store = Arc::new(MemoryPreferenceStore::new());
        let controller = Arc::new(SessionController::new(gateway, store.clone()));

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.login("a@b.com", "secret").await }
        });
        entered.notified().await;
        controller.logout();
        release.notify_one();

        assert_eq!(pending.await.unwrap(), AuthOutcome::Discarded);
        assert!(!controller.is_authenticated());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_calls_after_shutdown_do_nothing() {
        let (gateway, store, controller) = setup(MockGateway::user("Ada", None));
        controller.shutdown();

        assert_eq!(controller.login("a@b.com", "pw").await, AuthOutcome::Discarded);
        controller.logout();
        assert_eq!(gateway.calls(), 0);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_store() {
        let store = authenticated_store();
        store.set(keys::THEME, "dark").unwrap();
        let controller = SessionController::new(Arc::new(MockGateway::user("Ada", None)), store.clone());
        assert!(controller.is_authenticated());

        controller.logout();

        assert_eq!(controller.session(), SessionState::anonymous());
        let remaining = store.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.get(keys::THEME).map(String::as_str), Some("dark"));
    }

    #[tokio::test]
    async fn test_restores_persisted_session() {
        let controller = SessionController::new(
            Arc::new(MockGateway::user("Ada", None)),
            authenticated_store(),
        );
        let session = controller.session();
        assert!(session.is_authenticated());
        assert_eq!(session.name(), "Ada");
        assert_eq!(session.email(), "ada@example.com");
        assert_eq!(session.date_of_birth(), Some("1990-01-01"));
    }

    #[tokio::test]
    async fn test_incomplete_persisted_session_is_cleared() {
        let store = Arc::new(MemoryPreferenceStore::with_entries([
            (keys::IS_AUTHENTICATED, "true"),
            (keys::USER_EMAIL, "ada@example.com"),
        ]));
        let controller = SessionController::new(Arc::new(MockGateway::user("Ada", None)), store.clone());

        assert!(!controller.is_authenticated());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_flag_not_written_when_profile_write_fails() {
        let store = Arc::new(FlakyStore {
            inner: MemoryPreferenceStore::new(),
            fail_on: keys::USER_EMAIL,
        });
        let controller = SessionController::new(
            Arc::new(MockGateway::user("Ada", Some("1990-01-01"))),
            store.clone(),
        );

        let outcome = controller.login("a@b.com", "secret").await;

        // In memory the session is live; on disk the flag never appears.
        assert!(outcome.is_authenticated());
        assert!(controller.is_authenticated());
        assert_eq!(store.get(keys::IS_AUTHENTICATED), None);
        assert_eq!(store.get(keys::USER_NAME).as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_signup_success_uses_form_values_without_user() {
        let (gateway, store, controller) = setup(MockGateway::new(Ok(AuthResponse::default())));

        let outcome = controller
            .signup(" Grace Hopper ", "grace@example.com", "pw", "1906-12-09")
            .await;

        let expected =
            SessionState::authenticated("Grace Hopper", "grace@example.com", Some("1906-12-09")).unwrap();
        assert_eq!(outcome, AuthOutcome::Authenticated(expected));
        assert_eq!(store.get(keys::USER_NAME).as_deref(), Some("Grace Hopper"));

        let request = gateway.last_signup.lock().unwrap().clone().unwrap();
        assert_eq!(request.name, "Grace Hopper");
        assert_eq!(request.dob, "1906-12-09");
    }

    #[tokio::test]
    async fn test_signup_keeps_form_values_over_response_user() {
        let (_, store, controller) = setup(MockGateway::user("server-name", Some("2000-02-02")));

        let outcome = controller
            .signup("Ada", "ada@example.com", "pw", "1990-01-01")
            .await;

        match outcome {
            AuthOutcome::Authenticated(session) => {
                assert_eq!(session.name(), "Ada");
                assert_eq!(session.email(), "ada@example.com");
                assert_eq!(session.date_of_birth(), Some("1990-01-01"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.get(keys::USER_NAME).as_deref(), Some("Ada"));
        assert_eq!(store.get(keys::USER_DOB).as_deref(), Some("1990-01-01"));
    }

    #[tokio::test]
    async fn test_signup_conflict_detail_and_fallback() {
        let (_, _, controller) = setup(MockGateway::rejected(409, Some("Email already registered")));
        let outcome = controller
            .signup("Grace", "grace@example.com", "pw", "1906-12-09")
            .await;
        assert_eq!(outcome.error_message(), Some("Email already registered"));
        assert!(!controller.is_authenticated());

        let (_, _, controller) = setup(MockGateway::new(Err(GatewayError::Transport("down".into()))));
        let outcome = controller
            .signup("Grace", "grace@example.com", "pw", "1906-12-09")
            .await;
        assert_eq!(outcome.error_message(), Some(SIGNUP_FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let (gateway, _, controller) = setup(MockGateway::user("Ada", None));

        let outcome = controller.signup("", "grace@example.com", "pw", "2999-01-01").await;

        match outcome {
            AuthOutcome::Invalid(errors) => {
                let fields: Vec<FormField> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec![FormField::Name, FormField::DateOfBirth]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_watch_receiver_observes_login() {
        let (_, _, controller) = setup(MockGateway::user("Ada", None));
        let mut receiver = controller.watch();
        assert!(!receiver.borrow().is_authenticated());

        controller.login("a@b.com", "secret").await;

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().name(), "Ada");
    }
}
