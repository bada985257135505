//! End-to-end account flows over the real adapters.
//!
//! Requests go through the route table, the `Trace` middleware, the bearer
//! extractor, the account service, the in-memory store and the event
//! channel. Counting wrappers record whether the store and the authorizer
//! were reached.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use accounts::Trace;
use accounts::domain::ports::{
    AccountAuthorizer, Mailer, MailerError, OutboundMail, UserPage, UserPersistenceError,
    UserRepository,
};
use accounts::domain::{
    AccountEvent, AccountService, EmailAddress, NotificationWorker, DeliveryOutcome,
    PasswordHash, PlainPassword, TRACE_ID_HEADER, User, UserId, UserName,
};
use accounts::inbound::http::routes::{API_PREFIX, configure};
use accounts::inbound::http::state::HttpState;
use accounts::outbound::auth::{OwnerOnlyAuthorizer, StaticTokenAuthenticator};
use accounts::outbound::memory::InMemoryUserRepository;
use accounts::outbound::notify::{ChannelEventPublisher, notification_channel};
use actix_web::dev::ServiceResponse;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use pagination::PageRequest;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tokio::sync::mpsc;

const ALICE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const BOB_ID: &str = "0b7d2a4e-97c5-4d2f-9c3e-5e1f0d6a8b21";
const MISSING_ID: &str = "9d4f6a1e-2b3c-4d5e-8f70-112233445566";
const ALICE_TOKEN: &str = "Bearer alice-token";
const PASSWORD: &str = "current-secret";

// -----------------------------------------------------------------------------
// Doubles
// -----------------------------------------------------------------------------

struct CountingRepository {
    inner: InMemoryUserRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn stored(&self, id: &str) -> User {
        let id = UserId::new(id).expect("fixture id");
        futures::executor::block_on(self.inner.find_by_id(&id))
            .expect("store reachable")
            .expect("user stored")
    }
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn list_page(&self, page: &PageRequest) -> Result<UserPage, UserPersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_page(page).await
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(user).await
    }
}

#[derive(Default)]
struct CountingAuthorizer {
    calls: AtomicUsize,
}

#[async_trait]
impl AccountAuthorizer for CountingAuthorizer {
    async fn can_update(&self, caller: &UserId, target: &User) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        OwnerOnlyAuthorizer.can_update(caller, target).await
    }
}

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutboundMail>>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailerError> {
        self.sent.lock().expect("mailer lock").push(mail.clone());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Harness
// -----------------------------------------------------------------------------

struct Harness {
    users: Arc<CountingRepository>,
    authorizer: Arc<CountingAuthorizer>,
    events: mpsc::Receiver<AccountEvent>,
    state: web::Data<HttpState>,
}

fn account(id: &str, name: &str, email: &str) -> User {
    let secret = PlainPassword::new(PASSWORD).expect("valid password");
    User::new(
        UserId::new(id).expect("fixture id"),
        UserName::new(name).expect("fixture name"),
        EmailAddress::new(email).expect("fixture email"),
        PasswordHash::hash(&secret).expect("hashing succeeds"),
    )
}

#[fixture]
fn harness() -> Harness {
    let users = Arc::new(CountingRepository {
        inner: InMemoryUserRepository::with_users([
            account(ALICE_ID, "Ada", "ada@example.org"),
            account(BOB_ID, "Bob", "bob@example.org"),
        ]),
        calls: AtomicUsize::new(0),
    });
    let authorizer = Arc::new(CountingAuthorizer::default());
    let (publisher, events): (ChannelEventPublisher, _) = notification_channel(8);
    let service = Arc::new(
        AccountService::new(users.clone(), authorizer.clone(), Arc::new(publisher))
            .with_page_size(1)
            .expect("valid page size"),
    );
    let authenticator = StaticTokenAuthenticator::from_tokens([
        ("alice-token", UserId::new(ALICE_ID).expect("fixture id")),
        ("bob-token", UserId::new(BOB_ID).expect("fixture id")),
    ]);
    let state = web::Data::new(HttpState::new(
        Arc::new(authenticator),
        service.clone(),
        service,
    ));
    Harness {
        users,
        authorizer,
        events,
        state,
    }
}

async fn send(
    harness: &Harness,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(harness.state.clone())
            .wrap(Trace)
            .service(web::scope(API_PREFIX).configure(configure)),
    )
    .await;
    let mut request = test::TestRequest::default().method(method).uri(uri);
    if let Some(auth) = auth {
        request = request.insert_header((header::AUTHORIZATION, auth));
    }
    if let Some(body) = body {
        request = request.set_json(body);
    }
    test::call_service(&app, request.to_request()).await
}

async fn json_of(response: ServiceResponse) -> Value {
    test::read_body_json(response).await
}

// -----------------------------------------------------------------------------
// Reads
// -----------------------------------------------------------------------------

#[rstest]
#[actix_web::test]
async fn self_and_by_id_views_match(harness: Harness) {
    let own = json_of(send(&harness, Method::GET, "/api/v1/me", Some(ALICE_TOKEN), None).await).await;
    let by_id = json_of(
        send(&harness, Method::GET, &format!("/api/v1/users/{ALICE_ID}"), None, None).await,
    )
    .await;

    assert_eq!(own, by_id);
    assert_eq!(own["email"], "ada@example.org");
    let fields = own.as_object().expect("object body");
    assert!(!fields.contains_key("password"));
    assert!(!fields.contains_key("activationCode"));
}

#[rstest]
#[actix_web::test]
async fn ids_in_any_case_address_the_same_account(harness: Harness) {
    let upper = ALICE_ID.to_uppercase();
    let read = send(&harness, Method::GET, &format!("/api/v1/users/{upper}"), None, None).await;
    assert_eq!(read.status(), StatusCode::OK);
    assert_eq!(json_of(read).await["id"], ALICE_ID);

    let update = send(
        &harness,
        Method::PATCH,
        &format!("/api/v1/users/{upper}"),
        Some(ALICE_TOKEN),
        Some(json!({"name": "Countess"})),
    )
    .await;
    assert_eq!(update.status(), StatusCode::OK);
    assert_eq!(harness.users.stored(ALICE_ID).name().as_str(), "Countess");
}

#[rstest]
#[actix_web::test]
async fn listing_pages_through_every_account(harness: Harness) {
    let first = json_of(send(&harness, Method::GET, "/api/v1/users", None, None).await).await;
    let second =
        json_of(send(&harness, Method::GET, "/api/v1/users?page=2", None, None).await).await;

    assert_eq!(first["data"][0]["id"], ALICE_ID);
    assert_eq!(first["meta"]["total"], 2);
    assert_eq!(first["meta"]["lastPage"], 2);
    assert!(first["links"]["next"].as_str().is_some_and(|next| next.contains("page=2")));
    assert_eq!(second["data"][0]["id"], BOB_ID);
    assert!(second["links"]["next"].is_null());
}

// -----------------------------------------------------------------------------
// Authentication and authorization
// -----------------------------------------------------------------------------

#[rstest]
#[case::get_self(Method::GET, "/api/v1/me", None)]
#[case::profile(Method::PATCH, "/api/v1/users/{id}", Some(json!({"name": "Eve"})))]
#[case::password(Method::PUT, "/api/v1/users/{id}/password", Some(json!({"password": PASSWORD})))]
#[case::email(Method::PUT, "/api/v1/users/{id}/account", Some(json!({"email": "eve@example.org"})))]
#[actix_web::test]
async fn unauthenticated_calls_never_reach_the_store(
    harness: Harness,
    #[case] method: Method,
    #[case] path: &str,
    #[case] body: Option<Value>,
) {
    let uri = path.replace("{id}", ALICE_ID);
    for auth in [None, Some("Bearer stolen-token"), Some("Basic YWxpY2U6c2VjcmV0")] {
        let response = send(&harness, method.clone(), &uri, auth, body.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{auth:?}");
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
        let body = json_of(response).await;
        assert_eq!(body["code"], "unauthorized");
    }
    assert_eq!(harness.users.calls(), 0);
}

#[rstest]
#[case::profile("/api/v1/users/{id}", json!({"name": "Eve"}))]
#[case::password("/api/v1/users/{id}/password", json!({"password": PASSWORD}))]
#[case::email("/api/v1/users/{id}/account", json!({"email": "eve@example.org"}))]
#[actix_web::test]
async fn missing_targets_fail_before_authorization(
    harness: Harness,
    #[case] path: &str,
    #[case] body: Value,
) {
    let uri = path.replace("{id}", MISSING_ID);
    let response = send(&harness, Method::PUT, &uri, Some(ALICE_TOKEN), Some(body)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_of(response).await["code"], "not_found");
    assert_eq!(harness.authorizer.calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[actix_web::test]
async fn callers_cannot_change_other_accounts(harness: Harness) {
    let response = send(
        &harness,
        Method::PATCH,
        &format!("/api/v1/users/{BOB_ID}"),
        Some(ALICE_TOKEN),
        Some(json!({"name": "Mallory"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_of(response).await["message"], "This action is unauthorized.");
    assert_eq!(harness.users.stored(BOB_ID).name().as_str(), "Bob");
}

// -----------------------------------------------------------------------------
// Mutations
// -----------------------------------------------------------------------------

#[rstest]
#[actix_web::test]
async fn profile_updates_touch_only_name_and_avatar(harness: Harness) {
    let response = send(
        &harness,
        Method::PUT,
        &format!("/api/v1/users/{ALICE_ID}"),
        Some(ALICE_TOKEN),
        Some(json!({
            "name": "Ada Lovelace",
            "email": "mallory@example.org",
            "password": "hijacked-secret"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let view = json_of(
        send(&harness, Method::GET, &format!("/api/v1/users/{ALICE_ID}"), None, None).await,
    )
    .await;
    assert_eq!(view["name"], "Ada Lovelace");
    assert_eq!(view["email"], "ada@example.org");
    assert!(view["avatar"].is_null());

    let stored = harness.users.stored(ALICE_ID);
    assert!(stored.password().verify(&PlainPassword::new(PASSWORD).expect("valid password")));
}

#[rstest]
#[actix_web::test]
async fn matching_password_rehashes_and_mismatch_is_forbidden(harness: Harness) {
    let before = harness.users.stored(ALICE_ID).password().as_phc().to_owned();
    let uri = format!("/api/v1/users/{ALICE_ID}/password");

    let rejected = send(
        &harness,
        Method::PATCH,
        &uri,
        Some(ALICE_TOKEN),
        Some(json!({"password": "brand-new-secret"})),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
    assert_eq!(harness.users.stored(ALICE_ID).password().as_phc(), before);

    let accepted = send(
        &harness,
        Method::PATCH,
        &uri,
        Some(ALICE_TOKEN),
        Some(json!({"password": PASSWORD})),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);

    let after = harness.users.stored(ALICE_ID);
    assert_ne!(after.password().as_phc(), before);
    assert!(after.password().verify(&PlainPassword::new(PASSWORD).expect("valid password")));
}

#[rstest]
#[actix_web::test]
async fn email_change_notifies_the_current_address_once(mut harness: Harness) {
    let response = send(
        &harness,
        Method::PUT,
        &format!("/api/v1/users/{ALICE_ID}/account"),
        Some(ALICE_TOKEN),
        Some(json!({"email": "countess@example.org"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_of(response).await;
    assert_eq!(view["email"], "ada@example.org");
    assert_eq!(view["emailUpdate"], "countess@example.org");
    assert!(view.get("activationCode").is_none());

    let event = harness.events.try_recv().expect("one event published");
    assert!(harness.events.try_recv().is_err(), "exactly one event");

    let mailer = RecordingMailer::default();
    let worker = NotificationWorker::new(
        Arc::new(mailer.clone()),
        EmailAddress::new("no-reply@accounts.local").expect("sender"),
    );
    assert_eq!(worker.deliver(&event).await, DeliveryOutcome::Delivered { attempts: 1 });

    let sent = mailer.sent.lock().expect("mailer lock");
    let stored = harness.users.stored(ALICE_ID);
    let code = stored.activation_code().expect("code stored");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.as_str(), "ada@example.org");
    assert!(sent[0].body.contains(code.as_str()));
    assert!(sent[0].body.contains("countess@example.org"));
}

#[rstest]
#[actix_web::test]
async fn repeated_email_changes_issue_fresh_codes(mut harness: Harness) {
    let uri = format!("/api/v1/users/{ALICE_ID}/account");
    let mut codes = Vec::new();
    for email in ["first@example.org", "second@example.org"] {
        let response = send(
            &harness,
            Method::PATCH,
            &uri,
            Some(ALICE_TOKEN),
            Some(json!({ "email": email })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let stored = harness.users.stored(ALICE_ID);
        let code = stored.activation_code().expect("code stored").as_str().to_owned();
        assert_eq!(code.len(), 40);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        codes.push(code);
        harness.events.try_recv().expect("event per request");
    }
    assert_ne!(codes[0], codes[1]);
}

#[rstest]
#[case::bad_id(Method::GET, "/api/v1/users/not-a-uuid", None, "id")]
#[case::bad_page(Method::GET, "/api/v1/users?page=zero", None, "page")]
#[case::blank_name(Method::PATCH, "/api/v1/users/{id}", Some(json!({"name": "  "})), "name")]
#[case::bad_email(Method::PUT, "/api/v1/users/{id}/account", Some(json!({"email": "nope"})), "email")]
#[actix_web::test]
async fn invalid_input_is_a_validation_failure(
    harness: Harness,
    #[case] method: Method,
    #[case] path: &str,
    #[case] body: Option<Value>,
    #[case] field: &str,
) {
    let uri = path.replace("{id}", ALICE_ID);
    let response = send(&harness, method, &uri, Some(ALICE_TOKEN), body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_of(response).await;
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(body["details"]["field"], field);
}
