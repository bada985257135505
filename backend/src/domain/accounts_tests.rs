//! Tests for the account service.

use std::sync::{Arc, Mutex};

use super::*;
use crate::domain::ports::{
    EventPublishError, MockAccountAuthorizer, MockAccountEventPublisher, MockUserRepository,
    UserPage,
};
use crate::domain::{Avatar, ErrorCode, UserName};
use rstest::{fixture, rstest};

const CURRENT_PASSWORD: &str = "current-secret";

type Service = AccountService<MockUserRepository, MockAccountAuthorizer, MockAccountEventPublisher>;

#[fixture]
fn stored_user() -> User {
    let password = PlainPassword::new(CURRENT_PASSWORD).expect("valid password");
    User::new(
        UserId::random(),
        UserName::new("Ada Lovelace").expect("valid name"),
        EmailAddress::new("ada@example.org").expect("valid email"),
        PasswordHash::hash(&password).expect("hash"),
    )
}

/// Repository mock backed by a single shared row so reads observe writes.
fn stateful_repository(user: &User) -> (MockUserRepository, Arc<Mutex<User>>, Arc<Mutex<u32>>) {
    let row = Arc::new(Mutex::new(user.clone()));
    let writes = Arc::new(Mutex::new(0));
    let mut repo = MockUserRepository::new();

    let read_row = Arc::clone(&row);
    repo.expect_find_by_id().returning(move |id| {
        let current = read_row.lock().expect("row lock").clone();
        Ok((current.id() == id).then_some(current))
    });

    let write_row = Arc::clone(&row);
    let write_count = Arc::clone(&writes);
    repo.expect_update().returning(move |user| {
        *write_row.lock().expect("row lock") = user.clone();
        *write_count.lock().expect("count lock") += 1;
        Ok(())
    });

    (repo, row, writes)
}

fn allow_all() -> MockAccountAuthorizer {
    let mut authorizer = MockAccountAuthorizer::new();
    authorizer.expect_can_update().returning(|_, _| true);
    authorizer
}

fn deny_all() -> MockAccountAuthorizer {
    let mut authorizer = MockAccountAuthorizer::new();
    authorizer.expect_can_update().times(1).returning(|_, _| false);
    authorizer
}

fn never_authorizes() -> MockAccountAuthorizer {
    let mut authorizer = MockAccountAuthorizer::new();
    authorizer.expect_can_update().never();
    authorizer
}

fn silent_publisher() -> MockAccountEventPublisher {
    let mut publisher = MockAccountEventPublisher::new();
    publisher.expect_publish().never();
    publisher
}

fn make_service(
    repo: MockUserRepository,
    authorizer: MockAccountAuthorizer,
    publisher: MockAccountEventPublisher,
) -> Service {
    AccountService::new(Arc::new(repo), Arc::new(authorizer), Arc::new(publisher))
}

fn missing_repository() -> MockUserRepository {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_update().never();
    repo
}

#[rstest]
#[tokio::test]
async fn get_self_and_get_user_return_identical_views(stored_user: User) {
    let (repo, _, _) = stateful_repository(&stored_user);
    let service = make_service(repo, never_authorizes(), silent_publisher());

    let own = service.get_self(stored_user.id()).await.expect("self view");
    let by_id = service.get_user(stored_user.id()).await.expect("view by id");
    assert_eq!(own, by_id);
    assert_eq!(own.email.as_str(), "ada@example.org");
}

#[rstest]
#[tokio::test]
async fn get_self_fails_when_caller_vanished() {
    let service = make_service(missing_repository(), never_authorizes(), silent_publisher());
    let error = service
        .get_self(&UserId::random())
        .await
        .expect_err("missing caller");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_users_builds_page_metadata(stored_user: User) {
    let mut repo = MockUserRepository::new();
    let listed = stored_user.clone();
    repo.expect_list_page()
        .withf(|page| page.page() == 2 && page.per_page() == 1)
        .times(1)
        .return_once(move |_| {
            Ok(UserPage {
                users: vec![listed],
                total: 3,
            })
        });
    let service = make_service(repo, never_authorizes(), silent_publisher())
        .with_page_size(1)
        .expect("valid page size");

    let page = service.list_users(2).await.expect("page");
    assert_eq!(page.items().len(), 1);
    assert_eq!(page.meta().last_page(), 3);
    assert_eq!(page.meta().from(), Some(2));
    assert_eq!(page.items().first().map(|view| &view.id), Some(stored_user.id()));
}

#[rstest]
#[tokio::test]
async fn list_users_rejects_page_zero_without_touching_the_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_list_page().never();
    let service = make_service(repo, never_authorizes(), silent_publisher());

    let error = service.list_users(0).await.expect_err("page zero");
    assert_eq!(error.code(), ErrorCode::ValidationFailed);
}

#[rstest]
fn page_size_above_maximum_is_rejected() {
    let result = make_service(
        MockUserRepository::new(),
        MockAccountAuthorizer::new(),
        MockAccountEventPublisher::new(),
    )
    .with_page_size(pagination::MAX_PER_PAGE + 1);
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
async fn store_connection_failures_become_service_unavailable() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|_| Err(UserPersistenceError::connection("pool exhausted")));
    let service = make_service(repo, never_authorizes(), silent_publisher());

    let error = service
        .get_user(&UserId::random())
        .await
        .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn update_profile_changes_only_supplied_fields(stored_user: User) {
    let (repo, _, writes) = stateful_repository(&stored_user);
    let service = make_service(repo, allow_all(), silent_publisher());
    let id = stored_user.id().clone();

    let view = service
        .update_profile(
            &id,
            &id,
            ProfileChanges {
                name: Some(UserName::new("Countess of Lovelace").expect("valid name")),
                avatar: None,
            },
        )
        .await
        .expect("profile updated");

    assert_eq!(view.name.as_str(), "Countess of Lovelace");
    assert_eq!(view.email, *stored_user.email());
    assert!(view.avatar.is_none());
    assert_eq!(*writes.lock().expect("count lock"), 1);

    let reread = service.get_user(&id).await.expect("view by id");
    assert_eq!(reread, view);
}

#[rstest]
#[tokio::test]
async fn update_profile_with_no_fields_authorizes_but_does_not_write(stored_user: User) {
    let (repo, _, writes) = stateful_repository(&stored_user);
    let mut authorizer = MockAccountAuthorizer::new();
    authorizer.expect_can_update().times(1).returning(|_, _| true);
    let service = make_service(repo, authorizer, silent_publisher());
    let id = stored_user.id().clone();

    let view = service
        .update_profile(&id, &id, ProfileChanges::default())
        .await
        .expect("no-op update");

    assert_eq!(view, stored_user.view());
    assert_eq!(*writes.lock().expect("count lock"), 0);
}

#[rstest]
#[tokio::test]
async fn update_profile_denied_by_authorizer_does_not_write(stored_user: User) {
    let (repo, row, writes) = stateful_repository(&stored_user);
    let service = make_service(repo, deny_all(), silent_publisher());

    let error = service
        .update_profile(
            &UserId::random(),
            stored_user.id(),
            ProfileChanges {
                name: None,
                avatar: Some(Avatar::new("/a.png").expect("valid avatar")),
            },
        )
        .await
        .expect_err("denied");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), UNAUTHORIZED_ACTION_MESSAGE);
    assert_eq!(*writes.lock().expect("count lock"), 0);
    assert_eq!(*row.lock().expect("row lock"), stored_user);
}

#[rstest]
#[case::profile("profile")]
#[case::password("password")]
#[case::email("email")]
#[tokio::test]
async fn mutations_on_missing_users_never_consult_the_authorizer(#[case] operation: &str) {
    let service = make_service(missing_repository(), never_authorizes(), silent_publisher());
    let caller = UserId::random();
    let target = UserId::random();

    let result = match operation {
        "profile" => {
            service
                .update_profile(&caller, &target, ProfileChanges::default())
                .await
        }
        "password" => {
            let password = PlainPassword::new(CURRENT_PASSWORD).expect("valid password");
            service.update_password(&caller, &target, password).await
        }
        _ => {
            let email = EmailAddress::new("new@example.org").expect("valid email");
            service.request_email_change(&caller, &target, email).await
        }
    };

    let error = result.expect_err("missing user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_password_with_matching_value_rehashes_with_new_salt(stored_user: User) {
    let (repo, row, writes) = stateful_repository(&stored_user);
    let service = make_service(repo, allow_all(), silent_publisher());
    let id = stored_user.id().clone();
    let password = PlainPassword::new(CURRENT_PASSWORD).expect("valid password");

    service
        .update_password(&id, &id, password.clone())
        .await
        .expect("password updated");

    let stored = row.lock().expect("row lock").password().clone();
    assert_ne!(stored.as_phc(), stored_user.password().as_phc());
    assert!(stored.verify(&password));
    assert_eq!(*writes.lock().expect("count lock"), 1);
}

#[rstest]
#[tokio::test]
async fn update_password_with_other_value_is_forbidden_before_authorization(stored_user: User) {
    let (repo, _, writes) = stateful_repository(&stored_user);
    let service = make_service(repo, never_authorizes(), silent_publisher());
    let id = stored_user.id().clone();
    let password = PlainPassword::new("a-brand-new-secret").expect("valid password");

    let error = service
        .update_password(&id, &id, password)
        .await
        .expect_err("mismatch");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), PASSWORD_MISMATCH_MESSAGE);
    assert_eq!(*writes.lock().expect("count lock"), 0);
}

#[rstest]
#[tokio::test]
async fn update_password_still_requires_authorization(stored_user: User) {
    let (repo, _, writes) = stateful_repository(&stored_user);
    let service = make_service(repo, deny_all(), silent_publisher());
    let password = PlainPassword::new(CURRENT_PASSWORD).expect("valid password");

    let error = service
        .update_password(&UserId::random(), stored_user.id(), password)
        .await
        .expect_err("denied");

    assert_eq!(error.message(), UNAUTHORIZED_ACTION_MESSAGE);
    assert_eq!(*writes.lock().expect("count lock"), 0);
}

#[rstest]
#[tokio::test]
async fn request_email_change_keeps_email_and_notifies_current_address(stored_user: User) {
    let (repo, row, writes) = stateful_repository(&stored_user);
    let published = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&published);
    let mut publisher = MockAccountEventPublisher::new();
    publisher.expect_publish().times(1).returning(move |event| {
        sink.lock().expect("events lock").push(event);
        Ok(())
    });
    let service = make_service(repo, allow_all(), publisher);
    let id = stored_user.id().clone();

    let view = service
        .request_email_change(
            &id,
            &id,
            EmailAddress::new("new@x.com").expect("valid email"),
        )
        .await
        .expect("email change requested");

    assert_eq!(view.email.as_str(), "ada@example.org");
    assert_eq!(view.email_update.as_ref().map(EmailAddress::as_str), Some("new@x.com"));
    assert_eq!(*writes.lock().expect("count lock"), 1);

    let events = published.lock().expect("events lock");
    assert_eq!(events.len(), 1);
    let Some(AccountEvent::EmailChangeRequested(event)) = events.first() else {
        panic!("expected an email change event");
    };
    assert_eq!(event.current_email.as_str(), "ada@example.org");
    assert_eq!(event.pending_email.as_str(), "new@x.com");
    let stored_code = row
        .lock()
        .expect("row lock")
        .activation_code()
        .cloned()
        .expect("code stored");
    assert_eq!(event.activation_code, stored_code);
}

#[rstest]
#[tokio::test]
async fn repeated_email_change_regenerates_the_activation_code(stored_user: User) {
    let (repo, row, _) = stateful_repository(&stored_user);
    let mut publisher = MockAccountEventPublisher::new();
    publisher.expect_publish().times(2).returning(|_| Ok(()));
    let service = make_service(repo, allow_all(), publisher);
    let id = stored_user.id().clone();
    let email = EmailAddress::new("new@x.com").expect("valid email");

    let mut codes = Vec::new();
    for _ in 0..2 {
        service
            .request_email_change(&id, &id, email.clone())
            .await
            .expect("email change requested");
        codes.push(row.lock().expect("row lock").activation_code().cloned());
    }
    assert_ne!(codes.first(), codes.last());
}

#[rstest]
#[tokio::test]
async fn publish_failure_does_not_fail_the_request(stored_user: User) {
    let (repo, _, writes) = stateful_repository(&stored_user);
    let mut publisher = MockAccountEventPublisher::new();
    publisher
        .expect_publish()
        .times(1)
        .returning(|_| Err(EventPublishError::closed()));
    let service = make_service(repo, allow_all(), publisher);
    let id = stored_user.id().clone();

    let view = service
        .request_email_change(
            &id,
            &id,
            EmailAddress::new("new@x.com").expect("valid email"),
        )
        .await
        .expect("write committed despite publish failure");
    assert!(view.email_update.is_some());
    assert_eq!(*writes.lock().expect("count lock"), 1);
}

#[rstest]
#[tokio::test]
async fn denied_email_change_publishes_nothing(stored_user: User) {
    let (repo, _, writes) = stateful_repository(&stored_user);
    let service = make_service(repo, deny_all(), silent_publisher());
    let email = EmailAddress::new("new@x.com").expect("valid email");

    let error = service
        .request_email_change(&UserId::random(), stored_user.id(), email)
        .await
        .expect_err("denied");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(*writes.lock().expect("count lock"), 0);
}
