//! Synchronizer behaviour against a mocked users API.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::client::api::MockUsersApi;
use crate::client::table::{FieldChanges, RowMode};
use crate::test_support::MutableClock;

fn jo() -> UserRecord {
    UserRecord {
        id: "a".into(),
        fields: UserFields::new("Jo", "Li", "jo@x.com"),
    }
}

fn mo() -> UserRecord {
    UserRecord {
        id: "b".into(),
        fields: UserFields::new("Mo", "Ng", "mo@x.com"),
    }
}

fn rejected(status: u16, message: &str) -> ApiFailure {
    ApiFailure::Rejected {
        status,
        message: message.to_owned(),
        trace_id: None,
    }
}

#[fixture]
fn clock() -> MutableClock {
    MutableClock::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("fixed instant"),
    )
}

fn listing(api: &mut MockUsersApi, users: Vec<UserRecord>) {
    api.expect_list_users().return_once(move || Ok(users));
}

/// Load rows `a` and `b`, then hand further calls to `api`.
async fn loaded(api: MockUsersApi, clock: MutableClock) -> Synchronizer<MockUsersApi, MutableClock> {
    let mut initial = MockUsersApi::new();
    listing(&mut initial, vec![jo(), mo()]);
    let mut sync = Synchronizer::new(initial, clock);
    assert_eq!(sync.refresh().await, Outcome::Applied);
    sync.api = api;
    sync
}

fn banner_text(sync: &Synchronizer<MockUsersApi, MutableClock>) -> Option<(BannerKind, &str)> {
    sync.banner()
        .map(|banner| (banner.kind, banner.message.as_str()))
}

#[rstest]
#[tokio::test]
async fn refresh_projects_server_rows(clock: MutableClock) {
    let sync = loaded(MockUsersApi::new(), clock).await;
    let ids: Vec<_> = sync.table().rows().iter().map(|row| row.id()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert!(sync.banner().is_none());
}

#[rstest]
#[tokio::test]
async fn refresh_failure_keeps_rows_and_reports(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_list_users()
        .return_once(|| Err(ApiFailure::Transport("connection refused".into())));
    let mut sync = loaded(api, clock).await;

    assert_eq!(sync.refresh().await, Outcome::Failed);
    assert_eq!(sync.table().rows().len(), 2);
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Failure, "request failed: connection refused"))
    );
}

#[rstest]
#[tokio::test]
async fn add_is_checked_locally_first(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_create_user().times(0);
    let mut sync = Synchronizer::new(api, clock);
    sync.set_form_field(Field::FirstName, "J");
    sync.set_form_field(Field::LastName, "Li");
    sync.set_form_field(Field::Email, "jo@x.com");

    assert_eq!(sync.add().await, Outcome::Failed);
    assert_eq!(
        banner_text(&sync),
        Some((
            BannerKind::Failure,
            "First name must be between 2 and 32 characters"
        ))
    );
    assert_eq!(sync.form().firstname, "J");
}

#[rstest]
#[tokio::test]
async fn add_clears_form_and_refetches(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_create_user()
        .withf(|fields| *fields == UserFields::new("Jo", "Li", "jo@x.com"))
        .return_once(|_| Ok(jo()));
    listing(&mut api, vec![jo()]);
    let mut sync = Synchronizer::new(api, clock);
    sync.set_form_field(Field::FirstName, "Jo");
    sync.set_form_field(Field::LastName, "Li");
    sync.set_form_field(Field::Email, "jo@x.com");

    assert_eq!(sync.add().await, Outcome::Applied);
    assert_eq!(sync.form(), &UserFields::default());
    assert_eq!(sync.table().rows().len(), 1);
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Success, ADDED_MESSAGE))
    );
}

#[rstest]
#[tokio::test]
async fn add_surfaces_server_message(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_create_user()
        .return_once(|_| Err(rejected(409, "User already exists")));
    api.expect_list_users().times(0);
    let mut sync = Synchronizer::new(api, clock);
    sync.set_form_field(Field::FirstName, "Jo");
    sync.set_form_field(Field::LastName, "Li");
    sync.set_form_field(Field::Email, "jo@x.com");

    assert_eq!(sync.add().await, Outcome::Failed);
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Failure, "User already exists"))
    );
    assert_eq!(sync.form().email, "jo@x.com");
}

#[rstest]
#[tokio::test]
async fn banner_clears_after_three_seconds(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_get_user()
        .return_once(|_| Err(rejected(404, "User does not exist")));
    let mut sync = Synchronizer::new(api, clock.clone());

    assert_eq!(sync.select("a").await, Outcome::Failed);
    clock.advance(Duration::from_millis(2_999));
    assert!(sync.banner().is_some());
    clock.advance(Duration::from_millis(1));
    assert!(sync.banner().is_none());
}

#[rstest]
#[tokio::test]
async fn unchanged_commit_sends_nothing(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_update_user().times(0);
    let mut sync = loaded(api, clock).await;
    sync.begin_edit("a");
    sync.input("a", Field::FirstName, "Jo");

    assert_eq!(sync.commit().await, Outcome::Unchanged);
    assert_eq!(sync.table().mode("a"), RowMode::View);
}

#[rstest]
#[tokio::test]
async fn commit_without_edit_is_a_no_op(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_update_user().times(0);
    let mut sync = loaded(api, clock).await;
    assert_eq!(sync.commit().await, Outcome::Unchanged);
}

#[rstest]
#[tokio::test]
async fn commit_sends_only_changed_fields(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_update_user()
        .withf(|id, changes| {
            id.to_string() == "a"
                && *changes
                    == FieldChanges {
                        firstname: Some("Jon".into()),
                        ..FieldChanges::default()
                    }
        })
        .times(1)
        .return_once(|_, _| {
            let mut updated = jo();
            updated.fields.firstname = "Jon".into();
            Ok(updated)
        });
    let mut refreshed = jo();
    refreshed.fields.firstname = "Jon".into();
    listing(&mut api, vec![refreshed, mo()]);
    let mut sync = loaded(api, clock).await;
    sync.begin_edit("a");
    sync.input("a", Field::FirstName, "Jon");

    assert_eq!(sync.commit().await, Outcome::Applied);
    let row = sync.table().row("a").expect("row a");
    assert_eq!(row.saved().firstname, "Jon");
    assert_eq!(row.saved().email, "jo@x.com");
    assert_eq!(sync.table().mode("a"), RowMode::View);
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Success, UPDATED_MESSAGE))
    );
}

#[rstest]
#[tokio::test]
async fn rejected_commit_stays_in_edit(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_update_user()
        .return_once(|_, _| Err(rejected(409, "User already exists")));
    let mut sync = loaded(api, clock).await;
    sync.begin_edit("a");
    sync.input("a", Field::Email, "mo@x.com");

    assert_eq!(sync.commit().await, Outcome::Failed);
    assert_eq!(sync.table().mode("a"), RowMode::Edit);
    let row = sync.table().row("a").expect("row a");
    assert_eq!(row.draft().email, "mo@x.com");
    assert_eq!(row.saved().email, "jo@x.com");
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Failure, "User already exists"))
    );
}

#[rstest]
#[tokio::test]
async fn invalid_draft_is_not_sent(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_update_user().times(0);
    let mut sync = loaded(api, clock).await;
    sync.begin_edit("b");
    sync.input("b", Field::Email, "mo.x.com");

    assert_eq!(sync.commit().await, Outcome::Failed);
    assert_eq!(sync.table().mode("b"), RowMode::Edit);
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Failure, "Email not valid"))
    );
}

#[rstest]
#[tokio::test]
async fn switching_rows_discards_pending_input(clock: MutableClock) {
    let mut sync = loaded(MockUsersApi::new(), clock).await;
    sync.begin_edit("a");
    sync.input("a", Field::LastName, "Lu");
    sync.begin_edit("b");

    assert_eq!(sync.table().editing(), Some("b"));
    assert_eq!(sync.table().row("a").expect("row a").draft().lastname, "Li");
}

#[rstest]
#[tokio::test]
async fn delete_removes_row_and_names_email(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_get_user().return_once(|_| Ok(jo()));
    api.expect_delete_user()
        .withf(|id| id.to_string() == "a")
        .return_once(|_| Ok(jo()));
    let mut sync = loaded(api, clock).await;
    assert_eq!(sync.select("a").await, Outcome::Applied);

    assert_eq!(sync.delete("a").await, Outcome::Applied);
    assert!(sync.table().row("a").is_none());
    assert!(sync.details().is_none());
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Success, "User with email jo@x.com was deleted"))
    );
}

#[rstest]
#[tokio::test]
async fn failed_delete_keeps_row(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_delete_user()
        .return_once(|_| Err(rejected(404, "User does not exist")));
    let mut sync = loaded(api, clock).await;

    assert_eq!(sync.delete("a").await, Outcome::Failed);
    assert!(sync.table().row("a").is_some());
    assert_eq!(
        banner_text(&sync),
        Some((BannerKind::Failure, "User does not exist"))
    );
}

#[rstest]
#[tokio::test]
async fn select_fills_and_clear_empties_details(clock: MutableClock) {
    let mut api = MockUsersApi::new();
    api.expect_get_user()
        .withf(|id| id.to_string() == "b")
        .return_once(|_| Ok(mo()));
    let mut sync = Synchronizer::new(api, clock);

    assert_eq!(sync.select("b").await, Outcome::Applied);
    assert_eq!(sync.details(), Some(&mo()));
    sync.clear_details();
    assert!(sync.details().is_none());
}
