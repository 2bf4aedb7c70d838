//! The synchronizer driving a live server over HTTP.

use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;

use user_directory::Trace;
use user_directory::client::{
    BannerKind, Field, HttpUsersApi, Outcome, RowMode, Synchronizer,
};
use user_directory::inbound::http::error::json_config;
use user_directory::inbound::http::users::configure;
use user_directory::test_support::{InMemoryUserRepository, http_state_with};

/// Start a server on an ephemeral port and return its base URL.
fn spawn_server(repository: InMemoryUserRepository) -> (String, actix_web::dev::ServerHandle) {
    let state = web::Data::new(http_state_with(repository));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .wrap(Trace)
            .service(web::scope("/api").configure(configure))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind ephemeral port");
    let addr = server.addrs()[0];
    let running = server.run();
    let handle = running.handle();
    actix_web::rt::spawn(running);
    (format!("http://{addr}"), handle)
}

fn banner(sync: &Synchronizer<HttpUsersApi, DefaultClock>) -> (BannerKind, String) {
    let banner = sync.banner().expect("banner shown");
    (banner.kind, banner.message.clone())
}

#[actix_web::test]
async fn add_edit_select_and_delete_against_a_server() {
    let repository = InMemoryUserRepository::new();
    let (base_url, handle) = spawn_server(repository.clone());
    let api = HttpUsersApi::new(&base_url).expect("client");
    let mut sync = Synchronizer::new(api, DefaultClock);

    assert_eq!(sync.refresh().await, Outcome::Applied);
    assert!(sync.table().rows().is_empty());

    sync.set_form_field(Field::FirstName, "Jo");
    sync.set_form_field(Field::LastName, "Li");
    sync.set_form_field(Field::Email, "Jo@X.com");
    assert_eq!(sync.add().await, Outcome::Applied);
    assert_eq!(
        banner(&sync),
        (BannerKind::Success, "User added successfully".to_owned())
    );
    let id = sync.table().rows()[0].id().to_owned();
    assert_eq!(sync.table().rows()[0].saved().email, "jo@x.com");

    sync.begin_edit(id.clone());
    sync.input(id.clone(), Field::FirstName, "Jon");
    assert_eq!(sync.commit().await, Outcome::Applied);
    assert_eq!(sync.table().mode(&id), RowMode::View);
    assert_eq!(repository.users()[0].firstname().as_ref(), "Jon");

    assert_eq!(sync.select(&id).await, Outcome::Applied);
    assert_eq!(sync.details().map(|user| user.fields.lastname.as_str()), Some("Li"));

    assert_eq!(sync.delete(&id).await, Outcome::Applied);
    assert!(sync.table().rows().is_empty());
    assert!(sync.details().is_none());
    assert_eq!(
        banner(&sync),
        (BannerKind::Success, "User with email jo@x.com was deleted".to_owned())
    );

    assert_eq!(sync.delete(&id).await, Outcome::Failed);
    assert_eq!(
        banner(&sync),
        (BannerKind::Failure, "User does not exist".to_owned())
    );

    handle.stop(true).await;
}

#[actix_web::test]
async fn server_rejections_surface_verbatim() {
    let (base_url, handle) = spawn_server(InMemoryUserRepository::new());
    let mut sync = Synchronizer::new(HttpUsersApi::new(&base_url).expect("client"), DefaultClock);

    for _ in 0..2 {
        sync.set_form_field(Field::FirstName, "Jo");
        sync.set_form_field(Field::LastName, "Li");
        sync.set_form_field(Field::Email, "jo@x.com");
        sync.add().await;
    }
    assert_eq!(
        banner(&sync),
        (BannerKind::Failure, "User already exists".to_owned())
    );
    assert_eq!(sync.table().rows().len(), 1);

    assert_eq!(sync.select("not-an-id").await, Outcome::Failed);
    assert_eq!(
        banner(&sync),
        (BannerKind::Failure, "Not a valid user id".to_owned())
    );

    handle.stop(true).await;
}
