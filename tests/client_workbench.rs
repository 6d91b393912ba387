mod helpers;

use blog_summarizer::{
    api::routes::create_router,
    client::{ApiClient, BlogBackend, ClientError},
    history::HistoryStore,
    workbench::{Phase, Workbench},
};
use tokio::net::TcpListener;
use wiremock::MockServer;

/// Serves the real router on an ephemeral port and returns its base URL.
async fn spawn_server(test_app: &helpers::TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(test_app.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn workbench_round_trip_through_the_api() {
    let upstream = MockServer::start().await;
    helpers::mount_blog(&upstream, "/one").await;
    helpers::mount_blog(&upstream, "/two").await;
    helpers::mount_gemini(&upstream).await;
    let test_app = helpers::test_state(helpers::test_config(&upstream.uri(), &[]));
    let client = ApiClient::new(spawn_server(&test_app).await);

    let mut bench = Workbench::new();
    bench.set_input(format!("{}/one", upstream.uri()));
    assert!(bench.submit(&client).await);
    bench.set_input(format!("{}/two", upstream.uri()));
    assert!(bench.submit(&client).await);

    assert_eq!(bench.phase(), Phase::Idle);
    let current = bench.current().cloned().unwrap();
    assert!(current.url.ends_with("/two"));
    assert_eq!(current.summary, helpers::SUMMARY);
    assert_eq!(current.urdu_translation, helpers::URDU);

    // Local view and server view agree on content and order.
    let mut fresh = Workbench::new();
    fresh.refresh(&client).await;
    assert_eq!(fresh.history(), bench.history());

    bench.delete(&client, current.id).await;
    assert!(bench.current().is_none());
    assert_eq!(test_app.history.list().await.unwrap().len(), 1);

    bench.clear_all(&client).await;
    assert!(bench.history().is_empty());
    assert!(test_app.history.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_summarize_leaves_workbench_idle() {
    let upstream = MockServer::start().await;
    let test_app = helpers::test_state(helpers::test_config(&upstream.uri(), &[]));
    let client = ApiClient::new(spawn_server(&test_app).await);

    let err = client
        .summarize(&format!("{}/nothing-here", upstream.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));

    let mut bench = Workbench::new();
    bench.set_input(format!("{}/nothing-here", upstream.uri()));
    assert!(bench.submit(&client).await);
    assert_eq!(bench.phase(), Phase::Idle);
    assert!(bench.history().is_empty());
    assert!(bench.current().is_none());
}

#[tokio::test]
async fn save_blog_returns_the_archive_id() {
    let upstream = MockServer::start().await;
    let test_app = helpers::test_state(helpers::test_config(&upstream.uri(), &[]));
    let client = ApiClient::new(spawn_server(&test_app).await);

    let first = client.save_blog("https://a.dev", "text one").await.unwrap();
    let second = client.save_blog("https://b.dev", "text two").await.unwrap();

    assert_eq!((first, second), (1, 2));
    assert_eq!(test_app.archive.snapshot().unwrap().len(), 2);
}
