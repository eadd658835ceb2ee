use axum::Router;
use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;

use crate::modules::auctions::adapters::outbound::auctions_repository::AUCTIONS_TABLE;
use crate::shell::http::router;
use crate::tests::fixtures::application::{TestApplication, test_application};
use crate::tests::fixtures::http::{get, new_auction_body, post_json, post_raw, read_json};

async fn create_auction(app: &Router, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/auctions", new_auction_body(title, 1_000)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["auction_id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[rstest]
#[tokio::test]
async fn creating_an_auction_commits_once_and_returns_the_connection(
    test_application: TestApplication,
) {
    let app = router(test_application.state.clone());
    let baseline = test_application.database.open_connections();

    let auction_id = create_auction(&app, "Brass lamp").await;

    assert_eq!(test_application.database.commits(), 1);
    assert_eq!(test_application.database.open_connections(), baseline);
    assert_eq!(test_application.connections.active_scopes(), 0);
    let row = test_application
        .database
        .committed(AUCTIONS_TABLE, &auction_id)
        .await
        .unwrap();
    assert_eq!(row["title"], "Brass lamp");
}

#[rstest]
#[tokio::test]
async fn bidding_updates_the_auction_and_notifies_the_overbid_bidder(
    test_application: TestApplication,
) {
    let app = router(test_application.state.clone());
    let auction_id = create_auction(&app, "Brass lamp").await;
    let bids = format!("/auctions/{auction_id}/bids");

    for (bidder_id, amount) in [("bidder-1", 1_500), ("bidder-2", 2_000)] {
        let response = app
            .clone()
            .oneshot(post_json(
                &bids,
                json!({ "bidder_id": bidder_id, "amount": amount }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/auctions/{auction_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view = read_json(response).await;
    assert_eq!(view["current_price"], 2_000);
    assert_eq!(view["bid_count"], 2);
    assert_eq!(view["winner"], "bidder-2");

    let response = app.clone().oneshot(get("/auctions")).await.unwrap();
    let listed = read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let emails = test_application.customer_relationship.outbox.lock().await;
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, "bidder-1");
}

#[rstest]
#[tokio::test]
async fn a_rejected_bid_leaves_the_auction_untouched(test_application: TestApplication) {
    let app = router(test_application.state.clone());
    let auction_id = create_auction(&app, "Brass lamp").await;
    let commits = test_application.database.commits();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/auctions/{auction_id}/bids"),
            json!({ "bidder_id": "bidder-1", "amount": 10 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(test_application.database.commits(), commits);
    assert_eq!(test_application.database.rollbacks(), 1);
    assert_eq!(test_application.database.open_connections(), 0);
    let row = test_application
        .database
        .committed(AUCTIONS_TABLE, &auction_id)
        .await
        .unwrap();
    assert_eq!(row["bids"], json!([]));
}

#[rstest]
#[tokio::test]
async fn an_unknown_auction_is_not_found(test_application: TestApplication) {
    let app = router(test_application.state.clone());

    let response = app.clone().oneshot(get("/auctions/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(post_json(
            "/auctions/missing/bids",
            json!({ "bidder_id": "bidder-1", "amount": 1_500 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(test_application.database.commits(), 0);
    assert_eq!(test_application.database.open_connections(), 0);
}

#[rstest]
#[tokio::test]
async fn a_malformed_body_is_unprocessable(test_application: TestApplication) {
    let app = router(test_application.state.clone());

    let response = app
        .oneshot(post_raw("/auctions", "{\"title\": 12}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(test_application.database.commits(), 0);
    assert_eq!(test_application.database.rollbacks(), 1);
}

#[rstest]
#[tokio::test]
async fn an_offline_database_answers_service_unavailable(test_application: TestApplication) {
    test_application.database.toggle_offline();
    let app = router(test_application.state.clone());

    let response = app.oneshot(get("/auctions")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(test_application.connections.active_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn a_failed_commit_answers_500_and_persists_nothing(test_application: TestApplication) {
    test_application.database.toggle_failing_commits();
    let app = router(test_application.state.clone());

    let response = app
        .oneshot(post_json("/auctions", new_auction_body("Brass lamp", 1_000)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test_application.database.open_connections(), 0);
    assert_eq!(test_application.connections.active_scopes(), 0);
}
