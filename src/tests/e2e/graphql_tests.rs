use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;

use crate::shell::graphql::ENDPOINT;
use crate::shell::http::router;
use crate::tests::fixtures::application::{TestApplication, test_application};
use crate::tests::fixtures::http::{new_auction_body, post_json, read_json};

#[rstest]
#[tokio::test]
async fn lists_active_auctions_through_graphql(test_application: TestApplication) {
    let app = router(test_application.state.clone());
    let response = app
        .clone()
        .oneshot(post_json("/auctions", new_auction_body("Brass lamp", 1_000)))
        .await
        .unwrap();
    let auction_id = read_json(response).await["auction_id"].clone();

    let response = app
        .clone()
        .oneshot(post_json(
            ENDPOINT,
            json!({ "query": "{ activeAuctions { id title currentPrice bidCount winner } }" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let auctions = &body["data"]["activeAuctions"];
    assert_eq!(auctions.as_array().unwrap().len(), 1);
    assert_eq!(auctions[0]["id"], auction_id);
    assert_eq!(auctions[0]["title"], "Brass lamp");
    assert_eq!(auctions[0]["currentPrice"], 1_000);
    assert_eq!(auctions[0]["bidCount"], 0);
    assert!(auctions[0]["winner"].is_null());
    assert_eq!(test_application.connections.active_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn resolves_a_missing_auction_to_null(test_application: TestApplication) {
    let app = router(test_application.state.clone());

    let response = app
        .oneshot(post_json(
            ENDPOINT,
            json!({ "query": "{ auction(id: \"missing\") { id } }" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["data"]["auction"].is_null());
    assert!(body.get("errors").is_none());
}
