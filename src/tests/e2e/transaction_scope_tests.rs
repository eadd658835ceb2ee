use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;

use crate::shared::infrastructure::database::Connection;
use crate::shared::infrastructure::database::in_memory::InMemoryConnection;
use crate::shared::infrastructure::registry::RegistryError;
use crate::shared::infrastructure::scoped_connection::{ScopeError, ScopeKey};
use crate::shell::http::router;
use crate::tests::fixtures::application::{TestApplication, test_application};
use crate::tests::fixtures::http::{new_auction_body, post_json};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn a_failing_request_does_not_disturb_a_concurrent_successful_one(
    test_application: TestApplication,
) {
    let app = router(test_application.state.clone());
    let baseline = test_application.database.open_connections();

    let succeeding = tokio::spawn(
        app.clone()
            .oneshot(post_json("/auctions", new_auction_body("Brass lamp", 1_000))),
    );
    let failing = tokio::spawn(app.clone().oneshot(post_json(
        "/auctions/missing/bids",
        json!({ "bidder_id": "bidder-1", "amount": 1_500 }),
    )));

    let succeeded = succeeding.await.unwrap().unwrap();
    let failed = failing.await.unwrap().unwrap();

    assert_eq!(succeeded.status(), StatusCode::CREATED);
    assert_eq!(failed.status(), StatusCode::NOT_FOUND);
    assert_eq!(test_application.database.commits(), 1);
    assert_eq!(test_application.database.rollbacks(), 1);
    assert_eq!(test_application.database.open_connections(), baseline);
    assert_eq!(test_application.connections.active_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn sequential_scopes_resolve_different_connections(test_application: TestApplication) {
    let hooks = &test_application.state.transactions;
    let registry = &test_application.state.registry;
    let mut seen = Vec::new();

    for _ in 0..2 {
        let scope = ScopeKey::new();
        let transaction = hooks.before_dispatch(scope).await.unwrap();
        let resolved: InMemoryConnection = registry.resolve(scope).unwrap();
        assert_eq!(resolved.id(), transaction.connection().id());
        seen.push(resolved.id());
        hooks
            .after_dispatch(scope, Some(transaction), StatusCode::OK)
            .await
            .unwrap();
    }

    assert_ne!(seen[0], seen[1]);
    assert_eq!(test_application.database.commits(), 2);
}

#[rstest]
#[tokio::test]
async fn a_released_scope_no_longer_resolves_a_connection(test_application: TestApplication) {
    let hooks = &test_application.state.transactions;
    let scope = ScopeKey::new();
    let transaction = hooks.before_dispatch(scope).await.unwrap();
    hooks
        .after_dispatch(scope, Some(transaction), StatusCode::OK)
        .await
        .unwrap();

    let result = test_application
        .state
        .registry
        .resolve::<InMemoryConnection>(scope);

    assert!(matches!(
        result,
        Err(RegistryError::Scope(ScopeError::NoActiveConnection(unbound))) if unbound == scope
    ));
}
