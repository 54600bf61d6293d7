mod common;
use axum::http::StatusCode;

use crate::common::{Action, Flow, body_json, setup_server};

#[tokio::test]
async fn route_levels_list_test() {
    let (server, clock) = setup_server();

    Flow::new()
        .step(
            Action::new("levels_list", "GET", "/api/v1/levels").assert_body(|body| {
                let body = body_json(body);
                let levels = body["levels"].as_array().expect("levels is not an array");
                assert_eq!(levels.len(), 2);

                assert_eq!(levels[0]["title"], "Learn SAR");
                assert_eq!(levels[0]["unlocked"], true);
                assert_eq!(levels[0]["progress"], 0);
                assert_eq!(levels[0]["has_mini_game"], false);

                assert_eq!(levels[1]["title"], "Flood Expert");
                assert_eq!(levels[1]["unlocked"], false);
                assert_eq!(levels[1]["segments"].as_array().unwrap().len(), 3);
                assert_eq!(levels[1]["has_mini_game"], true);

                assert_eq!(body["badges"].as_array().unwrap().len(), 0);
            }),
        )
        .run(&server, &clock)
        .await;
}

#[tokio::test]
async fn route_levels_get_test() {
    let (server, clock) = setup_server();

    Flow::new()
        .step(
            Action::new("level_get", "GET", "/api/v1/levels/2").assert_body(|body| {
                let level = body_json(body);
                assert_eq!(level["id"], 2);
                assert_eq!(level["badge"], "Flood Explorer");
                assert_eq!(level["questions"], 3);
            }),
        )
        // unknown level
        .step(
            Action::new("level_get_missing", "GET", "/api/v1/levels/42")
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| assert!(body.contains("resource not found"))),
        )
        .run(&server, &clock)
        .await;
}
