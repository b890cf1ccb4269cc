//! Integration tests for the kickabout service
//!
//! These tests drive the full HTTP router against an in-memory record store:
//! - Player registration, rating and availability workflows
//! - Multi-coach rating aggregation
//! - Team selection under every strength gap
//! - Error reporting for unknown players and store failures

mod fixtures;

use axum::http::{Method, StatusCode};
use kickabout::store::InMemoryRecordStore;
use serde_json::json;
use std::sync::Arc;

use fixtures::{seed_squad, send, team_names, test_app, FailingStore};

fn selection(s1: i64, s2: i64) -> serde_json::Value {
    json!({
        "opponent_1_name": "Strong FC",
        "opponent_2_name": "Weak United",
        "opponent_1_strength": s1,
        "opponent_2_strength": s2,
    })
}

#[tokio::test]
async fn test_complete_matchday_workflow() {
    let (app, _state) = test_app(Arc::new(InMemoryRecordStore::new()));

    // Step 1: Register the squad
    for (name, position) in [("Ana", "forward"), ("Ben", "defender"), ("Cy", "midfielder"), ("Dee", "forward")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/players",
            Some(json!({"name": name, "position": position, "foot": "right", "goalkeeper": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["player"]["name"], name);
    }

    // Step 2: Coaches rate everyone
    for (name, scores) in [("Ana", 9), ("Ben", 7), ("Cy", 5), ("Dee", 3)] {
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/players/{}/ratings", name),
            Some(json!({"coach": "Mo", "attack_skill": scores, "defense_skill": 1,
                        "passing": scores, "attitude": scores, "teamwork": scores})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Rating added for '{}' by Mo", name));
        assert_eq!(body["data"]["coach"], "Mo");
    }

    // Step 3: Everyone is available
    for name in ["Ana", "Ben", "Cy", "Dee"] {
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/players/{}/availability", name),
            Some(json!({"available": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["available"], true);
    }

    // Step 4: Pick teams for an even fixture
    let (status, body) = send(&app, Method::POST, "/select_teams", Some(selection(4, 4))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team_names(&body, "Strong FC"), vec!["Ana", "Cy"]);
    assert_eq!(team_names(&body, "Weak United"), vec!["Ben", "Dee"]);
    // Ana 36, Cy 20
    assert_eq!(body["teams"]["Strong FC"]["average_ability"], 28.0);
    assert_eq!(body["teams"]["Strong FC"]["players"][0]["position"], "forward");
    assert_eq!(body["teams"]["Strong FC"]["players"][0]["goalkeeper"], false);
}

#[tokio::test]
async fn test_average_of_dimensions_not_of_abilities() {
    let (app, _state) = test_app(Arc::new(InMemoryRecordStore::new()));
    send(
        &app,
        Method::POST,
        "/players",
        Some(json!({"name": "Eve", "position": "midfielder", "foot": "both", "goalkeeper": true})),
    )
    .await;

    send(
        &app,
        Method::POST,
        "/players/Eve/ratings",
        Some(json!({"coach": "A", "attack_skill": 10, "defense_skill": 0,
                    "passing": 5, "attitude": 5, "teamwork": 5})),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/players/Eve/ratings",
        Some(json!({"coach": "B", "attack_skill": 0, "defense_skill": 10,
                    "passing": 6, "attitude": 5, "teamwork": 5})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/average_ratings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "attack_skill": 5.0,
            "defense_skill": 5.0,
            "passing": 5.5,
            "attitude": 5.0,
            "teamwork": 5.0,
            "name": "Eve",
            "overall_ability": 20.5,
        }])
    );
}

#[tokio::test]
async fn test_resubmitted_rating_replaces_previous() {
    let store = Arc::new(InMemoryRecordStore::new());
    let (app, _state) = test_app(store.clone());
    send(
        &app,
        Method::POST,
        "/players",
        Some(json!({"name": "Fin", "position": "defender", "foot": "left", "goalkeeper": false})),
    )
    .await;

    let low = json!({"coach": "Mo", "attack_skill": 1, "defense_skill": 1,
                     "passing": 1, "attitude": 1, "teamwork": 1});
    let high = json!({"coach": "Mo", "attack_skill": 9, "defense_skill": 9,
                      "passing": 9, "attitude": 9, "teamwork": 9});

    send(&app, Method::POST, "/players/Fin/ratings", Some(low)).await;
    let (_, body) = send(&app, Method::POST, "/players/Fin/ratings", Some(high)).await;
    assert_eq!(body["message"], "Rating updated for 'Fin' by Mo");
    assert_eq!(store.rating_count().unwrap(), 1);

    let (_, body) = send(&app, Method::GET, "/average_ratings", None).await;
    assert_eq!(body[0]["passing"], 9.0);
    assert_eq!(body[0]["overall_ability"], 36.0);
}

#[tokio::test]
async fn test_lopsided_fixture_gives_stronger_side_the_top_half() {
    let store = Arc::new(InMemoryRecordStore::new());
    seed_squad(&store, &[("C", 6), ("A", 12), ("D", 3), ("B", 9)]).await;
    let (app, _state) = test_app(store);

    let (status, body) = send(&app, Method::POST, "/select_teams", Some(selection(3, 1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team_names(&body, "Strong FC"), vec!["A", "B"]);
    assert_eq!(team_names(&body, "Weak United"), vec!["C", "D"]);

    // Strengths swapped: the second opponent is now the stronger one.
    let (_, body) = send(&app, Method::POST, "/select_teams", Some(selection(1, 5))).await;
    assert_eq!(team_names(&body, "Weak United"), vec!["A", "B"]);
    assert_eq!(team_names(&body, "Strong FC"), vec!["C", "D"]);
}

#[tokio::test]
async fn test_lopsided_fixture_with_odd_squad_assigns_everyone() {
    let store = Arc::new(InMemoryRecordStore::new());
    seed_squad(&store, &[("A", 50), ("B", 40), ("C", 30), ("D", 20), ("E", 10)]).await;
    let (app, _state) = test_app(store);

    let (_, body) = send(&app, Method::POST, "/select_teams", Some(selection(5, 1))).await;
    assert_eq!(team_names(&body, "Strong FC"), vec!["A", "B"]);
    assert_eq!(team_names(&body, "Weak United"), vec!["C", "D", "E"]);
}

#[tokio::test]
async fn test_even_fixture_alternates() {
    let store = Arc::new(InMemoryRecordStore::new());
    seed_squad(&store, &[("P7", 7), ("P10", 10), ("P8", 8), ("P9", 9)]).await;
    let (app, _state) = test_app(store);

    let (_, body) = send(&app, Method::POST, "/select_teams", Some(selection(2, 2))).await;
    assert_eq!(team_names(&body, "Strong FC"), vec!["P10", "P8"]);
    assert_eq!(team_names(&body, "Weak United"), vec!["P9", "P7"]);
    assert_eq!(body["teams"]["Strong FC"]["average_ability"], 9.0);
    assert_eq!(body["teams"]["Weak United"]["average_ability"], 8.0);
}

#[tokio::test]
async fn test_mild_skew_with_six_players() {
    let store = Arc::new(InMemoryRecordStore::new());
    seed_squad(
        &store,
        &[("A", 60), ("B", 50), ("C", 40), ("D", 30), ("E", 20), ("F", 10)],
    )
    .await;
    let (app, _state) = test_app(store);

    let (_, body) = send(&app, Method::POST, "/select_teams", Some(selection(3, 2))).await;
    assert_eq!(team_names(&body, "Strong FC"), vec!["A"]);
    assert_eq!(team_names(&body, "Weak United"), vec!["B", "C", "D", "E", "F"]);
    assert_eq!(body["teams"]["Strong FC"]["average_ability"], 60.0);
    assert_eq!(body["teams"]["Weak United"]["average_ability"], 30.0);
}

#[tokio::test]
async fn test_ties_are_ordered_by_registration() {
    let store = Arc::new(InMemoryRecordStore::new());
    seed_squad(&store, &[("First", 5), ("Second", 5), ("Third", 5), ("Fourth", 5)]).await;
    let (app, _state) = test_app(store);

    let (_, body) = send(&app, Method::POST, "/select_teams", Some(selection(0, 0))).await;
    assert_eq!(team_names(&body, "Strong FC"), vec!["First", "Third"]);
    assert_eq!(team_names(&body, "Weak United"), vec!["Second", "Fourth"]);
}

#[tokio::test]
async fn test_unavailable_players_are_left_out() {
    let store = Arc::new(InMemoryRecordStore::new());
    seed_squad(&store, &[("A", 4), ("B", 3), ("C", 2)]).await;
    let (app, _state) = test_app(store);

    send(
        &app,
        Method::PUT,
        "/players/B/availability",
        Some(json!({"available": false})),
    )
    .await;

    let (_, body) = send(&app, Method::POST, "/select_teams", Some(selection(1, 1))).await;
    assert_eq!(team_names(&body, "Strong FC"), vec!["A"]);
    assert_eq!(team_names(&body, "Weak United"), vec!["C"]);
}

#[tokio::test]
async fn test_empty_results_are_not_errors() {
    let (app, _state) = test_app(Arc::new(InMemoryRecordStore::new()));

    let (status, body) = send(&app, Method::GET, "/average_ratings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::POST, "/select_teams", Some(selection(3, 1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Not enough available players"}));

    send(
        &app,
        Method::POST,
        "/players",
        Some(json!({"name": "Gus", "position": "forward", "foot": "left", "goalkeeper": false})),
    )
    .await;
    send(
        &app,
        Method::PUT,
        "/players/Gus/availability",
        Some(json!({"available": true})),
    )
    .await;

    let (status, body) = send(&app, Method::POST, "/select_teams", Some(selection(3, 1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "No ratings available"}));
}

#[tokio::test]
async fn test_availability_reads_are_idempotent() {
    let (app, _state) = test_app(Arc::new(InMemoryRecordStore::new()));
    send(
        &app,
        Method::POST,
        "/players",
        Some(json!({"name": "Hal", "position": "defender", "foot": "right", "goalkeeper": false})),
    )
    .await;

    let first = send(&app, Method::GET, "/players/Hal/availability", None).await;
    let second = send(&app, Method::GET, "/players/Hal/availability", None).await;
    assert_eq!(first, second);
    assert_eq!(first.1, json!({"player_name": "Hal", "available": false}));
}

#[tokio::test]
async fn test_unknown_player_returns_404() {
    let (app, _state) = test_app(Arc::new(InMemoryRecordStore::new()));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/players/Ghost/availability",
        Some(json!({"available": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Player 'Ghost' not found.");

    let (status, _) = send(&app, Method::GET, "/players/Ghost/availability", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_outage_maps_to_500() {
    let (app, state) = test_app(Arc::new(FailingStore));

    let (status, body) = send(&app, Method::GET, "/players", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Error fetching players: Record store unavailable: store offline"
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/players",
        Some(json!({"name": "Ivy", "position": "forward", "foot": "left", "goalkeeper": false})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Selection failures hide the store detail.
    let (status, body) = send(&app, Method::POST, "/select_teams", Some(selection(1, 1))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error in team selection");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");

    let errors = state
        .metrics()
        .service()
        .store_errors_total
        .with_label_values(&["select_teams"])
        .get();
    assert_eq!(errors, 1);
}

#[tokio::test]
async fn test_identical_opponent_names_rejected() {
    let (app, _state) = test_app(Arc::new(InMemoryRecordStore::new()));

    let (status, _) = send(
        &app,
        Method::POST,
        "/select_teams",
        Some(json!({"opponent_1_name": "Same", "opponent_2_name": "Same",
                    "opponent_1_strength": 1, "opponent_2_strength": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_exposed_after_selection() {
    let store = Arc::new(InMemoryRecordStore::new());
    seed_squad(&store, &[("A", 2), ("B", 1)]).await;
    let (app, state) = test_app(store);

    send(&app, Method::POST, "/select_teams", Some(selection(3, 1))).await;

    let text = kickabout::metrics::render_metrics(&state.metrics()).unwrap();
    assert!(text.contains("kickabout_team_selections_total{strategy=\"lopsided\"} 1"));
    assert!(text.contains("kickabout_selection_pool_size_count 1"));
}
