use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use party_scoreboard::{
    config::{AppConfig, FinalizePolicy},
    routes,
    state::AppState,
};

fn app_with(config: AppConfig) -> Router {
    routes::router(AppState::new(config))
}

fn app() -> Router {
    app_with(AppConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn participant<'a>(snapshot: &'a Value, id: &str) -> &'a Value {
    snapshot["participants"]
        .as_array()
        .expect("participants array")
        .iter()
        .find(|p| p["id"] == id)
        .expect("participant present")
}

#[tokio::test]
async fn state_starts_in_lobby_with_seed_teams() {
    let app = app();
    let (status, state) = send(&app, "GET", "/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["mode"], "lobby");
    assert_eq!(state["currentGame"], Value::Null);
    let names: Vec<&str> = state["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Team Alpha", "Team Beta", "Team Gamma", "Team Delta"]);
}

#[tokio::test]
async fn score_finalize_reset_scenario() {
    let app = app();
    let (status, added) = send(
        &app,
        "POST",
        "/admin/participants",
        Some(json!({ "name": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let a = added["id"].as_str().unwrap().to_string();
    let (_, added_b) = send(
        &app,
        "POST",
        "/admin/participants",
        Some(json!({ "name": "B" })),
    )
    .await;
    assert_ne!(added_b["id"], added["id"]);

    let (status, response) = send(
        &app,
        "POST",
        "/admin/score",
        Some(json!({
            "participantId": a,
            "points": 10,
            "reason": "correct",
            "gameType": "karaoke"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["applied"], true);
    assert_eq!(response["participant"]["currentScore"], 10);
    assert_eq!(response["participant"]["gameScores"]["karaoke"], 10);

    let (status, snapshot) = send(&app, "POST", "/operator/finalize", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(participant(&snapshot, &a)["totalScore"], 10);
    assert_eq!(participant(&snapshot, &a)["currentScore"], 0);

    let (_, snapshot) = send(&app, "POST", "/operator/reset", None).await;
    assert_eq!(participant(&snapshot, &a)["totalScore"], 0);
    assert_eq!(participant(&snapshot, &a)["gameScores"]["karaoke"], 10);
    assert_eq!(snapshot["mode"], "lobby");
}

#[tokio::test]
async fn blank_participant_name_is_rejected() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/admin/participants",
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, state) = send(&app, "GET", "/state", None).await;
    assert_eq!(state["participants"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unparsable_points_count_as_zero() {
    let app = app();
    let (status, response) = send(
        &app,
        "POST",
        "/admin/score",
        Some(json!({ "participantId": "1", "points": "ten", "reason": "typo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["participant"]["currentScore"], 0);
}

#[tokio::test]
async fn huge_points_saturate_and_still_notify() {
    let app = app();
    for _ in 0..2 {
        let (status, response) = send(
            &app,
            "POST",
            "/admin/score",
            Some(json!({
                "participantId": "1",
                "points": i64::MAX,
                "reason": "jackpot",
                "gameType": "karaoke"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["participant"]["currentScore"], i64::MAX);
    }

    let (_, notification) = send(&app, "GET", "/notification", None).await;
    assert_eq!(notification["notification"]["reason"], "jackpot");

    let (status, snapshot) = send(&app, "POST", "/operator/finalize", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(participant(&snapshot, "1")["totalScore"], i64::MAX);
}

#[tokio::test]
async fn unknown_participant_still_raises_notification() {
    let app = app();
    let (status, response) = send(
        &app,
        "POST",
        "/admin/score/preset",
        Some(json!({ "participantId": "ghost", "preset": "bonus" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["applied"], false);

    let (_, notification) = send(&app, "GET", "/notification", None).await;
    let notice = &notification["notification"];
    assert_eq!(notice["participantName"], "Unknown");
    assert_eq!(notice["participantId"], "ghost");
    assert_eq!(notice["points"], 5);
    assert_eq!(notice["reason"], "Bonus");
    assert_eq!(notice["gameType"], "karaoke");

    let (_, dismissed) = send(&app, "POST", "/notification/dismiss", None).await;
    assert_eq!(dismissed["dismissed"], true);
    let (_, notification) = send(&app, "GET", "/notification", None).await;
    assert_eq!(notification["notification"], Value::Null);
}

#[tokio::test]
async fn operator_view_ranks_round_scores_and_gates_media() {
    let app = app();
    send(
        &app,
        "POST",
        "/operator/mode",
        Some(json!({ "mode": "guessLyrics" })),
    )
    .await;
    for (id, points) in [("2", 5), ("3", 8), ("1", 5)] {
        send(
            &app,
            "POST",
            "/admin/score",
            Some(json!({ "participantId": id, "points": points })),
        )
        .await;
    }
    send(
        &app,
        "PUT",
        "/admin/media",
        Some(json!({ "kind": "music", "url": "/assets/music/1-song.mp3" })),
    )
    .await;

    let (_, view) = send(&app, "GET", "/operator/view", None).await;
    assert_eq!(view["title"], "Guess the Lyrics!");
    assert_eq!(view["media"]["url"], "/assets/music/1-song.mp3");

    send(&app, "POST", "/admin/mode", Some(json!({ "mode": "scores" }))).await;
    let (_, view) = send(&app, "GET", "/operator/view", None).await;
    assert_eq!(view["subtitle"], "GUESSLYRICS Results");
    assert_eq!(view["media"], Value::Null);
    let order: Vec<&str> = view["scoreboard"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(order, ["3", "1", "2", "4"]);

    let (_, admin) = send(&app, "GET", "/admin/view", None).await;
    assert_eq!(admin["scoringGame"], "guessLyrics");
    assert_eq!(admin["selectedMedia"]["kind"], "music");
}

#[tokio::test]
async fn reject_repeat_policy_returns_conflict() {
    let app = app_with(AppConfig::default().with_finalize_policy(FinalizePolicy::RejectRepeat));
    let (status, _) = send(&app, "POST", "/admin/finalize", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/admin/finalize", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already been finalized"));
}

#[tokio::test]
async fn fullscreen_toggles_and_participants_can_be_removed() {
    let app = app();
    let (_, snapshot) = send(&app, "POST", "/operator/fullscreen", None).await;
    assert_eq!(snapshot["isFullscreen"], true);

    let (status, _) = send(&app, "DELETE", "/admin/participants/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", "/admin/participants/unknown", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, state) = send(&app, "GET", "/state", None).await;
    assert_eq!(state["participants"].as_array().unwrap().len(), 3);
    assert_eq!(state["isFullscreen"], true);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let (status, doc) = send(&app, "GET", "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/admin/score"].is_object());
    assert!(doc["paths"]["/upload"].is_object());
}
