use axum::http::StatusCode;
use chrono::DateTime;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use timetable_api::config::ApiConfig;
use timetable_core::models::day::DayOfWeek;

use crate::test_utils::{cell, entry, scenario, TestContext};

fn cell_entry_ids(view: &Value, row: usize, column: usize) -> Vec<String> {
    view["grid"]["rows"][row]["cells"][column]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_timetable_builds_grid() {
    let ctx = TestContext::new();
    let (status, body) = ctx.post("/api/timetables", scenario("read_only")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mode"], "read_only");
    assert_eq!(body["isDirty"], false);
    assert_eq!(body["entryCount"], 2);
    assert_eq!(body["drag"], Value::Null);
    assert_eq!(body["grid"]["days"], json!(["monday", "tuesday", "wednesday"]));

    let rows = body["grid"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["slotKey"], "08:00-09:00");
    assert_eq!(rows[1]["slotKey"], "09:00-09:15");

    assert_eq!(cell_entry_ids(&body, 0, 0), vec!["math"]);
    assert_eq!(cell_entry_ids(&body, 0, 1), vec!["art"]);
    assert_eq!(rows[0]["cells"][2]["isEmpty"], true);
    assert_eq!(rows[1]["cells"][0]["breakSlot"]["startTime"], "09:00");
}

#[tokio::test]
async fn test_create_timetable_defaults_to_configured_days() {
    let config = ApiConfig {
        active_days: vec![DayOfWeek::Monday, DayOfWeek::Saturday],
        ..ApiConfig::default()
    };
    let ctx = TestContext::with_config(config);

    let (status, body) = ctx.post("/api/timetables", json!({})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["grid"]["days"], json!(["monday", "saturday"]));
    assert_eq!(body["grid"]["rows"], json!([]));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let ctx = TestContext::new();
    let (status, body) = ctx
        .get("/api/timetables/00000000-0000-0000-0000-000000000000")
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Resource not found"));
}

#[tokio::test]
async fn test_read_only_refuses_drag() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("read_only")).await;

    let (status, body) = ctx
        .post(&format!("/api/timetables/{}/drag/start", id), json!({ "entryId": "math" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepted"], false);
}

#[tokio::test]
async fn test_drop_on_occupied_cell_swaps() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;

    let (_, started) = ctx
        .post(&format!("/api/timetables/{}/drag/start", id), json!({ "entryId": "math" }))
        .await;
    assert_eq!(started["accepted"], true);

    let (_, entered) = ctx
        .post(&format!("/api/timetables/{}/drag/enter", id), cell("tuesday", "08:00-09:00"))
        .await;
    assert_eq!(entered["accepted"], true);

    let (_, view) = ctx.get(&format!("/api/timetables/{}", id)).await;
    assert_eq!(
        view["drag"],
        json!({ "entryId": "math", "hovered": { "day": "tuesday", "slotKey": "08:00-09:00" } })
    );

    let (status, dropped) = ctx
        .post(&format!("/api/timetables/{}/drop", id), cell("tuesday", "08:00-09:00"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dropped["placement"]["dragged"]["dayOfWeek"], "tuesday");
    assert_eq!(dropped["placement"]["occupant"]["id"], "art");
    assert_eq!(dropped["placement"]["occupant"]["dayOfWeek"], "monday");
    assert_eq!(dropped["placement"]["vacated"]["dayOfWeek"], "monday");

    let timetable = &dropped["timetable"];
    assert_eq!(timetable["isDirty"], true);
    assert_eq!(timetable["drag"], Value::Null);
    assert_eq!(cell_entry_ids(timetable, 0, 0), vec!["art"]);
    assert_eq!(cell_entry_ids(timetable, 0, 1), vec!["math"]);
}

#[tokio::test]
async fn test_drop_on_empty_cell_moves() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;

    ctx.post(&format!("/api/timetables/{}/drag/start", id), json!({ "entryId": "art" }))
        .await;
    let (_, dropped) = ctx
        .post(&format!("/api/timetables/{}/drop", id), cell("wednesday", "08:00-09:00"))
        .await;

    assert_eq!(dropped["placement"]["occupant"], Value::Null);
    assert_eq!(cell_entry_ids(&dropped["timetable"], 0, 1), Vec::<String>::new());
    assert_eq!(cell_entry_ids(&dropped["timetable"], 0, 2), vec!["art"]);
}

#[tokio::test]
async fn test_drop_on_break_is_ignored() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;

    ctx.post(&format!("/api/timetables/{}/drag/start", id), json!({ "entryId": "math" }))
        .await;
    let (status, dropped) = ctx
        .post(&format!("/api/timetables/{}/drop", id), cell("monday", "09:00-09:15"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dropped["placement"], Value::Null);
    assert_eq!(dropped["timetable"]["isDirty"], false);
    assert_eq!(dropped["timetable"]["drag"], Value::Null);
}

#[tokio::test]
async fn test_drag_cancel_clears_state() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;

    ctx.post(&format!("/api/timetables/{}/drag/start", id), json!({ "entryId": "math" }))
        .await;
    let (status, view) = ctx
        .post_empty(&format!("/api/timetables/{}/drag/cancel", id))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["drag"], Value::Null);
    assert_eq!(cell_entry_ids(&view, 0, 0), vec!["math"]);
}

#[tokio::test]
async fn test_select_is_suppressed_while_dragging() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;
    let uri = format!("/api/timetables/{}/select", id);

    let (_, selected) = ctx.post(&uri, json!({ "entryId": "art" })).await;
    assert_eq!(selected["entry"]["id"], "art");

    ctx.post(&format!("/api/timetables/{}/drag/start", id), json!({ "entryId": "math" }))
        .await;
    let (_, selected) = ctx.post(&uri, json!({ "entryId": "art" })).await;
    assert_eq!(selected["entry"], Value::Null);

    let (status, _) = ctx.post(&uri, json!({ "entryId": "ghost" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_entry_uses_temporary_id() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;
    let uri = format!("/api/timetables/{}/entries", id);
    let body = json!({
        "day": "wednesday",
        "slotKey": "08:00-09:00",
        "subject": "subject-math",
        "teacher": "teacher-1",
    });

    let (status, created) = ctx.post(&uri, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_str().unwrap().starts_with("temp-"));
    assert_eq!(created["dayOfWeek"], "wednesday");
    assert_eq!(created["startTime"], "08:00");
    assert_eq!(created["endTime"], "09:00");
    assert_eq!(created["period"], "morning");
    assert_eq!(created["subject"], "subject-math");

    let (status, _) = ctx.post(&uri, body).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, payload) = ctx.get(&format!("/api/timetables/{}/payload", id)).await;
    assert_eq!(payload["temporaryCount"], 1);
    assert_eq!(payload["entries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_add_entry_rejected_on_break_and_unknown_cell() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;
    let uri = format!("/api/timetables/{}/entries", id);
    let draft = |day: &str, slot_key: &str| {
        json!({ "day": day, "slotKey": slot_key, "subject": "subject-art", "teacher": "teacher-1" })
    };

    let (status, _) = ctx.post(&uri, draft("monday", "09:00-09:15")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx.post(&uri, draft("monday", "13:00-14:00")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_read_only_rejects_edits() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("read_only")).await;

    let (status, _) = ctx
        .post(
            &format!("/api/timetables/{}/entries", id),
            json!({ "day": "wednesday", "slotKey": "08:00-09:00", "subject": "s", "teacher": "t" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .delete(&format!("/api/timetables/{}/entries/math", id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_mode_enables_editing() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("read_only")).await;

    let (status, view) = ctx
        .put(&format!("/api/timetables/{}/mode", id), json!({ "mode": "edit" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["mode"], "edit");

    let (status, removed) = ctx
        .delete(&format!("/api/timetables/{}/entries/math", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["id"], "math");
}

#[tokio::test]
async fn test_remove_then_discard_restores_entries() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;

    ctx.delete(&format!("/api/timetables/{}/entries/math", id)).await;
    let (_, view) = ctx.get(&format!("/api/timetables/{}", id)).await;
    assert_eq!(view["entryCount"], 1);
    assert_eq!(view["isDirty"], true);

    let (status, _) = ctx
        .delete(&format!("/api/timetables/{}/entries/math", id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, view) = ctx
        .post(&format!("/api/timetables/{}/discard", id), json!({}))
        .await;
    assert_eq!(view["entryCount"], 2);
    assert_eq!(view["isDirty"], false);
}

#[tokio::test]
async fn test_mark_saved_replaces_baseline() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;

    ctx.post(
        &format!("/api/timetables/{}/entries", id),
        json!({ "day": "wednesday", "slotKey": "08:00-09:00", "subject": "subject-math", "teacher": "teacher-1" }),
    )
    .await;

    let persisted = json!({
        "entries": [
            entry("math", "monday", "08:00", "09:00", "Math"),
            entry("art", "tuesday", "08:00", "09:00", "Art"),
            entry("entry-17", "wednesday", "08:00", "09:00", "Math"),
        ]
    });
    let (status, view) = ctx
        .post(&format!("/api/timetables/{}/saved", id), persisted)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["isDirty"], false);
    assert_eq!(view["entryCount"], 3);

    ctx.post(&format!("/api/timetables/{}/discard", id), json!({}))
        .await;
    let (_, payload) = ctx.get(&format!("/api/timetables/{}/payload", id)).await;
    assert_eq!(payload["temporaryCount"], 0);
    assert_eq!(payload["entries"][2]["id"], "entry-17");
}

#[tokio::test]
async fn test_close_timetable() {
    let ctx = TestContext::new();
    let id = ctx.open_timetable(scenario("edit")).await;

    let (status, body) = ctx.delete(&format!("/api/timetables/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = ctx.get(&format!("/api/timetables/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(ctx.state.timetables.read().await.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_health_reports_sessions() {
    let ctx = TestContext::new();
    ctx.open_timetable(scenario("edit")).await;

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "timetableSessions": 1, "availabilitySessions": 0 }));
}

#[tokio::test]
async fn test_first_lesson_in_empty_timetable() {
    let ctx = TestContext::new();
    let id = ctx
        .open_timetable(json!({ "days": ["monday", "tuesday"], "mode": "edit" }))
        .await;
    let uri = format!("/api/timetables/{}/lessons", id);
    let lesson = json!({
        "dayOfWeek": "monday",
        "startTime": "08:00",
        "endTime": "09:00",
        "subject": "subject-math",
        "teacher": "teacher-1",
    });

    let (status, created) = ctx.post(&uri, lesson.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_str().unwrap().starts_with("temp-"));

    let (_, view) = ctx.get(&format!("/api/timetables/{}", id)).await;
    assert_eq!(view["grid"]["rows"][0]["slotKey"], "08:00-09:00");
    assert_eq!(cell_entry_ids(&view, 0, 0), vec![created["id"].as_str().unwrap().to_string()]);

    let (status, _) = ctx.post(&uri, lesson).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .post(
            &uri,
            json!({
                "dayOfWeek": "tuesday",
                "startTime": "10:00",
                "endTime": "09:00",
                "subject": "subject-math",
                "teacher": "teacher-1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_entry_under_break_is_not_draggable() {
    let ctx = TestContext::new();
    let mut body = scenario("edit");
    body["entries"]
        .as_array_mut()
        .unwrap()
        .push(entry("hidden", "monday", "09:00", "09:15", "Music"));
    let id = ctx.open_timetable(body).await;

    let (_, started) = ctx
        .post(&format!("/api/timetables/{}/drag/start", id), json!({ "entryId": "hidden" }))
        .await;
    assert_eq!(started["accepted"], false);

    let (_, dropped) = ctx
        .post(&format!("/api/timetables/{}/drop", id), cell("tuesday", "08:00-09:00"))
        .await;
    assert_eq!(dropped["placement"], Value::Null);
    assert_eq!(cell_entry_ids(&dropped["timetable"], 0, 1), vec!["art"]);
}

#[tokio::test]
async fn test_opened_at_is_stable_across_edits() {
    let ctx = TestContext::new();
    let (_, created) = ctx.post("/api/timetables", scenario("edit")).await;
    let id = created["id"].as_str().unwrap();

    let (_, view) = ctx
        .put(&format!("/api/timetables/{}/mode", id), json!({ "mode": "read_only" }))
        .await;

    assert_eq!(view["openedAt"], created["openedAt"]);
    let opened = DateTime::parse_from_rfc3339(created["openedAt"].as_str().unwrap()).unwrap();
    let updated = DateTime::parse_from_rfc3339(view["updatedAt"].as_str().unwrap()).unwrap();
    assert!(updated >= opened);
}
