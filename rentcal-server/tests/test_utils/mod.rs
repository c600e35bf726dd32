//! Test utilities for integration tests
#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use tower::util::ServiceExt;

use rentcal_core::config::FetchConfig;
use rentcal_core::{Classifier, FeedFetcher, Property, SqliteStore, Syncer};
use rentcal_server::{AppState, app};

/// Application state backed by an in-memory database.
pub async fn test_state() -> AppState {
    let store = SqliteStore::open_in_memory()
        .await
        .expect("Failed to open in-memory store");
    let fetcher = FeedFetcher::new(&FetchConfig::default()).expect("Failed to build fetcher");
    AppState::new(Syncer::new(fetcher, Classifier::default(), store))
}

/// Router plus a handle on its state for seeding and inspecting data.
pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (app(state.clone()), state)
}

pub async fn seed_property(state: &AppState, airbnb: Option<String>, vrbo: Option<String>) {
    let property = Property {
        airbnb_ical_url: airbnb,
        vrbo_ical_url: vrbo,
        ..Property::new("beach-house", "Beach House")
    };
    state
        .store()
        .upsert_property(property)
        .await
        .expect("Failed to seed property");
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn ics_feed(events: &[(&str, &str, &str, &str)]) -> String {
    let mut ics = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\n");
    for (uid, summary, start, end) in events {
        ics.push_str("BEGIN:VEVENT\r\n");
        if !uid.is_empty() {
            ics.push_str(&format!("UID:{uid}\r\n"));
        }
        ics.push_str(&format!(
            "SUMMARY:{summary}\r\nDTSTART;VALUE=DATE:{start}\r\nDTEND;VALUE=DATE:{end}\r\n"
        ));
        ics.push_str("END:VEVENT\r\n");
    }
    ics.push_str("END:VCALENDAR\r\n");
    ics
}
