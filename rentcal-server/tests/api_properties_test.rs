//! Integration tests for the property and booking endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils::{body_json, send, test_app};

    /// Tests a property can be created, read back and listed
    #[tokio::test]
    async fn it_creates_and_lists_properties() {
        let (app, _state) = test_app().await;

        let response = send(
            &app,
            "PUT",
            "/properties/cabin",
            Some(json!({
                "name": "  Lake Cabin ",
                "airbnb_ical_url": "webcal://www.airbnb.com/calendar/ical/123.ics?s=abc",
                "vrbo_ical_url": "",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let saved = body_json(response).await;
        assert_eq!(saved["name"], "Lake Cabin");
        assert_eq!(saved["vrbo_ical_url"], serde_json::Value::Null);

        let fetched = body_json(send(&app, "GET", "/properties/cabin", None).await).await;
        assert_eq!(fetched, saved);

        let listed = body_json(send(&app, "GET", "/properties", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    /// Tests non-URL feed values are rejected
    #[tokio::test]
    async fn it_rejects_invalid_feed_urls() {
        let (app, _state) = test_app().await;

        for url in ["not a url", "ftp://example.com/feed.ics"] {
            let response = send(
                &app,
                "PUT",
                "/properties/cabin",
                Some(json!({ "name": "Cabin", "other_ical_url": url })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{url}");
        }
    }

    /// Tests an empty name is rejected
    #[tokio::test]
    async fn it_rejects_empty_name() {
        let (app, _state) = test_app().await;

        let body = json!({ "name": " " });
        let response = send(&app, "PUT", "/properties/cabin", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Tests bookings of an unknown property return 404
    #[tokio::test]
    async fn it_returns_404_for_bookings_of_unknown_property() {
        let (app, _state) = test_app().await;

        let response = send(&app, "GET", "/properties/ghost/bookings", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests deleting a property removes it
    #[tokio::test]
    async fn it_deletes_properties() {
        let (app, _state) = test_app().await;
        send(
            &app,
            "PUT",
            "/properties/cabin",
            Some(json!({ "name": "Cabin" })),
        )
        .await;

        let response = send(&app, "DELETE", "/properties/cabin", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "GET", "/properties/cabin", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
