//! Feed fetching over HTTP.

use reqwest::Client;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{Error, Result};

/// Downloads raw ICS text from booking platform share links.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout()?)
            .build()
            .map_err(|e| Error::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(FeedFetcher { client })
    }

    /// GET the feed and return its body, whatever the content type.
    /// Non-2xx responses are errors. There are no retries.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let url = normalize_url(url);
        debug!(%url, "Fetching feed");

        let fetch_error = |status: Option<u16>, message: String| Error::Fetch {
            url: url.clone(),
            status,
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or_default().to_string(),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| fetch_error(Some(status.as_u16()), e.to_string()))
    }
}

/// Platforms hand out `webcal://` links; they are plain HTTPS underneath.
fn normalize_url(url: &str) -> String {
    let url = url.trim();
    match url.get(..9) {
        Some(scheme) if scheme.eq_ignore_ascii_case("webcal://") => {
            format!("https://{}", &url[9..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> FeedFetcher {
        FeedFetcher::new(&FetchConfig::default()).unwrap()
    }

    #[test]
    fn webcal_urls_become_https() {
        assert_eq!(
            normalize_url("webcal://www.airbnb.com/calendar/ical/1.ics?s=abc"),
            "https://www.airbnb.com/calendar/ical/1.ics?s=abc"
        );
        assert_eq!(
            normalize_url("WEBCAL://x.test/a.ics"),
            "https://x.test/a.ics"
        );
        assert_eq!(
            normalize_url(" https://x.test/a.ics "),
            "https://x.test/a.ics"
        );
    }

    #[tokio::test]
    async fn returns_body_regardless_of_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/feed.ics")
            .match_header("user-agent", mockito::Matcher::Regex("^rentcal/".into()))
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/feed.ics", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.ics")
            .with_status(404)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/gone.ics", server.url()))
            .await
            .unwrap_err();

        match err {
            Error::Fetch { status, .. } => assert_eq!(status, Some(404)),
            other => panic!("Expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_a_fetch_error_without_status() {
        // Port 1 is never listening.
        let err = fetcher()
            .fetch("http://127.0.0.1:1/feed.ics")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Fetch { status: None, .. }));
    }

    #[tokio::test]
    async fn hanging_feed_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever replying.
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = FetchConfig {
            timeout: "200ms".into(),
            ..FetchConfig::default()
        };
        let fetcher = FeedFetcher::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = fetcher
            .fetch(&format!("http://{addr}/feed.ics"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Fetch { status: None, .. }));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }
}
