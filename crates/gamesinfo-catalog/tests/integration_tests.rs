//! Integration tests for the catalog client against a local HTTP responder

use gamesinfo_catalog::{CatalogClient, CatalogConfig, CatalogError, GameFilters, SortField, SortOrder};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const GAMES_PAGE: &str = r#"{
    "count": 1,
    "next": null,
    "previous": null,
    "results": [{"id": 22511, "name": "The Legend of Zelda: Breath of the Wild", "rating": 4.5,
                 "genres": [{"id": 4, "name": "Action", "slug": "action"}], "platforms": []}]
}"#;

const DETAILS: &str = r#"{
    "id": 22511, "name": "The Legend of Zelda: Breath of the Wild", "rating": 4.5,
    "description_raw": "Step into a world of discovery",
    "developers": [{"id": 16257, "name": "Nintendo", "slug": "nintendo"}],
    "publishers": [], "tags": []
}"#;

const SCREENSHOTS: &str = r#"{
    "count": 2,
    "results": [
        {"id": 1, "image": "https://media.rawg.io/media/screenshots/a.jpg", "width": 1920, "height": 1080},
        {"id": 2, "image": "https://media.rawg.io/media/screenshots/b.jpg"}
    ]
}"#;

const TRAILERS: &str = r#"{
    "count": 1,
    "results": [{"id": 16537, "name": "Launch Trailer", "preview": "https://media.rawg.io/p.jpg",
                 "data": {"480": "https://cdn.example/480.mp4", "max": "https://cdn.example/max.mp4"}}]
}"#;

/// Canned responder; the last response repeats once the list runs out
struct MockCatalog {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            let mut served = 0;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };

                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let request_line = request.lines().next().unwrap_or_default().to_string();
                seen.lock().unwrap().push(request_line);

                let (status, body) = responses[served.min(responses.len() - 1)];
                served += 1;

                let response = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { addr, requests }
    }

    fn config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: format!("http://{}/api", self.addr),
            api_key: "test-key".to_string(),
            retry_backoff: Duration::from_millis(1),
            ..CatalogConfig::default()
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_games_listing() {
    let mock = MockCatalog::start(vec![(200, GAMES_PAGE)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    let filters = GameFilters::new()
        .search("zelda")
        .genre(4)
        .ordering(SortOrder::descending(SortField::Rating));
    let page = client.games(&filters).await.unwrap();

    assert_eq!(page.count, 1);
    assert!(!page.has_more());
    assert_eq!(page.results[0].id, 22511);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let line = &requests[0];
    assert!(line.starts_with("GET /api/games?"));
    assert!(line.contains("search=zelda"));
    assert!(line.contains("genres=4"));
    assert!(line.contains("ordering=-rating"));
    assert!(line.contains("page_size=12"));
    assert!(line.contains("key=test-key"));
}

#[tokio::test]
async fn test_responses_cached_by_request() {
    let mock = MockCatalog::start(vec![(200, GAMES_PAGE)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    client.search("zelda", 1).await.unwrap();
    client.search("zelda", 1).await.unwrap();
    assert_eq!(mock.requests().len(), 1);

    client.search("zelda", 2).await.unwrap();
    assert_eq!(mock.requests().len(), 2);

    client.clear_cache();
    client.search("zelda", 1).await.unwrap();
    assert_eq!(mock.requests().len(), 3);
}

#[tokio::test]
async fn test_server_error_retried() {
    let mock = MockCatalog::start(vec![(503, "{}"), (200, DETAILS)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    let details = client.game_details(22511).await.unwrap();
    assert_eq!(details.game.name, "The Legend of Zelda: Breath of the Wild");
    assert_eq!(details.developers[0].name, "Nintendo");
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock = MockCatalog::start(vec![(500, r#"{"error": "boom"}"#)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    let err = client.game_details(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Api { status: 500, .. }));
    // first attempt plus two retries
    assert_eq!(mock.requests().len(), 3);
}

#[tokio::test]
async fn test_not_found() {
    let mock = MockCatalog::start(vec![(404, r#"{"detail": "Not found."}"#)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    let err = client.game_details(999_999).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let mock = MockCatalog::start(vec![(401, r#"{"error": "The key parameter is not provided"}"#)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    let err = client.games(&GameFilters::new()).await.unwrap_err();
    match err {
        CatalogError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("key parameter"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_game_screenshots() {
    let mock = MockCatalog::start(vec![(200, SCREENSHOTS)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    let screenshots = client.game_screenshots(22511).await.unwrap();
    assert_eq!(screenshots.len(), 2);
    assert_eq!(screenshots[0].image, "https://media.rawg.io/media/screenshots/a.jpg");
    assert_eq!(screenshots[0].width, Some(1920));
    assert_eq!(screenshots[1].height, None);

    let requests = mock.requests();
    assert!(requests[0].starts_with("GET /api/games/22511/screenshots?"));
}

#[tokio::test]
async fn test_game_trailers() {
    let mock = MockCatalog::start(vec![(200, TRAILERS)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    let trailers = client.game_trailers(22511).await.unwrap();
    assert_eq!(trailers.len(), 1);
    assert_eq!(trailers[0].video_url(), Some("https://cdn.example/max.mp4"));
    assert!(mock.requests()[0].starts_with("GET /api/games/22511/movies?"));
}

#[tokio::test]
async fn test_search_text_does_not_hit_filtered_cache() {
    let mock = MockCatalog::start(vec![(200, GAMES_PAGE)]).await;
    let client = CatalogClient::new(mock.config()).unwrap();

    client.search("zelda&genres=4", 1).await.unwrap();
    client
        .games(&GameFilters::new().search("zelda").genre(4).page(1))
        .await
        .unwrap();

    assert_eq!(mock.requests().len(), 2);
}
