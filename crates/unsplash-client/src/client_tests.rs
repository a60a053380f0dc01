// SPDX-License-Identifier: GPL-3.0-or-later

#[cfg(test)]
mod tests {
    use crate::{
        ContentFilter, ErrorKind, OrderBy, Orientation, SearchParams, SearchParamsBuilder,
        UnsplashClient, UnsplashError,
    };
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCESS_KEY: &str = "test-access-key";
    const PHOTO_ID: &str = "eOLpJytrbsQ";

    fn photo_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "created_at": "2014-11-18T14:35:36-05:00",
            "width": 4000,
            "height": 3000,
            "color": "#A7A2A1",
            "likes": 286,
            "description": "A man drinking a coffee.",
            "user": {
                "id": "Ul0QVz12Goo",
                "username": "ugmonk",
                "name": "Jeff Sheldon"
            },
            "urls": {
                "raw": "https://images.unsplash.com/photo-1416339306562-f3d12fefd36f",
                "regular": "https://images.unsplash.com/photo-1416339306562-f3d12fefd36f?w=1080",
                "thumb": "https://images.unsplash.com/photo-1416339306562-f3d12fefd36f?w=200"
            }
        })
    }

    fn search_response() -> serde_json::Value {
        serde_json::json!({
            "total": 133,
            "total_pages": 7,
            "results": [photo_json(PHOTO_ID), photo_json("LBI7cgq3pbM")]
        })
    }

    fn client_for(server: &MockServer) -> UnsplashClient {
        UnsplashClient::builder(ACCESS_KEY)
            .base_url(server.uri())
            .build()
            .unwrap()
    }

    fn params(query: &str) -> SearchParams {
        SearchParamsBuilder::new().with_query(query).unwrap().build().unwrap()
    }

    async fn search_with_status(status: u16, body: serde_json::Value) -> UnsplashError {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        client_for(&mock_server)
            .search(&params("office"))
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_search_photos() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param("query", "office"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "10"))
            .and(header("Authorization", "Client-ID test-access-key"))
            .and(header("Accept-Version", "v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .search(&params("office"))
            .await
            .unwrap();

        assert_eq!(response.total, 133);
        assert_eq!(response.total_pages, 7);
        assert_eq!(response.len(), 2);

        let photo = &response.results[0];
        assert_eq!(photo.id, PHOTO_ID);
        assert_eq!(photo.width.get(), 4000);
        assert_eq!(photo.user.name, "Jeff Sheldon");
        assert_eq!(response.results[1].id, "LBI7cgq3pbM");
    }

    #[tokio::test]
    async fn test_search_sends_optional_filters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param("query", "desert road"))
            .and(query_param("page", "3"))
            .and(query_param("per_page", "30"))
            .and(query_param("orientation", "landscape"))
            .and(query_param("content_filter", "high"))
            .and(query_param("order_by", "latest"))
            .and(query_param("color", "orange"))
            .and(query_param("collections", "162326,9270463"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let params = SearchParamsBuilder::new()
            .with_query("desert road")
            .unwrap()
            .with_page(3)
            .unwrap()
            .with_per_page(30)
            .unwrap()
            .with_orientation(Orientation::Landscape)
            .unwrap()
            .with_content_filter(ContentFilter::High)
            .unwrap()
            .with_order_by(OrderBy::Latest)
            .unwrap()
            .with_color("orange")
            .unwrap()
            .with_collections(["162326", "9270463"])
            .unwrap()
            .build()
            .unwrap();

        client_for(&mock_server).search(&params).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_omits_unset_filters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param_is_missing("orientation"))
            .and(query_param_is_missing("content_filter"))
            .and(query_param_is_missing("order_by"))
            .and(query_param_is_missing("color"))
            .and(query_param_is_missing("collections"))
            .and(query_param_is_missing("lang"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        client_for(&mock_server)
            .search(&params("office"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_empty_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 0,
                "total_pages": 0,
                "results": []
            })))
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .search(&params("zzzzqqq"))
            .await
            .unwrap();

        assert_eq!(response.total, 0);
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_search_past_last_page_is_not_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 12,
                "total_pages": 2,
                "results": []
            })))
            .mount(&mock_server)
            .await;

        let params = SearchParamsBuilder::new()
            .with_query("office")
            .unwrap()
            .with_page(9)
            .unwrap()
            .build()
            .unwrap();
        let response = client_for(&mock_server).search(&params).await.unwrap();

        assert_eq!(response.total, 12);
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .search(&params("office"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn test_missing_fields_is_validation_error() {
        let err = search_with_status(200, serde_json::json!({ "total": 3 })).await;
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unauthorized_error() {
        let err = search_with_status(
            401,
            serde_json::json!({ "errors": ["OAuth error: The access token is invalid"] }),
        )
        .await;

        assert!(matches!(
            err,
            UnsplashError::Authentication { status: 401, ref message }
                if message == "OAuth error: The access token is invalid"
        ));
    }

    #[tokio::test]
    async fn test_forbidden_error() {
        let err = search_with_status(403, serde_json::json!({ "errors": ["Forbidden"] })).await;
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_not_found_error() {
        let err = search_with_status(404, serde_json::json!({ "errors": ["Not found"] })).await;
        assert!(matches!(err, UnsplashError::NotFound { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_unprocessable_error_carries_api_message() {
        let err = search_with_status(
            422,
            serde_json::json!({ "errors": ["per_page must be between 1 and 30"] }),
        )
        .await;

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.message(), "per_page must be between 1 and 30");
    }

    #[tokio::test]
    async fn test_rate_limit_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("X-Ratelimit-Remaining", "0")
                    .set_body_string("Rate Limit Exceeded"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .search(&params("office"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            UnsplashError::RateLimit {
                status: 429,
                message: "Rate Limit Exceeded".to_string(),
                remaining: Some(0),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error() {
        let err = search_with_status(503, serde_json::json!({ "errors": ["Service unavailable"] }))
            .await;
        assert!(matches!(err, UnsplashError::Server { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unexpected_status_is_client_error() {
        let err = search_with_status(418, serde_json::json!({ "teapot": true })).await;
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.status(), Some(418));
        assert!(err.message().contains("teapot"));
    }

    #[tokio::test]
    async fn test_timeout_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_response())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let client = UnsplashClient::builder(ACCESS_KEY)
            .base_url(mock_server.uri())
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(3),
            client.search(&params("office")),
        )
        .await
        .expect("search should give up before the outer deadline");

        assert!(matches!(result, Err(UnsplashError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused_is_client_error() {
        // Bind then drop a listener so the port is closed.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let client = UnsplashClient::builder(ACCESS_KEY)
            .base_url(format!("http://{addr}"))
            .build()
            .unwrap();

        let err = client.search(&params("office")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_get_photo() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/photos/{}", PHOTO_ID)))
            .and(header("Authorization", "Client-ID test-access-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(photo_json(PHOTO_ID)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let photo = client_for(&mock_server).get_photo(PHOTO_ID).await.unwrap();

        assert_eq!(photo.id, PHOTO_ID);
        assert_eq!(photo.likes, 286);
        assert_eq!(photo.color.as_deref(), Some("#A7A2A1"));
    }

    #[tokio::test]
    async fn test_get_photo_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .get_photo("missing")
            .await
            .unwrap_err();

        assert_eq!(err, UnsplashError::NotFound {
            status: 404,
            message: "Not Found".to_string(),
        });
    }

    #[tokio::test]
    async fn test_get_photo_empty_id_does_not_hit_network() {
        let mock_server = MockServer::start().await;

        let err = client_for(&mock_server).get_photo("  ").await.unwrap_err();
        assert_eq!(err.field(), Some("id"));

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_searches_share_client() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(4)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let queries = ["a", "b", "c", "d"].map(params);
        let handles: Vec<_> = queries
            .into_iter()
            .map(|p| {
                let client = client.clone();
                tokio::spawn(async move { client.search(&p).await })
            })
            .collect();

        for handle in handles {
            let response = handle.await.unwrap().unwrap();
            assert_eq!(response.total, 133);
        }
    }

    /// Serve one raw HTTP response on a local port, then close the connection.
    fn serve_raw_once(response: &'static [u8]) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response);
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        let uri = serve_raw_once(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort",
        );

        let client = UnsplashClient::builder(ACCESS_KEY)
            .base_url(uri)
            .build()
            .unwrap();

        let err = client.search(&params("office")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_custom_user_agent_is_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(header("user-agent", "photo-picker/2.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = UnsplashClient::builder(ACCESS_KEY)
            .base_url(mock_server.uri())
            .user_agent("photo-picker/2.1")
            .build()
            .unwrap();

        client.search(&params("office")).await.unwrap();
    }
}
