#[cfg(test)]
mod tests {
    use crate::config::{Config, TesterConfig};
    use crate::errors::RequestError;
    use crate::grpc::apifinder::discovery_server::Discovery;
    use crate::grpc::apifinder::test_endpoint_response::Outcome;
    use crate::grpc::apifinder::{
        ReloadRequest, SearchRequest, StatsRequest, TestEndpointRequest,
    };
    use crate::grpc::discovery_service::DiscoveryService;
    use crate::tester::{OutgoingRequest, RawResponse};
    use crate::{
        test_endpoint, CatalogLoader, EngineHandle, HttpTransport, ReqwestTransport, SearchFilters,
    };
    use anyhow::Result as AnyhowResult;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tonic::Request;

    const CATALOG_CSV: &str = "\
API,Description,Category,Auth,HTTPS,CORS,Link
Weatherbit,Weather forecasts and historical weather data,Weather,apiKey,True,Unknown,https://www.weatherbit.io/api
Open-Meteo,Free weather forecast API for non-commercial use,Weather,No,True,Yes,https://open-meteo.com
Storm Glass,Marine weather and tide data,Weather,apiKey,True,Yes,https://stormglass.io
Cat Facts,Daily cat facts,Animals,No,True,No,https://alexwohlbruck.github.io/cat-facts/
Shibe.Online,Random pictures of Shiba Inu dogs,Animals,No,True,Yes,http://shibe.online
HTTP Cat,Cat for every HTTP status,Animals,No,False,Yes,https://http.cat
Exchangerate.host,Free foreign exchange and crypto rates,Currency Exchange,No,True,Unknown,https://exchangerate.host
GitHub,Make use of GitHub repositories and code,Development,OAuth,True,Yes,https://docs.github.com/en/rest
";

    fn write_catalog(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("public_apis.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn open_engine(path: &Path) -> AnyhowResult<Arc<EngineHandle>> {
        Ok(Arc::new(EngineHandle::open(CatalogLoader::new(path), 1000)?))
    }

    struct CountingTransport {
        calls: AtomicUsize,
    }

    impl CountingTransport {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for CountingTransport {
        async fn send(&self, _request: OutgoingRequest) -> Result<RawResponse, RequestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawResponse {
                status: 204,
                headers: vec![("x-served-by".to_string(), "stub".to_string())],
                body: String::new(),
                truncated: false,
            })
        }
    }

    fn discovery(
        engine: Arc<EngineHandle>,
        transport: Arc<dyn HttpTransport>,
    ) -> DiscoveryService {
        DiscoveryService::new(Arc::new(Config::default()), engine, transport)
    }

    #[test]
    fn test_csv_catalog_end_to_end() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let path = write_catalog(dir.path(), CATALOG_CSV);
        let engine = open_engine(&path)?.current()?;

        assert_eq!(engine.catalog().len(), 8);
        assert!(engine.catalog().notice().is_none());

        let result = engine.search("weather forecast", &SearchFilters::default(), 20)?;
        assert_eq!(result.total_matches, 8);
        assert_eq!(result.len(), 8);

        let top: Vec<&str> = result.hits[..2]
            .iter()
            .map(|h| h.record.name.as_str())
            .collect();
        assert!(top.contains(&"Weatherbit"));
        assert!(top.contains(&"Open-Meteo"));

        for pair in result.hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for hit in &result.hits {
            assert!((0.0..=1.0).contains(&hit.score), "Score out of range: {}", hit.score);
        }
        Ok(())
    }

    #[test]
    fn test_filters_form_a_conjunction() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let path = write_catalog(dir.path(), CATALOG_CSV);
        let engine = open_engine(&path)?.current()?;

        let filters = SearchFilters::default()
            .with_categories(["Animals"])
            .https_only(true)
            .cors_yes(true);
        let result = engine.search("cat", &filters, 20)?;

        let names: Vec<&str> = result.hits.iter().map(|h| h.record.name.as_str()).collect();
        assert_eq!(names, vec!["Shibe.Online"]);
        assert_eq!(result.total_matches, 1);
        Ok(())
    }

    #[test]
    fn test_browse_mode_keeps_catalog_order() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let path = write_catalog(dir.path(), CATALOG_CSV);
        let engine = open_engine(&path)?.current()?;

        let filters = SearchFilters::default().with_auth_types(["No"]);
        let result = engine.search("", &filters, 3)?;

        let positions: Vec<usize> = result.hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![1, 3, 4]);
        assert_eq!(result.total_matches, 5);
        assert!(result.hits.iter().all(|h| h.score == 0.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_grpc_search_uses_default_limit_and_filters() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let engine = open_engine(&dir.path().join("absent.csv"))?;
        let service = discovery(engine, Arc::new(CountingTransport::new()));

        let response = service
            .search(Request::new(SearchRequest {
                query: String::new(),
                limit: 0,
                ..Default::default()
            }))
            .await?
            .into_inner();
        assert_eq!(response.matches.len(), 12);
        assert_eq!(response.total_matches, 12);

        let response = service
            .search(Request::new(SearchRequest {
                query: "cat pictures".to_string(),
                categories: vec!["Animals".to_string()],
                limit: 5,
                ..Default::default()
            }))
            .await?
            .into_inner();
        assert_eq!(response.total_matches, 2);
        assert_eq!(response.matches[0].name, "Cat Facts");
        assert_eq!(response.matches[0].position, 3);
        assert_eq!(response.matches[0].cors, "No");
        assert!(response.matches[0].score > response.matches[1].score);
        Ok(())
    }

    #[tokio::test]
    async fn test_grpc_stats_and_reload() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("public_apis.csv");
        let engine = open_engine(&path)?;
        let service = discovery(engine, Arc::new(CountingTransport::new()));

        let stats = service
            .stats(Request::new(StatsRequest {}))
            .await?
            .into_inner();
        assert_eq!(stats.total_apis, 12);
        assert_eq!(stats.origin, "built-in sample");
        assert!(!stats.notice.is_empty());

        write_catalog(dir.path(), CATALOG_CSV);
        let reloaded = service
            .reload(Request::new(ReloadRequest {}))
            .await?
            .into_inner();
        assert_eq!(reloaded.total_apis, 8);
        assert_eq!(reloaded.total_categories, 4);
        assert_eq!(reloaded.notice, "");

        let stats = service
            .stats(Request::new(StatsRequest {}))
            .await?
            .into_inner();
        assert_eq!(stats.total_apis, 8);
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_grpc_reload_leaves_the_runtime_free() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let engine = open_engine(&dir.path().join("public_apis.csv"))?;
        let service = Arc::new(discovery(
            Arc::clone(&engine),
            Arc::new(CountingTransport::new()),
        ));

        let (paused_tx, paused_rx) = std::sync::mpsc::channel();
        let holder = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let _paused = engine.pause_reloads();
                paused_tx.send(()).unwrap();
                std::thread::sleep(std::time::Duration::from_millis(500));
            })
        };
        paused_rx.recv()?;

        let reload = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .reload(Request::new(ReloadRequest {}))
                    .await
                    .map(|response| response.into_inner().total_apis)
            })
        };
        tokio::task::yield_now().await;

        // The single runtime thread still answers while the reload waits.
        let stats = service
            .stats(Request::new(StatsRequest {}))
            .await?
            .into_inner();
        assert_eq!(stats.total_apis, 12);
        assert!(!reload.is_finished());

        assert_eq!(reload.await??, 12);
        holder.join().unwrap();
        Ok(())
    }

    #[tokio::test]
    async fn test_grpc_failed_reload_is_reported() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("public_apis.csv");
        let engine = open_engine(&path)?;
        let service = discovery(engine, Arc::new(CountingTransport::new()));

        // Ragged rows are rejected by the CSV reader.
        std::fs::write(&path, "API,HTTPS\nAlpha,True,extra\n")?;
        let status = service
            .reload(Request::new(ReloadRequest {}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::Internal);

        let stats = service
            .stats(Request::new(StatsRequest {}))
            .await?
            .into_inner();
        assert_eq!(stats.total_apis, 12);
        Ok(())
    }

    #[tokio::test]
    async fn test_grpc_test_endpoint_outcomes() -> AnyhowResult<()> {
        let dir = tempfile::tempdir()?;
        let engine = open_engine(&dir.path().join("absent.csv"))?;
        let transport = Arc::new(CountingTransport::new());
        let service = discovery(engine, transport.clone());

        let response = service
            .test_endpoint(Request::new(TestEndpointRequest {
                method: "POST".to_string(),
                url: "https://api.example.com".to_string(),
                headers: "not json".to_string(),
                body: String::new(),
            }))
            .await?
            .into_inner();
        match response.outcome {
            Some(Outcome::Error(message)) => assert!(message.starts_with("Headers are not valid JSON")),
            other => panic!("Expected an error outcome, got {:?}", other),
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);

        let response = service
            .test_endpoint(Request::new(TestEndpointRequest {
                method: "delete".to_string(),
                url: "https://api.example.com/items/1".to_string(),
                headers: String::new(),
                body: String::new(),
            }))
            .await?
            .into_inner();
        match response.outcome {
            Some(Outcome::Success(success)) => {
                assert_eq!(success.status, 204);
                assert_eq!(success.headers.get("x-served-by").map(String::as_str), Some("stub"));
            }
            other => panic!("Expected a success outcome, got {:?}", other),
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    /// Accept one connection, capture the raw request, answer with `response`.
    async fn serve_once(response: String) -> AnyhowResult<(String, tokio::task::JoinHandle<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if received.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            // The client may hang up before reading everything.
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&received).to_string()
        });

        Ok((format!("http://{}", addr), handle))
    }

    fn http_response(extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            extra_headers,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_reqwest_transport_against_local_server() -> AnyhowResult<()> {
        let (base, server) = serve_once(http_response(
            "X-Trace: one\r\nX-Trace: two\r\n",
            r#"{"created":true}"#,
        ))
        .await?;

        let config = TesterConfig::default();
        let transport = ReqwestTransport::new(&config)?;
        let response = test_endpoint(
            &transport,
            &config,
            "POST",
            &format!("{}/items", base),
            r#"{"X-Api-Key": "secret"}"#,
            r#"{"name": "widget"}"#,
        )
        .await?;

        assert_eq!(response.status, 201);
        assert_eq!(response.headers.get("x-trace").map(String::as_str), Some("one, two"));
        assert_eq!(response.json_body(), Some(serde_json::json!({"created": true})));
        assert!(!response.truncated);

        let received = server.await?;
        assert!(received.starts_with("POST /items HTTP/1.1\r\n"));
        assert!(received.to_ascii_lowercase().contains("x-api-key: secret"));
        assert!(received.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(received.ends_with(r#"{"name":"widget"}"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_reqwest_transport_caps_body() -> AnyhowResult<()> {
        let body = "é".repeat(50);
        let (base, server) = serve_once(http_response("", &body)).await?;

        let config = TesterConfig {
            max_body_chars: 10,
            ..TesterConfig::default()
        };
        let transport = ReqwestTransport::new(&config)?;
        let response = test_endpoint(&transport, &config, "GET", &base, "", "ignored").await?;

        assert_eq!(response.body, "é".repeat(10));
        assert!(response.truncated);
        assert!(server.await?.starts_with("GET / HTTP/1.1\r\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_reqwest_transport_stops_reading_large_bodies() -> AnyhowResult<()> {
        let body = "a".repeat(8 * 1024 * 1024);
        let (base, server) = serve_once(http_response("", &body)).await?;

        let config = TesterConfig {
            max_body_chars: 10,
            ..TesterConfig::default()
        };
        let transport = ReqwestTransport::new(&config)?;
        let raw = transport
            .send(OutgoingRequest::parse("GET", &base, "", "")?)
            .await?;

        assert_eq!(raw.status, 201);
        assert_eq!(raw.body, "a".repeat(10));
        assert!(raw.truncated);
        assert!(server.await?.starts_with("GET / HTTP/1.1\r\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_reqwest_transport_connection_refused() -> AnyhowResult<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = TesterConfig::default();
        let transport = ReqwestTransport::new(&config)?;
        let err = test_endpoint(&transport, &config, "GET", &format!("http://{}", addr), "", "")
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Network(_)), "Unexpected error: {:?}", err);
        Ok(())
    }

    #[tokio::test]
    async fn test_reqwest_transport_timeout() -> AnyhowResult<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
            drop(socket);
        });

        let config = TesterConfig {
            timeout_secs: 1,
            ..TesterConfig::default()
        };
        let transport = ReqwestTransport::new(&config)?;
        let err = test_endpoint(&transport, &config, "GET", &format!("http://{}", addr), "", "")
            .await
            .unwrap_err();
        assert_eq!(err, RequestError::Timeout(1));

        server.abort();
        Ok(())
    }
}
