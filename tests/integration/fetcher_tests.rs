use crate::common::{http_resolver, links_config};
use newsletter_digest::config::LinksConfig;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(title: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>content</body></html>",
            title
        ))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_redirect_is_followed_and_title_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/short"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/article", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(html("Understanding Async Rust"))
        .mount(&mock_server)
        .await;

    let resolver = http_resolver(&links_config());
    let link = resolver.resolve(&format!("{}/short", base_url)).await;

    assert_eq!(link.url, format!("{}/short", base_url));
    assert_eq!(link.resolved_url, format!("{}/article", base_url));
    assert_eq!(link.display_text, "Understanding Async Rust");
}

#[tokio::test]
async fn test_short_title_uses_url_text() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts/7"))
        .respond_with(html("Home"))
        .mount(&mock_server)
        .await;

    let resolver = http_resolver(&links_config());
    let link = resolver.resolve(&format!("{}/posts/7", base_url)).await;

    assert_eq!(link.display_text, "127.0.0.1/posts");
}

#[tokio::test]
async fn test_not_found_falls_back() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let resolver = http_resolver(&links_config());
    let url = format!("{}/missing/page", base_url);
    let link = resolver.resolve(&url).await;

    assert_eq!(link.resolved_url, url);
    assert_eq!(link.display_text, "127.0.0.1/missing");
}

#[tokio::test]
async fn test_redirect_loop_falls_back_to_original() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(path("/loop"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/loop", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;

    let resolver = http_resolver(&links_config());
    let url = format!("{}/loop", base_url);
    let link = resolver.resolve(&url).await;

    assert_eq!(link.resolved_url, url);
    assert_eq!(link.display_text, "127.0.0.1/loop");
}

#[tokio::test]
async fn test_redirect_hops_are_capped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // /hop/0 -> /hop/1 -> ... -> /hop/3 (three redirects)
    for i in 0..3 {
        Mock::given(method("HEAD"))
            .and(path(format!("/hop/{}", i)))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/hop/{}", base_url, i + 1).as_str()),
            )
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("HEAD"))
        .and(path("/hop/3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let start = format!("{}/hop/0", base_url);

    let generous = http_resolver(&links_config());
    assert_eq!(
        generous.resolve(&start).await.resolved_url,
        format!("{}/hop/3", base_url)
    );

    let strict = http_resolver(&LinksConfig {
        redirect_max_hops: 2,
        ..links_config()
    });
    assert_eq!(strict.resolve(&start).await.resolved_url, start);
}

#[tokio::test]
async fn test_slow_page_times_out_to_fallback() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow/page"))
        .respond_with(html("Eventually A Title").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = LinksConfig {
        title_fetch_timeout: 200,
        ..links_config()
    };
    let resolver = http_resolver(&config);

    let started = std::time::Instant::now();
    let link = resolver.resolve(&format!("{}/slow/page", base_url)).await;

    assert_eq!(link.display_text, "127.0.0.1/slow");
    assert!(started.elapsed() < Duration::from_secs(2));
}
