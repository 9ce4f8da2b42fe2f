use crate::common::{
    http_resolver, links_config, pipeline, raw_message, EchoSummarizer, FailingSummarizer,
};
use async_trait::async_trait;
use newsletter_digest::pipeline::JsonFileSource;
use newsletter_digest::summarize::SUMMARY_UNAVAILABLE;
use newsletter_digest::{DigestError, MessageSource, RawMessage, SourceError};
use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves every HEAD with 200 and every GET with a page titled `title`
async fn mount_pages(server: &MockServer, title: &str) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><head><title>{}</title></head></html>", title))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Source whose listing always fails
struct OfflineSource;

#[async_trait]
impl MessageSource for OfflineSource {
    async fn list_message_ids(&self) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Unavailable("mailbox offline".to_string()))
    }

    async fn fetch_message(&self, id: &str) -> Result<RawMessage, SourceError> {
        Err(SourceError::NotFound(id.to_string()))
    }
}

/// Source that lists one extra id it cannot fetch
struct FlakySource {
    inner: JsonFileSource,
}

#[async_trait]
impl MessageSource for FlakySource {
    async fn list_message_ids(&self) -> Result<Vec<String>, SourceError> {
        let mut ids = self.inner.list_message_ids().await?;
        ids.insert(1, "broken".to_string());
        Ok(ids)
    }

    async fn fetch_message(&self, id: &str) -> Result<RawMessage, SourceError> {
        if id == "broken" {
            return Err(SourceError::Unavailable("timed out".to_string()));
        }
        self.inner.fetch_message(id).await
    }
}

#[tokio::test]
async fn test_only_newsletters_reach_the_digest() {
    let source = JsonFileSource::from_messages(vec![
        raw_message(
            "1",
            "news@substack.com",
            "Issue #42",
            "2024-03-01T10:00:00Z",
            "This week: async traits",
        ),
        raw_message(
            "2",
            "alerts@google.com",
            "Weekly Digest",
            "2024-03-01T11:00:00Z",
            "Security alert",
        ),
        raw_message(
            "3",
            "friend@example.com",
            "Hi",
            "2024-03-01T12:00:00Z",
            "Lunch tomorrow?",
        ),
    ])
    .unwrap();

    let summarizer = Arc::new(EchoSummarizer);
    let run = pipeline(summarizer, http_resolver(&links_config()), 4)
        .run(&source)
        .await
        .unwrap();

    assert_eq!(run.days.len(), 1);
    let records = &run.days["2024-03-01"];
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].from, "news@substack.com");
    assert_eq!(records[0].subject, "Issue #42");
    assert_eq!(records[0].summary, "• This week: async traits");
    assert!(records[0].links.is_empty());

    assert_eq!(run.stats.messages_listed, 3);
    assert_eq!(run.stats.messages_dropped, 2);
    assert_eq!(run.stats.messages_enriched, 1);

    let payload = serde_json::to_value(&run.days).unwrap();
    let record = &payload["2024-03-01"][0];
    for key in ["from", "subject", "dateSent", "summary", "links"] {
        assert!(record.get(key).is_some(), "missing key {}", key);
    }
}

#[tokio::test]
async fn test_summarizer_outage_keeps_links() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server, "Launch Week Recap").await;

    let body = format!("Read more at {}/launch today", mock_server.uri());
    let source = JsonFileSource::from_messages(vec![raw_message(
        "1",
        "team@convertkit.com",
        "Product update",
        "2024-03-02T09:00:00Z",
        &body,
    )])
    .unwrap();

    let summarizer = Arc::new(FailingSummarizer::default());
    let run = pipeline(summarizer.clone(), http_resolver(&links_config()), 4)
        .run(&source)
        .await
        .unwrap();

    let record = &run.days["2024-03-02"][0];
    assert_eq!(record.summary, SUMMARY_UNAVAILABLE);
    assert_eq!(record.links.len(), 1);
    assert_eq!(record.links[0].url, format!("{}/launch", mock_server.uri()));
    assert_eq!(record.links[0].display_text, "Launch Week Recap");
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_personal_mail_is_never_summarized() {
    let source = JsonFileSource::from_messages(vec![
        raw_message("1", "friend@example.com", "Hi", "2024-03-01T10:00:00Z", "hey"),
        raw_message(
            "2",
            "noreply@cointracker.io",
            "Your weekly newsletter",
            "2024-03-01T11:00:00Z",
            "likes",
        ),
    ])
    .unwrap();

    let summarizer = Arc::new(FailingSummarizer::default());
    let run = pipeline(summarizer.clone(), http_resolver(&links_config()), 4)
        .run(&source)
        .await
        .unwrap();

    assert!(run.days.is_empty());
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_listing_failure_aborts_run() {
    let summarizer = Arc::new(EchoSummarizer);
    let result = pipeline(summarizer, http_resolver(&links_config()), 4)
        .run(&OfflineSource)
        .await;

    assert!(matches!(
        result,
        Err(DigestError::Source(SourceError::Unavailable(_)))
    ));
}

#[tokio::test]
async fn test_fetch_failure_skips_message() {
    let source = FlakySource {
        inner: JsonFileSource::from_messages(vec![
            raw_message(
                "a",
                "news@substack.com",
                "First",
                "2024-03-01T08:00:00Z",
                "one",
            ),
            raw_message(
                "b",
                "news@mailchimp.com",
                "Second",
                "2024-03-01T09:00:00Z",
                "two",
            ),
        ])
        .unwrap(),
    };

    let summarizer = Arc::new(EchoSummarizer);
    let run = pipeline(summarizer, http_resolver(&links_config()), 4)
        .run(&source)
        .await
        .unwrap();

    let subjects: Vec<&str> = run.days["2024-03-01"]
        .iter()
        .map(|r| r.subject.as_str())
        .collect();
    assert_eq!(subjects, vec!["First", "Second"]);
    assert_eq!(run.stats.messages_listed, 3);
    assert_eq!(run.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_day_order_follows_batch_order() {
    let source = JsonFileSource::from_messages(vec![
        raw_message(
            "1",
            "a@substack.com",
            "Slow one",
            "2024-03-01T08:00:00Z",
            "slow issue",
        ),
        raw_message(
            "2",
            "b@substack.com",
            "Fast one",
            "2024-03-01T09:00:00Z",
            "fast issue",
        ),
        raw_message(
            "3",
            "c@substack.com",
            "Next day",
            "2024-03-02T07:00:00Z",
            "fast again",
        ),
    ])
    .unwrap();

    let summarizer = Arc::new(EchoSummarizer);
    let run = pipeline(summarizer, http_resolver(&links_config()), 4)
        .run(&source)
        .await
        .unwrap();

    let keys: Vec<&str> = run.days.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["2024-03-01", "2024-03-02"]);

    let first_day: Vec<&str> = run.days["2024-03-01"]
        .iter()
        .map(|r| r.summary.as_str())
        .collect();
    assert_eq!(first_day, vec!["• slow issue", "• fast issue"]);
}

#[tokio::test]
async fn test_links_deduplicated_and_capped() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server, "A Descriptive Page").await;
    let base = mock_server.uri();

    let repeated = format!(
        "{b}/same and again {b}/same and {b}/other and {b}/same plus {b}/third",
        b = base
    );
    let many: String = (0..15)
        .map(|i| format!("link {}/item/{}\n", base, i))
        .collect();

    let messages = vec![
        raw_message(
            "1",
            "news@substack.com",
            "Repeats",
            "2024-03-01T08:00:00Z",
            &repeated,
        ),
        raw_message(
            "2",
            "news@substack.com",
            "Many",
            "2024-03-01T09:00:00Z",
            &many,
        ),
    ];

    let summarizer = Arc::new(EchoSummarizer);
    let days = pipeline(summarizer, http_resolver(&links_config()), 2)
        .enrich_all(&messages)
        .await;

    let records = &days["2024-03-01"];

    let urls: Vec<String> = records[0].links.iter().map(|l| l.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/same", base),
            format!("{}/other", base),
            format!("{}/third", base),
        ]
    );

    assert_eq!(records[1].links.len(), 10);
    assert_eq!(records[1].links[0].url, format!("{}/item/0", base));
    assert_eq!(records[1].links[9].url, format!("{}/item/9", base));
    assert!(records[1]
        .links
        .iter()
        .all(|l| l.display_text == "A Descriptive Page"));
}

#[tokio::test]
async fn test_rerun_gives_same_digest() {
    let source = JsonFileSource::from_messages(vec![
        raw_message(
            "1",
            "news@substack.com",
            "Issue 1",
            "2024-03-01T08:00:00Z",
            "first",
        ),
        raw_message(
            "2",
            "digest@medium.com",
            "Issue 2",
            "2024-03-03T08:00:00Z",
            "second",
        ),
    ])
    .unwrap();

    let pipeline = pipeline(Arc::new(EchoSummarizer), http_resolver(&links_config()), 4);
    let first = pipeline.run(&source).await.unwrap();
    let second = pipeline.run(&source).await.unwrap();

    assert_eq!(
        serde_json::to_value(&first.days).unwrap(),
        serde_json::to_value(&second.days).unwrap()
    );
    assert_eq!(first.stats, second.stats);
}

#[tokio::test]
async fn test_malformed_entry_does_not_abort_batch() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
            {"id": "good", "from": "news@substack.com", "subject": "Issue 9", "dateSent": "2024-03-01T10:00:00Z", "body": "kept"},
            {"id": "bad", "from": "news@substack.com", "subject": "Broken", "dateSent": "not a date", "body": "lost"}
        ]"#,
    )
    .unwrap();

    let source = JsonFileSource::load(file.path()).unwrap();
    let run = pipeline(Arc::new(EchoSummarizer), http_resolver(&links_config()), 4)
        .run(&source)
        .await
        .unwrap();

    let subjects: Vec<&str> = run.days["2024-03-01"]
        .iter()
        .map(|r| r.subject.as_str())
        .collect();
    assert_eq!(subjects, vec!["Issue 9"]);
    assert_eq!(run.stats.messages_listed, 2);
    assert_eq!(run.stats.fetch_failures, 1);
}
