use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use intake_core::{ContactRecord, FeedLog, IntakeRequest, RecordSink};
use intake_extractor::{Extraction, RecordExtractor};
use intake_logging::{redact_sensitive_data, EventLogger, IntakeEvent};
use intake_understanding::AttachmentExtractor;

use crate::report::{ExtractionOutcome, IntakeReport, TextSource};

/// Runs one inbound message through attachment reading, record extraction,
/// the persistence sink and the feed log.
///
/// Every stage degrades instead of failing, so [`ingest`](Self::ingest)
/// always produces a report.
pub struct IntakePipeline {
    attachments: AttachmentExtractor,
    extractor: RecordExtractor,
    sink: Arc<dyn RecordSink>,
    feed: Arc<FeedLog>,
}

impl IntakePipeline {
    pub fn new(
        attachments: AttachmentExtractor,
        extractor: RecordExtractor,
        sink: Arc<dyn RecordSink>,
        feed: Arc<FeedLog>,
    ) -> Self {
        Self {
            attachments,
            extractor,
            sink,
            feed,
        }
    }

    pub fn feed(&self) -> &Arc<FeedLog> {
        &self.feed
    }

    pub async fn ingest(&self, request: &IntakeRequest) -> IntakeReport {
        let intake_id = Uuid::new_v4();
        let span = info_span!(
            "intake",
            %intake_id,
            sender = %redact_sensitive_data(&request.sender),
        );
        self.run(intake_id, request).instrument(span).await
    }

    async fn run(&self, intake_id: Uuid, request: &IntakeRequest) -> IntakeReport {
        EventLogger::log_event(
            intake_id,
            IntakeEvent::Received {
                sender: request.sender.clone(),
                has_attachment: request.attachment.is_some(),
            },
        );

        let (text, text_source) = self.resolve_text(intake_id, request).await;

        let Extraction { records, error } = self.extractor.extract_best_effort(&text).await;
        let extraction = match error {
            Some(e) => {
                let reason = e.to_string();
                EventLogger::log_event(
                    intake_id,
                    IntakeEvent::Degraded {
                        stage: "extraction".to_string(),
                        error: reason.clone(),
                    },
                );
                ExtractionOutcome::Degraded { reason }
            }
            None if records.iter().all(ContactRecord::is_empty) => ExtractionOutcome::Empty,
            None => ExtractionOutcome::Parsed { count: records.len() },
        };

        let mut accepted = 0;
        let mut persisted = 0;
        let mut sink_failures = Vec::new();
        for record in records.into_iter().filter(|r| !r.is_empty()) {
            accepted += 1;
            match self.sink.append(&record).await {
                Ok(()) => persisted += 1,
                Err(e) => {
                    // Sink errors can echo the rejected row back.
                    let reason = redact_sensitive_data(&e.to_string());
                    error!(sink = self.sink.name(), error = %reason, "Failed to persist record");
                    EventLogger::log_event(
                        intake_id,
                        IntakeEvent::SinkFailed {
                            sink: self.sink.name().to_string(),
                            error: reason.clone(),
                        },
                    );
                    sink_failures.push(reason);
                }
            }
            // The feed shows every accepted record, stored or not.
            self.feed.append(record).await;
        }

        EventLogger::log_event(
            intake_id,
            IntakeEvent::Completed {
                accepted,
                persisted,
                sink_failures: sink_failures.len(),
            },
        );
        info!(accepted, persisted, "Intake complete");

        IntakeReport {
            intake_id,
            text_source,
            extraction,
            accepted,
            persisted,
            sink_failures,
        }
    }

    /// The attachment text when there is an attachment, otherwise the body.
    async fn resolve_text(&self, intake_id: Uuid, request: &IntakeRequest) -> (String, TextSource) {
        let Some(attachment) = &request.attachment else {
            return (request.body.clone(), TextSource::Body);
        };

        let extracted = self.attachments.extract_best_effort(attachment).await;
        let kind = extracted.kind.to_string();
        match extracted.error {
            None => (extracted.text, TextSource::Attachment { kind }),
            Some(e) => {
                let error = e.to_string();
                EventLogger::log_event(
                    intake_id,
                    IntakeEvent::Degraded {
                        stage: "attachment".to_string(),
                        error: error.clone(),
                    },
                );
                (extracted.text, TextSource::AttachmentFailed { kind, error })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use intake_core::{FetchError, MediaFetcher, SinkError};
    use intake_extractor::providers::MockProvider;
    use intake_understanding::fixtures::pdf_with_pages;
    use intake_understanding::OcrService;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        rows: Mutex<Vec<ContactRecord>>,
        fail_for: Option<String>,
    }

    impl MemorySink {
        fn failing_for(name: &str) -> Self {
            Self { rows: Mutex::default(), fail_for: Some(name.to_string()) }
        }

        fn rows(&self) -> Vec<ContactRecord> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordSink for MemorySink {
        fn name(&self) -> &str {
            "memory"
        }

        async fn append(&self, record: &ContactRecord) -> Result<(), SinkError> {
            if self.fail_for.as_deref() == Some(record.name.as_str()) {
                return Err(SinkError::Rejected {
                    sink: "memory".into(),
                    message: format!("quota exceeded for row {}", record.email),
                });
            }
            self.rows.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct BytesFetcher(Option<Vec<u8>>);

    #[async_trait]
    impl MediaFetcher for BytesFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
            match &self.0 {
                Some(body) => Ok(Bytes::from(body.clone())),
                None => Err(FetchError::Status { url: url.to_string(), status: 404 }),
            }
        }
    }

    fn pipeline(
        response: &str,
        media: Option<Vec<u8>>,
        sink: Arc<MemorySink>,
    ) -> (IntakePipeline, Arc<MockProvider>) {
        let provider = Arc::new(MockProvider::new("mock").with_response(response));
        let attachments = AttachmentExtractor::new(
            Arc::new(BytesFetcher(media)),
            OcrService::new("intake-test-no-such-ocr-binary"),
        );
        let pipeline = IntakePipeline::new(
            attachments,
            RecordExtractor::new(provider.clone(), "gemini-2.5-flash"),
            sink,
            Arc::new(FeedLog::new()),
        );
        (pipeline, provider)
    }

    #[tokio::test]
    async fn test_text_message_stores_one_contact() {
        let sink = Arc::new(MemorySink::default());
        let (pipeline, provider) = pipeline(
            r#"[{"Name": "Alice", "Email": "alice@x.com", "Phone": "+911234567890"}]"#,
            None,
            sink.clone(),
        );

        let request = IntakeRequest::text("whatsapp:+911234567890", "Contact: Alice, alice@x.com, +911234567890");
        let report = pipeline.ingest(&request).await;

        let alice = ContactRecord::new("Alice", "alice@x.com", "+911234567890");
        assert_eq!(sink.rows(), vec![alice.clone()]);
        assert_eq!(pipeline.feed().snapshot().await, vec![alice]);
        assert_eq!(report.text_source, TextSource::Body);
        assert_eq!(report.extraction, ExtractionOutcome::Parsed { count: 1 });
        assert_eq!(report.persisted, 1);
        assert_eq!(report.acknowledgement(), "✅ 1 candidate’s details have been stored successfully.");
        assert!(provider.prompts()[0].ends_with("Contact: Alice, alice@x.com, +911234567890"));
    }

    #[tokio::test]
    async fn test_pdf_with_two_people_reaches_next_feed_event() {
        let sink = Arc::new(MemorySink::default());
        let pdf = pdf_with_pages(&["Alice alice@x.com", "Bob 9876543210"]);
        let (pipeline, provider) = pipeline(
            r#"[{"Name": "Alice", "Email": "alice@x.com", "Phone": ""}, {"Name": "Bob", "Email": "", "Phone": "9876543210"}]"#,
            Some(pdf),
            sink.clone(),
        );
        let mut subscription = pipeline.feed().subscribe().await;

        let request = IntakeRequest::text("whatsapp:+1", "ignored body")
            .with_attachment("https://media/1", "application/pdf");
        let report = pipeline.ingest(&request).await;

        assert_eq!(report.text_source, TextSource::Attachment { kind: "pdf".into() });
        assert_eq!(report.persisted, 2);
        assert_eq!(sink.rows().len(), 2);
        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("Alice") && prompt.contains("Bob"));
        assert!(!prompt.contains("ignored body"));

        let batch = subscription.next_batch().await.unwrap();
        let names: Vec<_> = batch.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_empty_records_are_dropped() {
        let sink = Arc::new(MemorySink::default());
        let (pipeline, _) = pipeline(
            r#"[{"Name": "", "Email": "", "Phone": ""}, {"Name": "Carol"}]"#,
            None,
            sink.clone(),
        );

        let report = pipeline.ingest(&IntakeRequest::text("s", "Carol")).await;
        assert_eq!(report.accepted, 1);
        assert_eq!(sink.rows(), vec![ContactRecord::new("Carol", "", "")]);
        assert_eq!(pipeline.feed().len().await, 1);
    }

    #[tokio::test]
    async fn test_unparsable_response_replies_with_warning() {
        let sink = Arc::new(MemorySink::default());
        let (pipeline, _) = pipeline("I could not find anyone.", None, sink.clone());

        let report = pipeline.ingest(&IntakeRequest::text("s", "hello")).await;
        assert!(matches!(report.extraction, ExtractionOutcome::Degraded { .. }));
        assert_eq!(report.accepted, 0);
        assert!(sink.rows().is_empty());
        assert!(pipeline.feed().is_empty().await);
        assert_eq!(report.acknowledgement(), "⚠️ No valid candidate details found in your file or message.");
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_stop_other_records() {
        let sink = Arc::new(MemorySink::failing_for("Alice"));
        let (pipeline, _) = pipeline(r#"[{"Name": "Alice"}, {"Name": "Bob"}]"#, None, sink.clone());

        let report = pipeline.ingest(&IntakeRequest::text("s", "Alice and Bob")).await;
        assert_eq!(report.accepted, 2);
        assert_eq!(report.persisted, 1);
        assert_eq!(report.sink_failures.len(), 1);
        assert_eq!(sink.rows(), vec![ContactRecord::new("Bob", "", "")]);
        // Both records still reach the feed.
        assert_eq!(pipeline.feed().len().await, 2);
    }

    #[tokio::test]
    async fn test_sink_failure_reason_is_redacted() {
        let sink = Arc::new(MemorySink::failing_for("Alice"));
        let (pipeline, _) = pipeline(r#"[{"Name": "Alice", "Email": "alice@x.com"}]"#, None, sink);

        let report = pipeline.ingest(&IntakeRequest::text("s", "Alice")).await;
        assert_eq!(report.sink_failures.len(), 1);
        assert!(!report.sink_failures[0].contains("alice@x.com"));
        assert!(report.sink_failures[0].contains("[REDACTED_EMAIL]"));
    }

    #[tokio::test]
    async fn test_failed_attachment_extracts_from_empty_text() {
        let sink = Arc::new(MemorySink::default());
        let (pipeline, provider) = pipeline("[]", None, sink.clone());

        let request = IntakeRequest::text("s", "body text").with_attachment("https://media/1", "application/pdf");
        let report = pipeline.ingest(&request).await;

        assert!(matches!(report.text_source, TextSource::AttachmentFailed { ref kind, .. } if kind == "pdf"));
        assert_eq!(report.extraction, ExtractionOutcome::Empty);
        assert!(provider.prompts()[0].ends_with("Text:\n"));
    }
}
