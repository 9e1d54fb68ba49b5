use serde::Serialize;
use uuid::Uuid;

/// Where the extraction input came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TextSource {
    Body,
    Attachment { kind: String },
    /// The attachment could not be read; extraction ran on empty text.
    AttachmentFailed { kind: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Parsed { count: usize },
    /// The model answered with an empty array.
    Empty,
    Degraded { reason: String },
}

/// Summary of one webhook's trip through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeReport {
    pub intake_id: Uuid,
    pub text_source: TextSource,
    pub extraction: ExtractionOutcome,
    /// Records with at least one non-empty field.
    pub accepted: usize,
    /// Accepted records the sink stored.
    pub persisted: usize,
    pub sink_failures: Vec<String>,
}

impl IntakeReport {
    /// Reply text for the sender, chosen by how many rows were stored.
    pub fn acknowledgement(&self) -> String {
        match self.persisted {
            0 => "⚠️ No valid candidate details found in your file or message.".to_string(),
            1 => "✅ 1 candidate’s details have been stored successfully.".to_string(),
            n => format!("✅ {n} candidates’ details have been stored successfully."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(persisted: usize) -> IntakeReport {
        IntakeReport {
            intake_id: Uuid::new_v4(),
            text_source: TextSource::Body,
            extraction: ExtractionOutcome::Parsed { count: persisted },
            accepted: persisted,
            persisted,
            sink_failures: Vec::new(),
        }
    }

    #[test]
    fn test_acknowledgement_wording() {
        assert_eq!(report(0).acknowledgement(), "⚠️ No valid candidate details found in your file or message.");
        assert_eq!(report(1).acknowledgement(), "✅ 1 candidate’s details have been stored successfully.");
        assert_eq!(report(3).acknowledgement(), "✅ 3 candidates’ details have been stored successfully.");
    }

    #[test]
    fn test_report_serializes_tagged() {
        let mut r = report(1);
        r.text_source = TextSource::Attachment { kind: "pdf".into() };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["text_source"]["source"], "attachment");
        assert_eq!(json["text_source"]["kind"], "pdf");
        assert_eq!(json["extraction"]["outcome"], "parsed");
    }
}
