use lab_desk_domain::entities::ReportDocument;
use lab_desk_domain::export::{ExportError, ReportExporter};

/// Serializes the report document as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

impl JsonExporter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ReportExporter for JsonExporter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn export(&self, document: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_desk_domain::services::assemble_report;
    use lab_desk_domain::testing::{sample_context, sample_payload, SAMPLE_PATIENT_CODE};
    use lab_desk_domain::entities::conversions::convert_to_domain_report;

    fn document() -> ReportDocument {
        let context = sample_context();
        let data = convert_to_domain_report(sample_payload(SAMPLE_PATIENT_CODE), context.generated_at);
        assemble_report(&data, &context)
    }

    #[test]
    fn test_json_round_trips_document() {
        let document = document();
        let bytes = JsonExporter::pretty().export(&document).unwrap();
        let parsed: ReportDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let bytes = JsonExporter::default().export(&document()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("\"title\":\"LABORATORY INVESTIGATION REPORT\""));
    }
}
