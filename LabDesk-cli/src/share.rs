use thiserror::Error;
use url::Url;

const VIEW_REPORT_SEGMENT: &str = "view-report";
const WHATSAPP_SHARE_BASE: &str = "https://wa.me/?text=";
const SHARE_MESSAGE_PREFIX: &str = "Check out this report: ";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Cannot build a report link under {0}")]
    CannotBeABase(String),
}

/// Link to the public copy of a patient's report: `{base}/view-report/{code}`.
///
/// Any path already on `base` is kept; the patient code is percent-encoded
/// as a single path segment.
pub fn public_report_link(base: &Url, patient_code: &str) -> Result<Url, ShareError> {
    let mut link = base.clone();
    link.set_query(None);
    link.set_fragment(None);
    {
        let mut segments = link
            .path_segments_mut()
            .map_err(|_| ShareError::CannotBeABase(base.to_string()))?;
        segments.pop_if_empty();
        segments.push(VIEW_REPORT_SEGMENT);
        segments.push(patient_code.trim());
    }
    Ok(link)
}

/// Messaging share URL carrying the report link
pub fn whatsapp_share_url(link: &str) -> String {
    let message = format!("{}{}", SHARE_MESSAGE_PREFIX, link);
    format!("{}{}", WHATSAPP_SHARE_BASE, urlencoding::encode(&message))
}
