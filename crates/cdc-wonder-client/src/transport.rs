//! HTTP transport to the WONDER endpoint
//!
//! The request document travels as the `request_xml` field of a form POST.
//! Error replies embed one or more `<message>` elements explaining the
//! rejection; all of them are surfaced to the caller.

use cdc_wonder_diagnostics::{Result, WonderError};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Fixed endpoint of the Detailed Mortality dataset
pub const ENDPOINT: &str = "https://wonder.cdc.gov/controller/datarequest/D76";

/// Carries a rendered request document to the service and returns the raw
/// reply text.
///
/// The seam for tests and alternate backends; the library never retries a
/// failed send.
pub trait Transport {
    fn post(&self, request_xml: &str) -> Result<String>;
}

/// Blocking HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport against the standard D76 endpoint
    pub fn new() -> Self {
        Self::with_endpoint(ENDPOINT)
    }

    /// Create a transport against a different endpoint (test servers)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn post(&self, request_xml: &str) -> Result<String> {
        log::debug!("posting request to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("request_xml", request_xml)])
            .send()
            .map_err(|e| WonderError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| WonderError::transport(e.to_string()))?;

        if !status.is_success() {
            let messages = extract_server_messages(&body);
            log::warn!(
                "server rejected request with status {status} and {} message(s)",
                messages.len()
            );
            return Err(WonderError::server(status.as_u16(), messages));
        }
        Ok(body)
    }
}

/// Collect the text of every `<message>` element in an error reply.
///
/// Best-effort: an error page that is not XML simply yields no messages.
pub fn extract_server_messages(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut messages = Vec::new();
    let mut current: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"message" => {
                current = Some(String::new());
            }
            Ok(Event::Text(e)) => {
                if let Some(message) = current.as_mut() {
                    if let Ok(text) = e.xml_content() {
                        message.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"message" => {
                if let Some(message) = current.take() {
                    let trimmed = message.trim();
                    if !trimmed.is_empty() {
                        messages.push(trimmed.to_string());
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_every_message() {
        let xml = r#"<page><response>
            <message>The value is out of range.</message>
            <message>No data available for this selection.</message>
        </response></page>"#;
        assert_eq!(
            extract_server_messages(xml),
            vec![
                "The value is out of range.",
                "No data available for this selection.",
            ]
        );
    }

    #[test]
    fn test_non_xml_reply_yields_no_messages() {
        assert!(extract_server_messages("502 Bad Gateway").is_empty());
    }
}
