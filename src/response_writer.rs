use serde::Serialize;
use tracing::error;

use crate::status_code_registry::{self, ReasonPhrase};

#[derive(Debug)]
pub struct ResponseWriter {
    status_code: Option<u16>,
    reason_phrase: Option<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseWriter {
    fn new(status_code: Option<u16>, reason_phrase: Option<String>) -> Self {
        Self {
            status_code,
            reason_phrase,
            headers: vec![],
            body: vec![],
        }
    }

    pub fn new_empty() -> Self {
        Self::new(None, None)
    }

    pub fn get_status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn set_reason_phrase(&mut self, reason_phrase: ReasonPhrase) {
        self.status_code = Some(status_code_registry::get_status_code(reason_phrase));
        self.reason_phrase = Some(reason_phrase.to_string());
    }

    fn add_header(&mut self, k: String, v: String) {
        if let Some(entry) = self
            .headers
            .iter_mut()
            .find(|entry| entry.0.eq_ignore_ascii_case(&k))
        {
            entry.1 = v;
        } else {
            self.headers.push((k, v));
        }
    }

    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|entry| entry.0.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_content_type_header(&self) -> Option<&str> {
        self.get_header("content-type")
    }

    pub fn add_content_encoding_header(&mut self, content_encoding: &str) {
        self.add_header("Content-Encoding".to_owned(), content_encoding.to_owned());
    }

    fn add_content_type_header(&mut self, content_type: &str) {
        self.add_header("Content-Type".to_owned(), content_type.to_owned());
    }

    fn add_content_length_header(&mut self) {
        self.add_header("Content-Length".to_owned(), self.body.len().to_string());
    }

    pub fn get_body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<u8>, content_type: &str) {
        self.body = body;
        self.add_content_type_header(content_type);
        self.add_content_length_header();
    }

    /// Serializes `value` as the JSON body. A serialization failure turns
    /// the response into a bare 500.
    pub fn set_json(&mut self, value: &impl Serialize) {
        match serde_json::to_vec(value) {
            Ok(body) => self.set_body(body, "application/json"),
            Err(err) => {
                error!(?err, "could not serialize response body");
                self.body.clear();
                self.set_reason_phrase(ReasonPhrase::InternalServerError);
            }
        }
    }

    pub fn write(mut self) -> Vec<u8> {
        if self.status_code.is_none() {
            self.set_reason_phrase(ReasonPhrase::OK);
        }
        if self.get_header("content-length").is_none() {
            self.add_content_length_header();
        }

        let mut status_line = format!("HTTP/1.1 {}", self.status_code.unwrap_or(200));
        if let Some(reason_phrase) = &self.reason_phrase {
            status_line = format!("{} {}", status_line, reason_phrase);
        }
        status_line.push_str("\r\n");

        let mut headers = self
            .headers
            .into_iter()
            .map(|(k, v)| format!("{}: {}\r\n", k, v))
            .collect::<String>();
        headers.push_str("\r\n");

        let mut resp = vec![];
        resp.extend(status_line.bytes());
        resp.extend(headers.bytes());
        resp.extend(self.body);
        resp
    }
}
