use anyhow::{bail, Context};
use reqwest::{
    blocking::{Client, Response},
    Method, StatusCode,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Default, Serialize)]
struct ReminderBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
}

/// Blocking client for the reminders API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    backend_uri: String,
}

impl HttpClient {
    pub fn new(backend_uri: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            backend_uri: backend_uri.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Sends `body` as JSON and returns the pretty-printed response body.
    fn api_call(
        &self,
        method: Method,
        path: &str,
        body: Option<&ReminderBody>,
        expected: StatusCode,
    ) -> anyhow::Result<String> {
        let url = format!("{}{}", self.backend_uri, path);
        let mut req = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req
            .send()
            .with_context(|| format!("could not make http call {} {}", method, url))?;

        let status = res.status();
        let body = read_body(res)?;
        if status != expected {
            bail!(
                "expected response status {}, got {}: {}",
                expected.as_u16(),
                status.as_u16(),
                body
            );
        }
        Ok(body)
    }

    pub fn create(&self, title: &str, message: &str, duration: u64) -> anyhow::Result<String> {
        let body = ReminderBody {
            title: Some(title),
            message: Some(message),
            duration: Some(duration),
        };
        self.api_call(Method::POST, "/reminders", Some(&body), StatusCode::CREATED)
    }

    pub fn edit(
        &self,
        id: u64,
        title: Option<&str>,
        message: Option<&str>,
        duration: Option<u64>,
    ) -> anyhow::Result<String> {
        let body = ReminderBody {
            title,
            message,
            duration,
        };
        let path = format!("/reminders/{}", id);
        self.api_call(Method::PATCH, &path, Some(&body), StatusCode::OK)
    }

    pub fn fetch(&self, ids: &[u64]) -> anyhow::Result<String> {
        let path = format!("/reminders/{}", join_ids(ids));
        self.api_call(Method::GET, &path, None, StatusCode::OK)
    }

    pub fn delete(&self, ids: &[u64]) -> anyhow::Result<()> {
        let path = format!("/reminders/{}", join_ids(ids));
        self.api_call(Method::DELETE, &path, None, StatusCode::NO_CONTENT)?;
        Ok(())
    }

    pub fn healthy(&self) -> bool {
        self.client
            .get(format!("{}/health", self.backend_uri))
            .send()
            .map(|res| res.status() == StatusCode::OK)
            .unwrap_or(false)
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn read_body(res: Response) -> anyhow::Result<String> {
    let bs = res.bytes().context("could not read response body")?;
    if bs.is_empty() {
        return Ok(String::new());
    }
    let value: Value = serde_json::from_slice(&bs).context("response body is not json")?;
    Ok(serde_json::to_string_pretty(&value)?)
}
