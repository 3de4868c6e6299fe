//! HTTP request/response types for the host-does-IO split.
//!
//! # Design
//! `OptimizerClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. A `Transport` executes the round
//! trip in between, so request shaping and response interpretation stay
//! deterministic and can be tested with hand-written responses.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data. Non-2xx statuses are carried
/// here as well; interpreting them is the client's job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
