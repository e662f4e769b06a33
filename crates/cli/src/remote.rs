//! [`TestableResource`] over HTTP, for checking a running `plugtest serve`.

use async_trait::async_trait;

use plugtest_conformance::{ConformanceError, ConformanceResult, TestableResource};
use plugtest_core::{Method, Request, Response, RESOURCE_PATH};

use crate::mapping::{decode_response, request_headers};

/// A plugtest resource reached through the HTTP mapping.
pub(crate) struct HttpResource {
    agent: ureq::Agent,
    url: String,
}

impl HttpResource {
    /// `base_url` is the server root; the resource path is appended.
    pub(crate) fn new(base_url: &str) -> Self {
        // 304 and 412 are ordinary plugtest outcomes, not transport errors.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            url: format!("{}/{}", base_url.trim_end_matches('/'), RESOURCE_PATH),
        }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }
}

fn exchange_blocking(
    agent: &ureq::Agent,
    url: &str,
    request: &Request,
) -> ConformanceResult<Response> {
    let headers = request_headers(request);
    let result = match request.method {
        Method::Get | Method::Delete => {
            let mut builder = if request.method == Method::Get {
                agent.get(url)
            } else {
                agent.delete(url)
            };
            for (name, value) in &headers {
                builder = builder.header(*name, value.as_str());
            }
            builder.call()
        }
        Method::Post | Method::Put => {
            let mut builder = if request.method == Method::Post {
                agent.post(url)
            } else {
                agent.put(url)
            };
            for (name, value) in &headers {
                builder = builder.header(*name, value.as_str());
            }
            builder.send_empty()
        }
    };

    let response = result.map_err(|e| {
        ConformanceError::Transport(format!("{} {}: {}", request.method, url, e))
    })?;
    let status = response.status().as_u16();
    let response_headers = response.headers().clone();
    let body = response
        .into_body()
        .read_to_vec()
        .map_err(|e| ConformanceError::Transport(format!("failed to read body: {}", e)))?;

    decode_response(request.method, status, &response_headers, &body)
        .map_err(ConformanceError::MalformedResponse)
}

#[async_trait]
impl TestableResource for HttpResource {
    async fn exchange(&self, request: &Request) -> ConformanceResult<Response> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || exchange_blocking(&agent, &url, &request))
            .await
            .map_err(|e| ConformanceError::Transport(format!("task join error: {}", e)))?
    }
}
