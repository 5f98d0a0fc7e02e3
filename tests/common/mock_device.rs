//! Mock picture frame for transport tests.

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer playing the frame's upload endpoint
pub struct MockDevice {
    pub server: MockServer,
}

impl MockDevice {
    /// Start a new mock frame
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL, as a user would configure `device_url`
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Full upload URL
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.server.uri())
    }

    /// Answer every upload with `status`
    pub async fn respond_with_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(status).set_body_string("OK"))
            .mount(&self.server)
            .await;
    }

    /// Refuse the first upload with `status`, accept the rest
    pub async fn fail_once_then_accept(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
        self.respond_with_status(200).await;
    }

    /// Bodies of all upload requests received so far
    pub async fn upload_bodies(&self) -> Vec<Vec<u8>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/upload")
            .map(|r| r.body)
            .collect()
    }
}
