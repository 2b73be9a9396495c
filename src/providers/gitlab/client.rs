use log::debug;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{GlPipeError, Result};

pub mod pipelines;

const USER_AGENT: &str = concat!("glpipe/", env!("CARGO_PKG_VERSION"));

/// Client for the GitLab REST v4 API.
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    access_token: Token,
}

impl GitLabClient {
    /// `api_url` is the v4 root, e.g. `https://gitlab.com/api/v4`, with or
    /// without a trailing slash.
    pub fn new(api_url: &str, access_token: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GlPipeError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(api_url)
            .map_err(|e| GlPipeError::Config(format!("Invalid API URL '{api_url}': {e}")))?;

        if api_url.cannot_be_a_base() {
            return Err(GlPipeError::Config(format!(
                "Invalid API URL '{api_url}': not a base URL"
            )));
        }

        Ok(Self {
            client,
            api_url,
            access_token,
        })
    }

    /// Builds `<api_url>/projects/<project_id>/<segments...>`.
    ///
    /// The project id is a single path segment, so `group/project` paths
    /// are sent percent-encoded as GitLab expects.
    pub fn project_url(&self, project_id: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| GlPipeError::Config(format!("Invalid API URL '{}'", self.api_url)))?
            .pop_if_empty()
            .push("projects")
            .push(project_id)
            .extend(segments);
        Ok(url)
    }

    /// Sends an authenticated request and checks the status code.
    ///
    /// Reads must answer `200 OK`; writes are accepted with `200 OK` or `201 Created`.
    async fn send(&self, method: Method, mut url: Url) -> Result<Response> {
        url.query_pairs_mut()
            .append_pair("access_token", self.access_token.as_str());

        debug!("[{method}] {}", url.path());

        let response = self
            .client
            .request(method.clone(), url.clone())
            .send()
            .await?;

        let status = response.status();
        let accepted = if method == Method::GET {
            status == StatusCode::OK
        } else {
            status == StatusCode::OK || status == StatusCode::CREATED
        };

        if !accepted {
            return Err(GlPipeError::Request {
                method,
                path: url.path().to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(Method::GET, url).await?;
        Self::parse_body(response).await
    }

    async fn post<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(Method::POST, url).await?;
        Self::parse_body(response).await
    }

    /// Reading the body can fail in transport (`Network`); decoding it is a `Json` error.
    async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// POST whose response body is not needed.
    async fn post_discard(&self, url: Url) -> Result<()> {
        self.send(Method::POST, url).await?;
        Ok(())
    }
}
