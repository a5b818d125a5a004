use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;

use crate::conf::Conf;
use crate::conf::ObsAuth;
use crate::error::Error;

use super::Binary;
use super::BuildService;

/// String to set as the user agent in HTTP requests.
static CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build service API client for the HTTP(S) protocol.
pub struct HttpClient {
    /// Optional basic auth credentials for the API server.
    auth: Option<ObsAuth>,

    /// Base URL of the API server to send requests to.
    base: String,

    /// Low-level [`Client`](reqwest::Client) to perform HTTP requests with.
    client: ReqwestClient,
}

impl HttpClient {
    /// Initialise a client for the configured API server.
    pub fn with(conf: &Conf) -> Result<HttpClient> {
        let client = ReqwestClient::builder()
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .context("could not initialise the build service client")?;
        let client = HttpClient {
            auth: conf.auth.clone(),
            base: conf.apiurl.trim_end_matches('/').to_string(),
            client,
        };
        Ok(client)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.auth {
            Some(auth) => request.basic_auth(&auth.user, Some(&auth.password)),
            None => request,
        }
    }
}

/// Binary list document returned by the build service.
#[derive(Debug, Deserialize)]
struct BinaryList {
    #[serde(default, rename = "binary")]
    binaries: Vec<Binary>,
}

#[async_trait::async_trait]
impl BuildService for HttpClient {
    async fn list_binaries(
        &self,
        project: &str,
        repo: &str,
        arch: &str,
        package: &str,
    ) -> Result<Vec<Binary>> {
        let url = format!(
            "{}/build/{}/{}/{}/{}",
            self.base, project, repo, arch, package,
        );
        let response = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("could not list binaries from {}", url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::response_status(url, status.as_u16()).into());
        }
        let body = response
            .text()
            .await
            .with_context(|| format!("could not read the binary list from {}", url))?;
        let list: BinaryList =
            quick_xml::de::from_str(&body).context(Error::response_decode(url.as_str()))?;
        Ok(list.binaries)
    }

    async fn fetch_binary(
        &self,
        project: &str,
        repo: &str,
        arch: &str,
        package: &str,
        name: &str,
        target: &Path,
    ) -> Result<()> {
        let url = format!(
            "{}/build/{}/{}/{}/{}/{}",
            self.base, project, repo, arch, package, name,
        );
        let response = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("could not fetch {}", url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::response_status(url, status.as_u16()).into());
        }
        let body = response
            .bytes()
            .await
            .with_context(|| format!("could not read the body of {}", url))?;
        tokio::fs::write(target, &body)
            .await
            .with_context(|| format!("could not write {}", target.display()))?;
        Ok(())
    }
}
