use url::Url;

use crate::{Error, HttpClient};

/// Default `HttpClient` backed by a shared `reqwest::Client`.
pub struct ReqwestClient {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(base: impl AsRef<str>) -> Result<Self, Error> {
        Self::with_client(base, reqwest::Client::new())
    }

    pub fn with_client(base: impl AsRef<str>, client: reqwest::Client) -> Result<Self, Error> {
        let mut base = Url::parse(base.as_ref())?;
        // `Url::join` drops the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

impl HttpClient for ReqwestClient {
    async fn post_form(&self, endpoint: &str, form: &[(String, String)]) -> Result<Vec<u8>, Error> {
        let url = self.base.join(endpoint)?;
        tracing::debug!(endpoint, "post_form");

        let response = self.client.post(url).form(form).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn get_query(
        &self,
        endpoint: &str,
        token: &str,
        query: &[(String, String)],
    ) -> Result<Vec<u8>, Error> {
        let url = self.base.join(endpoint)?;
        tracing::debug!(endpoint, "get_query");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = ReqwestClient::new("https://slack.com/api").unwrap();
        assert_eq!(client.base_url().as_str(), "https://slack.com/api/");

        let joined = client.base_url().join("team.info").unwrap();
        assert_eq!(joined.as_str(), "https://slack.com/api/team.info");
    }

    #[test]
    fn base_url_with_trailing_slash_is_unchanged() {
        let client = ReqwestClient::new("https://slack.com/api/").unwrap();
        assert_eq!(client.base_url().as_str(), "https://slack.com/api/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ReqwestClient::new("not a url").is_err());
    }
}
