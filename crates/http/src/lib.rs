use std::future::Future;

mod client;

pub use client::ReqwestClient;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Transport seam for the Slack Web API. Implementations perform exactly one
/// HTTP round trip per call and treat non-2xx statuses as errors.
pub trait HttpClient: Send + Sync {
    /// POST `<base>/<endpoint>` with an `application/x-www-form-urlencoded`
    /// body built from `form`.
    fn post_form(
        &self,
        endpoint: &str,
        form: &[(String, String)],
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;

    /// GET `<base>/<endpoint>?<query>`. The token travels in a bearer
    /// `Authorization` header rather than the query string.
    fn get_query(
        &self,
        endpoint: &str,
        token: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
}
