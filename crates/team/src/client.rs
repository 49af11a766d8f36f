use std::collections::HashMap;
use std::future::Future;

use serde::de::DeserializeOwned;
use slack_http::HttpClient;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::types::{
    AccessLogsParams, ApiEnvelope, BillablePayload, BillingActive, EnterpriseInfo,
    EnterpriseInfoParams, EnterprisePayload, IntegrationLogs, IntegrationLogsParams, Login,
    LoginsPayload, Paging, ProfilePayload, TeamInfo, TeamPayload, TeamProfile,
};

pub const SLACK_API_URL: &str = "https://slack.com/api/";

/// Typed client for the team-management surface of the Slack Web API.
///
/// The token is fixed at construction and attached to every request; methods
/// take `&self` and share no mutable state, so concurrent calls are
/// independent. Every `*_with_cancel` variant races the call against the
/// supplied token and returns [`Error::Cancelled`] when the token fires
/// first. The plain variants are also safe to cancel by dropping the future.
pub struct SlackTeamClient<C> {
    http: C,
    token: String,
}

impl SlackTeamClient<slack_http::ReqwestClient> {
    /// Client against the production API with a default transport.
    pub fn from_token(token: impl Into<String>) -> Result<Self, Error> {
        let http = slack_http::ReqwestClient::new(SLACK_API_URL).map_err(Error::Http)?;
        Ok(Self::new(http, token))
    }
}

impl<C: HttpClient> SlackTeamClient<C> {
    pub fn new(http: C, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }

    fn form_with_token(&self, fields: Vec<(String, String)>) -> Vec<(String, String)> {
        let mut form = vec![("token".to_string(), self.token.clone())];
        form.extend(fields);
        form
    }

    async fn post_envelope<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Vec<(String, String)>,
    ) -> Result<ApiEnvelope<T>, Error> {
        let bytes = self
            .http
            .post_form(endpoint, &form)
            .await
            .map_err(Error::Http)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Vec<(String, String)>,
    ) -> Result<T, Error> {
        self.post_envelope(endpoint, form)
            .await?
            .into_result(endpoint)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, Error> {
        let bytes = self
            .http
            .get_query(endpoint, &self.token, &query)
            .await
            .map_err(Error::Http)?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)?;
        envelope.into_result(endpoint)
    }

    /// Info about the token's own team.
    pub async fn team_info(&self) -> Result<TeamInfo, Error> {
        let payload: TeamPayload = self
            .post("team.info", self.form_with_token(Vec::new()))
            .await?;
        Ok(payload.team)
    }

    pub async fn team_info_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<TeamInfo, Error> {
        with_cancel(cancel, self.team_info()).await
    }

    /// Info about any team. An empty `team` id falls back to [`Self::team_info`].
    pub async fn other_team_info(&self, team: &str) -> Result<TeamInfo, Error> {
        if team.is_empty() {
            return self.team_info().await;
        }
        let form = self.form_with_token(vec![("team".to_string(), team.to_string())]);
        let payload: TeamPayload = self.post("team.info", form).await?;
        Ok(payload.team)
    }

    pub async fn other_team_info_with_cancel(
        &self,
        cancel: &CancellationToken,
        team: &str,
    ) -> Result<TeamInfo, Error> {
        with_cancel(cancel, self.other_team_info(team)).await
    }

    pub async fn team_profile(&self) -> Result<TeamProfile, Error> {
        let payload: ProfilePayload = self
            .post("team.profile.get", self.form_with_token(Vec::new()))
            .await?;
        Ok(payload.profile)
    }

    pub async fn team_profile_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<TeamProfile, Error> {
        with_cancel(cancel, self.team_profile()).await
    }

    /// One page of login events.
    pub async fn access_logs(
        &self,
        params: &AccessLogsParams,
    ) -> Result<(Vec<Login>, Paging), Error> {
        let form = self.form_with_token(params.fields());
        let payload: LoginsPayload = self.post("team.accessLogs", form).await?;
        Ok((payload.logins, payload.paging))
    }

    pub async fn access_logs_with_cancel(
        &self,
        cancel: &CancellationToken,
        params: &AccessLogsParams,
    ) -> Result<(Vec<Login>, Paging), Error> {
        with_cancel(cancel, self.access_logs(params)).await
    }

    /// Billing status for a single user, keyed by user id.
    pub async fn billable_info(
        &self,
        user: &str,
    ) -> Result<HashMap<String, BillingActive>, Error> {
        let form = self.form_with_token(vec![("user".to_string(), user.to_string())]);
        let payload: BillablePayload = self.post("team.billableInfo", form).await?;
        Ok(payload.billable_info)
    }

    pub async fn billable_info_with_cancel(
        &self,
        cancel: &CancellationToken,
        user: &str,
    ) -> Result<HashMap<String, BillingActive>, Error> {
        with_cancel(cancel, self.billable_info(user)).await
    }

    /// Billing status for every user on the team.
    pub async fn billable_info_for_team(&self) -> Result<HashMap<String, BillingActive>, Error> {
        let payload: BillablePayload = self
            .post("team.billableInfo", self.form_with_token(Vec::new()))
            .await?;
        Ok(payload.billable_info)
    }

    pub async fn billable_info_for_team_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<HashMap<String, BillingActive>, Error> {
        with_cancel(cancel, self.billable_info_for_team()).await
    }

    /// One page of integration activity. The only GET endpoint here; the
    /// token goes out in the `Authorization` header.
    pub async fn integration_logs(
        &self,
        params: &IntegrationLogsParams,
    ) -> Result<IntegrationLogs, Error> {
        self.get("team.integrationLogs", params.fields()).await
    }

    pub async fn integration_logs_with_cancel(
        &self,
        cancel: &CancellationToken,
        params: &IntegrationLogsParams,
    ) -> Result<IntegrationLogs, Error> {
        with_cancel(cancel, self.integration_logs(params)).await
    }

    /// One page of the Enterprise Grid directory plus the cursor for the
    /// next page. An empty cursor means the last page was reached.
    pub async fn enterprise_info(
        &self,
        params: &EnterpriseInfoParams,
    ) -> Result<(EnterpriseInfo, String), Error> {
        let endpoint = "discovery.enterprise.info";
        let form = self.form_with_token(params.fields());
        let envelope: ApiEnvelope<EnterprisePayload> = self.post_envelope(endpoint, form).await?;
        let next_cursor = envelope
            .response_metadata
            .as_ref()
            .map(|metadata| metadata.next_cursor.clone())
            .unwrap_or_default();
        let payload = envelope.into_result(endpoint)?;
        Ok((payload.enterprise, next_cursor))
    }

    pub async fn enterprise_info_with_cancel(
        &self,
        cancel: &CancellationToken,
        params: &EnterpriseInfoParams,
    ) -> Result<(EnterpriseInfo, String), Error> {
        with_cancel(cancel, self.enterprise_info(params)).await
    }
}

async fn with_cancel<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    tokio::select! {
        () = cancel.cancelled() => Err(Error::Cancelled),
        result = call => result,
    }
}
