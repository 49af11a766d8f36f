use std::collections::HashMap;

use serde::Deserialize;
use serde::de::Error as _;
use serde_json::{Map, Value};

use crate::error::Error;

pub const DEFAULT_LOGINS_COUNT: i64 = 100;
pub const DEFAULT_LOGINS_PAGE: i64 = 1;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub email_domain: String,
    #[serde(default)]
    pub icon: Map<String, Value>,
}

/// One team directory entry of an Enterprise Grid organization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnterpriseInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub email_domain: String,
    #[serde(default)]
    pub icon: Map<String, Value>,
    #[serde(default)]
    pub teams: Vec<TeamInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamProfile {
    #[serde(default)]
    pub fields: Vec<TeamProfileField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamProfileField {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ordering: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub hint: String,
    #[serde(rename = "type")]
    #[serde(default)]
    pub field_type: String,
    #[serde(default)]
    pub possible_values: Vec<String>,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub options: HashMap<String, bool>,
}

/// One historical login event from `team.accessLogs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub date_first: i64,
    #[serde(default)]
    pub date_last: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub isp: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingActive {
    #[serde(default)]
    pub billing_active: bool,
}

/// Slack does not document the integration log entry schema; the raw object
/// is kept as-is so modeling it later stays additive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationLog {
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub pages: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// One page of `team.integrationLogs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationLogs {
    #[serde(default)]
    pub logs: Vec<IntegrationLog>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self, endpoint: &str) -> Result<T, Error> {
        if !self.ok {
            return Err(Error::Api {
                endpoint: endpoint.to_string(),
                code: self.error.unwrap_or_else(|| "unknown_error".into()),
            });
        }
        self.data
            .ok_or_else(|| Error::Json(serde_json::Error::custom("missing response payload")))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamPayload {
    pub team: TeamInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfilePayload {
    pub profile: TeamProfile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LoginsPayload {
    #[serde(default)]
    pub logins: Vec<Login>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BillablePayload {
    pub billable_info: HashMap<String, BillingActive>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnterprisePayload {
    pub enterprise: EnterpriseInfo,
}

/// Append `key=value` only when `include` holds. Each parameter struct lists
/// its wire fields through this in one place, so the default-omission rules
/// stay auditable.
fn field(out: &mut Vec<(String, String)>, key: &str, value: String, include: bool) {
    if include {
        out.push((key.to_string(), value));
    }
}

/// Parameters for `team.accessLogs`. Fields at their default are left off
/// the wire.
#[derive(Debug, Clone)]
pub struct AccessLogsParams {
    pub count: i64,
    pub page: i64,
}

impl Default for AccessLogsParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_LOGINS_COUNT,
            page: DEFAULT_LOGINS_PAGE,
        }
    }
}

impl AccessLogsParams {
    pub(crate) fn fields(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        field(
            &mut out,
            "count",
            self.count.to_string(),
            self.count != DEFAULT_LOGINS_COUNT,
        );
        field(
            &mut out,
            "page",
            self.page.to_string(),
            self.page != DEFAULT_LOGINS_PAGE,
        );
        out
    }
}

/// Parameters for `team.integrationLogs`. String filters are sent only when
/// non-empty, count/page only when non-default.
#[derive(Debug, Clone)]
pub struct IntegrationLogsParams {
    pub app_id: String,
    pub change_type: String,
    pub service_id: String,
    pub team_id: String,
    pub user: String,
    pub count: i64,
    pub page: i64,
}

impl Default for IntegrationLogsParams {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            change_type: String::new(),
            service_id: String::new(),
            team_id: String::new(),
            user: String::new(),
            count: DEFAULT_LOGINS_COUNT,
            page: DEFAULT_LOGINS_PAGE,
        }
    }
}

impl IntegrationLogsParams {
    pub(crate) fn fields(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        field(&mut out, "app_id", self.app_id.clone(), !self.app_id.is_empty());
        field(
            &mut out,
            "change_type",
            self.change_type.clone(),
            !self.change_type.is_empty(),
        );
        field(
            &mut out,
            "service_id",
            self.service_id.clone(),
            !self.service_id.is_empty(),
        );
        field(&mut out, "team_id", self.team_id.clone(), !self.team_id.is_empty());
        field(&mut out, "user", self.user.clone(), !self.user.is_empty());
        field(
            &mut out,
            "count",
            self.count.to_string(),
            self.count != DEFAULT_LOGINS_COUNT,
        );
        field(
            &mut out,
            "page",
            self.page.to_string(),
            self.page != DEFAULT_LOGINS_PAGE,
        );
        out
    }
}

/// Parameters for `discovery.enterprise.info`.
#[derive(Debug, Clone, Default)]
pub struct EnterpriseInfoParams {
    pub cursor: String,
    pub limit: i64,
    pub include_deleted: bool,
}

impl EnterpriseInfoParams {
    pub(crate) fn fields(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        field(&mut out, "cursor", self.cursor.clone(), !self.cursor.is_empty());
        field(&mut out, "limit", self.limit.to_string(), self.limit != 0);
        field(
            &mut out,
            "include_deleted",
            self.include_deleted.to_string(),
            self.include_deleted,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_logs_defaults_are_omitted() {
        assert!(AccessLogsParams::default().fields().is_empty());
    }

    #[test]
    fn access_logs_non_defaults_are_encoded() {
        let params = AccessLogsParams { count: 50, page: 3 };
        assert_eq!(
            params.fields(),
            vec![
                ("count".to_string(), "50".to_string()),
                ("page".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn integration_logs_defaults_are_omitted() {
        assert!(IntegrationLogsParams::default().fields().is_empty());
    }

    #[test]
    fn integration_logs_filters_are_encoded_when_set() {
        let params = IntegrationLogsParams {
            app_id: "A1".into(),
            user: "U1".into(),
            page: 2,
            ..Default::default()
        };
        assert_eq!(
            params.fields(),
            vec![
                ("app_id".to_string(), "A1".to_string()),
                ("user".to_string(), "U1".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn enterprise_info_defaults_are_omitted() {
        assert!(EnterpriseInfoParams::default().fields().is_empty());
    }

    #[test]
    fn enterprise_info_non_defaults_are_encoded() {
        let params = EnterpriseInfoParams {
            cursor: "dXNlcjpVMDYx".into(),
            limit: 20,
            include_deleted: true,
        };
        assert_eq!(
            params.fields(),
            vec![
                ("cursor".to_string(), "dXNlcjpVMDYx".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("include_deleted".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn envelope_success_yields_payload() {
        let body = r#"{"ok": true, "team": {"id": "T1", "name": "Acme"}}"#;
        let envelope: ApiEnvelope<TeamPayload> = serde_json::from_str(body).unwrap();
        let payload = envelope.into_result("team.info").unwrap();
        assert_eq!(payload.team.id, "T1");
        assert_eq!(payload.team.name, "Acme");
        assert_eq!(payload.team.domain, "");
    }

    #[test]
    fn envelope_failure_carries_remote_code() {
        let body = r#"{"ok": false, "error": "not_authed"}"#;
        let envelope: ApiEnvelope<TeamPayload> = serde_json::from_str(body).unwrap();
        let err = envelope.into_result("team.info").unwrap_err();
        match err {
            Error::Api { endpoint, code } => {
                assert_eq!(endpoint, "team.info");
                assert_eq!(code, "not_authed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn envelope_success_without_payload_is_a_decode_error() {
        let body = r#"{"ok": true}"#;
        let envelope: ApiEnvelope<TeamPayload> = serde_json::from_str(body).unwrap();
        let err = envelope.into_result("team.info").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn logins_payload_decodes_with_paging() {
        let body = r#"{
            "ok": true,
            "logins": [{"user_id": "U1", "username": "alice", "count": 2}],
            "paging": {"count": 100, "total": 412, "page": 2, "pages": 5}
        }"#;
        let envelope: ApiEnvelope<LoginsPayload> = serde_json::from_str(body).unwrap();
        let payload = envelope.into_result("team.accessLogs").unwrap();
        assert_eq!(payload.logins.len(), 1);
        assert_eq!(payload.logins[0].username, "alice");
        assert_eq!(payload.paging.page, 2);
        assert_eq!(payload.paging.pages, 5);
    }

    #[test]
    fn profile_field_type_tag_is_renamed() {
        let body = r#"{
            "id": "Xf01",
            "ordering": 1,
            "label": "Phone",
            "type": "text",
            "possible_values": ["a", "b"],
            "is_hidden": true,
            "options": {"is_protected": true}
        }"#;
        let field: TeamProfileField = serde_json::from_str(body).unwrap();
        assert_eq!(field.field_type, "text");
        assert_eq!(field.possible_values.len(), 2);
        assert!(field.is_hidden);
        assert_eq!(field.options.get("is_protected"), Some(&true));
    }

    #[test]
    fn integration_log_keeps_raw_object() {
        let body = r#"{"service_id": "S1", "date": "1234"}"#;
        let log: IntegrationLog = serde_json::from_str(body).unwrap();
        assert_eq!(log.raw.get("service_id").and_then(Value::as_str), Some("S1"));
    }

    #[test]
    fn billable_payload_is_keyed_by_user() {
        let body = r#"{"ok": true, "billable_info": {"U1": {"billing_active": true}}}"#;
        let envelope: ApiEnvelope<BillablePayload> = serde_json::from_str(body).unwrap();
        let payload = envelope.into_result("team.billableInfo").unwrap();
        assert!(payload.billable_info["U1"].billing_active);
    }
}
