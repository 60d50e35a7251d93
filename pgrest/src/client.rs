use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{Query, ServiceUrl};

/// Ask PostgREST to echo the affected rows back.
const PREFER_REPRESENTATION: &str = "return=representation";
/// Ask PostgREST for a single JSON object instead of an array; zero or many rows is an error.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
/// PostgREST error code for "JSON object requested, multiple (or no) rows returned".
const NO_SINGLE_ROW: &str = "PGRST116";

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    url: ServiceUrl,
    api_key: String,
    access_token: Option<String>,
}

impl RestClient {
    pub fn new(url: ServiceUrl, api_key: impl Into<String>) -> Result<Self, RestError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RestError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url,
            api_key: api_key.into(),
            access_token: None,
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn url(&self) -> &ServiceUrl {
        &self.url
    }

    fn request(&self, method: Method, table: &str, query: &Query) -> RequestBuilder {
        let url = self.url.table(table).with_query(query);
        // Without a user token the anon key doubles as the bearer, as the hosted service expects.
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);

        self.http
            .request(method, url.as_ref())
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, RestError> {
        tracing::debug!("calling {}", call_name);

        let resp = request
            .send()
            .await
            .map_err(|e| RestError::Transport(format!("Failed to call {}: {}", call_name, e)))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let error = ErrorBody::parse(&body);
        let message = error
            .message()
            .unwrap_or_else(|| format!("{} returned {}", call_name, status));

        // 403 is a permission or row-level security rejection of a valid session.
        if status == StatusCode::UNAUTHORIZED {
            return Err(RestError::Unauthorized(message));
        }

        Err(RestError::Api {
            status: status.as_u16(),
            code: error.code,
            message,
        })
    }

    async fn json<T: DeserializeOwned>(resp: Response, call_name: &str) -> Result<T, RestError> {
        resp.json::<T>().await.map_err(|e| {
            RestError::Decode(format!("Failed to parse {} response as JSON: {}", call_name, e))
        })
    }

    /// `GET /rest/v1/{table}?{query}`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, RestError> {
        let call_name = format!("GET {}", table);
        let resp = self
            .send(self.request(Method::GET, table, query), &call_name)
            .await?;
        Self::json(resp, &call_name).await
    }

    /// `POST /rest/v1/{table}`, returning the inserted row.
    pub async fn insert_one<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, RestError> {
        let call_name = format!("POST {}", table);
        let request = self
            .request(Method::POST, table, &Query::new())
            .header("Prefer", PREFER_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(body);
        let resp = self.send(request, &call_name).await?;
        Self::json(resp, &call_name).await
    }

    /// `PATCH /rest/v1/{table}?{query}`. The query must match exactly one row.
    pub async fn update_one<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        body: &B,
    ) -> Result<T, RestError> {
        let call_name = format!("PATCH {}", table);
        let request = self
            .request(Method::PATCH, table, query)
            .header("Prefer", PREFER_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(body);
        let resp = self.send(request, &call_name).await?;
        Self::json(resp, &call_name).await
    }

    /// `DELETE /rest/v1/{table}?{query}`
    pub async fn delete(&self, table: &str, query: &Query) -> Result<(), RestError> {
        let call_name = format!("DELETE {}", table);
        let resp = self
            .send(self.request(Method::DELETE, table, query), &call_name)
            .await?;
        let _ = resp.bytes().await;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum RestError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

impl RestError {
    /// A single-row request matched no row (or more than one).
    pub fn is_not_found(&self) -> bool {
        matches!(self, RestError::Api { status: 406, .. })
            || matches!(self, RestError::Api { code: Some(code), .. } if code == NO_SINGLE_ROW)
    }
}

/// Error payload shared by the data and auth APIs. Each API fills a different subset.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
    pub error_description: Option<String>,
    pub msg: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Best human-readable message the service gave us.
    pub(crate) fn message(&self) -> Option<String> {
        let primary = self
            .message
            .as_ref()
            .or(self.error_description.as_ref())
            .or(self.msg.as_ref())
            .or(self.error.as_ref())?;

        match (&self.details, &self.hint) {
            (Some(details), _) if !details.is_empty() => Some(format!("{} ({})", primary, details)),
            (_, Some(hint)) if !hint.is_empty() => Some(format!("{} ({})", primary, hint)),
            _ => Some(primary.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;
    use crate::Direction;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
        title: String,
    }

    #[tokio::test]
    async fn select_sends_filters_and_keys() {
        let server = serve_once(200, r#"[{"id":"p1","title":"Alpha"}]"#).await;
        let client = RestClient::new(ServiceUrl::new(&server.base_url), "anon-key")
            .unwrap()
            .with_access_token("user-token");

        let query = Query::new()
            .select("*")
            .eq("user_id", "u1")
            .order("created_at", Direction::Descending);
        let rows: Vec<Row> = client.select("projects", &query).await.unwrap();

        assert_eq!(
            rows,
            vec![Row {
                id: "p1".to_string(),
                title: "Alpha".to_string()
            }]
        );

        let request = server.request().await;
        assert!(request.starts_with(
            "GET /rest/v1/projects?select=%2A&user_id=eq.u1&order=created_at.desc HTTP/1.1"
        ));
        assert!(request.contains("apikey: anon-key"));
        assert!(request.contains("authorization: Bearer user-token"));
    }

    #[tokio::test]
    async fn insert_asks_for_a_single_representation() {
        let server = serve_once(201, r#"{"id":"p2","title":"Beta"}"#).await;
        let client = RestClient::new(ServiceUrl::new(&server.base_url), "anon-key").unwrap();

        let row: Row = client
            .insert_one("projects", &serde_json::json!({ "title": "Beta" }))
            .await
            .unwrap();
        assert_eq!(row.id, "p2");

        let request = server.request().await;
        assert!(request.starts_with("POST /rest/v1/projects HTTP/1.1"));
        assert!(request.contains("prefer: return=representation"));
        assert!(request.contains("accept: application/vnd.pgrst.object+json"));
        assert!(request.contains("authorization: Bearer anon-key"));
        assert!(request.ends_with(r#"{"title":"Beta"}"#));
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let server = serve_once(
            400,
            r#"{"code":"23514","message":"new row violates check constraint \"projects_effort_check\"","details":null,"hint":null}"#,
        )
        .await;
        let client = RestClient::new(ServiceUrl::new(&server.base_url), "anon-key").unwrap();

        let err = client
            .update_one::<_, Row>(
                "projects",
                &Query::new().eq("id", "p1"),
                &serde_json::json!({ "effort": 11 }),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "new row violates check constraint \"projects_effort_check\""
        );
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn unmatched_single_row_update_is_not_found() {
        let server = serve_once(
            406,
            r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#,
        )
        .await;
        let client = RestClient::new(ServiceUrl::new(&server.base_url), "anon-key").unwrap();

        let err = client
            .update_one::<_, Row>(
                "projects",
                &Query::new().eq("id", "missing"),
                &serde_json::json!({ "title": "x" }),
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "JSON object requested, multiple (or no) rows returned (The result contains 0 rows)"
        );
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let server = serve_once(401, r#"{"message":"JWT expired"}"#).await;
        let client = RestClient::new(ServiceUrl::new(&server.base_url), "anon-key").unwrap();

        let err = client
            .delete("projects", &Query::new().eq("id", "p1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RestError::Unauthorized(ref m) if m == "JWT expired"));
    }

    #[tokio::test]
    async fn row_level_security_rejection_keeps_its_message() {
        let server = serve_once(
            403,
            r#"{"code":"42501","details":null,"hint":null,"message":"new row violates row-level security policy for table \"projects\""}"#,
        )
        .await;
        let client = RestClient::new(ServiceUrl::new(&server.base_url), "anon-key")
            .unwrap()
            .with_access_token("user-token");

        let err = client
            .insert_one::<_, Row>("projects", &serde_json::json!({ "title": "x" }))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RestError::Api { status: 403, code: Some(ref code), .. } if code == "42501"
        ));
        assert_eq!(
            err.to_string(),
            "new row violates row-level security policy for table \"projects\""
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn non_json_error_body_has_no_message() {
        assert_eq!(ErrorBody::parse("<html>bad gateway</html>").message(), None);
    }
}
