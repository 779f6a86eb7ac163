//! Credential-injecting relay for read-only Bungie.net platform calls.
//!
//! Each call attaches the server-held API key (and the caller's bearer token
//! where required) and hands back the upstream body untouched.

use reqwest::header;

use crate::client::{API_KEY_HEADER, BungieClient, check_status};
use crate::error::{BungieError, Result};

/// Platform endpoints the relay is allowed to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEndpoint {
    /// Destiny memberships for the token's owner.
    CurrentUserMemberships,
    /// Public milestone definitions; no user token involved.
    PublicMilestones,
}

impl PlatformEndpoint {
    /// Path below the platform API root.
    pub fn path(&self) -> &'static str {
        match self {
            PlatformEndpoint::CurrentUserMemberships => "/User/GetMembershipsForCurrentUser/",
            PlatformEndpoint::PublicMilestones => "/Destiny2/Milestones/",
        }
    }

    /// Whether the call must carry the caller's bearer token.
    pub fn requires_user_token(&self) -> bool {
        matches!(self, PlatformEndpoint::CurrentUserMemberships)
    }
}

/// Raw upstream success.
#[derive(Debug, Clone)]
pub struct PlatformResponse {
    /// Content type reported by Bungie, if any.
    pub content_type: Option<String>,
    /// Body exactly as received.
    pub body: String,
}

impl BungieClient {
    /// GET a platform endpoint with the API key and optional bearer token.
    ///
    /// One request, no retry. Non-2xx answers surface as
    /// [`BungieError::Status`]. Endpoints that need a user token fail with
    /// [`BungieError::MissingToken`] before anything is sent.
    pub async fn platform_get(
        &self,
        endpoint: PlatformEndpoint,
        access_token: Option<&str>,
    ) -> Result<PlatformResponse> {
        if endpoint.requires_user_token() && access_token.is_none() {
            return Err(BungieError::MissingToken(endpoint.path()));
        }

        let url = format!(
            "{}{}",
            self.endpoints.api_base_url.trim_end_matches('/'),
            endpoint.path()
        );

        let mut req = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, self.credentials.api_key());

        if let Some(token) = access_token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        tracing::debug!(endpoint = ?endpoint, with_user_token = access_token.is_some(), "Relaying platform call");

        let response = check_status(req.send().await?).await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(PlatformResponse { content_type, body })
    }

    /// Memberships for the user owning `access_token`.
    pub async fn current_user_memberships(&self, access_token: &str) -> Result<PlatformResponse> {
        self.platform_get(PlatformEndpoint::CurrentUserMemberships, Some(access_token))
            .await
    }

    /// Public milestones, authenticated with the API key only.
    pub async fn public_milestones(&self) -> Result<PlatformResponse> {
        self.platform_get(PlatformEndpoint::PublicMilestones, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_config::{BungieSection, Credentials};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BungieClient {
        let endpoints = BungieSection {
            api_base_url: format!("{}/Platform", server.uri()),
            timeout_secs: 1,
            ..Default::default()
        };
        BungieClient::new(endpoints, Credentials::new("12345", "s3cret", "api-key")).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            PlatformEndpoint::CurrentUserMemberships.path(),
            "/User/GetMembershipsForCurrentUser/"
        );
        assert_eq!(PlatformEndpoint::PublicMilestones.path(), "/Destiny2/Milestones/");
        assert!(PlatformEndpoint::CurrentUserMemberships.requires_user_token());
        assert!(!PlatformEndpoint::PublicMilestones.requires_user_token());
    }

    #[tokio::test]
    async fn test_memberships_injects_headers_and_returns_body_verbatim() {
        let server = MockServer::start().await;
        let body = r#"{"Response":{"destinyMemberships":[]},"ErrorCode":1}"#;
        Mock::given(method("GET"))
            .and(path("/Platform/User/GetMembershipsForCurrentUser/"))
            .and(header("x-api-key", "api-key"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .current_user_memberships("tok")
            .await
            .unwrap();
        assert_eq!(response.body, body);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_milestones_sends_api_key_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Platform/Destiny2/Milestones/"))
            .and(header("x-api-key", "api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).public_milestones().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_upstream_status_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).public_milestones().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.body(), Some("maintenance"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_network_error() {
        let endpoints = BungieSection {
            api_base_url: "http://127.0.0.1:1/Platform".to_string(),
            timeout_secs: 1,
            ..Default::default()
        };
        let client =
            BungieClient::new(endpoints, Credentials::new("12345", "s3cret", "api-key")).unwrap();

        let err = client.public_milestones().await.unwrap_err();
        assert!(matches!(err, BungieError::Network(_) | BungieError::Timeout));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_user_endpoint_without_token_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .platform_get(PlatformEndpoint::CurrentUserMemberships, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BungieError::MissingToken(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_redirect_is_not_followed() {
        let server = MockServer::start().await;
        let elsewhere = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"from\":\"elsewhere\"}"))
            .expect(0)
            .mount(&elsewhere)
            .await;
        Mock::given(method("GET"))
            .and(path("/Platform/Destiny2/Milestones/"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/collect", elsewhere.uri()).as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).public_milestones().await.unwrap_err();
        assert_eq!(err.status(), Some(302));
        assert!(elsewhere.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_key_from_secret_file_with_newline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-api-key", "api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = Credentials::from_lookup(|name| {
            Some(match name {
                loadout_config::API_KEY_VAR => "api-key\n".to_string(),
                _ => "value\n".to_string(),
            })
        })
        .unwrap();
        let endpoints = BungieSection {
            api_base_url: format!("{}/Platform", server.uri()),
            timeout_secs: 1,
            ..Default::default()
        };
        let client = BungieClient::new(endpoints, credentials).unwrap();

        client.public_milestones().await.unwrap();
    }
}
