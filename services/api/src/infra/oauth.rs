use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::repository::OAuthVerifier;
use crate::domain::types::{OAuthIdentity, OAuthProvider, non_blank};
use crate::error::ApiError;

const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const GITHUB_USER_URL: &str = "https://api.github.com/user";
const FACEBOOK_ME_URL: &str = "https://graph.facebook.com/me?fields=id,name,email,picture.type(large)";
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GoogleUser {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookUser {
    id: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<FacebookPicture>,
}

#[derive(Debug, Deserialize)]
struct FacebookPicture {
    data: FacebookPictureData,
}

#[derive(Debug, Deserialize)]
struct FacebookPictureData {
    url: Option<String>,
}

impl From<GoogleUser> for OAuthIdentity {
    fn from(user: GoogleUser) -> Self {
        Self {
            provider: OAuthProvider::Google,
            id: user.sub,
            // Unverified Google addresses can name any mailbox.
            email: non_blank(user.email).filter(|_| user.email_verified),
            name: non_blank(user.name),
            picture: non_blank(user.picture),
        }
    }
}

impl From<GithubUser> for OAuthIdentity {
    fn from(user: GithubUser) -> Self {
        Self {
            provider: OAuthProvider::Github,
            id: user.id.to_string(),
            email: non_blank(user.email),
            name: non_blank(user.name).or(Some(user.login)),
            picture: non_blank(user.avatar_url),
        }
    }
}

impl From<FacebookUser> for OAuthIdentity {
    fn from(user: FacebookUser) -> Self {
        Self {
            provider: OAuthProvider::Facebook,
            id: user.id,
            email: non_blank(user.email),
            name: non_blank(user.name),
            picture: non_blank(user.picture.and_then(|p| p.data.url)),
        }
    }
}

/// Verifies access tokens against each provider's user-info endpoint.
#[derive(Clone)]
pub struct HttpOAuthVerifier {
    pub client: reqwest::Client,
}

impl HttpOAuthVerifier {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .user_agent(concat!("painel-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build oauth http client")?;
        Ok(Self { client })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, access_token: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .context("call oauth provider")?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, url, "oauth provider rejected token");
            return Err(ApiError::InvalidOAuthToken);
        }
        response.json::<T>().await.map_err(|e| {
            tracing::warn!(error = %e, url, "unexpected oauth profile payload");
            ApiError::InvalidOAuthToken
        })
    }
}

impl OAuthVerifier for HttpOAuthVerifier {
    async fn verify(
        &self,
        provider: OAuthProvider,
        access_token: &str,
    ) -> Result<OAuthIdentity, ApiError> {
        if access_token.trim().is_empty() {
            return Err(ApiError::InvalidOAuthToken);
        }
        let identity = match provider {
            OAuthProvider::Google => self
                .fetch::<GoogleUser>(GOOGLE_USERINFO_URL, access_token)
                .await?
                .into(),
            OAuthProvider::Github => self
                .fetch::<GithubUser>(GITHUB_USER_URL, access_token)
                .await?
                .into(),
            OAuthProvider::Facebook => self
                .fetch::<FacebookUser>(FACEBOOK_ME_URL, access_token)
                .await?
                .into(),
        };
        Ok(identity)
    }
}
