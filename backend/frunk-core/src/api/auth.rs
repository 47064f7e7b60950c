use super::ApiClient;
use crate::error::api::ApiError;

use common::{Credentials, Tool, User};

use log::{debug, info};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};

const AUTH_ME_ENDPOINT: &str = "auth/me";
const AUTH_REGISTER_ENDPOINT: &str = "auth/register";
const AUTH_LOGIN_ENDPOINT: &str = "auth/login";
const AUTH_LOGOUT_ENDPOINT: &str = "auth/logout";
const TOOLS_ENDPOINT: &str = "tools/";

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct ToolsEnvelope {
    #[serde(default)]
    tools: Vec<Tool>,
}

impl ApiClient {
    /// The user bound to the current session cookie.
    ///
    /// # Errors
    /// Any failure (including 401) means there is no usable session.
    pub async fn me(&self) -> Result<User, ApiError> {
        let url = self.endpoint(AUTH_ME_ENDPOINT)?;
        let envelope: UserEnvelope = self.get_json(url).await?;
        Ok(envelope.user)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let url = self.endpoint(AUTH_REGISTER_ENDPOINT)?;
        let _: Value = self.send_json(Method::POST, url, credentials).await?;
        info!("Registered account {}", credentials.email);
        Ok(())
    }

    /// Log in; the session cookie is kept in this client's jar.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let url = self.endpoint(AUTH_LOGIN_ENDPOINT)?;
        let envelope: UserEnvelope = self.send_json(Method::POST, url, credentials).await?;
        info!("Logged in as {}", envelope.user.email);
        Ok(envelope.user)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(AUTH_LOGOUT_ENDPOINT)?;
        let _: Value = self.send_json(Method::POST, url, &json!({})).await?;
        debug!("Logged out");
        Ok(())
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>, ApiError> {
        let url = self.endpoint(TOOLS_ENDPOINT)?;
        let envelope: ToolsEnvelope = self.get_json(url).await?;
        Ok(envelope.tools)
    }
}
