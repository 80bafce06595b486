//! Identity provider client and session handling.
//!
//! Sign-in, sign-up and token refresh go to the provider's REST endpoints;
//! the resulting session lives in localStorage. Access is further limited to
//! an allow-list of email addresses checked on the client.

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

const SESSION_KEY: &str = "session";

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("network error: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("{0}")]
    Provider(String),
}

#[derive(Deserialize)]
struct CredentialResponse {
    email: String,
    #[serde(rename = "idToken")]
    id_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: String,
}

pub async fn sign_in(email: &str, password: &str) -> Result<Session, AuthError> {
    credential_request("signInWithPassword", email, password).await
}

pub async fn sign_up(email: &str, password: &str) -> Result<Session, AuthError> {
    credential_request("signUp", email, password).await
}

async fn credential_request(
    action: &str,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let url = format!(
        "{}/accounts:{}?key={}",
        config::IDENTITY_ENDPOINT,
        action,
        config::IDENTITY_API_KEY
    );
    let body = serde_json::json!({
        "email": email,
        "password": password,
        "returnSecureToken": true,
    });
    let resp = Request::post(&url).json(&body)?.send().await?;
    if !resp.ok() {
        let raw = resp.text().await.unwrap_or_default();
        return Err(AuthError::Provider(provider_message(&raw)));
    }
    let parsed: CredentialResponse = resp.json().await?;
    log::info!("signed in as {}", parsed.email);
    Ok(Session {
        email: parsed.email,
        id_token: parsed.id_token,
        refresh_token: parsed.refresh_token,
    })
}

/// Exchange the refresh token for a new id token, keeping the session alive
/// across page loads.
pub async fn refresh(session: &Session) -> Result<Session, AuthError> {
    let url = format!(
        "{}?key={}",
        config::TOKEN_ENDPOINT,
        config::IDENTITY_API_KEY
    );
    let body = format!(
        "grant_type=refresh_token&refresh_token={}",
        session.refresh_token
    );
    let resp = Request::post(&url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)?
        .send()
        .await?;
    if !resp.ok() {
        let raw = resp.text().await.unwrap_or_default();
        return Err(AuthError::Provider(provider_message(&raw)));
    }
    let parsed: RefreshResponse = resp.json().await?;
    Ok(Session {
        email: session.email.clone(),
        id_token: parsed.id_token,
        refresh_token: parsed.refresh_token,
    })
}

fn provider_message(raw: &str) -> String {
    let code = serde_json::from_str::<ProviderError>(raw)
        .map(|parsed| parsed.error.message)
        .unwrap_or_default();
    readable_provider_error(&code)
}

/// Provider error codes arrive as `SOME_CODE` or `SOME_CODE : detail`.
fn readable_provider_error(code: &str) -> String {
    match code.split(':').next().unwrap_or("").trim() {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password.".to_string()
        }
        "EMAIL_EXISTS" => "An account with this email already exists.".to_string(),
        "WEAK_PASSWORD" => "Password is too weak.".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            "Too many attempts. Try again later.".to_string()
        }
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" | "USER_DISABLED" => {
            "Session expired. Sign in again.".to_string()
        }
        "" => "Sign-in failed.".to_string(),
        other => other.replace('_', " ").to_lowercase(),
    }
}

pub fn load_session() -> Option<Session> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let raw = storage.get_item(SESSION_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

pub fn save_session(session: &Session) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(raw) = serde_json::to_string(session) {
                let _ = storage.set_item(SESSION_KEY, &raw);
            }
        }
    }
}

pub fn clear_session() {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}

/// True when `email` may use the app. An empty allow-list admits everyone.
pub fn is_allowed(email: &str) -> bool {
    is_listed(
        &parse_allow_list(config::ALLOWED_EMAILS.unwrap_or("")),
        email,
    )
}

fn parse_allow_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn is_listed(list: &[&str], email: &str) -> bool {
    list.is_empty() || list.iter().any(|allowed| allowed.eq_ignore_ascii_case(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_splits_and_trims() {
        assert_eq!(
            parse_allow_list("a@x.com, b@y.com ,,c@z.com"),
            vec!["a@x.com", "b@y.com", "c@z.com"]
        );
        assert!(parse_allow_list("").is_empty());
        assert!(parse_allow_list(" , ").is_empty());
    }

    #[test]
    fn empty_allow_list_admits_everyone() {
        assert!(is_listed(&[], "anyone@example.com"));
    }

    #[test]
    fn listing_is_case_insensitive() {
        let list = vec!["Owner@Example.com"];
        assert!(is_listed(&list, "owner@example.com"));
        assert!(!is_listed(&list, "other@example.com"));
    }

    #[test]
    fn known_provider_codes_map_to_readable_messages() {
        assert_eq!(
            readable_provider_error("EMAIL_NOT_FOUND"),
            "Invalid email or password."
        );
        assert_eq!(
            readable_provider_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password is too weak."
        );
        assert_eq!(readable_provider_error(""), "Sign-in failed.");
        assert_eq!(
            readable_provider_error("OPERATION_NOT_ALLOWED"),
            "operation not allowed"
        );
    }

    #[test]
    fn provider_payloads_parse_down_to_the_code() {
        let raw = r#"{"error": {"code": 400, "message": "EMAIL_EXISTS"}}"#;
        assert_eq!(
            provider_message(raw),
            "An account with this email already exists."
        );
        assert_eq!(provider_message("not json"), "Sign-in failed.");
    }
}
