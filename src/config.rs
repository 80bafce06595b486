//! Compile-time configuration.
//!
//! A pure-wasm binary has no runtime environment, so every external endpoint
//! and credential is baked in at build time. Each constant can be overridden
//! with an environment variable when invoking the build.

/// Full URL of the hosted table holding the records,
/// e.g. `https://api.airtable.com/v0/<base>/<table>`.
pub const TABLE_ENDPOINT: &str = match option_env!("TALLY_TABLE_ENDPOINT") {
    Some(url) => url,
    None => "https://api.airtable.com/v0/appTallyDev/Records",
};

/// Bearer token for the tabular-data API.
pub const TABLE_TOKEN: &str = match option_env!("TALLY_TABLE_TOKEN") {
    Some(token) => token,
    None => "dev-table-token",
};

/// Identity provider account endpoints (sign-in / sign-up).
pub const IDENTITY_ENDPOINT: &str = match option_env!("TALLY_IDENTITY_ENDPOINT") {
    Some(url) => url,
    None => "https://identitytoolkit.googleapis.com/v1",
};

/// Identity provider token-refresh endpoint.
pub const TOKEN_ENDPOINT: &str = match option_env!("TALLY_TOKEN_ENDPOINT") {
    Some(url) => url,
    None => "https://securetoken.googleapis.com/v1/token",
};

/// Web API key identifying the identity provider project.
pub const IDENTITY_API_KEY: &str = match option_env!("TALLY_IDENTITY_API_KEY") {
    Some(key) => key,
    None => "dev-identity-key",
};

/// Comma-separated list of email addresses permitted to use the app.
/// Unset means every authenticated account is accepted.
pub const ALLOWED_EMAILS: Option<&str> = option_env!("TALLY_ALLOWED_EMAILS");
