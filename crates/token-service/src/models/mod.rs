use serde::{Deserialize, Serialize};

/// Body of a token request.
///
/// Every field is optional at the wire level so that missing required fields
/// can be reported as such instead of as a generic parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequestBody {
    pub coze_app_id: Option<String>,
    pub key_id: Option<String>,
    pub audience: Option<String>,
    pub expires_in: Option<i64>,
}

/// Successful token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            message: "JWT generated successfully".to_string(),
            token,
        }
    }
}
