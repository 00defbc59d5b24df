use jsonwebtoken::{jwk::JwkSet, DecodingKey};
use url::Url;

use super::AuthError;

/// Fetches the issuer's published signing keys
pub struct JwksClient {
    url: Url,
    http: reqwest::Client,
}

impl JwksClient {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::error!("Failed to fetch JWKS from {}: {}", self.url, e);
                AuthError::KeySourceUnavailable
            })?;

        response.json::<JwkSet>().await.map_err(|e| {
            tracing::error!("Invalid JWKS document at {}: {}", self.url, e);
            AuthError::KeySourceUnavailable
        })
    }

    /// Key matching the token's `kid`, fetched fresh for each verification
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let keys = self.fetch().await?;
        select_key(&keys, kid)
    }
}

pub(crate) fn select_key(keys: &JwkSet, kid: &str) -> Result<DecodingKey, AuthError> {
    let jwk = keys.find(kid).ok_or_else(|| {
        tracing::warn!("No signing key published for kid '{}'", kid);
        AuthError::InvalidHeader
    })?;

    DecodingKey::from_jwk(jwk).map_err(|_| AuthError::InvalidHeader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key_set() -> JwkSet {
        serde_json::from_value(json!({
            "keys": [{
                "kty": "RSA",
                "kid": "signing-key-1",
                "use": "sig",
                "alg": "RS256",
                "n": "ofgWCuLjybRlzo0tZWJjNiuSfb4p4fAkd_wWJcyQoTbji9k0l8W26mPddxHmfHQp-Vaw-4qPCJrcS2mJPMEzP1Pt0Bm4d4QlL-yRT-SFd2lZS-pCgNMsD1W_YpRPEwOWvG6b32690r2jZ47soMZo9wGzjb_7OMg0LOL-bSf63kpaSHSXndS5z5rexMdbBYUsLA9e-KXBdQOS-UTo7WTBEMa2R2CapHg665xsmtdVMTBQY4uDZlxvb3qCo5ZwKh9kG4LT6_I5IhlJH7aGhyxXFvUK-DWNmoudF8NAco9_h9iaGNj8q2ethFkMLs91kzk2PAcDTW9gb54h4FRWyuXpoQ",
                "e": "AQAB"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn selects_key_by_kid() {
        assert!(select_key(&key_set(), "signing-key-1").is_ok());
    }

    #[test]
    fn unknown_kid_is_invalid_header() {
        assert_eq!(
            select_key(&key_set(), "rotated-away").err(),
            Some(AuthError::InvalidHeader)
        );
    }

    #[test]
    fn keeps_configured_url() {
        let url = Url::parse("https://coffee.us.auth0.com/.well-known/jwks.json").unwrap();
        let client = JwksClient::new(url.clone());
        assert_eq!(client.url(), &url);
    }
}
