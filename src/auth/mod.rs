pub mod jwks;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;
use self::jwks::JwksClient;

/// Verified token payload handed to protected handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    /// Either a single audience or a list of them
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|perms| perms.iter().any(|p| p == permission))
    }
}

/// Reasons the permission gate rejects a request. Every variant maps to 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,

    #[error("Authorization header must be in the form 'Bearer <token>'.")]
    MalformedHeader,

    #[error("Token expired.")]
    Expired,

    #[error("Incorrect claims. Please check the audience and issuer.")]
    InvalidClaims,

    #[error("Token signature is invalid.")]
    InvalidSignature,

    #[error("Unable to parse authentication token.")]
    InvalidHeader,

    #[error("Unable to fetch signing keys.")]
    KeySourceUnavailable,

    #[error("Permissions not included in token.")]
    MissingPermissionsClaim,

    #[error("Permission '{0}' not granted.")]
    Forbidden(String),
}

impl AuthError {
    /// Stable identifier used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::Expired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidHeader => "invalid_header",
            AuthError::KeySourceUnavailable => "key_source_unavailable",
            AuthError::MissingPermissionsClaim => "missing_permissions_claim",
            AuthError::Forbidden(_) => "forbidden",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::InvalidHeader,
        }
    }
}

/// Errors building a verifier from configuration
#[derive(Debug, Error)]
pub enum AuthConfigError {
    #[error("AUTH0_DOMAIN must be set when JWT_SECRET is not")]
    MissingDomain,

    #[error("Invalid token issuer domain: {0}")]
    InvalidDomain(#[from] url::ParseError),
}

/// Where signing keys come from
pub enum KeySource {
    /// HS256 shared secret
    Secret(String),
    /// RS256 keys published as a JWKS document
    Jwks(JwksClient),
}

/// Verifies bearer tokens against a configured signing authority
pub struct TokenVerifier {
    issuer: String,
    audience: String,
    keys: KeySource,
}

impl TokenVerifier {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>, keys: KeySource) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            keys,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthConfigError> {
        let keys = match &config.jwt_secret {
            Some(secret) => KeySource::Secret(secret.clone()),
            None => {
                if config.domain.is_empty() {
                    return Err(AuthConfigError::MissingDomain);
                }
                KeySource::Jwks(JwksClient::new(config.jwks_url()?))
            }
        };

        Ok(Self::new(config.issuer(), config.audience.clone(), keys))
    }

    /// Run the full gate: bearer extraction, verification, permission check
    pub async fn authorize(&self, headers: &HeaderMap, permission: &str) -> Result<Claims, AuthError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.verify(token).await?;
        check_permission(permission, &claims)?;
        Ok(claims)
    }

    /// Decode and verify a token, returning its claims
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidHeader)?;

        let (key, algorithm) = match &self.keys {
            KeySource::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            KeySource::Jwks(client) => {
                let kid = header.kid.as_deref().ok_or(AuthError::InvalidHeader)?;
                (client.decoding_key(kid).await?, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &key, &validation)?;
        Ok(data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Require `permission` to be listed in the token's permissions claim
pub fn check_permission(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::MissingPermissionsClaim)?;

    if !permissions.iter().any(|p| p == permission) {
        return Err(AuthError::Forbidden(permission.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "https://coffee.test/";
    const AUDIENCE: &str = "drinks";

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(ISSUER, AUDIENCE, KeySource::Secret(SECRET.to_string()))
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims_with(permissions: serde_json::Value) -> serde_json::Value {
        json!({
            "sub": "auth0|barista",
            "iss": ISSUER,
            "aud": AUDIENCE,
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "iat": Utc::now().timestamp(),
            "permissions": permissions,
        })
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers("bearer abc")), Ok("abc"));
    }

    #[test]
    fn missing_and_malformed_headers_are_rejected() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), Err(AuthError::MissingHeader));
        assert_eq!(extract_bearer_token(&headers("Bearer")), Err(AuthError::MalformedHeader));
        assert_eq!(extract_bearer_token(&headers("Basic abc")), Err(AuthError::MalformedHeader));
        assert_eq!(extract_bearer_token(&headers("Bearer a b")), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn permission_check_distinguishes_missing_claim_from_forbidden() {
        let mut claims: Claims = serde_json::from_value(claims_with(json!(["get:drinks-detail"]))).unwrap();
        assert!(check_permission("get:drinks-detail", &claims).is_ok());
        assert_eq!(
            check_permission("post:drinks", &claims),
            Err(AuthError::Forbidden("post:drinks".to_string()))
        );

        claims.permissions = None;
        assert_eq!(
            check_permission("get:drinks-detail", &claims),
            Err(AuthError::MissingPermissionsClaim)
        );
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let token = sign(claims_with(json!(["post:drinks"])), SECRET);
        let claims = verifier().verify(&token).await.unwrap();
        assert_eq!(claims.sub.as_deref(), Some("auth0|barista"));
        assert!(claims.has_permission("post:drinks"));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let mut claims = claims_with(json!(["post:drinks"]));
        claims["exp"] = json!((Utc::now() - Duration::hours(2)).timestamp());
        let token = sign(claims, SECRET);
        assert_eq!(verifier().verify(&token).await.unwrap_err(), AuthError::Expired);
    }

    #[tokio::test]
    async fn wrong_audience_or_issuer_is_invalid_claims() {
        let mut claims = claims_with(json!([]));
        claims["aud"] = json!("someone-else");
        let token = sign(claims, SECRET);
        assert_eq!(verifier().verify(&token).await.unwrap_err(), AuthError::InvalidClaims);

        let mut claims = claims_with(json!([]));
        claims["iss"] = json!("https://evil.test/");
        let token = sign(claims, SECRET);
        assert_eq!(verifier().verify(&token).await.unwrap_err(), AuthError::InvalidClaims);
    }

    #[tokio::test]
    async fn foreign_signature_is_rejected() {
        let token = sign(claims_with(json!(["post:drinks"])), "another-secret");
        assert_eq!(verifier().verify(&token).await.unwrap_err(), AuthError::InvalidSignature);
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_header() {
        assert_eq!(verifier().verify("not-a-jwt").await.unwrap_err(), AuthError::InvalidHeader);
    }

    #[tokio::test]
    async fn authorize_runs_every_step() {
        let v = verifier();
        let token = sign(claims_with(json!(["delete:drinks"])), SECRET);

        let ok = v.authorize(&headers(&format!("Bearer {token}")), "delete:drinks").await;
        assert!(ok.is_ok());

        let forbidden = v.authorize(&headers(&format!("Bearer {token}")), "patch:drinks").await;
        assert_eq!(forbidden.unwrap_err(), AuthError::Forbidden("patch:drinks".to_string()));

        let no_perms = sign(
            json!({
                "iss": ISSUER,
                "aud": AUDIENCE,
                "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            }),
            SECRET,
        );
        let missing = v.authorize(&headers(&format!("Bearer {no_perms}")), "patch:drinks").await;
        assert_eq!(missing.unwrap_err(), AuthError::MissingPermissionsClaim);
    }

    #[test]
    fn verifier_requires_domain_without_secret() {
        let config = AuthConfig {
            domain: String::new(),
            audience: AUDIENCE.to_string(),
            issuer: None,
            jwt_secret: None,
        };
        assert!(matches!(
            TokenVerifier::from_config(&config),
            Err(AuthConfigError::MissingDomain)
        ));
    }
}
