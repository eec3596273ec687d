//! Administrator login and bearer token handling.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::dto::api::{LoginResponse, User};
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

/// JWT payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub exp: usize,
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// The single account allowed to sign in.
#[derive(Clone, Debug)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl From<&ServerConfig> for AdminAccount {
    fn from(config: &ServerConfig) -> Self {
        Self {
            email: config.admin_email.clone(),
            password: config.admin_password.clone(),
            name: config.admin_name.clone(),
        }
    }
}

/// Signing material and token lifetime.
#[derive(Clone)]
pub struct TokenSettings {
    secret: String,
    ttl_secs: u64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }
}

impl From<&ServerConfig> for TokenSettings {
    fn from(config: &ServerConfig) -> Self {
        Self::new(config.secret.clone(), config.token_ttl_secs)
    }
}

/// Checks the credentials and issues a signed token for the account.
pub fn login(
    email: &str,
    password: &str,
    account: &AdminAccount,
    settings: &TokenSettings,
) -> ServiceResult<LoginResponse> {
    if !email.trim().eq_ignore_ascii_case(&account.email) || password != account.password {
        log::warn!("Rejected login for {email}");
        return Err(ServiceError::InvalidCredentials);
    }

    let user = User {
        id: "1".to_string(),
        name: account.name.clone(),
        email: account.email.clone(),
    };
    let exp = Utc::now().timestamp().max(0) as u64 + settings.ttl_secs;
    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        exp: exp as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|err| {
        log::error!("Failed to sign token: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    Ok(LoginResponse { user, token })
}

/// Verifies signature and expiry; any failure is `Unauthorized`.
pub fn decode_token(token: &str, settings: &TokenSettings) -> ServiceResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        log::debug!("Rejected token: {err}");
        ServiceError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> AdminAccount {
        AdminAccount {
            email: "admin@mecanica.com".to_string(),
            password: "123456".to_string(),
            name: "Mecânico Chefe".to_string(),
        }
    }

    #[test]
    fn login_issues_decodable_token() {
        let settings = TokenSettings::new("secret", 3600);
        let session = login("Admin@Mecanica.com", "123456", &account(), &settings).unwrap();
        assert_eq!(session.user.name, "Mecânico Chefe");

        let claims = decode_token(&session.token, &settings).unwrap();
        assert_eq!(User::from(claims), session.user);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let settings = TokenSettings::new("secret", 3600);
        let err = login("admin@mecanica.com", "nope", &account(), &settings).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
    }

    #[test]
    fn token_signed_with_other_secret_is_unauthorized() {
        let session = login(
            "admin@mecanica.com",
            "123456",
            &account(),
            &TokenSettings::new("secret", 3600),
        )
        .unwrap();
        let other = TokenSettings::new("other", 3600);
        assert!(matches!(
            decode_token(&session.token, &other),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            decode_token("garbage", &other),
            Err(ServiceError::Unauthorized)
        ));
    }
}
