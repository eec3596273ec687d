//! HTTP handlers and the glue between them and the services.

use std::future::{Ready, ready};

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};

use crate::dto::api::{ErrorPayload, User};
use crate::services::ServiceError;
use crate::services::auth::{TokenSettings, decode_token};

pub mod api;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized | ServiceError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ServiceError::Internal(reason) = self {
            log::error!("Request failed: {reason}");
        }
        let payload = match self {
            ServiceError::Form(errors) => {
                ErrorPayload::with_errors(self.user_message(), errors.clone())
            }
            _ => ErrorPayload::new(self.user_message()),
        };
        HttpResponse::build(self.status_code()).json(payload)
    }
}

/// User resolved from the `Authorization: Bearer` header.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    fn from_request_parts(req: &HttpRequest) -> Result<Self, ServiceError> {
        let settings = req
            .app_data::<web::Data<TokenSettings>>()
            .ok_or_else(|| ServiceError::Internal("token settings are not configured".into()))?;
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ServiceError::Unauthorized)?;
        let claims = decode_token(token, settings)?;
        Ok(Self(claims.into()))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_parts(req).map_err(Into::into))
    }
}

/// Turns malformed JSON bodies and query strings into the same error payload
/// as every other failure.
pub fn bad_request(message: impl std::fmt::Display) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorPayload::new(message.to_string()));
    actix_web::error::InternalError::from_response(message.to_string(), response).into()
}

/// Registers the JSON API under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err)))
        .app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
        .service(
            web::scope("/api")
                .service(api::login)
                .service(api::list_clients)
                .service(api::show_client)
                .service(api::create_client)
                .service(api::update_client)
                .service(api::delete_client),
        );
}
