use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::query::QueryDescriptor;
use crate::dto::api::{ClientDto, ClientsQuery, LoginRequest};
use crate::forms::client::ClientForm;
use crate::repository::DieselRepository;
use crate::routes::AuthenticatedUser;
use crate::services::ServiceError;
use crate::services::auth::{AdminAccount, TokenSettings};
use crate::services::{auth, client as client_service};

#[post("/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
    account: web::Data<AdminAccount>,
    settings: web::Data<TokenSettings>,
) -> Result<HttpResponse, ServiceError> {
    let session = auth::login(&payload.email, &payload.password, &account, &settings)?;
    log::info!("User {} signed in", session.user.email);
    Ok(HttpResponse::Ok().json(session))
}

#[get("/clients")]
pub async fn list_clients(
    _user: AuthenticatedUser,
    params: web::Query<ClientsQuery>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let query = QueryDescriptor::try_from(params.into_inner())?;
    let page = client_service::list_clients(&query, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(page.map(ClientDto::from)))
}

#[get("/clients/{id}")]
pub async fn show_client(
    _user: AuthenticatedUser,
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::get_client(&id, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(ClientDto::from(client)))
}

#[post("/clients")]
pub async fn create_client(
    _user: AuthenticatedUser,
    form: web::Json<ClientForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::create_client(&form, repo.get_ref())?;
    Ok(HttpResponse::Created().json(ClientDto::from(client)))
}

#[put("/clients/{id}")]
pub async fn update_client(
    _user: AuthenticatedUser,
    id: web::Path<String>,
    form: web::Json<ClientForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::update_client(&id, &form, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(ClientDto::from(client)))
}

#[delete("/clients/{id}")]
pub async fn delete_client(
    _user: AuthenticatedUser,
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    client_service::delete_client(&id, repo.get_ref())?;
    Ok(HttpResponse::NoContent().finish())
}
