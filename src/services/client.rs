//! Client registry workflows.

use crate::domain::client::Client;
use crate::domain::query::QueryDescriptor;
use crate::domain::types::ClientId;
use crate::forms::client::ClientForm;
use crate::pagination::Paginated;
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Answers a list query.
pub fn list_clients<R>(query: &QueryDescriptor, repo: &R) -> ServiceResult<Paginated<Client>>
where
    R: ClientReader + ?Sized,
{
    let page = repo.list_clients(query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        err
    })?;
    Ok(page)
}

pub fn get_client<R>(id: &str, repo: &R) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    let id = ClientId::new(id)?;
    repo.get_client_by_id(&id)
        .map_err(|err| {
            log::error!("Failed to load client {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

/// Validates the form and stores a new client.
pub fn create_client<R>(form: &ClientForm, repo: &R) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let valid = form.check()?;
    let client = repo.create_client(&valid.into()).map_err(|err| {
        log::error!("Failed to create client: {err}");
        err
    })?;
    log::info!("Created client {}", client.id);
    Ok(client)
}

/// Replaces the editable fields of an existing client.
pub fn update_client<R>(id: &str, form: &ClientForm, repo: &R) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let id = ClientId::new(id)?;
    let valid = form.check()?;
    let client = repo.update_client(&id, &valid.into()).map_err(|err| {
        log::error!("Failed to update client {id}: {err}");
        err
    })?;
    Ok(client)
}

pub fn delete_client<R>(id: &str, repo: &R) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    let id = ClientId::new(id)?;
    repo.delete_client(&id).map_err(|err| {
        log::error!("Failed to delete client {id}: {err}");
        err
    })?;
    log::info!("Deleted client {id}");
    Ok(())
}
