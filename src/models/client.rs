use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    ClientId, ClientKind, ClientName, Document, PhoneNumber, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub kind: String,
    pub document: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`]; the id is assigned by the repository.
pub struct NewClient<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
    pub kind: &'a str,
    pub document: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub kind: &'a str,
    pub document: &'a str,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewClient<'a> {
    pub fn from_domain(id: &'a ClientId, client: &'a DomainNewClient, now: NaiveDateTime) -> Self {
        Self {
            id: id.as_str(),
            name: client.name.as_str(),
            phone: client.phone.as_str(),
            kind: client.document.kind().as_str(),
            document: client.document.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateClient<'a> {
    pub fn from_domain(client: &'a DomainUpdateClient, now: NaiveDateTime) -> Self {
        Self {
            name: client.name.as_str(),
            phone: client.phone.as_str(),
            kind: client.document.kind().as_str(),
            document: client.document.as_str(),
            updated_at: now,
        }
    }
}

/// Rows are re-validated on the way out so a hand-edited database cannot
/// smuggle an invalid document into the domain.
impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(row: Client) -> Result<Self, Self::Error> {
        let kind: ClientKind = row.kind.parse()?;
        let mut client = DomainClient::new(
            ClientId::new(row.id)?,
            ClientName::new(row.name)?,
            PhoneNumber::new(row.phone)?,
            Document::new(kind, row.document)?,
            row.created_at,
        );
        client.updated_at = row.updated_at;
        Ok(client)
    }
}
