use chrono::NaiveDateTime;

use crate::domain::types::{ClientId, ClientKind, ClientName, Document, PhoneNumber};

/// A registered client: an individual (CPF) or a business (CNPJ).
#[derive(Clone, Debug, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub phone: PhoneNumber,
    /// Tax identifier; its kind is the client kind.
    pub document: Document,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    #[must_use]
    pub fn new(
        id: ClientId,
        name: ClientName,
        phone: PhoneNumber,
        document: Document,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name,
            phone,
            document,
            created_at,
            updated_at: created_at,
        }
    }

    pub const fn kind(&self) -> ClientKind {
        self.document.kind()
    }
}

/// Validated payload for creating a client; the store assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub phone: PhoneNumber,
    pub document: Document,
}

impl NewClient {
    #[must_use]
    pub fn new(name: ClientName, phone: PhoneNumber, document: Document) -> Self {
        Self {
            name,
            phone,
            document,
        }
    }

    /// Materializes the stored record under a freshly assigned id.
    pub fn into_client(self, id: ClientId, now: NaiveDateTime) -> Client {
        Client::new(id, self.name, self.phone, self.document, now)
    }
}

/// Full replacement of a client's editable fields.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateClient {
    pub name: ClientName,
    pub phone: PhoneNumber,
    pub document: Document,
}

impl UpdateClient {
    #[must_use]
    pub fn new(name: ClientName, phone: PhoneNumber, document: Document) -> Self {
        Self {
            name,
            phone,
            document,
        }
    }

    /// Replaces every editable field of `client`, keeping its id and creation time.
    pub fn apply_to(&self, client: &mut Client, now: NaiveDateTime) {
        client.name = self.name.clone();
        client.phone = self.phone.clone();
        client.document = self.document.clone();
        client.updated_at = now;
    }
}

impl From<NewClient> for UpdateClient {
    fn from(value: NewClient) -> Self {
        Self::new(value.name, value.phone, value.document)
    }
}
