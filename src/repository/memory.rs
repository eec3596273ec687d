//! In-process reference store.
//!
//! A cloneable handle over a shared vector of clients. Each handle is passed
//! explicitly to whoever runs queries, so tests get isolated stores instead of
//! sharing one global list.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::query::QueryDescriptor;
use crate::domain::types::ClientId;
use crate::pagination::Paginated;
use crate::query;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientReader, ClientWriter};

#[derive(Clone, Default)]
pub struct InMemoryRepository {
    clients: Arc<RwLock<Vec<Client>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `clients`, listed in the given order.
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: Arc::new(RwLock::new(clients)),
        }
    }

    /// Owned copy of the current contents.
    pub fn snapshot(&self) -> RepositoryResult<Vec<Client>> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Vec<Client>>> {
        self.clients
            .read()
            .map_err(|e| RepositoryError::Unexpected(format!("client store poisoned: {e}")))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Vec<Client>>> {
        self.clients
            .write()
            .map_err(|e| RepositoryError::Unexpected(format!("client store poisoned: {e}")))
    }
}

impl ClientReader for InMemoryRepository {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>> {
        Ok(self.read()?.iter().find(|c| &c.id == id).cloned())
    }

    fn list_clients(&self, query: &QueryDescriptor) -> RepositoryResult<Paginated<Client>> {
        let clients = self.read()?;
        Ok(query::execute(&clients, query))
    }
}

impl ClientWriter for InMemoryRepository {
    /// New clients are listed first.
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let client = new_client
            .clone()
            .into_client(ClientId::generate(), Utc::now().naive_utc());
        self.write()?.insert(0, client.clone());
        Ok(client)
    }

    fn update_client(&self, id: &ClientId, updates: &UpdateClient) -> RepositoryResult<Client> {
        let mut clients = self.write()?;
        let client = clients
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        updates.apply_to(client, Utc::now().naive_utc());
        Ok(client.clone())
    }

    fn delete_client(&self, id: &ClientId) -> RepositoryResult<()> {
        let mut clients = self.write()?;
        let before = clients.len();
        clients.retain(|c| &c.id != id);
        if clients.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::KindFilter;
    use crate::domain::types::{ClientKind, ClientName, Document, PhoneNumber};

    fn new_client(name: &str, kind: ClientKind, doc: &str) -> NewClient {
        NewClient::new(
            ClientName::new(name).unwrap(),
            PhoneNumber::new("11999999999").unwrap(),
            Document::new(kind, doc).unwrap(),
        )
    }

    #[test]
    fn crud_round_trip() {
        let repo = InMemoryRepository::new();
        let ana = repo
            .create_client(&new_client("Ana Souza", ClientKind::PF, "11144477735"))
            .unwrap();
        let shop = repo
            .create_client(&new_client("Oficina Central", ClientKind::PJ, "11222333000181"))
            .unwrap();

        let page = repo.list_clients(&QueryDescriptor::new()).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].id, shop.id, "newest client is listed first");

        let updated = repo
            .update_client(
                &ana.id,
                &new_client("Ana Souza Lima", ClientKind::PF, "52998224725").into(),
            )
            .unwrap();
        assert_eq!(updated.id, ana.id);
        assert_eq!(updated.name.as_str(), "Ana Souza Lima");
        assert_eq!(updated.document.as_str(), "52998224725");

        repo.delete_client(&shop.id).unwrap();
        assert!(repo.get_client_by_id(&shop.id).unwrap().is_none());

        let pj = repo
            .list_clients(&QueryDescriptor::new().kind(KindFilter::Only(ClientKind::PJ)))
            .unwrap();
        assert_eq!(pj.total, 0);
        assert_eq!(pj.last_page, 1);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let repo = InMemoryRepository::new();
        let id = ClientId::new("missing").unwrap();
        assert!(matches!(
            repo.delete_client(&id),
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.update_client(
                &id,
                &new_client("Ana Souza", ClientKind::PF, "11144477735").into()
            ),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn handles_share_state_but_stores_are_isolated() {
        let repo = InMemoryRepository::new();
        let handle = repo.clone();
        handle
            .create_client(&new_client("Ana Souza", ClientKind::PF, "11144477735"))
            .unwrap();
        assert_eq!(repo.snapshot().unwrap().len(), 1);
        assert!(InMemoryRepository::new().snapshot().unwrap().is_empty());
    }
}
