use crate::{
    db::DbPool,
    domain::{
        client::{Client, NewClient, UpdateClient},
        query::QueryDescriptor,
        types::ClientId,
    },
    pagination::Paginated,
    repository::errors::RepositoryResult,
};

pub mod client;
pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use memory::InMemoryRepository;

/// Diesel-backed repository over the SQLite connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>>;
    /// Answers a list query with the semantics of [`crate::query::execute`].
    fn list_clients(&self, query: &QueryDescriptor) -> RepositoryResult<Paginated<Client>>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, id: &ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
    fn delete_client(&self, id: &ClientId) -> RepositoryResult<()>;
}
