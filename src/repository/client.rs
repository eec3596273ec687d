use chrono::Utc;
use diesel::prelude::*;

use crate::{
    db::get_connection,
    domain::{
        client::{Client, NewClient, UpdateClient},
        query::{KindFilter, QueryDescriptor},
        types::ClientId,
    },
    pagination::Paginated,
    query,
    repository::{
        ClientReader, ClientWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>> {
        use crate::models::client::Client as DbClient;
        use crate::schema::clients;

        let mut conn = get_connection(&self.pool)?;
        let client = clients::table
            .find(id.as_str())
            .select(DbClient::as_select())
            .first::<DbClient>(&mut conn)
            .optional()?;

        Ok(client.map(Client::try_from).transpose()?)
    }

    /// The kind filter runs in SQL; search, collation sort and paging reuse
    /// [`query::execute`] over the remaining rows, newest first.
    fn list_clients(&self, query: &QueryDescriptor) -> RepositoryResult<Paginated<Client>> {
        use crate::models::client::Client as DbClient;
        use crate::schema::clients;

        let mut conn = get_connection(&self.pool)?;

        let mut rows = clients::table
            .select(DbClient::as_select())
            .order((clients::created_at.desc(), clients::id.desc()))
            .into_boxed();
        if let KindFilter::Only(kind) = query.kind {
            rows = rows.filter(clients::kind.eq(kind.as_str()));
        }

        let snapshot = rows
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<Client>, _>>()?;

        let remaining = query.clone().kind(KindFilter::All);
        Ok(query::execute(&snapshot, &remaining))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, NewClient as DbNewClient};
        use crate::schema::clients;

        let mut conn = get_connection(&self.pool)?;
        let id = ClientId::generate();
        let insertable = DbNewClient::from_domain(&id, new_client, Utc::now().naive_utc());

        let created = diesel::insert_into(clients::table)
            .values(&insertable)
            .returning(DbClient::as_returning())
            .get_result::<DbClient>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_client(&self, id: &ClientId, updates: &UpdateClient) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, UpdateClient as DbUpdateClient};
        use crate::schema::clients;

        let mut conn = get_connection(&self.pool)?;
        let changes = DbUpdateClient::from_domain(updates, Utc::now().naive_utc());

        let updated = diesel::update(clients::table.find(id.as_str()))
            .set(&changes)
            .returning(DbClient::as_returning())
            .get_result::<DbClient>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_client(&self, id: &ClientId) -> RepositoryResult<()> {
        use crate::schema::clients;

        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(clients::table.find(id.as_str())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
