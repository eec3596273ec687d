//! Loads the demo client list into an empty database.

use std::env;

use config::Config;
use dotenvy::dotenv;

use mecanica_crm::db::establish_connection_pool;
use mecanica_crm::domain::client::NewClient;
use mecanica_crm::domain::query::QueryDescriptor;
use mecanica_crm::domain::types::{ClientKind, ClientName, Document, PhoneNumber};
use mecanica_crm::models::config::ServerConfig;
use mecanica_crm::repository::errors::RepositoryResult;
use mecanica_crm::repository::{ClientReader, ClientWriter, DieselRepository};

const DEMO_CLIENTS: [(&str, &str, ClientKind, &str); 5] = [
    ("João Silva", "11999999999", ClientKind::PF, "52998224725"),
    ("Oficina do Tonhão", "1133334444", ClientKind::PJ, "11222333000181"),
    ("Maria Oliveira", "21988887777", ClientKind::PF, "39053344705"),
    ("Auto Peças Central", "1140040000", ClientKind::PJ, "11444777000161"),
    ("Carlos Ferreira", "31977776666", ClientKind::PF, "11144477735"),
];

fn demo_clients() -> RepositoryResult<Vec<NewClient>> {
    DEMO_CLIENTS
        .iter()
        .map(|(name, phone, kind, document)| -> RepositoryResult<NewClient> {
            Ok(NewClient::new(
                ClientName::new(*name)?,
                PhoneNumber::new(phone)?,
                Document::new(*kind, document)?,
            ))
        })
        .collect()
}

/// Inserts the demo clients unless the table already has rows.
fn seed<R>(repo: &R) -> RepositoryResult<usize>
where
    R: ClientReader + ClientWriter,
{
    if repo.list_clients(&QueryDescriptor::new())?.total > 0 {
        return Ok(0);
    }
    // Reverse so the first demo client ends up newest, on top of the list.
    let mut created = 0;
    for client in demo_clients()?.iter().rev() {
        repo.create_client(client)?;
        created += 1;
    }
    Ok(created)
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let server_config = match settings.and_then(|s| s.try_deserialize::<ServerConfig>()) {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match seed(&DieselRepository::new(pool)) {
        Ok(0) => log::info!("Database already has clients, nothing to seed"),
        Ok(count) => log::info!("Seeded {count} clients"),
        Err(e) => {
            log::error!("Failed to seed clients: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use mecanica_crm::repository::InMemoryRepository;

    use super::*;

    #[test]
    fn seeds_once_in_listed_order() {
        let repo = InMemoryRepository::new();
        assert_eq!(seed(&repo).unwrap(), 5);
        assert_eq!(seed(&repo).unwrap(), 0);

        let page = repo.list_clients(&QueryDescriptor::new()).unwrap();
        assert_eq!(page.data[0].name.as_str(), "João Silva");
        assert_eq!(page.data[4].name.as_str(), "Carlos Ferreira");
    }
}
