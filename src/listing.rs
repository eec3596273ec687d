//! Controller behind the client list screen.
//!
//! [`ClientList`] owns the current [`QueryDescriptor`], issues list requests
//! through a [`ClientGateway`] and keeps only the newest response. Search
//! input is debounced; every other change refreshes immediately.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::debounce::{DEFAULT_DEBOUNCE, Debouncer, LatestSlot};
use crate::domain::client::Client;
use crate::domain::query::{KindFilter, PageSize, QueryDescriptor, SortDescriptor};
use crate::domain::types::ClientId;
use crate::forms::client::ClientForm;
use crate::gateway::{ClientGateway, GatewayError, GatewayResult};
use crate::pagination::Paginated;

#[derive(Debug, Default)]
struct ListState {
    query: QueryDescriptor,
    error: Option<String>,
    loading: bool,
}

pub struct ClientList<G> {
    gateway: Arc<G>,
    state: Arc<Mutex<ListState>>,
    latest: Arc<LatestSlot<Paginated<Client>>>,
    debouncer: Mutex<Debouncer>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sends the current query and records the outcome unless a newer request
/// has already been answered.
async fn fetch<G: ClientGateway>(
    gateway: &G,
    state: &Mutex<ListState>,
    latest: &LatestSlot<Paginated<Client>>,
) -> GatewayResult<()> {
    let (ticket, query) = {
        let mut state = lock(state);
        state.loading = true;
        (latest.issue(), state.query.clone())
    };

    let result = gateway.list(&query).await;

    let mut state = lock(state);
    if latest.is_latest(ticket) {
        state.loading = false;
    }
    match result {
        Ok(page) => {
            if latest.offer(ticket, page) {
                state.error = None;
            }
            Ok(())
        }
        Err(err) => {
            if latest.is_fresh(ticket) {
                state.error = Some(err.message().to_string());
            }
            Err(err)
        }
    }
}

impl<G> ClientList<G>
where
    G: ClientGateway + 'static,
{
    pub fn new(gateway: G) -> Self {
        Self::with_debounce(gateway, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(gateway: G, delay: Duration) -> Self {
        Self {
            gateway: Arc::new(gateway),
            state: Arc::new(Mutex::new(ListState::default())),
            latest: Arc::new(LatestSlot::new()),
            debouncer: Mutex::new(Debouncer::new(delay)),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn query(&self) -> QueryDescriptor {
        lock(&self.state).query.clone()
    }

    /// Newest page received, if any.
    pub fn result(&self) -> Option<Paginated<Client>> {
        self.latest.get()
    }

    /// Message of the last failed request, cleared by the next success.
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    fn update_query(&self, change: impl FnOnce(QueryDescriptor) -> QueryDescriptor) {
        let mut state = lock(&self.state);
        let query = std::mem::take(&mut state.query);
        state.query = change(query);
    }

    pub async fn refresh(&self) -> GatewayResult<()> {
        fetch(self.gateway.as_ref(), &self.state, &self.latest).await
    }

    pub async fn go_to_page(&self, page: usize) -> GatewayResult<()> {
        self.update_query(|q| q.page(page));
        self.refresh().await
    }

    /// Changes the page size and returns to the first page.
    pub async fn set_limit(&self, limit: PageSize) -> GatewayResult<()> {
        self.update_query(|q| q.limit(limit).page(1));
        self.refresh().await
    }

    pub async fn set_kind(&self, kind: KindFilter) -> GatewayResult<()> {
        self.update_query(|q| q.kind(kind).page(1));
        self.refresh().await
    }

    /// Cycles the sort on `field`: ascending, descending, unsorted.
    pub async fn toggle_sort(&self, field: &str) -> GatewayResult<()> {
        self.update_query(|q| {
            let sort = SortDescriptor::toggle(q.sort.as_ref(), field);
            q.sort(sort)
        });
        self.refresh().await
    }

    /// Updates the search term now and sends the query once typing pauses.
    pub fn set_search(&self, term: &str) {
        self.update_query(|q| q.search(term).page(1));

        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.latest);
        lock(&self.debouncer).schedule(async move {
            if let Err(err) = fetch(gateway.as_ref(), &state, &latest).await {
                log::warn!("Search failed: {err}");
            }
        });
    }

    /// Whether a debounced search has not completed yet.
    pub fn search_pending(&self) -> bool {
        lock(&self.debouncer).is_pending()
    }

    fn record_error(&self, err: &GatewayError) {
        lock(&self.state).error = Some(err.message().to_string());
    }

    /// Creates a client and reloads the first page, where it is listed.
    pub async fn create(&self, form: &ClientForm) -> GatewayResult<Client> {
        let client = self.gateway.create(form).await.inspect_err(|err| {
            self.record_error(err);
        })?;
        self.go_to_page(1).await?;
        Ok(client)
    }

    pub async fn update(&self, id: &ClientId, form: &ClientForm) -> GatewayResult<Client> {
        let client = self.gateway.update(id, form).await.inspect_err(|err| {
            self.record_error(err);
        })?;
        self.refresh().await?;
        Ok(client)
    }

    /// Deletes a client and reloads, stepping back a page when the current
    /// one is left empty.
    pub async fn delete(&self, id: &ClientId) -> GatewayResult<()> {
        self.gateway.delete(id).await.inspect_err(|err| {
            self.record_error(err);
        })?;
        self.refresh().await?;

        if let Some(page) = self.result()
            && page.data.is_empty()
            && page.page > 1
        {
            let target = (page.page - 1).min(page.last_page);
            self.go_to_page(target).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};

    use super::*;
    use crate::domain::types::{ClientKind, ClientName, Document, PhoneNumber};
    use crate::gateway::StoreGateway;
    use crate::repository::InMemoryRepository;

    const CPFS: [&str; 4] = ["11144477735", "52998224725", "39053344705", "12345678909"];

    fn seeded(count: usize) -> InMemoryRepository {
        let start = Utc::now().naive_utc();
        let clients = (0..count)
            .map(|i| {
                Client::new(
                    ClientId::new(format!("c-{i}")).unwrap(),
                    ClientName::new(format!("Cliente {i:02}")).unwrap(),
                    PhoneNumber::new(format!("1199999{i:04}")).unwrap(),
                    Document::new(ClientKind::PF, CPFS[i % CPFS.len()]).unwrap(),
                    start - ChronoDuration::seconds(i as i64),
                )
            })
            .collect();
        InMemoryRepository::with_clients(clients)
    }

    fn form(name: &str) -> ClientForm {
        ClientForm {
            name: name.to_string(),
            phone: "(11) 3333-4444".to_string(),
            kind: ClientKind::PJ,
            document: "11.222.333/0001-81".to_string(),
        }
    }

    /// Answers page 1 quickly and every other page slowly.
    struct SlowPages(StoreGateway<InMemoryRepository>);

    impl ClientGateway for SlowPages {
        async fn list(&self, query: &QueryDescriptor) -> GatewayResult<Paginated<Client>> {
            let delay = if query.page == 1 { 10 } else { 300 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.0.list(query).await
        }

        async fn create(&self, form: &ClientForm) -> GatewayResult<Client> {
            self.0.create(form).await
        }

        async fn update(&self, id: &ClientId, form: &ClientForm) -> GatewayResult<Client> {
            self.0.update(id, form).await
        }

        async fn delete(&self, id: &ClientId) -> GatewayResult<()> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn filters_reset_to_first_page() {
        let list = ClientList::new(StoreGateway::new(seeded(25)));
        list.go_to_page(3).await.unwrap();
        assert_eq!(list.result().unwrap().data.len(), 5);

        list.set_limit(PageSize::new(20).unwrap()).await.unwrap();
        let page = list.result().unwrap();
        assert_eq!((page.page, page.last_page, page.data.len()), (1, 2, 20));

        list.go_to_page(2).await.unwrap();
        list.set_kind(KindFilter::Only(ClientKind::PJ)).await.unwrap();
        let page = list.result().unwrap();
        assert_eq!((page.page, page.total, page.last_page), (1, 0, 1));
    }

    #[tokio::test]
    async fn toggle_sort_cycles() {
        let list = ClientList::new(StoreGateway::new(seeded(3)));
        list.toggle_sort("name").await.unwrap();
        assert_eq!(list.result().unwrap().data[0].name.as_str(), "Cliente 00");
        list.toggle_sort("name").await.unwrap();
        assert_eq!(list.result().unwrap().data[0].name.as_str(), "Cliente 02");
        list.toggle_sort("name").await.unwrap();
        assert!(list.query().sort.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_does_not_overwrite_newer_one() {
        let list = ClientList::new(SlowPages(StoreGateway::new(seeded(15))));

        let (slow, fast) = tokio::join!(list.go_to_page(2), list.go_to_page(1));
        slow.unwrap();
        fast.unwrap();

        let page = list.result().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.data.len(), 10);
        assert!(!list.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn search_is_debounced() {
        let list = ClientList::with_debounce(
            StoreGateway::new(seeded(12)),
            Duration::from_millis(200),
        );
        list.go_to_page(2).await.unwrap();

        for term in ["X", "Xy", "CLIENTE"] {
            list.set_search(term);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(list.query().page, 1);
        assert!(list.search_pending());
        assert_eq!(list.result().unwrap().page, 2);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!list.search_pending());
        let page = list.result().unwrap();
        assert_eq!(list.query().search.as_deref(), Some("CLIENTE"));
        assert_eq!((page.page, page.total, page.data.len()), (1, 12, 10));
    }

    #[tokio::test]
    async fn create_reloads_first_page() {
        let list = ClientList::new(StoreGateway::new(seeded(12)));
        list.go_to_page(2).await.unwrap();

        let created = list.create(&form("Oficina Nova")).await.unwrap();
        let page = list.result().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 13);
        assert_eq!(page.data[0].id, created.id);
    }

    #[tokio::test]
    async fn failed_create_records_error() {
        let list = ClientList::new(StoreGateway::new(seeded(1)));
        let err = list.create(&form("Ab")).await.unwrap_err();
        assert!(err.field_errors().is_some());
        assert_eq!(list.error().as_deref(), Some(err.message()));
    }

    #[tokio::test]
    async fn deleting_last_row_steps_back_a_page() {
        let list = ClientList::new(StoreGateway::new(seeded(11)));
        list.go_to_page(2).await.unwrap();
        let last = list.result().unwrap().data[0].id.clone();

        list.delete(&last).await.unwrap();
        let page = list.result().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 10);
        assert_eq!(list.query().page, 1);
    }

    #[tokio::test]
    async fn update_refreshes_current_page() {
        let list = ClientList::new(StoreGateway::new(seeded(2)));
        list.refresh().await.unwrap();
        let id = list.result().unwrap().data[0].id.clone();

        list.update(&id, &form("Oficina Renomeada")).await.unwrap();
        assert_eq!(
            list.result().unwrap().data[0].name.as_str(),
            "Oficina Renomeada"
        );
        assert!(list.error().is_none());
    }
}
