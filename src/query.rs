//! Reference implementation of the client list query.
//!
//! Every store answers listings through [`execute`] so the search, filter,
//! sort and paging semantics are the same whichever store serves the request.

use std::cmp::Ordering;

use crate::domain::client::Client;
use crate::domain::document::digits;
use crate::domain::fields::FieldSet;
use crate::domain::query::{QueryDescriptor, SortDescriptor, SortDirection};
use crate::pagination::Paginated;

/// Runs `query` against a snapshot of the store: search, kind filter, sort, page.
pub fn execute(snapshot: &[Client], query: &QueryDescriptor) -> Paginated<Client> {
    let mut rows = filter(snapshot, query);
    if let Some(sort) = &query.sort {
        sort_clients(&mut rows, sort);
    }
    Paginated::from_rows(rows, query.page, query.limit.get())
}

/// Applies the free-text search and then the kind filter, keeping snapshot order.
pub fn filter(snapshot: &[Client], query: &QueryDescriptor) -> Vec<Client> {
    let search = query.search.as_deref().map(SearchTerm::new);
    snapshot
        .iter()
        .filter(|client| search.as_ref().is_none_or(|term| term.matches(client)))
        .filter(|client| query.kind.matches(client.kind()))
        .cloned()
        .collect()
}

/// Normalized search input.
///
/// Names are matched case-insensitively; phone and document are matched on
/// digits only, so `"999-999"` finds a phone stored as `11999999999`.
#[derive(Debug, Clone)]
pub struct SearchTerm {
    text: String,
    digits: String,
}

impl SearchTerm {
    pub fn new(term: &str) -> Self {
        let term = term.trim();
        Self {
            text: term.to_lowercase(),
            digits: digits(term),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn matches(&self, client: &Client) -> bool {
        if self.is_empty() {
            return true;
        }
        if client.name.to_lowercase().contains(&self.text) {
            return true;
        }
        // A term without digits says nothing about phone or document.
        !self.digits.is_empty()
            && (client.phone.as_str().contains(&self.digits)
                || client.document.as_str().contains(&self.digits))
    }
}

/// Stable sort on one registry field; unknown fields leave the order untouched.
pub fn sort_clients(rows: &mut [Client], sort: &SortDescriptor) {
    let Some(spec) = Client::field(&sort.field) else {
        log::debug!("Ignoring sort on unknown field {:?}", sort.field);
        return;
    };

    let mut keyed: Vec<(CollationKey, Client)> = rows
        .iter()
        .map(|client| (CollationKey::new(&spec.value(client)), client.clone()))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match sort.direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });

    for (slot, (_, client)) in rows.iter_mut().zip(keyed) {
        *slot = client;
    }
}

/// Sort key approximating a Portuguese collation.
///
/// Values are compared lower-cased with diacritics folded first ("Álvaro"
/// sorts next to "alvaro"), then by the lower-cased text to keep the order
/// total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationKey {
    primary: String,
    tertiary: String,
}

impl CollationKey {
    pub fn new(value: &str) -> Self {
        let tertiary = value.to_lowercase();
        let primary = tertiary.chars().map(fold_diacritic).collect();
        Self { primary, tertiary }
    }
}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .cmp(&other.primary)
            .then_with(|| self.tertiary.cmp(&other.tertiary))
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
