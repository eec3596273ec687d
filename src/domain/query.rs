//! Descriptor of a filtered, sorted and paginated client listing.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientKind, TypeConstraintError};

/// Page sizes offered to callers.
pub const PAGE_SIZES: [usize; 7] = [10, 15, 20, 25, 50, 100, 200];

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of rows per page, restricted to [`PAGE_SIZES`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        if PAGE_SIZES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidValue(format!(
                "page size {value} is not one of {PAGE_SIZES:?}"
            )))
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// Restriction on the client kind; `All` leaves the list untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KindFilter {
    #[default]
    All,
    Only(ClientKind),
}

impl KindFilter {
    pub fn matches(self, kind: ClientKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(wanted) => wanted == kind,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Only(kind) => kind.as_str(),
        }
    }
}

impl FromStr for KindFilter {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        s.parse().map(KindFilter::Only)
    }
}

impl Display for KindFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort direction: {other}"
            ))),
        }
    }
}

/// Single active sort column.
///
/// The field is kept by name; it is resolved against the field registry when
/// the query runs, so an unknown name degrades to leaving the order unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: String,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Advances the tri-state cycle for `field`:
    /// unsorted → ascending → descending → unsorted.
    ///
    /// Selecting a different field always starts over at ascending.
    pub fn toggle(current: Option<&SortDescriptor>, field: &str) -> Option<SortDescriptor> {
        match current {
            Some(sort) if sort.field == field => match sort.direction {
                SortDirection::Asc => Some(SortDescriptor::desc(field)),
                SortDirection::Desc => None,
            },
            _ => Some(SortDescriptor::asc(field)),
        }
    }
}

/// Parameters of one list query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// 1-based page number.
    pub page: usize,
    pub limit: PageSize,
    pub search: Option<String>,
    pub kind: KindFilter,
    pub sort: Option<SortDescriptor>,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            page: 1,
            limit: PageSize::default(),
            search: None,
            kind: KindFilter::All,
            sort: None,
        }
    }
}

impl QueryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page, clamping zero to the first page.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn limit(mut self, limit: PageSize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the search term; blank terms clear the search.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_string();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    pub fn sort(mut self, sort: Option<SortDescriptor>) -> Self {
        self.sort = sort;
        self
    }
}
