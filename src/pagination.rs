use serde::{Deserialize, Serialize};

/// Number of the last page for `total` rows; never less than 1.
pub fn last_page(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return 1;
    }
    total.div_ceil(limit).max(1)
}

/// One page of a listing together with the figures needed to navigate it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    /// Rows matching the filters, before paging.
    pub total: usize,
    pub page: usize,
    pub last_page: usize,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: usize, page: usize, limit: usize) -> Self {
        let page = if page == 0 { 1 } else { page };

        Self {
            data,
            total,
            page,
            last_page: last_page(total, limit),
        }
    }

    /// Pages an already filtered and sorted sequence.
    pub fn from_rows(rows: Vec<T>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let total = rows.len();
        let start = (page - 1).saturating_mul(limit);
        let data = rows.into_iter().skip(start).take(limit).collect();
        Self::new(data, total, page, limit)
    }

    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            last_page: self.last_page,
        }
    }

    pub fn try_map<U, E, F>(self, f: F) -> Result<Paginated<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(Paginated {
            data: self.data.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
            page: self.page,
            last_page: self.last_page,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page
    }
}
