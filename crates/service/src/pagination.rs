//! Pagination shared by every collection endpoint.

use sea_orm::{ConnectionTrait, PaginatorTrait, SelectorTrait};

use common::constants::{DEFAULT_RECORDS_PER_PAGE, MAX_RECORDS_PER_PAGE};
use common::types::Paging;

use crate::errors::{db_err, ServiceError};

/// Requested page, 1-based.
#[derive(Clone, Copy, Debug)]
pub struct PageParams {
    pub page: u64,
    pub records_per_page: u64,
}

impl PageParams {
    /// Clamp to sane bounds: page >= 1, 1 <= records_per_page <= max.
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.max(1);
        let per = self.records_per_page.clamp(1, MAX_RECORDS_PER_PAGE);
        (page, per)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            records_per_page: DEFAULT_RECORDS_PER_PAGE,
        }
    }
}

/// Fetch one page of `query` plus the paging block describing the whole set.
/// Pages past the end yield an empty data vector, not an error.
pub async fn page<'db, C, Q>(
    db: &'db C,
    query: Q,
    params: PageParams,
) -> Result<(Vec<<Q::Selector as SelectorTrait>::Item>, Paging), ServiceError>
where
    C: ConnectionTrait,
    Q: PaginatorTrait<'db, C>,
{
    let (page, per) = params.normalize();
    let paginator = query.paginate(db, per);
    let totals = paginator.num_items_and_pages().await.map_err(db_err)?;
    let data = paginator.fetch_page(page - 1).await.map_err(db_err)?;
    Ok((
        data,
        Paging {
            current_page: page,
            records_per_page: per,
            total_pages: totals.number_of_pages,
            total_records: totals.number_of_items,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::PageParams;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (page, per) = PageParams {
            page: 0,
            records_per_page: 0,
        }
        .normalize();
        assert_eq!(page, 1);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (page, per) = PageParams {
            page: 5,
            records_per_page: 1000,
        }
        .normalize();
        assert_eq!(page, 5);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = PageParams::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.records_per_page, 10);
    }
}
