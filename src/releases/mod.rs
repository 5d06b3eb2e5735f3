mod pagination;
mod query;

pub use pagination::{
    compute_pagination, page_url, Pagination, PaginationSettings, DEFAULT_PAGE_SIZE, PAGE_PARAM,
};
pub use query::{
    count_query, page_query, ComposedQuery, ReleaseFilter, ReleaseListParams, ReleasePage,
    ReleaseQueryComposer,
};
