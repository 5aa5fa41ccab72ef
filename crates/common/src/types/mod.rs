use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Paging metadata attached to every collection response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub current_page: u64,
    pub records_per_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
}
