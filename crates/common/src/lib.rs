pub mod constants;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn paging_serializes_camel_case() {
        let p = types::Paging {
            current_page: 2,
            records_per_page: 10,
            total_pages: 5,
            total_records: 42,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["recordsPerPage"], 10);
        assert_eq!(json["totalPages"], 5);
        assert_eq!(json["totalRecords"], 42);
    }
}
