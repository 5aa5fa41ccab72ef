//! Service layer providing the API's business operations on top of models.
//! - Validation collects every field problem before failing, so one 422
//!   response covers the whole payload.
//! - Organization-scoped modules resolve the organization from the path
//!   before touching nested rows.

pub mod analysis;
pub mod catalog;
pub mod errors;
pub mod management;
pub mod org;
pub mod organizations;
pub mod pagination;
pub mod validation;

#[cfg(test)]
pub mod test_support;
