//! Limits shared by validation and pagination across the API.

/// Page size applied when the client does not ask for one.
pub const DEFAULT_RECORDS_PER_PAGE: u64 = 10;

/// Hard ceiling for a single page of results.
pub const MAX_RECORDS_PER_PAGE: u64 = 100;

/// Maximum length for names of catalog items, organizations and users.
pub const GENERAL_NAME_MAX_LENGTH: usize = 128;

/// Maximum length for free-form description fields.
pub const GENERAL_DESCRIPTION_MAX_LENGTH: usize = 4000;

/// Maximum length for an organization tax id.
pub const TAX_ID_MAX_LENGTH: usize = 16;

/// Maximum length for a system user email address.
pub const EMAIL_MAX_LENGTH: usize = 128;

/// Minimum length accepted for a system user password.
pub const PASSWORD_MIN_LENGTH: usize = 8;
