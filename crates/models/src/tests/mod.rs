/// CRUD and relation tests for the entity definitions
pub mod crud_tests;
