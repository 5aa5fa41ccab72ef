//! Catalogs of reusable reference items. Organizations point at these from
//! their own structure tables instead of copying names around.

pub mod departments;
pub mod it_asset_categories;
pub mod it_assets;
pub mod it_services;
pub mod macroprocesses;
pub mod processes;
pub mod security_threats;
