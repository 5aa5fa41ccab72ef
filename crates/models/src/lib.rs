pub mod db;

pub mod department;
pub mod it_asset;
pub mod it_asset_category;
pub mod it_service;
pub mod macroprocess;
pub mod process;
pub mod rating_level;
pub mod security_threat;

pub mod organization;
pub mod organization_analysis;
pub mod organization_analysis_detail;
pub mod organization_department;
pub mod organization_it_asset;
pub mod organization_it_asset_vulnerability;
pub mod organization_it_service;
pub mod organization_it_service_it_asset;
pub mod organization_macroprocess;
pub mod organization_process;
pub mod organization_security_threat;

pub mod system_role;
pub mod system_user;
pub mod system_user_role;

#[cfg(test)]
mod tests;
