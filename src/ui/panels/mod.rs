// LicUsage - ui/panels/mod.rs

pub mod compliance;
pub mod records;
