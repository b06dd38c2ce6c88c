//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::TabConfig;
