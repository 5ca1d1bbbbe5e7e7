pub mod book;
pub mod config;
pub mod error;
pub mod manifest;
pub mod sidebar;
pub mod vitepress;

pub use book::BookConfig;
pub use config::{Config, ConfigLayer};
pub use error::ConfigError;
pub use manifest::PackageManifest;
pub use sidebar::{NavItem, SidebarItem};
pub use vitepress::VitePressConfig;
