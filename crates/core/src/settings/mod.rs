//! Settings discovery and evaluation state

pub mod locator;
pub mod registry;

pub use locator::{LocatedSettings, SettingsLocator};
pub use registry::{ProjectDescriptor, ProjectRegistry};
