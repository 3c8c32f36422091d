//! Concrete host resources
//!
//! Every managed piece of the application is a Resource with:
//! - State detection (current vs desired)
//! - Apply function (converge current → desired)
//! - Refresh (react to a notification from a changed dependency)

pub mod config_file;
pub mod package;
pub mod service;

pub use config_file::ConfigFile;
pub use package::Package;
pub use service::Service;

pub(crate) use declarative::{ApplyContext, ApplyResult, Resource, ResourceKind, ResourceState};
