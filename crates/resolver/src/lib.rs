//! navms resolution core
//!
//! This crate contains everything needed to turn a request's hostname and
//! path into a destination URL: the cloud-environment model, the static
//! redirect table, identity extraction, the tenant-directory client, and
//! the resolution state machine. It knows nothing about the HTTP server
//! hosting it.

pub mod cloud;
pub mod directory;
pub mod error;
pub mod identity;
pub mod resolve;
pub mod table;

pub use cloud::CloudEnvironment;
pub use directory::{CloudResolver, DirectoryLookup};
pub use error::{ResolveError, TableError};
pub use identity::RequestIdentity;
pub use resolve::Resolver;
pub use table::{RedirectTable, TargetSet};
