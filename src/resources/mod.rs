//! Per-resource definitions: schema plus the injected domain calls for each
//! catalog object managed as a resource.

pub(crate) mod check;
pub(crate) mod domain;
pub(crate) mod service;
pub(crate) mod team;
pub(crate) mod user;

pub use check::{CheckModel, CheckResource};
pub use domain::{DomainModel, DomainResource};
pub use service::{ServiceModel, ServiceResource};
pub use team::{TeamModel, TeamResource};
pub use user::{UserModel, UserResource};
