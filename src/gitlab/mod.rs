// GitLab API module.
// Provides the REST client, response types, and the controller-facing trait.

pub mod api;
pub mod client;
pub mod endpoints;
pub mod types;

pub use api::GitLabApi;
pub use client::GitLabClient;
pub use types::*;
