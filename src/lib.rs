// glpipe: terminal browser for GitLab groups, projects, pipelines, and jobs.

pub mod app;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod logging;
pub mod state;
pub mod ui;
pub mod view;

pub use error::{GlpipeError, Result};
