mod client;
mod dev_backend;
mod dto;

pub use client::{ApiClient, PROJECTS_TABLE};
pub use dev_backend::{DevBackend, DEV_USER_ID};
