mod client;
mod clockify_url;
pub mod models;

pub(crate) use clockify_url::*;

pub use client::*;
