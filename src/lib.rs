pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod services;
