pub mod aggregate;
pub mod config;
pub mod filter;
pub mod ingest;
pub mod record;
pub mod store;
pub mod view;
