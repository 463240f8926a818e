pub mod cache;
pub mod config;
pub mod directory;
pub mod ingest;
pub mod lineup;
pub mod output;
pub mod positions;
pub mod report;
pub mod sales;
pub mod server;
pub mod transfers;
pub mod types;
