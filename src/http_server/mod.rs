//! # insightdb HTTP Server Module
//!
//! HTTP transport over the insight facade.
//!
//! # Endpoints
//!
//! - `GET /datasets` - List registered datasets
//! - `PUT /dataset/:id/:kind` - Add a dataset from a raw archive body
//! - `DELETE /dataset/:id` - Remove a dataset
//! - `POST /query` - Run a query
//! - `GET /echo/:msg` - Echo check

pub mod config;
pub mod dataset_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
