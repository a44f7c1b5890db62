pub mod api;
pub mod apps;
pub mod client;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod models;
pub mod navigation;
pub mod scope;
pub mod server;
pub mod state;
pub mod store;
