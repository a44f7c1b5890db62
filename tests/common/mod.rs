#![allow(dead_code)]

use std::net::SocketAddr;

use crudflow::config::ServerConfig;
use crudflow::models::Fields;
use crudflow::server;
use serde_json::Value;
use tokio::task::JoinHandle;

pub struct Backend {
    pub base_url: String,
    pub state: crudflow::state::AppState,
    handle: JoinHandle<()>,
}

impl Drop for Backend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Mock backend on an ephemeral port with a fresh in-memory database.
pub async fn start_backend() -> Backend {
    let config = ServerConfig::default();
    let state = server::build_state(&config)
        .await
        .expect("Failed to build backend state");

    let (addr, handle) = server::spawn(state.clone(), SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind backend");

    Backend {
        base_url: format!("http://{}", addr),
        state,
        handle,
    }
}

pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => panic!("fields must be a JSON object"),
    }
}
