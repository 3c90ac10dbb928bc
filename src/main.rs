use crate::config::load_config;
use crate::db::{init_db, Database, RecordStore};
use crate::logging::{init_logging, LogConfig};
use crate::responses::error_to_response;
use crate::router::handle;
use crate::state::AppState;
use astra::Server;
use std::net::SocketAddr;
use tracing::{error, info};

mod codec;
mod config;
mod db;
mod domain;
mod errors;
mod logging;
mod responses;
mod router;
mod spreadsheets;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration failed: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&LogConfig::from(&settings.logging));

    let db = Database::new(&settings.database.path);
    if let Err(e) = init_db(&db, &settings.database.schema_path) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let store = RecordStore::new(db, settings.storage.key.clone());
    let state = match AppState::open(settings, store) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "could not load saved records");
            std::process::exit(1);
        }
    };
    info!(records = state.ledger().map(|l| l.records().len()).unwrap_or(0), "records loaded");

    let server_config = &state.settings.server;
    let addr: SocketAddr = match server_config.addr().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %server_config.addr(), error = %e, "invalid listen address");
            std::process::exit(1);
        }
    };
    let max_workers = server_config.max_workers.max(1);

    info!(%addr, max_workers, "starting server");
    let server = Server::bind(&addr).max_workers(max_workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down");
}
