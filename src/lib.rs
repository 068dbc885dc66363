use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use db::Db;
use middleware::{gzip_compressor, logger, Middleware};
use reminders::Repository;
use server::Server;
use tracing::info;

pub mod client;
pub mod db;
pub mod error;
pub mod middleware;
pub mod reminders;
pub mod request;
pub mod response_writer;
pub mod router;
pub mod server;
pub mod status_code_registry;
#[cfg(test)]
mod test_utils;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: String,
    pub db_path: PathBuf,
    pub db_cfg_path: PathBuf,
}

pub fn run(config: Config) -> anyhow::Result<()> {
    let db = Db::open(&config.db_path, &config.db_cfg_path)?;
    let router = reminders::router(Arc::new(Mutex::new(Repository::new(db))))?;
    let handler = Middleware::new()
        .with(logger::new)
        .with(gzip_compressor::new)
        .then(router);

    let server = Server::new(config.addr.as_str())?;
    info!(addr = %server.local_addr()?, "listening");
    server.run(handler);
    Ok(())
}
