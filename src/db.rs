use std::{
    fs::{self, OpenOptions},
    io::Read,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::StoreError;

const EMPTY: &[u8] = b"{}";

#[derive(Debug, Default, Serialize, Deserialize)]
struct DbConfig {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    checksum: String,
}

/// Flat-file byte store with an ID counter.
///
/// The blob lives in one file, the counter and the blob's checksum in a
/// second one. Writes whose checksum equals the stored one are skipped.
#[derive(Debug)]
pub struct Db {
    db_path: PathBuf,
    cfg_path: PathBuf,
    cfg: DbConfig,
    contents: Vec<u8>,
}

impl Db {
    /// Loads both files, creating them empty when missing.
    pub fn open(
        db_path: impl Into<PathBuf>,
        cfg_path: impl Into<PathBuf>,
    ) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        let cfg_path = cfg_path.into();

        let bs = read_or_create(&cfg_path)?;
        let mut cfg: DbConfig = if bs.iter().all(u8::is_ascii_whitespace) {
            DbConfig::default()
        } else {
            serde_json::from_slice(&bs)?
        };

        let contents = read_or_create(&db_path)?;
        if cfg.checksum.is_empty() {
            cfg.checksum = checksum(&contents);
        }

        info!(path = ?db_path, bytes = contents.len(), last_id = cfg.id, "db opened");
        Ok(Self {
            db_path,
            cfg_path,
            cfg,
            contents,
        })
    }

    /// The stored blob, `{}` while nothing has been written.
    pub fn contents(&self) -> &[u8] {
        if self.contents.is_empty() {
            EMPTY
        } else {
            &self.contents
        }
    }

    /// Persists `bytes` plus a trailing newline.
    ///
    /// Returns the number of bytes written, 0 when the contents are unchanged.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, StoreError> {
        let mut bs = Vec::with_capacity(bytes.len() + 1);
        bs.extend_from_slice(bytes);
        bs.push(b'\n');

        let checksum = checksum(&bs);
        if checksum == self.cfg.checksum {
            debug!("contents unchanged, write skipped");
            return Ok(0);
        }

        // The stored checksum must only ever describe bytes that hit the disk.
        let prev = std::mem::replace(&mut self.cfg.checksum, checksum);
        if let Err(err) = self
            .write_cfg()
            .and_then(|()| write_file(&self.db_path, &bs))
        {
            self.cfg.checksum = prev;
            // Best effort: keep the config file in line with the old blob.
            let _ = self.write_cfg();
            return Err(err);
        }

        let n = bs.len();
        self.contents = bs;
        Ok(n)
    }

    /// Issues the next ID. The counter is persisted with the next write.
    pub fn generate_id(&mut self) -> u64 {
        self.cfg.id += 1;
        self.cfg.id
    }

    pub fn last_id(&self) -> u64 {
        self.cfg.id
    }

    fn write_cfg(&self) -> Result<(), StoreError> {
        let mut bs = serde_json::to_vec(&self.cfg)?;
        bs.push(b'\n');
        write_file(&self.cfg_path, &bs)
    }
}

fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn read_or_create(path: &Path) -> Result<Vec<u8>, StoreError> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(io_error(path))?;
    let mut buf = vec![];
    file.read_to_end(&mut buf).map_err(io_error(path))?;
    Ok(buf)
}

fn write_file(path: &Path, bs: &[u8]) -> Result<(), StoreError> {
    fs::write(path, bs).map_err(io_error(path))?;
    debug!(path = ?path, bytes = bs.len(), "file written");
    Ok(())
}
