pub mod migrations;
pub mod models;
pub mod queries;
pub mod update;

use anyhow::Result;
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_READER_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct DbOptions {
    pub path: PathBuf,
    pub readers: usize,
    pub busy_timeout: Duration,
}

impl DbOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            readers: DEFAULT_READER_POOL_SIZE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Workspace store: one writer connection plus a small pool of read-only
/// connections. WAL mode lets readers run while the writer commits.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
    path: PathBuf,
}

impl Database {
    pub fn open(opts: &DbOptions) -> Result<Self> {
        let writer = Connection::open(&opts.path)?;
        writer.pragma_update(None, "journal_mode", "WAL")?;
        writer.busy_timeout(opts.busy_timeout)?;

        migrations::run(&writer)?;

        let pool_size = opts.readers.max(1);
        let mut readers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let conn = Connection::open_with_flags(
                &opts.path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(opts.busy_timeout)?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            opts.path.display(),
            pool_size
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
            path: opts.path.clone(),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| anyhow::anyhow!("Reader lock poisoned: {}", e))?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Writer lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Connectivity check. Goes through the writer so a wedged writer reads as unhealthy.
    pub fn ping(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }

    /// Close every connection. Errors are logged per connection; the first one is returned.
    pub fn close(self) -> Result<()> {
        let mut first_err = None;

        let conns = std::iter::once(self.writer).chain(self.readers);
        for conn in conns {
            let conn = match conn.into_inner() {
                Ok(conn) => conn,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Err((_, e)) = conn.close() {
                warn!("Failed to close connection to {}: {}", self.path.display(), e);
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e.into()),
            None => {
                info!("Database at {} closed", self.path.display());
                Ok(())
            }
        }
    }
}
