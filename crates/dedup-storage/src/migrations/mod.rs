//! Schema migrations, tracked through `PRAGMA user_version`.

mod v001_content_tables;
mod v002_archive_tables;

use rusqlite::Connection;
use tracing::info;

use dedup_core::errors::{DedupError, DedupResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> DedupResult<()>;

const MIGRATIONS: &[(u32, MigrationFn)] = &[
    (1, v001_content_tables::migrate),
    (2, v002_archive_tables::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Current schema version of the connected database.
pub fn current_version(conn: &Connection) -> DedupResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the database's current version.
/// Each step runs in its own transaction together with the version bump.
pub fn run_migrations(conn: &Connection) -> DedupResult<u32> {
    let current = current_version(conn)?;
    let mut applied = current;

    for &(version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration {version} begin: {e}")))?;

        let step = migrate(&tx).and_then(|()| {
            tx.pragma_update(None, "user_version", version)
                .map_err(|e| to_storage_err(e.to_string()))
        });

        match step {
            Ok(()) => {
                tx.commit()
                    .map_err(|e| to_storage_err(format!("migration {version} commit: {e}")))?;
                applied = version;
            }
            Err(e) => {
                let _ = tx.rollback();
                return Err(DedupError::StorageError(StorageError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                }));
            }
        }
    }

    if applied != current {
        info!(from = current, to = applied, "schema migrated");
    }
    Ok(applied)
}
