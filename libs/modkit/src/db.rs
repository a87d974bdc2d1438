//! Database connection helper over SeaORM.
//!
//! SQLite DSNs with relative paths are resolved against the server home
//! directory and their parent directories are created up front.

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// DSN used by `--mock` runs and tests.
pub const SQLITE_MEMORY_DSN: &str = "sqlite::memory:";

/// Pool tuning knobs shared by all backends.
#[derive(Debug, Clone, Default)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    pub acquire_timeout: Option<Duration>,
    /// SQLite only.
    pub busy_timeout: Option<Duration>,
}

pub fn is_sqlite(dsn: &str) -> bool {
    dsn.starts_with("sqlite:")
}

fn is_sqlite_memory(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Rewrite a SQLite DSN so its file path is absolute and creatable.
///
/// `sqlite://database/recipes.db` with base `/srv/app` becomes
/// `sqlite:///srv/app/database/recipes.db?mode=rwc`.
pub fn prepare_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if is_sqlite_memory(dsn) {
        return Ok(dsn.to_string());
    }

    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .with_context(|| format!("not a sqlite DSN: {dsn}"))?;
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path.is_empty() {
        anyhow::bail!("sqlite DSN has no file path: {dsn}");
    }

    let file = Path::new(path);
    let file: PathBuf = if file.is_absolute() {
        file.to_path_buf()
    } else {
        base_dir.join(file)
    };
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let query = query.unwrap_or("mode=rwc");
    Ok(format!("sqlite://{}?{}", file.to_string_lossy(), query))
}

/// Open a pooled connection. In-memory SQLite is pinned to a single connection
/// because each connection would otherwise see its own empty database.
pub async fn connect(dsn: &str, base_dir: &Path, opts: &ConnectOpts) -> Result<DatabaseConnection> {
    let sqlite = is_sqlite(dsn);
    let url = if sqlite {
        prepare_sqlite_dsn(dsn, base_dir)?
    } else {
        dsn.to_string()
    };

    let mut co = ConnectOptions::new(url);
    co.sqlx_logging(false);

    if sqlite && is_sqlite_memory(dsn) {
        co.max_connections(1).min_connections(1);
    } else {
        if let Some(n) = opts.max_conns {
            co.max_connections(n);
        }
        if let Some(n) = opts.min_conns {
            co.min_connections(n);
        }
    }
    if let Some(t) = opts.acquire_timeout {
        co.acquire_timeout(t);
    }
    if sqlite {
        if let Some(t) = opts.busy_timeout {
            co.map_sqlx_sqlite_opts(move |o| o.busy_timeout(t));
        }
    }

    let db = Database::connect(co)
        .await
        .with_context(|| format!("failed to connect to database ({})", redact(dsn)))?;
    tracing::info!(dsn = %redact(dsn), "database connected");
    Ok(db)
}

/// Strip credentials from a DSN for logging.
pub fn redact(dsn: &str) -> String {
    match (dsn.find("://"), dsn.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://<redacted>{}", &dsn[..scheme_end], &dsn[at..])
        }
        _ => dsn.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn relative_sqlite_path_is_resolved_and_created() {
        let tmp = tempdir().unwrap();
        let dsn = prepare_sqlite_dsn("sqlite://database/recipes.db", tmp.path()).unwrap();

        let expected = tmp.path().join("database/recipes.db");
        assert_eq!(dsn, format!("sqlite://{}?mode=rwc", expected.to_string_lossy()));
        assert!(tmp.path().join("database").is_dir());
    }

    #[test]
    fn absolute_sqlite_path_keeps_query() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("x.db");
        let raw = format!("sqlite://{}?mode=ro", file.to_string_lossy());

        let dsn = prepare_sqlite_dsn(&raw, Path::new("/unused")).unwrap();
        assert_eq!(dsn, raw);
    }

    #[test]
    fn memory_dsn_is_untouched() {
        assert_eq!(
            prepare_sqlite_dsn(SQLITE_MEMORY_DSN, Path::new("/")).unwrap(),
            SQLITE_MEMORY_DSN
        );
        assert!(prepare_sqlite_dsn("sqlite://", Path::new("/")).is_err());
    }

    #[test]
    fn credentials_are_redacted() {
        assert_eq!(
            redact("postgres://user:secret@db:5432/recipes"),
            "postgres://<redacted>@db:5432/recipes"
        );
        assert_eq!(redact("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn connects_to_in_memory_sqlite() {
        use sea_orm::ConnectionTrait;

        let db = connect(SQLITE_MEMORY_DSN, Path::new("/"), &ConnectOpts::default())
            .await
            .unwrap();
        db.execute_unprepared("CREATE TABLE t (id INTEGER PRIMARY KEY)")
            .await
            .unwrap();
        db.execute_unprepared("INSERT INTO t (id) VALUES (1)")
            .await
            .unwrap();
        assert_eq!(db.get_database_backend(), sea_orm::DatabaseBackend::Sqlite);
    }
}
