//! SQLite storage adapter.
//!
//! Backs both the user store and the ticker store with one pooled database.
//! Uniqueness ((owner, code) pairs, emails) and the user→ticker cascade are
//! enforced in the schema, so concurrent writers are serialized by the
//! database rather than by application locks.

use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use uuid::Uuid;

use crate::domain::error::FauxtickError;
use crate::domain::ticker::UserDefinedTicker;
use crate::domain::user::User;
use crate::ports::config_port::ConfigPort;
use crate::ports::ticker_store::TickerStore;
use crate::ports::user_store::{UserPage, UserStore};

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FauxtickError> {
        let db_path =
            config
                .get_string("database", "path")
                .ok_or_else(|| FauxtickError::ConfigMissing {
                    section: "database".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("database", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path).with_init(enable_foreign_keys);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| FauxtickError::Database {
                    reason: e.to_string(),
                })?;

        Ok(Self { pool })
    }

    /// Private in-memory database. Capped at one connection: each SQLite
    /// memory connection is its own database.
    pub fn in_memory() -> Result<Self, FauxtickError> {
        let manager = SqliteConnectionManager::memory().with_init(enable_foreign_keys);
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| FauxtickError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), FauxtickError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                hashed_password TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 0,
                is_superuser INTEGER NOT NULL DEFAULT 0,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS user_defined_tickers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                ticker_code TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                sector TEXT,
                drift REAL NOT NULL,
                volatility REAL NOT NULL,
                jump_intensity REAL NOT NULL,
                jump_mean REAL NOT NULL,
                jump_std_dev REAL NOT NULL,
                UNIQUE (user_id, ticker_code)
            );
            CREATE INDEX IF NOT EXISTS idx_tickers_user ON user_defined_tickers(user_id);",
        )
        .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn conn(
        &self,
    ) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, FauxtickError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| FauxtickError::Database {
                reason: e.to_string(),
            })
    }
}

fn enable_foreign_keys(conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Map a write error, turning schema constraint violations into Conflict.
fn map_write_err(e: rusqlite::Error, conflict_reason: &str) -> FauxtickError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            FauxtickError::Conflict {
                reason: conflict_reason.to_string(),
            }
        }
        _ => FauxtickError::DatabaseQuery {
            reason: e.to_string(),
        },
    }
}

fn parse_uuid(raw: &str, idx: usize) -> Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(raw: &str, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(7)?;
    let updated_str: String = row.get(8)?;
    Ok(User {
        id: parse_uuid(&id_str, 0)?,
        email: row.get(1)?,
        hashed_password: row.get(2)?,
        is_active: row.get(3)?,
        is_superuser: row.get(4)?,
        first_name: row.get(5)?,
        last_name: row.get(6)?,
        created_at: parse_timestamp(&created_str, 7)?,
        updated_at: parse_timestamp(&updated_str, 8)?,
    })
}

fn ticker_from_row(row: &rusqlite::Row<'_>) -> Result<UserDefinedTicker, rusqlite::Error> {
    let user_id_str: String = row.get(1)?;
    Ok(UserDefinedTicker {
        id: row.get(0)?,
        user_id: parse_uuid(&user_id_str, 1)?,
        code: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        sector: row.get(5)?,
        drift: row.get(6)?,
        volatility: row.get(7)?,
        jump_intensity: row.get(8)?,
        jump_mean: row.get(9)?,
        jump_std_dev: row.get(10)?,
    })
}

const USER_COLUMNS: &str = "id, email, hashed_password, is_active, is_superuser, \
                            first_name, last_name, created_at, updated_at";

const TICKER_COLUMNS: &str = "id, user_id, ticker_code, name, description, sector, \
                              drift, volatility, jump_intensity, jump_mean, jump_std_dev";

impl UserStore for SqliteAdapter {
    fn insert(&self, user: &User) -> Result<(), FauxtickError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO users (id, email, hashed_password, is_active, is_superuser,
                                first_name, last_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.id.to_string(),
                user.email,
                user.hashed_password,
                user.is_active,
                user.is_superuser,
                user.first_name,
                user.last_name,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| map_write_err(e, "user with this email already exists"))?;

        Ok(())
    }

    fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, FauxtickError> {
        let conn = self.conn()?;

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let mut rows = stmt
            .query_map(params![user_id.to_string()], user_from_row)
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        rows.next()
            .transpose()
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })
    }

    fn get_by_email(&self, email: &str) -> Result<Option<User>, FauxtickError> {
        let conn = self.conn()?;

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let mut rows = stmt
            .query_map(params![email], user_from_row)
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        rows.next()
            .transpose()
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })
    }

    fn list(&self, skip: usize, limit: usize) -> Result<UserPage, FauxtickError> {
        let conn = self.conn()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id LIMIT ?1 OFFSET ?2"
        );
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map(params![limit as i64, skip as i64], user_from_row)
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(
                row.map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(UserPage {
            users,
            count: count as usize,
        })
    }

    fn update(&self, user: &User) -> Result<(), FauxtickError> {
        let conn = self.conn()?;

        conn.execute(
            "UPDATE users
             SET email = ?2, hashed_password = ?3, is_active = ?4, is_superuser = ?5,
                 first_name = ?6, last_name = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                user.id.to_string(),
                user.email,
                user.hashed_password,
                user.is_active,
                user.is_superuser,
                user.first_name,
                user.last_name,
                user.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| map_write_err(e, "user with this email already exists"))?;

        Ok(())
    }

    fn activate(&self, user_id: Uuid) -> Result<Option<User>, FauxtickError> {
        let conn = self.conn()?;

        let changed = conn
            .execute(
                "UPDATE users SET is_active = 1, updated_at = ?2 WHERE id = ?1",
                params![user_id.to_string(), Utc::now().to_rfc3339()],
            )
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        if changed == 0 {
            return Ok(None);
        }
        drop(conn);
        self.get_by_id(user_id)
    }

    fn delete(&self, user_id: Uuid) -> Result<(), FauxtickError> {
        let conn = self.conn()?;

        conn.execute(
            "DELETE FROM users WHERE id = ?1",
            params![user_id.to_string()],
        )
        .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

impl TickerStore for SqliteAdapter {
    fn insert(&self, ticker: &UserDefinedTicker) -> Result<UserDefinedTicker, FauxtickError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO user_defined_tickers
                 (user_id, ticker_code, name, description, sector,
                  drift, volatility, jump_intensity, jump_mean, jump_std_dev)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                ticker.user_id.to_string(),
                ticker.code,
                ticker.name,
                ticker.description,
                ticker.sector,
                ticker.drift,
                ticker.volatility,
                ticker.jump_intensity,
                ticker.jump_mean,
                ticker.jump_std_dev,
            ],
        )
        .map_err(|e| map_write_err(e, "ticker with this code already exists"))?;

        let mut inserted = ticker.clone();
        inserted.id = conn.last_insert_rowid();
        Ok(inserted)
    }

    fn get_by_owner_and_code(
        &self,
        owner_id: Uuid,
        code: &str,
    ) -> Result<Option<UserDefinedTicker>, FauxtickError> {
        let conn = self.conn()?;

        let query = format!(
            "SELECT {TICKER_COLUMNS} FROM user_defined_tickers
             WHERE user_id = ?1 AND ticker_code = ?2"
        );
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let mut rows = stmt
            .query_map(params![owner_id.to_string(), code], ticker_from_row)
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        rows.next()
            .transpose()
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })
    }

    fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<UserDefinedTicker>, FauxtickError> {
        let conn = self.conn()?;

        let query = format!(
            "SELECT {TICKER_COLUMNS} FROM user_defined_tickers
             WHERE user_id = ?1 ORDER BY ticker_code"
        );
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map(params![owner_id.to_string()], ticker_from_row)
            .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut tickers = Vec::new();
        for row in rows {
            tickers.push(
                row.map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(tickers)
    }

    fn update(&self, ticker: &UserDefinedTicker) -> Result<(), FauxtickError> {
        let conn = self.conn()?;

        conn.execute(
            "UPDATE user_defined_tickers
             SET name = ?2, description = ?3, sector = ?4, drift = ?5, volatility = ?6,
                 jump_intensity = ?7, jump_mean = ?8, jump_std_dev = ?9
             WHERE id = ?1",
            params![
                ticker.id,
                ticker.name,
                ticker.description,
                ticker.sector,
                ticker.drift,
                ticker.volatility,
                ticker.jump_intensity,
                ticker.jump_mean,
                ticker.jump_std_dev,
            ],
        )
        .map_err(|e: rusqlite::Error| FauxtickError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}
