use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

use crate::profile::{Label, Profile};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS user_preferences (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        age INTEGER,
        gender TEXT,
        weight REAL,
        height INTEGER,
        goal TEXT,
        diet TEXT,
        activity_level TEXT,
        medical_conditions TEXT,
        region TEXT,
        state TEXT
    )";

/// Append-only table of submitted profiles. Dropping it closes the connection.
pub struct PreferenceStore {
    conn: Connection,
}

impl PreferenceStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("opening preference store {}", path.display()))?;
        debug!(path = %path.display(), "preference store opened");
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("creating user_preferences table")?;
        Ok(Self { conn })
    }

    /// Inserts one row and returns its surrogate id.
    pub fn insert(&self, p: &Profile) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO user_preferences
                 (name, age, gender, weight, height, goal, diet, activity_level, medical_conditions, region, state)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    p.name,
                    p.age,
                    p.gender.label(),
                    p.weight_kg,
                    p.height_cm,
                    p.goal.label(),
                    p.diet.label(),
                    p.activity_level.label(),
                    p.medical_conditions,
                    p.region,
                    p.state,
                ],
            )
            .context("inserting into user_preferences")?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "preferences row inserted");
        Ok(id)
    }
}
