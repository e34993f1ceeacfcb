use anyhow::{Context, Result};
use log::{debug, warn};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

use crate::models::Journal;

/// The journal lives as one JSON blob under this key, the same shape the
/// browser build kept in local storage.
const STORAGE_KEY: &str = "gauge-journal";

/// Persistence boundary for the controller: one load per command, one save
/// per mutation. Implementations must hand back defaults rather than fail
/// when the stored blob is missing or unreadable.
pub trait Repository {
    fn load(&self) -> Result<Journal>;
    fn save(&self, journal: &Journal) -> Result<()>;
}

pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "gauge") {
            Ok(proj_dirs.data_dir().join("gauge.db"))
        } else {
            Ok(PathBuf::from("gauge.db"))
        }
    }

    fn read_blob(&self) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM storage WHERE key = ?1",
            [STORAGE_KEY],
            |row| row.get(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Repository for SqliteStore {
    fn load(&self) -> Result<Journal> {
        let Some(blob) = self.read_blob()? else {
            debug!("no journal stored yet, starting from defaults");
            return Ok(Journal::default());
        };
        match serde_json::from_str::<Journal>(&blob) {
            Ok(journal) => {
                debug!("loaded journal with {} event(s)", journal.events.len());
                Ok(journal)
            }
            Err(e) => {
                // A corrupt blob must not lock the user out of their journal.
                warn!("stored journal failed to parse ({e}), falling back to defaults");
                Ok(Journal::default())
            }
        }
    }

    fn save(&self, journal: &Journal) -> Result<()> {
        let blob = serde_json::to_string(journal).context("Failed to serialize journal")?;
        self.conn
            .execute(
                "INSERT INTO storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![STORAGE_KEY, blob],
            )
            .context("Failed to write journal")?;
        debug!("saved journal with {} event(s)", journal.events.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, EventKind, Settings, new_event_id};
    use chrono::{Local, NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open_at(&dir.path().join("gauge.db")).unwrap();
        (dir, store)
    }

    fn sample_journal() -> Journal {
        let mut journal = Journal {
            events: vec![],
            settings: Settings {
                name: "Alex".to_string(),
                onboarding_date: NaiveDate::from_ymd_opt(2023, 4, 1),
                target_resignation_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            },
        };
        journal.add_event(Event {
            id: new_event_id(),
            date: Local.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).unwrap(),
            kind: EventKind::Stress,
            points: 2,
            description: "surprise reorg announced in standup".to_string(),
            tags: vec!["reorg".to_string(), "management".to_string()],
        });
        journal.add_event(Event {
            id: new_event_id(),
            date: Local.with_ymd_and_hms(2024, 11, 6, 17, 0, 0).unwrap(),
            kind: EventKind::Happy,
            points: 1,
            description: "left at five for once".to_string(),
            tags: vec![],
        });
        journal
    }

    #[test]
    fn empty_store_loads_defaults() {
        let (_dir, store) = open_temp();
        let journal = store.load().unwrap();
        assert_eq!(journal, Journal::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = open_temp();
        let journal = sample_journal();
        store.save(&journal).unwrap();
        assert_eq!(store.load().unwrap(), journal);
    }

    #[test]
    fn save_replaces_the_previous_blob() {
        let (_dir, store) = open_temp();
        let mut journal = sample_journal();
        store.save(&journal).unwrap();

        let doomed = journal.events[0].id.clone();
        journal.remove_event(&doomed);
        journal.settings.name = "Sam".to_string();
        store.save(&journal).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.events.len(), 1);
        assert_eq!(loaded.settings.name, "Sam");
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let (dir, store) = open_temp();
        store.save(&sample_journal()).unwrap();
        store
            .conn
            .execute(
                "UPDATE storage SET value = '{not json' WHERE key = ?1",
                [STORAGE_KEY],
            )
            .unwrap();
        assert_eq!(store.load().unwrap(), Journal::default());

        // Reopening sees the same fallback; the file itself stays usable.
        drop(store);
        let reopened = SqliteStore::open_at(&dir.path().join("gauge.db")).unwrap();
        assert_eq!(reopened.load().unwrap(), Journal::default());
    }

    #[test]
    fn legacy_blob_with_untyped_events_loads_as_stress() {
        let (_dir, store) = open_temp();
        let blob = r#"{
            "events": [{
                "id": "old0001",
                "date": "2024-03-03T12:00:00+08:00",
                "points": 3,
                "description": "from before the happy/stress split",
                "tags": ["legacy"]
            }],
            "settings": {
                "name": "Alex",
                "onboardingDate": "2023-04-01",
                "targetResignationDate": null
            }
        }"#;
        store
            .conn
            .execute(
                "INSERT INTO storage (key, value) VALUES (?1, ?2)",
                params![STORAGE_KEY, blob],
            )
            .unwrap();

        let journal = store.load().unwrap();
        assert_eq!(journal.events.len(), 1);
        assert_eq!(journal.events[0].kind, EventKind::Stress);
        assert_eq!(journal.settings.onboarding_date, NaiveDate::from_ymd_opt(2023, 4, 1));
        assert_eq!(journal.settings.target_resignation_date, None);
    }

    #[test]
    fn journal_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gauge.db");
        let journal = sample_journal();
        {
            let store = SqliteStore::open_at(&path).unwrap();
            store.save(&journal).unwrap();
        }
        let store = SqliteStore::open_at(&path).unwrap();
        assert_eq!(store.load().unwrap(), journal);
    }
}
