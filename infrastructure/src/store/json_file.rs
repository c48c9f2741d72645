//! One JSON document per entry under a data directory.
//!
//! Verdicts and the debate live inside the entry document, so deleting the
//! file removes everything that belongs to the entry.

use async_trait::async_trait;
use panel_application::ports::entry_store::{EntryStore, StoreError};
use panel_domain::{DebateRecord, EntryRecord};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub struct JsonFileEntryStore {
    dir: PathBuf,
}

impl JsonFileEntryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Entry ids become file names, so only `[A-Za-z0-9_-]` is accepted.
    fn path_for(&self, entry_id: &str) -> Result<PathBuf, StoreError> {
        let safe = !entry_id.is_empty()
            && entry_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(StoreError::InvalidId(entry_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", entry_id)))
    }

    async fn read(&self, path: &Path, entry_id: &str) -> Result<Option<EntryRecord>, StoreError> {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                entry_id: entry_id.to_string(),
                reason: e.to_string(),
            })
    }

    async fn write(&self, record: &EntryRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.entry_id)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(record).map_err(|e| StoreError::Corrupt {
            entry_id: record.entry_id.clone(),
            reason: e.to_string(),
        })?;

        fs::write(&tmp, text)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        debug!("Stored entry {} at {}", record.entry_id, path.display());
        Ok(())
    }
}

#[async_trait]
impl EntryStore for JsonFileEntryStore {
    async fn save(&self, record: &EntryRecord) -> Result<(), StoreError> {
        self.write(record).await
    }

    async fn attach_debate(
        &self,
        entry_id: &str,
        debate: DebateRecord,
    ) -> Result<EntryRecord, StoreError> {
        let mut record = self
            .get(entry_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(entry_id.to_string()))?;
        record.debate = Some(debate);
        self.write(&record).await?;
        Ok(record)
    }

    async fn get(&self, entry_id: &str) -> Result<Option<EntryRecord>, StoreError> {
        self.read(&self.path_for(entry_id)?, entry_id).await
    }

    async fn list(&self) -> Result<Vec<EntryRecord>, StoreError> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        let mut records = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let path = item.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            match self.read(&path, &name).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                // One bad file should not hide the rest
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn delete(&self, entry_id: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(entry_id)?).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use panel_domain::{
        Artifact, EvaluationMode, JudgeIdentity, JudgeVerdict, ScoreCard, TerminationCause,
        TurnRecord, VerdictOutcome, debate_id_for,
    };

    fn record(entry_id: &str) -> EntryRecord {
        let judge = JudgeIdentity::new("grok_judge", "Grok", "grok-beta", "troll");
        let verdict = JudgeVerdict::decided(
            &judge,
            VerdictOutcome::Score(ScoreCard::new(4.0).with_one_liner("meh")),
            Some("who dressed him".to_string()),
            "raw",
        );
        EntryRecord::new(
            entry_id,
            EvaluationMode::scoring("outfit"),
            Artifact::image("https://example.com/a.jpg"),
            vec![verdict],
        )
    }

    fn debate(entry_id: &str) -> DebateRecord {
        DebateRecord {
            debate_id: debate_id_for(entry_id),
            participants: vec!["grok_judge".to_string()],
            max_turns: 2,
            selector_model: "gpt-4o-mini".to_string(),
            turns: vec![TurnRecord {
                sequence: 1,
                speaker: "grok_judge".to_string(),
                content: "Bro.".to_string(),
            }],
            termination: Some(TerminationCause::BudgetExhausted),
            error: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path().join("entries"));

        let original = record("entry_1");
        store.save(&original).await.unwrap();
        let loaded = store.get("entry_1").await.unwrap().unwrap();
        assert_eq!(loaded, original);
        assert!(store.get("entry_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_attach_debate() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path());
        store.save(&record("entry_1")).await.unwrap();

        let updated = store
            .attach_debate("entry_1", debate("entry_1"))
            .await
            .unwrap();
        assert_eq!(updated.debate.as_ref().unwrap().debate_id, "entry_1_debate");

        let loaded = store.get("entry_1").await.unwrap().unwrap();
        assert_eq!(loaded.debate.unwrap().turns.len(), 1);

        let missing = store.attach_debate("ghost", debate("ghost")).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path());
        store.save(&record("entry_1")).await.unwrap();
        store
            .attach_debate("entry_1", debate("entry_1"))
            .await
            .unwrap();

        assert!(store.delete("entry_1").await.unwrap());
        assert!(store.get("entry_1").await.unwrap().is_none());
        assert!(!store.delete("entry_1").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_skips_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path());

        let mut older = record("entry_old");
        older.created_at = Utc::now() - Duration::hours(1);
        store.save(&older).await.unwrap();
        store.save(&record("entry_new")).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.entry_id)
            .collect();
        assert_eq!(ids, vec!["entry_new", "entry_old"]);
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path().join("nothing-here"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsafe_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path());
        store.save(&record("a_b")).await.unwrap();

        for id in ["../escape", "a/b", "a.b", ""] {
            let saved = store.save(&record(id)).await;
            assert!(matches!(saved, Err(StoreError::InvalidId(_))), "{id:?}");
            assert!(matches!(store.get(id).await, Err(StoreError::InvalidId(_))));
            assert!(matches!(store.delete(id).await, Err(StoreError::InvalidId(_))));
        }

        // look-alike ids never resolve to another entry's file
        assert_eq!(store.get("a_b").await.unwrap().unwrap().entry_id, "a_b");
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(!dir.path().join("___escape.json").exists());
    }
}
