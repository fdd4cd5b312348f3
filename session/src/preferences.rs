use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use game_core::GameSettings;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("failed to write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct SettingsStore {
    settings: Arc<watch::Sender<GameSettings>>,
    persist_path: Option<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsStore {
    pub fn in_memory(settings: GameSettings) -> Self {
        let (tx, _) = watch::channel(settings.normalized());
        Self {
            settings: Arc::new(tx),
            persist_path: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable. Later writes go back to the same file.
    pub async fn with_persistence(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<GameSettings>(&bytes) {
                Ok(saved) => saved,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "ignoring unreadable preferences");
                    GameSettings::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved preferences, using defaults");
                GameSettings::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read preferences");
                GameSettings::default()
            }
        };

        let mut store = Self::in_memory(settings);
        store.persist_path = Some(path);
        store
    }

    pub fn read(&self) -> GameSettings {
        self.settings.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSettings> {
        self.settings.subscribe()
    }

    pub async fn write(&self, settings: GameSettings) -> Result<(), PreferencesError> {
        let settings = settings.normalized();
        let _guard = self.write_lock.lock().await;
        if let Some(path) = &self.persist_path {
            let json = serde_json::to_vec_pretty(&settings)?;
            if let Err(err) = tokio::fs::write(path, json).await {
                warn!(path = %path.display(), error = %err, "persist error");
                return Err(err.into());
            }
        }
        self.settings.send_replace(settings);
        Ok(())
    }
}
