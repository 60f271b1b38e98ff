use crate::settings::Settings;
use anyhow::Result;
use async_std::sync::Mutex;
use async_std::{fs, task};
use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Write-behind store for the settings doc. Rapid edits coalesce: each
/// queued value restarts the quiet period and replaces the pending one, so
/// only the newest settings hit the disk once edits go quiet (or on an
/// explicit flush).
pub struct Saver {
    path: String,
    quiet: Duration,
    pending: Arc<Mutex<Option<String>>>,
    generation: Arc<AtomicU64>,
}

impl Saver {
    pub fn new(path: &str, quiet: Duration) -> Self {
        Saver {
            path: path.to_owned(),
            quiet,
            pending: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Queues the settings for writing once the quiet period elapses.
    pub async fn queue(&self, settings: &Settings) -> Result<()> {
        let doc = settings.to_doc()?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.pending.lock().await = Some(doc);

        let pending = Arc::clone(&self.pending);
        let generations = Arc::clone(&self.generation);
        let path = self.path.clone();
        let quiet = self.quiet;
        task::spawn(async move {
            task::sleep(quiet).await;
            // a newer queue restarted the quiet period; leave the write to it
            if generations.load(Ordering::SeqCst) != generation {
                return;
            }
            if let Some(doc) = pending.lock().await.take() {
                if let Err(err) = fs::write(&path, doc).await {
                    warn!("Failed to save settings to {}: {}", path, err);
                }
            }
        });
        Ok(())
    }

    /// Writes any pending value immediately.
    pub async fn flush(&self) -> Result<()> {
        if let Some(doc) = self.pending.lock().await.take() {
            fs::write(&self.path, doc).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::settings::SettingsAction;

    fn scratch_path(tag: &str) -> String {
        std::env::temp_dir()
            .join(format!("haulbooks-saver-{}-{}.yml", tag, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[async_std::test]
    async fn rapid_edits_coalesce_to_the_newest_value() -> Result<()> {
        let path = scratch_path("coalesce");
        let saver = Saver::new(&path, Duration::from_millis(50));

        let first = Settings::default().apply(SettingsAction::SetRentPerWeek("$100".parse()?));
        let second = first.apply(SettingsAction::SetRentPerWeek("$200".parse()?));
        saver.queue(&first).await?;
        saver.queue(&second).await?;

        task::sleep(Duration::from_millis(400)).await;
        let saved: Settings = fs::read_to_string(&path).await?.parse()?;
        assert_eq!(saved.rent_per_week.to_string(), "$200.00");

        fs::remove_file(&path).await?;
        Ok(())
    }

    #[async_std::test]
    async fn flush_writes_without_waiting() -> Result<()> {
        let path = scratch_path("flush");
        let saver = Saver::new(&path, Duration::from_secs(60));

        let settings = Settings::default().apply(SettingsAction::SetNickname("Max".into()));
        saver.queue(&settings).await?;
        saver.flush().await?;

        let saved: Settings = fs::read_to_string(&path).await?.parse()?;
        assert_eq!(saved.nickname, "Max");

        // nothing pending now, flushing again changes nothing
        saver.flush().await?;

        fs::remove_file(&path).await?;
        Ok(())
    }
}
