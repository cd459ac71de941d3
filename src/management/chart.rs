use std::path::PathBuf;

use super::StoreError;

/// Per-date song lists, one title per line in rank order.
#[derive(Debug, Clone)]
pub struct ChartCache {
    dir: PathBuf,
}

impl ChartCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{date}_top_100_songs.txt"))
    }

    /// Returns the cached titles, or `None` when the date was never scraped.
    pub async fn load(&self, date: &str) -> Result<Option<Vec<String>>, StoreError> {
        let content = match async_fs::read_to_string(self.path_for(date)).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::IoError(e)),
        };

        Ok(Some(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }

    pub async fn save(&self, date: &str, titles: &[String]) -> Result<(), StoreError> {
        async_fs::create_dir_all(&self.dir).await?;

        let mut content = titles.join("\n");
        content.push('\n');
        async_fs::write(self.path_for(date), content).await?;
        Ok(())
    }
}
