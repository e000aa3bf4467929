use crate::error::Result;
use crate::services::sources::TrackSink;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Line-oriented `.txt` files in one output directory.
#[derive(Debug, Clone)]
pub struct TextArtifacts {
    dir: PathBuf,
}

impl TextArtifacts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for an artifact name; path separators in the name are replaced.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file_name: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                c => c,
            })
            .collect();
        self.dir.join(format!("{}.txt", file_name))
    }
}

#[async_trait]
impl TrackSink for TextArtifacts {
    async fn append_lines(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(name);

        let mut buffer = String::new();
        for line in lines {
            buffer.push_str(line);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!("Wrote {} lines to {}", lines.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("plexmix-{}-{}-{}", tag, std::process::id(), nanos))
    }

    #[test]
    fn test_separators_stay_inside_dir() {
        let artifacts = TextArtifacts::new("/out");
        assert_eq!(
            artifacts.path_for("AC/DC-Radio"),
            PathBuf::from("/out/AC_DC-Radio.txt")
        );
    }

    #[tokio::test]
    async fn test_creates_then_appends() {
        let dir = scratch_dir("append");
        let artifacts = TextArtifacts::new(dir.clone());

        let first = artifacts
            .append_lines("Seed-SimArtistsTracks", &["A - One".to_string()])
            .await
            .unwrap();
        let second = artifacts
            .append_lines(
                "Seed-SimArtistsTracks",
                &["B - Two".to_string(), "B - Three".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(first, second);

        let contents = fs::read_to_string(&first).await.unwrap();
        assert_eq!(contents, "A - One\nB - Two\nB - Three\n");

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
