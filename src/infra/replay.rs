use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description};

use crate::infra::Command;

/// Text log of every turn's commands, one line per turn.
pub struct ReplayFile {
    path: PathBuf,
    file: File,
}

impl ReplayFile {
    pub fn new(replays_folder: &str, seed: u64) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let format = format_description::parse("[year][month][day]-[hour][minute][second]")
            .map_err(io::Error::other)?;
        let date_time_str = now.format(&format).map_err(io::Error::other)?;

        let path = Path::new(replays_folder).join(format!("minebot - {} - {}.log", date_time_str, seed));

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        Ok(ReplayFile { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, turn: u32, actions: &[Command]) -> io::Result<()> {
        let line = actions
            .iter()
            .map(|action| action.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        writeln!(self.file, "{}: {}", turn, line)?;
        self.file.flush()
    }
}
