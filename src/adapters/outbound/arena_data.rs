use crate::common::{DomainError, DomainResult};
use crate::domains::view_planning::ports::ArenaSource;
use crate::domains::view_planning::types::Arena;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "VANTAGE_DATA_DIR";

/// Reads JSON arenas from `<base>/arenas/<name>`.
pub struct FilesystemArenaSource {
    base: PathBuf,
}

impl FilesystemArenaSource {
    /// Base directory: the argument, then `VANTAGE_DATA_DIR`, then `resources/vantage`
    /// if present, else the system share directory.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| {
            if let Ok(v) = env::var(DATA_DIR_ENV) {
                PathBuf::from(v)
            } else {
                let cwd_default = Path::new("resources/vantage");
                if cwd_default.exists() {
                    cwd_default.to_path_buf()
                } else {
                    PathBuf::from("/usr/share/gryphon-vantage")
                }
            }
        });
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn arena_dir(&self) -> PathBuf {
        self.base.join("arenas")
    }

    /// Writes `arena` as pretty JSON, creating the directory as needed.
    pub fn save_arena(&self, name: &str, arena: &Arena) -> DomainResult<()> {
        let dir = self.arena_dir();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        let path = dir.join(name);
        let json = serde_json::to_string_pretty(arena)?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))
    }
}

impl ArenaSource for FilesystemArenaSource {
    fn load_arena(&self, name: &str) -> DomainResult<Arena> {
        let path = self.arena_dir().join(name);
        let content = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn list_arenas(&self) -> DomainResult<Vec<String>> {
        let dir = self.arena_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| io_error(&dir, e))? {
            let entry = entry.map_err(|e| io_error(&dir, e))?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::InfrastructureError(format!("{}: {}", path.display(), e))
}
