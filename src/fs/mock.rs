use super::{FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const MAX_LINK_DEPTH: usize = 8;

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<String>,
    pub file_type: FileType,
    pub link_target: Option<PathBuf>,
}

impl MockEntry {
    fn dir() -> Self {
        Self {
            content: None,
            file_type: FileType::Directory,
            link_target: None,
        }
    }

    fn file(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            file_type: FileType::File,
            link_target: None,
        }
    }
}

pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(path, MockEntry::file(content));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();
        Self::ensure_parents(&mut files, &path);
    }

    /// Returns the target of a symlink created through [`FileSystem::symlink`].
    pub fn link_target(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let path = self.normalize_path(path.as_ref());
        self.files
            .read()
            .unwrap()
            .get(&path)
            .and_then(|e| e.link_target.clone())
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert_with(MockEntry::dir);
        }
    }

    /// Follows symlinks until a non-link entry is reached.
    fn resolve(&self, path: &Path) -> Option<MockEntry> {
        let files = self.files.read().unwrap();
        let mut current = self.normalize_path(path);

        for _ in 0..MAX_LINK_DEPTH {
            let entry = files.get(&current)?;
            match &entry.link_target {
                Some(target) => current = self.normalize_path(target),
                None => return Some(entry.clone()),
            }
        }

        None
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_some()
    }

    fn entry_exists(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.files.read().unwrap().contains_key(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path)
            .map(|e| e.file_type == FileType::Directory)
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path)
            .map(|e| e.file_type == FileType::File)
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entry = self
            .resolve(path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        entry.content.ok_or_else(|| anyhow!("Not a file: {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap();

        if let Some(entry) = files.get(&path) {
            if entry.file_type != FileType::Directory {
                return Err(anyhow!("Not a directory: {:?}", path));
            }
        }

        Self::ensure_parents(&mut files, &path);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap();

        let parent_is_dir = path
            .parent()
            .and_then(|p| files.get(p))
            .map(|e| e.file_type == FileType::Directory)
            .unwrap_or(false);
        if !parent_is_dir {
            return Err(anyhow!("Parent directory missing for {:?}", path));
        }

        files.insert(path, MockEntry::file(contents));
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        let link = self.normalize_path(link);
        let mut files = self.files.write().unwrap();

        if files.contains_key(&link) {
            return Err(anyhow!("File exists: {:?}", link));
        }

        files.insert(
            link,
            MockEntry {
                content: None,
                file_type: FileType::Symlink,
                link_target: Some(target.to_path_buf()),
            },
        );
        Ok(())
    }
}
