//! Access to the note files the aggregator reads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("notes folder not found: {0}")]
    FolderNotFound(String),
    #[error("note not found: {0}")]
    NotFound(String),
}

/// Handle to one note in a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteFile {
    /// File name without directory or `.md` extension.
    pub name: String,
    /// Store-relative, `/`-separated path.
    pub path: String,
}

impl NoteFile {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = path.rsplit('/').next().unwrap_or(&path);
        let name = file_name.strip_suffix(".md").unwrap_or(file_name).to_string();
        Self { name, path }
    }
}

fn is_markdown(path: &str) -> bool {
    Path::new(path).extension().is_some_and(|ext| ext == "md")
}

/// Read-only view over a collection of notes.
///
/// `Sync` because range queries read notes from several threads.
pub trait NoteStore: Sync {
    /// Markdown notes directly inside `folder`, or every note in the store when `folder` is `None`.
    fn list_candidate_files(&self, folder: Option<&str>) -> Result<Vec<NoteFile>, StoreError>;

    /// The note at exactly `path`, if one exists.
    fn find(&self, path: &str) -> Option<NoteFile>;

    fn read_text(&self, file: &NoteFile) -> Result<String, StoreError>;
}

/// Notes stored as `.md` files under a root directory.
#[derive(Debug, Clone)]
pub struct FsNoteStore {
    root: PathBuf,
}

impl FsNoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
    }

    /// Symlinked directories are never entered, so a link back up the tree cannot loop.
    fn visit_dir(&self, dir: &Path, recursive: bool, files: &mut Vec<NoteFile>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let hidden = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if hidden {
                continue;
            }

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if recursive {
                    // One unreadable subfolder must not hide the rest of the store.
                    if let Err(e) = self.visit_dir(&path, recursive, files) {
                        tracing::warn!(path = ?path, error = %e, "skipping unreadable folder");
                    }
                }
                continue;
            }

            let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
            if !is_file {
                continue;
            }
            if let Some(rel) = self.relative(&path).filter(|rel| is_markdown(rel)) {
                files.push(NoteFile::new(rel));
            }
        }
        Ok(())
    }
}

impl NoteStore for FsNoteStore {
    fn list_candidate_files(&self, folder: Option<&str>) -> Result<Vec<NoteFile>, StoreError> {
        let dir = folder.map_or_else(|| self.root.clone(), |folder| self.root.join(folder));
        if !dir.is_dir() {
            return Err(StoreError::FolderNotFound(dir.display().to_string()));
        }

        let mut files = Vec::new();
        self.visit_dir(&dir, folder.is_none(), &mut files)?;
        files.sort();
        tracing::debug!(dir = ?dir, count = files.len(), "listed note files");
        Ok(files)
    }

    fn find(&self, path: &str) -> Option<NoteFile> {
        self.root
            .join(path)
            .is_file()
            .then(|| NoteFile::new(path))
    }

    fn read_text(&self, file: &NoteFile) -> Result<String, StoreError> {
        let path = self.root.join(&file.path);
        fs::read_to_string(&path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(file.path.clone())
            } else {
                StoreError::Io(err)
            }
        })
    }
}

/// In-memory store for tests and embedding.
///
/// Listing returns notes in insertion order, duplicates included.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    notes: Vec<(String, Option<String>)>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_note(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.notes.push((path.into(), Some(content.into())));
        self
    }

    /// A note that lists and resolves but fails to read.
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<String>) -> Self {
        self.notes.push((path.into(), None));
        self
    }
}

impl NoteStore for MemoryNoteStore {
    fn list_candidate_files(&self, folder: Option<&str>) -> Result<Vec<NoteFile>, StoreError> {
        let in_folder = |path: &str| match folder {
            None => true,
            Some(folder) => path
                .strip_prefix(folder)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|rest| !rest.contains('/')),
        };

        let files: Vec<NoteFile> = self
            .notes
            .iter()
            .map(|(path, _)| path.as_str())
            .filter(|path| is_markdown(path) && in_folder(path))
            .map(NoteFile::new)
            .collect();

        if files.is_empty() {
            if let Some(folder) = folder {
                let prefix = format!("{folder}/");
                if !self.notes.iter().any(|(path, _)| path.starts_with(&prefix)) {
                    return Err(StoreError::FolderNotFound(folder.to_string()));
                }
            }
        }
        Ok(files)
    }

    fn find(&self, path: &str) -> Option<NoteFile> {
        self.notes
            .iter()
            .any(|(candidate, _)| candidate == path)
            .then(|| NoteFile::new(path))
    }

    fn read_text(&self, file: &NoteFile) -> Result<String, StoreError> {
        match self.notes.iter().find(|(path, _)| *path == file.path) {
            Some((_, Some(content))) => Ok(content.clone()),
            Some((path, None)) => Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{path} is unreadable"),
            ))),
            None => Err(StoreError::NotFound(file.path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn paths(files: &[NoteFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn note_file_name_is_the_stem() {
        let file = NoteFile::new("Daily/2024-03-07 Thursday.md");
        assert_eq!(file.name, "2024-03-07 Thursday");
        assert_eq!(file.path, "Daily/2024-03-07 Thursday.md");
        assert_eq!(NoteFile::new("2024-03-07.md").name, "2024-03-07");
    }

    #[test]
    fn fs_store_lists_recursively_without_folder() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2024-03-01.md", "a");
        write(tmp.path(), "Daily/2024-03-02.md", "b");
        write(tmp.path(), "Daily/notes.txt", "c");
        write(tmp.path(), ".trash/2024-03-03.md", "d");
        write(tmp.path(), ".hidden.md", "e");

        let store = FsNoteStore::new(tmp.path());
        let files = store.list_candidate_files(None).unwrap();
        assert_eq!(paths(&files), ["2024-03-01.md", "Daily/2024-03-02.md"]);
    }

    #[test]
    fn fs_store_lists_only_direct_children_of_folder() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2024-03-01.md", "a");
        write(tmp.path(), "Daily/2024-03-02.md", "b");
        write(tmp.path(), "Daily/Archive/2024-02-01.md", "c");

        let store = FsNoteStore::new(tmp.path());
        let files = store.list_candidate_files(Some("Daily")).unwrap();
        assert_eq!(paths(&files), ["Daily/2024-03-02.md"]);
    }

    #[test]
    fn fs_store_missing_folder_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = FsNoteStore::new(tmp.path());
        let err = store.list_candidate_files(Some("Nope")).unwrap_err();
        assert!(matches!(err, StoreError::FolderNotFound(_)));
    }

    #[test]
    fn fs_store_find_and_read() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Daily/2024-03-02.md", "hello");
        let store = FsNoteStore::new(tmp.path());

        let file = store.find("Daily/2024-03-02.md").unwrap();
        assert_eq!(store.read_text(&file).unwrap(), "hello");
        assert!(store.find("Daily/2024-03-03.md").is_none());

        let gone = NoteFile::new("Daily/2024-03-03.md");
        assert!(matches!(store.read_text(&gone), Err(StoreError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn fs_store_does_not_follow_symlinked_folders() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2024-03-04.md", "a");
        fs::create_dir_all(tmp.path().join("Archive")).unwrap();
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("Archive/back")).unwrap();

        let store = FsNoteStore::new(tmp.path());
        let files = store.list_candidate_files(None).unwrap();
        assert_eq!(paths(&files), ["2024-03-04.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn fs_store_lists_symlinked_notes() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Archive/2024-03-04.md", "a");
        std::os::unix::fs::symlink(
            tmp.path().join("Archive/2024-03-04.md"),
            tmp.path().join("2024-03-05.md"),
        )
        .unwrap();

        let store = FsNoteStore::new(tmp.path());
        let files = store.list_candidate_files(None).unwrap();
        assert_eq!(paths(&files), ["2024-03-05.md", "Archive/2024-03-04.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn fs_store_skips_unreadable_subfolder() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2024-03-04.md", "a");
        write(tmp.path(), "Locked/2024-03-05.md", "b");
        write(tmp.path(), "Open/2024-03-06.md", "c");
        let locked = tmp.path().join("Locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still read the folder; nothing to check then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let store = FsNoteStore::new(tmp.path());
        let result = store.list_candidate_files(None);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(paths(&result.unwrap()), ["2024-03-04.md", "Open/2024-03-06.md"]);
    }

    #[test]
    fn memory_store_keeps_duplicates_and_filters_folder() {
        let store = MemoryNoteStore::new()
            .with_note("Daily/2024-03-01.md", "a")
            .with_note("Daily/2024-03-01.md", "a")
            .with_note("Daily/Old/2024-01-01.md", "b")
            .with_note("2024-03-02.md", "c");

        let daily = store.list_candidate_files(Some("Daily")).unwrap();
        assert_eq!(paths(&daily), ["Daily/2024-03-01.md", "Daily/2024-03-01.md"]);
        assert_eq!(store.list_candidate_files(None).unwrap().len(), 4);
        assert!(matches!(
            store.list_candidate_files(Some("Missing")),
            Err(StoreError::FolderNotFound(_))
        ));
    }

    #[test]
    fn memory_store_unreadable_note() {
        let store = MemoryNoteStore::new().with_unreadable("2024-03-01.md");
        let file = store.find("2024-03-01.md").unwrap();
        assert!(matches!(store.read_text(&file), Err(StoreError::Io(_))));
    }
}
