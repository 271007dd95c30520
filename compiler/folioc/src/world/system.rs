use std::io;
use std::path::{Path, PathBuf};

use folio_eval::value::{Bytes, Datetime};
use folio_eval::{FileError, FileResult, Library, World};
use folio_ir::{FileId, PackageSpec, Source, VirtualPath};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::system_today;

/// A world reading a project directory from disk.
///
/// Project files resolve against `root`. Packages live in a local store laid
/// out as `<store>/<namespace>/<name>/<version>/`. Parsed sources are cached
/// for the lifetime of the world.
pub struct SystemWorld {
    root: PathBuf,
    main: FileId,
    library: Library,
    packages: Option<PathBuf>,
    sources: Mutex<FxHashMap<FileId, Source>>,
}

impl SystemWorld {
    /// A world rooted at `root` whose main file is `main`, relative to it.
    pub fn new(root: impl Into<PathBuf>, main: &str) -> Self {
        SystemWorld {
            root: root.into(),
            main: FileId::new(None, VirtualPath::new(main)),
            library: folio_library::library(),
            packages: None,
            sources: Mutex::new(FxHashMap::default()),
        }
    }

    /// A world for a single file: its directory becomes the root.
    pub fn for_file(path: &Path) -> Self {
        let root = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let main = path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
        SystemWorld::new(root, &main)
    }

    /// Use a local package store.
    #[must_use]
    pub fn with_package_store(mut self, store: impl Into<PathBuf>) -> Self {
        self.packages = Some(store.into());
        self
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, spec: &PackageSpec) -> FileResult<PathBuf> {
        let store = self
            .packages
            .as_ref()
            .ok_or_else(|| FileError::PackageNotFound(spec.to_string()))?;
        Ok(store
            .join(&spec.namespace)
            .join(&spec.name)
            .join(spec.version.to_string()))
    }

    /// The location of a file on disk.
    fn path(&self, id: FileId) -> FileResult<PathBuf> {
        let base = match id.package() {
            Some(spec) => self.package_dir(spec)?,
            None => self.root.clone(),
        };
        Ok(base.join(id.vpath().as_rootless_str()))
    }

    fn read(&self, id: FileId) -> FileResult<Vec<u8>> {
        let path = self.path(id)?;
        tracing::trace!(path = %path.display(), "reading file");
        std::fs::read(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path.display().to_string()),
            _ => FileError::Other(format!("failed to read {}: {err}", path.display())),
        })
    }
}

impl World for SystemWorld {
    fn library(&self) -> &Library {
        &self.library
    }

    fn main(&self) -> FileId {
        self.main
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if let Some(source) = self.sources.lock().get(&id) {
            return Ok(source.clone());
        }
        let data = self.read(id)?;
        let text = String::from_utf8(data).map_err(|_| FileError::InvalidUtf8)?;
        let source = folio_parse::parse(&text, id);
        self.sources.lock().insert(id, source.clone());
        Ok(source)
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.read(id).map(Bytes::from)
    }

    fn today(&self, offset_days: Option<i32>) -> Option<Datetime> {
        system_today(offset_days)
    }

    fn resolve_package(&self, spec: &PackageSpec) -> FileResult<FileId> {
        let dir = self.package_dir(spec)?;
        if dir.is_dir() {
            Ok(FileId::new(Some(spec.clone()), VirtualPath::new("/")))
        } else {
            Err(FileError::PackageNotFound(spec.to_string()))
        }
    }
}
