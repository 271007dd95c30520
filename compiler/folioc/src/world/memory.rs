use folio_eval::value::{Bytes, Datetime};
use folio_eval::{FileError, FileResult, Library, World};
use folio_ir::{FileId, PackageSpec, Source, VirtualPath};
use rustc_hash::FxHashMap;

use super::{system_today, MAIN};

/// A world whose files, packages and date are all held in memory.
///
/// ```text
/// let world = MemoryWorld::new("#import \"util.fol\": greet\n#greet()")
///     .with_file("/util.fol", "#let greet() = [Hello]");
/// ```
pub struct MemoryWorld {
    library: Library,
    main: FileId,
    files: FxHashMap<FileId, Bytes>,
    today: Option<Datetime>,
}

impl MemoryWorld {
    /// A world whose main file `/main.fol` holds `text`.
    pub fn new(text: &str) -> Self {
        let main = FileId::new(None, VirtualPath::new(MAIN));
        let mut files = FxHashMap::default();
        files.insert(main, Bytes::from(text.as_bytes()));
        MemoryWorld {
            library: folio_library::library(),
            main,
            files,
            today: None,
        }
    }

    /// Add or replace a project file.
    #[must_use]
    pub fn with_file(mut self, path: &str, data: impl AsRef<[u8]>) -> Self {
        self.insert(path, data);
        self
    }

    /// Add a file to a package; a package exists once it has a file.
    #[must_use]
    pub fn with_package_file(mut self, spec: &PackageSpec, path: &str, data: impl AsRef<[u8]>) -> Self {
        let id = FileId::new(Some(spec.clone()), VirtualPath::new(path));
        self.files.insert(id, Bytes::from(data.as_ref()));
        self
    }

    /// Fix the date `datetime.today()` reports.
    #[must_use]
    pub fn with_today(mut self, today: Datetime) -> Self {
        self.today = Some(today);
        self
    }

    /// Add or replace a project file in place.
    pub fn insert(&mut self, path: &str, data: impl AsRef<[u8]>) {
        let id = FileId::new(None, VirtualPath::new(path));
        self.files.insert(id, Bytes::from(data.as_ref()));
    }

    fn get(&self, id: FileId) -> FileResult<&Bytes> {
        self.files
            .get(&id)
            .ok_or_else(|| FileError::NotFound(format!("{id:?}")))
    }
}

impl World for MemoryWorld {
    fn library(&self) -> &Library {
        &self.library
    }

    fn main(&self) -> FileId {
        self.main
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        let text = std::str::from_utf8(self.get(id)?).map_err(|_| FileError::InvalidUtf8)?;
        Ok(folio_parse::parse(text, id))
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.get(id).cloned()
    }

    fn today(&self, offset_days: Option<i32>) -> Option<Datetime> {
        match self.today {
            Some(day) => day.shift_days(offset_days.unwrap_or(0)),
            None => system_today(offset_days),
        }
    }

    fn resolve_package(&self, spec: &PackageSpec) -> FileResult<FileId> {
        if self.files.keys().any(|id| id.package() == Some(spec)) {
            Ok(FileId::new(Some(spec.clone()), VirtualPath::new("/")))
        } else {
            Err(FileError::PackageNotFound(spec.to_string()))
        }
    }
}
