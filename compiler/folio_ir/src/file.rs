//! File identities.
//!
//! A file is either a path inside the project (anchored at the project
//! root) or a path inside a package. Both forms are interned into a global
//! table and referred to by a compact [`FileId`].

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Interned identity of a file.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FileId(NonZeroU16);

type FileKey = (Option<PackageSpec>, VirtualPath);

struct FileTable {
    to_id: FxHashMap<FileKey, FileId>,
    from_id: Vec<&'static FileKey>,
}

fn table() -> &'static RwLock<FileTable> {
    static TABLE: OnceLock<RwLock<FileTable>> = OnceLock::new();
    TABLE.get_or_init(|| {
        RwLock::new(FileTable {
            to_id: FxHashMap::default(),
            from_id: Vec::new(),
        })
    })
}

impl FileId {
    /// Intern a file identity.
    ///
    /// # Panics
    /// Panics if more than `u16::MAX - 1` distinct files are interned.
    pub fn new(package: Option<PackageSpec>, path: VirtualPath) -> Self {
        let key = (package, path);
        if let Some(&id) = table().read().to_id.get(&key) {
            return id;
        }

        let mut guard = table().write();
        if let Some(&id) = guard.to_id.get(&key) {
            return id;
        }

        let raw = u16::try_from(guard.from_id.len() + 1)
            .ok()
            .and_then(NonZeroU16::new)
            .unwrap_or_else(|| panic!("file table exceeded {} entries", u16::MAX));
        let id = FileId(raw);
        let leaked: &'static FileKey = Box::leak(Box::new(key.clone()));
        guard.from_id.push(leaked);
        guard.to_id.insert(key, id);
        id
    }

    fn key(self) -> &'static FileKey {
        table().read().from_id[usize::from(self.0.get()) - 1]
    }

    /// The package the file belongs to, if any.
    pub fn package(self) -> Option<&'static PackageSpec> {
        self.key().0.as_ref()
    }

    /// The path of the file inside its project or package.
    pub fn vpath(self) -> &'static VirtualPath {
        &self.key().1
    }

    /// Resolve `path` relative to this file, staying in the same package.
    ///
    /// Paths starting with `/` are resolved against the root.
    #[must_use]
    pub fn join(self, path: &str) -> FileId {
        let package = self.package().cloned();
        FileId::new(package, self.vpath().join(path))
    }

    /// Raw numeric id, stable for the process lifetime.
    pub fn raw(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.package() {
            Some(package) => write!(f, "{package}{:?}", self.vpath()),
            None => write!(f, "{:?}", self.vpath()),
        }
    }
}

/// A normalized, root-anchored path inside a project or package.
///
/// Stored without the leading slash; components are separated by `/` and
/// never contain `.` or `..`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct VirtualPath(String);

impl VirtualPath {
    /// Create a path, normalizing `.` and `..` components.
    pub fn new(path: &str) -> Self {
        let mut parts: Vec<&str> = Vec::new();
        Self::push_components(&mut parts, path);
        VirtualPath(parts.join("/"))
    }

    fn push_components<'a>(parts: &mut Vec<&'a str>, path: &'a str) {
        for component in path.split(['/', '\\']) {
            match component {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }
    }

    /// Resolve `path` against the directory containing this path.
    #[must_use]
    pub fn join(&self, path: &str) -> VirtualPath {
        let mut parts: Vec<&str> = Vec::new();
        if !path.starts_with('/') {
            parts.extend(self.0.split('/').filter(|c| !c.is_empty()));
            parts.pop();
        }
        Self::push_components(&mut parts, path);
        VirtualPath(parts.join("/"))
    }

    /// The path without its leading slash.
    pub fn as_rootless_str(&self) -> &str {
        &self.0
    }

    /// The final component.
    pub fn file_name(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// The final component without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_name()
            .map(|name| name.rsplit_once('.').map_or(name, |(stem, _)| stem))
            .filter(|s| !s.is_empty())
    }
}

impl fmt::Debug for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// A package identified by `@namespace/name:major.minor.patch`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct PackageSpec {
    pub namespace: String,
    pub name: String,
    pub version: PackageVersion,
}

impl FromStr for PackageSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('@')
            .ok_or_else(|| "package specification must start with '@'".to_string())?;
        let (namespace, rest) = rest
            .split_once('/')
            .ok_or_else(|| "package specification is missing name".to_string())?;
        let (name, version) = rest
            .split_once(':')
            .ok_or_else(|| "package specification is missing version".to_string())?;
        if namespace.is_empty() {
            return Err("package specification is missing namespace".into());
        }
        if !is_ident(name) {
            return Err(format!("`{name}` is not a valid package name"));
        }
        Ok(PackageSpec {
            namespace: namespace.into(),
            name: name.into(),
            version: version.parse()?,
        })
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}/{}:{}", self.namespace, self.name, self.version)
    }
}

/// A semantic package version.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct PackageVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FromStr for PackageVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut next = |kind: &str| {
            let part = parts
                .next()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| format!("version number is missing {kind} version"))?;
            part.parse::<u32>()
                .map_err(|_| format!("`{part}` is not a valid {kind} version"))
        };
        let major = next("major")?;
        let minor = next("minor")?;
        let patch = next("patch")?;
        if parts.next().is_some() {
            return Err("version number has unexpected fourth component".into());
        }
        Ok(PackageVersion {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Whether a string is a valid identifier (`[A-Za-z_][A-Za-z0-9_-]*`, Unicode aware).
pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_id_start) && chars.all(is_id_continue)
}

/// Whether a character can start an identifier.
pub fn is_id_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Whether a character can continue an identifier.
pub fn is_id_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
