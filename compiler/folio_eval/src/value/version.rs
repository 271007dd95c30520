//! Version numbers.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

/// A version with any number of components: `version(1, 2, 3)`.
///
/// Missing trailing components count as zero, so `1.2 == 1.2.0`.
#[derive(Clone, Debug)]
pub struct Version(SmallVec<[u32; 3]>);

impl Version {
    pub fn new(components: impl IntoIterator<Item = u32>) -> Self {
        Version(components.into_iter().collect())
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// The component at `index`, zero when absent.
    pub fn at(&self, index: usize) -> u32 {
        self.0.get(index).copied().unwrap_or(0)
    }

    fn trimmed(&self) -> &[u32] {
        let len = self.0.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);
        &self.0[..len]
    }

    pub fn repr(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        format!("version({})", parts.join(", "))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.trimmed() == other.trimmed()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trimmed().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| self.at(i).cmp(&other.at(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))
    }
}
