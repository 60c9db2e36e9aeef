//! Editing of `;`-separated PATH values entry by entry.

pub const SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathList {
    entries: Vec<String>,
    trailing_separator: bool,
}

impl PathList {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            return Self {
                entries: Vec::new(),
                trailing_separator: false,
            };
        }

        let (value, trailing_separator) = match value.strip_suffix(SEPARATOR) {
            Some(stripped) => (stripped, true),
            None => (value, false),
        };

        Self {
            entries: value.split(SEPARATOR).map(str::to_owned).collect(),
            trailing_separator,
        }
    }

    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        let wanted = normalize(entry);
        self.entries.iter().any(|e| normalize(e) == wanted)
    }

    /// Appends `entry` unless an equivalent entry is present. Returns whether
    /// the list changed.
    pub fn add(&mut self, entry: &str) -> bool {
        if self.contains(entry) {
            return false;
        }
        self.entries.push(entry.to_owned());
        true
    }

    /// Drops every entry equivalent to `entry`. Returns whether the list
    /// changed.
    pub fn remove(&mut self, entry: &str) -> bool {
        let wanted = normalize(entry);
        let before = self.entries.len();
        self.entries.retain(|e| normalize(e) != wanted);
        self.entries.len() != before
    }
}

impl std::fmt::Display for PathList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                write!(f, "{SEPARATOR}")?;
            }
            first = false;
            f.write_str(entry)?;
        }
        if self.trailing_separator && !self.entries.is_empty() {
            write!(f, "{SEPARATOR}")?;
        }
        Ok(())
    }
}

/// Comparison key: no quotes or surrounding blanks, no trailing separator,
/// case folded.
fn normalize(entry: &str) -> String {
    entry
        .trim()
        .trim_matches('"')
        .trim_end_matches(['\\', '/'])
        .to_lowercase()
}
