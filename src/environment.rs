use anyhow::Result;
use std::collections::HashMap;

/// Name of the PATH variable in the user's persisted environment.
pub const USER_PATH: &str = "Path";

/// Access to environment variables, both the current process's and the
/// user's persisted ones.
pub trait EnvStore {
    /// Reads a variable of the current process. Empty values count as unset.
    fn process_var(&self, name: &str) -> Option<String>;

    /// Reads a variable from the user's persisted environment.
    ///
    /// # Errors
    ///
    /// Fails when the persisted environment cannot be read.
    fn user_var(&self, name: &str) -> Result<Option<String>>;

    /// Stores (`Some`) or deletes (`None`) a variable in the user's persisted
    /// environment.
    ///
    /// # Errors
    ///
    /// Fails when the persisted environment cannot be written.
    fn set_user_var(&mut self, name: &str, value: Option<&str>) -> Result<()>;
}

impl<E: EnvStore + ?Sized> EnvStore for &mut E {
    fn process_var(&self, name: &str) -> Option<String> {
        (**self).process_var(name)
    }

    fn user_var(&self, name: &str) -> Result<Option<String>> {
        (**self).user_var(name)
    }

    fn set_user_var(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        (**self).set_user_var(name, value)
    }
}

/// Environment kept entirely in memory. User variable names are matched
/// case-insensitively, as the Windows registry does.
#[derive(Debug, Default, Clone)]
pub struct MemoryEnv {
    process: HashMap<String, String>,
    user: HashMap<String, String>,
    writes: usize,
}

impl MemoryEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_process_var(mut self, name: &str, value: &str) -> Self {
        self.process.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn with_user_var(mut self, name: &str, value: &str) -> Self {
        self.user.insert(name.to_lowercase(), value.to_owned());
        self
    }

    /// Number of `set_user_var` calls made so far.
    #[must_use]
    pub fn user_writes(&self) -> usize {
        self.writes
    }
}

impl EnvStore for MemoryEnv {
    fn process_var(&self, name: &str) -> Option<String> {
        self.process.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn user_var(&self, name: &str) -> Result<Option<String>> {
        Ok(self.user.get(&name.to_lowercase()).cloned())
    }

    fn set_user_var(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.writes += 1;
        let key = name.to_lowercase();
        match value {
            Some(value) => {
                self.user.insert(key, value.to_owned());
            }
            None => {
                self.user.remove(&key);
            }
        }
        Ok(())
    }
}

/// Process environment on targets without a persisted user environment.
#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct ProcessEnv;

#[cfg(not(windows))]
impl EnvStore for ProcessEnv {
    fn process_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }

    fn user_var(&self, name: &str) -> Result<Option<String>> {
        anyhow::bail!("user-scoped variable {name} is only available on Windows")
    }

    fn set_user_var(&mut self, name: &str, _: Option<&str>) -> Result<()> {
        anyhow::bail!("user-scoped variable {name} is only available on Windows")
    }
}
