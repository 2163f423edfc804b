//! Shader registry with versioning
//!
//! Maps program names to validated, reflected programs. Programs are cheap
//! to clone and stay valid after the registry entry is replaced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::reflect::ShaderReflection;

/// Unique shader identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(u64);

impl ShaderId {
    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Shader version, bumped when a name is re-registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderVersion(u32);

impl ShaderVersion {
    /// Initial version
    pub const INITIAL: Self = Self(1);

    /// Get the raw version number
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Get the next version
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for ShaderVersion {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// A resolved shader program
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    id: ShaderId,
    name: Arc<str>,
    version: ShaderVersion,
    reflection: Arc<ShaderReflection>,
}

impl ShaderProgram {
    /// Build a program handle
    pub fn new(id: ShaderId, name: &str, version: ShaderVersion, reflection: ShaderReflection) -> Self {
        Self {
            id,
            name: Arc::from(name),
            version,
            reflection: Arc::new(reflection),
        }
    }

    /// Program ID
    pub fn id(&self) -> ShaderId {
        self.id
    }

    /// Program name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program version
    pub fn version(&self) -> ShaderVersion {
        self.version
    }

    /// Reflection data
    pub fn reflection(&self) -> &ShaderReflection {
        &self.reflection
    }

    /// Number of draw passes
    pub fn pass_count(&self) -> usize {
        self.reflection.pass_count()
    }
}

/// Shader registry keyed by name
pub struct ShaderRegistry {
    /// Next ID counter
    next_id: AtomicU64,
    /// Programs by name
    programs: RwLock<HashMap<String, ShaderProgram>>,
}

impl ShaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            programs: RwLock::new(HashMap::new()),
        }
    }

    /// Register a program, replacing any program with the same name.
    ///
    /// A replacement keeps the old ID and bumps the version.
    pub fn register(&self, name: &str, reflection: ShaderReflection) -> ShaderProgram {
        let mut programs = self.programs.write();

        let (id, version) = match programs.get(name) {
            Some(existing) => (existing.id(), existing.version().next()),
            None => (
                ShaderId(self.next_id.fetch_add(1, Ordering::Relaxed)),
                ShaderVersion::INITIAL,
            ),
        };

        let program = ShaderProgram::new(id, name, version, reflection);
        programs.insert(name.to_string(), program.clone());
        program
    }

    /// Get a program by name
    pub fn get(&self, name: &str) -> Option<ShaderProgram> {
        self.programs.read().get(name).cloned()
    }

    /// Remove a program by name
    pub fn remove(&self, name: &str) -> Option<ShaderProgram> {
        self.programs.write().remove(name)
    }

    /// Check if a program exists
    pub fn contains(&self, name: &str) -> bool {
        self.programs.read().contains_key(name)
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.programs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered programs
    pub fn count(&self) -> usize {
        self.programs.read().len()
    }
}

impl Default for ShaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let registry = ShaderRegistry::new();
        let program = registry.register("test_shader", ShaderReflection::default());

        assert!(registry.contains("test_shader"));
        let retrieved = registry.get("test_shader").unwrap();
        assert_eq!(retrieved.id(), program.id());
        assert_eq!(retrieved.name(), "test_shader");
        assert_eq!(retrieved.version(), ShaderVersion::INITIAL);
    }

    #[test]
    fn test_replace_bumps_version() {
        let registry = ShaderRegistry::new();
        let first = registry.register("replaced", ShaderReflection::default());
        let second = registry.register("replaced", ShaderReflection::default());

        assert_eq!(first.id(), second.id());
        assert_eq!(second.version().raw(), 2);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_distinct_ids() {
        let registry = ShaderRegistry::new();
        let a = registry.register("a", ShaderReflection::default());
        let b = registry.register("b", ShaderReflection::default());
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_remove() {
        let registry = ShaderRegistry::new();
        registry.register("removable", ShaderReflection::default());

        let removed = registry.remove("removable").unwrap();
        assert_eq!(removed.name(), "removable");
        assert!(!registry.contains("removable"));
        assert!(registry.get("removable").is_none());
    }
}
