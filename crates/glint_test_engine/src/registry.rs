//! Registry of named scripted tests

use crate::error::{Result, TestEngineError};
use crate::step::Step;
use indexmap::IndexMap;
use std::fmt;

/// Unique `(category, name)` pair
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestId {
    pub category: String,
    pub name: String,
}

impl TestId {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// A registered test; immutable once registered
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedTest {
    id: TestId,
    steps: Vec<Step>,
}

impl ScriptedTest {
    pub fn id(&self) -> &TestId {
        &self.id
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Tests in registration order
#[derive(Debug, Default)]
pub struct TestRegistry {
    tests: IndexMap<TestId, ScriptedTest>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: TestId, steps: Vec<Step>) -> Result<&ScriptedTest> {
        if self.tests.contains_key(&id) {
            return Err(TestEngineError::DuplicateTest(id));
        }
        let entry = self.tests.entry(id.clone()).or_insert(ScriptedTest { id, steps });
        Ok(&*entry)
    }

    pub fn get(&self, id: &TestId) -> Option<&ScriptedTest> {
        self.tests.get(id)
    }

    pub fn contains(&self, id: &TestId) -> bool {
        self.tests.contains_key(id)
    }

    /// Ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &TestId> {
        self.tests.keys()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = TestRegistry::new();
        registry
            .register(TestId::new("demo", "a"), vec![Step::Yield(1)])
            .unwrap();
        let err = registry
            .register(TestId::new("demo", "a"), vec![])
            .unwrap_err();
        assert_eq!(err, TestEngineError::DuplicateTest(TestId::new("demo", "a")));
        assert_eq!(registry.get(&TestId::new("demo", "a")).unwrap().steps().len(), 1);
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = TestRegistry::new();
        for name in ["c", "a", "b"] {
            registry.register(TestId::new("demo", name), vec![]).unwrap();
        }
        let names: Vec<_> = registry.ids().map(|id| id.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(TestId::new("demo", "c").to_string(), "demo/c");
    }
}
