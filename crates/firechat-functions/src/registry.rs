use std::collections::HashMap;
use std::sync::Arc;

use crate::function::{Function, FunctionError, FunctionValue, ResultKind};

/// Registry mapping function names to implementations and declared result
/// kinds.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn register<F: Function + 'static>(&mut self, function: F) {
        self.functions
            .insert(function.name().to_string(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Function>> {
        self.functions.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Declared result kind for a function, if registered.
    pub fn result_kind(&self, name: &str) -> Option<ResultKind> {
        self.functions.get(name).map(|function| function.result_kind())
    }

    /// All function specs, sorted by name for stable prompts.
    pub fn specs(&self) -> Vec<serde_json::Value> {
        let mut entries: Vec<_> = self.functions.iter().collect();
        entries.sort_by_key(|(name, _)| name.as_str());
        entries
            .into_iter()
            .map(|(_, function)| function.spec())
            .collect()
    }

    /// Invoke a function by name.
    pub async fn call(&self, name: &str, args: &str) -> Result<FunctionValue, FunctionError> {
        match self.get(name) {
            Some(function) => function.call(args).await,
            None => Err(FunctionError::Unknown(name.to_string())),
        }
    }
}
