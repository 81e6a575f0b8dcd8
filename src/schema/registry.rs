//! Process-wide schema cache
//!
//! - One schema per record type, built on first use
//! - A registered schema is never replaced
//! - Build failures are returned to the caller and not cached

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::{error, info};

use super::builder::{RecordSchema, SchemaBuilder};
use super::errors::SchemaResult;
use crate::bind::Bind;

type Entry = Arc<dyn Any + Send + Sync>;

/// Registry of built record schemas, keyed by record type
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<TypeId, Entry>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every decode in the process
    pub fn global() -> &'static SchemaRegistry {
        static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();
        GLOBAL.get_or_init(SchemaRegistry::new)
    }

    /// Returns the schema of `T`, building and registering it on first use.
    pub fn get_or_build<T: Bind>(&self) -> SchemaResult<Arc<RecordSchema<T>>> {
        let type_id = TypeId::of::<T>();

        if let Some(schema) = self.lookup::<T>(type_id) {
            return Ok(schema);
        }

        let mut builder = SchemaBuilder::<T>::new();
        T::describe(&mut builder);
        let built = match builder.build() {
            Ok(schema) => Arc::new(schema),
            Err(e) => {
                error!(record = std::any::type_name::<T>(), error = %e, "schema build failed");
                return Err(e);
            }
        };

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have registered first; keep the earlier schema.
        let entry = schemas
            .entry(type_id)
            .or_insert_with(|| {
                info!(
                    record = std::any::type_name::<T>(),
                    fields = built.len(),
                    "registered schema"
                );
                built.clone() as Entry
            })
            .clone();
        drop(schemas);

        Ok(entry.downcast::<RecordSchema<T>>().unwrap_or(built))
    }

    /// True if the schema of `T` has been built
    pub fn contains<T: 'static>(&self) -> bool {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<T: 'static>(&self, type_id: TypeId) -> Option<Arc<RecordSchema<T>>> {
        let schemas = self.schemas.read().unwrap_or_else(PoisonError::into_inner);
        schemas
            .get(&type_id)
            .cloned()
            .and_then(|entry| entry.downcast::<RecordSchema<T>>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    #[derive(Default)]
    struct Login {
        user: String,
        remember: bool,
    }

    impl Bind for Login {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.text("user", |r| &mut r.user).required();
            schema.bool("remember", |r| &mut r.remember).optional().default_value(false);
        }
    }

    #[derive(Default)]
    struct Broken {
        age: i64,
    }

    impl Bind for Broken {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.int("age", |r| &mut r.age).required().max("old");
        }
    }

    #[test]
    fn test_schema_built_once_and_shared() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());

        let first = registry.get_or_build::<Login>().unwrap();
        let second = registry.get_or_build::<Login>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.contains::<Login>());
        assert_eq!(registry.len(), 1);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_build_failure_not_cached() {
        let registry = SchemaRegistry::new();
        let err = registry.get_or_build::<Broken>().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidConstraintTag);
        assert_eq!(err.field(), Some("age"));
        assert!(!registry.contains::<Broken>());

        assert!(registry.get_or_build::<Broken>().is_err());
    }

    #[test]
    fn test_concurrent_first_use_yields_one_schema() {
        let registry = Arc::new(SchemaRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_or_build::<Login>().unwrap())
            })
            .collect();

        let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let registered = registry.get_or_build::<Login>().unwrap();
        for schema in &schemas {
            assert_eq!(schema.len(), registered.len());
        }
        assert_eq!(registry.len(), 1);
    }
}
