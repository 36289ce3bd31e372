//! Registry mapping page format keys to handlers.
//!
//! New page formats are supported by registering a [`PageHandler`] under its
//! `format@version` key; the query engine looks handlers up by the key each
//! page declares and never needs to know about individual formats.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::handler::{CollectionV1, PageHandler};
use crate::{Error, FormatKey, Page, Result};

/// Thread-safe `format@version` → handler map.
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<FormatKey, Arc<dyn PageHandler>>>,
}

impl HandlerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// A registry with the built-in `article-collection@1` handler.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut handlers: HashMap<FormatKey, Arc<dyn PageHandler>> = HashMap::new();
        handlers.insert(
            FormatKey::new(CollectionV1::FORMAT, CollectionV1::VERSION),
            Arc::new(CollectionV1),
        );
        Self {
            handlers: RwLock::new(handlers),
        }
    }

    /// Register `handler` for `format_version` (`"<format>@<version>"`).
    ///
    /// Fails with [`Error::Validation`] when the key is malformed. Replacing an
    /// existing registration succeeds but logs a warning.
    pub fn register(&self, format_version: &str, handler: Arc<dyn PageHandler>) -> Result<()> {
        let key: FormatKey = format_version.parse()?;

        let previous = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), handler);

        if previous.is_some() {
            warn!("Handler for {} is being overwritten", key);
        } else {
            debug!("Registered handler for {}", key);
        }
        Ok(())
    }

    /// Handler registered for `key`.
    pub fn get(&self, key: &FormatKey) -> Option<Arc<dyn PageHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Handler for the format a page declares.
    ///
    /// Fails with [`Error::UnsupportedFormat`] when none is registered.
    pub fn resolve(&self, page: &Page) -> Result<Arc<dyn PageHandler>> {
        let key = page.format_key();
        self.get(&key)
            .ok_or_else(|| Error::UnsupportedFormat(key.to_string()))
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<FormatKey> {
        let mut keys: Vec<FormatKey> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
