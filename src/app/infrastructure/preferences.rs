//! Hierarchical key-value preferences persisted as JSON.
//!
//! Nodes are addressed by `/`-separated paths (`"editor"`, `"app/recent"`).
//! Every typed getter takes the default returned when the key is absent or
//! holds a value of another type.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::error::AppError;

pub trait SettingsStore {
    fn get_value(&self, node: &str, key: &str) -> Option<Value>;

    fn put_value(&mut self, node: &str, key: &str, value: Value);

    fn get_string(&self, node: &str, key: &str, default: &str) -> String {
        match self.get_value(node, key) {
            Some(Value::String(s)) => s,
            _ => default.to_string(),
        }
    }

    fn get_int(&self, node: &str, key: &str, default: i64) -> i64 {
        self.get_value(node, key)
            .and_then(|v| v.as_i64())
            .unwrap_or(default)
    }

    fn get_bool(&self, node: &str, key: &str, default: bool) -> bool {
        self.get_value(node, key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn put_string(&mut self, node: &str, key: &str, value: &str) {
        self.put_value(node, key, Value::String(value.to_string()));
    }

    fn put_int(&mut self, node: &str, key: &str, value: i64) {
        self.put_value(node, key, Value::from(value));
    }

    fn put_bool(&mut self, node: &str, key: &str, value: bool) {
        self.put_value(node, key, Value::Bool(value));
    }
}

#[derive(Debug, Clone, Default)]
pub struct Preferences {
    path: Option<PathBuf>,
    root: Map<String, Value>,
}

impl Preferences {
    /// Preferences that are never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load preferences for `app_name` from the platform config directory,
    /// or start empty if none exist yet.
    pub fn load_for_app(app_name: &str) -> Self {
        Self::load_from(Self::get_config_path(app_name))
    }

    pub fn load_from(path: PathBuf) -> Self {
        let root = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(root) => root,
                Err(e) => {
                    tracing::warn!("Failed to parse preferences {}: {}. Using defaults.", path.display(), e);
                    Map::new()
                }
            },
            // not written yet
            Err(_) => Map::new(),
        };
        Self {
            path: Some(path),
            root,
        }
    }

    /// Write preferences to disk. In-memory preferences ignore this.
    pub fn save(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.root)?;
        fs::write(path, json)?;
        tracing::debug!("preferences written to {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path(app_name: &str) -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("webpad");
        path.push(format!("{}.json", app_name));
        path
    }

    fn segments(node: &str) -> impl Iterator<Item = &str> {
        node.split('/').filter(|s| !s.is_empty())
    }

    fn node(&self, node: &str) -> Option<&Map<String, Value>> {
        let mut current = &self.root;
        for segment in Self::segments(node) {
            current = current.get(segment)?.as_object()?;
        }
        Some(current)
    }

    fn node_mut(&mut self, node: &str) -> &mut Map<String, Value> {
        let mut current = &mut self.root;
        for segment in Self::segments(node) {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                // a leaf stood where a node is now wanted
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => unreachable!("entry was just made an object"),
            };
        }
        current
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.node(node).is_some()
    }
}

impl SettingsStore for Preferences {
    fn get_value(&self, node: &str, key: &str) -> Option<Value> {
        self.node(node)?.get(key).cloned()
    }

    fn put_value(&mut self, node: &str, key: &str, value: Value) {
        self.node_mut(node).insert(key.to_string(), value);
    }
}
