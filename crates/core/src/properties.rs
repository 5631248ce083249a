//! `key=value` property files
//!
//! Only the settings directory and each project directory contribute
//! properties; parent directories outside the build are never consulted.

use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(content: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = match line.find(['=', ':']) {
                Some(idx) => (&line[..idx], &line[idx + 1..]),
                None => (line, ""),
            };
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self { values }
    }

    /// Load a property file; a missing file yields no properties
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded properties from {:?}", path);
        Ok(Self::parse(&content))
    }

    /// Later layers win
    pub fn merge(&mut self, other: &Properties) {
        self.values
            .extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Properties visible to one project: the settings directory's file, then the
/// project directory's file, then invocation arguments.
pub fn project_properties(
    settings_dir: &Path,
    project_dir: &Path,
    file_name: &str,
    extra: &BTreeMap<String, String>,
) -> Result<Properties> {
    let mut properties = Properties::load(&settings_dir.join(file_name))?;
    if project_dir != settings_dir {
        properties.merge(&Properties::load(&project_dir.join(file_name))?);
    }
    properties.merge(&extra.clone().into_iter().collect());
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_lines() {
        let props = Properties::parse("# comment\n! also comment\nprop=value2\n otherProp : value \n\nflag\n");
        assert_eq!(props.get("prop"), Some("value2"));
        assert_eq!(props.get("otherProp"), Some("value"));
        assert_eq!(props.get("flag"), Some(""));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_project_overrides_settings_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let child = root.join("child");
        fs::create_dir(&child).unwrap();
        fs::write(root.join("plumb.properties"), "prop=value2\notherProp=value").unwrap();
        fs::write(child.join("plumb.properties"), "prop=value").unwrap();

        let extra = BTreeMap::from([("cli".to_string(), "1".to_string())]);
        let props = project_properties(root, &child, "plumb.properties", &extra).unwrap();

        assert_eq!(props.get("prop"), Some("value"));
        assert_eq!(props.get("otherProp"), Some("value"));
        assert_eq!(props.get("cli"), Some("1"));
    }

    #[test]
    fn test_missing_files_yield_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let props =
            project_properties(temp_dir.path(), temp_dir.path(), "plumb.properties", &BTreeMap::new()).unwrap();
        assert!(props.is_empty());
    }
}
