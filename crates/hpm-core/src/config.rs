use std::path::{Path, PathBuf};

/// Directory name used under the platform's local data directory.
const APP_DIR_NAME: &str = "hpm-tracker";

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    /// Optional JSON catalog replacing the built-in reference tables.
    pub catalog_path: Option<PathBuf>,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            catalog_path: None,
        }
    }

    pub fn with_catalog<P: AsRef<Path>>(mut self, catalog_path: P) -> Self {
        self.catalog_path = Some(catalog_path.as_ref().to_path_buf());
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        match dirs::data_local_dir() {
            Some(dir) => Self::new(dir.join(APP_DIR_NAME)),
            None => Self::new("hpm_data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_catalog_keeps_data_dir() {
        let config = CoreConfig::new("/tmp/hpm").with_catalog("/tmp/catalog.json");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/hpm"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
    }

    #[test]
    fn test_default_data_dir_is_named_for_app() {
        let config = CoreConfig::default();
        assert!(config.data_dir.ends_with(APP_DIR_NAME) || config.data_dir.ends_with("hpm_data"));
        assert!(config.catalog_path.is_none());
    }
}
