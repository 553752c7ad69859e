use crate::core::{ConfigProvider, Storage};
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Files under an existing local directory. Missing directories are an
/// error, not created.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.output_path().to_string())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);
        fs::write(full_path, data)?;
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).display().to_string()
    }
}
