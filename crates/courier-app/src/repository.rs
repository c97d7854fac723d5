//! Repository adapters for the persistence layer

use std::path::PathBuf;

use courier_infra::persistence::FileRateRepository;
use courier_types::Result;

use crate::config::Config;

/// Open the rate table configured for this installation
pub fn open_rate_repo(config: &Config) -> Result<FileRateRepository> {
    let path = config.rate_table_path()?;
    FileRateRepository::new(path)
}

/// Open a rate table at a custom path
pub fn open_rate_repo_at(path: PathBuf) -> Result<FileRateRepository> {
    FileRateRepository::new(path)
}
