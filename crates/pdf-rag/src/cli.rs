//! Command-line options shared by the binaries

use clap::Args;
use std::path::PathBuf;

use crate::config::RagConfig;
use crate::error::Result;

/// Where to read configuration from, plus path overrides
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long, env = "PDF_RAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory of PDFs to ingest
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// Directory holding the vector index
    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the config file, then apply command-line overrides
    pub fn load(&self) -> Result<RagConfig> {
        let mut config = RagConfig::load(self.config.as_deref())?;
        if let Some(data_path) = &self.data_path {
            config = config.with_data_path(data_path.clone());
        }
        if let Some(db_path) = &self.db_path {
            config = config.with_db_path(db_path.clone());
        }
        Ok(config)
    }
}
