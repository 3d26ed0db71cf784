use crate::config::MongitConfig;
use crate::error::Result;
use crate::utils::process::Runner;

pub mod docker;
pub mod host;
pub mod selector;

pub trait DumpDriver {
    fn name(&self) -> &'static str;

    /// Write a fresh dump into the working tree's dump directory.
    fn dump(&self, config: &MongitConfig, runner: &dyn Runner) -> Result<()>;

    /// Load the working tree's dump directory back into the database.
    fn restore(&self, config: &MongitConfig, runner: &dyn Runner) -> Result<()>;
}

/// `--uri <uri>` when a connection string is configured.
fn uri_args(config: &MongitConfig) -> Vec<String> {
    match &config.uri {
        Some(uri) => vec!["--uri".to_string(), uri.clone()],
        None => Vec::new(),
    }
}
