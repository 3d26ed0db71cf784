use super::{DumpDriver, uri_args};
use crate::config::MongitConfig;
use crate::error::Result;
use crate::utils::process::{Invocation, Runner};

/// Runs the dump tools directly on this machine.
pub struct HostDriver;

impl DumpDriver for HostDriver {
    fn name(&self) -> &'static str {
        "host"
    }

    fn dump(&self, config: &MongitConfig, runner: &dyn Runner) -> Result<()> {
        let inv = Invocation::new(&config.dump_tool)
            .args(uri_args(config))
            .args(["-o", config.dump_dir.as_str()]);
        runner.run(&inv)?;
        Ok(())
    }

    fn restore(&self, config: &MongitConfig, runner: &dyn Runner) -> Result<()> {
        let inv = Invocation::new(&config.restore_tool)
            .args(uri_args(config))
            .arg(config.local_dump_path());
        runner.run(&inv)?;
        Ok(())
    }
}
