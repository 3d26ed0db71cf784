use super::{DumpDriver, uri_args};
use crate::config::MongitConfig;
use crate::error::Result;
use crate::utils::process::{Invocation, Runner};

const DOCKER: &str = "docker";

/// Runs the dump tools inside a container and moves the dump directory
/// across with `docker cp`.
pub struct DockerDriver {
    pub container: String,
}

impl DumpDriver for DockerDriver {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn dump(&self, config: &MongitConfig, runner: &dyn Runner) -> Result<()> {
        let inside = config.container_dump_path();
        let exec = Invocation::new(DOCKER)
            .args(["exec", self.container.as_str(), config.dump_tool.as_str()])
            .args(uri_args(config))
            .args(["-o", inside.as_str()]);
        runner.run(&exec)?;

        // Copies the directory itself, so it lands as ./<dump_dir>.
        let copy_out = Invocation::new(DOCKER).args([
            "cp".to_string(),
            format!("{}:{}", self.container, inside),
            ".".to_string(),
        ]);
        runner.run(&copy_out)?;
        Ok(())
    }

    fn restore(&self, config: &MongitConfig, runner: &dyn Runner) -> Result<()> {
        let copy_in = Invocation::new(DOCKER).args([
            "cp".to_string(),
            config.local_dump_path(),
            format!("{}:{}", self.container, config.container_root),
        ]);
        runner.run(&copy_in)?;

        let exec = Invocation::new(DOCKER)
            .args(["exec", self.container.as_str(), config.restore_tool.as_str()])
            .args(uri_args(config))
            .arg(config.container_dump_path());
        runner.run(&exec)?;
        Ok(())
    }
}
