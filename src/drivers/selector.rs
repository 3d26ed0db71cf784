use super::{DumpDriver, docker::DockerDriver, host::HostDriver};
use crate::config::MongitConfig;

pub fn select_driver(config: &MongitConfig) -> Box<dyn DumpDriver> {
    match &config.docker {
        Some(container) => Box::new(DockerDriver {
            container: container.clone(),
        }),
        None => Box::new(HostDriver),
    }
}
