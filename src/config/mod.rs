pub mod mongit;

pub use mongit::{MongitConfig, Snapshot, validate_label};
