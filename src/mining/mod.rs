mod cluster;
mod mine;
mod registry;

pub use cluster::{Cluster, ResourceClusterer};
pub use mine::{Mine, MineId};
pub use registry::MineRegistry;
