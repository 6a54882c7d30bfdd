//! Host-side bridge options.

use serde::{Deserialize, Serialize};

/// How the bridge talks back to the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Deliver page messages by direct function call on the messaging
    /// module instead of through generic event dispatch.
    pub direct_bridge: bool,
    /// Capacity of the host lifecycle broadcast (valid range: 1-1024).
    pub lifecycle_capacity: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            direct_bridge: false,
            lifecycle_capacity: 16,
        }
    }
}
