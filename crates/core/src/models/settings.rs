use serde::{Deserialize, Serialize};

/// User-configurable settings, stored inside the inventory file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Organization name printed in the report banner.
    pub organization: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization: "BIO SALUD NATURAL SpA".to_string(),
        }
    }
}
