use serde::{Deserialize, Serialize};

/// Configuration for the recipes module (`modules.recipes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipesConfig {
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Upper bound for names and titles.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_password_memory_kib")]
    pub password_memory_kib: u32,
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
            max_name_length: default_max_name_length(),
            password_memory_kib: default_password_memory_kib(),
            password_iterations: default_password_iterations(),
        }
    }
}

fn default_min_password_length() -> usize {
    5
}

fn default_max_name_length() -> usize {
    255
}

fn default_password_memory_kib() -> u32 {
    19 * 1024
}

fn default_password_iterations() -> u32 {
    2
}
