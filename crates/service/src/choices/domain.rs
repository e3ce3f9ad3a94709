use serde::{Deserialize, Serialize};

/// An OBS instance as offered by the extra repository form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildServiceEntry {
    pub name: String,
    pub apiurl: String,
}

/// A kickstart substitution token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    pub name: String,
    pub default_value: String,
    pub description: String,
}
