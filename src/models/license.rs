use serde::{Deserialize, Serialize};

/// License under which a dataset is published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: Option<i64>,
    pub name: String,
    pub url: Option<String>,
}
