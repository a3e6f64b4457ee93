// src/models/system.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents an active row of the 'system_lists' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct System {
    pub id: i64,
    pub topic: String,
}
