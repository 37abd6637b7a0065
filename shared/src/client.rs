//! Client-related types shared between server and client

use serde::{Deserialize, Serialize};

/// User information (the signed-in staff member)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}
