use serde::{Deserialize, Serialize};

pub const TABLE: &str = "patients";

pub const COLUMNS: &str =
    "id,name,age,gender,alzheimer_stage,home_address,phone_emergency,medications,photo_url";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    // stage and medications are free-form in the hosted schema
    #[serde(default)]
    pub alzheimer_stage: Option<serde_json::Value>,
    #[serde(default)]
    pub home_address: Option<String>,
    #[serde(default)]
    pub phone_emergency: Option<String>,
    #[serde(default)]
    pub medications: Option<serde_json::Value>,
    #[serde(default)]
    pub photo_url: Option<String>,
}
