use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Post {
    /// First line of the body, for list previews
    pub fn preview(&self) -> &str {
        self.body.lines().next().unwrap_or_default()
    }
}
