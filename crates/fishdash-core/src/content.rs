//! User and blog content types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
    pub is_active: bool,
}

/// Blog post category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogCategory {
    Policy,
    ClimateChange,
    Overfishing,
    IuuFishing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: Option<String>,
    pub excerpt: String,
    pub category: BlogCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub read_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_post_decodes() {
        let json = r#"{
            "id": 11,
            "title": "Monsoon closures",
            "slug": "monsoon-closures",
            "excerpt": "Seasonal fishing restrictions",
            "category": "climate_change",
            "tags": ["monsoon"],
            "author": "editor",
            "isPublished": true,
            "readCount": 120
        }"#;
        let post: BlogPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.category, BlogCategory::ClimateChange);
        assert_eq!(post.read_count, 120);
    }
}
