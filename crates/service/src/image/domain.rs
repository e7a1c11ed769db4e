use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub image_id: i32,
    pub product_id: i32,
    pub file_name: String,
    pub date_created: DateTime<Utc>,
    pub s3_bucket_path: String,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub product_id: i32,
    pub file_name: String,
    pub s3_bucket_path: String,
}

/// `{owner}/{product}/{uuid}-{file_name}`; the uuid keeps repeated uploads of one file apart.
pub fn blob_key(owner_id: i32, product_id: i32, file_name: &str) -> String {
    format!("{owner_id}/{product_id}/{}-{file_name}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_and_unique() {
        let a = blob_key(3, 9, "cat.png");
        let b = blob_key(3, 9, "cat.png");
        assert!(a.starts_with("3/9/"));
        assert!(a.ends_with("-cat.png"));
        assert_ne!(a, b);
    }
}
