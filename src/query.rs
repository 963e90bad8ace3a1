//! Url query

use serde::Deserialize;

/// Url query of a GET S3 request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GetQuery {
    /// list-type
    pub list_type: Option<u8>,
    /// delimiter
    pub delimiter: Option<String>,
    /// max-keys
    pub max_keys: Option<usize>,
    /// prefix
    pub prefix: Option<String>,
    /// continuation-token
    pub continuation_token: Option<String>,
    /// uploadId
    #[serde(rename = "uploadId")]
    pub upload_id: Option<String>,
}

/// Url query of a POST S3 request
#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    /// delete
    pub delete: Option<String>,
    /// uploads
    pub uploads: Option<String>,
    /// uploadId
    #[serde(rename = "uploadId")]
    pub upload_id: Option<String>,
}

/// Url query of a PUT S3 request
#[derive(Debug, Default, Deserialize)]
pub struct PutQuery {
    /// uploadId
    #[serde(rename = "uploadId")]
    pub upload_id: Option<String>,
    /// partNumber
    #[serde(rename = "partNumber")]
    pub part_number: Option<u32>,
}

/// Url query of a DELETE S3 request
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// uploadId
    #[serde(rename = "uploadId")]
    pub upload_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_marker_tokens() {
        let query: PostQuery = serde_urlencoded::from_str("uploads").unwrap();
        assert_eq!(query.uploads.as_deref(), Some(""));
        assert!(query.upload_id.is_none());

        let query: PostQuery = serde_urlencoded::from_str("delete").unwrap();
        assert_eq!(query.delete.as_deref(), Some(""));
    }

    #[test]
    fn list_query() {
        let query: GetQuery =
            serde_urlencoded::from_str("list-type=2&prefix=a%2Fb&delimiter=%2F&max-keys=5")
                .unwrap();
        assert_eq!(query.list_type, Some(2));
        assert_eq!(query.prefix.as_deref(), Some("a/b"));
        assert_eq!(query.delimiter.as_deref(), Some("/"));
        assert_eq!(query.max_keys, Some(5));
    }

    #[test]
    fn upload_part_query() {
        let query: PutQuery =
            serde_urlencoded::from_str("uploadId=abc123&partNumber=2").unwrap();
        assert_eq!(query.upload_id.as_deref(), Some("abc123"));
        assert_eq!(query.part_number, Some(2));
    }
}
