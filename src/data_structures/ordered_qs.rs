//! Ordered query strings

use crate::utils::Also;

use smallvec::SmallVec;

/// Immutable query string container, sorted by name then value
///
/// Names and values are stored url-decoded. A bare `name` token without `=`
/// is kept with an empty-string value.
#[derive(Debug, Default)]
pub struct OrderedQs {
    /// Ascending `(name, value)` pairs
    qs: SmallVec<[(String, String); 16]>,
}

impl OrderedQs {
    /// Parses `OrderedQs` from a raw query string
    ///
    /// # Errors
    /// Returns an `Err` if the query string is not url-encoded
    pub fn from_query(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let qs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)?
            .also(|v| v.sort());
        Ok(Self { qs: qs.into() })
    }

    /// Gets a query value by name. Time `O(logn)`
    pub fn get(&self, name: &str) -> Option<&str> {
        let qs = self.qs.as_ref();
        match qs.binary_search_by_key(&name, |&(ref n, _)| n.as_str()) {
            Ok(idx) => qs.get(idx).map(|&(_, ref v)| v.as_str()),
            Err(_) => None,
        }
    }
}

impl AsRef<[(String, String)]> for OrderedQs {
    fn as_ref(&self) -> &[(String, String)] {
        self.qs.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_sort() {
        let qs = OrderedQs::from_query("c=3&a=1&b=2").unwrap();
        let tokens: Vec<_> = qs
            .as_ref()
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect();
        assert_eq!(tokens, ["a=1", "b=2", "c=3"]);
    }

    #[test]
    fn bare_name_has_empty_value() {
        let qs = OrderedQs::from_query("uploads").unwrap();
        assert_eq!(qs.get("uploads"), Some(""));
        assert_eq!(qs.get("upload"), None);
    }

    #[test]
    fn empty_query() {
        let qs = OrderedQs::from_query("").unwrap();
        assert!(qs.as_ref().is_empty());
    }
}
