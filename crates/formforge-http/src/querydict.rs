//! Query string dictionary for HTTP request parameters.
//!
//! [`QueryDict`] is an immutable-by-default dictionary for GET and POST
//! parameters. Keys can carry multiple values; plain lookups return the last
//! one, which matches how browsers submit repeated form fields.

use std::collections::HashMap;

use formforge_core::{ForgeError, ForgeResult};

/// An immutable-by-default dictionary for query string and form data.
///
/// Mutating an immutable instance is rejected as a suspicious operation;
/// [`copy`](QueryDict::copy) returns a mutable clone.
///
/// # Examples
///
/// ```
/// use formforge_http::QueryDict;
///
/// let qd = QueryDict::parse("color=red&color=blue&size=large");
/// assert_eq!(qd.get("color"), Some("blue"));
/// assert_eq!(
///     qd.get_list("color"),
///     Some(&vec!["red".to_string(), "blue".to_string()])
/// );
///
/// let mut mutable = qd.copy();
/// mutable.set("color", "green").unwrap();
/// assert_eq!(mutable.get("color"), Some("green"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryDict {
    data: HashMap<String, Vec<String>>,
    mutable: bool,
}

impl QueryDict {
    /// Creates a new, empty, immutable `QueryDict`.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            mutable: false,
        }
    }

    /// Creates a new, empty, mutable `QueryDict`.
    pub fn new_mutable() -> Self {
        Self {
            data: HashMap::new(),
            mutable: true,
        }
    }

    /// Parses a URL query string (e.g. `"key1=val1&key2=val2"`) into an
    /// immutable `QueryDict`.
    ///
    /// Handles percent-encoding, `+` as space, and repeated keys.
    pub fn parse(query_string: &str) -> Self {
        let mut data: HashMap<String, Vec<String>> = HashMap::new();

        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq| (&pair[..eq], &pair[eq + 1..]));

            data.entry(percent_decode(key))
                .or_default()
                .push(percent_decode(value));
        }

        Self {
            data,
            mutable: false,
        }
    }

    /// Returns the last value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns all values for the given key, or `None` if not present.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get(key)
    }

    /// Sets a single value for the given key, replacing any existing values.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::SuspiciousOperation`] if this instance is immutable.
    pub fn set(&mut self, key: &str, value: &str) -> ForgeResult<()> {
        self.check_mutable()?;
        self.data.insert(key.to_string(), vec![value.to_string()]);
        Ok(())
    }

    /// Appends a value to the list for the given key.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::SuspiciousOperation`] if this instance is immutable.
    pub fn append(&mut self, key: &str, value: &str) -> ForgeResult<()> {
        self.check_mutable()?;
        self.data
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    fn check_mutable(&self) -> ForgeResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(ForgeError::SuspiciousOperation(
                "This QueryDict instance is immutable".to_string(),
            ))
        }
    }

    /// Returns a mutable copy of this `QueryDict`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            data: self.data.clone(),
            mutable: true,
        }
    }

    /// Encodes this `QueryDict` as a URL query string.
    ///
    /// All keys and values are percent-encoded; pairs are sorted so the
    /// output is stable across hash orderings.
    pub fn urlencode(&self) -> String {
        let mut parts = Vec::new();

        for (key, values) in &self.data {
            for value in values {
                parts.push(format!("{}={}", percent_encode(key), percent_encode(value)));
            }
        }

        parts.sort();
        parts.join("&")
    }

    /// Returns `true` if this `QueryDict` is mutable.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `QueryDict` contains no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Returns an iterator over `(key, values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.data.iter()
    }
}

/// Decodes a percent-encoded string, treating `+` as a space.
fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a string for use in a URL query.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let qd = QueryDict::new();
        assert!(qd.is_empty());
        assert_eq!(qd.len(), 0);
    }

    #[test]
    fn test_parse_simple() {
        let qd = QueryDict::parse("key=value");
        assert_eq!(qd.get("key"), Some("value"));
        assert_eq!(qd.len(), 1);
    }

    #[test]
    fn test_parse_multiple_keys() {
        let qd = QueryDict::parse("a=1&b=2&c=3");
        assert_eq!(qd.get("a"), Some("1"));
        assert_eq!(qd.get("b"), Some("2"));
        assert_eq!(qd.get("c"), Some("3"));
    }

    #[test]
    fn test_parse_repeated_key_returns_last() {
        let qd = QueryDict::parse("color=red&color=blue&color=green");
        assert_eq!(qd.get("color"), Some("green"));
        assert_eq!(
            qd.get_list("color"),
            Some(&vec![
                "red".to_string(),
                "blue".to_string(),
                "green".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_empty_string() {
        let qd = QueryDict::parse("");
        assert!(qd.is_empty());
    }

    #[test]
    fn test_parse_key_without_value() {
        let qd = QueryDict::parse("flag&name=x");
        assert_eq!(qd.get("flag"), Some(""));
        assert_eq!(qd.get("name"), Some("x"));
    }

    #[test]
    fn test_parse_percent_encoding() {
        let qd = QueryDict::parse("name=Jane%20Doe&city=N%C3%BCrnberg");
        assert_eq!(qd.get("name"), Some("Jane Doe"));
        assert_eq!(qd.get("city"), Some("Nürnberg"));
    }

    #[test]
    fn test_parse_plus_as_space() {
        let qd = QueryDict::parse("message=hello+world");
        assert_eq!(qd.get("message"), Some("hello world"));
    }

    #[test]
    fn test_immutable_set_rejected() {
        let mut qd = QueryDict::parse("a=1");
        let result = qd.set("a", "2");
        assert!(matches!(result, Err(ForgeError::SuspiciousOperation(_))));
        assert_eq!(qd.get("a"), Some("1"));
    }

    #[test]
    fn test_immutable_append_rejected() {
        let mut qd = QueryDict::new();
        assert!(qd.append("a", "1").is_err());
    }

    #[test]
    fn test_copy_is_mutable() {
        let qd = QueryDict::parse("a=1");
        assert!(!qd.is_mutable());

        let mut copy = qd.copy();
        assert!(copy.is_mutable());
        copy.set("a", "2").unwrap();
        copy.append("b", "3").unwrap();
        assert_eq!(copy.get("a"), Some("2"));
        assert_eq!(copy.get("b"), Some("3"));
        // Original untouched.
        assert_eq!(qd.get("a"), Some("1"));
    }

    #[test]
    fn test_urlencode_round_trip() {
        let mut qd = QueryDict::new_mutable();
        qd.set("name", "Jane Doe").unwrap();
        qd.append("tag", "a b").unwrap();

        let encoded = qd.urlencode();
        let reparsed = QueryDict::parse(&encoded);
        assert_eq!(reparsed.get("name"), Some("Jane Doe"));
        assert_eq!(reparsed.get("tag"), Some("a b"));
    }

    #[test]
    fn test_keys_and_contains() {
        let qd = QueryDict::parse("a=1&b=2");
        assert!(qd.contains_key("a"));
        assert!(!qd.contains_key("z"));
        let mut keys: Vec<_> = qd.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
