//! Insertion-ordered keyword/value map for an already-parsed FITS header.
//!
//! The card-image syntax (80-byte records, comments, padding) is the
//! reader/writer collaborator's concern; by the time a header reaches this
//! crate it is a flat list of keyword/value pairs. Lookup is linear, like
//! scanning a card list, which is fine at header sizes.

use crate::value::Value;

/// An ordered mapping of keyword to scalar value.
///
/// Keywords keep their insertion order; setting an existing keyword updates
/// it in place without reordering. Cloning produces a deep, independent copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    records: Vec<(String, Value)>,
}

impl Header {
    /// Create an empty header.
    pub fn new() -> Self {
        Header {
            records: Vec::new(),
        }
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the header holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if `keyword` is present.
    pub fn contains_key(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    /// Look up the value for `keyword`.
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.records
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v)
    }

    /// Set `keyword` to `value`, updating in place if already present.
    pub fn set(&mut self, keyword: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.records.iter_mut().find(|(k, _)| k == keyword) {
            Some((_, v)) => *v = value,
            None => self.records.push((String::from(keyword), value)),
        }
    }

    /// Remove `keyword`, returning its value if it was present.
    pub fn remove(&mut self, keyword: &str) -> Option<Value> {
        let pos = self.records.iter().position(|(k, _)| k == keyword)?;
        Some(self.records.remove(pos).1)
    }

    /// Iterate over keyword/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Integer value of `keyword`, if present and integral.
    pub fn integer(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(Value::as_integer)
    }

    /// Float value of `keyword`. Integer values are widened.
    pub fn float(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(Value::as_float)
    }

    /// String value of `keyword`, if present and a string.
    pub fn string(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(Value::as_str)
    }

    /// Logical value of `keyword`, if present and logical.
    pub fn logical(&self, keyword: &str) -> Option<bool> {
        self.get(keyword).and_then(Value::as_logical)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Header {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut header = Header::new();
        for (k, v) in iter {
            let k = k.into();
            header.set(&k, v);
        }
        header
    }
}
