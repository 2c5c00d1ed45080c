use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;

use serde::de;
use serde::Deserializer;

/// Allows access to the parameters of a token request.
///
/// The transport layer hands over either the url query or the urlencoded body. Basically use any
/// type of `HashMap` that maps 'str-likes' to 'str-likes', a vector of pairs in the order they
/// appeared, or a [`NormalizedParameter`] built from either.
///
/// When a key appears more than once, the first occurrence wins.
///
/// [`NormalizedParameter`]: struct.NormalizedParameter.html
pub trait QueryParameter {
    /// Get the value associated with a key.
    fn value(&self, key: &str) -> Option<Cow<str>>;

    /// Guarantees that one can grab an owned copy.
    fn normalize(&self) -> NormalizedParameter;
}

/// The query parameter normal form.
///
/// An owned copy of the parameters that does not borrow from the request it was parsed from.
/// Internally a hashmap but this may change due to optimizations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedParameter {
    inner: HashMap<Cow<'static, str>, Cow<'static, str>>,
}

impl QueryParameter for NormalizedParameter {
    fn value(&self, key: &str) -> Option<Cow<str>> {
        self.inner.get(key).map(|val| Cow::Borrowed(val.as_ref()))
    }

    fn normalize(&self) -> NormalizedParameter {
        self.clone()
    }
}

impl NormalizedParameter {
    /// Create an empty map.
    pub fn new() -> Self {
        NormalizedParameter::default()
    }

    /// Insert a key-value-pair unless the key is already present.
    pub fn insert_first(&mut self, key: Cow<'static, str>, val: Cow<'static, str>) {
        self.inner.entry(key).or_insert(val);
    }

    /// Parse an `application/x-www-form-urlencoded` string.
    pub fn from_urlencoded(encoded: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(encoded)?;
        Ok(pairs.into_iter().collect())
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no parameter was given at all.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Borrow<dyn QueryParameter> for NormalizedParameter {
    fn borrow(&self) -> &(dyn QueryParameter + 'static) {
        self
    }
}

impl<'de> de::Deserialize<'de> for NormalizedParameter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor(NormalizedParameter);

        impl<'a> de::Visitor<'a> for Visitor {
            type Value = NormalizedParameter;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a sequence of key-value-pairs")
            }

            fn visit_seq<A>(mut self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'a>,
            {
                while let Some((key, value)) = access.next_element::<(String, String)>()? {
                    self.0.insert_first(key.into(), value.into())
                }

                Ok(self.0)
            }
        }

        let visitor = Visitor(NormalizedParameter::default());
        deserializer.deserialize_seq(visitor)
    }
}

impl<K, V> FromIterator<(K, V)> for NormalizedParameter
where
    K: Into<Cow<'static, str>>,
    V: Into<Cow<'static, str>>,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut target = NormalizedParameter::default();
        iter.into_iter()
            .for_each(|(k, v)| target.insert_first(k.into(), v.into()));
        target
    }
}

impl ToOwned for dyn QueryParameter {
    type Owned = NormalizedParameter;

    fn to_owned(&self) -> Self::Owned {
        self.normalize()
    }
}

impl<K, V, S: BuildHasher> QueryParameter for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
{
    fn value(&self, key: &str) -> Option<Cow<str>> {
        self.get(key).map(|val| Cow::Borrowed(val.as_ref()))
    }

    fn normalize(&self) -> NormalizedParameter {
        self.iter()
            .map(|(key, val)| (key.borrow().to_string(), val.as_ref().to_string()))
            .collect()
    }
}

impl<K, V> QueryParameter for Vec<(K, V)>
where
    K: Borrow<str>,
    V: Borrow<str>,
{
    fn value(&self, key: &str) -> Option<Cow<str>> {
        self.iter()
            .find(|entry| entry.0.borrow() == key)
            .map(|entry| Cow::Borrowed(entry.1.borrow()))
    }

    fn normalize(&self) -> NormalizedParameter {
        self.iter()
            .map(|(key, val)| (key.borrow().to_string(), val.borrow().to_string()))
            .collect()
    }
}

impl<'a, Q: QueryParameter + 'a + ?Sized> QueryParameter for &'a Q {
    fn value(&self, key: &str) -> Option<Cow<str>> {
        (**self).value(key)
    }

    fn normalize(&self) -> NormalizedParameter {
        (**self).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_wins() {
        let params: NormalizedParameter = vec![("scope", "a"), ("scope", "b")].into_iter().collect();
        assert_eq!(params.value("scope").as_deref(), Some("a"));
        assert_eq!(params.len(), 1);

        let pairs = vec![("scope", "a"), ("scope", "b")];
        assert_eq!(pairs.value("scope").as_deref(), Some("a"));
        assert_eq!(pairs.normalize(), params);
    }

    #[test]
    fn parses_urlencoded_body() {
        let params = NormalizedParameter::from_urlencoded("type=client_credentials&client_id=foo&scope=a%20b")
            .expect("Valid urlencoded body");
        assert_eq!(params.value("type").as_deref(), Some("client_credentials"));
        assert_eq!(params.value("client_id").as_deref(), Some("foo"));
        assert_eq!(params.value("scope").as_deref(), Some("a b"));
        assert_eq!(params.value("client_secret"), None);
    }

    #[test]
    fn deserialize_pairs() {
        let params: NormalizedParameter =
            serde_json::from_str(r#"[["type", "password"], ["type", "client_credentials"]]"#)
                .expect("Sequence of pairs");
        assert_eq!(params.value("type").as_deref(), Some("password"));
    }

    #[test]
    fn hash_map_impls() {
        let mut map = HashMap::new();
        map.insert("type".to_string(), "password".to_string());
        let query: &dyn QueryParameter = &map;
        assert_eq!(query.value("type").as_deref(), Some("password"));
        assert_eq!(query.normalize().value("type").as_deref(), Some("password"));

        let _ = (&HashMap::<&'static str, &'static str>::new()) as &dyn QueryParameter;
        let _ = (&HashMap::<Cow<'static, str>, Cow<'static, str>>::new()) as &dyn QueryParameter;
    }
}
