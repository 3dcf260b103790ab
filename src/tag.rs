use std::fmt;

use indexmap::IndexMap;

/// A tag key with an optional value.
///
/// A tag without a value is a bare predicate: it can be rendered as a query but is never sent
/// to the tagging endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    key: String,
    value: Option<String>,
}

impl Tag {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Tag {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a tag with no value.
    pub fn bare<K: Into<String>>(key: K) -> Self {
        Tag {
            key: key.into(),
            value: None,
        }
    }

    /// Returns a copy of this tag holding `value`.
    #[must_use]
    pub fn valued<V: Into<String>>(&self, value: V) -> Self {
        Tag {
            key: self.key.clone(),
            value: Some(value.into()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Renders as `key='value'`, or just `key` when there is no value.
    pub fn to_query_language(&self) -> String {
        match &self.value {
            Some(v) => format!("{}='{}'", self.key, v),
            None => self.key.clone(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_language())
    }
}

/// An insertion-ordered set of tags holding at most one tag per key.
///
/// Adding a tag whose key is already present replaces the previous one but keeps its position.
/// Equality ignores ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: IndexMap<String, Tag>,
}

impl TagSet {
    pub fn empty() -> Self {
        TagSet::default()
    }

    pub fn singleton<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut tags = TagSet::empty();
        tags.add(Tag::new(key, value));
        tags
    }

    /// Merges every set in order; on key collisions the later set wins.
    pub fn merged<'a, I>(sets: I) -> Self
    where
        I: IntoIterator<Item = &'a TagSet>,
    {
        let mut tags = TagSet::empty();
        for other in sets {
            tags.add_all(other);
        }
        tags
    }

    pub fn add(&mut self, tag: Tag) {
        self.tags.insert(tag.key.clone(), tag);
    }

    pub fn add_all(&mut self, other: &TagSet) {
        for tag in other.iter() {
            self.add(tag.clone());
        }
    }

    /// Returns a new set with `other` applied on top of `self`.
    #[must_use]
    pub fn merge(&self, other: &TagSet) -> TagSet {
        let mut tags = self.clone();
        tags.add_all(other);
        tags
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    /// Iterates over the `(key, value)` pairs of tags that have a value.
    pub fn iter_present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .values()
            .filter_map(|tag| tag.value().map(|v| (tag.key(), v)))
    }

    pub fn has_present(&self) -> bool {
        self.iter_present().next().is_some()
    }

    pub fn to_present_map(&self) -> IndexMap<String, String> {
        self.iter_present()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn to_query_language(&self) -> String {
        self.tags
            .values()
            .map(Tag::to_query_language)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut tags = TagSet::empty();
        tags.extend(iter);
        tags
    }
}

impl<K, V> FromIterator<(K, V)> for TagSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| Tag::new(k, v)).collect()
    }
}

impl Extend<Tag> for TagSet {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        for tag in iter {
            self.add(tag);
        }
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = indexmap::map::Values<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.values()
    }
}

#[cfg(test)]
mod tests {
    use super::{Tag, TagSet};

    fn keys(tags: &TagSet) -> Vec<&str> {
        tags.iter().map(Tag::key).collect()
    }

    #[test]
    fn test_rightmost_wins() {
        let a: TagSet = [("impl", "guava"), ("owner", "jdoe")].into_iter().collect();
        let b = TagSet::singleton("impl", "ehcache");

        let merged = a.merge(&b);
        assert_eq!(merged.get("impl"), b.get("impl"));
        assert_eq!(merged.get("owner"), a.get("owner"));
        // the overridden key keeps its first position
        assert_eq!(keys(&merged), ["impl", "owner"]);

        let reversed = b.merge(&a);
        assert_eq!(reversed.get("impl"), a.get("impl"));
    }

    #[test]
    fn test_disjoint_union_keeps_order() {
        let a: TagSet = [("a", "1"), ("b", "2")].into_iter().collect();
        let b: TagSet = [("c", "3"), ("d", "4")].into_iter().collect();

        let merged = TagSet::merged([&a, &b]);
        assert_eq!(keys(&merged), ["a", "b", "c", "d"]);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: TagSet = [("a", "1"), ("b", "2")].into_iter().collect();
        let b: TagSet = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(a, b);

        let c: TagSet = [("b", "3"), ("a", "1")].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_present_map_skips_bare_tags() {
        let tags: TagSet = [Tag::new("host", "h1"), Tag::bare("critical")]
            .into_iter()
            .collect();

        let present = tags.to_present_map();
        assert_eq!(present.len(), 1);
        assert_eq!(present.get("host").map(String::as_str), Some("h1"));
        assert!(tags.has_present());
        assert!(!TagSet::from_iter([Tag::bare("x")]).has_present());
    }

    #[test]
    fn test_query_language() {
        let tags: TagSet = [Tag::new("host", "h1"), Tag::bare("critical")]
            .into_iter()
            .collect();
        assert_eq!(tags.to_query_language(), "host='h1' AND critical");
        assert_eq!(TagSet::empty().to_query_language(), "");

        let valued = Tag::bare("critical").valued("yes");
        assert_eq!(valued.to_string(), "critical='yes'");
        assert_eq!(valued.key(), "critical");
    }
}
