use regex::Regex;

use crate::tag::TagSet;

/// Tags applied to every metric whose whole name matches a pattern.
#[derive(Clone, Debug)]
pub struct RegexTagRule {
    source: String,
    pattern: Regex,
    tags: TagSet,
}

impl RegexTagRule {
    /// Compiles `pattern` so that it only ever matches complete metric names.
    pub fn new(pattern: &str, tags: TagSet) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(RegexTagRule {
            source: pattern.to_string(),
            pattern: anchored,
            tags,
        })
    }

    /// Builds a rule from a per-metric tags key, if that key is a pattern.
    ///
    /// Patterns are written between slashes, e.g. `/ehcache\..*/`. Any other key, or a slashed
    /// key whose content does not compile, is a literal metric name and `None` is returned.
    pub fn check_and_create(key: &str, tags: &TagSet) -> Option<Self> {
        let inner = key
            .strip_prefix('/')
            .and_then(|k| k.strip_suffix('/'))
            .filter(|k| !k.is_empty())?;
        RegexTagRule::new(inner, tags.clone()).ok()
    }

    /// The pattern as it was written, without anchors or slashes.
    pub fn regex(&self) -> &str {
        &self.source
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    pub fn match_name(&self, name: &str) -> Option<&TagSet> {
        if self.matches(name) {
            Some(&self.tags)
        } else {
            None
        }
    }
}

/// Folds the tags of every matching rule, later rules overriding earlier ones.
pub fn tags_for_name(rules: &[RegexTagRule], name: &str) -> TagSet {
    let mut tags = TagSet::empty();
    for rule in rules {
        if let Some(matched) = rule.match_name(name) {
            tags.add_all(matched);
        }
    }
    tags
}
