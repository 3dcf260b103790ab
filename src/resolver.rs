use std::collections::HashMap;

use crate::rule::{self, RegexTagRule};
use crate::tag::TagSet;

/// Computes the tags a metric is registered with.
///
/// Sources are applied from lowest to highest precedence: global tags, matching regex rules in
/// the order they were added, per-metric tags for the exact name, and finally the tags given at
/// the call site. Resolution is a pure read of immutable configuration.
#[derive(Clone, Debug, Default)]
pub struct TagResolver {
    global_tags: TagSet,
    per_metric_tags: HashMap<String, TagSet>,
    regex_rules: Vec<RegexTagRule>,
}

impl TagResolver {
    pub fn new(
        global_tags: TagSet,
        per_metric_tags: HashMap<String, TagSet>,
        regex_rules: Vec<RegexTagRule>,
    ) -> Self {
        TagResolver {
            global_tags,
            per_metric_tags,
            regex_rules,
        }
    }

    pub fn resolve(&self, name: &str, call_site_tags: &TagSet) -> TagSet {
        let mut tags = self.global_tags.clone();
        tags.add_all(&rule::tags_for_name(&self.regex_rules, name));
        if let Some(explicit) = self.per_metric_tags.get(name) {
            tags.add_all(explicit);
        }
        tags.add_all(call_site_tags);
        tags
    }

    pub fn global_tags(&self) -> &TagSet {
        &self.global_tags
    }

    pub fn per_metric_tags(&self) -> &HashMap<String, TagSet> {
        &self.per_metric_tags
    }

    pub fn regex_rules(&self) -> &[RegexTagRule] {
        &self.regex_rules
    }
}
