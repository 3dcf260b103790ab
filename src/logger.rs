use std::error::Error;
use std::fmt;

use crate::client::HawkularClient;
use crate::tag::{Tag, TagSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application log events stored in Hawkular.
///
/// Every event increments the counter `<severity>.count` and appends the message to the
/// strings metric `<severity>.logs`. Both metrics are tagged `severity=<severity>`.
#[derive(Clone, Debug)]
pub struct HawkularLogger {
    client: HawkularClient,
}

impl HawkularLogger {
    pub fn new(client: HawkularClient) -> Self {
        HawkularLogger { client }
    }

    pub fn client(&self) -> &HawkularClient {
        &self.client
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message, &TagSet::empty());
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message, &TagSet::empty());
    }

    pub fn warn(&self, message: &str) {
        self.log(Severity::Warning, message, &TagSet::empty());
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message, &TagSet::empty());
    }

    /// Logs `message`, with `point_tags` attached to both data points.
    pub fn log(&self, severity: Severity, message: &str, point_tags: &TagSet) {
        let metric_tags = TagSet::singleton("severity", severity.as_str());
        self.client
            .counter_with_tags(&format!("{severity}.count"), &metric_tags)
            .inc_with_tags(point_tags);
        self.client
            .logger_with_tags(&format!("{severity}.logs"), &metric_tags)
            .log_with_tags(message, point_tags);
    }

    /// Logs `error` as `"<class>: <error>"`, adding the point tag `class=<class>`.
    ///
    /// `class` identifies the kind of failure, e.g. the error type name.
    pub fn failure(
        &self,
        severity: Severity,
        class: &str,
        error: &dyn Error,
        point_tags: &TagSet,
    ) {
        let mut tags = point_tags.clone();
        tags.add(Tag::new("class", class));
        self.log(severity, &format!("{class}: {error}"), &tags);
    }
}
