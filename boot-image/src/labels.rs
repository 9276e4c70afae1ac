use log::warn;
use std::collections::BTreeMap as Map;

use crate::models::ImageLabelSet;

const OCI_PREFIX: &str = "org.opencontainers.image";

/// Builds the extra label map from raw `key=value` entries. Entries are split
/// on the first `=`; anything without one is logged and dropped. A key given
/// more than once keeps its last value, with a warning.
pub fn parse_extra_labels<I, S>(entries: I) -> Map<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut labels = Map::new();

    for entry in entries {
        let entry = entry.as_ref();
        let mut parts = entry.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(key), Some(value)) => {
                if labels.insert(key.to_owned(), value.to_owned()).is_some() {
                    warn!("image label '{}' is set more than once, using the last value", key);
                }
            }
            _ => warn!("image label '{}' is malformed", entry),
        }
    }

    labels
}

impl ImageLabelSet {
    /// The `key=value` pairs to attach to the image. The OCI fields come first
    /// in a fixed order and blank ones are left out, the extra labels follow.
    pub fn label_pairs(&self) -> Vec<String> {
        let oci_fields = [
            ("description", self.description.as_ref()),
            ("title", self.title.as_ref()),
            ("version", self.version.as_ref()),
            ("revision", self.revision.as_ref()),
            ("source", self.source_url.as_ref()),
        ];

        let oci = oci_fields.iter().filter_map(|&(field, value)| {
            value
                .filter(|value| !value.trim().is_empty())
                .map(|value| format!("{}.{}={}", OCI_PREFIX, field, value))
        });

        let extra = self
            .extra
            .iter()
            .map(|(key, value)| format!("{}={}", key, value));

        oci.chain(extra).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_equals() {
        let labels = parse_extra_labels(vec!["team=platform", "expr=a=b"]);

        assert_eq!(labels.get("team").map(String::as_str), Some("platform"));
        assert_eq!(labels.get("expr").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn drops_malformed_entries() {
        let labels = parse_extra_labels(vec!["bad-entry", "team=platform", ""]);

        assert_eq!(labels.len(), 1);
        assert!(labels.contains_key("team"));
    }

    #[test]
    fn later_duplicate_wins() {
        let labels = parse_extra_labels(vec!["team=a", "team=b"]);

        assert_eq!(labels.get("team").map(String::as_str), Some("b"));
    }

    #[test]
    fn label_pairs_skip_blank_values() {
        let mut extra = Map::new();
        extra.insert("team".to_owned(), "platform".to_owned());

        let labels = ImageLabelSet {
            description: Some("  ".into()),
            title: Some("demo".into()),
            version: Some("1.2.3".into()),
            revision: None,
            source_url: Some("https://github.com/acme/demo".into()),
            extra,
        };

        assert_eq!(
            labels.label_pairs(),
            vec![
                "org.opencontainers.image.title=demo",
                "org.opencontainers.image.version=1.2.3",
                "org.opencontainers.image.source=https://github.com/acme/demo",
                "team=platform",
            ]
        );
    }
}
