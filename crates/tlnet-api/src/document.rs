// Batch configuration documents
//
// The card exports its configuration as flat `KEY=VALUE` text, one
// document per scope. This module knows the per-scope form field names
// and turns a raw document into an ordered key/value view.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::error::Error;

/// Which configuration domain an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// System-wide settings (network, services, users, time).
    System,
    /// SNMP agent settings.
    Snmp,
}

impl Scope {
    pub const ALL: [Self; 2] = [Self::System, Self::Snmp];

    /// Parse a scope name, reporting unknown names as `InvalidArgument`.
    pub fn parse(value: &str) -> Result<Self, Error> {
        Self::from_str(value)
            .map_err(|_| Error::invalid("scope", value, "expected 'system' or 'snmp'"))
    }

    /// Form field that selects this scope on a download.
    pub fn download_field(self) -> &'static str {
        match self {
            Self::System => "DL_SYSTEM",
            Self::Snmp => "DL_SNMP",
        }
    }

    /// Submit-button field sent alongside an upload.
    pub fn upload_button(self) -> &'static str {
        match self {
            Self::System => "UL_SYSTEM",
            Self::Snmp => "UL_SNMP",
        }
    }

    /// Multipart field carrying the uploaded document.
    pub fn upload_field(self) -> &'static str {
        match self {
            Self::System => "UL_F_SYSTEM",
            Self::Snmp => "UL_F_SNMP",
        }
    }

    /// File name used when persisting the document without an explicit path.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::System => "system_config.ini",
            Self::Snmp => "snmp_config.ini",
        }
    }
}

/// Parsed configuration document: keys in first-seen order, last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap {
    entries: IndexMap<String, String>,
}

impl ConfigMap {
    /// Parse a raw `KEY=VALUE` document.
    ///
    /// Each line is split on its first `=`. Lines without one are skipped,
    /// a trailing `\r` is dropped, and a repeated key overwrites the
    /// earlier value in place.
    pub fn parse(document: &str) -> Self {
        let mut entries = IndexMap::new();
        for line in document.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.to_owned(), value.to_owned());
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// First entry whose key contains `needle`.
    ///
    /// Several card keys carry firmware-specific prefixes or suffixes
    /// (`RADIUS Admin User Type`, `SNTP Server1`), so page readers match
    /// on a stable fragment.
    pub fn find(&self, needle: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(key, _)| key.contains(needle))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// All entries whose key contains `needle`, in document order.
    pub fn find_all<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries
            .iter()
            .filter(move |(key, _)| key.contains(needle))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn later_duplicate_wins() {
        let map = ConfigMap::parse("A=1\nB=2\nB=3\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("A"), Some("1"));
        assert_eq!(map.get("B"), Some("3"));
    }

    #[test]
    fn lines_without_equals_are_ignored() {
        let map = ConfigMap::parse("[System]\ngarbage\nIP=10.0.0.5\n\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("IP"), Some("10.0.0.5"));
        assert_eq!(map.get("garbage"), None);
    }

    #[test]
    fn splits_on_first_equals_only() {
        let map = ConfigMap::parse("RADIUS Secret=a=b=c\r\nEmpty=\r\n");
        assert_eq!(map.get("RADIUS Secret"), Some("a=b=c"));
        assert_eq!(map.get("Empty"), Some(""));
    }

    #[test]
    fn keeps_document_order() {
        let map =
            ConfigMap::parse("SysLog Server1=a\nOther=x\nSysLog Server2=b\nSysLog Server1=c\n");
        let servers: Vec<_> = map.find_all("SysLog Server").map(|(_, v)| v).collect();
        assert_eq!(servers, vec!["c", "b"]);
    }

    #[test]
    fn find_matches_key_fragment() {
        let map = ConfigMap::parse("RADIUS Admin User Type=33\n");
        assert_eq!(
            map.find("RADIUS Admin User"),
            Some(("RADIUS Admin User Type", "33"))
        );
        assert_eq!(map.find("RADIUS Device User"), None);
    }

    #[test]
    fn scope_names() {
        assert_eq!(Scope::parse("SNMP").ok(), Some(Scope::Snmp));
        assert_eq!(Scope::System.to_string(), "system");
        assert!(matches!(
            Scope::parse("network"),
            Err(Error::InvalidArgument { field: "scope", .. })
        ));
        assert_eq!(Scope::Snmp.upload_field(), "UL_F_SNMP");
        assert_eq!(Scope::System.download_field(), "DL_SYSTEM");
    }
}
