//! How the mirrored tree is presented to requesting sites
//!
//! Loaded once at startup and read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::tree::ROOT_PATH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Single-tenant virtual root: only this subfolder of the drive is
    ///  mirrored and it is presented as `/`. Ignored when domain based
    ///  sub folders are enabled.
    #[serde(default = "default_folder_sub")]
    pub folder_sub: String,
    #[serde(default)]
    pub domain_based_sub_folders: DomainSubFolders,
    /// Prepended to every direct download url handed out
    #[serde(default)]
    pub download_redirect_prefix: String,
    /// Site-wide secrets, each guarding a path and everything below it
    #[serde(default)]
    pub pass_list: Vec<PassEntry>,
}

fn default_folder_sub() -> String {
    ROOT_PATH.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            folder_sub: default_folder_sub(),
            domain_based_sub_folders: DomainSubFolders::default(),
            download_redirect_prefix: String::new(),
            pass_list: Vec::new(),
        }
    }
}

/// Multi-tenant virtual roots: every requesting host is scoped to its own
///  subfolder of the drive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSubFolders {
    #[serde(default)]
    pub enable: bool,
    /// Prefix stripped from paths of hosts without a mapping
    #[serde(default)]
    pub default_folder: String,
    #[serde(default)]
    pub pairs: Vec<DomainSubFolder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSubFolder {
    /// Host as sent by the browser, port included when not default
    pub domain: String,
    /// Absolute path of the folder acting as this host's `/`
    pub sub_folder: String,
    #[serde(default)]
    pub html_title: String,
    #[serde(default)]
    pub site_header: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassEntry {
    /// External path the secret guards, descendants included
    pub path: String,
    pub pass: String,
}

impl SiteConfig {
    pub fn domain_mode(&self) -> bool {
        self.domain_based_sub_folders.enable
    }

    pub fn domain(&self, host: &str) -> Option<&DomainSubFolder> {
        self.domain_based_sub_folders
            .pairs
            .iter()
            .find(|pair| pair.domain == host)
    }

    /// Remote folder a build starts from: the single-tenant subfolder, or the
    ///  whole drive when it is `/` or when domains pick their own subfolders
    pub fn fetch_prefix(&self) -> &str {
        if self.domain_mode() || self.folder_sub == ROOT_PATH {
            ""
        } else {
            &self.folder_sub
        }
    }

    /// Prefix stripped from real paths before `host` sees them
    pub fn rewrite_prefix(&self, host: &str) -> &str {
        if self.domain_mode() {
            match self.domain(host) {
                Some(pair) => &pair.sub_folder,
                None => &self.domain_based_sub_folders.default_folder,
            }
        } else if self.folder_sub != ROOT_PATH {
            &self.folder_sub
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn domains() -> SiteConfig {
        SiteConfig {
            domain_based_sub_folders: DomainSubFolders {
                enable: true,
                default_folder: "/default".to_string(),
                pairs: vec![DomainSubFolder {
                    domain: "a.example".to_string(),
                    sub_folder: "/public".to_string(),
                    html_title: "A".to_string(),
                    site_header: "Site A".to_string(),
                }],
            },
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_prefixes_single_tenant() {
        let config = SiteConfig::default();
        assert_eq!(config.fetch_prefix(), "");
        assert_eq!(config.rewrite_prefix("anything"), "");

        let config = SiteConfig {
            folder_sub: "/share".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(config.fetch_prefix(), "/share");
        assert_eq!(config.rewrite_prefix("anything"), "/share");
    }

    #[test]
    fn test_prefixes_domain_mode() {
        let config = domains();
        assert_eq!(config.fetch_prefix(), "");
        assert_eq!(config.rewrite_prefix("a.example"), "/public");
        assert_eq!(config.rewrite_prefix("b.example"), "/default");
        assert_eq!(config.domain("a.example").unwrap().site_header, "Site A");
        assert!(config.domain("b.example").is_none());
    }
}
