use url::Url;

const GLOBAL_DRIVE_ROOT: &str = "https://graph.microsoft.com/v1.0/me/drive/root";
const CHINA_DRIVE_ROOT: &str = "https://microsoftgraph.chinacloudapi.cn/v1.0/me/drive/root";

/// Where folder listings of the drive live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    drive_root: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::global()
    }
}

impl Endpoints {
    pub fn global() -> Self {
        Self::new(GLOBAL_DRIVE_ROOT).expect("valid global drive root")
    }

    pub fn china() -> Self {
        Self::new(CHINA_DRIVE_ROOT).expect("valid china drive root")
    }

    pub fn for_cloud(china_cloud: bool) -> Self {
        if china_cloud {
            Self::china()
        } else {
            Self::global()
        }
    }

    /// Point at any drive root, e.g. a local stand-in for tests
    pub fn new(drive_root: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            drive_root: Url::parse(drive_root.trim_end_matches('/'))?,
        })
    }

    /// First listing page of the folder at `path`, `page_size` entries at a time.
    ///
    /// The drive root is `<root>/children`; any other folder is addressed as
    ///  `<root>:/<path>:/children`.
    pub fn children(&self, path: &str, page_size: u32) -> Url {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut url = self.drive_root.clone();

        if let Ok(mut parts) = url.path_segments_mut() {
            match segments.split_last() {
                None => {
                    parts.push("children");
                }
                Some((last, parents)) => {
                    let root = self
                        .drive_root
                        .path_segments()
                        .and_then(|mut s| s.next_back())
                        .unwrap_or("root")
                        .to_string();
                    parts.pop().push(&format!("{}:", root));
                    parts.extend(parents);
                    parts.push(&format!("{}:", last));
                    parts.push("children");
                }
            }
        }

        url.set_query(Some(&format!("$top={}", page_size)));
        url
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_root_children() {
        let url = Endpoints::global().children("", 3000);
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/me/drive/root/children?$top=3000"
        );
        assert_eq!(Endpoints::global().children("/", 3000), url);
    }

    #[test]
    fn test_nested_children() {
        let url = Endpoints::global().children("/test/sub dir", 3000);
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/me/drive/root:/test/sub%20dir:/children?$top=3000"
        );
    }

    #[test]
    fn test_china_cloud() {
        let url = Endpoints::for_cloud(true).children("/a", 10);
        assert_eq!(
            url.as_str(),
            "https://microsoftgraph.chinacloudapi.cn/v1.0/me/drive/root:/a:/children?$top=10"
        );
    }
}
