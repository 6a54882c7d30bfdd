//! Download requests handed to the host's download manager.

use serde::Serialize;
use tracing::warn;

pub const DEFAULT_DOWNLOADING_MESSAGE: &str = "Downloading";
pub const DEFAULT_LACK_PERMISSION_TO_DOWNLOAD_MESSAGE: &str = "Cannot download files as permission was denied. Please provide permission to write to storage, in order to download files.";

const FALLBACK_FILE_NAME: &str = "downloadfile";

/// User-facing strings shown around a download.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadMessages {
    downloading: Option<String>,
    lack_permission: Option<String>,
}

impl DownloadMessages {
    pub fn set_downloading(&mut self, message: Option<String>) {
        self.downloading = message;
    }

    pub fn set_lack_permission(&mut self, message: Option<String>) {
        self.lack_permission = message;
    }

    pub fn downloading(&self) -> &str {
        self.downloading
            .as_deref()
            .unwrap_or(DEFAULT_DOWNLOADING_MESSAGE)
    }

    pub fn lack_permission(&self) -> &str {
        self.lack_permission
            .as_deref()
            .unwrap_or(DEFAULT_LACK_PERMISSION_TO_DOWNLOAD_MESSAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    /// Notification text, `"Downloading <file>"`.
    pub description: String,
    pub user_agent: String,
    pub cookie: Option<String>,
    pub downloading_message: String,
    pub lack_permission_message: String,
}

impl DownloadRequest {
    /// Validate the URL and assemble the request. Malformed URLs are logged
    /// and yield `None`.
    pub fn build(
        url: &str,
        user_agent: &str,
        content_disposition: &str,
        mime_type: &str,
        cookie: Option<String>,
        messages: &DownloadMessages,
    ) -> Option<Self> {
        if let Err(e) = url::Url::parse(url) {
            warn!(url = %url, error = %e, "unsupported download URI, aborting download");
            return None;
        }
        let file_name = guess_file_name(url, content_disposition, mime_type);
        Some(Self {
            url: url.to_string(),
            description: format!("Downloading {file_name}"),
            file_name,
            mime_type: mime_type.to_string(),
            user_agent: user_agent.to_string(),
            cookie,
            downloading_message: messages.downloading().to_string(),
            lack_permission_message: messages.lack_permission().to_string(),
        })
    }
}

fn extension_for(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    if essence.is_empty() {
        return None;
    }
    mime_guess::get_mime_extensions_str(&essence.to_ascii_lowercase())
        .and_then(|extensions| extensions.first().copied())
}

fn disposition_file_name(content_disposition: &str) -> Option<String> {
    content_disposition.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        let name = value.rsplit(['/', '\\']).next().unwrap_or(value);
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Pick a file name: the `Content-Disposition` filename, else the last URL
/// path segment, else a fixed fallback; an extension is derived from the
/// MIME type when the name has none.
pub fn guess_file_name(url: &str, content_disposition: &str, mime_type: &str) -> String {
    let from_url = || {
        url::Url::parse(url).ok().and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
                .filter(|s| !s.is_empty())
                .map(|s| {
                    urlencoding::decode(&s)
                        .map(|d| d.into_owned())
                        .unwrap_or(s)
                })
        })
    };
    let name = disposition_file_name(content_disposition)
        .or_else(from_url)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());

    if name.contains('.') {
        return name;
    }
    let extension = extension_for(mime_type).unwrap_or("bin");
    format!("{name}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_content_disposition() {
        assert_eq!(
            guess_file_name(
                "https://x.test/dl?id=3",
                r#"attachment; filename="report.pdf""#,
                "application/pdf"
            ),
            "report.pdf"
        );
    }

    #[test]
    fn name_from_url_path() {
        assert_eq!(
            guess_file_name("https://x.test/files/My%20Doc.txt", "", "text/plain"),
            "My Doc.txt"
        );
    }

    #[test]
    fn extension_from_mime() {
        assert_eq!(guess_file_name("https://x.test/export", "", "image/png"), "export.png");
        assert_eq!(
            guess_file_name("https://x.test/", "", "application/x-unknown"),
            "downloadfile.bin"
        );
    }

    #[test]
    fn extension_from_full_mime_map() {
        assert_eq!(guess_file_name("https://x.test/export", "", "text/csv"), "export.csv");
        assert_eq!(
            guess_file_name("https://x.test/export", "", "text/csv; charset=utf-8"),
            "export.csv"
        );
        assert_eq!(
            guess_file_name(
                "https://x.test/sheet",
                "",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            "sheet.xlsx"
        );
    }

    #[test]
    fn disposition_path_is_stripped() {
        assert_eq!(
            guess_file_name("https://x.test/", "attachment; filename=../../etc/passwd", ""),
            "passwd.bin"
        );
    }

    #[test]
    fn build_rejects_malformed_url() {
        let msgs = DownloadMessages::default();
        assert!(DownloadRequest::build("not a url", "ua", "", "", None, &msgs).is_none());
    }

    #[test]
    fn build_fills_messages_and_cookie() {
        let mut msgs = DownloadMessages::default();
        msgs.set_downloading(Some("Fetching".into()));
        let req = DownloadRequest::build(
            "https://x.test/a.zip",
            "ua/1",
            "",
            "application/zip",
            Some("sid=1".into()),
            &msgs,
        )
        .unwrap();
        assert_eq!(req.file_name, "a.zip");
        assert_eq!(req.description, "Downloading a.zip");
        assert_eq!(req.downloading_message, "Fetching");
        assert_eq!(req.lack_permission_message, DEFAULT_LACK_PERMISSION_TO_DOWNLOAD_MESSAGE);
        assert_eq!(req.cookie.as_deref(), Some("sid=1"));
    }
}
