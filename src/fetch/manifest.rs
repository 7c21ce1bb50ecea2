//! Manifest endpoints
//!
//! Both server endpoints are plain text:
//! - the version endpoint returns one line `MAJOR.MINOR.PATCH` or
//!   `MAJOR.MINOR.RELEASE.PATCH`
//! - the mods endpoint returns one file name per line, terminated by a blank
//!   line or end of body

use crate::error::FetchError;
use crate::fetch::Transport;

/// Split a manifest body into entries
///
/// Lines are trimmed and reading stops at the first blank line.
pub fn parse_manifest_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetch the mods manifest entries
pub async fn fetch_manifest(
    transport: &dyn Transport,
    url: &str,
) -> Result<Vec<String>, FetchError> {
    let body = transport.fetch_text(url).await?;
    Ok(parse_manifest_lines(&body))
}

/// Fetch the first line of the version endpoint, `None` if the body is empty
pub async fn fetch_version_line(
    transport: &dyn Transport,
    url: &str,
) -> Result<Option<String>, FetchError> {
    let body = transport.fetch_text(url).await?;
    Ok(parse_manifest_lines(&body).into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeTransport;

    #[test]
    fn test_parse_manifest_lines_eof_terminated() {
        let lines = parse_manifest_lines("a.jar\nb.jar\nc.jar");
        assert_eq!(lines, vec!["a.jar", "b.jar", "c.jar"]);
    }

    #[test]
    fn test_parse_manifest_lines_blank_terminated() {
        let lines = parse_manifest_lines("a.jar\nb.jar\n\nnot-a-mod.txt\n");
        assert_eq!(lines, vec!["a.jar", "b.jar"]);
    }

    #[test]
    fn test_parse_manifest_lines_crlf_and_spaces() {
        let lines = parse_manifest_lines("My Mod.jar \r\nother.jar\r\n");
        assert_eq!(lines, vec!["My Mod.jar", "other.jar"]);
    }

    #[test]
    fn test_parse_manifest_lines_empty() {
        assert!(parse_manifest_lines("").is_empty());
        assert!(parse_manifest_lines("\nA.jar").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_manifest() {
        let transport = FakeTransport::new().with_text("http://s/mods.txt", "A.jar\nB.jar\n");
        let lines = fetch_manifest(&transport, "http://s/mods.txt").await.unwrap();
        assert_eq!(lines, vec!["A.jar", "B.jar"]);
    }

    #[tokio::test]
    async fn test_fetch_version_line() {
        let transport = FakeTransport::new().with_text("http://s/version", "1.2.3\n");
        let line = fetch_version_line(&transport, "http://s/version").await.unwrap();
        assert_eq!(line.as_deref(), Some("1.2.3"));
    }

    #[tokio::test]
    async fn test_fetch_version_line_empty_body() {
        let transport = FakeTransport::new().with_text("http://s/version", "");
        let line = fetch_version_line(&transport, "http://s/version").await.unwrap();
        assert!(line.is_none());
    }

    #[tokio::test]
    async fn test_fetch_propagates_not_found() {
        let transport = FakeTransport::new();
        let err = fetch_manifest(&transport, "http://s/missing").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }
}
