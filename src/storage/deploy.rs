use std::path::Path;
use tracing::debug;
use url::Url;

use super::client::Transport;
use super::error::Result;
use super::signer::InvocationSigner;
use super::target::{relative_name, target_url};
use super::upload::upload_file;
use super::walk::{FsEntry, walk_entries};

/// Upload every file below `source` into the collection
///
/// Returns the number of files uploaded.
pub async fn put_website<S, T>(
    source: &Path,
    collection: &Url,
    signer: &S,
    transport: &T,
) -> Result<usize>
where
    S: InvocationSigner,
    T: Transport,
{
    deploy(source, walk_entries(source), collection, signer, transport).await
}

/// Upload the files among `entries`, one at a time, in order
///
/// The first error of any kind stops the run; nothing after it is
/// attempted.
pub async fn deploy<I, S, T>(
    source: &Path,
    entries: I,
    collection: &Url,
    signer: &S,
    transport: &T,
) -> Result<usize>
where
    I: IntoIterator<Item = Result<FsEntry>>,
    S: InvocationSigner,
    T: Transport,
{
    let mut uploaded = 0;

    for entry in entries {
        let entry = entry?;
        if entry.is_dir {
            debug!("entering {}", entry.path.display());
            continue;
        }

        let name = relative_name(source, &entry.path)?;
        let target = target_url(collection, &name)?;
        debug!("uploading {} to {}", entry.path.display(), target);

        upload_file(transport, signer, &entry.path, &target).await?;
        uploaded += 1;
    }

    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::error::StorageError;
    use crate::storage::signer::Ed25519Signer;
    use crate::storage::testing::RecordingTransport;
    use reqwest::StatusCode;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img/logo.png"), [0x89u8, b'P', b'N', b'G']).unwrap();
        dir
    }

    fn collection() -> Url {
        Url::parse("https://example.org/site/").unwrap()
    }

    fn signer() -> Ed25519Signer {
        Ed25519Signer::from_seed([42u8; 32])
    }

    #[tokio::test]
    async fn test_put_website_uploads_every_file() {
        let dir = site();
        let transport = RecordingTransport::always(StatusCode::CREATED);

        let count = put_website(dir.path(), &collection(), &signer(), &transport)
            .await
            .unwrap();

        assert_eq!(count, 2);
        let sent = transport.requests();
        let mut seen: Vec<(String, String)> = sent
            .iter()
            .map(|r| (r.url.clone(), r.content_type.clone()))
            .collect();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                (
                    "https://example.org/site/img/logo.png".to_string(),
                    "image/png".to_string()
                ),
                (
                    "https://example.org/site/index.html".to_string(),
                    "text/html".to_string()
                ),
            ]
        );
        assert!(sent.iter().all(|r| r.method == "PUT"));
        assert!(
            sent.iter()
                .all(|r| r.headers.contains_key("authorization") && r.headers.contains_key("digest"))
        );
    }

    #[tokio::test]
    async fn test_put_website_forces_https() {
        let dir = site();
        let transport = RecordingTransport::always(StatusCode::CREATED);
        let insecure = Url::parse("http://example.org/site/").unwrap();

        put_website(dir.path(), &insecure, &signer(), &transport)
            .await
            .unwrap();

        assert!(
            transport
                .requests()
                .iter()
                .all(|r| r.url.starts_with("https://example.org/site/"))
        );
    }

    #[tokio::test]
    async fn test_unauthorized_stops_the_run() {
        let dir = site();
        let transport = RecordingTransport::always(StatusCode::UNAUTHORIZED);

        let err = put_website(dir.path(), &collection(), &signer(), &transport)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Unauthorized { .. }));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_status_stops_the_run() {
        let dir = site();
        fs::write(dir.path().join("z.txt"), "last").unwrap();
        let transport = RecordingTransport::with_statuses(
            vec![StatusCode::CREATED, StatusCode::OK],
            StatusCode::CREATED,
        );

        let err = put_website(dir.path(), &collection(), &signer(), &transport)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::UnexpectedStatus { status: StatusCode::OK, .. }
        ));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_walk_error_stops_the_run() {
        let dir = site();
        let transport = RecordingTransport::always(StatusCode::CREATED);

        // A walk that fails on an unreadable directory after one file
        let mut entries: Vec<Result<FsEntry>> = walk_entries(dir.path()).take(2).collect();
        let unreadable = walk_entries(&dir.path().join("locked")).next().unwrap();
        entries.push(unreadable);
        entries.push(Ok(FsEntry {
            path: dir.path().join("index.html"),
            is_dir: false,
        }));

        let err = deploy(dir.path(), entries, &collection(), &signer(), &transport)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Walk { .. }));
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://example.org/site/img/logo.png");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_directory_stops_the_run() {
        use std::os::unix::fs::PermissionsExt;

        // Walk order: img, img/logo.png, in-locked, index.html
        let dir = site();
        let locked = dir.path().join("in-locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret.txt"), "hidden").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let transport = RecordingTransport::always(StatusCode::CREATED);
        let result = put_website(dir.path(), &collection(), &signer(), &transport).await;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(StorageError::Walk { .. })));
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://example.org/site/img/logo.png");
    }

    #[tokio::test]
    async fn test_empty_source_uploads_nothing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        let transport = RecordingTransport::always(StatusCode::CREATED);

        let count = put_website(dir.path(), &collection(), &signer(), &transport)
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(transport.requests().is_empty());
    }
}
