//! Project file uploads stored on local disk.
//!
//! Layout: `<upload_dir>/projects/<projectId>/<type|files>/<epochMillis>_<name>`.
//! Path components taken from the request are sanitized before use.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::AppError;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// A file part received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Parsed multipart fields, before validation.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
    pub project_id: Option<String>,
    pub kind: Option<String>,
}

/// Where and how uploads are written.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub root: PathBuf,
    pub public_base_url: String,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUpload {
    pub url: String,
    pub file_name: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub sha256: String,
}

fn unsafe_chars() -> Result<&'static Regex, AppError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+"))
        .as_ref()
        .map_err(|e| AppError::Internal(format!("filename pattern: {e}")))
}

/// Make a single safe path component out of client-supplied text.
pub fn sanitize_component(raw: &str) -> Result<String, AppError> {
    let cleaned = unsafe_chars()?.replace_all(raw.trim(), "_");
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        Ok("_".to_string())
    } else {
        Ok(cleaned.to_string())
    }
}

/// Allowed content types for a known upload kind; `None` for free-form kinds.
fn allowed_types(kind: &str) -> Option<&'static [&'static str]> {
    match kind {
        "image" => Some(IMAGE_TYPES),
        "document" => Some(DOCUMENT_TYPES),
        _ => None,
    }
}

/// Check the request against the upload rules, returning the pieces to store.
pub fn validate(
    request: UploadRequest,
    max_bytes: usize,
) -> Result<(UploadedFile, String, Option<String>), AppError> {
    let project_id = request.project_id.filter(|p| !p.trim().is_empty());
    let (Some(file), Some(project_id)) = (request.file, project_id) else {
        return Err(AppError::Validation(
            "File and project ID are required".to_string(),
        ));
    };

    if file.bytes.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "File size must be less than {}MB",
            max_bytes / (1024 * 1024)
        )));
    }

    let kind = request.kind.filter(|k| !k.trim().is_empty());
    if let Some(kind) = kind.as_deref() {
        if let Some(allowed) = allowed_types(kind) {
            if !allowed.contains(&file.content_type.as_str()) {
                return Err(AppError::Validation(format!("Invalid file type for {kind}")));
            }
        }
    }

    Ok((file, project_id, kind))
}

/// Validate and write an upload, returning its public descriptor.
pub async fn store(
    settings: &UploadSettings,
    request: UploadRequest,
    now: DateTime<Utc>,
) -> Result<StoredUpload, AppError> {
    let (file, project_id, kind) = validate(request, settings.max_bytes)?;

    let folder = kind.as_deref().unwrap_or("files");
    let relative: PathBuf = [
        "projects".to_string(),
        sanitize_component(&project_id)?,
        sanitize_component(folder)?,
        format!(
            "{}_{}",
            now.timestamp_millis(),
            sanitize_component(&file.file_name)?
        ),
    ]
    .iter()
    .collect();

    let target = settings.root.join(&relative);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, &file.bytes).await?;

    let sha256 = hex::encode(Sha256::digest(&file.bytes));
    tracing::info!(
        project_id = %project_id,
        path = %target.display(),
        size = file.bytes.len(),
        "Upload stored"
    );

    Ok(StoredUpload {
        url: public_url(&settings.public_base_url, &relative),
        file_name: file.file_name,
        size: file.bytes.len(),
        content_type: file.content_type,
        uploaded_at: now,
        sha256,
    })
}

fn public_url(base: &str, relative: &Path) -> String {
    let tail: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("{}/{}", base.trim_end_matches('/'), tail.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![7u8; size],
        }
    }

    fn request(kind: Option<&str>, f: UploadedFile) -> UploadRequest {
        UploadRequest {
            file: Some(f),
            project_id: Some("p1".to_string()),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn sanitize_strips_traversal() {
        assert_eq!(sanitize_component("../../etc/passwd").unwrap(), "_.._etc_passwd");
        assert_eq!(sanitize_component("..").unwrap(), "_");
        assert_eq!(
            sanitize_component("site photo (1).png").unwrap(),
            "site_photo_1_.png"
        );
    }

    #[test]
    fn missing_file_or_project_rejected() {
        let err = validate(UploadRequest::default(), 1024).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: File and project ID are required"
        );

        let blank_project = UploadRequest {
            file: Some(file("a.png", "image/png", 1)),
            project_id: Some("  ".to_string()),
            kind: None,
        };
        assert!(validate(blank_project, 1024).is_err());
    }

    #[test]
    fn oversize_rejected() {
        let max = 10 * 1024 * 1024;
        let err = validate(request(None, file("big.bin", "application/octet-stream", max + 1)), max)
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: File size must be less than 10MB");
    }

    #[test]
    fn content_type_checked_for_known_kinds() {
        let err = validate(request(Some("image"), file("a.pdf", "application/pdf", 10)), 1024)
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Invalid file type for image");

        assert!(validate(request(Some("document"), file("a.pdf", "application/pdf", 10)), 1024).is_ok());
        assert!(validate(request(Some("video"), file("a.mp4", "video/mp4", 10)), 1024).is_ok());
    }

    #[tokio::test]
    async fn store_writes_under_project_folder() {
        let dir = tempfile::tempdir().unwrap();
        let settings = UploadSettings {
            root: dir.path().to_path_buf(),
            public_base_url: "/files/".to_string(),
            max_bytes: 1024,
        };
        let now = DateTime::from_timestamp_millis(1_722_000_000_000).unwrap();
        let stored = store(&settings, request(Some("image"), file("reef.png", "image/png", 4)), now)
            .await
            .unwrap();

        assert_eq!(stored.url, "/files/projects/p1/image/1722000000000_reef.png");
        assert_eq!(stored.size, 4);
        assert_eq!(stored.sha256.len(), 64);

        let on_disk = dir
            .path()
            .join("projects/p1/image/1722000000000_reef.png");
        assert_eq!(std::fs::read(on_disk).unwrap(), vec![7u8; 4]);
    }
}
