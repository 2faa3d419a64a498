//! Client-side file acceptance: type and size checks done before any request is made.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::fs;
use std::io;
use std::path::Path;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted MIME types and the extensions that imply them.
pub const ACCEPTED_TYPES: &[(&str, &[&str])] = &[
    ("image/png", &["png"]),
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/tiff", &["tiff", "tif"]),
    ("image/webp", &["webp"]),
    ("application/pdf", &["pdf"]),
];

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File exceeds 10MB limit. Please use a smaller file.")]
    TooLarge,
    #[error("Unsupported format. Please use PNG, JPG, TIFF, WebP, or PDF.")]
    InvalidType,
    #[error("File could not be accepted. Please try another.")]
    Other,
}

/// A file the user picked, held in memory for upload, preview and retry.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Read and validate a file from disk. The MIME type is guessed from the extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadRejection> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(UploadRejection::Other)?
            .to_string();
        let mime = mime_for_name(&name).unwrap_or(FALLBACK_MIME).to_string();
        check_type(&name, Some(mime.as_str()))?;

        let metadata = fs::metadata(path).map_err(|e| {
            tracing::warn!("Could not stat {}: {}", path.display(), e);
            UploadRejection::Other
        })?;
        if !metadata.is_file() {
            return Err(UploadRejection::Other);
        }
        check_size(metadata.len())?;

        let bytes = fs::read(path).map_err(|e| {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("Could not read {}: {}", path.display(), e);
            }
            UploadRejection::Other
        })?;
        // The file may have grown between stat and read.
        check_size(bytes.len() as u64)?;

        Ok(Self { name, mime, bytes })
    }

    /// Decode and validate a file handed over by the webview as base64.
    pub fn from_base64(name: &str, mime: Option<&str>, data: &str) -> Result<Self, UploadRejection> {
        check_type(name, mime)?;
        // base64 inflates by 4/3; reject oversized payloads before decoding them.
        check_size((data.len() as u64 / 4 * 3).saturating_sub(2))?;
        let bytes = BASE64.decode(data.trim()).map_err(|e| {
            tracing::warn!("Invalid base64 upload for {}: {}", name, e);
            UploadRejection::Other
        })?;
        check_size(bytes.len() as u64)?;

        // Only canonical list entries are stored; the MIME ends up in the preview data URL.
        let mime = mime
            .and_then(accepted_mime)
            .or_else(|| mime_for_name(name))
            .unwrap_or(FALLBACK_MIME);
        Ok(Self {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Inline preview for images; PDFs and anything else get none.
    pub fn preview_url(&self) -> Option<String> {
        if !self.is_image() {
            return None;
        }
        Some(format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes)))
    }
}

/// Pick exactly one path out of a drop or picker selection.
pub fn single_path<P: AsRef<Path>>(paths: &[P]) -> Result<&Path, UploadRejection> {
    match paths {
        [only] => Ok(only.as_ref()),
        _ => Err(UploadRejection::Other),
    }
}

pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = extension_of(name)?;
    ACCEPTED_TYPES
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(mime, _)| *mime)
}

/// The canonical entry for `mime`, compared case-insensitively.
fn accepted_mime(mime: &str) -> Option<&'static str> {
    let mime = mime.trim();
    ACCEPTED_TYPES
        .iter()
        .map(|(accepted, _)| *accepted)
        .find(|accepted| accepted.eq_ignore_ascii_case(mime))
}

/// Every accepted extension, for file picker filters.
pub fn accepted_extensions() -> Vec<&'static str> {
    ACCEPTED_TYPES
        .iter()
        .flat_map(|(_, exts)| exts.iter().copied())
        .collect()
}

/// Accepted when either the MIME type or the extension is on the list.
pub fn check_type(name: &str, mime: Option<&str>) -> Result<(), UploadRejection> {
    if mime.and_then(accepted_mime).is_some() || mime_for_name(name).is_some() {
        Ok(())
    } else {
        Err(UploadRejection::InvalidType)
    }
}

pub fn check_size(len: u64) -> Result<(), UploadRejection> {
    if len > MAX_UPLOAD_BYTES {
        Err(UploadRejection::TooLarge)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_by_extension_or_mime() {
        assert!(check_type("scan.PNG", None).is_ok());
        assert!(check_type("scan.tif", None).is_ok());
        assert!(check_type("blob", Some("application/pdf")).is_ok());
        assert_eq!(check_type("setup.exe", None), Err(UploadRejection::InvalidType));
        assert_eq!(
            check_type("setup.exe", Some("application/x-msdownload")),
            Err(UploadRejection::InvalidType)
        );
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(check_size(MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(check_size(MAX_UPLOAD_BYTES + 1), Err(UploadRejection::TooLarge));
        assert_eq!(check_size(15 * 1024 * 1024), Err(UploadRejection::TooLarge));
    }

    #[test]
    fn rejection_messages_match_widget_copy() {
        assert_eq!(
            UploadRejection::TooLarge.to_string(),
            "File exceeds 10MB limit. Please use a smaller file."
        );
        assert_eq!(
            UploadRejection::InvalidType.to_string(),
            "Unsupported format. Please use PNG, JPG, TIFF, WebP, or PDF."
        );
    }

    #[test]
    fn type_is_checked_before_size() {
        let mut tmp = tempfile::Builder::new().suffix(".exe").tempfile().unwrap();
        tmp.write_all(&vec![0u8; 11 * 1024 * 1024]).unwrap();
        assert_eq!(
            SelectedFile::from_path(tmp.path()),
            Err(UploadRejection::InvalidType)
        );
    }

    #[test]
    fn oversized_image_is_rejected() {
        let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        tmp.write_all(&vec![0u8; 15 * 1024 * 1024]).unwrap();
        assert_eq!(SelectedFile::from_path(tmp.path()), Err(UploadRejection::TooLarge));
    }

    #[test]
    fn reads_valid_pdf_from_disk() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.7\n").unwrap();
        let file = SelectedFile::from_path(tmp.path()).unwrap();
        assert_eq!(file.mime, "application/pdf");
        assert_eq!(file.bytes, b"%PDF-1.7\n");
        assert!(file.preview_url().is_none());
    }

    #[test]
    fn missing_path_is_generic_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.png");
        assert_eq!(SelectedFile::from_path(&missing), Err(UploadRejection::Other));
    }

    #[test]
    fn image_gets_data_url_preview() {
        let file = SelectedFile::from_base64("receipt.png", Some("image/png"), "iVBORw0K").unwrap();
        assert_eq!(file.preview_url().unwrap(), "data:image/png;base64,iVBORw0K");
    }

    #[test]
    fn base64_without_mime_guesses_from_name() {
        let file = SelectedFile::from_base64("invoice.jpeg", None, "AAEC").unwrap();
        assert_eq!(file.mime, "image/jpeg");
        assert_eq!(file.bytes, vec![0, 1, 2]);
    }

    #[test]
    fn base64_mime_is_stored_in_canonical_form() {
        let file = SelectedFile::from_base64("scan.pdf", Some(" Image/PNG "), "AAEC").unwrap();
        assert_eq!(file.mime, "image/png");

        let file =
            SelectedFile::from_base64("a.png", Some("image/png\"><script>alert(1)</script>"), "AAEC")
                .unwrap();
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.preview_url().unwrap(), "data:image/png;base64,AAEC");

        let file = SelectedFile::from_base64("blob", Some("application/pdf"), "AAEC").unwrap();
        assert_eq!(file.mime, "application/pdf");
    }

    #[test]
    fn oversized_base64_is_rejected_before_decoding() {
        // 16 MiB of base64 text decodes to about 12 MiB.
        let data = "A".repeat(16 * 1024 * 1024);
        assert_eq!(
            SelectedFile::from_base64("a.png", None, &data),
            Err(UploadRejection::TooLarge)
        );
        // An invalid payload of the same size still reports the size, proving no decode ran.
        let junk = "%".repeat(16 * 1024 * 1024);
        assert_eq!(
            SelectedFile::from_base64("a.png", None, &junk),
            Err(UploadRejection::TooLarge)
        );
    }

    #[test]
    fn bad_base64_is_rejected() {
        assert_eq!(
            SelectedFile::from_base64("a.png", None, "%%%"),
            Err(UploadRejection::Other)
        );
    }

    #[test]
    fn selection_must_hold_one_file() {
        let none: [&str; 0] = [];
        assert_eq!(single_path(&none), Err(UploadRejection::Other));
        assert_eq!(single_path(&["a.png", "b.png"]), Err(UploadRejection::Other));
        assert_eq!(single_path(&["a.png"]).unwrap(), Path::new("a.png"));
    }
}
