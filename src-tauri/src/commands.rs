use crate::proxy::BackendStatus;
use crate::services::{Processor, SessionObserver};
use crate::session::SessionSnapshot;
use crate::upload::{self, SelectedFile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tauri::{AppHandle, Emitter, Manager, State};
use tauri_plugin_dialog::DialogExt;

pub const SESSION_EVENT: &str = "session-changed";

#[derive(Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionObserver for AppHandle {
    fn session_changed(&self, snapshot: &SessionSnapshot) {
        if let Err(e) = self.emit(SESSION_EVENT, snapshot) {
            tracing::warn!("Could not emit {}: {}", SESSION_EVENT, e);
        }
    }
}

#[tauri::command]
pub fn get_app_data_path(app: AppHandle) -> Result<String, String> {
    let path = app.path().app_data_dir().map_err(|e| e.to_string())?;
    path.to_str()
        .map(String::from)
        .ok_or_else(|| "Invalid path".to_string())
}

#[tauri::command]
pub fn get_app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}

/// Settings → open the folder holding `.env` (BACKEND_URL lives there).
#[tauri::command]
pub fn open_app_data_folder(app: AppHandle) -> Result<(), String> {
    let path = app.path().app_data_dir().map_err(|e| e.to_string())?;
    std::fs::create_dir_all(&path).map_err(|e| e.to_string())?;
    opener::open(&path).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_backend_url(state: State<Processor>) -> String {
    state.backend().config().backend_url.clone()
}

#[tauri::command]
pub async fn get_backend_status(state: State<'_, Processor>) -> Result<BackendStatus, String> {
    let backend = state.backend().clone();
    Ok(backend.health().await)
}

#[tauri::command]
pub fn get_session(state: State<Processor>) -> SessionSnapshot {
    state.snapshot()
}

/// Image preview for the current upload; the webview asks once per session generation.
#[tauri::command]
pub fn get_preview(state: State<Processor>) -> Option<String> {
    state.preview()
}

/// Native single-file picker filtered to accepted formats. The chosen file is submitted directly.
#[tauri::command]
pub fn pick_document(app: AppHandle) {
    let handle = app.clone();
    app.dialog()
        .file()
        .add_filter("Documents", &upload::accepted_extensions())
        .pick_file(move |picked| {
            let Some(picked) = picked else {
                return;
            };
            let path = match picked.into_path() {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Picker returned an unusable path: {}", e);
                    return;
                }
            };
            let processor = handle.state::<Processor>();
            let _ = processor.submit_paths(&[path]);
        });
}

#[tauri::command]
pub fn process_path(state: State<Processor>, path: String) -> Result<(), String> {
    state
        .submit_paths(&[PathBuf::from(path)])
        .map_err(|e| e.to_string())
}

/// Upload handed over by the webview (e.g. pasted or fetched blobs) as base64.
#[tauri::command]
pub fn process_upload(
    state: State<Processor>,
    file_name: String,
    mime_type: Option<String>,
    data: String,
) -> Result<(), String> {
    state
        .submit_base64(&file_name, mime_type.as_deref(), &data)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn retry_processing(state: State<Processor>) -> bool {
    state.retry()
}

#[tauri::command]
pub fn cancel_processing(state: State<Processor>) {
    state.reset();
}

#[tauri::command]
pub fn reset_session(state: State<Processor>) {
    state.reset();
}

#[tauri::command]
pub fn toggle_ocr_text(state: State<Processor>, expanded: bool) {
    state.set_ocr_expanded(expanded);
}

/// Check a path against the upload rules without submitting it.
#[tauri::command]
pub fn validate_document_file(path: String) -> ValidationResult {
    match SelectedFile::from_path(Path::new(&path)) {
        Ok(_) => ValidationResult {
            valid: true,
            error: None,
        },
        Err(rejection) => ValidationResult {
            valid: false,
            error: Some(rejection.to_string()),
        },
    }
}
