//! Upload → request → render sequencing with a single in-flight request.

use crate::proxy::BackendClient;
use crate::session::{interpret, Session, SessionSnapshot};
use crate::upload::{single_path, SelectedFile, UploadRejection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tauri::async_runtime::JoinHandle;

/// Receives a snapshot after every state change. Called with the session lock
/// held, so snapshots arrive in the order the changes happened; implementations
/// must not call back into the `Processor`.
pub trait SessionObserver: Send + Sync {
    fn session_changed(&self, snapshot: &SessionSnapshot);
}

pub struct Processor {
    backend: BackendClient,
    session: Arc<Mutex<Session>>,
    /// Held while submitting so two uploads can't interleave begin/spawn.
    in_flight: Mutex<Option<JoinHandle<()>>>,
    observer: Arc<dyn SessionObserver>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Processor {
    pub fn new(backend: BackendClient, observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            backend,
            session: Arc::new(Mutex::new(Session::new())),
            in_flight: Mutex::new(None),
            observer,
        }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    /// Data URL for the current upload, if it is an image.
    pub fn preview(&self) -> Option<String> {
        lock(&self.session).preview().map(String::from)
    }

    /// Apply `change` and emit the resulting snapshot under the same guard.
    fn update<R>(&self, change: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = lock(&self.session);
        let out = change(&mut session);
        self.observer.session_changed(&session.snapshot());
        out
    }

    /// Start processing `file`, aborting whatever request is still pending.
    pub fn submit(&self, file: SelectedFile) {
        let mut in_flight = lock(&self.in_flight);
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        tracing::info!(file = %file.name, mime = %file.mime, "Processing document");
        let ticket = self.update(|session| session.begin(file.clone()));

        let backend = self.backend.clone();
        let session = Arc::clone(&self.session);
        let observer = Arc::clone(&self.observer);
        *in_flight = Some(tauri::async_runtime::spawn(async move {
            let response = backend.relay(Some(&file)).await;
            let outcome = interpret(response);
            match &outcome {
                Ok(result) => tracing::info!(
                    file = %file.name,
                    document_type = %result.document_type,
                    fields = result.extracted_fields.len(),
                    "Document processed"
                ),
                Err(message) => tracing::warn!(file = %file.name, "Processing failed: {}", message),
            }

            let mut session = lock(&session);
            if !session.finish(ticket, outcome) {
                tracing::debug!(file = %file.name, "Discarding stale response");
                return;
            }
            observer.session_changed(&session.snapshot());
        }));
    }

    fn reject(&self, rejection: UploadRejection) -> Result<(), UploadRejection> {
        tracing::info!("Upload rejected: {}", rejection);
        self.update(|session| session.reject(&rejection));
        Err(rejection)
    }

    pub fn submit_path(&self, path: &Path) -> Result<(), UploadRejection> {
        match SelectedFile::from_path(path) {
            Ok(file) => {
                self.submit(file);
                Ok(())
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Drop and picker selections; anything but exactly one file is rejected.
    pub fn submit_paths(&self, paths: &[PathBuf]) -> Result<(), UploadRejection> {
        match single_path(paths) {
            Ok(path) => self.submit_path(path),
            Err(rejection) => self.reject(rejection),
        }
    }

    pub fn submit_base64(
        &self,
        name: &str,
        mime: Option<&str>,
        data: &str,
    ) -> Result<(), UploadRejection> {
        match SelectedFile::from_base64(name, mime, data) {
            Ok(file) => {
                self.submit(file);
                Ok(())
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Resubmit the last accepted file. Returns `false` if there is none.
    pub fn retry(&self) -> bool {
        let Some(file) = lock(&self.session).retry_file() else {
            return false;
        };
        self.submit(file);
        true
    }

    /// Abort any pending request and clear the page.
    pub fn reset(&self) {
        let mut in_flight = lock(&self.in_flight);
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
        self.update(Session::reset);
        drop(in_flight);
    }

    pub fn set_ocr_expanded(&self, expanded: bool) {
        self.update(|session| session.set_ocr_expanded(expanded));
    }
}
