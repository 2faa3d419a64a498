mod commands;
pub mod config;
pub mod logging;
pub mod proxy;
pub mod services;
pub mod session;
pub mod types;
pub mod upload;
pub mod views;

use config::AppConfig;
use proxy::BackendClient;
use services::Processor;
use std::sync::Arc;
use tauri::{DragDropEvent, Manager, WindowEvent};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logging::init_logging();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            // Users can drop a .env with BACKEND_URL into the app data folder (Settings → Open app data folder).
            let app_data_dir = app.path().app_data_dir().ok();
            let config = AppConfig::load(app_data_dir.as_deref())?;
            tracing::info!("Using backend at {}", config.backend_url);
            let backend = BackendClient::new(config)?;
            app.manage(Processor::new(backend, Arc::new(app.handle().clone())));
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::DragDrop(DragDropEvent::Drop { paths, .. }) = event {
                let processor = window.state::<Processor>();
                // Rejections are recorded in the session and shown under the drop zone.
                let _ = processor.submit_paths(paths);
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_data_path,
            commands::open_app_data_folder,
            commands::get_app_version,
            commands::get_backend_url,
            commands::get_backend_status,
            commands::get_session,
            commands::get_preview,
            commands::pick_document,
            commands::process_path,
            commands::process_upload,
            commands::retry_processing,
            commands::cancel_processing,
            commands::reset_session,
            commands::toggle_ocr_text,
            commands::validate_document_file,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
