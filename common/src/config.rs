use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{env, fs};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub visitor_log_host: String,
    pub visitor_log_port: u16,
    pub request_timeout_secs: u64,
    pub kiosk_user_id: i64,
    pub kiosk_office_id: i64,
    pub kiosk_department_id: i64,
    pub kiosk_department_name: String,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let project_name = env::var("PROJECT_NAME").unwrap_or_else(|_| "visitor-kiosk".into());
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".into());
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/kiosk.log".into());
            let visitor_log_host =
                env::var("VISITOR_LOG_HOST").unwrap_or_else(|_| "127.0.0.1".into());
            let visitor_log_port = env::var("VISITOR_LOG_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080);
            let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30);

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }
            let kiosk_user_id = env::var("KIOSK_USER_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .expect("KIOSK_USER_ID must be set");
            let kiosk_office_id = env::var("KIOSK_OFFICE_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .expect("KIOSK_OFFICE_ID must be set");
            let kiosk_department_id = env::var("KIOSK_DEPARTMENT_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .expect("KIOSK_DEPARTMENT_ID must be set");
            let kiosk_department_name =
                env::var("KIOSK_DEPARTMENT_NAME").unwrap_or_else(|_| "Front Desk".into());

            Config {
                project_name,
                log_level,
                log_file,
                visitor_log_host,
                visitor_log_port,
                request_timeout_secs,
                kiosk_user_id,
                kiosk_office_id,
                kiosk_department_id,
                kiosk_department_name,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }

    /// Base URL of the visitor-log service, e.g. `http://127.0.0.1:8080/api`.
    pub fn visitor_log_base_url(&self) -> String {
        format!(
            "http://{}:{}/api",
            self.visitor_log_host, self.visitor_log_port
        )
    }
}
