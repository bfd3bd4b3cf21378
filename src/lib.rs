pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{DryRunMailer, SmtpMailer};
pub use config::{env::EnvConfig, toml_config::TomlConfig, MailSettings};
pub use core::handler::RequestHandler;
pub use domain::event::{ApiEvent, ApiResponse};
pub use domain::model::{ConsultationRequest, InvocationContext, Notification};
pub use domain::ports::{ConfigProvider, Mailer};
pub use utils::error::{ConsultationError, Result};
