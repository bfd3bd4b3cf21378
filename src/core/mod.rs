pub mod handler;
pub mod notification;
pub mod response;
pub mod schema;

pub use crate::domain::event::{ApiEvent, ApiResponse};
pub use crate::domain::model::{ConsultationRequest, InvocationContext, Notification};
pub use crate::domain::ports::{ConfigProvider, Mailer};
pub use crate::utils::error::Result;
