pub mod client;
pub mod error;
pub mod extract;
pub mod models;
pub mod scope;

pub use client::{ApiClient, LoadingCallback};
pub use error::ClientError;
pub use models::{AuthOutcome, PageFetch, PromptReply, ReportDetails, ReportRow, WpPage};
pub use scope::TaskScope;
