mod audio_format;
mod authenticated_user;
mod pipeline_stage;
mod upload_artifact;
mod user_account;

pub use audio_format::{AudioFormat, mime_for_filename};
pub use authenticated_user::AuthenticatedUser;
pub use pipeline_stage::PipelineStage;
pub use upload_artifact::UploadArtifact;
pub use user_account::{UserAccount, UserSummary};
