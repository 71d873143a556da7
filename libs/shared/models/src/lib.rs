pub mod contact;
pub mod error;
pub mod response;
pub mod timestamp;

pub use contact::{ContactInfo, ContactPatch};
pub use error::AppError;
pub use response::ApiResponse;
