pub mod document;
pub mod help;
pub mod photo;
pub mod upload;

pub use document::handle_document;
pub use help::help;
pub use photo::handle_photo;
pub use upload::{process_upload, AppContext, UploadContext};
