pub mod vault;

pub use vault::{ReceivedUpload, RetainedFile, UploadVault, discard};
