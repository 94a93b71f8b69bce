//! Custom request extractors.

mod multipart;
mod validated_json;

pub use multipart::{CsvUpload, PersonnelMultipart};
pub use validated_json::ValidatedJson;
