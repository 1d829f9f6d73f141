pub mod envelope;
pub mod item;
pub mod payload;
pub mod query;
pub mod sanitize;
pub mod upload;
pub mod validate;

pub use envelope::ApiResponse;
pub use item::{Coordinates, Item, ItemType};
pub use payload::{ItemDraft, ItemPatch, NewItem};
pub use query::{DEFAULT_LIMIT, DEFAULT_PAGE, ItemPage, ItemQuery, ListParams, Pagination};
pub use sanitize::{sanitize_text, sanitize_value};
pub use upload::{
    DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy, UploadRejected, UploadedFile, content_type_for,
    extension_for, generate_file_name, is_image_type, is_safe_file_name,
};
pub use validate::{
    ValidationErrors, check_sanitized_draft, check_sanitized_patch, validate_create,
    validate_update,
};
