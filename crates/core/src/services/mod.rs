//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod category;
pub mod comment;
pub mod location;
pub mod media;
pub mod photo;
pub mod photo_storage;
pub mod settings;

pub use auth::{
    AuthResponse, AuthService, Claims, Identity, LoginInput, RegisterInput, TokenError, UserView,
};
pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use comment::{CommentService, CreateCommentInput, normalize_ip};
pub use location::{LocationNode, LocationService};
pub use media::{MediaService, PhotoVariants, RenderedVariant};
pub use photo::{
    CreatePhotoInput, ListPhotosQuery, PhotoListing, PhotoService, UpdatePhotoInput,
};
pub use photo_storage::{PhotoStorage, StorageCleanup, StoredPhoto};
pub use settings::SettingsService;
