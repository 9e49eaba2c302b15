//! Database repositories.

mod category;
mod comment;
mod photo;
mod settings;
mod user;

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use photo::{
    CategoryView, ListingSql, LocationRow, PhotoFilter, PhotoPage, PhotoRepository,
    select_columns,
};
pub use settings::SettingsRepository;
pub use user::UserRepository;
