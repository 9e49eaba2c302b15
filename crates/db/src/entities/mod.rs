//! Database entities.

pub mod app_setting;
pub mod category;
pub mod deleted_category_log;
pub mod photo;
pub mod photo_comment;
pub mod user;

pub use app_setting::Entity as AppSetting;
pub use category::Entity as Category;
pub use deleted_category_log::Entity as DeletedCategoryLog;
pub use photo::Entity as Photo;
pub use photo_comment::Entity as PhotoComment;
pub use user::Entity as User;
