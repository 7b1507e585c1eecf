//! Репозитории ресурсов поверх обобщённого [`TypedRepository`].

mod auth;
mod category;
mod comment;
mod image;
mod post;
mod typed;

pub use auth::AuthRepository;
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use image::ImageRepository;
pub use post::{AdminPostFilter, PostRepository};
pub use typed::TypedRepository;
