pub mod like;
pub mod post;
pub mod share;
pub mod user;

pub use like::Entity as LikeEntity;
pub use post::Entity as PostEntity;
pub use share::Entity as ShareEntity;
pub use user::Entity as UserEntity;
