pub mod comment;
pub mod follow;
pub mod group;
pub mod like;
pub mod post;
pub mod user;
