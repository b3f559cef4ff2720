pub mod accounts;
pub mod follows;
pub mod likes;
pub mod posts;
