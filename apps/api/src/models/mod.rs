pub mod interview;
pub mod question;
pub mod score;
