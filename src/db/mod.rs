pub mod requisitions;
pub mod users;
