pub mod requisition;
pub mod user;

pub use requisition::{Requisition, Status};
pub use user::{Role, User};
