pub mod farms;
pub mod messages;
