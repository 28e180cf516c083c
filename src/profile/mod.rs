// src/profile/mod.rs

pub mod models;
pub mod store;


pub use models::{Mode, Profile, UserState};
pub use store::UserStore;
