pub mod health;
pub mod portal;
pub mod wars;
