pub mod booking;
pub mod home;
pub mod system;
