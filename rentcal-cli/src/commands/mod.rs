pub mod bookings;
pub mod init;
pub mod parse;
pub mod property;
pub mod sync;
