pub mod execute;
pub mod send_raw;
pub mod sign;
