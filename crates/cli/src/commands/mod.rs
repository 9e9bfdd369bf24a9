pub mod chat;
pub mod doctor;
pub mod employees;
pub mod onboard;
