pub mod cookie;
pub mod doctor;
pub mod download;
pub mod history;
pub mod open;
pub mod settings;
pub mod tags;
