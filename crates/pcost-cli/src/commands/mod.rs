pub mod run;
pub mod verify;
pub mod version;
