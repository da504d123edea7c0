pub mod doctor;
pub mod export;
pub mod output;
