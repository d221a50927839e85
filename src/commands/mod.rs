pub mod create;
pub mod doctor;
pub mod scaffold;
pub mod templates;
