pub mod patient;
pub mod rating;
pub mod report;
pub mod roster;
