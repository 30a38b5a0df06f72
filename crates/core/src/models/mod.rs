pub mod analytics;
pub mod entry;
pub mod fees;
pub mod journal;
pub mod lot;
pub mod money;
pub mod position;
pub mod settings;
