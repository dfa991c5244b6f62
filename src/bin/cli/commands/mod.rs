pub mod card;
pub mod deck;
pub mod review;
pub mod settings;
pub mod stats;
