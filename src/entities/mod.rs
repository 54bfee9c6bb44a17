//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod promotion;

pub use promotion::{
    Column as PromotionColumn, Entity as Promotion, Model as PromotionModel, PromotionStatus,
};
