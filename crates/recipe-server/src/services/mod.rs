//! External services

pub mod mealdb;

pub use mealdb::MealDbClient;
