//! SeaORM entities. Relations are resolved by explicit queries in the
//! repository, so the `Relation` enums stay empty.

pub mod auth_token;
pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod recipe_tag;
pub mod tag;
pub mod user;
