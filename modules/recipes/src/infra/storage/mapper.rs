use anyhow::Context;
use rust_decimal::Decimal;

use crate::contract::model::{AuthToken, Ingredient, Recipe, Tag, User};
use crate::infra::storage::entity::{auth_token, ingredient, recipe, tag, user};

const PRICE_SCALE: u32 = 2;

pub fn price_to_cents(price: Decimal) -> anyhow::Result<i64> {
    let mut scaled = price;
    scaled.rescale(PRICE_SCALE);
    i64::try_from(scaled.mantissa()).context("price out of range")
}

pub fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            name: m.name,
            password_hash: m.password_hash,
            is_active: m.is_active,
            is_staff: m.is_staff,
            is_superuser: m.is_superuser,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<auth_token::Model> for AuthToken {
    fn from(m: auth_token::Model) -> Self {
        Self {
            key: m.key,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

impl From<tag::Model> for Tag {
    fn from(m: tag::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
        }
    }
}

impl From<ingredient::Model> for Ingredient {
    fn from(m: ingredient::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
        }
    }
}

/// Assemble a recipe from its row and already-loaded relations.
pub fn recipe_from_parts(m: recipe::Model, tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Recipe {
    Recipe {
        id: m.id,
        user_id: m.user_id,
        title: m.title,
        time_minutes: m.time_minutes,
        price: cents_to_price(m.price_cents),
        description: m.description,
        link: m.link,
        tags,
        ingredients,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}
