use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::Service;
use crate::contract::model::{NewRecipe, Recipe, RecipeFilter, RecipePatch};
use crate::domain::error::DomainError;

/// `max_digits=5, decimal_places=2`: largest magnitude is 999.99.
const PRICE_MAX_DIGITS: u32 = 5;
const PRICE_DECIMAL_PLACES: u32 = 2;

/// Normalize a price to two decimal places, rejecting more precision or more
/// than five significant digits.
pub(crate) fn validate_price(price: Decimal) -> Result<Decimal, DomainError> {
    let normalized = price.normalize();
    if normalized.scale() > PRICE_DECIMAL_PLACES {
        return Err(DomainError::validation(
            "price",
            format!("Ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places."),
        ));
    }
    let limit = Decimal::from(10i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if normalized.abs() >= limit {
        return Err(DomainError::validation(
            "price",
            format!("Ensure that there are no more than {PRICE_MAX_DIGITS} digits in total."),
        ));
    }
    let mut scaled = normalized;
    scaled.rescale(PRICE_DECIMAL_PLACES);
    Ok(scaled)
}

impl Service {
    #[instrument(name = "recipes.service.list_recipes", skip(self), fields(owner = %owner))]
    pub async fn list_recipes(
        &self,
        owner: Uuid,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, DomainError> {
        debug!("Listing recipes");
        let recipes = self.recipes.list_recipes(owner, &filter).await?;
        debug!(count = recipes.len(), "Listed recipes");
        Ok(recipes)
    }

    #[instrument(name = "recipes.service.get_recipe", skip(self), fields(owner = %owner, recipe_id = %id))]
    pub async fn get_recipe(&self, owner: Uuid, id: Uuid) -> Result<Recipe, DomainError> {
        self.recipes
            .find_recipe(owner, id)
            .await?
            .ok_or_else(|| DomainError::recipe_not_found(id))
    }

    #[instrument(name = "recipes.service.create_recipe", skip(self, new_recipe), fields(owner = %owner))]
    pub async fn create_recipe(
        &self,
        owner: Uuid,
        new_recipe: NewRecipe,
    ) -> Result<Recipe, DomainError> {
        info!("Creating recipe");

        let title = self.clean_name("title", &new_recipe.title)?;
        let time_minutes = validate_time_minutes(new_recipe.time_minutes)?;
        let price = validate_price(new_recipe.price)?;
        let link = self.validate_link(&new_recipe.link)?;

        let tags = self.resolve_tags(owner, &new_recipe.tags).await?;
        let ingredients = self
            .resolve_ingredients(owner, &new_recipe.ingredients)
            .await?;

        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            time_minutes,
            price,
            description: new_recipe.description,
            link,
            tags,
            ingredients,
            created_at: now,
            updated_at: now,
        };
        self.recipes.insert_recipe(recipe.clone()).await?;

        info!(recipe_id = %recipe.id, "Created recipe");
        Ok(recipe)
    }

    #[instrument(name = "recipes.service.update_recipe", skip(self, patch), fields(owner = %owner, recipe_id = %id))]
    pub async fn update_recipe(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: RecipePatch,
    ) -> Result<Recipe, DomainError> {
        info!("Updating recipe");

        let mut recipe = self.get_recipe(owner, id).await?;

        if let Some(ref title) = patch.title {
            recipe.title = self.clean_name("title", title)?;
        }
        if let Some(minutes) = patch.time_minutes {
            recipe.time_minutes = validate_time_minutes(minutes)?;
        }
        if let Some(price) = patch.price {
            recipe.price = validate_price(price)?;
        }
        if let Some(description) = patch.description {
            recipe.description = description;
        }
        if let Some(ref link) = patch.link {
            recipe.link = self.validate_link(link)?;
        }
        if let Some(ref names) = patch.tags {
            recipe.tags = self.resolve_tags(owner, names).await?;
        }
        if let Some(ref names) = patch.ingredients {
            recipe.ingredients = self.resolve_ingredients(owner, names).await?;
        }
        recipe.updated_at = Utc::now();

        self.recipes.update_recipe(recipe.clone()).await?;
        info!("Successfully updated recipe");
        Ok(recipe)
    }

    #[instrument(name = "recipes.service.delete_recipe", skip(self), fields(owner = %owner, recipe_id = %id))]
    pub async fn delete_recipe(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        if !self.recipes.delete_recipe(owner, id).await? {
            return Err(DomainError::recipe_not_found(id));
        }
        info!("Deleted recipe");
        Ok(())
    }

    fn validate_link(&self, raw: &str) -> Result<String, DomainError> {
        let link = raw.trim();
        if link.chars().count() > self.config.max_name_length {
            return Err(DomainError::validation(
                "link",
                format!(
                    "Ensure this field has no more than {} characters.",
                    self.config.max_name_length
                ),
            ));
        }
        Ok(link.to_string())
    }
}

fn validate_time_minutes(minutes: i32) -> Result<i32, DomainError> {
    if minutes < 0 {
        return Err(DomainError::validation(
            "time_minutes",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(minutes)
}
