use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::Service;
use crate::contract::model::{Ingredient, IngredientPatch, NewIngredient, RelationFilter};
use crate::domain::error::DomainError;

impl Service {
    #[instrument(name = "recipes.service.list_ingredients", skip(self), fields(owner = %owner))]
    pub async fn list_ingredients(
        &self,
        owner: Uuid,
        filter: RelationFilter,
    ) -> Result<Vec<Ingredient>, DomainError> {
        debug!(assigned_only = filter.assigned_only, "Listing ingredients");
        let ingredients = self
            .ingredients
            .list_ingredients(owner, filter.assigned_only)
            .await?;
        debug!(count = ingredients.len(), "Listed ingredients");
        Ok(ingredients)
    }

    #[instrument(name = "recipes.service.get_ingredient", skip(self), fields(owner = %owner, ingredient_id = %id))]
    pub async fn get_ingredient(&self, owner: Uuid, id: Uuid) -> Result<Ingredient, DomainError> {
        self.ingredients
            .find_ingredient(owner, id)
            .await?
            .ok_or_else(|| DomainError::ingredient_not_found(id))
    }

    #[instrument(name = "recipes.service.create_ingredient", skip(self), fields(owner = %owner))]
    pub async fn create_ingredient(
        &self,
        owner: Uuid,
        new_ingredient: NewIngredient,
    ) -> Result<Ingredient, DomainError> {
        let name = self.clean_name("name", &new_ingredient.name)?;
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            user_id: owner,
            name,
        };
        self.ingredients
            .insert_ingredient(ingredient.clone())
            .await?;
        info!(ingredient_id = %ingredient.id, "Created ingredient");
        Ok(ingredient)
    }

    #[instrument(name = "recipes.service.update_ingredient", skip(self), fields(owner = %owner, ingredient_id = %id))]
    pub async fn update_ingredient(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: IngredientPatch,
    ) -> Result<Ingredient, DomainError> {
        let mut ingredient = self.get_ingredient(owner, id).await?;
        if let Some(ref name) = patch.name {
            ingredient.name = self.clean_name("name", name)?;
        }
        self.ingredients
            .update_ingredient(ingredient.clone())
            .await?;
        info!("Updated ingredient");
        Ok(ingredient)
    }

    #[instrument(name = "recipes.service.delete_ingredient", skip(self), fields(owner = %owner, ingredient_id = %id))]
    pub async fn delete_ingredient(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        if !self.ingredients.delete_ingredient(owner, id).await? {
            return Err(DomainError::ingredient_not_found(id));
        }
        info!("Deleted ingredient");
        Ok(())
    }

    /// Ingredient counterpart of `resolve_tags`.
    pub(super) async fn resolve_ingredients(
        &self,
        owner: Uuid,
        names: &[String],
    ) -> Result<Vec<Ingredient>, DomainError> {
        let mut resolved: Vec<Ingredient> = Vec::with_capacity(names.len());
        for raw in names {
            let name = self.clean_name("ingredients", raw)?;
            if resolved.iter().any(|i| i.name == name) {
                continue;
            }
            let ingredient = match self.ingredients.find_ingredient_by_name(owner, &name).await? {
                Some(existing) => existing,
                None => Ingredient {
                    id: Uuid::new_v4(),
                    user_id: owner,
                    name,
                },
            };
            resolved.push(ingredient);
        }
        resolved.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(resolved)
    }
}
