//! SeaORM-backed implementation of the repository ports.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it can be built on a
//! pooled `DatabaseConnection`. Multi-statement writes run in a transaction and
//! touch only that transaction, which keeps single-connection pools (in-memory
//! SQLite) from deadlocking.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{AuthToken, Ingredient, Recipe, RecipeFilter, Tag, User};
use crate::domain::repo::{
    IngredientsRepository, RecipesRepository, TagsRepository, UsersRepository,
};
use crate::infra::storage::entity::{
    auth_token, ingredient, recipe, recipe_ingredient, recipe_tag, tag, user,
};
use crate::infra::storage::mapper::{price_to_cents, recipe_from_parts};

pub struct SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

// --- subqueries ---

fn owned_recipe_ids(owner: Uuid) -> SelectStatement {
    Query::select()
        .column(recipe::Column::Id)
        .from(recipe::Entity)
        .and_where(recipe::Column::UserId.eq(owner))
        .to_owned()
}

fn assigned_tag_ids(owner: Uuid) -> SelectStatement {
    Query::select()
        .column(recipe_tag::Column::TagId)
        .from(recipe_tag::Entity)
        .and_where(recipe_tag::Column::RecipeId.in_subquery(owned_recipe_ids(owner)))
        .to_owned()
}

fn assigned_ingredient_ids(owner: Uuid) -> SelectStatement {
    Query::select()
        .column(recipe_ingredient::Column::IngredientId)
        .from(recipe_ingredient::Entity)
        .and_where(recipe_ingredient::Column::RecipeId.in_subquery(owned_recipe_ids(owner)))
        .to_owned()
}

// --- relation loading and linking ---

/// Attach tags and ingredients to recipe rows with two batched queries per relation.
async fn load_relations<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<recipe::Model>,
) -> anyhow::Result<Vec<Recipe>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let tag_links = recipe_tag::Entity::find()
        .filter(recipe_tag::Column::RecipeId.is_in(ids.iter().copied()))
        .all(conn)
        .await
        .context("load recipe tag links failed")?;
    let tags: HashMap<Uuid, Tag> = if tag_links.is_empty() {
        HashMap::new()
    } else {
        tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_links.iter().map(|l| l.tag_id)))
            .all(conn)
            .await
            .context("load recipe tags failed")?
            .into_iter()
            .map(|m| (m.id, Tag::from(m)))
            .collect()
    };
    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for link in tag_links {
        if let Some(t) = tags.get(&link.tag_id) {
            tags_by_recipe.entry(link.recipe_id).or_default().push(t.clone());
        }
    }

    let ingredient_links = recipe_ingredient::Entity::find()
        .filter(recipe_ingredient::Column::RecipeId.is_in(ids.iter().copied()))
        .all(conn)
        .await
        .context("load recipe ingredient links failed")?;
    let ingredients: HashMap<Uuid, Ingredient> = if ingredient_links.is_empty() {
        HashMap::new()
    } else {
        ingredient::Entity::find()
            .filter(ingredient::Column::Id.is_in(ingredient_links.iter().map(|l| l.ingredient_id)))
            .all(conn)
            .await
            .context("load recipe ingredients failed")?
            .into_iter()
            .map(|m| (m.id, Ingredient::from(m)))
            .collect()
    };
    let mut ingredients_by_recipe: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
    for link in ingredient_links {
        if let Some(i) = ingredients.get(&link.ingredient_id) {
            ingredients_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(i.clone());
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut tags = tags_by_recipe.remove(&row.id).unwrap_or_default();
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            let mut ingredients = ingredients_by_recipe.remove(&row.id).unwrap_or_default();
            ingredients.sort_by(|a, b| a.name.cmp(&b.name));
            recipe_from_parts(row, tags, ingredients)
        })
        .collect())
}

/// Insert the recipe's tags and ingredients that are not stored yet, so they
/// commit or roll back together with the recipe.
async fn store_new_relations<C: ConnectionTrait>(conn: &C, r: &Recipe) -> anyhow::Result<()> {
    if !r.tags.is_empty() {
        let stored: HashSet<Uuid> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(r.tags.iter().map(|t| t.id)))
            .all(conn)
            .await
            .context("find recipe tags failed")?
            .into_iter()
            .map(|m| m.id)
            .collect();
        let fresh: Vec<tag::ActiveModel> = r
            .tags
            .iter()
            .filter(|t| !stored.contains(&t.id))
            .map(|t| tag::ActiveModel {
                id: Set(t.id),
                user_id: Set(t.user_id),
                name: Set(t.name.clone()),
            })
            .collect();
        if !fresh.is_empty() {
            tag::Entity::insert_many(fresh)
                .exec_without_returning(conn)
                .await
                .context("insert recipe tags failed")?;
        }
    }
    if !r.ingredients.is_empty() {
        let stored: HashSet<Uuid> = ingredient::Entity::find()
            .filter(ingredient::Column::Id.is_in(r.ingredients.iter().map(|i| i.id)))
            .all(conn)
            .await
            .context("find recipe ingredients failed")?
            .into_iter()
            .map(|m| m.id)
            .collect();
        let fresh: Vec<ingredient::ActiveModel> = r
            .ingredients
            .iter()
            .filter(|i| !stored.contains(&i.id))
            .map(|i| ingredient::ActiveModel {
                id: Set(i.id),
                user_id: Set(i.user_id),
                name: Set(i.name.clone()),
            })
            .collect();
        if !fresh.is_empty() {
            ingredient::Entity::insert_many(fresh)
                .exec_without_returning(conn)
                .await
                .context("insert recipe ingredients failed")?;
        }
    }
    Ok(())
}

async fn link_relations<C: ConnectionTrait>(conn: &C, r: &Recipe) -> anyhow::Result<()> {
    if !r.tags.is_empty() {
        recipe_tag::Entity::insert_many(r.tags.iter().map(|t| recipe_tag::ActiveModel {
            recipe_id: Set(r.id),
            tag_id: Set(t.id),
        }))
        .exec_without_returning(conn)
        .await
        .context("link recipe tags failed")?;
    }
    if !r.ingredients.is_empty() {
        recipe_ingredient::Entity::insert_many(r.ingredients.iter().map(|i| {
            recipe_ingredient::ActiveModel {
                recipe_id: Set(r.id),
                ingredient_id: Set(i.id),
            }
        }))
        .exec_without_returning(conn)
        .await
        .context("link recipe ingredients failed")?;
    }
    Ok(())
}

async fn unlink_relations<C: ConnectionTrait>(conn: &C, recipe_id: Uuid) -> anyhow::Result<()> {
    recipe_tag::Entity::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await
        .context("unlink recipe tags failed")?;
    recipe_ingredient::Entity::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await
        .context("unlink recipe ingredients failed")?;
    Ok(())
}

fn recipe_active_model(r: &Recipe) -> anyhow::Result<recipe::ActiveModel> {
    Ok(recipe::ActiveModel {
        id: Set(r.id),
        user_id: Set(r.user_id),
        title: Set(r.title.clone()),
        time_minutes: Set(r.time_minutes),
        price_cents: Set(price_to_cents(r.price)?),
        description: Set(r.description.clone()),
        link: Set(r.link.clone()),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    })
}

fn user_active_model(u: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        email: Set(u.email),
        name: Set(u.name),
        password_hash: Set(u.password_hash),
        is_active: Set(u.is_active),
        is_staff: Set(u.is_staff),
        is_superuser: Set(u.is_superuser),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
    }
}

/// Ids are random v4 uuids, so on `users` this is the email index.
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl<C> UsersRepository for SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, u: User) -> anyhow::Result<bool> {
        match user_active_model(u).insert(&self.conn).await {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e).context("insert user failed"),
        }
    }

    async fn update(&self, u: User) -> anyhow::Result<bool> {
        match user_active_model(u).update(&self.conn).await {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e).context("update user failed"),
        }
    }

    async fn find_token_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<AuthToken>> {
        let found = auth_token::Entity::find()
            .filter(auth_token::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("find_token_for_user failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert_token(&self, token: AuthToken) -> anyhow::Result<()> {
        let m = auth_token::ActiveModel {
            key: Set(token.key),
            user_id: Set(token.user_id),
            created_at: Set(token.created_at),
        };
        let _ = m.insert(&self.conn).await.context("insert token failed")?;
        Ok(())
    }

    async fn find_user_by_token(&self, key: &str) -> anyhow::Result<Option<User>> {
        let Some(token) = auth_token::Entity::find_by_id(key.to_string())
            .one(&self.conn)
            .await
            .context("find token failed")?
        else {
            return Ok(None);
        };
        self.find_by_id(token.user_id).await
    }
}

#[async_trait]
impl<C> TagsRepository for SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list_tags(&self, owner: Uuid, assigned_only: bool) -> anyhow::Result<Vec<Tag>> {
        let mut query = tag::Entity::find().filter(tag::Column::UserId.eq(owner));
        if assigned_only {
            query = query.filter(tag::Column::Id.in_subquery(assigned_tag_ids(owner)));
        }
        let rows = query
            .order_by_desc(tag::Column::Name)
            .all(&self.conn)
            .await
            .context("list_tags failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_tag(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Tag>> {
        let found = tag::Entity::find_by_id(id)
            .filter(tag::Column::UserId.eq(owner))
            .one(&self.conn)
            .await
            .context("find_tag failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_tag_by_name(&self, owner: Uuid, name: &str) -> anyhow::Result<Option<Tag>> {
        let found = tag::Entity::find()
            .filter(tag::Column::UserId.eq(owner))
            .filter(tag::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("find_tag_by_name failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert_tag(&self, t: Tag) -> anyhow::Result<()> {
        let m = tag::ActiveModel {
            id: Set(t.id),
            user_id: Set(t.user_id),
            name: Set(t.name),
        };
        let _ = m.insert(&self.conn).await.context("insert tag failed")?;
        Ok(())
    }

    async fn update_tag(&self, t: Tag) -> anyhow::Result<()> {
        let m = tag::ActiveModel {
            id: Set(t.id),
            user_id: Set(t.user_id),
            name: Set(t.name),
        };
        let _ = m.update(&self.conn).await.context("update tag failed")?;
        Ok(())
    }

    async fn delete_tag(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;

        let owned = Query::select()
            .column(tag::Column::Id)
            .from(tag::Entity)
            .and_where(tag::Column::Id.eq(id))
            .and_where(tag::Column::UserId.eq(owner))
            .to_owned();
        recipe_tag::Entity::delete_many()
            .filter(recipe_tag::Column::TagId.in_subquery(owned))
            .exec(&txn)
            .await
            .context("detach tag failed")?;
        let res = tag::Entity::delete_many()
            .filter(tag::Column::Id.eq(id))
            .filter(tag::Column::UserId.eq(owner))
            .exec(&txn)
            .await
            .context("delete tag failed")?;

        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl<C> IngredientsRepository for SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list_ingredients(
        &self,
        owner: Uuid,
        assigned_only: bool,
    ) -> anyhow::Result<Vec<Ingredient>> {
        let mut query = ingredient::Entity::find().filter(ingredient::Column::UserId.eq(owner));
        if assigned_only {
            query =
                query.filter(ingredient::Column::Id.in_subquery(assigned_ingredient_ids(owner)));
        }
        let rows = query
            .order_by_desc(ingredient::Column::Name)
            .all(&self.conn)
            .await
            .context("list_ingredients failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_ingredient(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Ingredient>> {
        let found = ingredient::Entity::find_by_id(id)
            .filter(ingredient::Column::UserId.eq(owner))
            .one(&self.conn)
            .await
            .context("find_ingredient failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_ingredient_by_name(
        &self,
        owner: Uuid,
        name: &str,
    ) -> anyhow::Result<Option<Ingredient>> {
        let found = ingredient::Entity::find()
            .filter(ingredient::Column::UserId.eq(owner))
            .filter(ingredient::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("find_ingredient_by_name failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert_ingredient(&self, i: Ingredient) -> anyhow::Result<()> {
        let m = ingredient::ActiveModel {
            id: Set(i.id),
            user_id: Set(i.user_id),
            name: Set(i.name),
        };
        let _ = m
            .insert(&self.conn)
            .await
            .context("insert ingredient failed")?;
        Ok(())
    }

    async fn update_ingredient(&self, i: Ingredient) -> anyhow::Result<()> {
        let m = ingredient::ActiveModel {
            id: Set(i.id),
            user_id: Set(i.user_id),
            name: Set(i.name),
        };
        let _ = m
            .update(&self.conn)
            .await
            .context("update ingredient failed")?;
        Ok(())
    }

    async fn delete_ingredient(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;

        let owned = Query::select()
            .column(ingredient::Column::Id)
            .from(ingredient::Entity)
            .and_where(ingredient::Column::Id.eq(id))
            .and_where(ingredient::Column::UserId.eq(owner))
            .to_owned();
        recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::IngredientId.in_subquery(owned))
            .exec(&txn)
            .await
            .context("detach ingredient failed")?;
        let res = ingredient::Entity::delete_many()
            .filter(ingredient::Column::Id.eq(id))
            .filter(ingredient::Column::UserId.eq(owner))
            .exec(&txn)
            .await
            .context("delete ingredient failed")?;

        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl<C> RecipesRepository for SeaOrmRecipesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list_recipes(
        &self,
        owner: Uuid,
        filter: &RecipeFilter,
    ) -> anyhow::Result<Vec<Recipe>> {
        let mut query = recipe::Entity::find().filter(recipe::Column::UserId.eq(owner));
        if !filter.tags.is_empty() {
            let linked = Query::select()
                .column(recipe_tag::Column::RecipeId)
                .from(recipe_tag::Entity)
                .and_where(recipe_tag::Column::TagId.is_in(filter.tags.iter().copied()))
                .to_owned();
            query = query.filter(recipe::Column::Id.in_subquery(linked));
        }
        if !filter.ingredients.is_empty() {
            let linked = Query::select()
                .column(recipe_ingredient::Column::RecipeId)
                .from(recipe_ingredient::Entity)
                .and_where(
                    recipe_ingredient::Column::IngredientId
                        .is_in(filter.ingredients.iter().copied()),
                )
                .to_owned();
            query = query.filter(recipe::Column::Id.in_subquery(linked));
        }
        let rows = query
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .all(&self.conn)
            .await
            .context("list_recipes failed")?;
        load_relations(&self.conn, rows).await
    }

    async fn find_recipe(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let Some(row) = recipe::Entity::find_by_id(id)
            .filter(recipe::Column::UserId.eq(owner))
            .one(&self.conn)
            .await
            .context("find_recipe failed")?
        else {
            return Ok(None);
        };
        Ok(load_relations(&self.conn, vec![row]).await?.pop())
    }

    async fn insert_recipe(&self, r: Recipe) -> anyhow::Result<()> {
        let model = recipe_active_model(&r)?;
        let txn = self.conn.begin().await.context("begin failed")?;
        let _ = model.insert(&txn).await.context("insert recipe failed")?;
        store_new_relations(&txn, &r).await?;
        link_relations(&txn, &r).await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn update_recipe(&self, r: Recipe) -> anyhow::Result<()> {
        let model = recipe_active_model(&r)?;
        let txn = self.conn.begin().await.context("begin failed")?;
        let _ = model.update(&txn).await.context("update recipe failed")?;
        unlink_relations(&txn, r.id).await?;
        store_new_relations(&txn, &r).await?;
        link_relations(&txn, &r).await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn delete_recipe(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        let found = recipe::Entity::find_by_id(id)
            .filter(recipe::Column::UserId.eq(owner))
            .one(&txn)
            .await
            .context("find_recipe failed")?;
        if found.is_none() {
            return Ok(false);
        }
        unlink_relations(&txn, id).await?;
        let res = recipe::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete recipe failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }
}
