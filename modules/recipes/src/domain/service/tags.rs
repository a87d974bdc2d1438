use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::Service;
use crate::contract::model::{NewTag, RelationFilter, Tag, TagPatch};
use crate::domain::error::DomainError;

impl Service {
    #[instrument(name = "recipes.service.list_tags", skip(self), fields(owner = %owner))]
    pub async fn list_tags(
        &self,
        owner: Uuid,
        filter: RelationFilter,
    ) -> Result<Vec<Tag>, DomainError> {
        debug!(assigned_only = filter.assigned_only, "Listing tags");
        let tags = self.tags.list_tags(owner, filter.assigned_only).await?;
        debug!(count = tags.len(), "Listed tags");
        Ok(tags)
    }

    #[instrument(name = "recipes.service.get_tag", skip(self), fields(owner = %owner, tag_id = %id))]
    pub async fn get_tag(&self, owner: Uuid, id: Uuid) -> Result<Tag, DomainError> {
        self.tags
            .find_tag(owner, id)
            .await?
            .ok_or_else(|| DomainError::tag_not_found(id))
    }

    #[instrument(name = "recipes.service.create_tag", skip(self), fields(owner = %owner))]
    pub async fn create_tag(&self, owner: Uuid, new_tag: NewTag) -> Result<Tag, DomainError> {
        let name = self.clean_name("name", &new_tag.name)?;
        let tag = Tag {
            id: Uuid::new_v4(),
            user_id: owner,
            name,
        };
        self.tags.insert_tag(tag.clone()).await?;
        info!(tag_id = %tag.id, "Created tag");
        Ok(tag)
    }

    #[instrument(name = "recipes.service.update_tag", skip(self), fields(owner = %owner, tag_id = %id))]
    pub async fn update_tag(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TagPatch,
    ) -> Result<Tag, DomainError> {
        let mut tag = self.get_tag(owner, id).await?;
        if let Some(ref name) = patch.name {
            tag.name = self.clean_name("name", name)?;
        }
        self.tags.update_tag(tag.clone()).await?;
        info!("Updated tag");
        Ok(tag)
    }

    #[instrument(name = "recipes.service.delete_tag", skip(self), fields(owner = %owner, tag_id = %id))]
    pub async fn delete_tag(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        if !self.tags.delete_tag(owner, id).await? {
            return Err(DomainError::tag_not_found(id));
        }
        info!("Deleted tag");
        Ok(())
    }

    /// Resolve names to the owner's tags. Missing ones get a fresh id and are
    /// stored by the recipe write. Duplicate names collapse to one tag; the
    /// result is sorted by name like a loaded recipe's.
    pub(super) async fn resolve_tags(
        &self,
        owner: Uuid,
        names: &[String],
    ) -> Result<Vec<Tag>, DomainError> {
        let mut resolved: Vec<Tag> = Vec::with_capacity(names.len());
        for raw in names {
            let name = self.clean_name("tags", raw)?;
            if resolved.iter().any(|t| t.name == name) {
                continue;
            }
            let tag = match self.tags.find_tag_by_name(owner, &name).await? {
                Some(existing) => existing,
                None => Tag {
                    id: Uuid::new_v4(),
                    user_id: owner,
                    name,
                },
            };
            resolved.push(tag);
        }
        resolved.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(resolved)
    }
}
