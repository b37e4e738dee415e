//! Employee image repository.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::employee_images;

/// Input for recording an uploaded image.
#[derive(Debug, Clone)]
pub struct CreateImageInput {
    /// Employee the image belongs to.
    pub employee_id: String,
    /// Public URL.
    pub url: String,
    /// Object storage key.
    pub storage_key: String,
    /// MIME type.
    pub content_type: String,
}

/// Image repository.
#[derive(Debug, Clone)]
pub struct ImageRepository {
    db: DatabaseConnection,
}

impl ImageRepository {
    /// Creates a new image repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an uploaded image.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateImageInput,
    ) -> Result<employee_images::Model, DbErr> {
        employee_images::ActiveModel {
            employee_id: Set(input.employee_id),
            url: Set(input.url),
            storage_key: Set(input.storage_key),
            content_type: Set(input.content_type),
            uploaded_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// The most recent image of an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_profile(
        &self,
        employee_id: &str,
    ) -> Result<Option<employee_images::Model>, DbErr> {
        employee_images::Entity::find()
            .filter(employee_images::Column::EmployeeId.eq(employee_id))
            .order_by_desc(employee_images::Column::UploadedAt)
            .order_by_desc(employee_images::Column::Id)
            .one(&self.db)
            .await
    }
}

/// Newest image URL of each listed employee. Employees without an image are
/// absent from the map.
pub(crate) async fn newest_urls<C: ConnectionTrait>(
    db: &C,
    employee_ids: &[String],
) -> Result<HashMap<String, String>, DbErr> {
    if employee_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = employee_images::Entity::find()
        .filter(employee_images::Column::EmployeeId.is_in(employee_ids.iter().cloned()))
        .order_by_desc(employee_images::Column::UploadedAt)
        .order_by_desc(employee_images::Column::Id)
        .all(db)
        .await?;

    let mut urls = HashMap::new();
    for row in rows {
        urls.entry(row.employee_id).or_insert(row.url);
    }
    Ok(urls)
}
