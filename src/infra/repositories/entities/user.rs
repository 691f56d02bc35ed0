//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Role, User};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: String,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// A stored role outside the known set means the table was written by
/// something else; surface it instead of guessing.
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: Role = model.role.parse().map_err(|_| {
            AppError::internal(format!(
                "user {} has unknown role '{}'",
                model.id, model.role
            ))
        })?;

        Ok(User {
            id: model.id,
            name: model.name,
            email: model.email,
            role,
            created_at: model.created_at,
        })
    }
}
