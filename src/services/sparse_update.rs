//! Generic partial-update ("PATCH") merge shared by every resource.
//!
//! Each resource maps its request body onto columns with [`SparseUpdate::set`]
//! (plain copy) or [`SparseUpdate::set_with`] (validate/normalize first).
//! Absent fields are never touched, so nothing is implicitly nulled.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IdenStatic,
    IntoActiveModel, Value,
};

use crate::error::{AppError, AppResult};
use crate::services::identifier::ResourceId;

type ColumnOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Column;
type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;

pub struct SparseUpdate<A: ActiveModelTrait> {
    resource: &'static str,
    model: A,
    fields: Vec<String>,
}

impl<A> SparseUpdate<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    ModelOf<A>: IntoActiveModel<A>,
{
    /// Start an empty update targeting the row whose primary key is `id`.
    pub fn new(resource: &'static str, id_column: ColumnOf<A>, id: ResourceId) -> Self {
        let mut model = <A as ActiveModelTrait>::default();
        model.set(id_column, id.into());
        Self {
            resource,
            model,
            fields: Vec::new(),
        }
    }

    /// Write `value` to `column` if present.
    pub fn set<V: Into<Value>>(&mut self, column: ColumnOf<A>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.model.set(column, value.into());
            if !self.touches(column) {
                self.fields.push(column.as_str().to_owned());
            }
        }
        self
    }

    /// Run `transform` over `value` if present, then write the result.
    ///
    /// # Errors
    ///
    /// Propagates the transform's error; nothing is recorded in that case.
    pub fn set_with<R, V, F>(
        &mut self,
        column: ColumnOf<A>,
        value: Option<R>,
        transform: F,
    ) -> AppResult<&mut Self>
    where
        V: Into<Value>,
        F: FnOnce(R) -> AppResult<V>,
    {
        let value = value.map(transform).transpose()?;
        Ok(self.set(column, value))
    }

    /// Whether `column` has been written by this update.
    #[must_use]
    pub fn touches(&self, column: ColumnOf<A>) -> bool {
        self.fields.iter().any(|field| field == column.as_str())
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Write the collected fields and return the refreshed row.
    ///
    /// # Errors
    ///
    /// `NoFieldsProvided` if nothing was set, `NotFound` if no row has the id.
    pub async fn apply<C: ConnectionTrait>(self, db: &C) -> AppResult<ModelOf<A>> {
        if self.fields.is_empty() {
            return Err(AppError::NoFieldsProvided);
        }

        tracing::debug!(
            resource = self.resource,
            fields = ?self.fields,
            "Applying partial update"
        );

        let resource = self.resource;
        self.model.update(db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
                AppError::NotFound(format!("{resource} not found"))
            }
            other => AppError::Database(other),
        })
    }
}
