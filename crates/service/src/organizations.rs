//! Organization registry.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::constants::{GENERAL_NAME_MAX_LENGTH, TAX_ID_MAX_LENGTH};
use common::types::Paging;
use models::organization;

use crate::errors::{db_err, ServiceError};
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_required_str, validate_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganization {
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOrganization {
    #[serde(default, deserialize_with = "double_option")]
    pub tax_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub legal_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub trade_name: Option<Option<String>>,
}

impl PatchOrganization {
    fn is_empty(&self) -> bool {
        self.tax_id.is_none() && self.legal_name.is_none() && self.trade_name.is_none()
    }
}

pub async fn list(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<(Vec<organization::Model>, Paging), ServiceError> {
    let query = organization::Entity::find().order_by_asc(organization::Column::LegalName);
    pagination::page(db, query, params).await
}

pub async fn get(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<organization::Model>, ServiceError> {
    organization::Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Load an organization or fail with 404. Organization-scoped modules call
/// this before touching any nested collection.
pub async fn require(
    db: &DatabaseConnection,
    id: i32,
) -> Result<organization::Model, ServiceError> {
    get(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("organization"))
}

pub async fn create(
    db: &DatabaseConnection,
    input: CreateOrganization,
) -> Result<organization::Model, ServiceError> {
    let mut errors = Vec::new();
    let tax_id = validate_required_str(
        "taxId",
        input.tax_id.as_deref(),
        StrRules::max(TAX_ID_MAX_LENGTH),
        &mut errors,
    );
    let legal_name = validate_required_str(
        "legalName",
        input.legal_name.as_deref(),
        StrRules::max(GENERAL_NAME_MAX_LENGTH),
        &mut errors,
    );
    let trade_name = validate_str(
        "tradeName",
        input.trade_name.as_deref(),
        StrRules::max(GENERAL_NAME_MAX_LENGTH),
        &mut errors,
    );
    if errors.is_empty() && tax_id_taken(db, &tax_id).await? {
        errors.push(FieldError::already_exists("taxId"));
    }
    ensure_valid(errors)?;

    let now = Utc::now();
    organization::ActiveModel {
        tax_id: Set(tax_id),
        legal_name: Set(legal_name),
        trade_name: Set(trade_name),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)
}

pub async fn patch(
    db: &DatabaseConnection,
    id: i32,
    input: PatchOrganization,
) -> Result<organization::Model, ServiceError> {
    let current = require(db, id).await?;

    if input.is_empty() {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    }

    let mut errors = Vec::new();
    let mut new_tax_id = None;
    if let Some(value) = &input.tax_id {
        let tax_id = validate_required_str(
            "taxId",
            value.as_deref(),
            StrRules::max(TAX_ID_MAX_LENGTH),
            &mut errors,
        );
        if errors.is_empty() && tax_id_taken(db, &tax_id).await? {
            errors.push(FieldError::already_exists("taxId"));
        }
        new_tax_id = Some(tax_id);
    }
    let mut new_legal_name = None;
    if let Some(value) = &input.legal_name {
        new_legal_name = Some(validate_required_str(
            "legalName",
            value.as_deref(),
            StrRules::max(GENERAL_NAME_MAX_LENGTH),
            &mut errors,
        ));
    }
    let mut new_trade_name = None;
    if let Some(value) = &input.trade_name {
        new_trade_name = Some(validate_str(
            "tradeName",
            value.as_deref(),
            StrRules::max(GENERAL_NAME_MAX_LENGTH),
            &mut errors,
        ));
    }
    ensure_valid(errors)?;

    let mut am: organization::ActiveModel = current.clone().into();
    let mut changed = false;
    if let Some(tax_id) = new_tax_id {
        if tax_id != current.tax_id {
            am.tax_id = Set(tax_id);
            changed = true;
        }
    }
    if let Some(legal_name) = new_legal_name {
        if legal_name != current.legal_name {
            am.legal_name = Set(legal_name);
            changed = true;
        }
    }
    if let Some(trade_name) = new_trade_name {
        if trade_name != current.trade_name {
            am.trade_name = Set(trade_name);
            changed = true;
        }
    }
    if !changed {
        return Ok(current);
    }
    am.last_modified_on = Set(Utc::now().into());
    am.update(db).await.map_err(db_err)
}

/// Hard delete. Nested structure rows go with it through FK cascades.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = organization::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

async fn tax_id_taken(db: &DatabaseConnection, tax_id: &str) -> Result<bool, ServiceError> {
    let existing = organization::Entity::find()
        .filter(organization::Column::TaxId.eq(tax_id))
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(existing.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn unique_tax_id() -> String {
        Uuid::new_v4().simple().to_string()[..16].to_string()
    }

    #[tokio::test]
    async fn organization_crud_and_patch_rules() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let tax_id = unique_tax_id();
        let created = create(
            &db,
            CreateOrganization {
                tax_id: Some(format!("  {tax_id}  ")),
                legal_name: Some("Acme Holdings Ltd".into()),
                trade_name: None,
            },
        )
        .await?;
        assert_eq!(created.tax_id, tax_id);
        assert_eq!(created.trade_name, None);

        // Duplicate tax id is rejected with a field error.
        let dup = create(
            &db,
            CreateOrganization {
                tax_id: Some(tax_id.clone()),
                legal_name: Some("Other Corp".into()),
                trade_name: None,
            },
        )
        .await;
        match dup {
            Err(ServiceError::Unprocessable(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field_name.as_deref(), Some("taxId"));
            }
            other => panic!("expected validation failure, got {:?}", other.map(|m| m.id)),
        }

        // Empty patch reports NO_CONTENT.
        let empty = patch(&db, created.id, PatchOrganization::default()).await;
        assert!(matches!(empty, Err(ServiceError::Unprocessable(_))));

        // Setting trade name, then clearing it with an explicit null.
        let with_trade = patch(
            &db,
            created.id,
            PatchOrganization {
                trade_name: Some(Some("Acme".into())),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(with_trade.trade_name.as_deref(), Some("Acme"));

        let cleared = patch(
            &db,
            created.id,
            PatchOrganization {
                trade_name: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(cleared.trade_name, None);

        assert!(delete(&db, created.id).await?);
        assert!(get(&db, created.id).await?.is_none());
        assert!(!delete(&db, created.id).await?);
        Ok(())
    }
}
