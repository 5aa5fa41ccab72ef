//! System user accounts.
//!
//! Passwords are stored as Argon2 hashes and never serialized back out.
//! Blocking is an administrative on/off switch; a lockout is cleared through
//! the `unlock` flag.

use std::collections::HashMap;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::Utc;
use rand::rngs::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use common::constants::{EMAIL_MAX_LENGTH, GENERAL_NAME_MAX_LENGTH, PASSWORD_MIN_LENGTH};
use common::types::Paging;
use models::{system_role, system_user, system_user_role};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::{db_err, ServiceError};
use crate::pagination::{self, PageParams};
use crate::validation::{
    double_option, ensure_valid, validate_required_str, FieldError, StrRules,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRef {
    pub id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<RoleRef>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchUser {
    #[serde(default, deserialize_with = "double_option")]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub password: Option<Option<String>>,
    pub is_blocked: Option<bool>,
    pub unlock: Option<bool>,
}

impl PatchUser {
    fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.is_blocked.is_none()
            && self.unlock.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub id: i32,
    pub name: String,
}

/// User as exposed over the wire. No password material.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub blocked_on: Option<DateTimeWithTimeZone>,
    pub locked_out_on: Option<DateTimeWithTimeZone>,
    pub created_on: DateTimeWithTimeZone,
    pub last_modified_on: DateTimeWithTimeZone,
    pub roles: Vec<RoleView>,
}

fn view(user: system_user::Model, roles: Vec<system_role::Model>) -> UserView {
    UserView {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        blocked_on: user.blocked_on,
        locked_out_on: user.locked_out_on,
        created_on: user.created_on,
        last_modified_on: user.last_modified_on,
        roles: roles
            .into_iter()
            .map(|r| RoleView { id: r.id, name: r.name })
            .collect(),
    }
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

fn password_rules() -> StrRules {
    StrRules {
        min_length: Some(PASSWORD_MIN_LENGTH),
        max_length: None,
    }
}

async fn email_taken(db: &DatabaseConnection, email: &str) -> Result<bool, ServiceError> {
    let existing = system_user::Entity::find()
        .filter(system_user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(db_err)?;
    Ok(existing.is_some())
}

async fn roles_of(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<system_role::Model>, ServiceError> {
    let rows = system_user_role::Entity::find()
        .filter(system_user_role::Column::UserId.eq(user_id))
        .find_also_related(system_role::Entity)
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().filter_map(|(_, role)| role).collect())
}

pub async fn list(
    db: &DatabaseConnection,
    params: PageParams,
) -> Result<(Vec<UserView>, Paging), ServiceError> {
    let query = system_user::Entity::find().order_by_asc(system_user::Column::FullName);
    let (users, paging) = pagination::page(db, query, params).await?;

    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let mut by_user: HashMap<i32, Vec<system_role::Model>> = HashMap::new();
    if !ids.is_empty() {
        let rows = system_user_role::Entity::find()
            .filter(system_user_role::Column::UserId.is_in(ids))
            .find_also_related(system_role::Entity)
            .all(db)
            .await
            .map_err(db_err)?;
        for (grant, role) in rows {
            if let Some(role) = role {
                by_user.entry(grant.user_id).or_default().push(role);
            }
        }
    }
    let views = users
        .into_iter()
        .map(|u| {
            let roles = by_user.remove(&u.id).unwrap_or_default();
            view(u, roles)
        })
        .collect();
    Ok((views, paging))
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<UserView>, ServiceError> {
    let Some(user) = system_user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
    else {
        return Ok(None);
    };
    let roles = roles_of(db, user.id).await?;
    Ok(Some(view(user, roles)))
}

pub async fn create(db: &DatabaseConnection, input: CreateUser) -> Result<UserView, ServiceError> {
    let mut errors = Vec::new();
    let full_name = validate_required_str(
        "fullName",
        input.full_name.as_deref(),
        StrRules::max(GENERAL_NAME_MAX_LENGTH),
        &mut errors,
    );
    let email = validate_required_str(
        "email",
        input.email.as_deref(),
        StrRules::max(EMAIL_MAX_LENGTH),
        &mut errors,
    );
    if !email.is_empty() {
        if !email.contains('@') {
            errors.push(FieldError::invalid_value("email"));
        } else if email_taken(db, &email).await? {
            errors.push(FieldError::already_exists("email"));
        }
    }
    let password = validate_required_str(
        "password",
        input.password.as_deref(),
        password_rules(),
        &mut errors,
    );
    let mut role_ids: Vec<i32> = Vec::new();
    if let Some(roles) = &input.roles {
        for (idx, role) in roles.iter().enumerate() {
            let field = format!("roles[{idx}].id");
            match role.id {
                None => errors.push(FieldError::cannot_be_null(&field)),
                Some(id) => {
                    if system_role::Entity::find_by_id(id)
                        .one(db)
                        .await
                        .map_err(db_err)?
                        .is_none()
                    {
                        errors.push(FieldError::invalid_value(&field));
                    } else if role_ids.contains(&id) {
                        errors.push(FieldError::already_exists(&field));
                    } else {
                        role_ids.push(id);
                    }
                }
            }
        }
    }
    ensure_valid(errors)?;

    let now = Utc::now();
    let user = system_user::ActiveModel {
        full_name: Set(full_name),
        email: Set(email),
        hashed_password: Set(hash_password(&password)?),
        blocked_on: Set(None),
        locked_out_on: Set(None),
        created_on: Set(now.into()),
        last_modified_on: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    if !role_ids.is_empty() {
        let grants: Vec<system_user_role::ActiveModel> = role_ids
            .iter()
            .map(|rid| system_user_role::ActiveModel {
                user_id: Set(user.id),
                role_id: Set(*rid),
            })
            .collect();
        system_user_role::Entity::insert_many(grants)
            .exec(db)
            .await
            .map_err(db_err)?;
    }

    let roles = roles_of(db, user.id).await?;
    Ok(view(user, roles))
}

pub async fn patch(
    db: &DatabaseConnection,
    id: i32,
    input: PatchUser,
) -> Result<UserView, ServiceError> {
    let current = system_user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    if input.is_empty() {
        return Err(ServiceError::Unprocessable(vec![FieldError::no_content()]));
    }

    let mut errors = Vec::new();
    let mut new_full_name = None;
    if let Some(value) = &input.full_name {
        new_full_name = Some(validate_required_str(
            "fullName",
            value.as_deref(),
            StrRules::max(GENERAL_NAME_MAX_LENGTH),
            &mut errors,
        ));
    }
    let mut new_email = None;
    if let Some(value) = &input.email {
        let email = validate_required_str(
            "email",
            value.as_deref(),
            StrRules::max(EMAIL_MAX_LENGTH),
            &mut errors,
        );
        if !email.is_empty() {
            if !email.contains('@') {
                errors.push(FieldError::invalid_value("email"));
            } else if email_taken(db, &email).await? {
                errors.push(FieldError::already_exists("email"));
            }
        }
        new_email = Some(email);
    }
    let mut new_password = None;
    if let Some(value) = &input.password {
        new_password = Some(validate_required_str(
            "password",
            value.as_deref(),
            password_rules(),
            &mut errors,
        ));
    }
    ensure_valid(errors)?;

    let mut am: system_user::ActiveModel = current.clone().into();
    let mut changed = false;
    if let Some(full_name) = new_full_name {
        if full_name != current.full_name {
            am.full_name = Set(full_name);
            changed = true;
        }
    }
    if let Some(email) = new_email {
        if email != current.email {
            am.email = Set(email);
            changed = true;
        }
    }
    if let Some(password) = new_password {
        am.hashed_password = Set(hash_password(&password)?);
        changed = true;
    }
    match input.is_blocked {
        Some(true) if current.blocked_on.is_none() => {
            am.blocked_on = Set(Some(Utc::now().into()));
            changed = true;
        }
        Some(false) if current.blocked_on.is_some() => {
            am.blocked_on = Set(None);
            changed = true;
        }
        _ => {}
    }
    if input.unlock == Some(true) && current.locked_out_on.is_some() {
        am.locked_out_on = Set(None);
        changed = true;
    }

    let updated = if changed {
        am.last_modified_on = Set(Utc::now().into());
        am.update(db).await.map_err(db_err)?
    } else {
        current
    };
    let roles = roles_of(db, updated.id).await?;
    Ok(view(updated, roles))
}

/// Hard delete; role grants go with the user.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = system_user::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::validation::ErrorCode;
    use uuid::Uuid;

    #[test]
    fn hashes_are_salted_and_never_plaintext() {
        let a = hash_password("correct horse battery").unwrap();
        let b = hash_password("correct horse battery").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(!a.contains("correct horse"));
    }

    #[tokio::test]
    async fn user_lifecycle_with_roles_and_blocking() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let role = crate::management::roles::create(
            &db,
            crate::management::roles::CreateRole {
                name: Some(format!("auditor_{}", Uuid::new_v4())),
            },
        )
        .await?;

        let email = format!("user_{}@example.com", Uuid::new_v4().simple());
        let user = create(
            &db,
            CreateUser {
                full_name: Some("Dana Reviewer".into()),
                email: Some(email.clone()),
                password: Some("a long enough password".into()),
                roles: Some(vec![RoleRef { id: Some(role.id) }]),
            },
        )
        .await?;
        assert_eq!(user.email, email);
        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.roles[0].id, role.id);
        assert!(user.blocked_on.is_none());

        // Short passwords and bad role refs are collected as field errors.
        let bad = create(
            &db,
            CreateUser {
                full_name: Some("Shorty".into()),
                email: Some(format!("x_{}@example.com", Uuid::new_v4().simple())),
                password: Some("short".into()),
                roles: Some(vec![RoleRef { id: Some(-5) }]),
            },
        )
        .await;
        match bad {
            Err(ServiceError::Unprocessable(errors)) => {
                assert!(errors.iter().any(|e| e.code == ErrorCode::FieldMinLengthNotMet));
                assert!(errors
                    .iter()
                    .any(|e| e.field_name.as_deref() == Some("roles[0].id")));
            }
            other => panic!("expected validation failure, got {:?}", other.map(|u| u.id)),
        }

        // Email without an @ is rejected.
        let invalid_email = create(
            &db,
            CreateUser {
                full_name: Some("No At".into()),
                email: Some("not-an-email".into()),
                password: Some("a long enough password".into()),
                roles: None,
            },
        )
        .await;
        match invalid_email {
            Err(ServiceError::Unprocessable(errors)) => {
                assert!(errors.iter().any(|e| e.code == ErrorCode::FieldValueInvalid));
            }
            other => panic!("expected email rejection, got {:?}", other.map(|u| u.id)),
        }

        let blocked = patch(
            &db,
            user.id,
            PatchUser { is_blocked: Some(true), ..Default::default() },
        )
        .await?;
        assert!(blocked.blocked_on.is_some());

        let unblocked = patch(
            &db,
            user.id,
            PatchUser { is_blocked: Some(false), ..Default::default() },
        )
        .await?;
        assert!(unblocked.blocked_on.is_none());

        assert!(delete(&db, user.id).await?);
        assert!(get(&db, user.id).await?.is_none());
        crate::management::roles::delete(&db, role.id).await?;
        Ok(())
    }
}
