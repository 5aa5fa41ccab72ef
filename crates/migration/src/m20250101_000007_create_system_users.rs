//! Create the system user tables used by the management endpoints.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemRole::Table)
                    .if_not_exists()
                    .col(pk_auto(SystemRole::Id))
                    .col(string_len(SystemRole::Name, 128).unique_key().not_null())
                    .col(timestamp_with_time_zone(SystemRole::CreatedOn).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SystemUser::Table)
                    .if_not_exists()
                    .col(pk_auto(SystemUser::Id))
                    .col(string_len(SystemUser::FullName, 128).not_null())
                    .col(string_len(SystemUser::Email, 128).unique_key().not_null())
                    .col(string_len(SystemUser::HashedPassword, 255).not_null())
                    .col(ColumnDef::new(SystemUser::BlockedOn).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(SystemUser::LockedOutOn).timestamp_with_time_zone().null())
                    .col(timestamp_with_time_zone(SystemUser::CreatedOn).not_null())
                    .col(timestamp_with_time_zone(SystemUser::LastModifiedOn).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SystemUserRole::Table)
                    .if_not_exists()
                    .col(integer(SystemUserRole::UserId).not_null())
                    .col(integer(SystemUserRole::RoleId).not_null())
                    .primary_key(
                        Index::create().col(SystemUserRole::UserId).col(SystemUserRole::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_system_user_role_user")
                            .from(SystemUserRole::Table, SystemUserRole::UserId)
                            .to(SystemUser::Table, SystemUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_system_user_role_role")
                            .from(SystemUserRole::Table, SystemUserRole::RoleId)
                            .to(SystemRole::Table, SystemRole::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SystemUserRole::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(SystemUser::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(SystemRole::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SystemRole { Table, Id, Name, CreatedOn }

#[derive(DeriveIden)]
enum SystemUser {
    Table,
    Id,
    FullName,
    Email,
    HashedPassword,
    BlockedOn,
    LockedOutOn,
    CreatedOn,
    LastModifiedOn,
}

#[derive(DeriveIden)]
enum SystemUserRole { Table, UserId, RoleId }
