//! Create the `rating_level` scale and seed the five levels.
//!
//! Every relevance, threat and vulnerability rating in the schema references
//! this table, which pins ratings to the 1..=5 range.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RatingLevel::Table)
                    .if_not_exists()
                    .col(small_integer(RatingLevel::Id).primary_key())
                    .col(string_len(RatingLevel::Name, 64).not_null())
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(RatingLevel::Table)
            .columns([RatingLevel::Id, RatingLevel::Name])
            .values_panic([1.into(), "Very low".into()])
            .values_panic([2.into(), "Low".into()])
            .values_panic([3.into(), "Medium".into()])
            .values_panic([4.into(), "High".into()])
            .values_panic([5.into(), "Very high".into()])
            .to_owned();
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RatingLevel::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RatingLevel { Table, Id, Name }
