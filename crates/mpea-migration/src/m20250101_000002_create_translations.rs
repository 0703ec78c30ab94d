use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Translations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Translations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Translations::Namespace)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Translations::FullKey)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Translations::Label).string_len(255).null())
                    .col(ColumnDef::new(Translations::Description).text().null())
                    .col(
                        ColumnDef::new(Translations::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Translations::LocaleValues).text().not_null())
                    .col(ColumnDef::new(Translations::UpdatedBy).string_len(100).null())
                    .col(ColumnDef::new(Translations::UpdatedById).integer().null())
                    .col(
                        ColumnDef::new(Translations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Translations::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_translations_namespace")
                    .table(Translations::Table)
                    .col(Translations::Namespace)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_translations_sort")
                    .table(Translations::Table)
                    .col(Translations::SortOrder)
                    .col(Translations::FullKey)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Translations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Translations {
    Table,
    Id,
    Namespace,
    FullKey,
    Label,
    Description,
    SortOrder,
    LocaleValues,
    UpdatedBy,
    UpdatedById,
    CreatedAt,
    UpdatedAt,
}
