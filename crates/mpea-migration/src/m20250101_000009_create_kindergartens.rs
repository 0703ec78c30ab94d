use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kindergartens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Kindergartens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Kindergartens::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Kindergartens::NameEn).string_len(200).not_null())
                    .col(ColumnDef::new(Kindergartens::Address).string_len(500).not_null())
                    .col(ColumnDef::new(Kindergartens::AddressEn).string_len(500).not_null())
                    .col(ColumnDef::new(Kindergartens::Logo).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Kindergartens::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Kindergartens::Status)
                            .string_len(20)
                            .not_null()
                            .default("enabled"),
                    )
                    .col(
                        ColumnDef::new(Kindergartens::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Kindergartens::UpdatedAt)
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
                    .name("idx_kindergartens_status_sort")
                    .table(Kindergartens::Table)
                    .col(Kindergartens::Status)
                    .col(Kindergartens::SortOrder)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Kindergartens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Kindergartens {
    Table,
    Id,
    Name,
    NameEn,
    Address,
    AddressEn,
    Logo,
    SortOrder,
    Status,
    CreatedAt,
    UpdatedAt,
}
