use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lecturers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lecturers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lecturers::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Lecturers::NameEn)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Lecturers::Photo).string_len(500).not_null())
                    .col(ColumnDef::new(Lecturers::Introduction).text().not_null())
                    .col(ColumnDef::new(Lecturers::IntroductionEn).text().not_null())
                    .col(
                        ColumnDef::new(Lecturers::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Lecturers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Lecturers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lecturers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Lecturers {
    Table,
    Id,
    Name,
    NameEn,
    Photo,
    Introduction,
    IntroductionEn,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
