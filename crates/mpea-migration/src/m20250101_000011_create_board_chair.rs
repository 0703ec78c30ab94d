use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BoardChair::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoardChair::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BoardChair::Name).string_len(100).not_null())
                    .col(ColumnDef::new(BoardChair::NameEn).string_len(100).not_null())
                    .col(
                        ColumnDef::new(BoardChair::Position)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(BoardChair::PositionEn)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(BoardChair::Avatar).string_len(500).not_null())
                    .col(
                        ColumnDef::new(BoardChair::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(BoardChair::Introduction).text().not_null())
                    .col(ColumnDef::new(BoardChair::IntroductionEn).text().not_null())
                    .col(
                        ColumnDef::new(BoardChair::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BoardChair::UpdatedAt)
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
            .drop_table(Table::drop().table(BoardChair::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BoardChair {
    Table,
    Id,
    Name,
    NameEn,
    Position,
    PositionEn,
    Avatar,
    SortOrder,
    Introduction,
    IntroductionEn,
    CreatedAt,
    UpdatedAt,
}
