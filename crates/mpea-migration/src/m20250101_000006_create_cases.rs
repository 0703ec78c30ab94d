use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cases::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Cases::TitleEn)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Cases::ProfessionalPhoto).string_len(500).not_null())
                    .col(ColumnDef::new(Cases::ChildPhoto).string_len(500).not_null())
                    .col(ColumnDef::new(Cases::Introduction).text().not_null())
                    .col(ColumnDef::new(Cases::IntroductionEn).text().not_null())
                    .col(
                        ColumnDef::new(Cases::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Cases::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Cases::UpdatedAt)
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
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cases {
    Table,
    Id,
    Title,
    TitleEn,
    ProfessionalPhoto,
    ChildPhoto,
    Introduction,
    IntroductionEn,
    Featured,
    CreatedAt,
    UpdatedAt,
}
