use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactMessages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContactMessages::Type)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContactMessages::ChildAge).integer().null())
                    .col(ColumnDef::new(ContactMessages::Interest).string_len(255).null())
                    .col(ColumnDef::new(ContactMessages::Company).string_len(255).null())
                    .col(ColumnDef::new(ContactMessages::OrgType).string_len(255).null())
                    .col(ColumnDef::new(ContactMessages::Phone).string_len(50).not_null())
                    .col(ColumnDef::new(ContactMessages::Intention).text().null())
                    .col(ColumnDef::new(ContactMessages::Problem).text().null())
                    .col(ColumnDef::new(ContactMessages::Ip).string_len(64).null())
                    .col(ColumnDef::new(ContactMessages::UserAgent).string_len(255).null())
                    .col(
                        ColumnDef::new(ContactMessages::Status)
                            .string_len(20)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(ContactMessages::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ContactMessages::UpdatedAt)
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
                    .name("idx_contact_messages_type_status")
                    .table(ContactMessages::Table)
                    .col(ContactMessages::Type)
                    .col(ContactMessages::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactMessages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContactMessages {
    Table,
    Id,
    Type,
    ChildAge,
    Interest,
    Company,
    OrgType,
    Phone,
    Intention,
    Problem,
    Ip,
    UserAgent,
    Status,
    CreatedAt,
    UpdatedAt,
}
