use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Titles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Titles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Titles::Name).string().not_null())
                    .col(ColumnDef::new(Titles::Year).small_integer().not_null())
                    .col(ColumnDef::new(Titles::Description).text())
                    .col(ColumnDef::new(Titles::CategoryId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Titles::Table, Titles::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Titles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Titles {
    Table,
    Id,
    Name,
    Year,
    Description,
    CategoryId,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}
