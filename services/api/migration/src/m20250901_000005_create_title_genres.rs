use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TitleGenres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TitleGenres::TitleId).integer().not_null())
                    .col(ColumnDef::new(TitleGenres::GenreId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(TitleGenres::TitleId)
                            .col(TitleGenres::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TitleGenres::Table, TitleGenres::TitleId)
                            .to(Titles::Table, Titles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TitleGenres::Table, TitleGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TitleGenres::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TitleGenres {
    Table,
    TitleId,
    GenreId,
}

#[derive(Iden)]
enum Titles {
    Table,
    Id,
}

#[derive(Iden)]
enum Genres {
    Table,
    Id,
}
