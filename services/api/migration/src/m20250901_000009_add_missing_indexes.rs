use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Titles::Table)
                    .col(Titles::CategoryId)
                    .name("idx_titles_category_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Reviews::Table)
                    .col(Reviews::TitleId)
                    .name("idx_reviews_title_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Comments::Table)
                    .col(Comments::ReviewId)
                    .name("idx_comments_review_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_comments_review_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_title_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_titles_category_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Titles {
    Table,
    CategoryId,
}

#[derive(Iden)]
enum Reviews {
    Table,
    TitleId,
}

#[derive(Iden)]
enum Comments {
    Table,
    ReviewId,
}
