use anyhow::{Context as _, anyhow};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect, SqlErr, Statement,
    TransactionTrait,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use critiq_api_schema::{
    categories, comments, genres, outbox_events, reviews, title_genres, titles, users,
};
use critiq_domain::pagination::PageRequest;
use critiq_domain::user::UserRole;

use crate::domain::repository::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserRepository,
};
use crate::domain::types::{
    Category, Comment, CommentDraft, Genre, OutboxEvent, Review, ReviewDraft, Title, TitleDetail,
    TitleDraft, TitleFilter, User,
};
use crate::error::ApiServiceError;

/// Map an insert/update failure: a lost unique-constraint race becomes
/// `Conflict`, everything else is internal.
fn map_write_err(err: sea_orm::DbErr, what: &'static str) -> ApiServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ApiServiceError::Conflict,
        _ => ApiServiceError::Internal(anyhow::Error::new(err).context(what)),
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn outbox_active_model(event: &OutboxEvent) -> outbox_events::ActiveModel {
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        created_at: Set(Utc::now()),
        published_at: Set(None),
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = users::Entity::find();
        if let Some(search) = search {
            query = query.filter(
                Expr::col(users::Column::Username).ilike(format!("%{}%", escape_like(search))),
            );
        }
        let models = query
            .order_by_asc(users::Column::Username)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn create(&self, user: &User) -> Result<(), ApiServiceError> {
        user_active_model(user)
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "create user"))?;
        Ok(())
    }

    async fn create_with_outbox(
        &self,
        user: &User,
        event: &OutboxEvent,
    ) -> Result<(), ApiServiceError> {
        let user = user.clone();
        let event = event.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    user_active_model(&user).insert(txn).await?;
                    outbox_active_model(&event).insert(txn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                sea_orm::TransactionError::Connection(e)
                | sea_orm::TransactionError::Transaction(e) => {
                    map_write_err(e, "create user with outbox event")
                }
            })?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), ApiServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            bio: Set(user.bio.clone()),
            role: Set(user.role.as_str().to_owned()),
            updated_at: Set(user.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| map_write_err(e, "update user"))?;
        Ok(())
    }

    async fn set_confirmation_code(
        &self,
        user_id: Uuid,
        code: &str,
        event: &OutboxEvent,
    ) -> Result<(), ApiServiceError> {
        let code = code.to_owned();
        let event = event.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        confirmation_code: Set(Some(code)),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    outbox_active_model(&event).insert(txn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                sea_orm::TransactionError::Connection(e)
                | sea_orm::TransactionError::Transaction(e) => {
                    map_write_err(e, "rotate confirmation code")
                }
            })?;
        Ok(())
    }

    async fn delete_by_username(&self, username: &str) -> Result<bool, ApiServiceError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Username.eq(username))
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        bio: Set(user.bio.clone()),
        role: Set(user.role.as_str().to_owned()),
        is_superuser: Set(user.is_superuser),
        confirmation_code: Set(user.confirmation_code.clone()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiServiceError> {
    let role = UserRole::from_str_opt(&model.role)
        .ok_or_else(|| anyhow!("unknown role {:?} for user {}", model.role, model.id))?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        bio: model.bio,
        role,
        is_superuser: model.is_superuser,
        confirmation_code: model.confirmation_code,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

impl CategoryRepository for DbCategoryRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Category>, ApiServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = categories::Entity::find();
        if let Some(search) = search {
            query = query.filter(
                Expr::col(categories::Column::Name).ilike(format!("%{}%", escape_like(search))),
            );
        }
        let models = query
            .order_by_asc(categories::Column::Name)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, ApiServiceError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find category by slug")?;
        Ok(model.map(category_from_model))
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Category, ApiServiceError> {
        let model = categories::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err(e, "create category"))?;
        Ok(category_from_model(model))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError> {
        let result = categories::Entity::delete_many()
            .filter(categories::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .context("delete category")?;
        Ok(result.rows_affected > 0)
    }
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Genre repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGenreRepository {
    pub db: DatabaseConnection,
}

impl GenreRepository for DbGenreRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Genre>, ApiServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = genres::Entity::find();
        if let Some(search) = search {
            query = query.filter(
                Expr::col(genres::Column::Name).ilike(format!("%{}%", escape_like(search))),
            );
        }
        let models = query
            .order_by_asc(genres::Column::Name)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list genres")?;
        Ok(models.into_iter().map(genre_from_model).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, ApiServiceError> {
        let model = genres::Entity::find()
            .filter(genres::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find genre by slug")?;
        Ok(model.map(genre_from_model))
    }

    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Genre>, ApiServiceError> {
        let mut models = genres::Entity::find()
            .filter(genres::Column::Slug.is_in(slugs.iter().cloned()))
            .all(&self.db)
            .await
            .context("find genres by slugs")?;
        // Return rows in request order.
        let mut ordered = Vec::with_capacity(models.len());
        for slug in slugs {
            if let Some(pos) = models.iter().position(|m| m.slug == *slug) {
                ordered.push(genre_from_model(models.remove(pos)));
            }
        }
        Ok(ordered)
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Genre, ApiServiceError> {
        let model = genres::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err(e, "create genre"))?;
        Ok(genre_from_model(model))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError> {
        let result = genres::Entity::delete_many()
            .filter(genres::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .context("delete genre")?;
        Ok(result.rows_affected > 0)
    }
}

fn genre_from_model(model: genres::Model) -> Genre {
    Genre {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Title repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTitleRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct TitleRow {
    id: i32,
    name: String,
    year: i16,
    description: Option<String>,
    category_id: Option<i32>,
    rating: Option<f64>,
}

impl TitleRepository for DbTitleRepository {
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Vec<TitleDetail>, ApiServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let offset = ((page - 1) * per_page) as i64;
        let limit = per_page as i64;

        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<sea_orm::Value> = Vec::new();
        if let Some(name) = &filter.name {
            values.push(format!("%{}%", escape_like(name)).into());
            conditions.push(format!("t.name ILIKE ${}", values.len()));
        }
        if let Some(year) = filter.year {
            values.push(year.into());
            conditions.push(format!("t.year = ${}", values.len()));
        }
        if let Some(category) = &filter.category {
            values.push(category.clone().into());
            conditions.push(format!("c.slug = ${}", values.len()));
        }
        if let Some(genre) = &filter.genre {
            values.push(genre.clone().into());
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM title_genres tg \
                 JOIN genres g ON g.id = tg.genre_id \
                 WHERE tg.title_id = t.id AND g.slug = ${})",
                values.len()
            ));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        values.push(limit.into());
        let limit_param = values.len();
        values.push(offset.into());
        let offset_param = values.len();

        let sql = format!(
            r#"
            SELECT t.id, t.name, t.year, t.description, t.category_id,
                   AVG(r.score)::double precision AS rating
            FROM titles t
            LEFT JOIN categories c ON c.id = t.category_id
            LEFT JOIN reviews r ON r.title_id = t.id
            {where_clause}
            GROUP BY t.id
            ORDER BY t.id
            LIMIT ${limit_param} OFFSET ${offset_param}
            "#,
        );

        let rows = TitleRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            &sql,
            values,
        ))
        .all(&self.db)
        .await
        .context("list titles")?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let category = category_by_id(&self.db, row.category_id).await?;
            let genres = genres_of_title(&self.db, row.id).await?;
            details.push(TitleDetail {
                title: Title {
                    id: row.id,
                    name: row.name,
                    year: row.year,
                    description: row.description,
                    category_id: row.category_id,
                },
                category,
                genres,
                rating: row.rating,
            });
        }
        Ok(details)
    }

    async fn find_detail(&self, id: i32) -> Result<Option<TitleDetail>, ApiServiceError> {
        let Some(model) = titles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find title by id")?
        else {
            return Ok(None);
        };

        #[derive(FromQueryResult)]
        struct RatingRow {
            rating: Option<f64>,
        }

        let rating = RatingRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            "SELECT AVG(score)::double precision AS rating FROM reviews WHERE title_id = $1",
            [id.into()],
        ))
        .one(&self.db)
        .await
        .context("aggregate title rating")?
        .and_then(|row| row.rating);

        let category = category_by_id(&self.db, model.category_id).await?;
        let genres = genres_of_title(&self.db, id).await?;
        Ok(Some(TitleDetail {
            title: title_from_model(model),
            category,
            genres,
            rating,
        }))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Title>, ApiServiceError> {
        let model = titles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find title by id")?;
        Ok(model.map(title_from_model))
    }

    async fn create(&self, draft: &TitleDraft) -> Result<Title, ApiServiceError> {
        let draft = draft.clone();
        let model = self
            .db
            .transaction::<_, titles::Model, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let model = titles::ActiveModel {
                        name: Set(draft.name.clone()),
                        year: Set(draft.year),
                        description: Set(draft.description.clone()),
                        category_id: Set(draft.category_id),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    for genre_id in &draft.genre_ids {
                        title_genres::ActiveModel {
                            title_id: Set(model.id),
                            genre_id: Set(*genre_id),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(model)
                })
            })
            .await
            .map_err(|e| match e {
                sea_orm::TransactionError::Connection(e)
                | sea_orm::TransactionError::Transaction(e) => map_write_err(e, "create title"),
            })?;
        Ok(title_from_model(model))
    }

    async fn update(
        &self,
        title: &Title,
        genre_ids: Option<&[i32]>,
    ) -> Result<(), ApiServiceError> {
        let title = title.clone();
        let genre_ids = genre_ids.map(<[i32]>::to_vec);
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    titles::ActiveModel {
                        id: Set(title.id),
                        name: Set(title.name.clone()),
                        year: Set(title.year),
                        description: Set(title.description.clone()),
                        category_id: Set(title.category_id),
                    }
                    .update(txn)
                    .await?;
                    if let Some(genre_ids) = genre_ids {
                        title_genres::Entity::delete_many()
                            .filter(title_genres::Column::TitleId.eq(title.id))
                            .exec(txn)
                            .await?;
                        for genre_id in genre_ids {
                            title_genres::ActiveModel {
                                title_id: Set(title.id),
                                genre_id: Set(genre_id),
                            }
                            .insert(txn)
                            .await?;
                        }
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                sea_orm::TransactionError::Connection(e)
                | sea_orm::TransactionError::Transaction(e) => map_write_err(e, "update title"),
            })?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiServiceError> {
        let result = titles::Entity::delete_many()
            .filter(titles::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete title")?;
        Ok(result.rows_affected > 0)
    }
}

fn title_from_model(model: titles::Model) -> Title {
    Title {
        id: model.id,
        name: model.name,
        year: model.year,
        description: model.description,
        category_id: model.category_id,
    }
}

async fn category_by_id(
    db: &DatabaseConnection,
    category_id: Option<i32>,
) -> Result<Option<Category>, ApiServiceError> {
    let Some(category_id) = category_id else {
        return Ok(None);
    };
    let model = categories::Entity::find_by_id(category_id)
        .one(db)
        .await
        .context("find category of title")?;
    Ok(model.map(category_from_model))
}

async fn genres_of_title(
    db: &DatabaseConnection,
    title_id: i32,
) -> Result<Vec<Genre>, ApiServiceError> {
    let links = title_genres::Entity::find()
        .filter(title_genres::Column::TitleId.eq(title_id))
        .all(db)
        .await
        .context("list genre links of title")?;
    let genre_ids: Vec<i32> = links.into_iter().map(|link| link.genre_id).collect();
    let models = genres::Entity::find()
        .filter(genres::Column::Id.is_in(genre_ids))
        .order_by_asc(genres::Column::Name)
        .all(db)
        .await
        .context("list genres of title")?;
    Ok(models.into_iter().map(genre_from_model).collect())
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn list_by_title(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Review>, ApiServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let pairs = reviews::Entity::find()
            .find_also_related(users::Entity)
            .filter(reviews::Column::TitleId.eq(title_id))
            .order_by_desc(reviews::Column::PubDate)
            .order_by_desc(reviews::Column::Id)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list reviews")?;
        pairs.into_iter().map(review_from_pair).collect()
    }

    async fn find(
        &self,
        title_id: i32,
        review_id: i32,
    ) -> Result<Option<Review>, ApiServiceError> {
        let pair = reviews::Entity::find_by_id(review_id)
            .find_also_related(users::Entity)
            .filter(reviews::Column::TitleId.eq(title_id))
            .one(&self.db)
            .await
            .context("find review")?;
        pair.map(review_from_pair).transpose()
    }

    async fn exists_for(&self, title_id: i32, author_id: Uuid) -> Result<bool, ApiServiceError> {
        let model = reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id))
            .filter(reviews::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .context("check review existence")?;
        Ok(model.is_some())
    }

    async fn create(&self, draft: &ReviewDraft) -> Result<Review, ApiServiceError> {
        let model = reviews::ActiveModel {
            title_id: Set(draft.title_id),
            author_id: Set(draft.author_id),
            text: Set(draft.text.clone()),
            score: Set(draft.score),
            pub_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err(e, "create review"))?;
        let author = users::Entity::find_by_id(draft.author_id)
            .one(&self.db)
            .await
            .context("find review author")?
            .ok_or_else(|| anyhow!("author {} of new review is gone", draft.author_id))?;
        review_from_pair((model, Some(author)))
    }

    async fn update_text_score(
        &self,
        review_id: i32,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<(), ApiServiceError> {
        let mut am = reviews::ActiveModel {
            id: Set(review_id),
            ..Default::default()
        };
        if let Some(text) = text {
            am.text = Set(text.to_owned());
        }
        if let Some(score) = score {
            am.score = Set(score);
        }
        am.update(&self.db).await.context("update review")?;
        Ok(())
    }

    async fn delete(&self, review_id: i32) -> Result<bool, ApiServiceError> {
        let result = reviews::Entity::delete_many()
            .filter(reviews::Column::Id.eq(review_id))
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }
}

fn review_from_pair(
    (model, author): (reviews::Model, Option<users::Model>),
) -> Result<Review, ApiServiceError> {
    let author = author.ok_or_else(|| anyhow!("author of review {} is gone", model.id))?;
    Ok(Review {
        id: model.id,
        title_id: model.title_id,
        author_id: model.author_id,
        author_username: author.username,
        text: model.text,
        score: model.score,
        pub_date: model.pub_date,
    })
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn list_by_review(
        &self,
        review_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ApiServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let pairs = comments::Entity::find()
            .find_also_related(users::Entity)
            .filter(comments::Column::ReviewId.eq(review_id))
            .order_by_asc(comments::Column::PubDate)
            .order_by_asc(comments::Column::Id)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list comments")?;
        pairs.into_iter().map(comment_from_pair).collect()
    }

    async fn find(
        &self,
        review_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>, ApiServiceError> {
        let pair = comments::Entity::find_by_id(comment_id)
            .find_also_related(users::Entity)
            .filter(comments::Column::ReviewId.eq(review_id))
            .one(&self.db)
            .await
            .context("find comment")?;
        pair.map(comment_from_pair).transpose()
    }

    async fn create(&self, draft: &CommentDraft) -> Result<Comment, ApiServiceError> {
        let model = comments::ActiveModel {
            review_id: Set(draft.review_id),
            author_id: Set(draft.author_id),
            text: Set(draft.text.clone()),
            pub_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err(e, "create comment"))?;
        let author = users::Entity::find_by_id(draft.author_id)
            .one(&self.db)
            .await
            .context("find comment author")?
            .ok_or_else(|| anyhow!("author {} of new comment is gone", draft.author_id))?;
        comment_from_pair((model, Some(author)))
    }

    async fn update_text(&self, comment_id: i32, text: &str) -> Result<(), ApiServiceError> {
        comments::ActiveModel {
            id: Set(comment_id),
            text: Set(text.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update comment")?;
        Ok(())
    }

    async fn delete(&self, comment_id: i32) -> Result<bool, ApiServiceError> {
        let result = comments::Entity::delete_many()
            .filter(comments::Column::Id.eq(comment_id))
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }
}

fn comment_from_pair(
    (model, author): (comments::Model, Option<users::Model>),
) -> Result<Comment, ApiServiceError> {
    let author = author.ok_or_else(|| anyhow!("author of comment {} is gone", model.id))?;
    Ok(Comment {
        id: model.id,
        review_id: model.review_id,
        author_id: model.author_id,
        author_username: author.username,
        text: model.text,
        pub_date: model.pub_date,
    })
}
