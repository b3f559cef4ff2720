use crate::entities::{comment, follow, group, like, post, user};
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

async fn create_table<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
    unique: Vec<IndexCreateStatement>,
) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    for mut index in unique {
        stmt.index(&mut index);
    }
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Creates every table the application needs. Safe to run on an already
/// initialised database.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    // Parents before children so foreign keys resolve.
    create_table(db, &schema, user::Entity, vec![]).await?;
    create_table(db, &schema, group::Entity, vec![]).await?;
    create_table(db, &schema, post::Entity, vec![]).await?;
    create_table(db, &schema, comment::Entity, vec![]).await?;
    create_table(
        db,
        &schema,
        follow::Entity,
        vec![Index::create()
            .name("uniq_follows_user_author")
            .col(follow::Column::UserId)
            .col(follow::Column::AuthorId)
            .unique()
            .to_owned()],
    )
    .await?;
    create_table(
        db,
        &schema,
        like::Entity,
        vec![Index::create()
            .name("uniq_likes_user_target")
            .col(like::Column::UserId)
            .col(like::Column::ContentType)
            .col(like::Column::ObjectId)
            .unique()
            .to_owned()],
    )
    .await?;

    log::info!("Database schema ready");
    Ok(())
}
