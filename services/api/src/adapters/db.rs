//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete
//! implementation of the `ForumStore` port from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.
//!
//! Reads always return the populated aggregate: the row for the root plus
//! every child resolved through its join table. Multi-step mutations (insert
//! a child, re-read the populated parent) run inside a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forum_core::collection::DUPLICATE_QUESTION;
use forum_core::domain::{
    Answer, Chat, Collection, Comment, CommentParent, Question, Room, Tag, User,
};
use forum_core::ports::{
    ForumStore, NewAnswer, NewChat, NewCollection, NewComment, NewQuestion, NewRoom, StoreError,
    StoreResult,
};
use forum_core::vote::{self, VoteAction, VoteKind, VoteOutcome};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ForumStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> StoreError {
    StoreError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    username: String,
    email: String,
    pfp: String,
    bio: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            username: self.username,
            email: self.email,
            pfp: self.pfp,
            bio: self.bio,
        }
    }
}

#[derive(FromRow)]
struct TagRecord {
    id: Uuid,
    name: String,
    description: String,
}
impl TagRecord {
    fn to_domain(self) -> Tag {
        Tag {
            id: self.id,
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(FromRow)]
struct QuestionRecord {
    id: Uuid,
    title: String,
    text: String,
    asked_by: String,
    ask_date_time: DateTime<Utc>,
}

#[derive(FromRow)]
struct AnswerRecord {
    id: Uuid,
    question_id: Uuid,
    text: String,
    ans_by: String,
    ans_date_time: DateTime<Utc>,
}

#[derive(FromRow)]
struct CommentRecord {
    id: Uuid,
    parent_id: Uuid,
    parent_type: String,
    text: String,
    comment_by: String,
    comment_date_time: DateTime<Utc>,
}
impl CommentRecord {
    fn to_domain(self) -> Comment {
        // The CHECK constraint on the column keeps anything else out.
        let parent_type = match self.parent_type.as_str() {
            "answer" => CommentParent::Answer,
            _ => CommentParent::Question,
        };
        Comment {
            id: self.id,
            text: self.text,
            comment_by: self.comment_by,
            comment_date_time: self.comment_date_time,
            parent_id: self.parent_id,
            parent_type,
        }
    }
}

#[derive(FromRow)]
struct RoomRecord {
    id: Uuid,
    name: String,
    create_date_time: DateTime<Utc>,
}

#[derive(FromRow)]
struct ChatRecord {
    id: Uuid,
    room_id: Uuid,
    text: String,
    typed_by: String,
    chat_date_time: DateTime<Utc>,
}
impl ChatRecord {
    fn to_domain(self) -> Chat {
        Chat {
            id: self.id,
            room_id: self.room_id,
            text: self.text,
            typed_by: self.typed_by,
            chat_date_time: self.chat_date_time,
        }
    }
}

#[derive(FromRow)]
struct CollectionRecord {
    id: Uuid,
    name: String,
    username: String,
    created_at: DateTime<Utc>,
}

//=========================================================================================
// Population Helpers
//=========================================================================================
// Each helper takes a `&mut PgConnection` so it runs the same against a
// pooled connection or inside a transaction.

fn parent_type_str(parent: CommentParent) -> &'static str {
    match parent {
        CommentParent::Question => "question",
        CommentParent::Answer => "answer",
    }
}

async fn fetch_comments(
    conn: &mut PgConnection,
    parent_id: Uuid,
    parent: CommentParent,
) -> StoreResult<Vec<Comment>> {
    let records = sqlx::query_as::<_, CommentRecord>(
        "SELECT id, parent_id, parent_type, text, comment_by, comment_date_time \
         FROM comments WHERE parent_id = $1 AND parent_type = $2 \
         ORDER BY comment_date_time ASC",
    )
    .bind(parent_id)
    .bind(parent_type_str(parent))
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    Ok(records.into_iter().map(|r| r.to_domain()).collect())
}

async fn fetch_answers(conn: &mut PgConnection, qid: Uuid) -> StoreResult<Vec<Answer>> {
    let records = sqlx::query_as::<_, AnswerRecord>(
        "SELECT id, question_id, text, ans_by, ans_date_time \
         FROM answers WHERE question_id = $1 ORDER BY ans_date_time ASC",
    )
    .bind(qid)
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    let mut answers = Vec::with_capacity(records.len());
    for record in records {
        let comments = fetch_comments(&mut *conn, record.id, CommentParent::Answer).await?;
        answers.push(Answer {
            id: record.id,
            question_id: record.question_id,
            text: record.text,
            ans_by: record.ans_by,
            ans_date_time: record.ans_date_time,
            comments,
        });
    }
    Ok(answers)
}

async fn fetch_vote_side(
    conn: &mut PgConnection,
    qid: Uuid,
    is_upvote: bool,
) -> StoreResult<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT username FROM question_votes \
         WHERE question_id = $1 AND is_upvote = $2 ORDER BY voted_at ASC",
    )
    .bind(qid)
    .bind(is_upvote)
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)
}

/// Resolves a question row into the full populated aggregate.
async fn fetch_question(conn: &mut PgConnection, qid: Uuid) -> StoreResult<Question> {
    let record = sqlx::query_as::<_, QuestionRecord>(
        "SELECT id, title, text, asked_by, ask_date_time FROM questions WHERE id = $1",
    )
    .bind(qid)
    .fetch_optional(&mut *conn)
    .await
    .map_err(unexpected)?
    .ok_or_else(|| StoreError::NotFound(format!("Question {qid} not found")))?;

    let tags = sqlx::query_as::<_, TagRecord>(
        "SELECT t.id, t.name, t.description FROM tags t \
         JOIN question_tags qt ON qt.tag_id = t.id \
         WHERE qt.question_id = $1 ORDER BY t.name ASC",
    )
    .bind(qid)
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    let views = sqlx::query_scalar::<_, String>(
        "SELECT username FROM question_views WHERE question_id = $1 ORDER BY viewed_at ASC",
    )
    .bind(qid)
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    let up_votes = fetch_vote_side(&mut *conn, qid, true).await?;
    let down_votes = fetch_vote_side(&mut *conn, qid, false).await?;
    let answers = fetch_answers(&mut *conn, qid).await?;
    let comments = fetch_comments(&mut *conn, qid, CommentParent::Question).await?;

    Ok(Question {
        id: record.id,
        title: record.title,
        text: record.text,
        tags: tags.into_iter().map(|t| t.to_domain()).collect(),
        asked_by: record.asked_by,
        ask_date_time: record.ask_date_time,
        answers,
        views,
        up_votes,
        down_votes,
        comments,
    })
}

async fn fetch_room(conn: &mut PgConnection, rid: Uuid) -> StoreResult<Room> {
    let record = sqlx::query_as::<_, RoomRecord>(
        "SELECT id, name, create_date_time FROM rooms WHERE id = $1",
    )
    .bind(rid)
    .fetch_optional(&mut *conn)
    .await
    .map_err(unexpected)?
    .ok_or_else(|| StoreError::NotFound(format!("Room {rid} not found")))?;

    let users = sqlx::query_scalar::<_, String>(
        "SELECT username FROM room_users WHERE room_id = $1 ORDER BY joined_at ASC",
    )
    .bind(rid)
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    let chats = sqlx::query_as::<_, ChatRecord>(
        "SELECT id, room_id, text, typed_by, chat_date_time \
         FROM chats WHERE room_id = $1 ORDER BY chat_date_time ASC",
    )
    .bind(rid)
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    Ok(Room {
        id: record.id,
        name: record.name,
        users,
        chats: chats.into_iter().map(|c| c.to_domain()).collect(),
        create_date_time: record.create_date_time,
    })
}

async fn fetch_collection(conn: &mut PgConnection, cid: Uuid) -> StoreResult<Collection> {
    let record = sqlx::query_as::<_, CollectionRecord>(
        "SELECT id, name, username, created_at FROM collections WHERE id = $1",
    )
    .bind(cid)
    .fetch_optional(&mut *conn)
    .await
    .map_err(unexpected)?
    .ok_or_else(|| StoreError::NotFound(format!("Collection {cid} not found")))?;

    let question_ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT question_id FROM collection_questions \
         WHERE collection_id = $1 ORDER BY added_at ASC",
    )
    .bind(cid)
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    let mut questions = Vec::with_capacity(question_ids.len());
    for qid in question_ids {
        questions.push(fetch_question(&mut *conn, qid).await?);
    }

    Ok(Collection {
        id: record.id,
        name: record.name,
        user: record.username,
        questions,
        created_at: record.created_at,
    })
}

async fn question_exists(conn: &mut PgConnection, qid: Uuid) -> StoreResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1 FROM questions WHERE id = $1")
        .bind(qid)
        .fetch_optional(&mut *conn)
        .await
        .map_err(unexpected)?
        .map(|_| ())
        .ok_or_else(|| StoreError::NotFound(format!("Question {qid} not found")))
}

async fn ensure_tag(
    conn: &mut PgConnection,
    name: &str,
    description: &str,
) -> StoreResult<Tag> {
    sqlx::query(
        "INSERT INTO tags (id, name, description) VALUES ($1, $2, $3) \
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .execute(&mut *conn)
    .await
    .map_err(unexpected)?;

    let record =
        sqlx::query_as::<_, TagRecord>("SELECT id, name, description FROM tags WHERE name = $1")
            .bind(name)
            .fetch_one(&mut *conn)
            .await
            .map_err(unexpected)?;

    Ok(record.to_domain())
}

//=========================================================================================
// `ForumStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ForumStore for PgStore {
    async fn get_user(&self, username: &str) -> StoreResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT username, email, pfp, bio FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| StoreError::NotFound(format!("User {username} not found")))?;
        Ok(record.to_domain())
    }

    async fn save_user(&self, user: User) -> StoreResult<User> {
        sqlx::query("INSERT INTO users (username, email, pfp, bio) VALUES ($1, $2, $3, $4)")
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.pfp)
            .bind(&user.bio)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::Duplicate(format!("User {} already exists", user.username))
                }
                _ => unexpected(e),
            })?;
        Ok(user)
    }

    async fn get_or_create_tag(&self, name: &str, description: &str) -> StoreResult<Tag> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        ensure_tag(&mut conn, name, description).await
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM questions ORDER BY ask_date_time ASC, id ASC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(unexpected)?;

        let mut questions = Vec::with_capacity(ids.len());
        for qid in ids {
            questions.push(fetch_question(&mut conn, qid).await?);
        }
        Ok(questions)
    }

    async fn get_question(&self, qid: Uuid) -> StoreResult<Question> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        fetch_question(&mut conn, qid).await
    }

    async fn get_question_and_record_view(
        &self,
        qid: Uuid,
        username: &str,
    ) -> StoreResult<Question> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        question_exists(&mut tx, qid).await?;
        sqlx::query(
            "INSERT INTO question_views (question_id, username) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(qid)
        .bind(username)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        let question = fetch_question(&mut tx, qid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(question)
    }

    async fn save_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let qid = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO questions (id, title, text, asked_by, ask_date_time) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(qid)
        .bind(&new.title)
        .bind(&new.text)
        .bind(&new.asked_by)
        .bind(new.ask_date_time)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        for tag in &new.tags {
            let tag = ensure_tag(&mut tx, &tag.name, &tag.description).await?;
            sqlx::query(
                "INSERT INTO question_tags (question_id, tag_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(qid)
            .bind(tag.id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        let question = fetch_question(&mut tx, qid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(question)
    }

    async fn vote_question(
        &self,
        qid: Uuid,
        username: &str,
        action: VoteAction,
    ) -> StoreResult<VoteOutcome> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        question_exists(&mut tx, qid).await?;

        let up_votes = fetch_vote_side(&mut tx, qid, true).await?;
        let down_votes = fetch_vote_side(&mut tx, qid, false).await?;
        let outcome = vote::apply_vote(up_votes, down_votes, username, action);

        sqlx::query("DELETE FROM question_votes WHERE question_id = $1 AND username = $2")
            .bind(qid)
            .bind(username)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        if outcome.kind != VoteKind::Cancelled {
            sqlx::query(
                "INSERT INTO question_votes (question_id, username, is_upvote) \
                 VALUES ($1, $2, $3)",
            )
            .bind(qid)
            .bind(username)
            .bind(outcome.kind == VoteKind::Upvoted)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(outcome)
    }

    async fn get_answer(&self, aid: Uuid) -> StoreResult<Answer> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, AnswerRecord>(
            "SELECT id, question_id, text, ans_by, ans_date_time FROM answers WHERE id = $1",
        )
        .bind(aid)
        .fetch_optional(&mut *conn)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| StoreError::NotFound(format!("Answer {aid} not found")))?;

        let comments = fetch_comments(&mut conn, record.id, CommentParent::Answer).await?;
        Ok(Answer {
            id: record.id,
            question_id: record.question_id,
            text: record.text,
            ans_by: record.ans_by,
            ans_date_time: record.ans_date_time,
            comments,
        })
    }

    async fn save_answer(&self, new: NewAnswer) -> StoreResult<Answer> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        question_exists(&mut tx, new.question_id).await?;
        let aid = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO answers (id, question_id, text, ans_by, ans_date_time) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(aid)
        .bind(new.question_id)
        .bind(&new.text)
        .bind(&new.ans_by)
        .bind(new.ans_date_time)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        Ok(Answer {
            id: aid,
            question_id: new.question_id,
            text: new.text,
            ans_by: new.ans_by,
            ans_date_time: new.ans_date_time,
            comments: vec![],
        })
    }

    async fn save_comment(&self, new: NewComment) -> StoreResult<Comment> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        // The parent must exist in the table matching the discriminator.
        match new.parent_type {
            CommentParent::Question => question_exists(&mut tx, new.parent_id).await?,
            CommentParent::Answer => {
                sqlx::query_scalar::<_, i32>("SELECT 1 FROM answers WHERE id = $1")
                    .bind(new.parent_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(unexpected)?
                    .map(|_| ())
                    .ok_or_else(|| {
                        StoreError::NotFound(format!("Answer {} not found", new.parent_id))
                    })?
            }
        }

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO comments (id, parent_id, parent_type, text, comment_by, comment_date_time) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(new.parent_id)
        .bind(parent_type_str(new.parent_type))
        .bind(&new.text)
        .bind(&new.comment_by)
        .bind(new.comment_date_time)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        Ok(Comment {
            id,
            text: new.text,
            comment_by: new.comment_by,
            comment_date_time: new.comment_date_time,
            parent_id: new.parent_id,
            parent_type: new.parent_type,
        })
    }

    async fn list_rooms(&self) -> StoreResult<Vec<Room>> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM rooms ORDER BY create_date_time ASC, id ASC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(unexpected)?;

        let mut rooms = Vec::with_capacity(ids.len());
        for rid in ids {
            rooms.push(fetch_room(&mut conn, rid).await?);
        }
        Ok(rooms)
    }

    async fn get_room(&self, rid: Uuid) -> StoreResult<Room> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        fetch_room(&mut conn, rid).await
    }

    async fn save_room(&self, new: NewRoom) -> StoreResult<Room> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let rid = Uuid::new_v4();
        sqlx::query("INSERT INTO rooms (id, name, create_date_time) VALUES ($1, $2, $3)")
            .bind(rid)
            .bind(&new.name)
            .bind(new.create_date_time)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        for username in &new.users {
            sqlx::query(
                "INSERT INTO room_users (room_id, username) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(rid)
            .bind(username)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        let room = fetch_room(&mut tx, rid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(room)
    }

    async fn add_user_to_room(&self, rid: Uuid, username: &str) -> StoreResult<Room> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        // Membership is a set: joining twice is a no-op.
        let inserted = sqlx::query(
            "INSERT INTO room_users (room_id, username) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(rid)
        .bind(username)
        .execute(&mut *tx)
        .await;
        if let Err(e) = inserted {
            // A missing room surfaces as a foreign key violation here.
            return Err(match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    StoreError::NotFound(format!("Room {rid} not found"))
                }
                _ => unexpected(e),
            });
        }
        let room = fetch_room(&mut tx, rid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(room)
    }

    async fn save_chat(&self, new: NewChat) -> StoreResult<(Chat, Room)> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let chat = Chat {
            id: Uuid::new_v4(),
            room_id: new.room_id,
            text: new.text,
            typed_by: new.typed_by,
            chat_date_time: new.chat_date_time,
        };
        let inserted = sqlx::query(
            "INSERT INTO chats (id, room_id, text, typed_by, chat_date_time) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(chat.id)
        .bind(chat.room_id)
        .bind(&chat.text)
        .bind(&chat.typed_by)
        .bind(chat.chat_date_time)
        .execute(&mut *tx)
        .await;
        if let Err(e) = inserted {
            return Err(match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    StoreError::NotFound(format!("Room {} not found", new.room_id))
                }
                _ => unexpected(e),
            });
        }
        let room = fetch_room(&mut tx, new.room_id).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok((chat, room))
    }

    async fn list_collections(&self, user: &str) -> StoreResult<Vec<Collection>> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM collections WHERE username = $1 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user)
        .fetch_all(&mut *conn)
        .await
        .map_err(unexpected)?;

        let mut collections = Vec::with_capacity(ids.len());
        for cid in ids {
            collections.push(fetch_collection(&mut conn, cid).await?);
        }
        Ok(collections)
    }

    async fn get_collection(&self, cid: Uuid) -> StoreResult<Collection> {
        let mut conn = self.pool.acquire().await.map_err(unexpected)?;
        fetch_collection(&mut conn, cid).await
    }

    async fn save_collection(&self, new: NewCollection) -> StoreResult<Collection> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let cid = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO collections (id, name, username, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(cid)
        .bind(&new.name)
        .bind(&new.user)
        .bind(new.created_at)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        let collection = fetch_collection(&mut tx, cid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(collection)
    }

    async fn add_question_to_collection(&self, cid: Uuid, qid: Uuid) -> StoreResult<Collection> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let collection = fetch_collection(&mut tx, cid).await?;
        question_exists(&mut tx, qid).await?;

        // Idempotency check before the insert, not after it fails.
        if forum_core::collection::contains_question(&collection, qid) {
            return Err(StoreError::Duplicate(DUPLICATE_QUESTION.to_string()));
        }

        sqlx::query(
            "INSERT INTO collection_questions (collection_id, question_id) VALUES ($1, $2)",
        )
        .bind(cid)
        .bind(qid)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        let collection = fetch_collection(&mut tx, cid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(collection)
    }

    async fn remove_question_from_collection(
        &self,
        cid: Uuid,
        qid: Uuid,
    ) -> StoreResult<Collection> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        // NotFound if the collection itself is missing; removing an absent
        // question from an existing collection is a no-op.
        fetch_collection(&mut tx, cid).await?;
        sqlx::query(
            "DELETE FROM collection_questions WHERE collection_id = $1 AND question_id = $2",
        )
        .bind(cid)
        .bind(qid)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        let collection = fetch_collection(&mut tx, cid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(collection)
    }

    async fn rename_collection(&self, cid: Uuid, new_name: &str) -> StoreResult<Collection> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let updated = sqlx::query("UPDATE collections SET name = $1 WHERE id = $2")
            .bind(new_name)
            .bind(cid)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Collection {cid} not found")));
        }
        let collection = fetch_collection(&mut tx, cid).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(collection)
    }

    async fn delete_collection(&self, cid: Uuid, user: &str) -> StoreResult<Vec<Collection>> {
        let deleted = sqlx::query("DELETE FROM collections WHERE id = $1 AND username = $2")
            .bind(cid)
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Collection {cid} not found")));
        }
        self.list_collections(user).await
    }
}
