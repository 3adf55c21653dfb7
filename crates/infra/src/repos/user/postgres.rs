use super::IUserRepo;
use aurora_fest_domain::{User, UserRole, ID};
use sqlx::{FromRow, PgPool};
use tracing::warn;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_id: i64,
    email: String,
    name: Option<String>,
    email_verified: bool,
    role: String,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        let role = raw.role.parse::<UserRole>().unwrap_or_else(|e| {
            warn!("User: {} has an unknown role, treating it as USER: {:?}", raw.user_id, e);
            UserRole::User
        });
        Self {
            id: raw.user_id.into(),
            email: raw.email,
            name: raw.name,
            email_verified: raw.email_verified,
            role,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_id, email, name, email_verified, role)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.inner())
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.email_verified)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT user_id, email, name, email_verified, role FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.inner())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user.map(|u| u.into()))
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        let user_ids = user_ids.iter().map(|id| id.inner()).collect::<Vec<_>>();
        let users = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT user_id, email, name, email_verified, role FROM users
            WHERE user_id = ANY($1)
            "#,
        )
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }
}
