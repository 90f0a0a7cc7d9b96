use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use trek_core::identity::{CreateProfileRequest, Profile, Role};
use trek_core::repository::ProfileRepository;
use trek_core::{CoreError, CoreResult};

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PROFILE_COLUMNS: &str = "id, username, phone, role, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    username: String,
    phone: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        // The role column carries a CHECK constraint; anything that is
        // not "admin" reads as a plain user.
        let role = match row.role.as_str() {
            "admin" => Role::Admin,
            _ => Role::User,
        };

        Profile {
            id: row.id,
            username: row.username,
            phone: row.phone,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn create(&self, req: &CreateProfileRequest) -> CoreResult<Profile> {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            username: req.username.clone(),
            phone: req.phone.clone(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO profiles (id, username, phone, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.phone)
        .bind(profile.role.as_str())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(profile)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(row.map(Profile::from))
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(row.map(Profile::from))
    }

    async fn list(&self) -> CoreResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> CoreResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "UPDATE profiles SET role = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::remote)?;

        row.map(Profile::from).ok_or(CoreError::NotFound("profile"))
    }
}
