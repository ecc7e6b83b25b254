//! Profile storage. The generation pipeline only ever reads profiles; writes
//! come from the HTTP edge.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::profile::{JobRole, Profile, ProfileRow};

const MAX_EXPERIENCE_YEARS: u32 = 60;
const MAX_SKILLS: usize = 50;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>>;
    async fn list(&self) -> Result<Vec<Profile>>;
    /// Inserts or replaces by id and returns the stored profile.
    async fn upsert(&self, profile: Profile) -> Result<Profile>;
}

/// Request body for creating or replacing a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub role: JobRole,
    pub experience_years: u32,
    pub summary: String,
    #[serde(default)]
    pub project_text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl ProfileInput {
    /// Trims text fields and drops blank skills. Returns a message on
    /// invalid input.
    pub fn into_profile(self, id: Uuid) -> Result<Profile, String> {
        let summary = self.summary.trim().to_string();
        if summary.is_empty() {
            return Err("summary must not be empty".to_string());
        }
        if self.experience_years > MAX_EXPERIENCE_YEARS {
            return Err(format!(
                "experience_years must be at most {MAX_EXPERIENCE_YEARS}"
            ));
        }
        let skills: Vec<String> = self
            .skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if skills.len() > MAX_SKILLS {
            return Err(format!("at most {MAX_SKILLS} skills are allowed"));
        }

        Ok(Profile {
            id,
            role: self.role,
            experience_years: self.experience_years,
            summary,
            project_text: self
                .project_text
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            skills,
        })
    }
}

// ── Postgres ──────────────────────────────────────────────────────────────

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Profile>> {
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Profile::try_from)
            .collect()
    }

    async fn upsert(&self, profile: Profile) -> Result<Profile> {
        let years = i32::try_from(profile.experience_years)?;
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, role, experience_years, summary, project_text, skills)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                role = EXCLUDED.role,
                experience_years = EXCLUDED.experience_years,
                summary = EXCLUDED.summary,
                project_text = EXCLUDED.project_text,
                skills = EXCLUDED.skills,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(profile.role.code())
        .bind(years)
        .bind(&profile.summary)
        .bind(&profile.project_text)
        .bind(&profile.skills)
        .fetch_one(&self.pool)
        .await?;
        Profile::try_from(row)
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────

/// Used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    /// Insertion order, so `list` is stable.
    order: RwLock<Vec<Uuid>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(self
            .order
            .read()
            .await
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect())
    }

    async fn upsert(&self, profile: Profile) -> Result<Profile> {
        let mut profiles = self.profiles.write().await;
        if profiles.insert(profile.id, profile.clone()).is_none() {
            self.order.write().await.push(profile.id);
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProfileInput {
        ProfileInput {
            role: JobRole::BackendDeveloper,
            experience_years: 3,
            summary: "  주문 시스템 개발  ".to_string(),
            project_text: Some("   ".to_string()),
            skills: vec!["Java".to_string(), " ".to_string(), " Kafka ".to_string()],
        }
    }

    #[test]
    fn test_input_is_normalized() {
        let p = input().into_profile(Uuid::new_v4()).unwrap();
        assert_eq!(p.summary, "주문 시스템 개발");
        assert_eq!(p.project_text, None);
        assert_eq!(p.skills, vec!["Java", "Kafka"]);
    }

    #[test]
    fn test_input_rejects_blank_summary() {
        let mut bad = input();
        bad.summary = "  ".to_string();
        assert!(bad.into_profile(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_input_rejects_implausible_experience() {
        let mut bad = input();
        bad.experience_years = 99;
        assert!(bad.into_profile(Uuid::new_v4()).is_err());
    }

    #[tokio::test]
    async fn test_in_memory_upsert_replaces_and_keeps_order() {
        let store = InMemoryProfileStore::new();
        let a = input().into_profile(Uuid::new_v4()).unwrap();
        let b = input().into_profile(Uuid::new_v4()).unwrap();
        store.upsert(a.clone()).await.unwrap();
        store.upsert(b.clone()).await.unwrap();

        let mut edited = a.clone();
        edited.experience_years = 7;
        store.upsert(edited).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[0].experience_years, 7);
        assert_eq!(store.get(b.id).await.unwrap(), Some(b));
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }
}
