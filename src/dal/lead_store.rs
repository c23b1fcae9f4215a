use std::time::Duration;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, PgPool, SqlitePool};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::configuration::{DatabaseBackend, DatabaseSettings};
use crate::domain::candidate::{Candidate, LeadSource};
use crate::domain::lead::{DbStats, Lead, SearchHistoryEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("missing postgres settings for the postgres backend")]
    MissingPostgresSettings,
}

/// Batch-level metadata recorded alongside the audit row.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchMeta {
    pub api_queries_used: u32,
}

/// Result of one ingestion batch. The two lead lists preserve candidate
/// batch order; `failed_urls` names records that hit an I/O error and
/// landed in neither list.
#[derive(Debug, Default)]
pub struct AddLeadsOutcome {
    pub new_leads: Vec<Candidate>,
    pub duplicate_leads: Vec<Candidate>,
    pub failed_urls: Vec<String>,
}

enum Backend {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

/// The deduplication engine. One store instance owns one backend pool
/// and serializes its write batches through `write_lock` so that two
/// concurrent sightings of the same URL cannot race the read-check into
/// a double insert.
pub struct LeadStore {
    backend: Backend,
    write_lock: Mutex<()>,
}

/// Normalized identity digest: trim, lowercase, drop any trailing slash,
/// then SHA-256. This is the sole duplicate-detection key; raw URLs are
/// stored only for display.
pub fn hash_url(url: &str) -> String {
    let normalized = url.trim().to_lowercase();
    let normalized = normalized.trim_end_matches('/');
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidTimestamp(raw.to_string()))
}

const CREATE_LEADS: &str = r#"
    create table if not exists leads (
        id text primary key,
        first_name text not null default '',
        last_name text not null default '',
        company_name text not null default '',
        website_url text not null,
        email text not null default '',
        phone text not null default '',
        template text not null,
        locations text not null,
        url_hash text not null unique,
        lead_source text not null,
        location_match boolean not null default false,
        intent_match boolean not null default false,
        keyword_match boolean,
        post_created_at text,
        created_at text not null,
        last_seen text not null,
        times_seen bigint not null default 1
    )
"#;

const CREATE_HISTORY: &str = r#"
    create table if not exists search_history (
        id text primary key,
        template text not null,
        locations text not null,
        num_results bigint not null,
        new_leads bigint not null,
        duplicate_leads bigint not null,
        api_queries bigint not null default 0,
        created_at text not null
    )
"#;

const CREATE_HASH_INDEX: &str =
    "create index if not exists idx_leads_url_hash on leads(url_hash)";

const FIND_LEAD: &str = "select id from leads where url_hash = $1";

const INSERT_LEAD: &str = r#"
    insert into leads (
        id, first_name, last_name, company_name, website_url, email, phone,
        template, locations, url_hash, lead_source, location_match,
        intent_match, keyword_match, post_created_at, created_at, last_seen,
        times_seen
    ) values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, 1)
"#;

// Repeat sightings bump the counters and only overwrite contact fields
// when the new value is non-empty; template/locations/created_at stay put.
const MERGE_LEAD: &str = r#"
    update leads set
        last_seen = $1,
        times_seen = times_seen + 1,
        email = coalesce(nullif($2, ''), email),
        phone = coalesce(nullif($3, ''), phone),
        first_name = coalesce(nullif($4, ''), first_name),
        last_name = coalesce(nullif($5, ''), last_name),
        company_name = coalesce(nullif($6, ''), company_name)
    where id = $7
"#;

const INSERT_HISTORY: &str = r#"
    insert into search_history (
        id, template, locations, num_results, new_leads, duplicate_leads,
        api_queries, created_at
    ) values ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

const LEAD_COLUMNS: &str = "id, first_name, last_name, company_name, website_url, email, phone, \
     template, locations, url_hash, lead_source, location_match, intent_match, \
     keyword_match, post_created_at, created_at, last_seen, times_seen";

const SELECT_HISTORY: &str = r#"
    select template, locations, num_results, new_leads, duplicate_leads,
        api_queries, created_at
    from search_history
    order by created_at desc
    limit $1
"#;

#[derive(FromRow)]
struct LeadRow {
    id: String,
    first_name: String,
    last_name: String,
    company_name: String,
    website_url: String,
    email: String,
    phone: String,
    template: String,
    locations: String,
    url_hash: String,
    lead_source: String,
    location_match: bool,
    intent_match: bool,
    keyword_match: Option<bool>,
    post_created_at: Option<String>,
    created_at: String,
    last_seen: String,
    times_seen: i64,
}

impl LeadRow {
    fn into_lead(self) -> Result<Lead, StoreError> {
        Ok(Lead {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            company_name: self.company_name,
            website_url: self.website_url,
            email: self.email,
            phone: self.phone,
            template: self.template,
            locations: self.locations,
            url_hash: self.url_hash,
            lead_source: LeadSource::parse(&self.lead_source),
            location_match: self.location_match,
            intent_match: self.intent_match,
            keyword_match: self.keyword_match,
            post_created_at: self
                .post_created_at
                .as_deref()
                .map(parse_ts)
                .transpose()?,
            created_at: parse_ts(&self.created_at)?,
            last_seen: parse_ts(&self.last_seen)?,
            times_seen: self.times_seen,
        })
    }
}

#[derive(FromRow)]
struct HistoryRow {
    template: String,
    locations: String,
    num_results: i64,
    new_leads: i64,
    duplicate_leads: i64,
    api_queries: i64,
    created_at: String,
}

impl LeadStore {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let backend = match settings.backend {
            DatabaseBackend::Sqlite => {
                if let Some(parent) = std::path::Path::new(&settings.sqlite_path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .map_err(|e| sqlx::Error::Io(e))?;
                    }
                }
                let options = SqliteConnectOptions::new()
                    .filename(&settings.sqlite_path)
                    .create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(5)
                    .connect_with(options)
                    .await?;
                Backend::Sqlite(pool)
            }
            DatabaseBackend::Postgres => {
                let postgres = settings
                    .postgres
                    .as_ref()
                    .ok_or(StoreError::MissingPostgresSettings)?;
                let pool = PgPoolOptions::new()
                    .max_connections(20)
                    .min_connections(5)
                    .acquire_timeout(Duration::from_secs(10))
                    .idle_timeout(Duration::from_secs(15 * 60))
                    .max_lifetime(None)
                    .connect_lazy_with(postgres.with_db());
                Backend::Postgres(pool)
            }
        };

        let store = LeadStore {
            backend,
            write_lock: Mutex::new(()),
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_LEADS, CREATE_HISTORY, CREATE_HASH_INDEX] {
            match &self.backend {
                Backend::Sqlite(pool) => {
                    sqlx::query(statement).execute(pool).await?;
                }
                Backend::Postgres(pool) => {
                    sqlx::query(statement).execute(pool).await?;
                }
            }
        }
        Ok(())
    }

    /// Ingest one batch of candidates. First sighting of a normalized URL
    /// inserts; a repeat sighting merges. Candidates without a URL are
    /// silently skipped. Exactly one history row is appended per call,
    /// even when individual records fail; failed records are logged and
    /// surfaced rather than aborting work already committed.
    pub async fn add_leads(
        &self,
        candidates: &[Candidate],
        template: &str,
        locations: &[String],
        meta: &BatchMeta,
    ) -> Result<AddLeadsOutcome, StoreError> {
        let _guard = self.write_lock.lock().await;

        let location_str = locations.join(", ");
        let now = fmt_ts(Utc::now());
        let mut outcome = AddLeadsOutcome::default();

        for candidate in candidates {
            let url = candidate.website_url.trim();
            if url.is_empty() {
                continue;
            }
            let url_hash = hash_url(url);

            let upserted = match self.find_lead_id(&url_hash).await {
                Ok(Some(existing_id)) => self
                    .merge_lead(&existing_id, candidate, &now)
                    .await
                    .map(|_| false),
                Ok(None) => self
                    .insert_lead(candidate, url, &url_hash, template, &location_str, &now)
                    .await
                    .map(|_| true),
                Err(e) => Err(e),
            };

            match upserted {
                Ok(true) => outcome.new_leads.push(candidate.clone()),
                Ok(false) => outcome.duplicate_leads.push(candidate.clone()),
                Err(e) => {
                    log::error!("Failed to persist lead for {}: {:?}", url, e);
                    outcome.failed_urls.push(url.to_string());
                }
            }
        }

        self.insert_history(
            template,
            &location_str,
            candidates.len() as i64,
            outcome.new_leads.len() as i64,
            outcome.duplicate_leads.len() as i64,
            meta.api_queries_used as i64,
            &now,
        )
        .await?;

        Ok(outcome)
    }

    async fn find_lead_id(&self, url_hash: &str) -> Result<Option<String>, sqlx::Error> {
        match &self.backend {
            Backend::Sqlite(pool) => {
                sqlx::query_scalar::<_, String>(FIND_LEAD)
                    .bind(url_hash)
                    .fetch_optional(pool)
                    .await
            }
            Backend::Postgres(pool) => {
                sqlx::query_scalar::<_, String>(FIND_LEAD)
                    .bind(url_hash)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    async fn insert_lead(
        &self,
        candidate: &Candidate,
        url: &str,
        url_hash: &str,
        template: &str,
        locations: &str,
        now: &str,
    ) -> Result<(), sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let post_created_at = candidate.post_created_at.map(fmt_ts);

        macro_rules! run {
            ($pool:expr) => {
                sqlx::query(INSERT_LEAD)
                    .bind(&id)
                    .bind(candidate.first_name.as_deref().unwrap_or(""))
                    .bind(candidate.last_name.as_deref().unwrap_or(""))
                    .bind(candidate.company_name.as_deref().unwrap_or(""))
                    .bind(url)
                    .bind(candidate.email.as_deref().unwrap_or(""))
                    .bind(candidate.phone.as_deref().unwrap_or(""))
                    .bind(template)
                    .bind(locations)
                    .bind(url_hash)
                    .bind(candidate.lead_source.as_str())
                    .bind(candidate.location_match)
                    .bind(candidate.intent_match)
                    .bind(candidate.keyword_match)
                    .bind(post_created_at.as_deref())
                    .bind(now)
                    .bind(now)
                    .execute($pool)
                    .await
                    .map(|_| ())
            };
        }

        match &self.backend {
            Backend::Sqlite(pool) => run!(pool),
            Backend::Postgres(pool) => run!(pool),
        }
    }

    async fn merge_lead(
        &self,
        id: &str,
        candidate: &Candidate,
        now: &str,
    ) -> Result<(), sqlx::Error> {
        macro_rules! run {
            ($pool:expr) => {
                sqlx::query(MERGE_LEAD)
                    .bind(now)
                    .bind(candidate.email.as_deref().unwrap_or(""))
                    .bind(candidate.phone.as_deref().unwrap_or(""))
                    .bind(candidate.first_name.as_deref().unwrap_or(""))
                    .bind(candidate.last_name.as_deref().unwrap_or(""))
                    .bind(candidate.company_name.as_deref().unwrap_or(""))
                    .bind(id)
                    .execute($pool)
                    .await
                    .map(|_| ())
            };
        }

        match &self.backend {
            Backend::Sqlite(pool) => run!(pool),
            Backend::Postgres(pool) => run!(pool),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_history(
        &self,
        template: &str,
        locations: &str,
        num_results: i64,
        new_leads: i64,
        duplicate_leads: i64,
        api_queries: i64,
        now: &str,
    ) -> Result<(), sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        macro_rules! run {
            ($pool:expr) => {
                sqlx::query(INSERT_HISTORY)
                    .bind(&id)
                    .bind(template)
                    .bind(locations)
                    .bind(num_results)
                    .bind(new_leads)
                    .bind(duplicate_leads)
                    .bind(api_queries)
                    .bind(now)
                    .execute($pool)
                    .await
                    .map(|_| ())
            };
        }

        match &self.backend {
            Backend::Sqlite(pool) => run!(pool),
            Backend::Postgres(pool) => run!(pool),
        }
    }

    /// All leads, newest first, optionally restricted to one template.
    pub async fn get_all_leads(&self, template: Option<&str>) -> Result<Vec<Lead>, StoreError> {
        let sql_all = format!("select {} from leads order by created_at desc", LEAD_COLUMNS);
        let sql_by_template = format!(
            "select {} from leads where template = $1 order by created_at desc",
            LEAD_COLUMNS
        );

        let rows: Vec<LeadRow> = match (&self.backend, template) {
            (Backend::Sqlite(pool), None) => {
                sqlx::query_as(&sql_all).fetch_all(pool).await?
            }
            (Backend::Sqlite(pool), Some(template)) => {
                sqlx::query_as(&sql_by_template)
                    .bind(template)
                    .fetch_all(pool)
                    .await?
            }
            (Backend::Postgres(pool), None) => {
                sqlx::query_as(&sql_all).fetch_all(pool).await?
            }
            (Backend::Postgres(pool), Some(template)) => {
                sqlx::query_as(&sql_by_template)
                    .bind(template)
                    .fetch_all(pool)
                    .await?
            }
        };

        rows.into_iter().map(LeadRow::into_lead).collect()
    }

    pub async fn get_search_history(
        &self,
        limit: i64,
    ) -> Result<Vec<SearchHistoryEntry>, StoreError> {
        let rows: Vec<HistoryRow> = match &self.backend {
            Backend::Sqlite(pool) => {
                sqlx::query_as(SELECT_HISTORY)
                    .bind(limit)
                    .fetch_all(pool)
                    .await?
            }
            Backend::Postgres(pool) => {
                sqlx::query_as(SELECT_HISTORY)
                    .bind(limit)
                    .fetch_all(pool)
                    .await?
            }
        };

        rows.into_iter()
            .map(|row| {
                Ok(SearchHistoryEntry {
                    template: row.template,
                    locations: row.locations,
                    num_results: row.num_results,
                    new_leads: row.new_leads,
                    duplicate_leads: row.duplicate_leads,
                    api_queries: row.api_queries,
                    created_at: parse_ts(&row.created_at)?,
                })
            })
            .collect()
    }

    pub async fn get_stats(&self) -> Result<DbStats, StoreError> {
        let today = Local::now().format("%Y-%m-%d").to_string();

        Ok(DbStats {
            total_leads: self.count("select count(*) from leads").await?,
            leads_with_email: self
                .count("select count(*) from leads where email <> ''")
                .await?,
            leads_with_phone: self
                .count("select count(*) from leads where phone <> ''")
                .await?,
            new_today: self
                .count_for_date(
                    "select count(*) from leads where substr(created_at, 1, 10) = $1",
                    &today,
                )
                .await?,
            total_searches: self.count("select count(*) from search_history").await?,
            most_used_template: self.most_used_template().await?,
            total_api_queries: self
                .count(
                    "select cast(coalesce(sum(api_queries), 0) as bigint) from search_history",
                )
                .await?,
            api_queries_today: self
                .count_for_date(
                    "select cast(coalesce(sum(api_queries), 0) as bigint) \
                     from search_history where substr(created_at, 1, 10) = $1",
                    &today,
                )
                .await?,
        })
    }

    async fn count(&self, sql: &str) -> Result<i64, StoreError> {
        let count = match &self.backend {
            Backend::Sqlite(pool) => {
                sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?
            }
            Backend::Postgres(pool) => {
                sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?
            }
        };
        Ok(count)
    }

    async fn count_for_date(&self, sql: &str, date: &str) -> Result<i64, StoreError> {
        let count = match &self.backend {
            Backend::Sqlite(pool) => {
                sqlx::query_scalar::<_, i64>(sql)
                    .bind(date)
                    .fetch_one(pool)
                    .await?
            }
            Backend::Postgres(pool) => {
                sqlx::query_scalar::<_, i64>(sql)
                    .bind(date)
                    .fetch_one(pool)
                    .await?
            }
        };
        Ok(count)
    }

    async fn most_used_template(&self) -> Result<String, StoreError> {
        const SQL: &str = "select template from search_history \
             group by template order by count(*) desc limit 1";

        let template = match &self.backend {
            Backend::Sqlite(pool) => {
                sqlx::query_scalar::<_, String>(SQL).fetch_optional(pool).await?
            }
            Backend::Postgres(pool) => {
                sqlx::query_scalar::<_, String>(SQL).fetch_optional(pool).await?
            }
        };
        Ok(template.unwrap_or_else(|| "None".to_string()))
    }

    pub async fn delete_lead(&self, id: &str) -> Result<bool, StoreError> {
        const SQL: &str = "delete from leads where id = $1";

        let rows_affected = match &self.backend {
            Backend::Sqlite(pool) => {
                sqlx::query(SQL).bind(id).execute(pool).await?.rows_affected()
            }
            Backend::Postgres(pool) => {
                sqlx::query(SQL).bind(id).execute(pool).await?.rows_affected()
            }
        };
        Ok(rows_affected > 0)
    }

    /// Destructive: removes every lead and history row. Callers gate this
    /// behind an explicit confirmation.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        for sql in ["delete from leads", "delete from search_history"] {
            match &self.backend {
                Backend::Sqlite(pool) => {
                    sqlx::query(sql).execute(pool).await?;
                }
                Backend::Postgres(pool) => {
                    sqlx::query(sql).execute(pool).await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> LeadStore {
        // A single connection keeps every query on the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = LeadStore {
            backend: Backend::Sqlite(pool),
            write_lock: Mutex::new(()),
        };
        store.init_schema().await.unwrap();
        store
    }

    fn candidate(url: &str) -> Candidate {
        Candidate {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            company_name: None,
            website_url: url.to_string(),
            email: Some("jane@gmail.com".to_string()),
            phone: None,
            location_match: true,
            intent_match: true,
            keyword_match: Some(true),
            lead_source: LeadSource::Cse,
            post_created_at: None,
        }
    }

    fn locations() -> Vec<String> {
        vec!["Boston MA".to_string()]
    }

    #[test]
    fn url_hash_ignores_case_and_whitespace() {
        assert_eq!(
            hash_url("HTTP://Example.com/Page "),
            hash_url("http://example.com/page")
        );
        assert_ne!(
            hash_url("http://example.com/page"),
            hash_url("http://example.com/other")
        );
    }

    #[tokio::test]
    async fn repeat_sighting_bumps_times_seen_and_keeps_created_at() {
        let store = memory_store().await;
        let c = candidate("https://example.com/lead");

        store
            .add_leads(&[c.clone()], "realtors", &locations(), &BatchMeta::default())
            .await
            .unwrap();
        let first = store.get_all_leads(None).await.unwrap().remove(0);

        store
            .add_leads(&[c], "realtors", &locations(), &BatchMeta::default())
            .await
            .unwrap();
        let leads = store.get_all_leads(None).await.unwrap();

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].times_seen, 2);
        assert_eq!(leads[0].created_at, first.created_at);
        assert!(leads[0].last_seen >= first.last_seen);
    }

    #[tokio::test]
    async fn merge_never_clobbers_populated_fields_with_empty_ones() {
        let store = memory_store().await;
        let mut full = candidate("https://example.com/lead");
        full.phone = Some("(617) 555-0101".to_string());

        store
            .add_leads(&[full], "realtors", &locations(), &BatchMeta::default())
            .await
            .unwrap();

        let mut sparse = candidate("https://example.com/lead");
        sparse.email = Some("".to_string());
        sparse.phone = None;
        sparse.first_name = None;

        store
            .add_leads(&[sparse], "realtors", &locations(), &BatchMeta::default())
            .await
            .unwrap();

        let lead = store.get_all_leads(None).await.unwrap().remove(0);
        assert_eq!(lead.email, "jane@gmail.com");
        assert_eq!(lead.phone, "(617) 555-0101");
        assert_eq!(lead.first_name, "Jane");
    }

    #[tokio::test]
    async fn merge_overwrites_with_new_non_empty_values() {
        let store = memory_store().await;
        let mut original = candidate("https://example.com/lead");
        original.email = None;

        store
            .add_leads(&[original], "realtors", &locations(), &BatchMeta::default())
            .await
            .unwrap();

        let richer = candidate("https://example.com/lead");
        store
            .add_leads(&[richer], "realtors", &locations(), &BatchMeta::default())
            .await
            .unwrap();

        let lead = store.get_all_leads(None).await.unwrap().remove(0);
        assert_eq!(lead.email, "jane@gmail.com");
    }

    #[tokio::test]
    async fn batch_splits_new_duplicate_and_skipped() {
        let store = memory_store().await;

        // Pre-existing lead that candidate B will collide with.
        store
            .add_leads(
                &[candidate("https://example.com/listing")],
                "realtors",
                &locations(),
                &BatchMeta::default(),
            )
            .await
            .unwrap();

        let a = candidate("https://example.com/fresh");
        // Differs only by trailing slash and case: same identity.
        let b = candidate("HTTPS://Example.com/listing/");
        let c = candidate("");

        let outcome = store
            .add_leads(
                &[a, b, c],
                "realtors",
                &locations(),
                &BatchMeta { api_queries_used: 3 },
            )
            .await
            .unwrap();

        assert_eq!(outcome.new_leads.len(), 1);
        assert_eq!(outcome.new_leads[0].website_url, "https://example.com/fresh");
        assert_eq!(outcome.duplicate_leads.len(), 1);
        assert!(outcome.failed_urls.is_empty());

        // One row per call: the seed batch plus this one.
        let history = store.get_search_history(10).await.unwrap();
        assert_eq!(history.len(), 2);
        let batch = history
            .iter()
            .find(|entry| entry.num_results == 3)
            .expect("batch row recorded");
        assert_eq!(batch.new_leads, 1);
        assert_eq!(batch.duplicate_leads, 1);
        assert_eq!(batch.api_queries, 3);
    }

    #[tokio::test]
    async fn template_filter_and_ordering() {
        let store = memory_store().await;
        store
            .add_leads(
                &[candidate("https://example.com/one")],
                "realtors",
                &locations(),
                &BatchMeta::default(),
            )
            .await
            .unwrap();
        store
            .add_leads(
                &[candidate("https://example.com/two")],
                "home_sellers",
                &locations(),
                &BatchMeta::default(),
            )
            .await
            .unwrap();

        let all = store.get_all_leads(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);

        let sellers = store.get_all_leads(Some("home_sellers")).await.unwrap();
        assert_eq!(sellers.len(), 1);
        assert_eq!(sellers[0].website_url, "https://example.com/two");
    }

    #[tokio::test]
    async fn stats_count_contactable_leads_and_batches() {
        let store = memory_store().await;
        let mut no_contact = candidate("https://example.com/one");
        no_contact.email = None;

        store
            .add_leads(
                &[no_contact, candidate("https://example.com/two")],
                "realtors",
                &locations(),
                &BatchMeta { api_queries_used: 2 },
            )
            .await
            .unwrap();

        let stats = store.get_stats().await.unwrap();
        assert_eq!(stats.total_leads, 2);
        assert_eq!(stats.leads_with_email, 1);
        assert_eq!(stats.leads_with_phone, 0);
        assert_eq!(stats.total_searches, 1);
        assert_eq!(stats.most_used_template, "realtors");
        assert_eq!(stats.total_api_queries, 2);
    }

    #[tokio::test]
    async fn clear_all_empties_both_tables() {
        let store = memory_store().await;
        store
            .add_leads(
                &[candidate("https://example.com/one")],
                "realtors",
                &locations(),
                &BatchMeta::default(),
            )
            .await
            .unwrap();

        store.clear_all().await.unwrap();

        let stats = store.get_stats().await.unwrap();
        assert_eq!(stats.total_leads, 0);
        assert_eq!(stats.total_searches, 0);
        assert_eq!(stats.most_used_template, "None");
    }

    #[tokio::test]
    async fn delete_lead_by_id() {
        let store = memory_store().await;
        store
            .add_leads(
                &[candidate("https://example.com/one")],
                "realtors",
                &locations(),
                &BatchMeta::default(),
            )
            .await
            .unwrap();

        let lead = store.get_all_leads(None).await.unwrap().remove(0);
        assert!(store.delete_lead(&lead.id).await.unwrap());
        assert!(!store.delete_lead(&lead.id).await.unwrap());
        assert!(store.get_all_leads(None).await.unwrap().is_empty());
    }
}
