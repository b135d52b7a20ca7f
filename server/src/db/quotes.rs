use crate::db::models::{NewQuote, Quote, QuoteFilter, QuoteStats, QuoteStatus};
use crate::db::DbPool;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

pub async fn create_quote(pool: &DbPool, quote: NewQuote) -> Result<Quote, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query_as::<_, Quote>(
        r#"
        INSERT INTO quotes (id, name, phone, email, service, message, privacy_consent, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(quote.name)
    .bind(quote.phone)
    .bind(quote.email)
    .bind(quote.service)
    .bind(quote.message)
    .bind(quote.privacy_consent)
    .bind(QuoteStatus::default())
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn get_quote_by_id(pool: &DbPool, id: &str) -> Result<Option<Quote>, sqlx::Error> {
    sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns one page of quotes matching `filter`, newest first, together with
/// the number of quotes matching the filter across all pages.
pub async fn list_quotes(pool: &DbPool, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), sqlx::Error> {
    let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM quotes");
    push_filter(&mut select, filter);
    select
        .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    let quotes = select.build_query_as::<Quote>().fetch_all(pool).await?;

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM quotes");
    push_filter(&mut count, filter);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok((quotes, total))
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &QuoteFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(service) = filter.service {
        builder.push(" AND service = ").push_bind(service);
    }
    if let Some(since) = filter.created_since {
        builder.push(" AND created_at >= ").push_bind(since);
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        builder
            .push(" AND (LOWER(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(email) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR phone LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// Case-insensitive substring pattern with LIKE wildcards escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub async fn update_quote_status(
    pool: &DbPool,
    id: &str,
    status: QuoteStatus,
) -> Result<Option<Quote>, sqlx::Error> {
    sqlx::query_as::<_, Quote>(
        r#"
        UPDATE quotes
        SET status = $1, updated_at = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was removed.
pub async fn delete_quote(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn bulk_delete_quotes(pool: &DbPool, ids: &[String]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM quotes WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn bulk_update_quote_status(
    pool: &DbPool,
    ids: &[String],
    status: QuoteStatus,
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE quotes SET status = ");
    builder
        .push_bind(status)
        .push(", updated_at = ")
        .push_bind(Utc::now())
        .push(" WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn count_by_status(pool: &DbPool) -> Result<QuoteStats, sqlx::Error> {
    let rows = sqlx::query_as::<_, (QuoteStatus, i64)>(
        "SELECT status, COUNT(*) FROM quotes GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    let mut stats = QuoteStats::default();
    for (status, count) in rows {
        stats.total += count;
        match status {
            QuoteStatus::Pending => stats.pending = count,
            QuoteStatus::Contacted => stats.contacted = count,
            QuoteStatus::Completed => stats.completed = count,
            QuoteStatus::Cancelled => stats.cancelled = count,
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{PrivacyConsent, Service};
    use crate::db::{create_memory_pool, run_migrations};
    use chrono::Duration;

    async fn pool() -> DbPool {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn new_quote(name: &str, service: Service) -> NewQuote {
        NewQuote {
            name: name.to_string(),
            phone: "+39 320 661 1519".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            service,
            message: None,
            privacy_consent: PrivacyConsent::Allowed,
        }
    }

    fn page(limit: i64, offset: i64) -> QuoteFilter {
        QuoteFilter {
            limit,
            offset,
            ..Default::default()
        }
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Ro_ssi"), "%ro\\_ssi%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
    }

    #[tokio::test]
    async fn created_quote_starts_pending() {
        let pool = pool().await;
        let quote = create_quote(&pool, new_quote("Mario", Service::Plumbing)).await.unwrap();

        assert_eq!(quote.status, QuoteStatus::Pending);
        assert_eq!(quote.created_at, quote.updated_at);
        let fetched = get_quote_by_id(&pool, &quote.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, quote.id);
        assert!(get_quote_by_id(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_paged() {
        let pool = pool().await;
        for name in ["First", "Second", "Third"] {
            create_quote(&pool, new_quote(name, Service::Locks)).await.unwrap();
        }

        let (quotes, total) = list_quotes(&pool, &page(2, 0)).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].name, "Third");

        let (rest, _) = list_quotes(&pool, &page(2, 2)).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "First");
    }

    #[tokio::test]
    async fn filters_combine() {
        let pool = pool().await;
        let a = create_quote(&pool, new_quote("Giulia", Service::Plumbing)).await.unwrap();
        create_quote(&pool, new_quote("Luca", Service::Plumbing)).await.unwrap();
        create_quote(&pool, new_quote("Giorgio", Service::Shutters)).await.unwrap();
        update_quote_status(&pool, &a.id, QuoteStatus::Contacted).await.unwrap();

        let filter = QuoteFilter {
            service: Some(Service::Plumbing),
            ..page(10, 0)
        };
        assert_eq!(list_quotes(&pool, &filter).await.unwrap().1, 2);

        let filter = QuoteFilter {
            status: Some(QuoteStatus::Contacted),
            service: Some(Service::Plumbing),
            ..page(10, 0)
        };
        let (quotes, total) = list_quotes(&pool, &filter).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(quotes[0].name, "Giulia");

        let filter = QuoteFilter {
            search: Some("GIO".to_string()),
            ..page(10, 0)
        };
        let (quotes, _) = list_quotes(&pool, &filter).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].name, "Giorgio");

        let filter = QuoteFilter {
            created_since: Some(Utc::now() + Duration::hours(1)),
            ..page(10, 0)
        };
        assert_eq!(list_quotes(&pool, &filter).await.unwrap().1, 0);
    }

    fn search(term: &str) -> QuoteFilter {
        QuoteFilter {
            search: Some(term.to_string()),
            ..page(10, 0)
        }
    }

    #[tokio::test]
    async fn search_covers_email_and_phone() {
        let pool = pool().await;
        let mut anna = new_quote("Anna", Service::Locks);
        anna.email = "anna.bianchi@studio-rossi.it".to_string();
        anna.phone = "0423 555 123".to_string();
        create_quote(&pool, anna).await.unwrap();
        create_quote(&pool, new_quote("Bruno", Service::Locks)).await.unwrap();

        let (quotes, total) = list_quotes(&pool, &search("320 661")).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(quotes[0].name, "Bruno");

        let (quotes, total) = list_quotes(&pool, &search("EXAMPLE.COM")).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(quotes[0].name, "Bruno");

        let (quotes, _) = list_quotes(&pool, &search("Studio-Rossi")).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].name, "Anna");

        assert_eq!(list_quotes(&pool, &search("555 123")).await.unwrap().1, 1);
        assert_eq!(list_quotes(&pool, &search("nobody")).await.unwrap().1, 0);
    }

    #[tokio::test]
    async fn search_wildcards_match_literally() {
        let pool = pool().await;
        let mut underscored = new_quote("Ro_ssi", Service::Plumbing);
        underscored.email = "ro_ssi@example.com".to_string();
        create_quote(&pool, underscored).await.unwrap();
        create_quote(&pool, new_quote("Rossi", Service::Plumbing)).await.unwrap();
        create_quote(&pool, new_quote("Roxssi", Service::Plumbing)).await.unwrap();

        let (quotes, total) = list_quotes(&pool, &search("ro_s")).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(quotes[0].name, "Ro_ssi");

        assert_eq!(list_quotes(&pool, &search("%")).await.unwrap().1, 0);
    }

    #[tokio::test]
    async fn status_update_and_delete() {
        let pool = pool().await;
        let quote = create_quote(&pool, new_quote("Paolo", Service::Locks)).await.unwrap();

        let updated = update_quote_status(&pool, &quote.id, QuoteStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, QuoteStatus::Completed);
        assert!(updated.updated_at >= quote.updated_at);
        assert!(update_quote_status(&pool, "missing", QuoteStatus::Completed)
            .await
            .unwrap()
            .is_none());

        assert!(delete_quote(&pool, &quote.id).await.unwrap());
        assert!(!delete_quote(&pool, &quote.id).await.unwrap());
    }

    #[tokio::test]
    async fn bulk_operations_report_affected_rows() {
        let pool = pool().await;
        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            ids.push(create_quote(&pool, new_quote(name, Service::Shutters)).await.unwrap().id);
        }

        let modified = bulk_update_quote_status(&pool, &ids[..2], QuoteStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(modified, 2);

        let stats = count_by_status(&pool).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.cancelled, 2);
        assert_eq!(stats.pending, 1);

        let mut targets = ids[1..].to_vec();
        targets.push("missing".to_string());
        assert_eq!(bulk_delete_quotes(&pool, &targets).await.unwrap(), 2);
        assert_eq!(bulk_delete_quotes(&pool, &[]).await.unwrap(), 0);
        assert_eq!(list_quotes(&pool, &page(10, 0)).await.unwrap().1, 1);
    }
}
