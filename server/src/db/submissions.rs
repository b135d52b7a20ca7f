use crate::db::models::{FormSubmission, NewFormSubmission, SubmissionStatus};
use crate::db::DbPool;
use chrono::Utc;
use uuid::Uuid;

pub async fn create_submission(
    pool: &DbPool,
    submission: NewFormSubmission,
) -> Result<FormSubmission, sqlx::Error> {
    sqlx::query_as::<_, FormSubmission>(
        r#"
        INSERT INTO form_submissions (id, full_name, phone, email, service, message, gdpr_consent, status, submitted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(submission.full_name)
    .bind(submission.phone)
    .bind(submission.email)
    .bind(submission.service)
    .bind(submission.message)
    .bind(submission.gdpr_consent)
    .bind(SubmissionStatus::default())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn list_submissions(pool: &DbPool) -> Result<Vec<FormSubmission>, sqlx::Error> {
    sqlx::query_as::<_, FormSubmission>(
        "SELECT * FROM form_submissions ORDER BY submitted_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, run_migrations};

    #[tokio::test]
    async fn submissions_list_newest_first() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        for name in ["Older", "Newer"] {
            create_submission(
                &pool,
                NewFormSubmission {
                    full_name: name.to_string(),
                    phone: "0423 000000".to_string(),
                    email: "client@example.com".to_string(),
                    service: "locks".to_string(),
                    message: "Door jammed".to_string(),
                    gdpr_consent: true,
                },
            )
            .await
            .unwrap();
        }

        let submissions = list_submissions(&pool).await.unwrap();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[0].full_name, "Newer");
        assert_eq!(submissions[0].status, SubmissionStatus::New);
        assert!(submissions[0].gdpr_consent);
    }
}
