use shared::protocol::{EndReason, SessionReport};
use storage::{prepare_database_url, ScoreRepository, ScoreStorage};

#[tokio::test]
async fn best_score_survives_reopening_the_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("color_match.db");
    let database_url = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("url");

    {
        let storage = ScoreStorage::new(&database_url).await.expect("open");
        storage
            .record_session(&SessionReport {
                final_score: 12,
                is_new_best: true,
                best_score: 12,
                previous_best: 0,
                reason: EndReason::TimeUp,
                duration_secs: 30,
            })
            .await
            .expect("record");
    }

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = ScoreStorage::new(&database_url).await.expect("reopen");
    assert_eq!(reopened.load_best_score().await.expect("load"), 12);
    let sessions = reopened.recent_sessions(10).await.expect("sessions");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].reason, EndReason::TimeUp);
}
