//! EngagementService tests
//!
//! Like/unlike/share/resolve against a real SQLite database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use tempfile::TempDir;

use vistagram::config::{StaticConfig, init_config_with};
use vistagram::errors::VistagramError;
use vistagram::services::{EngagementService, RandomCodeGenerator, ShortCodeGenerator};
use vistagram::storage::{IdentityProfile, NewPost, SeaOrmStorage};

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config_with(StaticConfig::default());
    });
}

struct TestEnv {
    storage: Arc<SeaOrmStorage>,
    _temp_dir: TempDir,
}

async fn create_test_env() -> TestEnv {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("engagement_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );

    TestEnv {
        storage,
        _temp_dir: temp_dir,
    }
}

async fn create_user(storage: &SeaOrmStorage, email: &str) -> String {
    storage
        .upsert_user_by_email(IdentityProfile {
            email: email.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create user")
        .id
}

async fn create_post(storage: &SeaOrmStorage, author: &str) -> String {
    storage
        .insert_post(NewPost {
            user_id: author.to_string(),
            image_url: "https://img.example.com/sunset.jpg".to_string(),
            caption: Some("sunset".to_string()),
        })
        .await
        .expect("Failed to create post")
        .id
}

fn random_service(storage: Arc<SeaOrmStorage>) -> EngagementService {
    EngagementService::new(storage, Arc::new(RandomCodeGenerator::default()), 10)
}

/// Always returns the same code
struct FixedGenerator {
    code: String,
    calls: AtomicUsize,
}

impl FixedGenerator {
    fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl ShortCodeGenerator for FixedGenerator {
    fn generate(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.code.clone()
    }
}

/// Hands out queued codes, then falls back to random ones
struct QueuedGenerator {
    queue: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl QueuedGenerator {
    fn new(codes: &[&str]) -> Self {
        let mut queue: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        queue.reverse();
        Self {
            queue: Mutex::new(queue),
            calls: AtomicUsize::new(0),
        }
    }
}

impl ShortCodeGenerator for QueuedGenerator {
    fn generate(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| RandomCodeGenerator::default().generate())
    }
}

// =============================================================================
// Likes
// =============================================================================

#[tokio::test]
async fn test_like_twice_fails_and_counts_once() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());
    let user = create_user(&env.storage, "ana@example.com").await;
    let post = create_post(&env.storage, &user).await;

    let first = service.like(&user, &post).await.unwrap();
    assert_eq!(first.like_count, 1);
    assert!(first.is_liked);

    let second = service.like(&user, &post).await;
    assert!(matches!(second, Err(VistagramError::AlreadyLiked(_))));

    let status = service.get_status(&post, Some(&user)).await.unwrap();
    assert_eq!(status.like_count, 1);
    assert!(status.is_liked);
}

#[tokio::test]
async fn test_unlike_without_like_fails() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());
    let user = create_user(&env.storage, "ben@example.com").await;
    let post = create_post(&env.storage, &user).await;

    let result = service.unlike(&user, &post).await;
    assert!(matches!(result, Err(VistagramError::NotLiked(_))));

    let status = service.get_status(&post, Some(&user)).await.unwrap();
    assert_eq!(status.like_count, 0);
}

#[tokio::test]
async fn test_like_unlike_round_trip() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());
    let author = create_user(&env.storage, "author@example.com").await;
    let fan = create_user(&env.storage, "fan@example.com").await;
    let post = create_post(&env.storage, &author).await;

    service.like(&author, &post).await.unwrap();
    let before = service.get_status(&post, Some(&fan)).await.unwrap();
    assert_eq!(before.like_count, 1);
    assert!(!before.is_liked);

    service.like(&fan, &post).await.unwrap();
    let unliked = service.unlike(&fan, &post).await.unwrap();
    assert_eq!(unliked.like_count, 1);
    assert!(!unliked.is_liked);

    let after = service.get_status(&post, Some(&fan)).await.unwrap();
    assert_eq!(after.like_count, before.like_count);
    assert!(!after.is_liked);
}

#[tokio::test]
async fn test_unlike_twice() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());
    let user = create_user(&env.storage, "cleo@example.com").await;
    let post = create_post(&env.storage, &user).await;

    service.like(&user, &post).await.unwrap();
    let first = service.unlike(&user, &post).await.unwrap();
    assert_eq!(first.like_count, 0);

    let second = service.unlike(&user, &post).await;
    assert!(matches!(second, Err(VistagramError::NotLiked(_))));

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.like_count, 0);
}

#[tokio::test]
async fn test_concurrent_likes_from_two_users() {
    let env = create_test_env().await;
    let service = Arc::new(random_service(env.storage.clone()));
    let a = create_user(&env.storage, "a@example.com").await;
    let b = create_user(&env.storage, "b@example.com").await;
    let post = create_post(&env.storage, &a).await;

    let (ra, rb) = tokio::join!(service.like(&a, &post), service.like(&b, &post));
    assert!(ra.is_ok(), "first like failed: {:?}", ra);
    assert!(rb.is_ok(), "second like failed: {:?}", rb);

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.like_count, 2);
}

#[tokio::test]
async fn test_concurrent_likes_from_many_users() {
    let env = create_test_env().await;
    let service = Arc::new(random_service(env.storage.clone()));
    let author = create_user(&env.storage, "host@example.com").await;
    let post = create_post(&env.storage, &author).await;

    let mut users = Vec::new();
    for i in 0..8 {
        users.push(create_user(&env.storage, &format!("user{}@example.com", i)).await);
    }

    let mut handles = Vec::new();
    for user in users {
        let service = service.clone();
        let post = post.clone();
        handles.push(tokio::spawn(async move { service.like(&user, &post).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.like_count, 8);
}

#[tokio::test]
async fn test_concurrent_duplicate_like_counts_once() {
    let env = create_test_env().await;
    let service = Arc::new(random_service(env.storage.clone()));
    let user = create_user(&env.storage, "dup@example.com").await;
    let post = create_post(&env.storage, &user).await;

    let (r1, r2) = tokio::join!(service.like(&user, &post), service.like(&user, &post));
    let ok = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(ok, 1);
    assert!(
        matches!(r1, Err(VistagramError::AlreadyLiked(_)))
            || matches!(r2, Err(VistagramError::AlreadyLiked(_)))
    );

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.like_count, 1);
}

#[tokio::test]
async fn test_like_unknown_post() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());
    let user = create_user(&env.storage, "lost@example.com").await;

    let result = service.like(&user, "no-such-post").await;
    assert!(matches!(result, Err(VistagramError::NotFound(_))));

    let status = service.get_status("no-such-post", None).await;
    assert!(matches!(status, Err(VistagramError::NotFound(_))));
}

#[tokio::test]
async fn test_blank_ids_are_validation_errors() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());

    assert!(matches!(
        service.like("  ", "p").await,
        Err(VistagramError::Validation(_))
    ));
    assert!(matches!(
        service.create_or_get_share("u", "").await,
        Err(VistagramError::Validation(_))
    ));
}

// =============================================================================
// Shares
// =============================================================================

#[tokio::test]
async fn test_share_is_idempotent() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());
    let user = create_user(&env.storage, "sharer@example.com").await;
    let post = create_post(&env.storage, &user).await;

    let first = service.create_or_get_share(&user, &post).await.unwrap();
    assert!(first.created);
    assert!(first.is_shared);
    assert_eq!(first.share_count, 1);
    assert_eq!(first.short_code.len(), 8);

    let second = service.create_or_get_share(&user, &post).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.short_code, first.short_code);
    assert_eq!(second.share_count, 1);

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.share_count, 1);
}

#[tokio::test]
async fn test_share_then_resolve() {
    let env = create_test_env().await;
    let service = EngagementService::new(
        env.storage.clone(),
        Arc::new(QueuedGenerator::new(&["ab12cd34"])),
        10,
    );
    let user = create_user(&env.storage, "scenario@example.com").await;
    let post = create_post(&env.storage, &user).await;

    let share = service.create_or_get_share(&user, &post).await.unwrap();
    assert_eq!(share.short_code, "ab12cd34");

    assert_eq!(service.resolve_short_code("ab12cd34").await.unwrap(), post);

    let again = service.create_or_get_share(&user, &post).await.unwrap();
    assert_eq!(again.short_code, "ab12cd34");
    assert_eq!(again.share_count, share.share_count);
}

#[tokio::test]
async fn test_resolve_is_case_sensitive() {
    let env = create_test_env().await;
    let service = EngagementService::new(
        env.storage.clone(),
        Arc::new(QueuedGenerator::new(&["AbCdEf12"])),
        10,
    );
    let user = create_user(&env.storage, "case@example.com").await;
    let post = create_post(&env.storage, &user).await;

    service.create_or_get_share(&user, &post).await.unwrap();

    assert_eq!(service.resolve_short_code("AbCdEf12").await.unwrap(), post);
    assert!(matches!(
        service.resolve_short_code("abcdef12").await,
        Err(VistagramError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_resolve_unknown_and_malformed_codes() {
    let env = create_test_env().await;
    let service = random_service(env.storage.clone());

    for code in ["zzzzzzzz", "", "has space", "abc", "toolongcode123", "ab-12_cd"] {
        assert!(
            matches!(
                service.resolve_short_code(code).await,
                Err(VistagramError::NotFound(_))
            ),
            "code {:?} should not resolve",
            code
        );
    }
}

#[tokio::test]
async fn test_share_retries_past_collision() {
    let env = create_test_env().await;
    let user_a = create_user(&env.storage, "first@example.com").await;
    let user_b = create_user(&env.storage, "second@example.com").await;
    let post = create_post(&env.storage, &user_a).await;

    let first = EngagementService::new(
        env.storage.clone(),
        Arc::new(QueuedGenerator::new(&["taken123"])),
        10,
    );
    first.create_or_get_share(&user_a, &post).await.unwrap();

    let generator = Arc::new(QueuedGenerator::new(&["taken123", "taken123", "fresh456"]));
    let second = EngagementService::new(env.storage.clone(), generator.clone(), 10);
    let share = second.create_or_get_share(&user_b, &post).await.unwrap();

    assert_eq!(share.short_code, "fresh456");
    assert_eq!(share.share_count, 2);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_share_exhaustion_writes_nothing() {
    let env = create_test_env().await;
    let user_a = create_user(&env.storage, "owner@example.com").await;
    let user_b = create_user(&env.storage, "unlucky@example.com").await;
    let post = create_post(&env.storage, &user_a).await;

    let seed = EngagementService::new(
        env.storage.clone(),
        Arc::new(FixedGenerator::new("samecode")),
        10,
    );
    seed.create_or_get_share(&user_a, &post).await.unwrap();

    let generator = Arc::new(FixedGenerator::new("samecode"));
    let service = EngagementService::new(env.storage.clone(), generator.clone(), 10);
    let result = service.create_or_get_share(&user_b, &post).await;

    assert!(matches!(
        result,
        Err(VistagramError::CodeGenerationExhausted(_))
    ));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 10);

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.share_count, 1);
    assert!(env.storage.find_share(&user_b, &post).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_generated_codes_use_up_attempts() {
    let env = create_test_env().await;
    let user = create_user(&env.storage, "weird@example.com").await;
    let post = create_post(&env.storage, &user).await;

    let generator = Arc::new(FixedGenerator::new("no!"));
    let service = EngagementService::new(env.storage.clone(), generator.clone(), 3);

    assert!(matches!(
        service.create_or_get_share(&user, &post).await,
        Err(VistagramError::CodeGenerationExhausted(_))
    ));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_shares_by_different_users_are_independent() {
    let env = create_test_env().await;
    let service = Arc::new(random_service(env.storage.clone()));
    let a = create_user(&env.storage, "x@example.com").await;
    let b = create_user(&env.storage, "y@example.com").await;
    let post = create_post(&env.storage, &a).await;

    let (ra, rb) = tokio::join!(
        service.create_or_get_share(&a, &post),
        service.create_or_get_share(&b, &post)
    );
    let (ra, rb) = (ra.unwrap(), rb.unwrap());
    assert_ne!(ra.short_code, rb.short_code);

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.share_count, 2);
    assert_eq!(service.resolve_short_code(&ra.short_code).await.unwrap(), post);
    assert_eq!(service.resolve_short_code(&rb.short_code).await.unwrap(), post);
}

#[tokio::test]
async fn test_concurrent_same_user_share_returns_one_code() {
    let env = create_test_env().await;
    let service = Arc::new(random_service(env.storage.clone()));
    let user = create_user(&env.storage, "twice@example.com").await;
    let post = create_post(&env.storage, &user).await;

    let (r1, r2) = tokio::join!(
        service.create_or_get_share(&user, &post),
        service.create_or_get_share(&user, &post)
    );
    let (r1, r2) = (r1.unwrap(), r2.unwrap());
    assert_eq!(r1.short_code, r2.short_code);

    let status = service.get_status(&post, None).await.unwrap();
    assert_eq!(status.share_count, 1);
}
