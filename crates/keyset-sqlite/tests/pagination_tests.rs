use keyset_sqlite::{
   Base64JsonCodec, Cursor, CursorCodec, Error, KeysetPage, OrderKey, PageRequest, fetch_page,
};
use serde_json::json;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

async fn create_test_pool() -> (SqlitePool, TempDir) {
   let temp_dir = TempDir::new().expect("Failed to create temp directory");
   let options = SqliteConnectOptions::new()
      .filename(temp_dir.path().join("test.db"))
      .create_if_missing(true);
   let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .connect_with(options)
      .await
      .expect("Failed to connect to test database");

   (pool, temp_dir)
}

async fn execute(pool: &SqlitePool, sql: &str) {
   sqlx::query(sql).execute(pool).await.unwrap();
}

/// Seed 7 posts across 3 categories with varying scores.
///
/// ```text
/// id | title  | category | score
/// ---|--------|----------|------
///  1 | Post 1 | science  | 95
///  2 | Post 2 | science  | 80
///  3 | Post 3 | tech     | 90
///  4 | Post 4 | tech     | 85
///  5 | Post 5 | tech     | 70
///  6 | Post 6 | art      | 88
///  7 | Post 7 | art      | 60
/// ```
async fn seed_posts_table(pool: &SqlitePool) {
   execute(
      pool,
      "CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT NOT NULL, category TEXT NOT NULL, score INTEGER NOT NULL)",
   )
   .await;

   let rows = [
      (1, "Post 1", "science", 95),
      (2, "Post 2", "science", 80),
      (3, "Post 3", "tech", 90),
      (4, "Post 4", "tech", 85),
      (5, "Post 5", "tech", 70),
      (6, "Post 6", "art", 88),
      (7, "Post 7", "art", 60),
   ];

   for (id, title, category, score) in rows {
      sqlx::query("INSERT INTO posts (id, title, category, score) VALUES ($1, $2, $3, $4)")
         .bind(id)
         .bind(title)
         .bind(category)
         .bind(score)
         .execute(pool)
         .await
         .unwrap();
   }
}

/// Extract the `id` column from each row for concise assertions.
fn row_ids(page: &KeysetPage) -> Vec<i64> {
   page
      .rows
      .iter()
      .map(|r| r["id"].as_i64().unwrap())
      .collect()
}

fn decode(token: &Option<String>) -> Cursor {
   Base64JsonCodec
      .decode(token.as_deref().expect("page has no cursor"))
      .unwrap()
}

// ─── Forward Pagination ───

#[tokio::test]
async fn first_page_no_cursor() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   // SELECT * FROM (SELECT id, title FROM posts) AS keyset_page ORDER BY "id" ASC LIMIT 4
   let page = fetch_page(&pool, "SELECT id, title FROM posts", vec![], PageRequest::new().first(3))
      .await
      .unwrap();

   assert_eq!(row_ids(&page), vec![1, 2, 3]);
   assert_eq!(page.rows[0]["title"], json!("Post 1"));
   assert!(page.page_info.has_next_page);
   assert!(!page.page_info.has_previous_page);
   assert_eq!(decode(&page.page_info.start_cursor).values(), &[json!(1)]);
   assert_eq!(decode(&page.page_info.end_cursor).values(), &[json!(3)]);
}

#[tokio::test]
async fn forward_pagination_all_pages() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let mut pages = Vec::new();
   let mut after: Option<Cursor> = None;

   loop {
      let mut request = PageRequest::new().first(3);
      if let Some(cursor) = after.take() {
         request = request.after(cursor);
      }

      let page = fetch_page(&pool, "SELECT * FROM posts", vec![], request)
         .await
         .unwrap();
      pages.push(row_ids(&page));

      if !page.page_info.has_next_page {
         assert!(page.page_info.has_previous_page);
         break;
      }
      after = Some(decode(&page.page_info.end_cursor));
   }

   assert_eq!(pages, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
}

#[tokio::test]
async fn descending_request() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let page = fetch_page(
      &pool,
      "SELECT id FROM posts",
      vec![],
      PageRequest::new().first(2).ascending(false),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page), vec![7, 6]);

   let page = fetch_page(
      &pool,
      "SELECT id FROM posts",
      vec![],
      PageRequest::new()
         .first(2)
         .ascending(false)
         .after(decode(&page.page_info.end_cursor)),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page), vec![5, 4]);
}

#[tokio::test]
async fn custom_identifier_orders_empty_request() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let page = fetch_page(&pool, "SELECT * FROM posts", vec![], PageRequest::new().first(2))
      .identifier("score")
      .await
      .unwrap();

   assert_eq!(row_ids(&page), vec![7, 5]);
   assert_eq!(decode(&page.page_info.end_cursor).values(), &[json!(70)]);
}

// ─── Backward Pagination ───

#[tokio::test]
async fn backward_returns_original_sort_order() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   // Fetched as id DESC, then reversed
   let page = fetch_page(&pool, "SELECT * FROM posts", vec![], PageRequest::new().last(3))
      .await
      .unwrap();

   assert_eq!(row_ids(&page), vec![5, 6, 7]);
   assert!(page.page_info.has_previous_page);
   assert!(!page.page_info.has_next_page);

   let page = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new()
         .last(3)
         .before(decode(&page.page_info.start_cursor)),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page), vec![2, 3, 4]);
   assert!(page.page_info.has_previous_page);
   assert!(page.page_info.has_next_page);

   let page = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new()
         .last(3)
         .before(decode(&page.page_info.start_cursor)),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page), vec![1]);
   assert!(!page.page_info.has_previous_page);
}

// ─── Mixed Sort Directions ───

fn mixed_order() -> Vec<OrderKey> {
   vec![
      OrderKey::asc("category"),
      OrderKey::desc("score"),
      OrderKey::asc("id"),
   ]
}

#[tokio::test]
async fn mixed_sort_directions_forward() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   // Rows sorted: (art,88,6), (art,60,7), (science,95,1), (science,80,2),
   //              (tech,90,3), (tech,85,4), (tech,70,5)
   let page1 = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new().first(3).order_by(mixed_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page1), vec![6, 7, 1]);
   assert_eq!(
      decode(&page1.page_info.end_cursor).values(),
      &[json!("science"), json!(95), json!(1)]
   );

   // ("category" > $1) OR ("category" = $2 AND "score" < $3) OR (... AND "id" > $6)
   let page2 = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new()
         .first(3)
         .after(decode(&page1.page_info.end_cursor))
         .order_by(mixed_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page2), vec![2, 3, 4]);
   assert!(page2.page_info.has_next_page);

   let page3 = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new()
         .first(3)
         .after(decode(&page2.page_info.end_cursor))
         .order_by(mixed_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page3), vec![5]);
   assert!(!page3.page_info.has_next_page);
   assert!(page3.page_info.has_previous_page);
}

#[tokio::test]
async fn mixed_sort_directions_backward() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let tail = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new().last(3).order_by(mixed_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&tail), vec![3, 4, 5]);
   assert!(tail.page_info.has_previous_page);

   let page = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new()
         .last(3)
         .before(decode(&tail.page_info.start_cursor))
         .order_by(mixed_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page), vec![7, 1, 2]);
   assert!(page.page_info.has_previous_page);
   assert!(page.page_info.has_next_page);
}

// ─── NULL Placement ───

/// ```text
/// id | due
/// ---|-----
///  1 | 3
///  2 | NULL
///  3 | 1
///  4 | 2
///  5 | NULL
/// ```
async fn seed_tasks_table(pool: &SqlitePool) {
   execute(pool, "CREATE TABLE tasks (id INTEGER PRIMARY KEY, due INTEGER)").await;
   execute(
      pool,
      "INSERT INTO tasks (id, due) VALUES (1, 3), (2, NULL), (3, 1), (4, 2), (5, NULL)",
   )
   .await;
}

fn due_order() -> Vec<OrderKey> {
   vec![OrderKey::asc("due").nulls_last(), OrderKey::asc("id")]
}

#[tokio::test]
async fn nulls_last_forward_and_backward() {
   let (pool, _temp) = create_test_pool().await;
   seed_tasks_table(&pool).await;

   let all = fetch_page(
      &pool,
      "SELECT * FROM tasks",
      vec![],
      PageRequest::new().first(10).order_by(due_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&all), vec![3, 4, 1, 2, 5]);
   assert_eq!(all.rows[3]["due"], json!(null));

   // Fetched as due DESC NULLS FIRST, id DESC
   let tail = fetch_page(
      &pool,
      "SELECT * FROM tasks",
      vec![],
      PageRequest::new().last(2).order_by(due_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&tail), vec![2, 5]);
   assert!(tail.page_info.has_previous_page);
}

#[tokio::test]
async fn nullable_key_pages_forward_through_nulls() {
   let (pool, _temp) = create_test_pool().await;
   seed_tasks_table(&pool).await;

   let mut seen = Vec::new();
   let mut pages = Vec::new();
   let mut after: Option<Cursor> = None;

   loop {
      let mut request = PageRequest::new().first(2).order_by(due_order());
      if let Some(cursor) = after.take() {
         request = request.after(cursor);
      }
      let page = fetch_page(&pool, "SELECT * FROM tasks", vec![], request)
         .await
         .unwrap();
      seen.extend(row_ids(&page));
      pages.push((row_ids(&page), page.page_info.has_next_page));

      if !page.page_info.has_next_page {
         break;
      }
      after = Some(decode(&page.page_info.end_cursor));
   }

   assert_eq!(seen, vec![3, 4, 1, 2, 5]);
   assert_eq!(
      pages,
      vec![(vec![3, 4], true), (vec![1, 2], true), (vec![5], false)]
   );
}

#[tokio::test]
async fn nullable_key_pages_backward_through_nulls() {
   let (pool, _temp) = create_test_pool().await;
   seed_tasks_table(&pool).await;

   let mut pages = Vec::new();
   let mut before: Option<Cursor> = None;

   loop {
      let mut request = PageRequest::new().last(2).order_by(due_order());
      if let Some(cursor) = before.take() {
         request = request.before(cursor);
      }
      let page = fetch_page(&pool, "SELECT * FROM tasks", vec![], request)
         .await
         .unwrap();
      pages.push(row_ids(&page));

      if !page.page_info.has_previous_page {
         break;
      }
      before = Some(decode(&page.page_info.start_cursor));
   }

   // The first backward page starts inside the NULL block
   assert_eq!(pages, vec![vec![2, 5], vec![4, 1], vec![3]]);
}

#[tokio::test]
async fn null_cursor_starts_inside_null_block() {
   let (pool, _temp) = create_test_pool().await;
   seed_tasks_table(&pool).await;

   let page = fetch_page(
      &pool,
      "SELECT * FROM tasks",
      vec![],
      PageRequest::new()
         .first(5)
         .after(Cursor::from_values(vec![json!(null), json!(2)]))
         .order_by(due_order()),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page), vec![5]);
   assert!(!page.page_info.has_next_page);
   assert!(page.page_info.has_previous_page);
}

#[tokio::test]
async fn null_cursor_value_without_placement_is_rejected() {
   let (pool, _temp) = create_test_pool().await;
   seed_tasks_table(&pool).await;

   let err = fetch_page(
      &pool,
      "SELECT * FROM tasks",
      vec![],
      PageRequest::new()
         .first(2)
         .after(Cursor::from_values(vec![json!(null), json!(2)]))
         .order_by(vec![OrderKey::asc("due"), OrderKey::asc("id")]),
   )
   .await
   .unwrap_err();

   assert_eq!(err.error_code(), "NULL_CURSOR_VALUE");
}

// ─── Boundary Conditions ───

#[tokio::test]
async fn empty_table() {
   let (pool, _temp) = create_test_pool().await;
   execute(&pool, "CREATE TABLE posts (id INTEGER PRIMARY KEY)").await;

   let page = fetch_page(&pool, "SELECT * FROM posts", vec![], PageRequest::new().first(5))
      .await
      .unwrap();

   assert!(page.rows.is_empty());
   assert!(!page.page_info.has_next_page);
   assert!(!page.page_info.has_previous_page);
   assert_eq!(page.page_info.start_cursor, None);
   assert_eq!(page.page_info.end_cursor, None);
}

#[tokio::test]
async fn exactly_page_size_rows() {
   let (pool, _temp) = create_test_pool().await;
   execute(&pool, "CREATE TABLE posts (id INTEGER PRIMARY KEY)").await;
   execute(&pool, "INSERT INTO posts (id) VALUES (1), (2), (3)").await;

   let page = fetch_page(&pool, "SELECT * FROM posts", vec![], PageRequest::new().first(3))
      .await
      .unwrap();

   assert_eq!(row_ids(&page), vec![1, 2, 3]);
   assert!(!page.page_info.has_next_page);
}

#[tokio::test]
async fn unbounded_request_returns_everything() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let page = fetch_page(&pool, "SELECT * FROM posts", vec![], PageRequest::new())
      .await
      .unwrap();

   assert_eq!(row_ids(&page), vec![1, 2, 3, 4, 5, 6, 7]);
   assert!(!page.page_info.has_next_page);
   assert!(!page.page_info.has_previous_page);
}

#[tokio::test]
async fn insert_before_cursor_does_not_shift_next_page() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let page1 = fetch_page(&pool, "SELECT * FROM posts", vec![], PageRequest::new().first(3))
      .await
      .unwrap();

   execute(
      &pool,
      "INSERT INTO posts (id, title, category, score) VALUES (0, 'Post 0', 'art', 1)",
   )
   .await;

   let page2 = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new()
         .first(3)
         .after(decode(&page1.page_info.end_cursor)),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page2), vec![4, 5, 6]);
}

// ─── WHERE Clause + Cursor ───

#[tokio::test]
async fn where_clause_combined_with_cursor() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let query = "SELECT id, title, category FROM posts WHERE category = $1";

   let page1 = fetch_page(&pool, query, vec![json!("tech")], PageRequest::new().first(2))
      .await
      .unwrap();

   assert_eq!(row_ids(&page1), vec![3, 4]);
   assert!(page1.page_info.has_next_page);

   // Cursor binds as $2, after the caller's $1
   let page2 = fetch_page(
      &pool,
      query,
      vec![json!("tech")],
      PageRequest::new()
         .first(2)
         .after(decode(&page1.page_info.end_cursor)),
   )
   .await
   .unwrap();

   assert_eq!(row_ids(&page2), vec![5]);
   assert!(!page2.page_info.has_next_page);
}

#[tokio::test]
async fn where_clause_multiple_params_combined_with_cursor() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let page = fetch_page(
      &pool,
      "SELECT id, category, score FROM posts WHERE category = $1 OR score >= $2",
      vec![json!("art"), json!(90)],
      PageRequest::new().first(5).after(Cursor::new(1)),
   )
   .await
   .unwrap();

   // The OR stays inside the wrapped query, so the boundary applies to both arms
   assert_eq!(row_ids(&page), vec![3, 6, 7]);
}

// ─── Value Decoding ───

#[tokio::test]
async fn real_and_blob_columns_decode_to_json() {
   let (pool, _temp) = create_test_pool().await;
   execute(
      &pool,
      "CREATE TABLE files (id INTEGER PRIMARY KEY, size REAL, data BLOB)",
   )
   .await;
   sqlx::query("INSERT INTO files (id, size, data) VALUES ($1, $2, $3)")
      .bind(1_i64)
      .bind(1.5_f64)
      .bind(vec![1_u8, 2, 3])
      .execute(&pool)
      .await
      .unwrap();

   let page = fetch_page(&pool, "SELECT * FROM files", vec![], PageRequest::new().first(1))
      .await
      .unwrap();

   assert_eq!(page.rows[0]["size"], json!(1.5));
   assert_eq!(page.rows[0]["data"], json!("AQID"));
}

// ─── Error Cases ───

#[tokio::test]
async fn error_conflicting_page_sizes() {
   let (pool, _temp) = create_test_pool().await;

   let err = fetch_page(&pool, "SELECT 1 AS id", vec![], PageRequest::new().first(1).last(1))
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Keyset(_)));
   assert_eq!(err.error_code(), "CONFLICTING_PAGE_SIZES");
}

#[tokio::test]
async fn error_cursor_length_mismatch() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let err = fetch_page(
      &pool,
      "SELECT * FROM posts",
      vec![],
      PageRequest::new()
         .first(2)
         .after(Cursor::from_values(vec![json!(1), json!(2)])),
   )
   .await
   .unwrap_err();

   assert_eq!(err.error_code(), "CURSOR_LENGTH_MISMATCH");
}

#[tokio::test]
async fn error_query_contains_order_by() {
   let (pool, _temp) = create_test_pool().await;

   let err = fetch_page(
      &pool,
      "SELECT * FROM posts ORDER BY id",
      vec![],
      PageRequest::new().first(2),
   )
   .await
   .unwrap_err();

   assert!(matches!(err, Error::InvalidPaginationQuery));
}

#[tokio::test]
async fn error_order_column_missing_from_query() {
   let (pool, _temp) = create_test_pool().await;
   seed_posts_table(&pool).await;

   let err = fetch_page(&pool, "SELECT title FROM posts", vec![], PageRequest::new().first(2))
      .await
      .unwrap_err();

   // SQLite may resolve an unknown double-quoted name as a string literal,
   // in which case the rows come back without the keyset column
   assert!(matches!(
      err,
      Error::Sqlx(_) | Error::Keyset(keyset_core::Error::CursorColumnNotFound { .. })
   ));
}
