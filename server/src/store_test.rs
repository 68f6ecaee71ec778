use super::*;

fn board(name: &str) -> Board {
    Board::new(name)
}

#[tokio::test]
async fn create_and_get_round_trip() {
    let store = BoardStore::open(None).await.unwrap();
    let created = store.create(board("retro")).await.unwrap();
    assert!(!created.updated_at.is_empty());

    let fetched = store.get(created.id).await.unwrap();
    assert_eq!(fetched.name, "retro");
    assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn create_fills_nil_id_and_blank_name() {
    let store = BoardStore::open(None).await.unwrap();
    let mut raw = board("");
    raw.id = Uuid::nil();
    let created = store.create(raw).await.unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.name, "Untitled Board");
}

#[tokio::test]
async fn update_replaces_wholesale() {
    let store = BoardStore::open(None).await.unwrap();
    let created = store.create(board("before")).await.unwrap();

    let mut replacement = board("after");
    replacement.notes.push(canvas::doc::Note {
        id: Uuid::new_v4(),
        content: "hi".to_owned(),
        position: canvas::camera::Point::new(0.0, 0.0),
        color: "#fcd34d".to_owned(),
        width: 180.0,
        height: 120.0,
    });
    let updated = store.update(created.id, replacement).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "after");
    assert_eq!(updated.notes.len(), 1);
}

#[tokio::test]
async fn update_unknown_board_is_not_found() {
    let store = BoardStore::open(None).await.unwrap();
    let err = store.update(Uuid::new_v4(), board("ghost")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_and_reports_missing() {
    let store = BoardStore::open(None).await.unwrap();
    let created = store.create(board("gone")).await.unwrap();
    store.delete(created.id).await.unwrap();
    assert!(store.get(created.id).await.is_none());
    assert!(matches!(store.delete(created.id).await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn list_orders_most_recent_first() {
    let store = BoardStore::open(None).await.unwrap();
    let first = store.create(board("first")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.create(board("second")).await.unwrap();

    let listed = store.list().await;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[tokio::test]
async fn persists_and_reloads_from_file() {
    let path = std::env::temp_dir().join(format!("boards-{}.json", Uuid::new_v4()));
    let store = BoardStore::open(Some(path.clone())).await.unwrap();
    let created = store.create(board("durable")).await.unwrap();
    drop(store);

    let reopened = BoardStore::open(Some(path.clone())).await.unwrap();
    assert_eq!(reopened.len().await, 1);
    let loaded = reopened.get(created.id).await.unwrap();
    assert_eq!(loaded.name, "durable");

    tokio::fs::remove_file(path).await.unwrap();
}

#[tokio::test]
async fn missing_file_starts_empty() {
    let path = std::env::temp_dir().join(format!("boards-{}.json", Uuid::new_v4()));
    let store = BoardStore::open(Some(path)).await.unwrap();
    assert_eq!(store.len().await, 0);
}
