//! Builder statements executed against an in-memory SQLite database.

use raveorm::prelude::*;
use serde_json::json;

fn blog() -> SqliteDriver {
    let driver = SqliteDriver::open_in_memory().unwrap();
    driver
        .execute_batch(
            "CREATE TABLE articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT,
                views INTEGER NOT NULL DEFAULT 0
            );",
        )
        .unwrap();
    driver
}

fn insert(driver: &SqliteDriver, title: &str, views: i64) -> i64 {
    let mut q = Query::new();
    q.insert_into("articles")
        .unwrap()
        .values(vec![("title", Value::from(title)), ("views", Value::from(views))])
        .unwrap();
    assert_eq!(q.execute(driver).unwrap(), 1);
    driver.last_insert_id().unwrap()
}

#[test]
fn insert_select_update_delete() {
    let driver = blog();
    let id = insert(&driver, "Hello world", 3);
    assert_eq!(id, 1);

    let mut q = Query::new();
    q.update("articles")
        .unwrap()
        .set(vec![("title", "Hello Jackson")])
        .unwrap()
        .where_(("id", "=", id))
        .unwrap();
    assert_eq!(q.execute(&driver).unwrap(), 1);

    let mut q = Query::new();
    q.select(["title", "views"])
        .unwrap()
        .from("articles")
        .unwrap()
        .where_(("id", "=", id))
        .unwrap();
    let row = q.first(&driver).unwrap().unwrap();
    assert_eq!(row.try_get::<String>("title").unwrap(), "Hello Jackson");
    assert_eq!(row.try_get::<i64>("views").unwrap(), 3);

    let mut q = Query::new();
    q.delete()
        .unwrap()
        .from("articles")
        .unwrap()
        .where_(("id", "=", id))
        .unwrap();
    assert_eq!(q.execute(&driver).unwrap(), 1);

    let mut q = Query::new();
    q.select_all().unwrap().from("articles").unwrap();
    assert!(q.find(&driver).unwrap().is_empty());
}

#[test]
fn update_with_set_where_collision() {
    let driver = blog();
    insert(&driver, "Hello world", 0);
    insert(&driver, "Other", 0);

    let mut q = Query::new();
    q.update("articles")
        .unwrap()
        .set(vec![("title", "Renamed")])
        .unwrap()
        .where_(("title", "=", "Hello world"))
        .unwrap();
    assert_eq!(q.execute(&driver).unwrap(), 1);

    let mut q = Query::new();
    q.select("title")
        .unwrap()
        .from("articles")
        .unwrap()
        .append_sql(" ORDER BY id")
        .unwrap();
    let titles: Vec<String> = q
        .find(&driver)
        .unwrap()
        .iter()
        .map(|row| row.try_get("title").unwrap())
        .collect();
    assert_eq!(titles, ["Renamed", "Other"]);
}

#[test]
fn nested_json_conditions() {
    let driver = blog();
    for (title, views) in [("a", 1), ("b", 5), ("c", 10), ("d", 50)] {
        insert(&driver, title, views);
    }

    let filter = WhereSpec::from_json(&json!({
        "conditions": {
            "OR": [
                ["title", "=", "a"],
                {"AND": [["views", ">", 4], ["views", "<", 20]]}
            ]
        }
    }))
    .unwrap();

    let mut q = Query::new();
    q.select("title")
        .unwrap()
        .from("articles")
        .unwrap()
        .where_(filter)
        .unwrap()
        .append_sql(" ORDER BY title")
        .unwrap();
    assert_eq!(
        q.statement().unwrap(),
        "SELECT title FROM articles WHERE (title = :title OR (views > :views AND views < :views0))  ORDER BY title"
    );
    let rows = q.find(&driver).unwrap();
    let titles: Vec<String> = rows.iter().map(|r| r.try_get("title").unwrap()).collect();
    assert_eq!(titles, ["a", "b", "c"]);
}

#[test]
fn null_values_are_not_inserted() {
    let driver = blog();
    let mut q = Query::new();
    q.insert_into("articles")
        .unwrap()
        .values(json!({"title": "t", "content": null}))
        .unwrap();
    assert_eq!(
        q.statement().unwrap(),
        "INSERT INTO articles (title) VALUES (:title)"
    );
    q.execute(&driver).unwrap();

    let mut q = Query::raw(
        "SELECT content, views FROM articles WHERE title = :title",
        params! { ":title" => "t" },
    );
    let row = q.first(&driver).unwrap().unwrap();
    assert_eq!(row.get("content"), Some(&Value::Null));
    assert_eq!(row.try_get::<i64>("views").unwrap(), 0);
}

#[test]
fn driver_errors_are_not_query_errors() {
    let driver = blog();
    let mut q = Query::new();
    q.select_all().unwrap().from("no_such_table").unwrap();
    let err = q.find(&driver).unwrap_err();
    assert!(!err.is_query_error());
    assert!(matches!(err, OrmError::Database(_)));
}

#[test]
fn dyn_driver_is_accepted() {
    let driver: Box<dyn Driver> = Box::new(blog());
    let mut q = Query::new();
    q.insert_into("articles")
        .unwrap()
        .values(vec![("title", "boxed")])
        .unwrap();
    q.execute(&driver).unwrap();

    let by_ref: &dyn Driver = driver.as_ref();
    let mut q = Query::new();
    q.select_all().unwrap().from("articles").unwrap();
    assert_eq!(q.find(by_ref).unwrap().len(), 1);
}

#[test]
fn missing_binding_fails_instead_of_writing_null() {
    let driver = blog();
    let id = insert(&driver, "kept", 1);

    let mut q = Query::raw(
        "UPDATE articles SET title = :title WHERE id = :id",
        params! { ":id" => id },
    );
    let err = q.execute(&driver).unwrap_err();
    assert!(!err.is_query_error());
    assert!(matches!(err, OrmError::Database(_)));

    let mut q = Query::new();
    q.select("title")
        .unwrap()
        .from("articles")
        .unwrap()
        .where_(Condition::eq("id", id))
        .unwrap();
    let row = q.first(&driver).unwrap().unwrap();
    assert_eq!(row.try_get::<String>("title").unwrap(), "kept");
}

#[test]
fn raw_values_without_marker_are_bound() {
    let driver = blog();
    insert(&driver, "first", 1);
    let id = insert(&driver, "second", 2);

    let filter = WhereSpec::from_json(&json!({
        "conditions": "id = :id",
        "values": {"id": id}
    }))
    .unwrap();
    let mut q = Query::new();
    q.select_all().unwrap().from("articles").unwrap().where_(filter).unwrap();
    let rows = q.find(&driver).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].try_get::<String>("title").unwrap(), "second");
}
