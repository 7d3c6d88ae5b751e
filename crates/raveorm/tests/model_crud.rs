//! Derived entities and models against an in-memory SQLite database.

#![cfg(feature = "derive")]

use raveorm::prelude::*;

#[derive(Debug, Clone, PartialEq, Entity, FromRow)]
struct ArticleEntity {
    #[orm(id)]
    id: Option<i64>,
    title: String,
    #[orm(column = "body")]
    content: Option<String>,
}

#[derive(Model)]
#[orm(table = "articles")]
struct ArticleModel;

#[derive(Debug, PartialEq, Entity, FromRow)]
struct TagEntity {
    #[orm(id)]
    article_id: i64,
    #[orm(id)]
    name: String,
}

#[derive(Model)]
struct TagModel;

fn setup() -> SqliteDriver {
    let driver = SqliteDriver::open_in_memory().unwrap();
    driver
        .execute_batch(
            "CREATE TABLE articles (id INTEGER PRIMARY KEY, title TEXT NOT NULL, body TEXT);
             CREATE TABLE tag (article_id INTEGER NOT NULL, name TEXT NOT NULL,
                               PRIMARY KEY (article_id, name));",
        )
        .unwrap();
    driver
}

fn article(title: &str) -> ArticleEntity {
    ArticleEntity {
        id: None,
        title: title.to_string(),
        content: None,
    }
}

#[test]
fn derived_entity_columns() {
    let entity = ArticleEntity {
        id: Some(1),
        title: "t".into(),
        content: Some("c".into()),
    };
    let columns: Vec<_> = entity.columns().into_iter().map(|(c, _)| c).collect();
    assert_eq!(columns, ["id", "title", "body"]);
    assert_eq!(entity.primary_keys(), ["id"]);
    assert_eq!(ArticleModel::TABLE, "articles");
    assert_eq!(TagModel::TABLE, "tag");
}

#[test]
fn save_inserts_then_updates() {
    let driver = setup();
    let model = ArticleModel;

    model.save(&driver, &article("Hello world")).unwrap();
    let id = model.last_insert_id(&driver).unwrap();
    assert_eq!(id, 1);

    let mut stored = model
        .get(&driver, &[("id", Value::from(id))])
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Hello world");
    assert_eq!(stored.content, None);

    stored.title = "Hello Jackson".to_string();
    stored.content = Some("body".to_string());
    assert_eq!(model.save(&driver, &stored).unwrap(), 1);

    let all = model.all(&driver).unwrap();
    assert_eq!(all, vec![stored.clone()]);

    assert_eq!(model.delete(&driver, &stored).unwrap(), 1);
    assert!(model.all(&driver).unwrap().is_empty());
    assert!(
        model
            .get(&driver, &[("id", Value::from(id))])
            .unwrap()
            .is_none()
    );
}

#[test]
fn composite_keys() {
    let driver = setup();
    let model = TagModel;
    let tag = TagEntity {
        article_id: 1,
        name: "rust".into(),
    };
    model.add(&driver, &tag).unwrap();
    model
        .add(
            &driver,
            &TagEntity {
                article_id: 1,
                name: "sql".into(),
            },
        )
        .unwrap();

    let found = model
        .get(&driver, &[("article_id", Value::from(1)), ("name", Value::from("sql"))])
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "sql");

    // Both keys set: save updates in place.
    assert_eq!(model.save(&driver, &tag).unwrap(), 1);
    assert_eq!(model.delete(&driver, &tag).unwrap(), 1);
    assert_eq!(model.all(&driver).unwrap().len(), 1);
}

#[test]
fn new_query_uses_model_as_target() {
    let driver = setup();
    let model = ArticleModel;
    model.add(&driver, &article("a")).unwrap();
    model.add(&driver, &article("b")).unwrap();

    let mut q = model.new_query();
    q.select_all()
        .unwrap()
        .from(&model)
        .unwrap()
        .where_(Condition::like("title", "b%"))
        .unwrap();
    let found: Vec<ArticleEntity> = q.find_as(&driver).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(2));
}
