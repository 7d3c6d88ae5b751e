//! A tiny blog repository on SQLite.
//!
//! Run with:
//!   cargo run --example blog -p raveorm
//!
//! Set RUST_LOG=raveorm.sql=debug to see every statement.

use raveorm::prelude::*;
use raveorm::{DatabaseConfig, connect};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Entity, FromRow)]
struct ArticleEntity {
    #[orm(id)]
    id: Option<i64>,
    title: String,
    content: Option<String>,
}

#[derive(Model)]
#[orm(table = "articles")]
struct ArticleModel;

const CONFIG: &str = r#"
[database]
driver = "sqlite"
path = ":memory:"
log_sql = true
"#;

fn main() -> OrmResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DatabaseConfig::from_toml_str(CONFIG)?;
    let driver = connect(&config)?;
    driver.execute(
        "CREATE TABLE articles (id INTEGER PRIMARY KEY, title TEXT NOT NULL, content TEXT)",
        &Params::new(),
    )?;

    let articles = ArticleModel;
    for title in ["Hello world", "Salut les geeks", "Draft"] {
        articles.save(
            &driver,
            &ArticleEntity {
                id: None,
                title: title.to_string(),
                content: None,
            },
        )?;
    }
    println!("last id: {}", articles.last_insert_id(&driver)?);

    if let Some(mut first) = articles.get(&driver, &[("id", Value::from(1))])? {
        first.content = Some("First post".to_string());
        articles.save(&driver, &first)?;
    }

    let mut q = Query::new();
    q.select(["id", "title"])?
        .from(&articles)?
        .where_(Condition::or(vec![
            Condition::eq("id", 1),
            Condition::like("title", "Salut%"),
        ]))?
        .append_sql(" ORDER BY id")?;
    println!("{}", q.statement()?);
    for row in q.find(&driver)? {
        println!("{:?}", row);
    }

    let mut cleanup = Query::new();
    cleanup
        .delete()?
        .from(&articles)?
        .where_(("title", "=", "Draft"))?;
    println!("deleted {} draft(s)", cleanup.execute(&driver)?);

    for article in articles.all(&driver)? {
        println!("{article:?}");
    }
    Ok(())
}
