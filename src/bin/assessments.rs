//! List recently stored assessment records from the command line.

use anyhow::Result;
use clap::Parser;
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Ws;
use surrealdb::opt::auth::Root;

#[derive(Parser, Debug)]
#[command(name = "assessments", about = "Inspect stored assessment records")]
struct Args {
    /// Maximum number of rows to print
    #[arg(long, default_value_t = 20)]
    limit: usize,
    /// Print raw JSON rows instead of the summary lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let url = std::env::var("SAFE_DB_URL").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let url = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .unwrap_or(&url)
        .to_string();
    let user = std::env::var("SAFE_DB_USER").unwrap_or_else(|_| "root".to_string());
    let pass = std::env::var("SAFE_DB_PASS").unwrap_or_else(|_| "root".to_string());
    let ns = std::env::var("SAFE_DB_NS").unwrap_or_else(|_| "safeline".to_string());
    let dbname = std::env::var("SAFE_DB_DB").unwrap_or_else(|_| "protected".to_string());

    let db = Surreal::new::<Ws>(url).await?;
    db.signin(Root {
        username: &user,
        password: &pass,
    })
    .await?;
    db.use_ns(&ns).use_db(&dbname).await?;

    let count: Vec<serde_json::Value> = db
        .query("SELECT count() FROM assessments GROUP ALL")
        .await?
        .take(0)?;
    let total = count
        .first()
        .and_then(|v| v.get("count"))
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    println!("{} assessment(s) stored in {}:{}", total, ns, dbname);

    let rows: Vec<serde_json::Value> = db
        .query(format!(
            "SELECT meta::id(id) AS id, created_at, risk_level, category, confidence \
             FROM assessments ORDER BY created_at DESC LIMIT {}",
            args.limit
        ))
        .await?
        .take(0)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in rows {
        let id = row.get("id").and_then(|v| v.as_str()).unwrap_or("?");
        let created = row.get("created_at").and_then(|v| v.as_str()).unwrap_or("?");
        let risk = row.get("risk_level").and_then(|v| v.as_str()).unwrap_or("?");
        let category = row.get("category").and_then(|v| v.as_str()).unwrap_or("?");
        let confidence = row.get("confidence").and_then(|v| v.as_str()).unwrap_or("?");
        println!(
            "  {} | {} | {} | {} | {}",
            id, created, risk, category, confidence
        );
    }

    Ok(())
}
