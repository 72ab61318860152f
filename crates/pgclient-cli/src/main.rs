//! Demo driver for the pgclient access layer.
//!
//! Connects, probes the server, then runs a small transactional
//! scenario: create a table, insert two users with positional
//! parameters, list them as a table, and count them. Exits 0 on
//! success and 1 on connection, probe, or transaction failure.

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use pgclient::{ConnectParams, Connection, Query, display, helpers, with_transaction};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pgclient")]
#[command(about = "PostgreSQL access layer demo", long_about = None)]
#[command(version)]
struct Args {
    /// Full libpq conninfo string; overrides the individual options
    #[arg(long, env = "PGCLIENT_CONNINFO")]
    conninfo: Option<String>,

    /// Server host
    #[arg(long, env = "PGHOST", default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(long, env = "PGPORT", default_value = "5432")]
    port: u16,

    /// Database name
    #[arg(long, env = "PGDATABASE", default_value = "postgres")]
    dbname: String,

    /// User name
    #[arg(long, env = "PGUSER", default_value = "postgres")]
    user: String,

    /// Password
    #[arg(long, env = "PGPASSWORD")]
    password: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn conninfo(&self) -> String {
        if let Some(ref conninfo) = self.conninfo {
            return conninfo.clone();
        }
        let mut params = ConnectParams::new()
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user);
        if let Some(ref password) = self.password {
            params = params.password(password);
        }
        params.to_conninfo()
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let conn =
        Connection::establish(&args.conninfo()).context("failed to connect to database")?;
    println!("Connected to database successfully!");

    if !helpers::test_connection(&conn) {
        bail!("connection test failed");
    }
    if let Some(info) = helpers::database_info(&conn) {
        println!("Database Info:\n{info}\n");
    }

    let query = Query::new(&conn)?;
    with_transaction(&conn, || {
        query.execute_command(
            "CREATE TABLE IF NOT EXISTS users (
                 id SERIAL PRIMARY KEY,
                 name VARCHAR(100) NOT NULL,
                 email VARCHAR(100) UNIQUE NOT NULL,
                 age INTEGER)",
        )?;
        query.execute_params(
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3)",
            &["John Doe", "john@example.com", "30"],
        )?;
        query.execute_params(
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3)",
            &["Jane Smith", "jane@example.com", "25"],
        )?;
        Ok(())
    })
    .context("transaction failed")?;
    println!("Transaction committed successfully!");

    let users = helpers::execute_query(&conn, "SELECT id, name, email, age FROM users ORDER BY id");
    println!("All users:");
    display::print_result(&users);

    let count = query.execute_int("SELECT COUNT(*) FROM users", 0);
    println!("Total users: {count}");
    Ok(())
}
