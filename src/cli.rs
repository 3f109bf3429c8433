//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::email::EmailSettings;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::log_mail_adapter::LogMailAdapter;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::adapters::web::{self, AppState, TokenSigner};
use crate::domain::error::FauxtickError;
use crate::domain::user::User;
use crate::domain::validation::{validate_email, validate_name, validate_password};
use crate::ports::config_port::ConfigPort;
use crate::ports::user_store::UserStore;

#[derive(Parser, Debug)]
#[command(name = "fauxtick", about = "Synthetic-instrument ticker backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create the database schema
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create an active superuser account (password read from stdin)
    CreateSuperuser {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Output an argon2 hash for a password
    HashPassword,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::InitDb { config } => run_init_db(&config),
        Command::CreateSuperuser {
            config,
            email,
            first_name,
            last_name,
        } => run_create_superuser(&config, &email, &first_name, &last_name),
        Command::HashPassword => run_hash_password(),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FauxtickError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_store(config: &dyn ConfigPort) -> Result<SqliteAdapter, ExitCode> {
    let store = SqliteAdapter::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    store.initialize_schema().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(store)
}

fn read_password_line(prompt: &str) -> String {
    use std::io::{self, BufRead};

    eprintln!("{prompt}");
    let stdin = io::stdin();
    stdin
        .lock()
        .lines()
        .next()
        .unwrap_or(Ok(String::new()))
        .unwrap_or_default()
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = match open_store(&config) {
        Ok(s) => Arc::new(s),
        Err(code) => return code,
    };

    let tokens = match TokenSigner::from_config(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let addr: std::net::SocketAddr = config
        .get_string("server", "listen")
        .unwrap_or_else(|| "127.0.0.1:8000".to_string())
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:8000".parse().unwrap());

    eprintln!("Starting web server on {addr}");

    let state = AppState {
        user_store: store.clone() as Arc<dyn UserStore + Send + Sync>,
        ticker_store: store,
        mailer: Arc::new(LogMailAdapter),
        tokens,
        email_settings: EmailSettings::from_config(&config),
    };

    let router = web::build_router(state);

    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, router).await.unwrap();
    });

    ExitCode::SUCCESS
}

fn run_init_db(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match open_store(&config) {
        Ok(_) => {
            eprintln!("Database schema created");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_create_superuser(
    config_path: &PathBuf,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let password = read_password_line("Enter password for the new superuser:");

    let result = validate_email(email)
        .and_then(|_| validate_password(&password))
        .and_then(|_| validate_name("first_name", first_name))
        .and_then(|_| validate_name("last_name", last_name))
        .and_then(|_| web::hash_password(&password))
        .and_then(|hashed| {
            let user = User::new(
                email.to_string(),
                hashed,
                first_name.to_string(),
                last_name.to_string(),
                true,
                true,
            );
            store.insert(&user).map(|_| user)
        });

    match result {
        Ok(user) => {
            eprintln!("Created superuser {} ({})", user.email, user.id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_hash_password() -> ExitCode {
    let password = read_password_line("Enter password to hash:");

    match web::hash_password(&password) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}
