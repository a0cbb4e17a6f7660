use clap::{Parser, Subcommand};

use scribegate::application::ports::UserRepository;
use scribegate::domain::UserAccount;
use scribegate::infrastructure::observability::{TracingConfig, init_tracing};
use scribegate::infrastructure::persistence::{
    PgUserRepository, create_pool, run_migrations, seed_users,
};
use scribegate::presentation::{Environment, Settings};

/// Manage user accounts and their remaining minutes.
#[derive(Parser)]
#[command(name = "scribegate-admin", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a user, replacing any existing account with the same name
    Add {
        username: String,
        password: String,
        limit: f64,
    },
    /// Change a user's password
    SetPassword { username: String, password: String },
    /// Set the remaining minutes for a user
    SetLimit { username: String, limit: f64 },
    /// List users and their balances
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig {
        environment: environment.to_string(),
        level: "warn".to_string(),
        json_format: false,
    });

    let Some(url) = settings.database.url.as_deref() else {
        anyhow::bail!("database.url is not configured (set APP__DATABASE__URL)");
    };

    let pool = create_pool(url, 1).await?;
    run_migrations(&pool).await?;
    let repository = PgUserRepository::new(pool);
    seed_users(&repository, &settings.users.seed_accounts()).await?;

    match cli.command {
        Command::Add {
            username,
            password,
            limit,
        } => {
            ensure_non_negative(limit)?;
            repository
                .add_user(&UserAccount::new(&username, password, limit))
                .await?;
            println!("{}: {} minutes", username, limit);
        }
        Command::SetPassword { username, password } => {
            repository.set_password(&username, &password).await?;
            println!("{}: password updated", username);
        }
        Command::SetLimit { username, limit } => {
            ensure_non_negative(limit)?;
            repository.set_limit(&username, limit).await?;
            println!("{}: {} minutes", username, limit);
        }
        Command::List => {
            for user in repository.list_users().await? {
                println!("{}: {} minutes", user.username, user.minutes_remaining);
            }
        }
    }

    Ok(())
}

fn ensure_non_negative(limit: f64) -> anyhow::Result<()> {
    if limit.is_nan() || limit < 0.0 {
        anyhow::bail!("limit must be a non-negative number of minutes, got {}", limit);
    }
    Ok(())
}
