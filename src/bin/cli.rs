use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use social::cli::{NewSuper, create_super};
use social_db::{init_db_pool, postgres::PgStore, run_migrations};

#[derive(Parser)]
#[command(name = "social-cli")]
#[command(about = "Social CLI - Administrative tools for the Social API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a super account
    CreateSuper {
        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = init_db_pool(&database_url).await?;
    run_migrations(&pool).await?;

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateSuper {
            first_name,
            last_name,
            email,
            password,
        } => {
            let new_super = NewSuper {
                first_name: prompt(first_name, "First name")?,
                last_name: prompt(last_name, "Last name")?,
                email: prompt(email, "Email address")?,
                password: match password {
                    Some(password) => password,
                    None => Password::new()
                        .with_prompt("Password")
                        .with_confirmation("Confirm password", "Passwords don't match")
                        .interact()?,
                },
            };
            let email = new_super.email.clone();

            match create_super(Arc::new(PgStore::new(pool)), new_super).await {
                Ok(user) => {
                    println!("\n✅ Super account created successfully!");
                    println!("   Email: {}", email);
                    println!("   Id: {}", user.id);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating super account: {}", e.message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
