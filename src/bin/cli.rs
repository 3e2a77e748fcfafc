use chirp::{
    config::AppConfig,
    db,
    services::{
        user_service::{AvatarUpload, SignupRequest, UserServiceError},
        UserService,
    },
    AppState,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "chirp-cli")]
#[command(about = "CLI tool for managing chirp users and tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Personal access token commands
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Path to the avatar image
        #[arg(short, long)]
        avatar: PathBuf,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Issue a new token for an existing user
    Issue {
        /// Email address of the user
        #[arg(short, long)]
        email: String,
    },
}

async fn get_password(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

async fn confirm_password(prompt: &str) -> Result<(String, String), Box<dyn std::error::Error>> {
    let password = get_password(prompt).await?;
    let confirm = get_password("Confirm password").await?;
    Ok((password, confirm))
}

fn report_user_error(action: &str, err: UserServiceError) -> ! {
    match err {
        UserServiceError::Validation(errors) => {
            eprintln!("❌ Failed to {}:", action);
            for (field, messages) in errors.iter() {
                for message in messages {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
        other => eprintln!("❌ Failed to {}: {}", action, other),
    }
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    db::migrate(&pool).await?;

    // Initialize services
    let state = AppState::new(pool, &config);
    let user_service: Arc<UserService> = state.user_service.clone();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                name,
                email,
                password,
                avatar,
            } => {
                let (password, password_confirm) = if let Some(pw) = password {
                    (pw.clone(), pw)
                } else {
                    confirm_password("Password").await?
                };

                if password != password_confirm {
                    eprintln!("❌ Passwords do not match");
                    std::process::exit(1);
                }

                let bytes = match tokio::fs::read(&avatar).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        eprintln!("❌ Cannot read avatar {}: {}", avatar.display(), err);
                        std::process::exit(1);
                    }
                };

                let request = SignupRequest {
                    name: Some(name),
                    email: Some(email),
                    password: Some(password),
                    image: Some(AvatarUpload::new(bytes)),
                };

                match user_service.signup(request).await {
                    Ok(outcome) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", outcome.user.id);
                        println!("  Name: {}", outcome.user.name);
                        println!("  Email: {}", outcome.user.email);
                        println!("  Avatar: {}", outcome.user.image);
                        println!("  Token: {}", outcome.auth_token);
                    }
                    Err(err) => report_user_error("create user", err),
                }
            }

            UserCommands::List { limit, offset } => {
                match user_service.list_users(Some(limit), Some(offset)).await {
                    Ok(users) => {
                        if users.is_empty() {
                            println!("No users found.");
                        } else {
                            println!(
                                "{:<5} {:<20} {:<40} {:<20}",
                                "ID", "Name", "Email", "Created"
                            );
                            println!("{}", "-".repeat(85));
                            for user in users {
                                println!(
                                    "{:<5} {:<20} {:<40} {:<20}",
                                    user.id,
                                    user.name,
                                    user.email,
                                    user.created_at.format("%Y-%m-%d %H:%M:%S")
                                );
                            }
                        }
                    }
                    Err(err) => report_user_error("list users", err),
                }
            }
        },

        Commands::Token { command } => match command {
            TokenCommands::Issue { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => match user_service.issue_token(&user).await {
                    Ok(token) => {
                        println!("✅ Token issued for '{}'", email);
                        println!("  {}", token);
                    }
                    Err(err) => report_user_error("issue token", err),
                },
                Ok(None) => {
                    eprintln!("❌ User '{}' not found", email);
                    std::process::exit(1);
                }
                Err(err) => report_user_error("find user", err),
            },
        },
    }

    Ok(())
}
