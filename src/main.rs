//! Library Client - console front end for the library REST API

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_client::{
    config::{AppConfig, LoggingConfig},
    console::{BookChanges, Console},
    models::BookForm,
    AppResult, AppState,
};

#[derive(Parser, Debug)]
#[command(name = "library-client", version, about = "Library management console")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Confirm every prompt without asking
    #[arg(short, long, global = true, default_value_t = false)]
    yes: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with email and password
    Login {
        email: String,
        #[arg(env = "LIBRARY_PASSWORD")]
        password: String,
    },

    /// Log in with a Google ID token
    LoginGoogle { credential: String },

    /// Create a member account
    Register {
        name: String,
        email: String,
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the role carried by the stored session
    Whoami,

    /// Open a page by path, e.g. `/admin/users`
    Open {
        path: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Admin dashboard totals
    Dashboard,

    /// Member home: available books
    Home {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show one book
    Book { id: String },

    /// Rent a book
    Rent { book_id: String },

    /// User administration
    Users {
        #[command(subcommand)]
        cmd: UsersCommand,
    },

    /// Book administration
    Books {
        #[command(subcommand)]
        cmd: BooksCommand,
    },

    /// Category administration
    Categories {
        #[command(subcommand)]
        cmd: CategoriesCommand,
    },

    /// Rental listing
    Rentals {
        #[command(subcommand)]
        cmd: RentalsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Delete {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Restore {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum BooksCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Create {
        #[arg(long)]
        code_book: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        stock: i64,
        #[arg(long)]
        description: String,
        /// Category id; repeat for several
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Cover image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Update {
        id: String,
        #[arg(long)]
        code_book: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        stock: Option<i64>,
        #[arg(long)]
        description: Option<String>,
        /// Replaces all categories when given
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Restore {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Create {
        name: String,
    },
    Update {
        id: String,
        name: String,
    },
    Delete {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Subcommand, Debug)]
enum RentalsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    tracing::debug!("Starting library-client v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config)?;
    let mut console = Console::new(state, cli.yes);

    if let Err(e) = run(&mut console, cli.command).await {
        console.report(&e);
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_client={}", logging.level).into());

    // Diagnostics go to stderr so they never mix with rendered pages
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(console: &mut Console, command: Command) -> AppResult<()> {
    match command {
        Command::Login { email, password } => console.login(&email, &password).await,
        Command::LoginGoogle { credential } => console.login_google(&credential).await,
        Command::Register { name, email, password } => console.register(&name, &email, &password).await,
        Command::Logout => console.logout(),
        Command::Whoami => {
            console.whoami();
            Ok(())
        }
        Command::Open { path, page } => console.open(&path, page).await,
        Command::Dashboard => console.open("/admin", 1).await,
        Command::Home { page } => console.open("/home", page).await,
        Command::Book { id } => console.open(&format!("/books/{}", id), 1).await,
        Command::Rent { book_id } => console.rent(&book_id).await,
        Command::Users { cmd } => match cmd {
            UsersCommand::List { page } => console.open("/admin/users", page).await,
            UsersCommand::Delete { id, page } => console.delete_user(&id, page).await,
            UsersCommand::Restore { id, page } => console.restore_user(&id, page).await,
            UsersCommand::Update {
                id,
                name,
                email,
                password,
            } => {
                console
                    .update_user(&id, name.as_deref(), email.as_deref(), &password)
                    .await
            }
        },
        Command::Books { cmd } => match cmd {
            BooksCommand::List { page } => console.open("/admin/books", page).await,
            BooksCommand::Create {
                code_book,
                title,
                author,
                stock,
                description,
                categories,
                image,
            } => {
                let form = BookForm {
                    code_book,
                    title,
                    author,
                    stock,
                    description,
                    category_ids: categories,
                    image,
                };
                console.create_book(form).await
            }
            BooksCommand::Update {
                id,
                code_book,
                title,
                author,
                stock,
                description,
                categories,
                image,
            } => {
                let changes = BookChanges {
                    code_book,
                    title,
                    author,
                    stock,
                    description,
                    category_ids: (!categories.is_empty()).then_some(categories),
                    image,
                };
                console.update_book(&id, changes).await
            }
            BooksCommand::Delete { id, page } => console.delete_book(&id, page).await,
            BooksCommand::Restore { id, page } => console.restore_book(&id, page).await,
        },
        Command::Categories { cmd } => match cmd {
            CategoriesCommand::List { page } => console.open("/admin/categories", page).await,
            CategoriesCommand::Create { name } => console.create_category(&name, 1).await,
            CategoriesCommand::Update { id, name } => console.update_category(&id, &name, 1).await,
            CategoriesCommand::Delete { id, page } => console.delete_category(&id, page).await,
        },
        Command::Rentals { cmd } => match cmd {
            RentalsCommand::List { page } => console.open("/admin/rentals", page).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_delete_with_page() {
        let cli = Cli::parse_from(["library-client", "--yes", "users", "delete", "u7", "--page", "3"]);
        assert!(cli.yes);
        match cli.command {
            Command::Users {
                cmd: UsersCommand::Delete { id, page },
            } => {
                assert_eq!(id, "u7");
                assert_eq!(page, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
