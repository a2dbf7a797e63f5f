mod commands;
mod seed;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cuisine_core::{ClientConfig, Role, User};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "cuisine")]
#[command(about = "Browse and share recipes", long_about = None)]
struct Cli {
    /// Recipe service URL (default: $CUISINE_API_URL or http://localhost:3000)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Username acting in this session
    #[arg(long, global = true, env = "CUISINE_USER", default_value = "")]
    user: String,

    /// Role of the session user: user or admin
    #[arg(long, global = true, env = "CUISINE_ROLE", default_value = "user")]
    role: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes, newest first
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Read the local cache without contacting the server
        #[arg(long)]
        cached: bool,
    },
    /// Show one recipe
    Show { id: String },
    /// Create a recipe authored by the session user
    Add {
        #[command(flatten)]
        fields: commands::RecipeFields,
    },
    /// Change some fields of a recipe
    Edit {
        id: String,
        #[command(flatten)]
        fields: commands::RecipeFields,
    },
    /// Delete a recipe
    Delete { id: String },
    /// Like a recipe
    Like { id: String },
    /// Manage comments on a recipe
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },
    /// Create a handful of sample recipes
    Seed,
}

#[derive(Subcommand)]
enum CommentAction {
    /// Add a comment as the session user
    Add { recipe_id: String, text: String },
    /// Replace the text of a comment
    Edit {
        recipe_id: String,
        comment_id: String,
        text: String,
    },
    /// Delete a comment
    Delete {
        recipe_id: String,
        comment_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(server) = cli.server {
        config.api_url = server;
    }

    let role: Role = cli.role.parse()?;
    tracing::debug!(api_url = %config.api_url, user = %cli.user, role = %cli.role, "cli: session ready");
    let session = commands::Session {
        store: config.build_store()?,
        user: User::new(cli.user, role),
        write_policy: config.write_policy,
    };

    match cli.command {
        Commands::List {
            category,
            author,
            cached,
        } => session.list(category, author, cached).await?,
        Commands::Show { id } => session.show(&id).await?,
        Commands::Add { fields } => session.add(fields).await?,
        Commands::Edit { id, fields } => session.edit(&id, fields).await?,
        Commands::Delete { id } => session.delete(&id).await?,
        Commands::Like { id } => session.like(&id).await?,
        Commands::Comment { action } => match action {
            CommentAction::Add { recipe_id, text } => {
                session.add_comment(&recipe_id, text).await?
            }
            CommentAction::Edit {
                recipe_id,
                comment_id,
                text,
            } => session.edit_comment(&recipe_id, &comment_id, &text).await?,
            CommentAction::Delete {
                recipe_id,
                comment_id,
            } => session.delete_comment(&recipe_id, &comment_id).await?,
        },
        Commands::Seed => seed::seed(&session).await?,
    }

    Ok(())
}
