use books_api::client::BooksClient;
use books_api::{BookPatch, NewBook};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "books-cli")]
#[command(about = "Command-line client for the books API", long_about = None)]
struct Cli {
    /// Base URL including any route prefix, e.g. http://localhost:8080/api
    #[arg(short, long, env = "BOOKS_API_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all books
    List,
    /// Show one book
    Get { id: i32 },
    /// Add a book
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        pages: i32,
    },
    /// Change some fields of a book; omitted fields keep their values
    Update {
        id: i32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        pages: Option<i32>,
    },
    /// Remove a book
    Delete { id: i32 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = BooksClient::new(&cli.url);

    let result = match cli.command {
        Commands::List => client.list().await.map(|books| print_json(&books)),
        Commands::Get { id } => client.get(id).await.map(|book| print_json(&book)),
        Commands::Create { title, author, pages } => client
            .create(&NewBook::new(title, author, pages))
            .await
            .map(|book| print_json(&book)),
        Commands::Update { id, title, author, pages } => client
            .update(&BookPatch {
                id: Some(id),
                title,
                author,
                pages,
            })
            .await
            .map(|book| print_json(&book)),
        Commands::Delete { id } => client.delete(id).await.map(|()| {
            println!("Deleted book {}", id);
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: failed to render response: {}", e),
    }
}
