use clap::{Parser, Subcommand};
use garage_storefront::{
    AdminSession, ApiClient, ClientConfig, SessionStore,
    admin::messages,
    booking::{self, CarWashBooking},
    catalog::{ArticleIndex, PartsCatalog, VideoGallery},
    models::{ArticleQuery, PartStatus},
    resolve_session_path,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "garage_storefront", about = "Browse the garage catalogue from a terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List spare parts, optionally only new or used ones.
    Parts {
        #[arg(long)]
        status: Option<PartStatus>,
    },
    /// List videos with their thumbnails and player links.
    Videos,
    /// List articles (published only unless --all).
    Articles {
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        all: bool,
    },
    /// Print the WhatsApp link for a car-washing booking.
    Book {
        #[arg(long)]
        car_type: String,
        #[arg(long)]
        washing_type: String,
    },
    /// Print the WhatsApp link for a general car-washing inquiry.
    Inquire,
    /// Remember the signed-in admin.
    Login {
        #[arg(long)]
        user: String,
        #[arg(long)]
        token: String,
    },
    /// Show who is signed in.
    Whoami,
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    info!("using API at {}", config.api_base_url);
    let client = ApiClient::new(&config)?;

    match cli.command {
        Command::Parts { status } => {
            let mut catalog = PartsCatalog::new(client);
            catalog.load().await;
            if let Some(error) = catalog.error() {
                return Err(error.into());
            }
            let parts: Vec<_> = match status {
                Some(status) => catalog.with_status(status).collect(),
                None => catalog.parts().iter().collect(),
            };
            for part in parts {
                println!(
                    "#{} {} | {} - {} | {} جنيه | {}",
                    part.id,
                    part.name,
                    part.brand,
                    part.model,
                    part.price,
                    part.status.label()
                );
            }
        }
        Command::Videos => {
            let mut gallery = VideoGallery::new(client, config.media_origin.clone());
            gallery.load(&mut rand::thread_rng()).await;
            if let Some(error) = gallery.error() {
                return Err(error.into());
            }
            for card in gallery.cards() {
                println!(
                    "#{} [{}] {} {}\n    {}",
                    card.id, card.duration, card.date, card.description, card.thumbnail
                );
            }
        }
        Command::Articles {
            author,
            search,
            all,
        } => {
            let query = ArticleQuery {
                published: (!all).then_some(true),
                author,
                search,
            };
            let mut index = ArticleIndex::with_query(client, query);
            index.load().await;
            if let Some(error) = index.error() {
                return Err(error.into());
            }
            for article in index.articles() {
                println!(
                    "#{} {} ({}) sections={} tags={}",
                    article.id,
                    article.title,
                    article.author,
                    article.sections.len(),
                    article.tags.join(", ")
                );
            }
        }
        Command::Book {
            car_type,
            washing_type,
        } => {
            let link = CarWashBooking::new(car_type, washing_type).whatsapp_link()?;
            println!("{link}");
        }
        Command::Inquire => println!("{}", booking::inquiry_link()),
        Command::Login { user, token } => {
            SessionStore::new(resolve_session_path())
                .login(&AdminSession::new(token, user))
                .await?;
        }
        Command::Whoami => match SessionStore::new(resolve_session_path()).load().await {
            Some(session) => println!("{}", messages::greeting(&session.admin_user)),
            None => println!("not signed in"),
        },
        Command::Logout => SessionStore::new(resolve_session_path()).logout().await?,
    }

    Ok(())
}
