use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};

use fridge_chef::{
    media, render, FridgeChef, IdentifyIngredientsInput, IngredientList, SuggestRecipesInput,
};

/// Tell it what's in your fridge and get recipe suggestions
#[derive(Parser, Debug)]
#[command(name = "fridge-chef", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the ingredients visible in a fridge video
    Identify {
        /// Path to the video file
        video: PathBuf,
    },
    /// Suggest recipes for a comma-separated ingredient list
    Suggest {
        /// e.g. "chicken breast, broccoli, soy sauce, garlic"
        ingredients: String,
    },
    /// Identify ingredients in a video (optional), then suggest recipes
    Cook {
        #[arg(long)]
        video: Option<PathBuf>,
        #[arg(long, default_value = "")]
        ingredients: String,
    },
    /// Serve both flows over HTTP
    Serve {
        /// The address and optionally port to bind to
        #[arg(long, default_value = "127.0.0.1:3000")]
        address: String,
    },
}

async fn video_data_uri(path: &Path) -> Result<String, Box<dyn Error>> {
    let video = media::load_video_file(path).await?;
    Ok(media::encode_data_uri(&video))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let chef = FridgeChef::from_env()?;

    match cli.command {
        Command::Identify { video } => {
            let input = IdentifyIngredientsInput {
                video_data_uri: video_data_uri(&video).await?,
            };
            let output = chef.identify_ingredients(&input).await?;
            println!("{}", output.identified_ingredients);
        }
        Command::Suggest { ingredients } => {
            let ingredients = IngredientList::parse(&ingredients)?;
            let input = SuggestRecipesInput {
                ingredients: ingredients.into_inner(),
            };
            let output = chef.suggest_recipes(&input).await?;
            if output.recipes.is_empty() {
                println!("{}", fridge_chef::session::NO_RECIPES_MESSAGE);
            } else {
                print!("{}", render::results(&output.recipes));
            }
        }
        Command::Cook { video, ingredients } => {
            let mut session = chef.session();
            session.set_ingredients(ingredients);

            let uri = match video {
                Some(path) => Some(video_data_uri(&path).await?),
                None => None,
            };
            let result = session
                .cook(chef.identifier(), chef.suggester(), uri.as_deref(), |notice| {
                    eprintln!("{}: {}", notice.title, notice.description)
                })
                .await;
            print!("{}", render::session_summary(&session));
            result?;
        }
        Command::Serve { address } => {
            let listener = tokio::net::TcpListener::bind(&address).await?;
            fridge_chef::server::serve(listener, chef).await?;
        }
    }

    Ok(())
}
