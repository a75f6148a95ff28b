//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use league_board::{
    cli::{Commands, LeagueBoardCli},
    commands::{
        board::{handle_board, BoardParams},
        resolve::{handle_roster, handle_season},
    },
    logging::init_logging,
};

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let app = LeagueBoardCli::parse();
    init_logging(app.verbose);

    match app.command {
        Commands::Board {
            leagues,
            slots,
            stats_concurrency,
            no_previous_season,
            text,
            out,
            client,
        } => {
            handle_board(BoardParams {
                leagues,
                slots,
                stats_concurrency,
                merge_previous_season: !no_previous_season,
                as_text: text,
                out,
                client,
            })
            .await?
        }

        Commands::Season { league, client } => handle_season(league, client).await?,

        Commands::Roster {
            league,
            season,
            json,
            client,
        } => handle_roster(league, season, json, client).await?,
    }

    Ok(())
}
