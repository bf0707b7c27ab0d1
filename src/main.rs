use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use shroud::config::Config;
use shroud::db::models::{AccountStatus, Comment, Post, Profile};
use shroud::db::Database;
use shroud::interaction::InteractionGate;
use shroud::output::terminal;
use shroud::policy::{matrix, ApplicationCase, ContentFilterLevel, ContentType, Visibility};
use shroud::specs::advertisements::AD_TIME_FORMAT;
use shroud::specs::roles::ROLE_PEER_SHOP;
use shroud::specs::{SpecsFactory, ViewerRequest};

/// Shroud: content-visibility policy engine.
///
/// Decides whether users, posts and comments are shown, masked or excluded
/// for a viewer, and applies that decision both to SQL queries and to
/// fetched objects.
#[derive(Parser)]
#[command(name = "shroud", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init {
        /// Also load a small demo data set
        #[arg(long)]
        demo: bool,
    },

    /// Print the decision matrices
    Matrix {
        /// Only print this case (postFeed, searchById, searchByMeta, myProfile, hideAll)
        #[arg(long)]
        case: Option<ApplicationCase>,
    },

    /// Check that every decision matrix cell is defined
    Validate,

    /// Explain the decision for one (case, judged, displayed) combination
    Explain {
        #[arg(long)]
        case: ApplicationCase,

        /// Content type the request is about (USER, POST, COMMENT)
        #[arg(long)]
        judged: ContentType,

        /// Content type being rendered
        #[arg(long)]
        displayed: ContentType,

        /// Viewer user id (empty for anonymous)
        #[arg(long, default_value = "")]
        viewer: String,

        /// Viewer content filter (MYGRANDMALIKES or MYGRANDMAHATES)
        #[arg(long)]
        filter: Option<ContentFilterLevel>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the post feed as a viewer sees it
    Feed {
        #[arg(long, default_value = "")]
        viewer: String,

        #[arg(long, default_value = "postFeed")]
        case: ApplicationCase,

        #[arg(long, default_value = "20")]
        limit: i64,

        /// Also show comments under each post
        #[arg(long)]
        comments: bool,

        #[arg(long)]
        filter: Option<ContentFilterLevel>,
    },

    /// Show one profile as a viewer sees it
    Profile {
        #[arg(long, default_value = "")]
        viewer: String,

        #[arg(long)]
        target: String,

        #[arg(long)]
        filter: Option<ContentFilterLevel>,
    },

    /// Check whether a viewer may interact with a user, post or comment
    CanInteract {
        #[arg(long, default_value = "")]
        viewer: String,

        #[arg(long = "type")]
        content_type: ContentType,

        #[arg(long)]
        id: String,
    },

    /// Show system status (DB stats, thresholds)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shroud=info")),
        )
        .init();

    let cli = Cli::parse();

    // Every matrix cell is walked once before anything else runs
    let cells = matrix::validate_all();

    match cli.command {
        Commands::Init { demo } => {
            info!("Initializing Shroud database...");
            let config = Config::load()?;
            let db = shroud::db::initialize(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");

            if demo {
                seed_demo(&db).await?;
                println!("Demo data loaded.");
                println!("\nTry: shroud feed --viewer ada");
            }
        }

        Commands::Matrix { case } => {
            let cases = match case {
                Some(case) => vec![case],
                None => ApplicationCase::ALL.to_vec(),
            };
            for case in cases {
                terminal::display_case_matrix(case);
            }
            println!();
        }

        Commands::Validate => {
            println!(
                "{} {} cells defined across {} cases",
                "OK".green().bold(),
                cells,
                ApplicationCase::ALL.len()
            );
        }

        Commands::Explain {
            case,
            judged,
            displayed,
            viewer,
            filter,
            json,
        } => {
            let config = Config::load()?;
            let factory = SpecsFactory::from_config(&config);
            let mut request = ViewerRequest::new(viewer, case);
            request.content_filter = filter;

            let explanation = shroud::explain::explain(&factory, &request, judged, displayed);
            if json {
                println!("{}", serde_json::to_string_pretty(&explanation)?);
            } else {
                terminal::display_explanation(&explanation);
            }
        }

        Commands::Feed {
            viewer,
            case,
            limit,
            comments,
            filter,
        } => {
            let config = Config::load()?;
            let db = shroud::db::open(&config.db_path)?;
            let factory = SpecsFactory::from_config(&config);
            let mut request = ViewerRequest::new(viewer, case);
            request.content_filter = filter;

            let posts =
                shroud::pipeline::feed::load_feed(&db, &factory, &request, Utc::now(), limit).await?;
            terminal::display_feed(&posts);

            if comments {
                for view in &posts {
                    let rows = shroud::pipeline::feed::load_comments(
                        &db,
                        &factory,
                        &request,
                        &view.post.postid,
                    )
                    .await?;
                    if !rows.is_empty() {
                        println!("  {}", view.post.postid.dimmed());
                        terminal::display_comments(&rows);
                    }
                }
            }
        }

        Commands::Profile {
            viewer,
            target,
            filter,
        } => {
            let config = Config::load()?;
            let db = shroud::db::open(&config.db_path)?;
            let factory = SpecsFactory::from_config(&config);

            match shroud::pipeline::profiles::load_profile(&db, &factory, &viewer, &target, filter)
                .await?
            {
                Some(profile) => terminal::display_profile(&profile),
                None => println!("Profile {target} is not visible."),
            }
        }

        Commands::CanInteract {
            viewer,
            content_type,
            id,
        } => {
            let config = Config::load()?;
            let db = shroud::db::open(&config.db_path)?;
            if !db.content_exists(content_type, &id).await? {
                anyhow::bail!("No {content_type} with id {id}");
            }

            let factory = SpecsFactory::from_config(&config);
            let request = ViewerRequest::new(viewer, ApplicationCase::SearchById);
            let gate = InteractionGate::new(db, factory.for_request(&request, content_type));

            if gate.can_interact(content_type, &id).await? {
                println!("{} interaction with {content_type} {id} is allowed", "yes".green().bold());
            } else {
                println!("{} interaction with {content_type} {id} is forbidden", "no".red().bold());
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            let db = shroud::db::open(&config.db_path)?;
            shroud::status::show(&db, &config).await?;
        }
    }

    Ok(())
}

/// Insert a handful of users, posts and comments covering each moderation state.
async fn seed_demo(db: &Arc<dyn Database>) -> Result<()> {
    let profile = |uid: &str, status: AccountStatus, visibility: Visibility, reports: i64| Profile {
        uid: uid.to_string(),
        username: uid.to_string(),
        img: Some(format!("/profile/{uid}.jpeg")),
        biography: Some(format!("/userData/{uid}.txt")),
        status,
        visibility,
        reports,
    };
    for p in [
        profile("ada", AccountStatus::Active, Visibility::Normal, 0),
        profile("bob", AccountStatus::Active, Visibility::Normal, 7),
        profile("cyd", AccountStatus::Active, Visibility::Illegal, 0),
        profile("dee", AccountStatus::Deleted, Visibility::Normal, 0),
        profile("eve", AccountStatus::Active, Visibility::Normal, 0),
    ] {
        db.insert_profile(&p).await?;
    }
    db.set_account_roles("eve", ROLE_PEER_SHOP, true).await?;

    let post = |postid: &str, owner: &str, visibility: Visibility, reports: i64| Post {
        postid: postid.to_string(),
        userid: owner.to_string(),
        title: format!("{owner}'s {postid}"),
        media: format!("/image/{postid}.jpeg"),
        cover: None,
        description: format!("written by {owner}"),
        visibility,
        reports,
    };
    for p in [
        post("sunrise", "ada", Visibility::Normal, 0),
        post("rant", "bob", Visibility::Normal, 9),
        post("contraband", "cyd", Visibility::Illegal, 0),
        post("flagged", "ada", Visibility::Hidden, 0),
        post("farewell", "dee", Visibility::Normal, 0),
        post("promo", "ada", Visibility::Normal, 0),
        post("storefront", "eve", Visibility::Normal, 0),
    ] {
        db.insert_post(&p).await?;
    }

    let comment = |commentid: &str, postid: &str, owner: &str, reports: i64| Comment {
        commentid: commentid.to_string(),
        postid: postid.to_string(),
        userid: owner.to_string(),
        content: format!("{owner} says hi"),
        visibility: Visibility::Normal,
        post_visibility: Visibility::Normal,
        reports,
    };
    for c in [
        comment("c1", "sunrise", "bob", 0),
        comment("c2", "sunrise", "ada", 6),
        comment("c3", "rant", "ada", 0),
    ] {
        db.insert_comment(&c).await?;
    }

    db.block_user("ada", "cyd").await?;

    let now = Utc::now();
    db.insert_advertisement(
        "promo",
        &(now - Duration::hours(1)).format(AD_TIME_FORMAT).to_string(),
        &(now + Duration::days(1)).format(AD_TIME_FORMAT).to_string(),
    )
    .await?;

    info!("Demo data seeded");
    Ok(())
}
