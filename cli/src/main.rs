//! CLI entrypoint for teamforge
//!
//! Wires the store adapter into the use cases with dependency injection.
//! State is carried between invocations through a JSON snapshot file, so a
//! whole voting scenario can be driven command by command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use teamforge_application::{
    CastVoteInput, CastVoteUseCase, CreatePollInput, CreatePollUseCase, MemberProfile, TeamStore,
};
use teamforge_domain::{HonorTier, KickPoll, PollId, Team, TeamId, UserId, VoteChoice};
use teamforge_infrastructure::{ConfigLoader, InMemoryStore, StoreSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "teamforge", version, about = "Team formation with honor-vote moderation")]
struct Cli {
    /// Path of the JSON state file
    #[arg(long, default_value = "teamforge-state.json")]
    state: PathBuf,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip config file discovery and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a member profile
    Register {
        user: String,
        #[arg(long)]
        name: String,
    },
    /// Create a team led by the given user
    CreateTeam {
        #[arg(long)]
        leader: String,
        #[arg(long, default_value_t = 4)]
        size: usize,
        /// Explicit team id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// Add a member to a team
    Join {
        #[arg(long)]
        team: String,
        #[arg(long)]
        user: String,
    },
    /// Open a kick poll (leader only)
    StartPoll {
        #[arg(long)]
        team: String,
        #[arg(long)]
        requester: String,
        #[arg(long)]
        target: String,
        #[arg(long)]
        reason: String,
    },
    /// Cast a vote on an active poll
    Vote {
        #[arg(long)]
        poll: String,
        #[arg(long)]
        voter: String,
        #[arg(long)]
        choice: String,
    },
    /// Follow a poll, printing each update until it completes
    Watch {
        #[arg(long)]
        poll: String,
        /// How often to re-read the state file, in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
    /// Show a team: roster, honor, polls, messages
    Show {
        #[arg(long)]
        team: String,
    },
}

fn poll_line(poll: &KickPoll) -> String {
    match poll.outcome {
        Some(outcome) => format!(
            "{}: yes {} / no {} -- completed ({outcome})",
            poll.id, poll.yes_count, poll.no_count
        ),
        None => format!(
            "{}: yes {} / no {} -- active",
            poll.id, poll.yes_count, poll.no_count
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // === Dependency Injection ===
    let store = Arc::new(if cli.state.exists() {
        let snapshot = StoreSnapshot::load(&cli.state)
            .with_context(|| format!("loading state from {}", cli.state.display()))?;
        InMemoryStore::from_snapshot(snapshot)
    } else {
        InMemoryStore::new()
    });

    match cli.command {
        Command::Register { user, name } => {
            store.register_profile(MemberProfile {
                id: UserId::new(user.clone()),
                display_name: name,
                honor_score: teamforge_domain::HONOR_STARTING_SCORE,
            });
            println!("Registered {user}");
        }
        Command::CreateTeam { leader, size, id } => {
            let team_id = id.map(TeamId::new).unwrap_or_else(TeamId::generate);
            let team = Team::new(team_id.clone(), UserId::new(leader), size);
            store.insert(team).await?;
            info!(team = %team_id, "team created");
            println!("Created team {team_id}");
        }
        Command::Join { team, user } => {
            let team_id = TeamId::new(team);
            let versioned = store.get(&team_id).await?;
            let mut team = versioned.value;
            team.add_member(UserId::new(user.clone()));
            store.compare_and_update(team, versioned.version).await?;
            println!("{user} joined {team_id}");
        }
        Command::StartPoll {
            team,
            requester,
            target,
            reason,
        } => {
            let use_case = CreatePollUseCase::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                config.voting.clone(),
            );
            let poll = use_case
                .execute(CreatePollInput {
                    team_id: TeamId::new(team),
                    requester: UserId::new(requester),
                    target: UserId::new(target),
                    reason,
                })
                .await?;
            println!("Poll {} opened against {}", poll.id, poll.target_name);
        }
        Command::Vote {
            poll,
            voter,
            choice,
        } => {
            let choice: VoteChoice = choice.parse()?;
            let use_case = CastVoteUseCase::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                config.voting.clone(),
            );
            let out = use_case
                .execute(CastVoteInput {
                    poll_id: PollId::new(poll),
                    voter: UserId::new(voter),
                    choice,
                })
                .await?;
            match out.outcome {
                Some(outcome) => println!(
                    "Vote recorded: yes {} / no {} -- poll completed, outcome: {outcome}",
                    out.yes_count, out.no_count
                ),
                None => println!(
                    "Vote recorded: yes {} / no {} -- poll still active",
                    out.yes_count, out.no_count
                ),
            }
        }
        Command::Watch { poll, interval_ms } => {
            use teamforge_application::PollStore;

            let poll_id = PollId::new(poll);
            let current = PollStore::get(store.as_ref(), &poll_id).await?.value;
            println!("{}", poll_line(&current));
            if !current.is_active() {
                return Ok(());
            }

            let mut feed = PollStore::watch(store.as_ref(), &poll_id).await?;
            // Other processes write the state file; tailing it feeds the
            // watch channel through `absorb`.
            let refresher = tokio::spawn({
                let store = store.clone();
                let state_path = cli.state.clone();
                async move {
                    let mut ticker =
                        tokio::time::interval(std::time::Duration::from_millis(interval_ms.max(50)));
                    loop {
                        ticker.tick().await;
                        if let Ok(snapshot) = StoreSnapshot::load(&state_path) {
                            store.absorb(snapshot).await;
                        }
                    }
                }
            });

            while let Some(update) = feed.changed().await {
                println!("{}", poll_line(&update));
                if !update.is_active() {
                    break;
                }
            }
            refresher.abort();

            // Watching never writes; leave the state file to the voters.
            return Ok(());
        }
        Command::Show { team } => {
            let team_id = TeamId::new(team);
            let team = store.get(&team_id).await?.value;
            println!("Team {} [{}], target size {}", team.id, team.status, team.target_size);
            println!("Members:");
            for member in &team.members {
                let role = if team.is_leader(member) { " (leader)" } else { "" };
                match teamforge_application::ProfileStore::get(store.as_ref(), member).await {
                    Ok(profile) => println!(
                        "  {} <{member}>{role} -- honor {} ({})",
                        profile.display_name,
                        profile.honor_score,
                        HonorTier::from_score(profile.honor_score)
                    ),
                    Err(_) => println!("  <{member}>{role}"),
                }
            }
            let polls = store.polls_of(&team_id);
            if !polls.is_empty() {
                println!("Polls:");
                for poll in polls {
                    let status = match poll.outcome {
                        Some(outcome) => format!("completed ({outcome})"),
                        None => "active".to_string(),
                    };
                    println!(
                        "  {} -- kick {} [{status}] yes {} / no {} ({})",
                        poll.id, poll.target_name, poll.yes_count, poll.no_count, poll.reason
                    );
                }
            }
            let messages = store.messages(&team_id);
            if !messages.is_empty() {
                println!("Messages:");
                for message in messages {
                    println!("  [{}] {}", message.author, message.text);
                }
            }
        }
    }

    store
        .snapshot()
        .save(&cli.state)
        .with_context(|| format!("saving state to {}", cli.state.display()))?;
    Ok(())
}
