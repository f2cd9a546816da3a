//! agora: deploy a DAO and drive proposals from the command line.
//!
//! State lives in a single file; every command loads it, applies one
//! operation at the session's current time index, and writes it back.
//! Time only moves with `agora advance`.

mod session;

use agora_governance::{Dao, DaoConfig, Proposal};
use agora_token::TokenCall;
use agora_types::{Address, Call, ProposalId, TimeIndex, VoteSupport};
use agora_utils::{format_remaining, init_logging, LogFormat};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use session::{parse_identity, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agora", about = "Token-weighted governance with review and timelock", version)]
struct Cli {
    /// State file holding the deployed DAO.
    #[arg(long, default_value = "./agora-state.bin", env = "AGORA_STATE")]
    state: PathBuf,

    /// Identity to act as: a label (hashed to an address) or 0x-prefixed hex.
    #[arg(long = "as", default_value = "owner", env = "AGORA_IDENTITY")]
    identity: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "AGORA_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "AGORA_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy a new DAO with the acting identity as deployer.
    Init {
        /// TOML configuration file. Flags and env vars override its values.
        #[arg(long, env = "AGORA_CONFIG")]
        config: Option<PathBuf>,

        #[arg(long, env = "AGORA_VOTING_DELAY")]
        voting_delay: Option<u64>,

        #[arg(long, env = "AGORA_VOTING_PERIOD")]
        voting_period: Option<u64>,

        #[arg(long, env = "AGORA_QUORUM_BPS")]
        quorum_bps: Option<u32>,

        #[arg(long, env = "AGORA_MIN_DELAY")]
        min_delay: Option<u64>,

        /// Let proposals skip reviewer approval.
        #[arg(long, env = "AGORA_NO_REVIEW")]
        no_review: bool,

        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },
    /// Move the clock forward.
    Advance {
        #[arg(default_value_t = 1)]
        by: u64,
    },
    /// Delegate voting power (to yourself by default).
    Delegate { to: Option<String> },
    /// Transfer tokens.
    Transfer { to: String, amount: u128 },
    /// Review gate operations.
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Propose minting `amount` tokens to `to`.
    ProposeMint {
        to: String,
        amount: u128,
        #[arg(long, short)]
        description: String,
    },
    /// Vote on a proposal.
    Vote {
        proposal: String,
        #[arg(value_enum)]
        support: SupportArg,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Queue a succeeded mint proposal on the timelock.
    Queue {
        to: String,
        amount: u128,
        #[arg(long, short)]
        description: String,
    },
    /// Execute a queued mint proposal.
    Execute {
        to: String,
        amount: u128,
        #[arg(long, short)]
        description: String,
    },
    /// Cancel a pending or active proposal.
    Cancel { proposal: String },
    /// Show proposals (all, or one).
    Status {
        proposal: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show balance, delegate and voting power.
    Balance { account: Option<String> },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Record a mint proposal for reviewers.
    Submit {
        to: String,
        amount: u128,
        #[arg(long, short)]
        description: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        metadata: String,
    },
    /// Approve the exact mint proposal contents.
    Approve {
        to: String,
        amount: u128,
        #[arg(long, short)]
        description: String,
    },
    AddReviewer { reviewer: String },
    RemoveReviewer { reviewer: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SupportArg {
    Against,
    For,
    Abstain,
}

impl From<SupportArg> for VoteSupport {
    fn from(arg: SupportArg) -> Self {
        match arg {
            SupportArg::Against => VoteSupport::Against,
            SupportArg::For => VoteSupport::For,
            SupportArg::Abstain => VoteSupport::Abstain,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level);

    let caller = parse_identity(&cli.identity)?;
    match cli.command {
        Command::Init {
            config,
            voting_delay,
            voting_period,
            quorum_bps,
            min_delay,
            no_review,
            force,
        } => {
            if cli.state.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    cli.state.display()
                );
            }
            let mut dao_config = match config {
                Some(path) => DaoConfig::from_toml_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => DaoConfig::default(),
            };
            if let Some(v) = voting_delay {
                dao_config.voting_delay = v;
            }
            if let Some(v) = voting_period {
                dao_config.voting_period = v;
            }
            if let Some(v) = quorum_bps {
                dao_config.quorum_bps = v;
            }
            if let Some(v) = min_delay {
                dao_config.timelock_min_delay = v;
            }
            if no_review {
                dao_config.require_review = false;
            }
            let session = Session {
                now: Default::default(),
                dao: Dao::deploy(caller, dao_config, Default::default())?,
            };
            session.store(&cli.state)?;
            print_deployment(&session.dao);
        }
        command => {
            let mut session = Session::load(&cli.state)?;
            run(&mut session, caller, command)?;
            session.store(&cli.state)?;
        }
    }
    Ok(())
}

fn run(session: &mut Session, caller: Address, command: Command) -> Result<()> {
    let now = session.now;
    let dao = &mut session.dao;
    match command {
        Command::Init { .. } => bail!("init does not run against existing state"),
        Command::Advance { by } => {
            session.now = now.saturating_add(by);
            println!("now {}", session.now);
        }
        Command::Delegate { to } => {
            let to = match to {
                Some(to) => parse_identity(&to)?,
                None => caller,
            };
            dao.delegate(&caller, to, now)?;
            println!("{caller} delegates to {to}");
        }
        Command::Transfer { to, amount } => {
            let to = parse_identity(&to)?;
            dao.transfer(&caller, to, amount, now)?;
            println!("transferred {amount} to {to}");
        }
        Command::Review { action } => review(dao, caller, action, now)?,
        Command::ProposeMint {
            to,
            amount,
            description,
        } => {
            let calls = mint_calls(dao, &to, amount)?;
            let id = dao.propose(caller, calls, &description, now)?;
            let proposal = lookup(dao, &id)?;
            println!("proposal {id}");
            println!(
                "voting opens at {} and closes at {}",
                proposal.vote_start, proposal.vote_end
            );
        }
        Command::Vote {
            proposal,
            support,
            reason,
        } => {
            let id = parse_proposal(&proposal)?;
            let weight = dao.cast_vote(caller, id, support.into(), reason, now)?;
            println!("{caller} voted {} with weight {weight}", VoteSupport::from(support));
        }
        Command::Queue {
            to,
            amount,
            description,
        } => {
            let calls = mint_calls(dao, &to, amount)?;
            let receipt = dao.queue(&calls, &description, now)?;
            println!(
                "queued as operation {}, ready at {} ({})",
                receipt.id,
                receipt.ready_at,
                format_remaining(now.as_u64(), receipt.ready_at.as_u64())
            );
        }
        Command::Execute {
            to,
            amount,
            description,
        } => {
            let calls = mint_calls(dao, &to, amount)?;
            let id = dao.execute(&calls, &description, now)?;
            println!("executed proposal {id}");
        }
        Command::Cancel { proposal } => {
            let id = parse_proposal(&proposal)?;
            dao.cancel(&caller, &id, now)?;
            println!("canceled proposal {id}");
        }
        Command::Status { proposal, json } => match proposal {
            Some(raw) => {
                let id = parse_proposal(&raw)?;
                print_proposal(dao, lookup(dao, &id)?, now, json)?;
            }
            None => {
                println!("now {now}");
                for proposal in dao.governor().proposals() {
                    print_proposal(dao, proposal, now, json)?;
                }
            }
        },
        Command::Balance { account } => {
            let account = match account {
                Some(account) => parse_identity(&account)?,
                None => caller,
            };
            let token = dao.token();
            println!("account   {account}");
            println!("balance   {} {}", token.balance_of(&account), token.symbol());
            match token.delegates(&account) {
                Some(delegate) => println!("delegate  {delegate}"),
                None => println!("delegate  (none)"),
            }
            println!("votes     {}", token.get_votes(&account));
        }
    }
    Ok(())
}

fn review(dao: &mut Dao, caller: Address, action: ReviewAction, now: TimeIndex) -> Result<()> {
    match action {
        ReviewAction::Submit {
            to,
            amount,
            description,
            title,
            metadata,
        } => {
            let calls = mint_calls(dao, &to, amount)?;
            let id =
                dao.submit_for_review(caller, &title, calls, &description, &metadata, now)?;
            let key = dao
                .review()
                .submission(&id)
                .map(|s| s.proposal)
                .context("submission vanished")?;
            println!("submission {id}");
            println!("proposal key {key}");
        }
        ReviewAction::Approve {
            to,
            amount,
            description,
        } => {
            let calls = mint_calls(dao, &to, amount)?;
            let key = Dao::proposal_key(&calls, &description);
            dao.approve(&caller, key, now)?;
            println!("approved {key}");
        }
        ReviewAction::AddReviewer { reviewer } => {
            let reviewer = parse_identity(&reviewer)?;
            dao.add_reviewer(&caller, reviewer)?;
            println!("{reviewer} is now a reviewer");
        }
        ReviewAction::RemoveReviewer { reviewer } => {
            let reviewer = parse_identity(&reviewer)?;
            dao.remove_reviewer(&caller, &reviewer)?;
            println!("{reviewer} is no longer a reviewer");
        }
    }
    Ok(())
}

fn mint_calls(dao: &Dao, to: &str, amount: u128) -> Result<Vec<Call>> {
    let to = parse_identity(to)?;
    Ok(vec![Call::new(
        dao.token().address(),
        0,
        TokenCall::Mint { to, amount }.encode()?,
    )])
}

fn parse_proposal(s: &str) -> Result<ProposalId> {
    ProposalId::from_hex(s.trim()).with_context(|| format!("invalid proposal id {s}"))
}

fn lookup<'a>(dao: &'a Dao, id: &ProposalId) -> Result<&'a Proposal> {
    dao.governor()
        .proposal(id)
        .with_context(|| format!("proposal {id} not found"))
}

fn print_proposal(dao: &Dao, proposal: &Proposal, now: TimeIndex, json: bool) -> Result<()> {
    let state = dao.state(&proposal.id, now)?;
    if json {
        let voters: Vec<_> = proposal
            .receipts
            .iter()
            .map(|(voter, receipt)| {
                serde_json::json!({
                    "voter": voter.to_string(),
                    "support": receipt.support.to_string(),
                    "weight": receipt.weight.to_string(),
                    "reason": receipt.reason,
                })
            })
            .collect();
        let value = serde_json::json!({
            "id": proposal.id.to_string(),
            "state": state.to_string(),
            "proposer": proposal.proposer.to_string(),
            "description": proposal.description,
            "snapshot": proposal.snapshot.as_u64(),
            "vote_start": proposal.vote_start.as_u64(),
            "vote_end": proposal.vote_end.as_u64(),
            "votes": {
                "for": proposal.tally.for_votes.to_string(),
                "against": proposal.tally.against.to_string(),
                "abstain": proposal.tally.abstain.to_string(),
            },
            "eta": proposal.queued.map(|q| q.eta.as_u64()),
            "voters": voters,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!("proposal  {}", proposal.id);
    println!("  state     {state}");
    println!("  proposer  {}", proposal.proposer);
    println!("  about     {}", proposal.description);
    println!("  voting    {} .. {}", proposal.vote_start, proposal.vote_end);
    println!(
        "  votes     for {} / against {} / abstain {}",
        proposal.tally.for_votes, proposal.tally.against, proposal.tally.abstain
    );
    if let Some(queued) = proposal.queued {
        println!(
            "  eta       {} ({})",
            queued.eta,
            format_remaining(now.as_u64(), queued.eta.as_u64())
        );
    }
    Ok(())
}

fn print_deployment(dao: &Dao) {
    println!("deployer  {}", dao.deployer());
    println!("token     {}", dao.token().address());
    println!("timelock  {}", dao.timelock().address());
    println!("governor  {}", dao.governor().address());
    println!("review    {}", dao.review().address());
}
