//! Campaign Simulation
//! Runs the campaign planners over a two-sided order of battle

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use dynamic_campaign::actions::{Action, ActionType};
use dynamic_campaign::campaign::{Campaign, QueueMissionFactory};
use dynamic_campaign::core::error::{CampaignError, Result};
use dynamic_campaign::core::types::{ActionId, SimTime};
use dynamic_campaign::core::{set_config, PlannerConfig};
use dynamic_campaign::force::{GroupType, OrderOfBattle};
use dynamic_campaign::planning::CampaignPlanner;
use dynamic_campaign::zone::{ZoneLayout, ZoneRegistry};

const DEMO_ZONES: &str = include_str!("../../data/zones.toml");
const DEMO_ALLIANCE: &str = include_str!("../../data/alliance.toml");
const DEMO_HEGEMONY: &str = include_str!("../../data/hegemony.toml");

/// Campaign Simulation - strategic planning between two sides
#[derive(Parser, Debug)]
#[command(name = "campaign_sim")]
#[command(about = "Run the campaign planners over an order of battle")]
struct Args {
    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulated hours to run
    #[arg(long, default_value_t = 24)]
    hours: i64,

    /// Seconds between ticks
    #[arg(long, default_value_t = 300)]
    step: SimTime,

    /// Planner configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order of battle (TOML); repeat once per side
    #[arg(long)]
    oob: Vec<PathBuf>,

    /// Zone layout (TOML)
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Player group type
    #[arg(long, default_value = "fighter_squadron")]
    player_type: String,

    /// Player group number
    #[arg(long, default_value_t = 12)]
    player_id: i32,

    /// Player side
    #[arg(long, default_value_t = 1)]
    player_iff: i32,

    /// Print the final campaign as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    // Combatants read their default target weights from the global config
    if set_config(config.clone()).is_err() {
        warn!("planner config already initialised");
    }

    let mut campaign = build_campaign(&args)?;
    let player_type = GroupType::from_name(&args.player_type)?;
    let player = campaign
        .find_group(args.player_iff, player_type, args.player_id)
        .ok_or_else(|| {
            CampaignError::UnknownName(format!(
                "player group {} {} on side {}",
                args.player_type, args.player_id, args.player_iff
            ))
        })?;
    campaign.set_player_group(player)?;

    info!(
        campaign = %campaign.name,
        seed = args.seed,
        zones = campaign.zones.len(),
        sides = campaign.combatants.len(),
        "starting campaign"
    );

    let mut planner = CampaignPlanner::new(&config);
    let mut factory = QueueMissionFactory::default();
    let end = args.hours * 3600;
    let step = args.step.max(1);

    let mut directives = 0;
    let mut missions = 0;
    let mut retired = 0;
    let mut t = 0;
    while t <= end {
        campaign.advance_to(t);
        retired += campaign.retire_missions();
        let report = planner.tick(&mut campaign, &mut factory);
        directives += report.directives;
        if let Some(id) = report.mission {
            missions += 1;
            info!(mission = id, time = t, "mission queued");
        }
        t += step;
    }

    if args.json {
        println!("{}", campaign.to_json()?);
        return Ok(());
    }

    println!("=== {} after {} hours ===", campaign.name, args.hours);
    println!("Directives applied: {}", directives);
    println!("Missions planned:   {} ({} flown, {} queued)", missions, retired, campaign.missions.len());

    for combatant in &campaign.combatants {
        println!();
        println!("{} (iff {}) score {}", combatant.name, combatant.iff, combatant.score);
        for g in campaign.forces.preorder(combatant.force) {
            let Some(group) = campaign.forces.group(g) else {
                continue;
            };
            let zone = group
                .assigned_zone
                .and_then(|z| campaign.zones.zone(z))
                .map(|z| z.name.as_str())
                .unwrap_or("-");
            println!(
                "  {:<22} {:<20} region {:<14} zone {:<8} value {:>6} assignments {}",
                group.group_type.display_name(),
                group.name,
                group.region,
                zone,
                campaign.forces.computed_value(g),
                group.assignments.len()
            );
        }
    }

    for mission in &campaign.missions {
        println!(
            "Queued mission {}: {:?} at {}s",
            mission.id, mission.mission, mission.start
        );
    }

    Ok(())
}

fn build_campaign(args: &Args) -> Result<Campaign> {
    let mut campaign = Campaign::new("Janus Campaign", args.seed);

    let layout = match &args.zones {
        Some(path) => ZoneLayout::load(path)?,
        None => ZoneLayout::from_toml_str(DEMO_ZONES)?,
    };
    campaign.zones = ZoneRegistry::from_layout(&layout);

    if args.oob.is_empty() {
        for text in [DEMO_ALLIANCE, DEMO_HEGEMONY] {
            campaign.add_order_of_battle(&OrderOfBattle::from_toml_str(text)?)?;
        }
        add_demo_actions(&mut campaign)?;
    } else {
        for path in &args.oob {
            campaign.add_order_of_battle(&OrderOfBattle::load(path)?)?;
        }
    }

    Ok(campaign)
}

/// Send the Tiger battle group to Ostara after the first watch
fn add_demo_actions(campaign: &mut Campaign) -> Result<()> {
    let mut redeploy = Action::new(ActionId(1), ActionType::ZoneAssignment, 0, 1);
    redeploy.asset_type = GroupType::BattleGroup;
    redeploy.asset_id = 7;
    redeploy.region = "Ostara".into();
    redeploy.start_after = 4 * 3600;
    redeploy.text = "Tiger group redeploys to Ostara".into();
    campaign.actions.add(redeploy)
}
