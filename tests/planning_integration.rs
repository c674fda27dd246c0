//! Integration tests for the campaign planners running together

use dynamic_campaign::campaign::{Campaign, QueueMissionFactory};
use dynamic_campaign::core::types::{GroupId, ZoneId};
use dynamic_campaign::core::PlannerConfig;
use dynamic_campaign::force::{GroupType, Intel, OrderOfBattle, UnitClass};
use dynamic_campaign::planning::strategic::{assign_zones, reset_needs};
use dynamic_campaign::planning::{CampaignPlanner, MovementPlanner};
use dynamic_campaign::zone::{ZoneLayout, ZoneRegistry};
use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const ZONES: &str = include_str!("../data/zones.toml");
const ALLIANCE: &str = include_str!("../data/alliance.toml");
const HEGEMONY: &str = include_str!("../data/hegemony.toml");

fn demo_campaign(seed: u64) -> Campaign {
    let mut campaign = Campaign::new("Janus Campaign", seed);
    campaign.zones = ZoneRegistry::from_layout(&ZoneLayout::from_toml_str(ZONES).unwrap());
    for text in [ALLIANCE, HEGEMONY] {
        let oob = OrderOfBattle::from_toml_str(text).unwrap();
        campaign.add_order_of_battle(&oob).unwrap();
    }
    campaign
}

/// A carrier group worth 500 in a zone with no need, plus two candidate zones
fn carrier_between_zones() -> (Campaign, GroupId) {
    let mut campaign = Campaign::new("Zones", 5);
    let z1 = campaign.zones.add_zone("Janus", &["Janus"]);
    let z2 = campaign.zones.add_zone("Janus", &["Solus"]);
    campaign.zones.add_zone("Janus", &["Haiche"]);
    assert_eq!((z1, z2), (ZoneId(0), ZoneId(1)));

    let root = campaign.forces.add_group(GroupType::Force, 1, "Alliance", 1);
    let cv = campaign.forces.add_group(GroupType::CarrierGroup, 3, "Valiant", 1);
    campaign.forces.add_component(root, cv).unwrap();
    campaign.forces.add_unit(cv, "Escort", UnitClass::Destroyer, 1).unwrap();
    campaign.forces.assign_region(cv, "Haiche");
    campaign.add_combatant("Alliance", 1, root).unwrap();

    campaign.forces.calc_value(root);
    reset_needs(&mut campaign, 1);
    (campaign, cv)
}

#[test]
fn test_carrier_goes_to_zone_with_most_need() {
    let (mut campaign, cv) = carrier_between_zones();
    assert_eq!(campaign.forces.group(cv).unwrap().value, 500);

    campaign.zones.zone_mut(ZoneId(0)).unwrap().find_force(1).add_need(GroupType::CarrierGroup, 10);
    campaign.zones.zone_mut(ZoneId(1)).unwrap().find_force(1).add_need(GroupType::CarrierGroup, 4);

    assign_zones(&mut campaign, 1);

    assert_eq!(campaign.forces.group(cv).unwrap().assigned_zone, Some(ZoneId(0)));
    let need = campaign.zones.zone(ZoneId(0)).unwrap().force(1).unwrap().get_need(GroupType::CarrierGroup);
    assert_eq!(need, 10 - 500);
    let untouched = campaign.zones.zone(ZoneId(1)).unwrap().force(1).unwrap().get_need(GroupType::CarrierGroup);
    assert_eq!(untouched, 4);
}

#[test]
fn test_needs_equal_to_current_zone_never_move_group() {
    let (mut campaign, cv) = carrier_between_zones();
    campaign.zones.zone_mut(ZoneId(0)).unwrap().find_force(1).add_need(GroupType::FighterSquadron, 6);
    campaign.zones.zone_mut(ZoneId(2)).unwrap().find_force(1).add_need(GroupType::InterceptSquadron, 6);

    assign_zones(&mut campaign, 1);
    assert_eq!(campaign.forces.group(cv).unwrap().assigned_zone, Some(ZoneId(2)));
}

#[test]
fn test_far_unit_uses_inward_profile() {
    let planner = MovementPlanner::new(&PlannerConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(340);
    let start = DVec3::new(0.0, 340e3, 0.0);

    for _ in 0..100 {
        let next = planner.drift(start, &mut rng);
        // Inward pull of at most 120 km * 0.0625 plus 3 km of jitter
        assert!(next.length() < start.length() + 3e3);
        assert!((next - start).length() < 120e3 * 0.0625 + 3e3 + 1.0);
    }
}

#[test]
fn test_demo_campaign_loads_both_sides() {
    let campaign = demo_campaign(1);
    assert_eq!(campaign.combatants.len(), 2);
    assert_eq!(campaign.zones.len(), 3);

    let wing = campaign.find_group(1, GroupType::Wing, 30).unwrap();
    let fighters = campaign.find_group(1, GroupType::FighterSquadron, 12).unwrap();
    assert_eq!(campaign.forces.group(fighters).unwrap().parent, Some(wing));
    assert!(campaign.find_group(2, GroupType::FighterSquadron, 12).is_none());
    assert_eq!(
        campaign.forces.group(campaign.find_group(1, GroupType::Freight, 1).unwrap()).unwrap().intel,
        Intel::Reserve
    );
}

#[test]
fn test_full_day_of_planning() {
    let mut campaign = demo_campaign(42);
    let player = campaign.find_group(1, GroupType::FighterSquadron, 12).unwrap();
    campaign.set_player_group(player).unwrap();

    let config = PlannerConfig::default();
    let mut planner = CampaignPlanner::new(&config);
    let mut factory = QueueMissionFactory::default();

    let first = planner.tick(&mut campaign, &mut factory);
    assert!(first.strategic);
    assert!(first.assignment);
    assert!(first.movement);
    assert!(first.mission.is_some());

    let mut t = 0;
    while t <= 24 * 3600 {
        campaign.advance_to(t);
        campaign.retire_missions();
        planner.tick(&mut campaign, &mut factory);

        assert!(campaign.missions.len() <= config.fighter_mission_limit);
        for mission in &campaign.missions {
            assert_eq!(mission.start % config.mission_delay, 0);
            assert!(mission.start > campaign.time);
        }
        t += 300;
    }

    // Starship formations, their embarked squadrons and base squadrons all have zones
    for (iff, kind, number) in [
        (1, GroupType::CarrierGroup, 3),
        (1, GroupType::FighterSquadron, 12),
        (1, GroupType::BattleGroup, 7),
        (1, GroupType::DestroyerSquadron, 4),
        (2, GroupType::BattleGroup, 5),
        (2, GroupType::InterceptSquadron, 21),
    ] {
        let g = campaign.find_group(iff, kind, number).unwrap();
        assert!(campaign.forces.group(g).unwrap().assigned_zone.is_some(), "{:?} unzoned", kind);
    }
    let guard = campaign.find_group(2, GroupType::InterceptSquadron, 21).unwrap();
    let solus = campaign.zones.zone_for_region("Solus");
    assert_eq!(campaign.forces.group(guard).unwrap().assigned_zone, solus);

    // The known Hegemony battery is on the Alliance target list
    let battery = campaign.find_group(2, GroupType::Battery, 8).unwrap();
    let alliance = campaign.combatant_by_iff(1).unwrap();
    assert!(alliance.target_list.contains(&battery));
    // The secret ore train is not
    let ore = campaign.find_group(2, GroupType::Freight, 6).unwrap();
    assert!(!alliance.target_list.contains(&ore));

    let json: serde_json::Value = serde_json::from_str(&campaign.to_json().unwrap()).unwrap();
    assert_eq!(json["name"], "Janus Campaign");
    assert!(json.get("rng").is_none());
}

#[test]
fn test_same_seed_same_campaign() {
    let run = |seed| {
        let mut campaign = demo_campaign(seed);
        let player = campaign.find_group(1, GroupType::BattleGroup, 7).unwrap();
        campaign.set_player_group(player).unwrap();
        let mut planner = CampaignPlanner::new(&PlannerConfig::default());
        let mut factory = QueueMissionFactory::default();
        for step in 0..48 {
            campaign.advance_to(step * 1800);
            campaign.retire_missions();
            planner.tick(&mut campaign, &mut factory);
        }
        serde_json::to_string(&(&campaign.forces, &campaign.missions)).unwrap()
    };

    assert_eq!(run(7), run(7));
}
