//! Mission planner: keeps the player's group supplied with missions
//!
//! Sources are tried in order: authored mission templates, the group's
//! strategic assignments, then a fixed randomized pattern.

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::actions::ActionType;
use crate::campaign::{Campaign, MissionFactory, MissionRequest};
use crate::core::config::PlannerConfig;
use crate::core::types::{GroupId, SimTime};
use crate::force::{GroupType, MissionType};

use MissionType::{AirPatrol, AirSweep, EscortFreight, EscortShuttle, Patrol, Sweep};

/// Patrol / escort-freight pattern for starship groups
const STARSHIP_PATTERN: [MissionType; 16] = [
    Patrol, Patrol, EscortFreight, Patrol, EscortFreight, Patrol, EscortFreight, EscortFreight,
    Patrol, EscortFreight, Patrol, EscortFreight, Patrol, Patrol, EscortFreight, Patrol,
];

/// Pattern for fighter groups
const FIGHTER_PATTERN: [MissionType; 16] = [
    Patrol, Sweep, EscortShuttle, AirPatrol, Sweep, EscortShuttle, Patrol, Patrol, AirSweep,
    Patrol, AirPatrol, EscortShuttle, Patrol, Sweep, Patrol, AirSweep,
];

/// Fighter slots rotate 0, 1, 2; strategic assignments are used on slots 0 and 1
const FIGHTER_SLOTS: u8 = 3;

#[derive(Debug, Clone)]
pub struct MissionPlanner {
    config: PlannerConfig,
    last_run: Option<SimTime>,
    slot: u8,
    /// Round-robin position in the player's assignment list
    assignment_cursor: usize,
    /// Position in the starship pattern; starts at a random slot
    starship_cursor: Option<usize>,
    fighter_cursor: usize,
    /// Start time chosen for the current pass
    start: SimTime,
}

impl MissionPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            config: config.clone(),
            last_run: None,
            slot: 0,
            assignment_cursor: 0,
            starship_cursor: None,
            fighter_cursor: 0,
            start: 0,
        }
    }

    /// Queue one mission for the player's group when its queue has room
    ///
    /// Returns the id of the queued mission, if any.
    pub fn exec_frame(
        &mut self,
        campaign: &mut Campaign,
        factory: &mut impl MissionFactory,
    ) -> Option<u32> {
        let player = campaign.player_group?;
        let (fighters, starships) = (
            campaign.forces.is_fighter_group(player),
            campaign.forces.is_starship_group(player),
        );

        let queued = campaign.missions.len();
        if queued > 0 {
            if starships && queued >= self.config.starship_mission_limit {
                return None;
            }
            if queued >= self.config.fighter_mission_limit {
                return None;
            }
            if self
                .last_run
                .is_some_and(|last| campaign.time - last < self.config.fighter_replan_interval)
            {
                return None;
            }
        }

        self.start = self.select_start_time(campaign);

        let request = if fighters {
            self.slot = (self.slot + 1) % FIGHTER_SLOTS;
            self.plan_campaign_mission(campaign, player)
                .or_else(|| self.plan_strategic_mission(campaign, player))
                .or_else(|| Some(self.plan_random_fighter_mission(campaign, player)))
        } else if starships {
            self.slot = 0;
            self.plan_campaign_mission(campaign, player)
                .or_else(|| self.plan_strategic_mission(campaign, player))
                .or_else(|| Some(self.plan_random_starship_mission(campaign, player)))
        } else {
            None
        };
        self.last_run = Some(campaign.time);

        let request = request?;
        let id = campaign.queue_mission(factory, &request);
        debug!(
            mission = request.mission.name(),
            start = request.start,
            queued = ?id,
            "mission planned"
        );
        id
    }

    /// Half-hour slot after the last queued mission, or after now plus one delay
    fn select_start_time(&self, campaign: &Campaign) -> SimTime {
        let delay = self.config.mission_delay;
        let base = match campaign.missions.last().map(|m| m.start) {
            Some(start) if start != 0 => start,
            _ => campaign.time + delay,
        };
        let start = base + delay;
        start - start % delay
    }

    /// First available mission template bound to the player's group or wing
    fn plan_campaign_mission(&self, campaign: &mut Campaign, player: GroupId) -> Option<MissionRequest> {
        let templates: Vec<_> = campaign
            .actions
            .iter()
            .filter(|a| a.action_type == ActionType::MissionTemplate)
            .map(|a| a.id)
            .collect();
        let player_is_wing = campaign
            .forces
            .group(player)
            .is_some_and(|g| g.group_type == GroupType::Wing);

        for id in templates {
            if !campaign.is_action_available(id) {
                continue;
            }
            let Some(action) = campaign.actions.get(id) else {
                continue;
            };
            if action.exec_time > 0
                && campaign.time - action.exec_time < self.config.template_refire_interval
            {
                continue;
            }

            let Some(group) = campaign.find_group(action.iff, action.asset_type, action.asset_id) else {
                continue;
            };
            let bound = group == player || (player_is_wing && campaign.forces.is_ancestor(player, group));
            if !bound {
                continue;
            }

            let Some(mission) = action.mission else {
                warn!(action = id.0, "mission template without a mission type");
                continue;
            };
            let mut request = MissionRequest::new(mission, self.start, group);
            request.opposing_type = action.opposing_type;
            request.script = action.script.clone();

            let now = campaign.time;
            if let Err(err) = campaign.actions.fire_action(id, now) {
                warn!(action = id.0, %err, "could not fire mission template");
            }
            trace!(action = id.0, "mission template used");
            return Some(request);
        }
        None
    }

    /// Next strategic assignment of the player's group, round robin
    ///
    /// A wing also offers the assignments of its squadrons.
    fn plan_strategic_mission(&mut self, campaign: &Campaign, player: GroupId) -> Option<MissionRequest> {
        if self.slot > 1 {
            return None;
        }
        let group = campaign.forces.group(player)?;

        let mut assignments = group.assignments.clone();
        if group.group_type == GroupType::Wing {
            for c in &group.components {
                if let Some(component) = campaign.forces.group(*c) {
                    assignments.extend(component.assignments.iter().cloned());
                }
            }
        }
        if assignments.is_empty() {
            return None;
        }

        if self.assignment_cursor >= assignments.len() {
            self.assignment_cursor = 0;
        }
        let pick = &assignments[self.assignment_cursor];
        self.assignment_cursor += 1;

        Some(MissionRequest::new(pick.mission, self.start, pick.resource).with_objective(pick.objective))
    }

    fn plan_random_starship_mission(&mut self, campaign: &mut Campaign, player: GroupId) -> MissionRequest {
        let roll = campaign.rng.gen_range(0..STARSHIP_PATTERN.len());
        let cursor = match self.starship_cursor {
            None => roll,
            Some(c) if c >= STARSHIP_PATTERN.len() => 0,
            Some(c) => c,
        };
        self.starship_cursor = Some(cursor + 1);

        let mut mission = STARSHIP_PATTERN[cursor];
        let mut objective = None;
        if mission == EscortFreight {
            let iff = campaign.forces.group(player).map(|g| g.iff).unwrap_or(0);
            match campaign.find_group(iff, GroupType::Freight, -1) {
                Some(freight) if campaign.forces.count_units(freight) >= 1 => objective = Some(freight),
                _ => mission = Patrol,
            }
        }

        MissionRequest::new(mission, self.start, player).with_objective(objective)
    }

    fn plan_random_fighter_mission(&mut self, campaign: &mut Campaign, player: GroupId) -> MissionRequest {
        let mut mission = FIGHTER_PATTERN[self.fighter_cursor];
        self.fighter_cursor = (self.fighter_cursor + 1) % FIGHTER_PATTERN.len();

        let Some(group) = campaign.forces.group(player) else {
            return MissionRequest::new(Patrol, self.start, player);
        };
        let iff = group.iff;
        let is_wing = group.group_type == GroupType::Wing;
        let mut primary = player;
        let mut objective = None;

        let escorted = match mission {
            EscortFreight => Some(GroupType::Freight),
            EscortShuttle => Some(GroupType::LcaSquadron),
            _ => None,
        };

        if let Some(kind) = escorted {
            match campaign.find_group(iff, kind, -1) {
                Some(g) if campaign.forces.calc_value(g) >= 1 => objective = Some(g),
                _ => mission = Patrol,
            }
        } else if is_wing {
            let kind = if campaign.rng.gen_bool(0.5) {
                GroupType::InterceptSquadron
            } else {
                GroupType::FighterSquadron
            };
            if let Some(squadron) = campaign.forces.find_group(player, kind, -1) {
                primary = squadron;
            }
        }

        if mission.is_air() && !self.over_terrain(campaign, primary) {
            mission = mission.space_equivalent();
        }

        MissionRequest::new(mission, self.start, primary).with_objective(objective)
    }

    /// The primary's assigned zone has a confirmed atmospheric second region
    fn over_terrain(&self, campaign: &Campaign, primary: GroupId) -> bool {
        campaign
            .forces
            .group(primary)
            .and_then(|g| g.assigned_zone)
            .and_then(|z| campaign.zones.zone(z))
            .and_then(|z| z.regions.get(1))
            .is_some_and(|region| campaign.zones.is_terrain(region))
    }
}
