use combat_core::{
    Agent, AgentId, AgentTemplate, AttackDirection, AttackId, AttackProfile, AttackType, CircleSlot,
    CombatConfig, CombatError, ErrorSeverity, FormationError, PlayerAttack, PredictionSource,
    RosterError, Vec3,
};
use combat_runtime::{
    Arena, ArenaConfig, AttackState, Blackboard, CombatHost, PerceivedActor, Reaction,
    RuntimeError,
};
use state_machine::{State, Transition};

#[derive(Clone, Debug, PartialEq)]
enum HostEvent {
    EnterCombat(AgentId),
    LeaveCombat(AgentId),
    PerformAttack(AgentId, u32),
    Parry(AgentId, AttackDirection),
    Dodge(AgentId, AttackDirection),
    Feint(AgentId, AttackDirection),
    Release(AgentId),
}

#[derive(Default)]
struct RecordingHost {
    player: Vec3,
    events: Vec<HostEvent>,
    moves: Vec<(AgentId, Vec3)>,
}

impl RecordingHost {
    fn attacks(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::PerformAttack(..)))
            .count()
    }
}

impl CombatHost for RecordingHost {
    fn player_position(&self) -> Vec3 {
        self.player
    }
    fn enter_combat(&mut self, agent: AgentId) {
        self.events.push(HostEvent::EnterCombat(agent));
    }
    fn leave_combat(&mut self, agent: AgentId) {
        self.events.push(HostEvent::LeaveCombat(agent));
    }
    fn perform_attack(&mut self, agent: AgentId, score: u32) {
        self.events.push(HostEvent::PerformAttack(agent, score));
    }
    fn parry(&mut self, agent: AgentId, direction: AttackDirection) {
        self.events.push(HostEvent::Parry(agent, direction));
    }
    fn dodge(&mut self, agent: AgentId, direction: AttackDirection) {
        self.events.push(HostEvent::Dodge(agent, direction));
    }
    fn react_to_feint(&mut self, agent: AgentId, direction: AttackDirection) {
        self.events.push(HostEvent::Feint(agent, direction));
    }
    fn move_to(&mut self, agent: AgentId, location: Vec3) {
        self.moves.push((agent, location));
    }
    fn release(&mut self, agent: AgentId) {
        self.events.push(HostEvent::Release(agent));
    }
}

fn arena(config: ArenaConfig) -> Arena<RecordingHost> {
    Arena::new(config, RecordingHost::default()).unwrap()
}

fn template(x: f32, y: f32, score: u32) -> AgentTemplate {
    AgentTemplate::new(Vec3::new(x, y, 0.0), score)
}

fn quick(direction: AttackDirection, target: AgentId) -> PlayerAttack {
    PlayerAttack::new(direction, AttackType::Quick, target)
}

#[test]
fn engagement_budget_admits_four_and_five_but_not_six() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 4)).unwrap();
    let b = arena.spawn_agent(&template(0.0, 500.0, 5)).unwrap();
    let c = arena.spawn_agent(&template(-500.0, 0.0, 6)).unwrap();

    assert_eq!(arena.have_agent_join_combat(a), Ok(CircleSlot::Front));
    assert_eq!(arena.have_agent_join_combat(b), Ok(CircleSlot::Right));

    let err = arena.have_agent_join_combat(c).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Formation(FormationError::EngagementBudgetExceeded {
            agent: c,
            requested: 6,
            available: 1,
        })
    );
    assert_eq!(err.severity(), ErrorSeverity::Recoverable);

    assert_eq!(arena.available_engagement_budget(), 1);
    assert_eq!(arena.circle_members(), &[a, b]);
    assert!(arena.roster().is_idle(c));
    assert_eq!(
        arena.host().events,
        vec![HostEvent::EnterCombat(a), HostEvent::EnterCombat(b)]
    );
}

#[test]
fn engaged_set_matches_circle_members() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 2)).unwrap();

    arena.have_agent_join_combat(a).unwrap();
    assert!(arena.roster().is_engaged(a));
    assert!(arena.agent(a).unwrap().is_in_combat());

    assert_eq!(
        arena.have_agent_join_combat(a),
        Err(RuntimeError::Roster(RosterError::AlreadyEngaged { agent: a }))
    );
    assert_eq!(arena.available_engagement_budget(), 8);

    arena.have_agent_flee_combat(a).unwrap();
    assert!(arena.roster().is_idle(a));
    assert!(arena.circle_members().is_empty());
    assert_eq!(arena.available_engagement_budget(), 10);
    assert_eq!(arena.host().events.last(), Some(&HostEvent::LeaveCombat(a)));
}

#[test]
fn dead_agent_frees_its_slot_for_the_next_join() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 4)).unwrap();
    let b = arena.spawn_agent(&template(510.0, 0.0, 6)).unwrap();
    let late = arena.spawn_agent(&template(520.0, 0.0, 5)).unwrap();

    assert_eq!(arena.have_agent_join_combat(a), Ok(CircleSlot::Front));
    arena.have_agent_join_combat(b).unwrap();
    assert!(arena.have_agent_join_combat(late).is_err());

    arena.agent_died(a).unwrap();
    assert_eq!(arena.formation().slot_of(a), None);
    assert!(!arena.roster().is_registered(a));
    assert!(arena.formation().occupant(CircleSlot::Front).is_none());
    assert_eq!(arena.available_engagement_budget(), 4);
    assert!(arena.controller(a).is_none());
    assert_eq!(arena.host().events.last(), Some(&HostEvent::Release(a)));

    // the slot stays free until someone asks for it
    arena.tick(0.1);
    assert!(arena.formation().occupant(CircleSlot::Front).is_none());

    arena.agent_mut(late).unwrap().set_position(Vec3::new(600.0, 0.0, 0.0));
    assert!(arena.have_agent_join_combat(late).is_err());
    arena.agent_died(b).unwrap();
    assert_eq!(arena.have_agent_join_combat(late), Ok(CircleSlot::Front));
}

#[test]
fn dead_agents_cannot_act() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    arena.agent_died(a).unwrap();

    assert_eq!(
        arena.have_agent_join_combat(a),
        Err(RuntimeError::UnknownAgent { agent: a })
    );
    assert!(arena.agent(a).unwrap().is_dead());
    assert_eq!(
        arena.agent_died(a),
        Err(RuntimeError::UnknownAgent { agent: a })
    );
}

#[test]
fn attacks_reserve_and_release_the_attack_budget() {
    let config = ArenaConfig::new(CombatConfig::default().with_attack_budget(5));
    let mut arena = arena(config);
    let heavy = AttackProfile::new(3, 3, 3);
    let a = arena.spawn_agent(&template(500.0, 0.0, 1).with_attack_profile(heavy)).unwrap();
    let b = arena.spawn_agent(&template(-500.0, 0.0, 1).with_attack_profile(heavy)).unwrap();
    arena.have_agent_join_combat(a).unwrap();
    arena.have_agent_join_combat(b).unwrap();

    assert_eq!(arena.have_agent_attack(a), Ok(3));
    assert_eq!(arena.available_attack_budget(), 2);
    assert!(arena.agent(a).unwrap().is_busy());
    assert_eq!(
        arena.have_agent_attack(a),
        Err(RuntimeError::AttackInFlight { agent: a })
    );
    assert!(matches!(
        arena.have_agent_attack(b),
        Err(RuntimeError::Formation(FormationError::AttackBudgetExceeded {
            requested: 3,
            available: 2,
        }))
    ));

    let finished = arena.agent_attack_finished(a).unwrap();
    assert_eq!(finished.score, 3);
    assert_eq!(arena.available_attack_budget(), 5);
    assert!(!arena.agent(a).unwrap().is_busy());
    assert_eq!(
        arena.agent_attack_finished(a),
        Err(RuntimeError::NoAttackInFlight { agent: a })
    );

    assert_eq!(arena.have_agent_attack(b), Ok(3));
    assert_eq!(arena.host().attacks(), 2);
}

#[test]
fn idle_agents_cannot_attack() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    assert_eq!(
        arena.have_agent_attack(a),
        Err(RuntimeError::Roster(RosterError::NotEngaged { agent: a }))
    );
    assert_eq!(arena.available_attack_budget(), 10);
}

#[test]
fn fleeing_or_dying_cancels_the_reserved_attack() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    let b = arena.spawn_agent(&template(-500.0, 0.0, 1)).unwrap();
    arena.have_agent_join_combat(a).unwrap();
    arena.have_agent_join_combat(b).unwrap();

    arena.have_agent_attack(a).unwrap();
    arena.have_agent_attack(b).unwrap();
    assert!(arena.available_attack_budget() < 10);

    arena.have_agent_flee_combat(a).unwrap();
    arena.agent_died(b).unwrap();
    assert_eq!(arena.available_attack_budget(), 10);
    assert_eq!(arena.available_engagement_budget(), 10);
}

#[test]
fn engaged_target_reacts_to_player_attacks() {
    let config = ArenaConfig::new(CombatConfig::default().with_prediction_trust(1.0));
    let mut arena = arena(config);
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    let idle = arena.spawn_agent(&template(-500.0, 0.0, 1)).unwrap();
    arena.have_agent_join_combat(a).unwrap();

    assert_eq!(
        arena.record_player_attack(&quick(AttackDirection::LeftSlash, a)),
        Some(Reaction::Parry(AttackDirection::LeftSlash))
    );
    let strong = PlayerAttack::new(AttackDirection::Thrust, AttackType::Strong, a);
    assert_eq!(
        arena.record_player_attack(&strong),
        Some(Reaction::Dodge(AttackDirection::Thrust))
    );
    let feint = PlayerAttack::new(AttackDirection::UpwardSlash, AttackType::Feint, a);
    assert_eq!(
        arena.record_player_attack(&feint),
        Some(Reaction::Feint(AttackDirection::UpwardSlash))
    );

    // attacks at idle agents are learned from but not reacted to
    assert_eq!(arena.record_player_attack(&quick(AttackDirection::Thrust, idle)), None);
    assert_eq!(arena.roster().predictor().history().len(), 4);

    let events = &arena.host().events;
    assert!(events.contains(&HostEvent::Parry(a, AttackDirection::LeftSlash)));
    assert!(events.contains(&HostEvent::Dodge(a, AttackDirection::Thrust)));
    assert!(events.contains(&HostEvent::Feint(a, AttackDirection::UpwardSlash)));
}

#[test]
fn busy_agents_ignore_incoming_attacks() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    arena.have_agent_join_combat(a).unwrap();
    arena.have_agent_attack(a).unwrap();
    let before = arena.host().events.len();

    assert_eq!(
        arena.record_player_attack(&quick(AttackDirection::RightSlash, a)),
        Some(Reaction::Ignored)
    );
    assert_eq!(arena.host().events.len(), before);
    // still learned from
    assert_eq!(arena.roster().predictor().history().len(), 1);
}

#[test]
fn untrusting_agents_still_react_with_a_valid_attack() {
    let config = ArenaConfig::new(CombatConfig::default().with_prediction_trust(0.0));
    let mut arena = arena(config);
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    arena.have_agent_join_combat(a).unwrap();

    for _ in 0..20 {
        let reaction = arena.record_player_attack(&quick(AttackDirection::Thrust, a));
        assert!(matches!(
            reaction,
            Some(Reaction::Parry(_) | Reaction::Dodge(_) | Reaction::Feint(_))
        ));
    }
}

#[test]
fn player_attacks_are_ignored_until_someone_is_engaged() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    assert_eq!(arena.record_player_attack(&quick(AttackDirection::Thrust, a)), None);
    assert!(arena.roster().predictor().history().is_empty());
    assert!(arena.last_prediction().is_none());
}

#[test]
fn repeated_pattern_drives_the_stored_prediction() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    arena.have_agent_join_combat(a).unwrap();

    let ids = [2u8, 5, 2, 5, 9, 2, 5];
    for (i, raw) in ids.iter().enumerate() {
        let (direction, attack_type) = AttackId::new(*raw).unwrap().decode();
        arena.record_player_attack(&PlayerAttack::new(direction, attack_type, a));
        if i < 2 {
            assert!(arena.last_prediction().is_none());
        }
    }

    let prediction = arena.last_prediction().unwrap();
    assert_eq!(prediction.attack, AttackId::new(9).unwrap());
    assert_eq!(prediction.source, PredictionSource::Pattern);
}

#[test]
fn guard_alert_attack_lifecycle() {
    let config = ArenaConfig::default()
        .with_join_retry_seconds(0.5)
        .with_attack_interval_seconds(1.0);
    let mut arena = arena(config);
    let a = arena.spawn_agent(&template(800.0, 0.0, 3)).unwrap();

    arena.tick(0.1);
    assert_eq!(arena.controller(a).unwrap().current_state(), Some("guard"));

    arena.sense_update(a, vec![PerceivedActor::Player]).unwrap();
    arena.tick(0.1);
    assert_eq!(arena.controller(a).unwrap().current_state(), Some("alert"));
    assert!(!arena.roster().is_engaged(a));

    // alert requests to join on its first tick
    arena.tick(0.1);
    assert!(arena.roster().is_engaged(a));
    assert_eq!(arena.formation().slot_of(a), Some(CircleSlot::Front));

    arena.tick(0.1);
    assert_eq!(arena.controller(a).unwrap().current_state(), Some("attack"));

    // the attack state walks to the slot and attacks once the interval passes
    let slot = arena.location_for_agent(a).unwrap();
    assert_eq!(slot, Vec3::new(150.0, 0.0, 0.0));
    // once the attack is in flight the agent is busy and stops counting down
    for _ in 0..15 {
        arena.tick(0.1);
    }
    assert_eq!(arena.host().attacks(), 1);
    assert!(arena.host().moves.contains(&(a, slot)));

    // losing sight of the player flees combat and returns to guard
    arena.agent_attack_finished(a).unwrap();
    arena.sense_update(a, Vec::new()).unwrap();
    arena.tick(0.1);
    assert!(arena.roster().is_idle(a));
    assert!(arena.circle_members().is_empty());
    assert_eq!(arena.controller(a).unwrap().current_state(), Some("guard"));
}

#[test]
fn full_circle_makes_alert_agents_retry() {
    let config = ArenaConfig::new(CombatConfig::default().with_engagement_budget(3))
        .with_join_retry_seconds(1.0);
    let mut arena = arena(config);
    let a = arena.spawn_agent(&template(500.0, 0.0, 3)).unwrap();
    let b = arena.spawn_agent(&template(-500.0, 0.0, 3)).unwrap();
    for id in [a, b] {
        arena.sense_update(id, vec![PerceivedActor::Player]).unwrap();
    }

    arena.tick(0.1); // enter guard
    arena.tick(0.1); // guard -> alert
    arena.tick(0.1); // both request; only a fits
    assert!(arena.roster().is_engaged(a));
    assert!(arena.roster().is_idle(b));

    arena.agent_died(a).unwrap();
    // b's retry timer has not run out yet
    arena.tick(0.5);
    assert!(arena.roster().is_idle(b));
    arena.tick(0.5);
    assert!(arena.roster().is_engaged(b));
}

struct Scripted {
    log: &'static str,
}

impl State<Blackboard> for Scripted {
    fn name(&self) -> &'static str {
        self.log
    }
    fn tick(&mut self, _bb: &mut Blackboard, _dt: f32) -> Transition<Blackboard> {
        Transition::Stay
    }
}

#[test]
fn swap_state_is_deferred_to_the_next_tick() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    arena.tick(0.1);

    arena.swap_state(a, Box::new(Scripted { log: "scripted" })).unwrap();
    let controller = arena.controller(a).unwrap();
    assert_eq!(controller.current_state(), Some("guard"));
    assert!(controller.has_pending_state());

    arena.tick(0.1);
    let controller = arena.controller(a).unwrap();
    assert_eq!(controller.current_state(), Some("scripted"));
    assert!(!controller.has_pending_state());
}

#[test]
fn agents_can_start_in_any_state() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena
        .spawn_agent_in(&template(500.0, 0.0, 1), Box::new(AttackState::new()))
        .unwrap();
    arena.tick(0.1);
    assert_eq!(arena.controller(a).unwrap().current_state(), Some("attack"));

    // not engaged and nobody in sight: the attack state gives up
    arena.tick(0.1);
    assert_eq!(arena.controller(a).unwrap().current_state(), Some("guard"));
}

#[test]
fn reassign_moves_a_member_toward_its_position() {
    let mut arena = arena(ArenaConfig::default());
    let a = arena.spawn_agent(&template(500.0, 0.0, 1)).unwrap();
    assert_eq!(arena.have_agent_join_combat(a), Ok(CircleSlot::Front));

    arena.agent_mut(a).unwrap().set_position(Vec3::new(-500.0, 0.0, 0.0));
    assert_eq!(arena.reassign_slot(a), Ok(CircleSlot::Back));
    assert_eq!(arena.available_engagement_budget(), 9);
}

fn last_move(arena: &Arena<RecordingHost>, agent: AgentId) -> Option<Vec3> {
    arena
        .host()
        .moves
        .iter()
        .rev()
        .find(|(id, _)| *id == agent)
        .map(|(_, location)| *location)
}

fn walk_to(arena: &mut Arena<RecordingHost>, agent: AgentId, location: Vec3) {
    arena.agent_mut(agent).unwrap().set_position(location);
    arena.tick(0.1);
}

#[test]
fn patrolling_agent_loops_its_route() {
    let first = Vec3::new(600.0, 0.0, 0.0);
    let second = Vec3::new(600.0, 300.0, 0.0);
    let mut arena = arena(ArenaConfig::default());
    let a = arena
        .spawn_agent(&template(500.0, 0.0, 1).with_waypoints([first, second]))
        .unwrap();

    arena.tick(0.1);
    assert_eq!(last_move(&arena, a), Some(first));

    walk_to(&mut arena, a, first);
    assert_eq!(last_move(&arena, a), Some(second));

    walk_to(&mut arena, a, second);
    assert_eq!(last_move(&arena, a), Some(first));
}

#[test]
fn one_shot_patrol_ends_at_the_guard_post() {
    let post = Vec3::new(400.0, -100.0, 0.0);
    let first = Vec3::new(600.0, 0.0, 0.0);
    let second = Vec3::new(600.0, 300.0, 0.0);
    let mut arena = arena(ArenaConfig::default());
    let a = arena
        .spawn_agent(
            &template(500.0, 0.0, 1)
                .with_guard_post(post)
                .with_waypoints([first, second])
                .with_patrol_continuous(false),
        )
        .unwrap();

    arena.tick(0.1);
    walk_to(&mut arena, a, first);
    walk_to(&mut arena, a, second);
    assert_eq!(last_move(&arena, a), Some(post));

    walk_to(&mut arena, a, first);
    assert_eq!(last_move(&arena, a), Some(post));
}
