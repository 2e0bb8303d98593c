use academy_engine::{
    AcademySession, Catalog, ManualClock, PlayerStats, ProgressionConfig, StatDelta, StatKey,
    StoryEvent, StoryTrigger, UnitStatus,
};

fn session_with(catalog: Catalog, stats: PlayerStats) -> AcademySession<ManualClock> {
    let config = ProgressionConfig {
        initial_stats: stats,
        ..ProgressionConfig::default()
    };
    let mut session = AcademySession::with_clock(catalog, config, ManualClock::starting_at(0));
    session.begin();
    session
}

fn bundled() -> Catalog {
    Catalog::load_from_static().unwrap()
}

fn event(id: &str, trigger: StoryTrigger, rewards: Option<StatDelta>) -> StoryEvent {
    StoryEvent {
        id: id.to_string(),
        title: id.to_string(),
        text: String::new(),
        icon: None,
        trigger,
        rewards,
        is_triggered: false,
    }
}

fn xp_at_least(value: u32) -> StoryTrigger {
    StoryTrigger::StatAtLeast {
        stat: StatKey::Xp,
        value,
    }
}

#[test]
fn crossing_a_level_boundary_keeps_level_in_step_with_xp() {
    let mut session = session_with(
        Catalog::empty(),
        PlayerStats {
            xp: 95,
            ..PlayerStats::default()
        },
    );
    session.on_activity_complete(StatDelta::xp(10));
    assert_eq!(session.stats().xp, 105);
    assert_eq!(session.stats().level, 2);
    assert_eq!(session.stats().skill_points, 2);

    session.on_activity_complete(StatDelta::xp(250));
    assert_eq!(session.stats().level, 4);
    assert_eq!(session.stats().skill_points, 4);
    assert!(session.stats().level_consistent(100));
}

#[test]
fn large_costs_floor_stats_at_zero() {
    let mut session = session_with(
        Catalog::empty(),
        PlayerStats {
            energy: 10,
            ..PlayerStats::default()
        },
    );
    session.on_activity_complete(
        StatDelta::default()
            .with_energy(-50)
            .with_health(-500)
            .with_social(-51),
    );
    let stats = session.stats();
    assert_eq!((stats.energy, stats.health, stats.social), (0, 0, 0));
}

#[test]
fn efficient_learner_rounds_boosted_xp_half_up() {
    let mut session = session_with(
        bundled(),
        PlayerStats {
            skill_points: 3,
            ..PlayerStats::default()
        },
    );
    assert!(session.on_unlock_skill("root_mind"));
    assert!(session.on_unlock_skill("xp_boost_1"));
    session.on_activity_complete(StatDelta::xp(5));
    assert_eq!(session.stats().xp, 6);
}

#[test]
fn mental_fortitude_scales_energy_both_ways() {
    let mut session = session_with(
        bundled(),
        PlayerStats {
            skill_points: 3,
            ..PlayerStats::default()
        },
    );
    assert!(session.on_unlock_skill("root_mind"));
    assert!(session.on_unlock_skill("energy_saver_1"));
    session.on_activity_complete(StatDelta::default().with_energy(-20));
    assert_eq!(session.stats().energy, 62);
    session.on_activity_complete(StatDelta::default().with_energy(10));
    assert_eq!(session.stats().energy, 71);
}

#[test]
fn lesson_chain_only_moves_forward() {
    let mut session = session_with(bundled(), PlayerStats::default());
    let order: Vec<String> = session
        .lessons()
        .iter()
        .map(|lesson| lesson.challenge_id.clone())
        .collect();

    for (done, challenge_id) in order.iter().enumerate().take(11) {
        let challenge = session.challenge(challenge_id).cloned().unwrap();
        session.on_challenge_complete(&challenge);
        assert_eq!(session.lesson_progress().0, done + 1);
        assert_eq!(
            session.current_lesson().map(|lesson| lesson.challenge_id.as_str()),
            order.get(done + 1).map(String::as_str)
        );
    }

    let before = session.lessons().to_vec();
    let first = session.challenge(&order[0]).cloned().unwrap();
    session.on_challenge_complete(&first);
    assert_eq!(session.lessons(), before.as_slice());
    assert!(
        session
            .lessons()
            .iter()
            .take(11)
            .all(|lesson| lesson.status == UnitStatus::Complete)
    );
}

#[test]
fn fitness_chain_completes_end_to_end() {
    let mut session = session_with(bundled(), PlayerStats::default());
    for id in 1..=5 {
        assert_eq!(session.current_fitness_activity().map(|a| a.id), Some(id));
        session.on_fitness_activity_complete(id);
    }
    assert_eq!(session.fitness_progress(), (5, 5));
    assert!(session.current_fitness_activity().is_none());
}

#[test]
fn skill_gate_enforces_cost_dependencies_and_single_unlock() {
    let mut session = session_with(bundled(), PlayerStats::default());
    assert!(!session.on_unlock_skill("networker_1"));
    assert!(session.on_unlock_skill("root_social"));
    assert_eq!(session.stats().skill_points, 0);
    assert!(!session.on_unlock_skill("root_body"));
    assert!(!session.on_unlock_skill("root_social"));
    assert_eq!(session.unlocked_skills().len(), 1);
}

#[test]
fn story_fires_one_event_per_pass_in_declared_order() {
    let catalog = Catalog {
        story_events: vec![
            event("second_declared", xp_at_least(10), None),
            event("first_declared", xp_at_least(5), None),
        ],
        ..Catalog::empty()
    };
    let mut session = session_with(catalog, PlayerStats::default());
    session.on_activity_complete(StatDelta::xp(20));
    assert_eq!(session.active_story_event().unwrap().id, "second_declared");
    assert!(session.queued_story_events().is_empty());

    session.on_activity_complete(StatDelta::default());
    let queued: Vec<&str> = session
        .queued_story_events()
        .into_iter()
        .map(|event| event.id.as_str())
        .collect();
    assert_eq!(queued, ["first_declared"]);

    session.on_activity_complete(StatDelta::xp(500));
    assert_eq!(session.story().triggered_count(), 2);
    assert_eq!(session.queued_story_events().len(), 1);
}

#[test]
fn story_rewards_append_history_even_when_empty() {
    let catalog = Catalog {
        story_events: vec![
            event("hollow", xp_at_least(10), Some(StatDelta::default())),
            event("gift", xp_at_least(10), Some(StatDelta::xp(30))),
        ],
        ..Catalog::empty()
    };
    let mut session = session_with(catalog, PlayerStats::default());
    assert_eq!(session.history().len(), 1);
    session.on_activity_complete(StatDelta::xp(10));
    // intent, hollow's empty reward, gift's reward
    assert_eq!(session.history().len(), 4);
    assert_eq!(session.stats().xp, 40);
    assert!(session.story().is_exhausted());
}

#[test]
fn history_is_append_only() {
    let mut session = session_with(bundled(), PlayerStats::default());
    let mut previous = session.history().entries().to_vec();
    for reward in [StatDelta::xp(1), StatDelta::default(), StatDelta::xp(7)] {
        session.on_activity_complete(reward);
        let entries = session.history().entries();
        assert_eq!(entries.len(), previous.len() + 1);
        assert_eq!(&entries[..previous.len()], previous.as_slice());
        assert_eq!(entries.last().unwrap().stats, *session.stats());
        previous = entries.to_vec();
    }
}
