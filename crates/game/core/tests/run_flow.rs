use descent_core::view::FrameSink;
use descent_core::{
    BuiltinEnemies, ChoiceKind, ChoiceOption, Frame, GameConfig, InventoryError, PcgRng,
    PlayerClass, Potion, Progress, RecordingSink, Run, RunError, RunOutcome, ScriptedChooser,
    StatKind, drive,
};

/// Fails the test on any frame that breaks an hp or stat bound.
struct InvariantSink {
    frames: usize,
}

impl FrameSink for InvariantSink {
    fn render(&mut self, frame: &Frame) {
        self.frames += 1;
        let player = &frame.player;
        assert!(player.hp <= player.stats.max_hp, "{player:?}");
        assert!(player.stats.within_bounds(), "{:?}", player.stats);
        assert!(player.stats.attack >= 1.0);
        assert!((0.0..=0.7).contains(&player.stats.dodge_chance));
        for enemy in &frame.enemies {
            assert!(enemy.hp <= enemy.max_hp, "{enemy:?}");
        }
        assert!(frame.overlays.iter().all(|o| o.row <= frame.enemies.len()));
    }
}

fn new_run(seed: u64) -> Run<BuiltinEnemies, PcgRng> {
    Run::new(
        GameConfig::default(),
        PlayerClass::Fighter,
        BuiltinEnemies,
        PcgRng::seeded(seed),
    )
}

#[test]
fn driven_runs_hold_invariants() {
    for seed in 0..6 {
        let mut run = new_run(seed);
        let mut sink = InvariantSink { frames: 0 };
        let summary = drive(&mut run, &mut ScriptedChooser::first(), &mut sink, 8).unwrap();
        assert!(summary.battles >= 1);
        assert!(sink.frames > 0);
        match summary.outcome {
            RunOutcome::GameOver => assert!(!run.player().is_alive()),
            RunOutcome::InProgress => assert_eq!(summary.rooms, 8),
            RunOutcome::Victory => panic!("no boss can appear by room 8"),
        }
    }
}

#[test]
fn same_seed_same_run() {
    let play = || {
        let mut run = new_run(99);
        let summary = drive(
            &mut run,
            &mut ScriptedChooser::new([1, 0, 2, 1]),
            &mut descent_core::NullSink,
            6,
        )
        .unwrap();
        let history: Vec<String> = run.history().iter().cloned().collect();
        (summary, history, run.player().stats().clone())
    };
    assert_eq!(play(), play());
}

#[test]
fn level_up_waits_for_a_choice() {
    let mut config = GameConfig::default();
    config.initial_xp_to_next = 1;
    let mut run = Run::new(
        config,
        PlayerClass::Guardian,
        BuiltinEnemies,
        PcgRng::seeded(4),
    );
    let mut sink = RecordingSink::default();

    let Progress::BattleFinished(report) = run.advance(&mut sink).unwrap() else {
        panic!("room 1 starts with a fight");
    };
    assert!(report.status.is_over());
    assert!(!sink.frames.is_empty());
    assert_eq!(sink.frames[0].room, 1);
    if run.outcome() == RunOutcome::GameOver {
        return;
    }

    let Progress::Awaiting(decision) = run.advance(&mut sink).unwrap() else {
        panic!("xp should have levelled the player");
    };
    assert_eq!(decision.kind, ChoiceKind::LevelUpStat);
    assert_eq!(decision.options.len(), 3);
    let level = run.player().level;
    assert!(level >= 2);
    run.choose(0).unwrap();
    assert_eq!(run.player().level, level);
}

#[test]
fn failed_potion_answer_keeps_the_fight() {
    let mut run = new_run(2);
    run.player_mut()
        .potions
        .insert(Potion::Stat(StatKind::Attack))
        .unwrap();
    let mut sink = RecordingSink::default();

    let Progress::Awaiting(decision) = run.advance(&mut sink).unwrap() else {
        panic!("a held potion should pause before the fight");
    };
    assert_eq!(decision.kind, ChoiceKind::UsePotion);
    assert_eq!(
        decision.options.last(),
        Some(&ChoiceOption::Fight),
        "{decision:?}"
    );

    // The slot empties between the offer and the answer.
    run.player_mut().potions.take(0).unwrap();
    assert_eq!(
        run.choose(0),
        Err(RunError::Potions(InventoryError::EmptySlot(0)))
    );
    assert_eq!(run.pending(), Some(&decision));
    assert!(!run.at_room_boundary());

    let fight = decision.options.len() - 1;
    run.choose(fight).unwrap();
    let Progress::BattleFinished(report) = run.advance(&mut sink).unwrap() else {
        panic!("room 1 still fights");
    };
    assert!(report.status.is_over());
    assert_eq!(run.room(), 1);
}
