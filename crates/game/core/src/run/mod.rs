//! Run controller: rooms, battles and decision points.
//!
//! A [`Run`] owns the player for the whole game. [`Run::advance`] works
//! through a queue of steps until something the caller must see happens: a
//! battle finishes, the run ends, or a choice is needed. A choice leaves the
//! run paused on a [`Decision`] until [`Run::choose`] answers it. Nothing
//! blocks and nothing reads a clock.
//!
//! Room flow: enter (roll shop, roll boss) → shop → spawn → potions → fight
//! → per level gained: stat choice, skill roll → loot → stash each drop.

mod decision;
mod driver;
mod error;

pub use decision::{ChoiceKind, ChoiceOption, Decision};
pub use driver::{RunSummary, drive};
pub use error::RunError;

use std::collections::VecDeque;

use crate::combat::{Battle, BattleEnv, BattleError, BattleReport, BattleStatus};
use crate::config::GameConfig;
use crate::entity::{Enemy, EnemyKind, LoadoutError, Player, PlayerClass, PotionEffect};
use crate::env::{EnemyOracle, RngSource};
use crate::items::{InventoryError, Item, ItemIdGen, ShopStock};
use crate::progression::{
    Gates, gain_xp, level_up_options, roll_loot, room_enemies, skill_offer,
};
use crate::skills::acquire;
use crate::view::{Frame, FrameSink, LOG_TAIL};

const HISTORY_LIMIT: usize = 64;

/// Where the run stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunOutcome {
    #[default]
    InProgress,
    GameOver,
    Victory,
}

/// What one call to [`Run::advance`] stopped on.
#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    Awaiting(Decision),
    BattleFinished(BattleReport),
    GameOver,
    Victory,
}

#[derive(Clone, Debug)]
enum Step {
    EnterRoom,
    Shop(ShopStock),
    Prepare {
        boss: Option<EnemyKind>,
    },
    Potions {
        enemies: Vec<Enemy>,
        boss: Option<EnemyKind>,
    },
    Fight {
        enemies: Vec<Enemy>,
        boss: Option<EnemyKind>,
    },
    LevelUp,
    SkillRoll,
    Loot,
    Stash(Item),
    Victory,
}

#[derive(Clone, Debug)]
struct Pending {
    decision: Decision,
    /// The step that asked, consumed by the answer.
    step: Step,
}

/// One game from room 1 until death or the final boss.
pub struct Run<O, R> {
    config: GameConfig,
    oracle: O,
    rng: R,
    ids: ItemIdGen,
    player: Player,
    room: u32,
    gates: Gates,
    steps: VecDeque<Step>,
    pending: Option<Pending>,
    outcome: RunOutcome,
    history: VecDeque<String>,
    frame_every: u64,
}

impl<O: EnemyOracle, R: RngSource> Run<O, R> {
    pub fn new(config: GameConfig, class: PlayerClass, oracle: O, rng: R) -> Self {
        let config = config.sanitized();
        let mut ids = ItemIdGen::default();
        let player = Player::with_xp_curve(class, &mut ids, config.initial_xp_to_next);
        tracing::info!(%class, "run started");
        Self {
            config,
            oracle,
            rng,
            ids,
            player,
            room: 0,
            gates: Gates::default(),
            steps: VecDeque::new(),
            pending: None,
            outcome: RunOutcome::InProgress,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            frame_every: 1,
        }
    }

    /// Renders a battle frame every `ticks` ticks instead of every tick.
    pub fn with_frame_every(mut self, ticks: u64) -> Self {
        self.frame_every = ticks.max(1);
        self
    }

    // ===== accessors =====

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current room number; 0 before the first room.
    pub fn room(&self) -> u32 {
        self.room
    }

    pub fn gates(&self) -> &Gates {
        &self.gates
    }

    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    pub fn pending(&self) -> Option<&Decision> {
        self.pending.as_ref().map(|pending| &pending.decision)
    }

    /// Run-level log lines, oldest first.
    pub fn history(&self) -> &VecDeque<String> {
        &self.history
    }

    /// True when the next [`Run::advance`] would enter a new room.
    pub fn at_room_boundary(&self) -> bool {
        self.pending.is_none() && self.steps.is_empty()
    }

    /// Snapshot outside battle.
    pub fn frame(&self) -> Frame {
        Frame::from_player(&self.player, self.room, &self.gates, &self.history, LOG_TAIL)
    }

    // ===== driving =====

    /// Runs steps until a battle ends, the run ends or a choice is needed.
    ///
    /// With a decision pending this returns it again without doing anything.
    /// After the run is over it keeps returning the terminal progress.
    pub fn advance(&mut self, sink: &mut dyn FrameSink) -> Result<Progress, RunError> {
        match self.outcome {
            RunOutcome::GameOver => return Ok(Progress::GameOver),
            RunOutcome::Victory => return Ok(Progress::Victory),
            RunOutcome::InProgress => {}
        }
        if let Some(pending) = &self.pending {
            return Ok(Progress::Awaiting(pending.decision.clone()));
        }
        loop {
            let step = self.steps.pop_front().unwrap_or(Step::EnterRoom);
            if let Some(progress) = self.run_step(step, sink)? {
                return Ok(progress);
            }
        }
    }

    /// Answers the pending decision with option `index`.
    ///
    /// Any rejected answer, such as an out-of-range index, an unaffordable
    /// purchase or an emptied potion slot, leaves the decision pending.
    pub fn choose(&mut self, index: usize) -> Result<(), RunError> {
        if self.outcome != RunOutcome::InProgress {
            return Err(RunError::RunOver);
        }
        let pending = self.pending.as_ref().ok_or(RunError::NoPendingDecision)?;
        let option = pending
            .decision
            .option(index)
            .cloned()
            .ok_or(RunError::InvalidChoice {
                index,
                len: pending.decision.options.len(),
            })?;
        if let ChoiceOption::Buy { price, .. } = option {
            if price > self.player.gold {
                return Err(RunError::InsufficientGold {
                    price,
                    gold: self.player.gold,
                });
            }
        }

        let Some(Pending { decision, step }) = self.pending.take() else {
            return Err(RunError::NoPendingDecision);
        };
        tracing::debug!(kind = %decision.kind, %option, "decision answered");
        // A failed answer puts the decision back so its step still runs.
        if let Err(err) = self.resolve(step.clone(), option) {
            tracing::warn!(%err, kind = %decision.kind, "decision kept pending");
            self.pending = Some(Pending { decision, step });
            return Err(err);
        }
        Ok(())
    }

    // ===== steps =====

    fn run_step(
        &mut self,
        step: Step,
        sink: &mut dyn FrameSink,
    ) -> Result<Option<Progress>, RunError> {
        match step {
            Step::EnterRoom => {
                self.enter_room();
                Ok(None)
            }
            Step::Shop(stock) => {
                if stock.is_empty() {
                    return Ok(None);
                }
                let mut options: Vec<ChoiceOption> = stock
                    .offers()
                    .iter()
                    .enumerate()
                    .map(|(index, offer)| ChoiceOption::Buy {
                        index,
                        name: offer.item.name(),
                        price: offer.price,
                    })
                    .collect();
                options.push(ChoiceOption::Leave);
                let prompt = format!("A merchant! You have {} gold", self.player.gold);
                Ok(Some(self.pause(ChoiceKind::Shop, prompt, options, Step::Shop(stock))))
            }
            Step::Prepare { boss } => {
                let enemies = self.spawn_room(boss)?;
                self.steps.push_front(Step::Potions { enemies, boss });
                Ok(None)
            }
            Step::Potions { enemies, boss } => {
                if self.player.potions.is_empty() {
                    self.steps.push_front(Step::Fight { enemies, boss });
                    return Ok(None);
                }
                let mut options: Vec<ChoiceOption> = self
                    .player
                    .potions
                    .occupied()
                    .map(|(slot, potion)| ChoiceOption::Potion {
                        slot,
                        name: potion.name(),
                    })
                    .collect();
                options.push(ChoiceOption::Fight);
                let names: Vec<&str> = enemies.iter().map(|e| e.name.as_str()).collect();
                let prompt = format!("Ahead: {}. Drink a potion?", names.join(", "));
                Ok(Some(self.pause(
                    ChoiceKind::UsePotion,
                    prompt,
                    options,
                    Step::Potions { enemies, boss },
                )))
            }
            Step::Fight { enemies, boss } => {
                let report = self.fight(enemies, sink)?;
                self.after_battle(&report, boss);
                Ok(Some(Progress::BattleFinished(report)))
            }
            Step::LevelUp => {
                let options = level_up_options(
                    self.player.stats().luck,
                    GameConfig::LEVEL_UP_OPTIONS,
                    &mut self.rng,
                )
                .into_iter()
                .map(ChoiceOption::Stat)
                .collect();
                let prompt = format!("Level {}! Choose an upgrade", self.player.level);
                Ok(Some(self.pause(ChoiceKind::LevelUpStat, prompt, options, Step::LevelUp)))
            }
            Step::SkillRoll => {
                let Some(kinds) = skill_offer(&self.player, &self.config.skills, &mut self.rng)
                else {
                    return Ok(None);
                };
                let options = kinds.into_iter().map(ChoiceOption::Skill).collect();
                Ok(Some(self.pause(
                    ChoiceKind::LearnSkill,
                    "A new skill is within reach",
                    options,
                    Step::SkillRoll,
                )))
            }
            Step::Loot => {
                let loot = roll_loot(
                    &self.player,
                    self.room,
                    &self.config.loot,
                    &mut self.ids,
                    &mut self.rng,
                );
                if loot.gold > 0 {
                    self.player.gold += loot.gold;
                    self.note(format!("Found {} gold", loot.gold));
                }
                for item in loot.items.into_iter().rev() {
                    self.steps.push_front(Step::Stash(item));
                }
                Ok(None)
            }
            Step::Stash(item) => self.stash(item),
            Step::Victory => {
                self.outcome = RunOutcome::Victory;
                self.note("The Dread Lord is vanquished!");
                tracing::info!(room = self.room, level = self.player.level, "run won");
                Ok(Some(Progress::Victory))
            }
        }
    }

    fn enter_room(&mut self) {
        self.room += 1;
        tracing::info!(room = self.room, "entering room");
        self.note(format!("Room {}", self.room));

        if self
            .gates
            .roll_shop(self.room, &self.config.gates, &mut self.rng)
        {
            let stock = ShopStock::generate(
                self.room,
                self.player.stats().luck,
                &self.config.shop,
                self.config.loot.rooms_per_equipment_level,
                &mut self.ids,
                &mut self.rng,
            );
            self.steps.push_back(Step::Shop(stock));
        }
        let boss = self.gates.roll_boss(&mut self.rng);
        if let Some(kind) = boss {
            self.note(format!("A boss blocks the way: {kind}"));
        }
        self.steps.push_back(Step::Prepare { boss });
    }

    fn spawn_room(&mut self, boss: Option<EnemyKind>) -> Result<Vec<Enemy>, RunError> {
        let kinds = match boss {
            Some(kind) => vec![kind],
            None => room_enemies(self.room, &self.config.gates, &mut self.rng),
        };
        kinds
            .into_iter()
            .enumerate()
            .map(|(x, kind)| {
                let template = self
                    .oracle
                    .template(kind)
                    .ok_or(RunError::MissingTemplate(kind))?;
                Ok(Enemy::spawn(kind, &template, self.room, x as i32))
            })
            .collect()
    }

    fn fight(
        &mut self,
        enemies: Vec<Enemy>,
        sink: &mut dyn FrameSink,
    ) -> Result<BattleReport, RunError> {
        let Self {
            config,
            oracle,
            rng,
            player,
            room,
            gates,
            frame_every,
            ..
        } = self;
        let config = &*config;
        let room = *room;
        let frame_every = *frame_every;

        let mut battle = Battle::new(
            player,
            enemies,
            BattleEnv {
                config,
                oracle: &*oracle,
                rng,
                room,
            },
        );
        sink.render(&Frame::from_battle(&battle, room, gates, LOG_TAIL));
        while battle.status() == BattleStatus::Running {
            if battle.ticks() >= config.max_battle_ticks {
                return Err(BattleError::TickLimit {
                    ticks: battle.ticks(),
                }
                .into());
            }
            let status = battle.tick();
            if status.is_over() || battle.ticks() % frame_every == 0 {
                sink.render(&Frame::from_battle(&battle, room, gates, LOG_TAIL));
            }
        }
        Ok(battle.finish())
    }

    fn after_battle(&mut self, report: &BattleReport, boss: Option<EnemyKind>) {
        self.note(format!(
            "Room {}: {} after {:.1}s",
            self.room, report.status, report.duration
        ));
        if report.status == BattleStatus::Lost {
            self.outcome = RunOutcome::GameOver;
            tracing::info!(room = self.room, level = self.player.level, "run lost");
            return;
        }

        let multiplier = if boss.is_some() {
            self.config.boss_xp_multiplier
        } else {
            1.0
        };
        let levels = gain_xp(
            &mut self.player,
            report.xp,
            multiplier,
            self.config.xp_growth,
        );

        let mut follow = Vec::new();
        for _ in 0..levels {
            follow.push(Step::LevelUp);
            follow.push(Step::SkillRoll);
        }
        follow.push(Step::Loot);
        if let Some(kind) = boss {
            if self.gates.boss_defeated(kind) {
                follow.push(Step::Victory);
            }
        }
        for step in follow.into_iter().rev() {
            self.steps.push_front(step);
        }
    }

    fn stash(&mut self, item: Item) -> Result<Option<Progress>, RunError> {
        let name = item.name();
        let rejected = match item {
            Item::Potion(potion) => match self.player.potions.insert(potion) {
                Ok(_) => None,
                Err(InventoryError::Full { item, .. }) => Some(Item::Potion(item)),
                Err(err) => return Err(err.into()),
            },
            Item::Equipment(equipment) => match self.player.equip(equipment) {
                Ok(_) => None,
                Err(LoadoutError::Slots(InventoryError::Full { item, .. })) => {
                    Some(Item::Equipment(item))
                }
                Err(err) => return Err(err.into()),
            },
        };
        let Some(item) = rejected else {
            self.note(format!("Picked up {name}"));
            return Ok(None);
        };

        let mut options: Vec<ChoiceOption> = match &item {
            Item::Potion(_) => self
                .player
                .potions
                .occupied()
                .map(|(slot, held)| ChoiceOption::Replace {
                    slot,
                    name: held.name(),
                })
                .collect(),
            Item::Equipment(_) => self
                .player
                .equipment()
                .occupied()
                .map(|(slot, held)| ChoiceOption::Replace {
                    slot,
                    name: held.name(),
                })
                .collect(),
        };
        options.push(ChoiceOption::Discard);
        let prompt = format!("No room for {name}");
        Ok(Some(self.pause(
            ChoiceKind::InventoryFull,
            prompt,
            options,
            Step::Stash(item),
        )))
    }

    fn pause(
        &mut self,
        kind: ChoiceKind,
        prompt: impl Into<String>,
        options: Vec<ChoiceOption>,
        step: Step,
    ) -> Progress {
        let decision = Decision::new(kind, prompt, options);
        tracing::debug!(%kind, options = decision.options.len(), "awaiting decision");
        self.pending = Some(Pending {
            decision: decision.clone(),
            step,
        });
        Progress::Awaiting(decision)
    }

    fn resolve(&mut self, step: Step, option: ChoiceOption) -> Result<(), RunError> {
        match (step, option) {
            (Step::LevelUp, ChoiceOption::Stat(stat)) => {
                self.player.upgrade_base(stat);
                self.note(format!("{stat} upgraded"));
            }
            (Step::SkillRoll, ChoiceOption::Skill(kind)) => {
                acquire(&mut self.player, kind);
                self.note(format!("Learned {kind}"));
            }
            (Step::Potions { enemies, boss }, ChoiceOption::Potion { slot, .. }) => {
                let line = match self.player.drink(slot)? {
                    PotionEffect::Healed(amount) => format!("Healed {amount:.0} HP"),
                    PotionEffect::Boosted(stat, boost) => {
                        format!("{stat} {boost} for the next battle")
                    }
                };
                self.note(line);
                self.steps.push_front(Step::Potions { enemies, boss });
            }
            (Step::Potions { enemies, boss }, ChoiceOption::Fight) => {
                self.steps.push_front(Step::Fight { enemies, boss });
            }
            (Step::Shop(mut stock), ChoiceOption::Buy { index, price, .. }) => {
                if let Some(offer) = stock.take(index) {
                    self.player.gold -= price;
                    self.note(format!("Bought {} for {price} gold", offer.item.name()));
                    self.steps.push_front(Step::Shop(stock));
                    self.steps.push_front(Step::Stash(offer.item));
                }
            }
            (Step::Shop(_), ChoiceOption::Leave) => {}
            (Step::Stash(Item::Potion(potion)), ChoiceOption::Replace { slot, name }) => {
                self.player.potions.replace(slot, potion)?;
                self.note(format!("Dropped {name}"));
            }
            (Step::Stash(Item::Equipment(item)), ChoiceOption::Replace { slot, name }) => {
                self.player.replace_equipment(slot, item)?;
                self.note(format!("Dropped {name}"));
            }
            (Step::Stash(item), ChoiceOption::Discard) => {
                self.note(format!("Left {} behind", item.name()));
            }
            (step, option) => {
                tracing::error!(?step, %option, "option does not answer this step");
            }
        }
        Ok(())
    }

    fn note(&mut self, line: impl Into<String>) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(line.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EnemyTemplate, Scaling};
    use crate::env::{BuiltinEnemies, PcgRng};
    use crate::items::Potion;
    use crate::view::NullSink;

    struct Overwhelming;

    impl EnemyOracle for Overwhelming {
        fn template(&self, _kind: EnemyKind) -> Option<EnemyTemplate> {
            Some(EnemyTemplate {
                hp: Scaling::fixed(1000.0),
                attack: Scaling::fixed(1000.0),
                attack_speed: Scaling::fixed(5.0),
                ..EnemyTemplate::default()
            })
        }
    }

    struct Empty;

    impl EnemyOracle for Empty {
        fn template(&self, _kind: EnemyKind) -> Option<EnemyTemplate> {
            None
        }
    }

    fn run<O: EnemyOracle>(config: GameConfig, oracle: O) -> Run<O, PcgRng> {
        Run::new(config, PlayerClass::Fighter, oracle, PcgRng::seeded(7))
    }

    #[test]
    fn history_keeps_the_newest_lines() {
        let mut run = run(GameConfig::default(), BuiltinEnemies);
        for i in 0..HISTORY_LIMIT + 10 {
            run.note(format!("line {i}"));
        }
        assert_eq!(run.history().len(), HISTORY_LIMIT);
        assert_eq!(run.history().front().map(String::as_str), Some("line 10"));
        let last = format!("line {}", HISTORY_LIMIT + 9);
        assert_eq!(run.history().back(), Some(&last));
        assert_eq!(run.frame().log.last(), Some(&last));
        assert_eq!(run.frame().log.len(), LOG_TAIL);
    }

    #[test]
    fn fresh_run_sits_at_boundary() {
        let mut run = run(GameConfig::default(), BuiltinEnemies);
        assert!(run.at_room_boundary());
        assert_eq!(run.room(), 0);
        assert_eq!(run.choose(0), Err(RunError::NoPendingDecision));
    }

    #[test]
    fn potion_decision_survives_bad_index() {
        let mut run = run(GameConfig::default(), BuiltinEnemies);
        run.player_mut()
            .potions
            .insert(Potion::Healing { percent: 0.3 })
            .unwrap();

        let Progress::Awaiting(decision) = run.advance(&mut NullSink).unwrap() else {
            panic!("expected the potion prompt");
        };
        assert_eq!(decision.kind, ChoiceKind::UsePotion);
        assert_eq!(decision.options.len(), 2);
        assert_eq!(
            run.choose(5),
            Err(RunError::InvalidChoice { index: 5, len: 2 })
        );
        assert_eq!(run.pending(), Some(&decision));
        assert_eq!(
            run.advance(&mut NullSink).unwrap(),
            Progress::Awaiting(decision)
        );

        run.choose(0).unwrap();
        assert!(run.player().potions.is_empty());
        assert!(matches!(
            run.advance(&mut NullSink).unwrap(),
            Progress::BattleFinished(_)
        ));
    }

    #[test]
    fn shop_checks_gold() {
        let mut config = GameConfig::default();
        config.gates.shop_after_room = 0;
        config.gates.shop_increment = 1.0;
        let mut run = run(config, BuiltinEnemies);

        let Progress::Awaiting(decision) = run.advance(&mut NullSink).unwrap() else {
            panic!("expected the shop");
        };
        assert_eq!(decision.kind, ChoiceKind::Shop);
        assert_eq!(decision.options.len(), 4);
        assert!(matches!(
            run.choose(0),
            Err(RunError::InsufficientGold { price: 15, gold: 0 })
        ));

        run.player_mut().gold = 100;
        run.choose(0).unwrap();
        assert_eq!(run.player().gold, 85);
        let Progress::Awaiting(decision) = run.advance(&mut NullSink).unwrap() else {
            panic!("expected the shop again");
        };
        assert_eq!(decision.kind, ChoiceKind::Shop);
        assert_eq!(decision.options.len(), 3);
        assert_eq!(run.player().potions.count(), 1);
    }

    #[test]
    fn death_ends_run() {
        let mut run = run(GameConfig::default(), Overwhelming);
        let Progress::BattleFinished(report) = run.advance(&mut NullSink).unwrap() else {
            panic!("expected a battle");
        };
        assert_eq!(report.status, BattleStatus::Lost);
        assert_eq!(run.outcome(), RunOutcome::GameOver);
        assert_eq!(run.advance(&mut NullSink).unwrap(), Progress::GameOver);
        assert_eq!(run.choose(0), Err(RunError::RunOver));
    }

    #[test]
    fn missing_template_is_reported() {
        let mut run = run(GameConfig::default(), Empty);
        assert!(matches!(
            run.advance(&mut NullSink),
            Err(RunError::MissingTemplate(_))
        ));
    }
}
