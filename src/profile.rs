//! Player profile
//!
//! Coins, owned submarine skins, achievements and best times. Persisted as a
//! single JSON blob; a missing or corrupt blob yields a fresh profile.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{KeyValueStore, StoreError, load_or_default, save_json};
use crate::sim::{GamePhase, GameState, SubmarineSkin, coins_for_score};
use crate::tuning::Tuning;

/// Refused profile operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },
    #[error("Skin {0:?} is already owned")]
    AlreadyOwned(SubmarineSkin),
    #[error("Skin {0:?} is not owned")]
    NotOwned(SubmarineSkin),
}

/// Milestones unlocked by play
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    /// Complete any level
    FirstDive,
    /// Complete a level in under 15 seconds
    SpeedDemon,
    /// Collect 3 power-ups in one level
    Collector,
    /// Complete level 10
    DeepDiver,
    /// Own every skin
    Fashionista,
}

impl Achievement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::FirstDive => "First Dive",
            Achievement::SpeedDemon => "Speed Demon",
            Achievement::Collector => "Collector",
            Achievement::DeepDiver => "Deep Diver",
            Achievement::Fashionista => "Fashionista",
        }
    }
}

/// Summary of a finished level, as the profile sees it
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub level: u32,
    pub completed: bool,
    pub score: u64,
    /// Seconds spent on the level
    pub time_taken: f32,
    pub pickups_collected: u32,
    /// Coins picked up during the level
    pub coins_collected: u64,
}

impl RunOutcome {
    /// Summarize a finished game state. Returns None while the level is still running.
    pub fn from_state(state: &GameState) -> Option<Self> {
        if !state.phase.is_finished() {
            return None;
        }
        Some(Self {
            level: state.level.number,
            completed: state.phase == GamePhase::LevelCompleted,
            score: state.score,
            time_taken: state.time_taken(),
            pickups_collected: state.pickups_collected,
            coins_collected: state.coins_collected,
        })
    }
}

/// What a run earned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRewards {
    pub coins_earned: u64,
    pub new_best_time: bool,
    pub new_achievements: Vec<Achievement>,
}

/// Persistent player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub coins: u64,
    pub owned_skins: BTreeSet<SubmarineSkin>,
    pub selected_skin: SubmarineSkin,
    pub achievements: BTreeSet<Achievement>,
    /// Best completion time (seconds) by level number
    pub best_times: BTreeMap<u32, f32>,
    /// Highest level completed
    pub highest_level: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            coins: 0,
            owned_skins: BTreeSet::from([SubmarineSkin::Classic]),
            selected_skin: SubmarineSkin::Classic,
            achievements: BTreeSet::new(),
            best_times: BTreeMap::new(),
            highest_level: 0,
        }
    }
}

impl UserProfile {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "current_dive_profile";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load the profile, falling back to a fresh one
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut profile: Self = load_or_default(store, Self::STORAGE_KEY);
        // The free skin is always owned, and the selection must be owned
        profile.owned_skins.insert(SubmarineSkin::Classic);
        if !profile.owned_skins.contains(&profile.selected_skin) {
            profile.selected_skin = SubmarineSkin::Classic;
        }
        profile
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)
    }

    pub fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Spend coins; the balance is untouched if there are not enough
    pub fn spend_coins(&mut self, amount: u64) -> Result<(), ProfileError> {
        if amount > self.coins {
            return Err(ProfileError::InsufficientCoins {
                needed: amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        Ok(())
    }

    pub fn owns_skin(&self, skin: SubmarineSkin) -> bool {
        self.owned_skins.contains(&skin)
    }

    /// Buy a skin with coins
    pub fn purchase_skin(&mut self, skin: SubmarineSkin) -> Result<(), ProfileError> {
        if self.owns_skin(skin) {
            return Err(ProfileError::AlreadyOwned(skin));
        }
        self.spend_coins(skin.price())?;
        self.owned_skins.insert(skin);
        log::info!("Purchased {} skin", skin.as_str());

        if SubmarineSkin::ALL.iter().all(|s| self.owned_skins.contains(s)) {
            self.unlock_achievement(Achievement::Fashionista);
        }
        Ok(())
    }

    pub fn select_skin(&mut self, skin: SubmarineSkin) -> Result<(), ProfileError> {
        if !self.owns_skin(skin) {
            return Err(ProfileError::NotOwned(skin));
        }
        self.selected_skin = skin;
        Ok(())
    }

    /// Returns true if the achievement was newly unlocked
    pub fn unlock_achievement(&mut self, achievement: Achievement) -> bool {
        let new = self.achievements.insert(achievement);
        if new {
            log::info!("Achievement unlocked: {}", achievement.as_str());
        }
        new
    }

    pub fn best_time(&self, level: u32) -> Option<f32> {
        self.best_times.get(&level).copied()
    }

    /// Keep the lowest completion time per level. Returns true if it improved.
    pub fn record_time(&mut self, level: u32, seconds: f32) -> bool {
        if !seconds.is_finite() || seconds < 0.0 {
            return false;
        }
        match self.best_times.get(&level) {
            Some(&best) if best <= seconds => false,
            _ => {
                self.best_times.insert(level, seconds);
                true
            }
        }
    }

    /// Apply a finished level to the profile
    pub fn record_run(&mut self, outcome: &RunOutcome, tuning: &Tuning) -> RunRewards {
        let mut rewards = RunRewards::default();
        if !outcome.completed {
            return rewards;
        }

        rewards.coins_earned = coins_for_score(outcome.score, tuning)
            .saturating_add(outcome.coins_collected);
        self.add_coins(rewards.coins_earned);
        rewards.new_best_time = self.record_time(outcome.level, outcome.time_taken);
        self.highest_level = self.highest_level.max(outcome.level);

        let mut earned = vec![Achievement::FirstDive];
        if outcome.time_taken < 15.0 {
            earned.push(Achievement::SpeedDemon);
        }
        if outcome.pickups_collected >= 3 {
            earned.push(Achievement::Collector);
        }
        if outcome.level >= 10 {
            earned.push(Achievement::DeepDiver);
        }
        for achievement in earned {
            if self.unlock_achievement(achievement) {
                rewards.new_achievements.push(achievement);
            }
        }

        rewards
    }
}
