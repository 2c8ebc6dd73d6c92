//! Game session: wires progression, catalog, and presentation capabilities.
//!
//! The session is the boundary where recoverable failures become toasts:
//! persistence problems and bad import files are reported through the
//! `NotificationSink` and still returned to the caller as error results.

use crate::catalog::{Avatar, ContentBundle, ContentCatalog, MergeReport};
use crate::content;
use crate::error::{GameError, GameResult};
use crate::notify::{CelebrationEffect, NotificationSink};
use crate::persistence::KeyValueStore;
use crate::progression::{LevelUpEvent, PlayerState, ProgressionStore};

/// One live game: player progression plus the content catalog.
pub struct GameSession<S> {
    progression: ProgressionStore<S>,
    catalog: ContentCatalog,
    sink: Box<dyn NotificationSink>,
    celebration: Box<dyn CelebrationEffect>,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Load the saved player (or the default) and the built-in catalog.
    pub fn new(
        storage: S,
        sink: Box<dyn NotificationSink>,
        celebration: Box<dyn CelebrationEffect>,
    ) -> Self {
        Self {
            progression: ProgressionStore::load(storage),
            catalog: content::builtin_catalog(),
            sink,
            celebration,
        }
    }

    pub fn player(&self) -> &PlayerState {
        self.progression.state()
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// Display attributes of the currently equipped avatar, resolved from the
    /// catalog. `None` when the save references content this catalog never
    /// saw (e.g. an imported avatar on a fresh install).
    pub fn equipped_avatar(&self) -> Option<&Avatar> {
        self.catalog.avatar(&self.progression.state().equipped_avatar)
    }

    /// Award experience and announce each resulting level-up.
    pub fn award_experience(&mut self, amount: i64) -> GameResult<Vec<LevelUpEvent>> {
        let result = self.progression.award_experience(amount);
        let events = self.check_persisted(result)?;
        for event in &events {
            self.sink.notify(&format!(
                "Level Up! Now Lv {} · +{} coins",
                event.new_level, event.coins_awarded
            ));
            // Failure is intentionally discarded; see CelebrationEffect.
            let _ = self.celebration.fire(event);
        }
        Ok(events)
    }

    /// Record a quiz answer, awarding `xp_award` experience when correct.
    pub fn answer_question(&mut self, correct: bool, xp_award: i64) -> GameResult<Vec<LevelUpEvent>> {
        let recorded = self.progression.record_answer(correct);
        self.check_persisted(recorded)?;
        if correct {
            self.award_experience(xp_award)
        } else {
            Ok(Vec::new())
        }
    }

    pub fn equip_avatar(&mut self, avatar_id: &str) -> GameResult<()> {
        let result = self.progression.equip_avatar(avatar_id);
        self.check_persisted(result)
    }

    /// Buy an avatar at its catalog price.
    pub fn unlock_avatar(&mut self, avatar_id: &str) -> GameResult<bool> {
        let cost = self
            .catalog
            .avatar(avatar_id)
            .map(|a| a.cost)
            .ok_or_else(|| GameError::InvalidArgument(format!("unknown avatar: {avatar_id}")))?;
        let result = self.progression.unlock_avatar(avatar_id, cost);
        self.check_persisted(result)
    }

    /// Store a daily-spin outcome computed by the presentation layer.
    pub fn record_daily_spin(
        &mut self,
        timestamp_iso: String,
        new_streak: u32,
        coins_won: u64,
    ) -> GameResult<()> {
        let result = self
            .progression
            .record_daily_spin(timestamp_iso, new_streak, coins_won);
        self.check_persisted(result)
    }

    /// Import a content bundle from file text.
    ///
    /// Parse failures become toasts here, the boundary nearest the file read,
    /// and are also returned so the caller can see the import did not happen.
    pub fn import_bundle(&mut self, text: &str) -> GameResult<MergeReport> {
        let bundle = match ContentBundle::from_json(text) {
            Ok(bundle) => bundle,
            Err(e) => {
                match e {
                    GameError::Unreadable(_) => self.sink.notify("Error reading file"),
                    _ => self.sink.notify("Invalid file structure"),
                }
                return Err(e);
            }
        };

        let report = self.catalog.merge_bundle(bundle);
        log::info!(
            "Imported bundle: +{} avatars, +{} quiz sets, {} duplicates skipped",
            report.avatars_added,
            report.quiz_sets_added,
            report.skipped()
        );
        self.sink.notify("Imported content successfully");
        Ok(report)
    }

    /// The full catalog as pretty-printed bundle JSON for download.
    pub fn export_json(&self) -> GameResult<String> {
        self.catalog.export_bundle().to_json_pretty()
    }

    /// Toast a persistence failure at this boundary; the error still
    /// propagates so callers know the write did not stick.
    fn check_persisted<T>(&mut self, result: GameResult<T>) -> GameResult<T> {
        if let Err(GameError::Persistence(e)) = &result {
            log::warn!("Persist failed: {e}");
            self.sink.notify("Could not save your progress");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFAULT_AVATAR_ID, LEVEL_UP_COINS, STARTING_COINS};
    use crate::notify::NoCelebration;
    use crate::persistence::MemoryStore;
    use crate::progression::req_xp;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sink that records every toast for assertions.
    #[derive(Clone, Default)]
    struct RecordingSink {
        messages: Rc<RefCell<Vec<String>>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&mut self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    /// Store whose writes always fail (storage full / disabled).
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> GameResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> GameResult<()> {
            Err(GameError::Persistence("quota exceeded".to_string()))
        }
    }

    /// Effect that always fails, to prove failures stay contained.
    struct BrokenEffect;

    impl CelebrationEffect for BrokenEffect {
        fn fire(&mut self, _event: &LevelUpEvent) -> Result<(), String> {
            Err("no confetti library on this page".to_string())
        }
    }

    fn session_with_sink() -> (GameSession<MemoryStore>, RecordingSink) {
        let sink = RecordingSink::default();
        let session = GameSession::new(
            MemoryStore::new(),
            Box::new(sink.clone()),
            Box::new(NoCelebration),
        );
        (session, sink)
    }

    #[test]
    fn test_level_up_produces_one_toast_per_event() {
        let (mut session, sink) = session_with_sink();
        let amount = (req_xp(1) + req_xp(2) + 5) as i64;

        let events = session.award_experience(amount).unwrap();
        assert_eq!(events.len(), 2);

        let messages = sink.messages.borrow();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], format!("Level Up! Now Lv 2 · +{LEVEL_UP_COINS} coins"));
        assert_eq!(messages[1], format!("Level Up! Now Lv 3 · +{LEVEL_UP_COINS} coins"));
    }

    #[test]
    fn test_broken_celebration_does_not_affect_progression() {
        let sink = RecordingSink::default();
        let mut session = GameSession::new(
            MemoryStore::new(),
            Box::new(sink.clone()),
            Box::new(BrokenEffect),
        );

        let events = session.award_experience(req_xp(1) as i64).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(session.player().level, 2);
    }

    #[test]
    fn test_persistence_failure_is_toasted_and_returned() {
        let sink = RecordingSink::default();
        let mut session =
            GameSession::new(BrokenStore, Box::new(sink.clone()), Box::new(NoCelebration));

        let err = session.award_experience(10).unwrap_err();
        assert!(matches!(err, GameError::Persistence(_)));
        assert!(
            sink.messages
                .borrow()
                .iter()
                .any(|m| m == "Could not save your progress")
        );
    }

    #[test]
    fn test_answer_question_records_and_awards() {
        let (mut session, _sink) = session_with_sink();

        session.answer_question(true, 10).unwrap();
        session.answer_question(false, 10).unwrap();

        let player = session.player();
        assert_eq!(player.stats.total_answered, 2);
        assert_eq!(player.stats.total_correct, 1);
        assert_eq!(player.xp, 10);
    }

    #[test]
    fn test_equipped_avatar_resolves_display_attributes() {
        let (session, _sink) = session_with_sink();
        let avatar = session.equipped_avatar().unwrap();
        assert_eq!(avatar.id, DEFAULT_AVATAR_ID);
        assert_eq!(avatar.emoji, "🙂");
    }

    #[test]
    fn test_unlock_uses_catalog_price() {
        let (mut session, _sink) = session_with_sink();
        let cost = session.catalog().avatar("animal_3").unwrap().cost;
        assert!(cost > 0);

        assert!(session.unlock_avatar("animal_3").unwrap());
        assert_eq!(session.player().coins, STARTING_COINS - cost);

        let err = session.unlock_avatar("no_such_avatar").unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
    }

    #[test]
    fn test_import_bad_shape_toasts_invalid_structure() {
        let (mut session, sink) = session_with_sink();
        let before = session.catalog().avatars().len();

        let err = session.import_bundle(r#"{"avatars": []}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidFormat(_)));
        assert_eq!(session.catalog().avatars().len(), before);
        assert_eq!(sink.messages.borrow().last().unwrap(), "Invalid file structure");
    }

    #[test]
    fn test_import_garbage_toasts_read_error() {
        let (mut session, sink) = session_with_sink();

        let err = session.import_bundle("%%%").unwrap_err();
        assert!(matches!(err, GameError::Unreadable(_)));
        assert_eq!(sink.messages.borrow().last().unwrap(), "Error reading file");
    }

    #[test]
    fn test_import_then_reimport_is_noop() {
        let (mut session, _sink) = session_with_sink();
        let json = r#"{
            "avatars": [{"id": "import_1", "emoji": "🚀"}],
            "quizSets": [{"id": "import_q1", "questions": []}]
        }"#;

        let first = session.import_bundle(json).unwrap();
        assert_eq!(first.added(), 2);

        let second = session.import_bundle(json).unwrap();
        assert!(second.is_noop());
        assert_eq!(second.skipped(), 2);
    }

    #[test]
    fn test_export_import_round_trip() {
        let (mut session, _sink) = session_with_sink();
        let json = session.export_json().unwrap();

        let report = session.import_bundle(&json).unwrap();
        assert!(report.is_noop());
    }

    /// Storage handle shared between two sessions, standing in for the
    /// browser's LocalStorage surviving a page reload.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> GameResult<Option<String>> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
            self.0.borrow_mut().set(key, value)
        }
    }

    #[test]
    fn test_session_state_survives_reload() {
        let storage = SharedStore::default();

        let mut session = GameSession::new(
            storage.clone(),
            Box::new(RecordingSink::default()),
            Box::new(NoCelebration),
        );
        session.award_experience(130).unwrap();
        session.unlock_avatar("food_2").unwrap();
        session.equip_avatar("food_2").unwrap();
        let before = session.player().clone();
        drop(session);

        let reloaded = GameSession::new(
            storage,
            Box::new(RecordingSink::default()),
            Box::new(NoCelebration),
        );
        assert_eq!(*reloaded.player(), before);
        assert_eq!(reloaded.equipped_avatar().unwrap().id, "food_2");
    }
}
