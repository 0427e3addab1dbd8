//! End-to-end sessions over the bundled content.

use std::path::Path;

use rpg_content::{ContentCatalog, ContentFactory};
use rpg_core::{FixedRng, GameOutcome, Intent, QuestStatus};
use rpg_runtime::{
    Event, FileSaveRepository, OracleManager, Runtime, RuntimeError, SaveFormat, SessionEvent,
    Topic,
};

fn factory() -> ContentFactory {
    ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../game/content/data"))
}

/// Runtime on `scene` with rolls that never evade, miss or crit.
fn start(catalog: &ContentCatalog, scene: &str, repository: FileSaveRepository) -> Runtime {
    let spec = factory().load_scene(scene).unwrap();
    let new_game = catalog.new_game(&spec, 11).unwrap();

    Runtime::builder()
        .content(catalog)
        .unwrap()
        .oracles(OracleManager::from_catalog(catalog).with_rng(FixedRng::percent(99.0)))
        .initial_state(new_game.state)
        .intro(new_game.intro)
        .repository(repository)
        .build()
        .unwrap()
}

fn attack(target: &str) -> Intent {
    Intent::Attack {
        target: target.to_string(),
    }
}

#[test]
fn kane_duel_ends_in_victory() {
    let catalog = factory().load_catalog().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let repository = FileSaveRepository::new(dir.path(), SaveFormat::Binary).unwrap();
    let mut runtime = start(&catalog, "aethelgard", repository);
    let mut session = runtime.subscribe(Topic::Session);
    let mut progression = runtime.subscribe(Topic::Progression);

    assert!(runtime.snapshot().log[0].starts_with("Aethelgard stands silent"));

    runtime
        .submit(&Intent::Equip {
            item: "Aethelgard Plate".into(),
        })
        .unwrap();
    assert_eq!(
        runtime.snapshot().player.armor.as_deref(),
        Some("Aethelgard Plate")
    );

    for _ in 0..20 {
        runtime.submit(&attack("Kane")).unwrap();
        if runtime.outcome() != GameOutcome::InProgress {
            break;
        }
    }
    assert_eq!(runtime.outcome(), GameOutcome::Victory);

    let snapshot = runtime.snapshot();
    assert!(snapshot.entities.iter().all(|e| e.name != "Kane"));
    assert_eq!(snapshot.player.quests[0].status, QuestStatus::Completed);
    assert!(snapshot.player.level > 1);
    assert!(snapshot.player.health > 0);
    assert!(snapshot.log.iter().any(|line| line.starts_with("Victory!")));

    let mut game_over = false;
    while let Ok(event) = session.try_recv() {
        if let Event::Session(SessionEvent::GameOver { outcome }) = event {
            assert_eq!(outcome, GameOutcome::Victory);
            game_over = true;
        }
    }
    assert!(game_over);
    assert!(std::iter::from_fn(|| progression.try_recv().ok()).count() > 0);

    // Nothing resolves after the game ends.
    assert!(matches!(
        runtime.submit(&Intent::Wait),
        Err(RuntimeError::Execute(_))
    ));
}

#[test]
fn examine_is_free_and_wait_wakes_kane() {
    let catalog = factory().load_catalog().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let repository = FileSaveRepository::new(dir.path(), SaveFormat::Json).unwrap();
    let mut runtime = start(&catalog, "aethelgard", repository);

    let outcome = runtime
        .submit(&Intent::Examine {
            target: "ancient statue".into(),
        })
        .unwrap();
    assert!(!outcome.consumed_turn);
    assert_eq!(runtime.state().turn.tick.0, 0);
    assert!(
        runtime
            .log()
            .lines()
            .any(|line| line.contains("forgotten king"))
    );

    runtime.submit(&Intent::Wait).unwrap();
    assert_eq!(runtime.state().turn.tick.0, 1);
    assert!(
        runtime
            .log()
            .lines()
            .any(|line| line == "Kane starts chasing Aeron!")
    );
}

#[test]
fn save_and_load_restore_the_saved_turn() {
    let catalog = factory().load_catalog().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let repository = FileSaveRepository::new(dir.path(), SaveFormat::Binary).unwrap();
    let mut runtime = start(&catalog, "monolith_clearing", repository);

    runtime.submit(&Intent::Wait).unwrap();
    let handle = runtime.save("checkpoint").unwrap();
    assert_eq!(handle.scene, "Monolith Clearing");
    assert_eq!(handle.tick, 1);
    let saved = runtime.state().clone();

    runtime.submit(&Intent::Wait).unwrap();
    runtime.submit(&Intent::Wait).unwrap();
    assert_ne!(runtime.state(), &saved);

    runtime.load("checkpoint").unwrap();
    assert_eq!(runtime.state(), &saved);
    assert_eq!(runtime.list_saves().unwrap().len(), 1);
    assert!(dir.path().join("checkpoint.sav").exists());

    assert!(matches!(
        runtime.load("missing"),
        Err(RuntimeError::SlotNotFound(_))
    ));
    assert!(matches!(
        runtime.save("../escape"),
        Err(RuntimeError::Repository(_))
    ));
}

#[test]
fn talking_to_the_elder_advances_the_quest() {
    let catalog = factory().load_catalog().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let repository = FileSaveRepository::new(dir.path(), SaveFormat::Binary).unwrap();
    let mut runtime = start(&catalog, "monolith_clearing", repository);
    let mut dialogue = runtime.subscribe(Topic::Dialogue);

    runtime
        .submit(&Intent::Talk {
            target: "Elder".into(),
        })
        .unwrap();
    let view = runtime.snapshot().dialogue.expect("conversation is open");
    assert_eq!(view.speaker, "Elder");
    assert!(!view.options.is_empty());
    assert!(dialogue.try_recv().is_ok());

    let quest = runtime
        .snapshot()
        .player
        .quests
        .into_iter()
        .find(|q| q.title == "Voice of the Village")
        .unwrap();
    assert_eq!(quest.status, QuestStatus::Completed);

    let err = runtime.submit(&Intent::Choose { index: 99 }).unwrap_err();
    assert!(err.is_rejected_command());
    assert!(runtime.snapshot().dialogue.is_some());
}
