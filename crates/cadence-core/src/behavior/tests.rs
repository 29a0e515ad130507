use super::*;

fn synthesizer(seed: u64) -> BehaviorSynthesizer {
    BehaviorSynthesizer::new(BehaviorProfile::default(), JitterSampler::seeded(seed))
}

#[test]
fn test_typing_emits_one_keystroke_per_char_in_order() {
    let mut synth = synthesizer(1);
    let profile = synth.profile().clone();

    let steps: Vec<TimedAction> = synth.typing("ab").collect();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].interaction, Interaction::Keystroke { key: 'a' });
    assert_eq!(steps[1].interaction, Interaction::Keystroke { key: 'b' });
    for step in &steps {
        assert!(profile.keystroke_delay.contains(step.delay_ms));
    }
}

#[test]
fn test_typing_handles_multibyte_text() {
    let mut synth = synthesizer(2);
    let text = "héllo 👋";

    let steps: Vec<TimedAction> = synth.typing(text).collect();
    assert_eq!(steps.len(), text.chars().count());
    let typed: String = ActionPlan::from_iter(steps).typed_text();
    assert_eq!(typed, text);
}

#[test]
fn test_typing_empty_text() {
    let mut synth = synthesizer(3);
    assert_eq!(synth.typing("").count(), 0);
}

#[test]
fn test_pointer_noise_count_and_bounds() {
    let mut synth = synthesizer(4);
    let profile = synth.profile().clone();
    let viewport = Viewport::new(800, 600);

    for _ in 0..200 {
        let moves: Vec<TimedAction> = synth.pointer_noise(viewport).collect();
        assert!(profile.pointer_move_count.contains(moves.len() as u32));
        for step in moves {
            match step.interaction {
                Interaction::PointerMove { x, y } => assert!(viewport.contains(x, y)),
                other => panic!("unexpected interaction: {other:?}"),
            }
            assert!(profile.pointer_move_delay.contains(step.delay_ms));
        }
    }
}

#[test]
fn test_pointer_noise_zero_viewport_is_empty() {
    let mut synth = synthesizer(5);
    assert_eq!(synth.pointer_noise(Viewport::new(0, 600)).count(), 0);
    assert_eq!(synth.pointer_noise(Viewport::new(800, 0)).count(), 0);
}

#[test]
fn test_pointer_noise_tiny_viewport() {
    let mut synth = synthesizer(6);
    for step in synth.pointer_noise(Viewport::new(1, 1)) {
        assert_eq!(step.interaction, Interaction::PointerMove { x: 0, y: 0 });
    }
}

#[test]
fn test_scroll_within_profile() {
    let mut synth = synthesizer(7);
    let profile = synth.profile().clone();

    for _ in 0..100 {
        let step = synth.scroll();
        match step.interaction {
            Interaction::Scroll { offset } => {
                assert!(offset >= profile.scroll_offset.min_px);
                assert!(offset <= profile.scroll_offset.max_px);
            }
            other => panic!("unexpected interaction: {other:?}"),
        }
        assert!(profile.scroll_delay.contains(step.delay_ms));
    }
}

#[test]
fn test_reinvocation_draws_fresh_randomness() {
    let mut synth = synthesizer(8);
    let text = "the same comment, typed twice";

    let first: Vec<u64> = synth.typing(text).map(|s| s.delay_ms).collect();
    let second: Vec<u64> = synth.typing(text).map(|s| s.delay_ms).collect();
    assert_ne!(first, second);
}

#[test]
fn test_same_seed_same_plan() {
    let viewport = Viewport::default();
    let a = synthesizer(42).plan("hello", viewport);
    let b = synthesizer(42).plan("hello", viewport);
    assert_eq!(a, b);
}

#[test]
fn test_plan_order() {
    let mut synth = synthesizer(9);
    let plan = synth.plan("hi", Viewport::default());

    let scroll_index = plan
        .steps
        .iter()
        .position(|s| matches!(s.interaction, Interaction::Scroll { .. }))
        .unwrap();
    assert!(plan.steps[..scroll_index]
        .iter()
        .all(|s| matches!(s.interaction, Interaction::PointerMove { .. })));
    assert_eq!(plan.steps.len(), scroll_index + 3);
    assert_eq!(plan.typed_text(), "hi");
    assert_eq!(
        plan.total_delay_ms(),
        plan.steps.iter().map(|s| s.delay_ms).sum::<u64>()
    );
}

#[test]
fn test_timed_action_serialization() {
    let step = TimedAction::new(120, Interaction::Keystroke { key: 'x' });
    let json = serde_json::to_value(step).unwrap();
    assert_eq!(json["delay_ms"], 120);
    assert_eq!(json["kind"], "keystroke");
    assert_eq!(json["key"], "x");

    let back: TimedAction = serde_json::from_value(json).unwrap();
    assert_eq!(back, step);
}

#[test]
fn test_profile_defaults_from_partial_config() {
    let profile: BehaviorProfile =
        serde_json::from_str(r#"{"keystroke_delay": {"min_ms": 10, "max_ms": 20}}"#).unwrap();
    assert_eq!(profile.keystroke_delay, DelayRange::new(10, 20));
    assert_eq!(profile.pointer_move_count, CountRange::new(3, 7));
    assert!(profile.validate().is_ok());
}

#[test]
fn test_profile_validation_rejects_inverted_range() {
    let profile = BehaviorProfile {
        scroll_delay: DelayRange::new(500, 100),
        ..Default::default()
    };
    let err = profile.validate().unwrap_err();
    assert!(err.contains("scroll_delay"));
}
