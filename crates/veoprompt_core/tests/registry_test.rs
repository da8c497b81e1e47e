use veoprompt_core::{
    Character, CharacterRegistry, CharacterType, RealismConcern, RejectReason, Verdict,
};

fn character(name: &str, description: &str) -> Character {
    Character::builder()
        .name(name)
        .physical_description(description)
        .build()
        .unwrap()
}

#[test]
fn register_keeps_first_spelling_and_history() {
    let mut registry = CharacterRegistry::default();
    assert!(registry.register(character("Bigfoot", "tall, brown fur")).is_none());

    let previous = registry.register(character("BIGFOOT", "tall, grey fur"));
    assert_eq!(
        previous.map(|c| c.physical_description().clone()),
        Some("tall, brown fur".to_string())
    );

    let entry = registry.entry("bigfoot").unwrap();
    assert_eq!(entry.current().name(), "Bigfoot");
    assert_eq!(entry.current().physical_description(), "tall, grey fur");
    assert_eq!(entry.superseded().len(), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn refine_does_not_add_history() {
    let mut registry = CharacterRegistry::default();
    registry.register(character("Yeti", "white fur"));
    let noted = registry.get("yeti").unwrap().clone().note("carries a thermos");
    assert!(registry.refine(noted));
    assert!(registry.entry("Yeti").unwrap().superseded().is_empty());
    assert_eq!(
        registry.get("Yeti").unwrap().consistency_notes(),
        &vec!["carries a thermos".to_string()]
    );
    assert!(!registry.refine(character("Nessie", "long neck")));
}

#[test]
fn builder_rejects_blank_description() {
    let result = Character::builder()
        .name("Bigfoot")
        .physical_description("   ")
        .build();
    assert!(result.is_err());
}

#[test]
fn archetype_comes_from_description_words() {
    assert_eq!(CharacterType::infer("a pufferfish, spiny when inflated"), CharacterType::Balloonfish);
    assert_eq!(CharacterType::infer("Yeti-like white coat"), CharacterType::Yeti);
    assert_eq!(CharacterType::infer("towering, shaggy brown fur"), CharacterType::Custom);
}

#[test]
fn verdict_union_dedupes_reasons() {
    let local = Verdict::Reject(vec![RejectReason::new(
        RealismConcern::CartoonishQuality,
        "Googly eyes",
    )]);
    let remote = Verdict::Reject(vec![
        RejectReason::new(RealismConcern::CartoonishQuality, "googly eyes"),
        RejectReason::new(RealismConcern::TheatricalDelivery, "bows to the camera"),
    ]);
    match local.union(remote) {
        Verdict::Reject(reasons) => assert_eq!(reasons.len(), 2),
        Verdict::Accept => panic!("expected reject"),
    }
    assert!(Verdict::Accept.union(Verdict::Accept).is_accept());
}
