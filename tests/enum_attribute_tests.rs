use enumify::{
    Attributes, EnumError, EnumOptions, MemoryStore, ModelType, RawValue, Record, Token,
};
use std::sync::{Arc, Mutex};

fn subscription_model() -> ModelType {
    let mut model = ModelType::new("models");
    model
        .enum_attribute(
            "status",
            ["available", "canceled", "completed"],
            EnumOptions::new(),
        )
        .unwrap();
    model
}

fn locale_model() -> ModelType {
    let mut model = ModelType::new("locales");
    model
        .enum_attribute(
            "locale",
            ["en", "es", "fr"],
            EnumOptions::new().method_prefix("loc"),
        )
        .unwrap();
    model
}

fn store_for(model: &ModelType) -> MemoryStore {
    let store = MemoryStore::new();
    store.create_table(model.table_name()).unwrap();
    store
}

fn status_attrs(value: &str) -> Attributes {
    Attributes::from([("status".to_string(), Some(value.to_string()))])
}

#[test]
fn getter_returns_normalized_token() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();

    assert_eq!(model.get(&record, "status").unwrap().unwrap(), "available");

    // String input normalizes the same as token input.
    model.set(&mut record, "status", "canceled").unwrap();
    assert_eq!(model.get(&record, "status").unwrap().unwrap(), "canceled");

    model
        .set(&mut record, "status", Token::new("completed"))
        .unwrap();
    assert_eq!(model.get(&record, "status").unwrap().unwrap(), "completed");
}

#[test]
fn getter_treats_null_and_empty_raw_as_unset() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.build(&model);

    assert_eq!(model.get(&record, "status").unwrap(), None);

    record.write_raw("status", RawValue::new(""));
    assert_eq!(model.get(&record, "status").unwrap(), None);
}

#[test]
fn predicates_reflect_current_value() {
    let model = subscription_model();
    let store = store_for(&model);
    let record = store.create(&model, status_attrs("available")).unwrap();

    assert!(model.predicate(&record, "available").unwrap());
    assert!(!model.predicate(&record, "canceled").unwrap());
    assert!(!model.predicate(&record, "completed").unwrap());
}

#[test]
fn mutator_changes_value_and_persists() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();
    let id = record.id().unwrap();
    let saves_before = record.save_count();

    model.mutate(&mut record, "canceled").unwrap();

    assert_eq!(model.get(&record, "status").unwrap().unwrap(), "canceled");
    assert_eq!(record.save_count(), saves_before + 1);

    // The change is visible through a fresh checkout.
    let reloaded = store.checkout("models", id).unwrap();
    assert_eq!(reloaded.read_raw("status").as_str(), Some("canceled"));
}

#[test]
fn mutator_to_same_value_does_not_persist_again() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("canceled")).unwrap();

    model.mutate(&mut record, "available").unwrap();
    let saves_after_change = record.save_count();

    model.mutate(&mut record, "available").unwrap();
    assert_eq!(record.save_count(), saves_after_change);
}

#[test]
fn plain_setter_does_not_persist() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();
    let saves_before = record.save_count();

    model.set(&mut record, "status", "canceled").unwrap();

    assert_eq!(record.save_count(), saves_before);
    let reloaded = store.checkout("models", record.id().unwrap()).unwrap();
    assert_eq!(reloaded.read_raw("status").as_str(), Some("available"));
}

#[test]
fn setting_null_is_always_mechanically_possible() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();

    model.set(&mut record, "status", None::<&str>).unwrap();
    assert_eq!(model.get(&record, "status").unwrap(), None);
    // Settability is not gated by allow_nil; validity is.
    assert!(!model.is_valid(&record));
}

type HookLog = Arc<Mutex<Vec<(Token, Option<Token>)>>>;

fn hooked_model() -> (ModelType, HookLog) {
    let mut model = subscription_model();
    let events: HookLog = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&events);
    model.on_change("status", move |old, new| {
        seen.lock().unwrap().push((old.clone(), new.cloned()));
    });
    (model, events)
}

#[test]
fn hook_fires_once_between_two_set_values() {
    let (model, events) = hooked_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();

    model.mutate(&mut record, "canceled").unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "available");
    assert_eq!(events[0].1.as_ref().unwrap(), "canceled");
}

#[test]
fn hook_is_silent_on_initial_value() {
    let (model, events) = hooked_model();
    let store = store_for(&model);
    let mut record = store.build(&model);

    model.mutate(&mut record, "canceled").unwrap();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn hook_is_silent_on_same_value() {
    let (model, events) = hooked_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();

    model.mutate(&mut record, "available").unwrap();
    model.set(&mut record, "status", "available").unwrap();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn hook_fires_on_transition_to_null() {
    let (model, events) = hooked_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();

    model.set(&mut record, "status", None::<&str>).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "available");
    assert_eq!(events[0].1, None);
}

#[test]
fn value_outside_the_set_is_invalid() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.create(&model, status_attrs("available")).unwrap();

    record.write_raw("status", RawValue::new("foobar"));
    let err = model.validate(&record).unwrap_err();
    assert!(err.to_string().contains("not an allowed value"));

    record.write_raw("status", RawValue::new("canceled"));
    assert!(model.is_valid(&record));
}

#[test]
fn null_validity_is_gated_by_allow_nil() {
    let strict = subscription_model();
    let store = store_for(&strict);
    let record = store.build(&strict);
    assert!(matches!(
        strict.validate(&record),
        Err(EnumError::NullNotAllowed(_))
    ));

    let mut lenient = ModelType::new("models");
    lenient
        .enum_attribute(
            "status",
            ["active", "expired", "not_expired"],
            EnumOptions::new().allow_nil(),
        )
        .unwrap();
    let record = store.build(&lenient);
    assert!(lenient.is_valid(&record));
}

#[test]
fn create_rejects_invalid_records() {
    let model = subscription_model();
    let store = store_for(&model);

    assert!(store.create(&model, status_attrs("foobar")).is_err());
    assert!(store.create(&model, Attributes::new()).is_err());
    assert_eq!(store.row_count("models").unwrap(), 0);
}

#[test]
fn duplicate_member_names_are_a_declaration_error() {
    let mut model = subscription_model();

    let err = model
        .enum_attribute("kind", ["basic", "canceled"], EnumOptions::new())
        .unwrap_err();
    assert!(matches!(err, EnumError::MemberCollision(ref name) if name == "canceled"));

    // Members before the offending value were installed; none for it.
    assert!(model.has_member("basic?"));
    assert!(!model.has_member("kind_canceled?"));
}

#[test]
fn redeclaring_an_attribute_is_a_declaration_error() {
    let mut model = subscription_model();
    let err = model
        .enum_attribute("status", ["on", "off"], EnumOptions::new())
        .unwrap_err();
    assert!(matches!(err, EnumError::MemberCollision(ref name) if name == "status"));
}

#[test]
fn method_prefix_avoids_value_collisions_across_attributes() {
    let mut model = subscription_model();
    model
        .enum_attribute(
            "archive_status",
            ["available", "archived"],
            EnumOptions::new().method_prefix("archive"),
        )
        .unwrap();

    assert!(model.has_member("available?"));
    assert!(model.has_member("archive_available?"));
}

#[test]
fn prefixed_members_leave_the_plain_accessor_unprefixed() {
    let model = locale_model();
    let store = store_for(&model);
    let mut record = store.build(&model);

    // Accessors use the attribute name, not the prefix.
    model.set(&mut record, "locale", "fr").unwrap();
    assert_eq!(model.get(&record, "locale").unwrap().unwrap(), "fr");

    // Per-value members carry the prefix; unprefixed names do not exist.
    assert!(model.predicate(&record, "loc_fr").unwrap());
    for value in ["en", "es", "fr"] {
        assert!(model.has_member(&format!("loc_{value}?")));
        assert!(model.has_member(&format!("loc_{value}!")));
        assert!(!model.has_member(&format!("{value}?")));
        assert!(!model.has_member(&format!("{value}!")));
    }

    model.mutate(&mut record, "loc_en").unwrap();
    assert!(model.predicate(&record, "loc_en").unwrap());
}

#[test]
fn constant_exposes_values_verbatim_in_order() {
    let model = subscription_model();
    let statuses = model.constant("STATUSES").unwrap();
    assert_eq!(
        statuses,
        [
            Token::new("available"),
            Token::new("canceled"),
            Token::new("completed")
        ]
    );
    assert_eq!(model.allowed_values("status").unwrap(), statuses);

    let locales = locale_model();
    assert_eq!(
        locales.constant("LOCALES").unwrap(),
        [Token::new("en"), Token::new("es"), Token::new("fr")]
    );
}

#[test]
fn every_value_gets_predicate_and_mutator_members() {
    let model = subscription_model();
    for token in model.constant("STATUSES").unwrap() {
        assert!(model.has_member(&format!("{token}?")));
        assert!(model.has_member(&format!("{token}!")));
    }
}

#[test]
fn empty_value_list_installs_accessors_but_no_members() {
    let mut model = ModelType::new("models");
    model
        .enum_attribute("status", Vec::<Token>::new(), EnumOptions::new())
        .unwrap();

    assert_eq!(model.constant("STATUSES").unwrap(), &[] as &[Token]);
    assert!(model.has_member("status"));
    assert!(model.scope("not_status").is_err());

    // Every present value fails inclusion against an empty set.
    let store = store_for(&model);
    let mut record = store.build(&model);
    model.set(&mut record, "status", "anything").unwrap();
    assert!(!model.is_valid(&record));
}

#[test]
fn unknown_attributes_and_members_are_reported() {
    let model = subscription_model();
    let store = store_for(&model);
    let mut record = store.build(&model);

    assert!(matches!(
        model.get(&record, "color"),
        Err(EnumError::UnknownAttribute(_, _))
    ));
    assert!(matches!(
        model.predicate(&record, "nope"),
        Err(EnumError::UnknownMember(_, _))
    ));
    assert!(matches!(
        model.mutate(&mut record, "nope"),
        Err(EnumError::UnknownMember(_, _))
    ));
    assert!(matches!(
        model.scope("nope"),
        Err(EnumError::UnknownScope(_, _))
    ));
}
