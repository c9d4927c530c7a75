use bson::{Bson, DateTime, doc};
use weatherdb_admin::*;
use weatherdb_schema::*;

const DB: &str = "weatherdb";

fn provisioned() -> MemoryAdmin {
    let mut admin = MemoryAdmin::new();
    let collection = observations::collection();
    admin.create_collection(DB, &collection).unwrap();
    for index in &collection.indexes {
        admin.create_index(DB, &collection.name, index).unwrap();
    }
    admin
}

fn with_policy(level: ValidationLevel, action: ValidationAction) -> MemoryAdmin {
    let mut admin = MemoryAdmin::new();
    let mut collection = observations::collection();
    if let Some(v) = collection.validator.as_mut() {
        v.level = level;
        v.action = action;
    }
    admin.create_collection(DB, &collection).unwrap();
    admin
}

fn observation(city: &str) -> bson::Document {
    doc! {
        "city": city,
        "observation_time": DateTime::now(),
        "temp_c": 11.2,
    }
}

// ── Users ───────────────────────────────────────────────────────

#[test]
fn create_user_records_single_grant() {
    let mut admin = MemoryAdmin::new();
    let cred = Credential::read_write("weatherapp", "weatherpass", DB);
    admin.create_user(&cred).unwrap();

    let user = admin.user(DB, "weatherapp").unwrap();
    assert_eq!(user.password, "weatherpass");
    assert_eq!(
        user.roles,
        vec![RoleGrant {
            role: BuiltinRole::ReadWrite,
            db: DB.into(),
        }]
    );
    assert!(admin.user("admin", "weatherapp").is_none());
}

#[test]
fn duplicate_user_fails_and_keeps_original() {
    let mut admin = MemoryAdmin::new();
    admin
        .create_user(&Credential::read_write("weatherapp", "first", DB))
        .unwrap();
    let err = admin
        .create_user(&Credential::read_write("weatherapp", "second", DB))
        .unwrap_err();

    assert_eq!(err.code(), Some(codes::USER_ALREADY_EXISTS));
    assert_eq!(admin.user(DB, "weatherapp").unwrap().password, "first");
}

// ── Collections ─────────────────────────────────────────────────

#[test]
fn create_collection_attaches_validator() {
    let admin = provisioned();
    let col = admin.collection(DB, observations::COLLECTION).unwrap();
    assert_eq!(col.validator(), Some(&observations::validator()));
    assert_eq!(admin.collection_names(DB), vec![observations::COLLECTION]);
}

#[test]
fn existing_collection_fails_without_touching_documents() {
    let mut admin = provisioned();
    admin
        .insert_one(DB, observations::COLLECTION, observation("Cluj"))
        .unwrap();

    let err = admin
        .create_collection(DB, &observations::collection())
        .unwrap_err();
    assert_eq!(err.code(), Some(codes::NAMESPACE_EXISTS));
    assert_eq!(
        admin
            .collection(DB, observations::COLLECTION)
            .unwrap()
            .documents()
            .len(),
        1
    );
}

// ── Indexes ─────────────────────────────────────────────────────

#[test]
fn identical_index_is_a_no_op() {
    let mut admin = provisioned();
    admin
        .create_index(DB, observations::COLLECTION, &observations::city_time_index())
        .unwrap();
    let col = admin.collection(DB, observations::COLLECTION).unwrap();
    assert_eq!(col.indexes(), &[observations::city_time_index()]);
}

#[test]
fn conflicting_index_name_fails() {
    let mut admin = provisioned();
    let conflicting = IndexDescriptor {
        keys: vec![IndexKey::asc("city")],
        name: Some("city_1_observation_time_1".into()),
    };
    let err = admin
        .create_index(DB, observations::COLLECTION, &conflicting)
        .unwrap_err();
    assert_eq!(err.code(), Some(codes::INDEX_KEY_SPECS_CONFLICT));
}

#[test]
fn index_on_missing_collection_creates_it() {
    let mut admin = MemoryAdmin::new();
    admin
        .create_index(DB, "implicit", &IndexDescriptor::ascending(&["city"]))
        .unwrap();
    let col = admin.collection(DB, "implicit").unwrap();
    assert!(col.validator().is_none());
    assert_eq!(col.indexes().len(), 1);
}

// ── Validation ──────────────────────────────────────────────────

#[test]
fn warn_accepts_document_missing_temp() {
    let mut admin = provisioned();
    let mut doc = observation("Cluj");
    doc.remove("temp_c");

    let id = admin.insert_one(DB, observations::COLLECTION, doc).unwrap();

    let col = admin.collection(DB, observations::COLLECTION).unwrap();
    assert_eq!(col.documents().len(), 1);
    assert_eq!(admin.warnings().len(), 1);
    let warning = &admin.warnings()[0];
    assert_eq!(warning.namespace, "weatherdb.weather_observations");
    assert_eq!(warning.id, id);
    assert_eq!(
        warning.violations,
        vec![Violation::MissingRequired("temp_c".into())]
    );
}

#[test]
fn conforming_insert_produces_no_warning() {
    let mut admin = provisioned();
    admin
        .insert_one(DB, observations::COLLECTION, observation("Cluj"))
        .unwrap();
    assert!(admin.warnings().is_empty());
}

#[test]
fn error_action_rejects_non_conforming_insert() {
    let mut admin = with_policy(ValidationLevel::Strict, ValidationAction::Error);
    let mut doc = observation("Cluj");
    doc.insert("temp_c", "warm");

    let err = admin
        .insert_one(DB, observations::COLLECTION, doc)
        .unwrap_err();
    assert_eq!(err.code(), Some(codes::DOCUMENT_VALIDATION_FAILURE));
    assert!(
        admin
            .collection(DB, observations::COLLECTION)
            .unwrap()
            .documents()
            .is_empty()
    );
}

#[test]
fn off_level_skips_validation() {
    let mut admin = with_policy(ValidationLevel::Off, ValidationAction::Error);
    admin
        .insert_one(DB, observations::COLLECTION, doc! { "anything": 1 })
        .unwrap();
    assert!(admin.warnings().is_empty());
}

#[test]
fn moderate_skips_updates_to_non_conforming_documents() {
    let mut admin = MemoryAdmin::new();
    let legacy = admin
        .insert_one(DB, "legacy", doc! { "city": "Cluj", "temp_c": "n/a" })
        .unwrap();
    admin
        .set_validator(
            DB,
            "legacy",
            Some(Validator {
                schema: observations::schema(),
                level: ValidationLevel::Moderate,
                action: ValidationAction::Error,
            }),
        )
        .unwrap();

    let replaced = admin
        .replace_one(DB, "legacy", &legacy, doc! { "city": 5 })
        .unwrap();
    assert!(replaced);
    assert!(admin.warnings().is_empty());
}

#[test]
fn set_validator_on_missing_collection_fails() {
    let mut admin = MemoryAdmin::new();
    let err = admin
        .set_validator(DB, "missing", Some(observations::validator()))
        .unwrap_err();
    assert_eq!(err.code(), Some(codes::NAMESPACE_NOT_FOUND));
}

#[test]
fn moderate_validates_updates_to_conforming_documents() {
    let mut admin = with_policy(ValidationLevel::Moderate, ValidationAction::Error);
    let id = admin
        .insert_one(DB, observations::COLLECTION, observation("Cluj"))
        .unwrap();

    let err = admin
        .replace_one(DB, observations::COLLECTION, &id, doc! { "city": "Cluj" })
        .unwrap_err();
    assert_eq!(err.code(), Some(codes::DOCUMENT_VALIDATION_FAILURE));
}

#[test]
fn replace_of_unknown_id_matches_nothing() {
    let mut admin = provisioned();
    let replaced = admin
        .replace_one(
            DB,
            observations::COLLECTION,
            &Bson::String("missing".into()),
            observation("Cluj"),
        )
        .unwrap();
    assert!(!replaced);
}

#[test]
fn duplicate_id_is_rejected() {
    let mut admin = provisioned();
    let mut doc = observation("Cluj");
    doc.insert("_id", "obs-1");
    admin
        .insert_one(DB, observations::COLLECTION, doc.clone())
        .unwrap();
    let err = admin
        .insert_one(DB, observations::COLLECTION, doc)
        .unwrap_err();
    assert_eq!(err.code(), Some(codes::DUPLICATE_KEY));
}

// ── Failure injection ───────────────────────────────────────────

#[test]
fn injected_failure_fires_once() {
    let mut admin = MemoryAdmin::new();
    admin.fail_on(
        CommandKind::CreateCollection,
        AdminError::command(codes::UNAUTHORIZED, "Unauthorized", "not authorized"),
    );

    let collection = observations::collection();
    let err = admin.create_collection(DB, &collection).unwrap_err();
    assert_eq!(err.code(), Some(codes::UNAUTHORIZED));
    assert!(admin.collection(DB, &collection.name).is_none());

    admin.create_collection(DB, &collection).unwrap();
    assert_eq!(
        admin.journal(),
        &[(
            CommandKind::CreateCollection,
            "weatherdb.weather_observations".to_string()
        )]
    );
}
