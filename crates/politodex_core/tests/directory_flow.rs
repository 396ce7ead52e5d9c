use politodex_core::{
    initials, placeholder_portrait, ContactField, ContactForm, DirectoryConfig, DirectoryService,
    KeyValueStorage, MemoryStorage, PhotoUpload, SqliteKeyValueStorage, TrackRender,
    DEFAULT_STORAGE_KEY,
};

fn seeded_service() -> DirectoryService<MemoryStorage> {
    DirectoryService::new(MemoryStorage::new(), DirectoryConfig::default())
}

fn png_upload(name: &str, len: usize) -> PhotoUpload {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.resize(len.max(bytes.len()), 0);
    PhotoUpload::from_bytes(name, bytes)
}

#[test]
fn placeholder_initials_are_deterministic() {
    assert_eq!(initials("Rick Sanchez"), "RS");
    assert_eq!(
        placeholder_portrait("Rick Sanchez"),
        placeholder_portrait("Rick Sanchez")
    );
    assert_ne!(placeholder_portrait(""), placeholder_portrait("Rick Sanchez"));
    assert_eq!(placeholder_portrait(""), placeholder_portrait("   "));
}

#[test]
fn create_without_photo_prepends_record_with_placeholder() {
    let mut service = seeded_service();
    assert_eq!(service.store().len(), 2);

    let form = ContactForm::new().with(ContactField::Name, "  Ana Ray ");
    let outcome = service.submit_create(&form, None);

    assert_eq!(service.store().len(), 3);
    let created = service.store().get(0).unwrap();
    assert_eq!(created.name, "Ana Ray");
    assert_eq!(created.id, outcome.contact_id);
    assert_eq!(
        created.photo.as_deref(),
        Some(placeholder_portrait("Ana Ray").as_str())
    );
    assert_eq!(outcome.alert, None);
    assert_eq!(outcome.focus_index, Some(0));
    assert_eq!(outcome.track.cards().len(), 3);
    assert_eq!(outcome.track.cards()[0].name, "Ana Ray");

    let persisted = service
        .store()
        .storage()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    assert!(persisted.contains("Ana Ray"));
}

#[test]
fn create_with_photo_stores_inline_encoding() {
    let mut service = seeded_service();
    let form = ContactForm::new().with(ContactField::Name, "Ana Ray");

    service.submit_create(&form, Some(&png_upload("ana.png", 32)));

    let photo = service.store().get(0).unwrap().photo.clone().unwrap();
    assert!(photo.starts_with("data:image/png;base64,"));
}

#[test]
fn create_with_oversized_photo_alerts_and_uses_placeholder() {
    let mut service = seeded_service();
    let form = ContactForm::new().with(ContactField::Name, "Ana Ray");

    let outcome = service.submit_create(&form, Some(&png_upload("huge.png", 5 * 1024 * 1024)));

    assert_eq!(
        outcome.alert.as_deref(),
        Some("Portrait file is larger than 3MB. Please choose a smaller image.")
    );
    assert_eq!(
        service.store().get(0).unwrap().photo.as_deref(),
        Some(placeholder_portrait("Ana Ray").as_str())
    );
}

#[test]
fn create_with_unreadable_file_falls_back_silently() {
    let mut service = seeded_service();
    let dir = tempfile::tempdir().unwrap();
    let missing = PhotoUpload::from_path(dir.path().join("gone.png"));

    let outcome = service.submit_create(
        &ContactForm::new().with(ContactField::Name, "Bo"),
        Some(&missing),
    );

    assert_eq!(outcome.alert, None);
    assert_eq!(
        service.store().get(0).unwrap().photo.as_deref(),
        Some(placeholder_portrait("Bo").as_str())
    );
}

#[test]
fn cancel_edit_restores_stored_values_without_persisting() {
    let mut service = seeded_service();
    let original_phone = service.store().get(0).unwrap().phone.clone();

    let opened = service.open_detail(0).unwrap();
    assert!(!opened.editing);
    let editing = service.begin_edit().unwrap();
    assert!(editing.editing);

    assert!(service.set_edit_field(ContactField::Phone, "555-1234"));
    let draft_view = service.modal_view().unwrap();
    assert_eq!(
        draft_view.edit_form.value(ContactField::Phone),
        Some("555-1234")
    );

    let cancelled = service.cancel_edit().unwrap();
    assert!(!cancelled.editing);
    assert_eq!(
        cancelled.edit_form.value(ContactField::Phone),
        Some(original_phone.as_str())
    );
    assert_eq!(service.store().get(0).unwrap().phone, original_phone);
    assert_eq!(
        service
            .store()
            .storage()
            .get_item(DEFAULT_STORAGE_KEY)
            .unwrap(),
        None
    );
}

#[test]
fn submit_edit_persists_trimmed_fields_and_returns_to_view_mode() {
    let mut service = seeded_service();
    let untouched = service.store().get(0).unwrap().clone();
    let before = service.store().get(1).unwrap().clone();

    service.open_detail(1).unwrap();
    service.begin_edit().unwrap();
    let form = ContactForm::from_record(&before).with(ContactField::Phone, " 555-1234 ");
    let outcome = service.submit_edit(&form, None).unwrap();

    assert!(!outcome.modal.editing);
    assert_eq!(outcome.modal.index, 1);
    assert_eq!(outcome.modal.detail.phone.text, "555-1234");
    assert_eq!(
        outcome.modal.detail.phone.href.as_deref(),
        Some("tel:5551234")
    );

    let after = service.store().get(1).unwrap();
    assert_eq!(after.phone, "555-1234");
    assert_eq!(after.name, before.name);
    assert_eq!(after.photo, before.photo);
    assert_eq!(service.store().get(0).unwrap(), &untouched);

    let reloaded = DirectoryService::new(service.into_storage(), DirectoryConfig::default());
    assert_eq!(reloaded.store().get(1).unwrap().phone, "555-1234");
}

#[test]
fn oversized_edit_upload_keeps_prior_photo() {
    let mut service = seeded_service();
    let prior_photo = service.store().get(0).unwrap().photo.clone();
    assert!(prior_photo.is_some());

    service.open_detail(0).unwrap();
    service.begin_edit().unwrap();
    let form = ContactForm::from_record(service.store().get(0).unwrap());
    let outcome = service
        .submit_edit(&form, Some(&png_upload("huge.png", 5 * 1024 * 1024)))
        .unwrap();

    assert!(outcome.alert.is_some());
    assert_eq!(service.store().get(0).unwrap().photo, prior_photo);
}

#[test]
fn edit_of_photoless_record_synthesizes_placeholder_from_new_name() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(DEFAULT_STORAGE_KEY, r#"[{"name":"Old Name","photo":null}]"#)
        .unwrap();
    let mut service = DirectoryService::new(storage, DirectoryConfig::default());

    service.open_detail(0).unwrap();
    service.begin_edit().unwrap();
    let form = ContactForm::new().with(ContactField::Name, "Zed Quinn");
    service.submit_edit(&form, None).unwrap();

    assert_eq!(
        service.store().get(0).unwrap().photo.as_deref(),
        Some(placeholder_portrait("Zed Quinn").as_str())
    );
}

#[test]
fn active_record_follows_its_id_when_positions_shift() {
    let mut service = seeded_service();
    let morty_id = service.open_detail(1).unwrap().contact_id;

    service.submit_create(&ContactForm::new().with(ContactField::Name, "Ana Ray"), None);

    let view = service.modal_view().unwrap();
    assert_eq!(view.contact_id, morty_id);
    assert_eq!(view.index, 2);
    assert_eq!(service.active_index(), Some(2));
    assert_eq!(view.detail.name, "President Morty");
}

#[test]
fn closing_clears_active_record_and_blocks_edits() {
    let mut service = seeded_service();
    service.open_detail(0).unwrap();
    service.begin_edit().unwrap();
    service.close_detail();

    assert_eq!(service.active_index(), None);
    assert!(service.modal_view().is_none());
    assert!(service.begin_edit().is_none());
    assert!(service
        .submit_edit(&ContactForm::new().with(ContactField::Name, "x"), None)
        .is_none());
    assert!(service.open_detail(99).is_none());
}

#[test]
fn search_filters_and_reports_empty_state() {
    let mut service = seeded_service();

    let rick = service.search("RICK");
    assert_eq!(rick.cards().len(), 1);
    assert_eq!(rick.cards()[0].index, 0);

    let none = service.search("nobody");
    assert!(matches!(none, TrackRender::Empty { .. }));

    let outcome = service.submit_create(&ContactForm::new().with(ContactField::Name, "Ana"), None);
    assert!(outcome.track.is_empty());
    assert_eq!(outcome.focus_index, None);

    assert_eq!(service.search("").cards().len(), 3);
}

#[test]
fn session_survives_restart_on_sqlite_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("directory.db");

    {
        let storage = SqliteKeyValueStorage::open(&path).unwrap();
        let mut service = DirectoryService::new(storage, DirectoryConfig::default());
        service.submit_create(&ContactForm::new().with(ContactField::Name, "Ana Ray"), None);
    }

    let storage = SqliteKeyValueStorage::open(&path).unwrap();
    let service = DirectoryService::new(storage, DirectoryConfig::default());
    let names = service
        .render()
        .cards()
        .iter()
        .map(|card| card.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Ana Ray", "Rick Sanchez", "President Morty"]);
}
